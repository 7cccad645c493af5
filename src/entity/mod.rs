//! SeaORM entity definitions for PostgreSQL database.

pub mod test_method_result;
