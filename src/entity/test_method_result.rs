//! TestMethodResult entity for SeaORM.

use sea_orm::entity::prelude::*;
use serde_json::Value as JsonValue;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "test_method_results")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub run_id: String,
    pub iata: String,
    pub suite_type: String,
    pub feature_name: String,
    pub method_name: String,
    pub class_name: String,
    pub status: String,
    pub assert_type: String,
    pub start_time: DateTimeUtc,
    pub end_time: DateTimeUtc,
    pub duration_ms: i64,
    #[sea_orm(column_type = "JsonBinary", nullable)]
    pub jira_test_cases: Option<JsonValue>,
    #[sea_orm(column_type = "JsonBinary", nullable)]
    pub environment: Option<JsonValue>,
    #[sea_orm(column_type = "JsonBinary", nullable)]
    pub logs: Option<JsonValue>,
    #[sea_orm(column_type = "JsonBinary", nullable)]
    pub screenshot_urls: Option<JsonValue>,
    #[sea_orm(column_type = "JsonBinary", nullable)]
    pub failures: Option<JsonValue>,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
