use sea_orm::entity::prelude::*;
use serde::{ Deserialize, Serialize };

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "alerts")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub address: String,
    pub alert_type: String, // "price", "portfolio"
    pub token_symbol: Option<String>,
    pub operator: String, // "above", "below", "percent_increase", "percent_decrease"
    pub value: f64,
    pub enabled: bool,
    pub created_at: DateTimeUtc,
    pub last_triggered: Option<DateTimeUtc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
