use chrono::Utc;
use sea_orm::{entity::prelude::*, DatabaseConnection, QueryOrder, Set};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors;

/// Catalogue bucket a plan is marketed under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(32))")]
pub enum Category {
    #[sea_orm(string_value = "Popular")]
    Popular,
    #[sea_orm(string_value = "Validity")]
    Validity,
    #[sea_orm(string_value = "Data")]
    Data,
    #[sea_orm(string_value = "Unlimited")]
    Unlimited,
    #[sea_orm(string_value = "Special")]
    Special,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "plan")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: String,
    pub category: Category,
    pub price: f64,
    /// Allowances are free-form marketing text ("2GB/day", "Unlimited").
    pub data: String,
    pub calls: String,
    pub sms: String,
    pub validity_days: i32,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        panic!("no relations defined here")
    }
}

impl ActiveModelBehavior for ActiveModel {}

pub async fn create(
    db: &DatabaseConnection,
    name: &str,
    category: Category,
    price: f64,
    data: &str,
    calls: &str,
    sms: &str,
    validity_days: i32,
) -> Result<Model, errors::ModelError> {
    if name.trim().is_empty() {
        return Err(errors::ModelError::Validation("plan name required".into()));
    }
    if validity_days <= 0 {
        return Err(errors::ModelError::Validation("validity must be positive".into()));
    }
    let am = ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set(name.to_string()),
        category: Set(category),
        price: Set(price),
        data: Set(data.to_string()),
        calls: Set(calls.to_string()),
        sms: Set(sms.to_string()),
        validity_days: Set(validity_days),
        created_at: Set(Utc::now().into()),
    };
    am.insert(db).await.map_err(|e| errors::ModelError::Db(e.to_string()))
}

pub async fn find_by_id(
    db: &DatabaseConnection,
    id: Uuid,
) -> Result<Option<Model>, errors::ModelError> {
    Entity::find_by_id(id)
        .one(db)
        .await
        .map_err(|e| errors::ModelError::Db(e.to_string()))
}

/// All plans, cheapest first.
pub async fn list(db: &DatabaseConnection) -> Result<Vec<Model>, errors::ModelError> {
    Entity::find()
        .order_by_asc(Column::Price)
        .all(db)
        .await
        .map_err(|e| errors::ModelError::Db(e.to_string()))
}
