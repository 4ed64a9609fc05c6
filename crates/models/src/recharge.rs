use chrono::Utc;
use sea_orm::{entity::prelude::*, ConnectionTrait, DatabaseConnection, QueryOrder, Set, SqlErr};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors;
use crate::validate;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "recharge")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub mobile_number: String,
    pub plan_name: String,
    pub amount: f64,
    pub transaction_id: String,
    pub payment_method: String,
    pub recharged_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        panic!("no relations defined here")
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Append a recharge transaction. Rows are never updated afterwards.
/// Takes any connection so callers can write inside a transaction.
pub async fn create(
    db: &impl ConnectionTrait,
    mobile_number: &str,
    plan_name: &str,
    amount: f64,
    transaction_id: &str,
    payment_method: &str,
) -> Result<Model, errors::ModelError> {
    validate::validate_mobile(mobile_number)?;
    if transaction_id.trim().is_empty() {
        return Err(errors::ModelError::Validation("transaction id required".into()));
    }
    let am = ActiveModel {
        id: Set(Uuid::new_v4()),
        mobile_number: Set(mobile_number.to_string()),
        plan_name: Set(plan_name.to_string()),
        amount: Set(amount),
        transaction_id: Set(transaction_id.to_string()),
        payment_method: Set(payment_method.to_string()),
        recharged_at: Set(Utc::now().into()),
    };
    am.insert(db).await.map_err(|e| match e.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => {
            errors::ModelError::Conflict("duplicate transaction id".into())
        }
        _ => errors::ModelError::Db(e.to_string()),
    })
}

/// Full history for one mobile number, oldest first.
pub async fn find_by_mobile(
    db: &DatabaseConnection,
    mobile_number: &str,
) -> Result<Vec<Model>, errors::ModelError> {
    Entity::find()
        .filter(Column::MobileNumber.eq(mobile_number))
        .order_by_asc(Column::RechargedAt)
        .all(db)
        .await
        .map_err(|e| errors::ModelError::Db(e.to_string()))
}
