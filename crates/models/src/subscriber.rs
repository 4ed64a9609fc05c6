use chrono::{Days, NaiveDate};
use sea_orm::{entity::prelude::*, ConnectionTrait, DatabaseConnection, QueryOrder, Set, SqlErr};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors;
use crate::plan;
use crate::validate;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "subscriber")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub mobile_number: String,
    pub name: String,
    pub email: String,
    pub current_plan_id: Option<Uuid>,
    pub plan_expiry: Option<Date>,
    pub data_used: Option<f64>,
    pub data_total: Option<String>,
    pub created_at: Date,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {
    Plan,
}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::Plan => Entity::belongs_to(plan::Entity)
                .from(Column::CurrentPlanId)
                .to(plan::Column::Id)
                .into(),
        }
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Insert a new subscriber. Validation order matches the registration
/// contract: mobile, then name, then email.
pub async fn create(
    db: &DatabaseConnection,
    mobile_number: &str,
    name: &str,
    email: &str,
    created_at: NaiveDate,
) -> Result<Model, errors::ModelError> {
    validate::validate_mobile(mobile_number)?;
    validate::validate_name(name)?;
    validate::validate_email(email)?;
    let am = ActiveModel {
        id: Set(Uuid::new_v4()),
        mobile_number: Set(mobile_number.to_string()),
        name: Set(name.to_string()),
        email: Set(email.to_string()),
        current_plan_id: Set(None),
        plan_expiry: Set(None),
        data_used: Set(None),
        data_total: Set(None),
        created_at: Set(created_at),
    };
    am.insert(db).await.map_err(|e| match e.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => {
            errors::ModelError::Conflict("mobile number or email already registered".into())
        }
        _ => errors::ModelError::Db(e.to_string()),
    })
}

pub async fn find_by_mobile(
    db: &DatabaseConnection,
    mobile_number: &str,
) -> Result<Option<Model>, errors::ModelError> {
    Entity::find()
        .filter(Column::MobileNumber.eq(mobile_number))
        .one(db)
        .await
        .map_err(|e| errors::ModelError::Db(e.to_string()))
}

/// Subscribers whose plan expires within `[today, today + window_days]`.
/// Subscribers without a plan never match; the lower bound keeps already
/// lapsed accounts out of the renewal list.
pub async fn find_expiring(
    db: &DatabaseConnection,
    today: NaiveDate,
    window_days: u32,
) -> Result<Vec<Model>, errors::ModelError> {
    let horizon = today
        .checked_add_days(Days::new(window_days as u64))
        .ok_or_else(|| errors::ModelError::Validation("window overflows calendar".into()))?;
    Entity::find()
        .filter(Column::PlanExpiry.between(today, horizon))
        .order_by_asc(Column::PlanExpiry)
        .all(db)
        .await
        .map_err(|e| errors::ModelError::Db(e.to_string()))
}

/// Point the subscriber at a new plan after a successful recharge: resets
/// usage counters and pushes expiry out by the plan's validity. Takes any
/// connection so the caller can pair it with the transaction-row insert.
pub async fn apply_recharge(
    db: &impl ConnectionTrait,
    id: Uuid,
    new_plan: &plan::Model,
    today: NaiveDate,
) -> Result<Model, errors::ModelError> {
    let expiry = today
        .checked_add_days(Days::new(new_plan.validity_days as u64))
        .ok_or_else(|| errors::ModelError::Validation("validity overflows calendar".into()))?;
    let mut am: ActiveModel = Entity::find_by_id(id)
        .one(db)
        .await
        .map_err(|e| errors::ModelError::Db(e.to_string()))?
        .ok_or_else(|| errors::ModelError::Validation("subscriber not found".into()))?
        .into();
    am.current_plan_id = Set(Some(new_plan.id));
    am.plan_expiry = Set(Some(expiry));
    am.data_used = Set(Some(0.0));
    am.data_total = Set(Some(new_plan.data.clone()));
    am.update(db).await.map_err(|e| errors::ModelError::Db(e.to_string()))
}
