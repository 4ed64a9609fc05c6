use sea_orm::DatabaseConnection;

use models::plan;

use crate::errors::ServiceError;

/// All plans in the catalogue, cheapest first.
pub async fn list_plans(db: &DatabaseConnection) -> Result<Vec<plan::Model>, ServiceError> {
    let plans = plan::list(db).await?;
    Ok(plans)
}

/// Add a plan to the catalogue.
pub async fn create_plan(
    db: &DatabaseConnection,
    name: &str,
    category: plan::Category,
    price: f64,
    data: &str,
    calls: &str,
    sms: &str,
    validity_days: i32,
) -> Result<plan::Model, ServiceError> {
    let created = plan::create(db, name, category, price, data, calls, sms, validity_days).await?;
    Ok(created)
}
