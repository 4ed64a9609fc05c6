use chrono::NaiveDate;
use sea_orm::DatabaseConnection;
use serde::Deserialize;

use models::{subscriber, validate};

use crate::errors::ServiceError;

/// Registration payload; field names follow the public API contract.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewSubscriber {
    #[serde(default)]
    pub mobile_number: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

// Checks short-circuit in contract order: mobile number, then name, then
// email; a missing field fails the same check a malformed one does.
fn validate_registration(req: &NewSubscriber) -> Result<(), ServiceError> {
    validate::validate_mobile(req.mobile_number.as_deref().unwrap_or(""))?;
    validate::validate_name(req.name.as_deref().unwrap_or(""))?;
    validate::validate_email(req.email.as_deref().unwrap_or(""))?;
    Ok(())
}

/// Register a subscriber. `created_at` is stamped with `today`.
pub async fn register(
    db: &DatabaseConnection,
    req: &NewSubscriber,
    today: NaiveDate,
) -> Result<subscriber::Model, ServiceError> {
    validate_registration(req)?;
    let created = subscriber::create(
        db,
        req.mobile_number.as_deref().unwrap_or(""),
        req.name.as_deref().unwrap_or(""),
        req.email.as_deref().unwrap_or(""),
        today,
    )
    .await?;
    Ok(created)
}

/// Subscribers whose plan expiry falls within the renewal window.
pub async fn list_expiring(
    db: &DatabaseConnection,
    today: NaiveDate,
    window_days: u32,
) -> Result<Vec<subscriber::Model>, ServiceError> {
    let expiring = subscriber::find_expiring(db, today, window_days).await?;
    Ok(expiring)
}

/// Whether a (well-formed) mobile number belongs to a registered subscriber.
pub async fn mobile_registered(
    db: &DatabaseConnection,
    mobile_number: &str,
) -> Result<bool, ServiceError> {
    validate::validate_mobile(mobile_number)?;
    let found = subscriber::find_by_mobile(db, mobile_number).await?;
    Ok(found.is_some())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::get_db;
    use chrono::Utc;
    use sea_orm::EntityTrait;
    use uuid::Uuid;

    fn unique_mobile() -> String {
        let n = Uuid::new_v4().as_u128() % 10_000_000_000;
        format!("{:010}", n)
    }

    #[tokio::test]
    async fn register_stamps_creation_date() -> Result<(), anyhow::Error> {
        if crate::test_support::skip_db_tests() {
            return Ok(());
        }
        let db = get_db().await?;
        let today = Utc::now().date_naive();

        let req = NewSubscriber {
            mobile_number: Some(unique_mobile()),
            name: Some("Asha".into()),
            email: Some(format!("asha_{}@x.com", Uuid::new_v4())),
        };
        let created = register(&db, &req, today).await?;
        assert_eq!(created.created_at, today);

        assert!(mobile_registered(&db, &created.mobile_number).await?);

        models::subscriber::Entity::delete_by_id(created.id).exec(&db).await?;
        Ok(())
    }

    #[test]
    fn registration_validates_in_contract_order() {
        let req = NewSubscriber {
            mobile_number: Some("12345".into()),
            name: None,
            email: None,
        };
        let err = validate_registration(&req).unwrap_err();
        assert_eq!(err.to_string(), "Invalid mobile number");

        let req = NewSubscriber {
            mobile_number: Some("9876543210".into()),
            name: Some("   ".into()),
            email: Some("no-at-sign".into()),
        };
        let err = validate_registration(&req).unwrap_err();
        assert_eq!(err.to_string(), "Name is required");

        let req = NewSubscriber {
            mobile_number: Some("9876543210".into()),
            name: Some("Bob".into()),
            email: Some("no-at-sign".into()),
        };
        let err = validate_registration(&req).unwrap_err();
        assert_eq!(err.to_string(), "Valid email is required");
    }

    #[test]
    fn registration_rejects_missing_fields() {
        let req = NewSubscriber { mobile_number: None, name: None, email: None };
        let err = validate_registration(&req).unwrap_err();
        assert_eq!(err.to_string(), "Invalid mobile number");
    }
}
