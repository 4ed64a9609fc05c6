use chrono::NaiveDate;
use sea_orm::{DatabaseConnection, TransactionTrait};
use serde::{Deserialize, Serialize};
use tracing::{error, info};
use uuid::Uuid;

use models::{plan, recharge, subscriber, validate};

use crate::errors::ServiceError;
use crate::mailer::{Mailer, RechargeConfirmation};

/// Recharge request; field names follow the public API contract.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RechargeRequest {
    #[serde(default)]
    pub mobile_number: Option<String>,
    pub plan_id: Uuid,
    #[serde(default)]
    pub payment_method: Option<String>,
}

/// What the caller gets back once the transaction is recorded.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RechargeReceipt {
    pub mobile_number: String,
    pub plan_name: String,
    pub amount: f64,
    pub transaction_id: String,
    pub payment_method: String,
    pub plan_expiry: NaiveDate,
}

/// Full recharge history for a mobile number, oldest first.
pub async fn history(
    db: &DatabaseConnection,
    mobile_number: &str,
) -> Result<Vec<recharge::Model>, ServiceError> {
    validate::validate_mobile(mobile_number)?;
    let records = recharge::find_by_mobile(db, mobile_number).await?;
    Ok(records)
}

/// Process a recharge: record the transaction and move the subscriber onto
/// the plan in one database transaction, then send the confirmation email.
/// The email is best-effort; the writes are already committed, so a
/// transport failure is logged and the receipt is still returned.
pub async fn recharge(
    db: &DatabaseConnection,
    mailer: &dyn Mailer,
    req: &RechargeRequest,
    today: NaiveDate,
) -> Result<RechargeReceipt, ServiceError> {
    let mobile = req.mobile_number.as_deref().unwrap_or("");
    validate::validate_mobile(mobile)?;
    let payment_method = req.payment_method.as_deref().unwrap_or("").trim();
    if payment_method.is_empty() {
        return Err(ServiceError::Validation("Payment method is required".into()));
    }

    let sub = subscriber::find_by_mobile(db, mobile)
        .await?
        .ok_or_else(|| ServiceError::not_found("subscriber"))?;
    let plan = plan::find_by_id(db, req.plan_id)
        .await?
        .ok_or_else(|| ServiceError::not_found("plan"))?;

    let transaction_id = new_transaction_id();
    let (record, updated) =
        record_and_apply(db, sub.id, &plan, mobile, &transaction_id, payment_method, today)
            .await?;
    let plan_expiry = updated
        .plan_expiry
        .ok_or_else(|| ServiceError::Db("recharge applied without expiry".into()))?;

    info!(
        mobile_number = %record.mobile_number,
        plan = %record.plan_name,
        transaction_id = %record.transaction_id,
        "recharge recorded"
    );

    let confirmation = RechargeConfirmation {
        to: updated.email.clone(),
        mobile_number: record.mobile_number.clone(),
        plan_name: record.plan_name.clone(),
        amount: record.amount,
        transaction_id: record.transaction_id.clone(),
        payment_method: record.payment_method.clone(),
    };
    if let Err(e) = mailer.send_confirmation(&confirmation).await {
        error!(
            transaction_id = %record.transaction_id,
            error = %e,
            "confirmation email failed; recharge already recorded"
        );
    }

    Ok(RechargeReceipt {
        mobile_number: record.mobile_number,
        plan_name: record.plan_name,
        amount: record.amount,
        transaction_id: record.transaction_id,
        payment_method: record.payment_method,
        plan_expiry,
    })
}

// The transaction row and the subscriber update commit together; if either
// write fails the transaction is dropped and rolled back, so a failed update
// cannot leave an orphaned recharge row behind.
async fn record_and_apply(
    db: &DatabaseConnection,
    subscriber_id: Uuid,
    plan: &plan::Model,
    mobile: &str,
    transaction_id: &str,
    payment_method: &str,
    today: NaiveDate,
) -> Result<(recharge::Model, subscriber::Model), ServiceError> {
    let txn = db.begin().await.map_err(|e| ServiceError::Db(e.to_string()))?;
    let record =
        recharge::create(&txn, mobile, &plan.name, plan.price, transaction_id, payment_method)
            .await?;
    let updated = subscriber::apply_recharge(&txn, subscriber_id, plan, today).await?;
    txn.commit().await.map_err(|e| ServiceError::Db(e.to_string()))?;
    Ok((record, updated))
}

fn new_transaction_id() -> String {
    format!("TXN{}", Uuid::new_v4().simple())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mailer::MailError;
    use crate::test_support::get_db;
    use async_trait::async_trait;
    use chrono::{Days, Utc};
    use sea_orm::EntityTrait;
    use std::sync::Mutex;

    fn unique_mobile() -> String {
        let n = Uuid::new_v4().as_u128() % 10_000_000_000;
        format!("{:010}", n)
    }

    /// Captures confirmations instead of talking to an SMTP server.
    #[derive(Default)]
    struct RecordingMailer {
        sent: Mutex<Vec<RechargeConfirmation>>,
        fail: bool,
    }

    #[async_trait]
    impl Mailer for RecordingMailer {
        async fn send_confirmation(
            &self,
            confirmation: &RechargeConfirmation,
        ) -> Result<(), MailError> {
            if self.fail {
                return Err(MailError::Smtp("boom".into()));
            }
            self.sent.lock().unwrap().push(confirmation.clone());
            Ok(())
        }
    }

    #[test]
    fn transaction_ids_are_unique_and_prefixed() {
        let a = new_transaction_id();
        let b = new_transaction_id();
        assert!(a.starts_with("TXN"));
        assert_ne!(a, b);
    }

    #[tokio::test]
    async fn recharge_updates_subscriber_and_sends_mail() -> Result<(), anyhow::Error> {
        if crate::test_support::skip_db_tests() {
            return Ok(());
        }
        let db = get_db().await?;
        let today = Utc::now().date_naive();

        let p = models::plan::create(
            &db,
            "Monthly 299",
            models::plan::Category::Unlimited,
            299.0,
            "2GB/day",
            "Unlimited",
            "100/day",
            28,
        )
        .await?;
        let mobile = unique_mobile();
        let email = format!("rs_{}@x.com", Uuid::new_v4());
        let sub = models::subscriber::create(&db, &mobile, "Asha", &email, today).await?;

        let mailer = RecordingMailer::default();
        let req = RechargeRequest {
            mobile_number: Some(mobile.clone()),
            plan_id: p.id,
            payment_method: Some("UPI".into()),
        };
        let receipt = recharge(&db, &mailer, &req, today).await?;

        assert_eq!(receipt.mobile_number, mobile);
        assert_eq!(receipt.plan_name, "Monthly 299");
        assert_eq!(receipt.amount, 299.0);
        assert_eq!(receipt.plan_expiry, today.checked_add_days(Days::new(28)).unwrap());

        let updated = models::subscriber::find_by_mobile(&db, &mobile).await?.unwrap();
        assert_eq!(updated.current_plan_id, Some(p.id));
        assert_eq!(updated.data_used, Some(0.0));
        assert_eq!(updated.data_total.as_deref(), Some("2GB/day"));

        let sent = mailer.sent.lock().unwrap();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].to, email);
        assert_eq!(sent[0].transaction_id, receipt.transaction_id);
        drop(sent);

        let hist = history(&db, &mobile).await?;
        assert_eq!(hist.len(), 1);
        assert_eq!(hist[0].transaction_id, receipt.transaction_id);

        models::recharge::Entity::delete_by_id(hist[0].id).exec(&db).await?;
        models::subscriber::Entity::delete_by_id(sub.id).exec(&db).await?;
        models::plan::Entity::delete_by_id(p.id).exec(&db).await?;
        Ok(())
    }

    #[tokio::test]
    async fn mail_failure_does_not_fail_the_recharge() -> Result<(), anyhow::Error> {
        if crate::test_support::skip_db_tests() {
            return Ok(());
        }
        let db = get_db().await?;
        let today = Utc::now().date_naive();

        let p = models::plan::create(
            &db,
            "Weekly 99",
            models::plan::Category::Validity,
            99.0,
            "1GB/day",
            "Unlimited",
            "100/day",
            7,
        )
        .await?;
        let mobile = unique_mobile();
        let sub = models::subscriber::create(
            &db,
            &mobile,
            "Bob",
            &format!("rf_{}@x.com", Uuid::new_v4()),
            today,
        )
        .await?;

        let mailer = RecordingMailer { fail: true, ..Default::default() };
        let req = RechargeRequest {
            mobile_number: Some(mobile.clone()),
            plan_id: p.id,
            payment_method: Some("Card".into()),
        };
        let receipt = recharge(&db, &mailer, &req, today).await?;

        // Transaction persisted even though the mail bounced
        let hist = history(&db, &mobile).await?;
        assert_eq!(hist.len(), 1);
        assert_eq!(hist[0].transaction_id, receipt.transaction_id);

        models::recharge::Entity::delete_by_id(hist[0].id).exec(&db).await?;
        models::subscriber::Entity::delete_by_id(sub.id).exec(&db).await?;
        models::plan::Entity::delete_by_id(p.id).exec(&db).await?;
        Ok(())
    }

    #[tokio::test]
    async fn failed_subscriber_update_keeps_no_transaction_row() -> Result<(), anyhow::Error> {
        if crate::test_support::skip_db_tests() {
            return Ok(());
        }
        let db = get_db().await?;
        let today = Utc::now().date_naive();

        let p = models::plan::create(
            &db,
            "Weekly 99",
            models::plan::Category::Validity,
            99.0,
            "1GB/day",
            "Unlimited",
            "100/day",
            7,
        )
        .await?;
        let mobile = unique_mobile();

        // The subscriber id does not exist, so the update half fails and the
        // already-inserted recharge row must be rolled back with it.
        let err = record_and_apply(
            &db,
            Uuid::new_v4(),
            &p,
            &mobile,
            &new_transaction_id(),
            "UPI",
            today,
        )
        .await
        .unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)));

        let hist = history(&db, &mobile).await?;
        assert!(hist.is_empty());

        models::plan::Entity::delete_by_id(p.id).exec(&db).await?;
        Ok(())
    }

    #[tokio::test]
    async fn history_rejects_malformed_mobile() -> Result<(), anyhow::Error> {
        if crate::test_support::skip_db_tests() {
            return Ok(());
        }
        let db = get_db().await?;
        let err = history(&db, "ABC1234567").await.unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)));
        Ok(())
    }
}
