//! Recharge confirmation mail. One fixed plain-text template, dispatched
//! synchronously over SMTP; no retries, no queueing.

use async_trait::async_trait;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use thiserror::Error;
use tracing::info;

pub const CONFIRMATION_SUBJECT: &str = "Recharge Confirmation - MobiComm";

#[derive(Debug, Error)]
pub enum MailError {
    #[error("mail transport not configured: {0}")]
    NotConfigured(String),
    #[error("invalid address: {0}")]
    Address(String),
    #[error("smtp error: {0}")]
    Smtp(String),
}

/// Everything the confirmation template needs about one transaction.
#[derive(Debug, Clone)]
pub struct RechargeConfirmation {
    pub to: String,
    pub mobile_number: String,
    pub plan_name: String,
    pub amount: f64,
    pub transaction_id: String,
    pub payment_method: String,
}

/// Compose the fixed confirmation body.
pub fn confirmation_body(c: &RechargeConfirmation) -> String {
    format!(
        "Dear Customer,\n\n\
         Thank you for recharging with MobiComm!\n\n\
         Recharge Details:\n\
         ------------------------\n\
         Mobile Number  : {}\n\
         Plan Name      : {}\n\
         Amount Paid    : \u{20b9}{:.2}\n\
         Payment Method : {}\n\
         Transaction ID : {}\n\n\
         Your recharge has been successfully processed.\n\n\
         For any support, feel free to reach out to our customer care.\n\n\
         Warm regards,\n\
         MobiComm Support Team",
        c.mobile_number, c.plan_name, c.amount, c.payment_method, c.transaction_id
    )
}

/// Seam between the recharge workflow and the mail transport.
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send_confirmation(&self, confirmation: &RechargeConfirmation) -> Result<(), MailError>;
}

/// SMTP-backed mailer (STARTTLS relay with credentials).
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl SmtpMailer {
    pub fn from_config(cfg: &configs::MailConfig) -> Result<Self, MailError> {
        if cfg.smtp_host.trim().is_empty() {
            return Err(MailError::NotConfigured("mail.smtp_host is empty".into()));
        }
        let from: Mailbox = cfg.from.parse().map_err(|_| {
            MailError::Address(format!("mail.from is not a valid address: {:?}", cfg.from))
        })?;
        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&cfg.smtp_host)
            .map_err(|e| MailError::Smtp(e.to_string()))?
            .port(cfg.smtp_port)
            .credentials(Credentials::new(cfg.username.clone(), cfg.password.clone()))
            .build();
        Ok(Self { transport, from })
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send_confirmation(&self, confirmation: &RechargeConfirmation) -> Result<(), MailError> {
        let to: Mailbox = confirmation
            .to
            .parse()
            .map_err(|_| MailError::Address(format!("invalid recipient: {:?}", confirmation.to)))?;
        let message = Message::builder()
            .from(self.from.clone())
            .to(to)
            .subject(CONFIRMATION_SUBJECT)
            .body(confirmation_body(confirmation))
            .map_err(|e| MailError::Smtp(e.to_string()))?;
        self.transport
            .send(message)
            .await
            .map_err(|e| MailError::Smtp(e.to_string()))?;
        Ok(())
    }
}

/// Stand-in used when SMTP is not configured; logs instead of sending.
pub struct NoopMailer;

#[async_trait]
impl Mailer for NoopMailer {
    async fn send_confirmation(&self, confirmation: &RechargeConfirmation) -> Result<(), MailError> {
        info!(
            to = %confirmation.to,
            transaction_id = %confirmation.transaction_id,
            "mail transport not configured; skipping confirmation email"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> RechargeConfirmation {
        RechargeConfirmation {
            to: "asha@x.com".into(),
            mobile_number: "9876543210".into(),
            plan_name: "Monthly 299".into(),
            amount: 299.0,
            transaction_id: "TXN123456".into(),
            payment_method: "UPI".into(),
        }
    }

    #[test]
    fn body_contains_all_transaction_fields() {
        let body = confirmation_body(&sample());
        assert!(body.contains("Mobile Number  : 9876543210"));
        assert!(body.contains("Plan Name      : Monthly 299"));
        assert!(body.contains("Amount Paid    : \u{20b9}299.00"));
        assert!(body.contains("Payment Method : UPI"));
        assert!(body.contains("Transaction ID : TXN123456"));
    }

    #[test]
    fn body_formats_amount_to_two_decimals() {
        let mut c = sample();
        c.amount = 99.5;
        assert!(confirmation_body(&c).contains("\u{20b9}99.50"));
    }

    #[test]
    fn smtp_mailer_requires_host() {
        let cfg = configs::MailConfig::default();
        assert!(matches!(SmtpMailer::from_config(&cfg), Err(MailError::NotConfigured(_))));
    }
}
