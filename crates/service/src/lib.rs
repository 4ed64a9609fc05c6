pub mod errors;
pub mod mailer;
pub mod plan_service;
pub mod recharge_service;
pub mod subscriber_service;

#[cfg(test)]
mod test_support;
