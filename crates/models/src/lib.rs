pub mod db;
pub mod errors;
pub mod plan;
pub mod recharge;
pub mod subscriber;
pub mod validate;
