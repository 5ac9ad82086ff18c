pub mod alert;
pub mod counter;
pub mod notification;
pub mod portfolio_snapshot;
