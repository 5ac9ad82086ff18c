pub mod email_service;
pub mod metrics_service;
pub mod price_service;

pub use email_service::ResendEmailService;
pub use metrics_service::{ AlertStats, MetricsService };
pub use price_service::PriceService;
