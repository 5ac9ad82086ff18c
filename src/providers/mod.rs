pub mod price_oracle;
pub mod email_sender;

pub use price_oracle::PriceOracle;
pub use email_sender::{ EmailMessage, EmailSendResult, EmailSender };
