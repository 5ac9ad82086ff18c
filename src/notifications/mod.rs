pub mod dispatcher;
pub mod templates;

pub use dispatcher::{ DispatchReport, NotificationDispatcher };
