pub mod entity;

mod alert_repository;
pub use alert_repository::{ AlertRepository, SeaOrmAlertRepository };

mod snapshot_repository;
pub use snapshot_repository::{ SeaOrmSnapshotRepository, SnapshotRepository };

mod notification_repository;
pub use notification_repository::{ NotificationRepository, SeaOrmNotificationRepository };

mod counters_store;
pub use counters_store::{ CountersStore, SeaOrmCountersStore };
