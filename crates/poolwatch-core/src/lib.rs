pub mod config;
pub mod db;
pub mod error;
pub mod model;
pub mod queue;

pub use config::{Credentials, Settings};
pub use db::WorkPoolStore;
pub use error::CoreError;
pub use model::{
    ClassifiedItem, ClassifiedSnapshot, ExpiryStatus, QueueSnapshot, QueueStats, RecordWarning,
    Snapshot, WorkItem, format_elapsed,
};
pub use queue::QueueWatch;
