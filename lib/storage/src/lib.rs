pub mod error;
pub mod manager;
pub mod models;
pub mod persistence;

pub use error::{Result, StorageError};
pub use manager::StorageManager;
pub use models::{NewTask, Task, TaskUpdate, TopUser, User, DEFAULT_STATUS};
pub use persistence::{SnapshotData, SnapshotFile, SNAPSHOT_FILENAME};
