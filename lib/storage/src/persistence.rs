// JSON snapshot of the whole store, written via temp file + rename
use crate::error::Result;
use crate::models::{Task, User};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const SNAPSHOT_FILENAME: &str = "sprintsync.json";

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct SnapshotData {
    pub users: Vec<User>,
    pub tasks: Vec<Task>,
    pub next_user_id: i64,
    pub next_task_id: i64,
    pub timestamp: u64,
}

pub struct SnapshotFile {
    path: PathBuf,
}

impl SnapshotFile {
    pub fn new<P: AsRef<Path>>(data_dir: P) -> Self {
        Self {
            path: data_dir.as_ref().join(SNAPSHOT_FILENAME),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn load(&self) -> Result<Option<SnapshotData>> {
        if !self.path.exists() {
            return Ok(None);
        }

        let data = std::fs::read(&self.path)?;
        let snapshot: SnapshotData = serde_json::from_slice(&data)?;
        Ok(Some(snapshot))
    }

    pub fn save(&self, snapshot: &SnapshotData) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let temp_file = self.path.with_extension("tmp");
        let data = serde_json::to_vec(snapshot)?;
        std::fs::write(&temp_file, &data)?;
        std::fs::rename(&temp_file, &self.path)?;
        Ok(())
    }
}

pub(crate) fn unix_now() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}
