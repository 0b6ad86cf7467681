use crate::error::{Result, StorageError};
use crate::models::{NewTask, Task, TaskUpdate, TopUser, User};
use crate::persistence::{unix_now, SnapshotData, SnapshotFile};
use chrono::Utc;
use parking_lot::RwLock;
use sprintsync_core::{AssignmentOutcome, Candidate, Vector};
use std::collections::{BTreeMap, HashMap};
use std::path::Path;
use tracing::info;

#[derive(Debug)]
struct State {
    users: BTreeMap<i64, User>,
    tasks: BTreeMap<i64, Task>,
    next_user_id: i64,
    next_task_id: i64,
}

impl Default for State {
    fn default() -> Self {
        Self {
            users: BTreeMap::new(),
            tasks: BTreeMap::new(),
            next_user_id: 1,
            next_task_id: 1,
        }
    }
}

/// Manages users and tasks, with optional snapshot persistence
pub struct StorageManager {
    state: RwLock<State>,
    snapshot: Option<SnapshotFile>,
}

impl Default for StorageManager {
    fn default() -> Self {
        Self::in_memory()
    }
}

impl StorageManager {
    /// A store that lives only as long as the process
    pub fn in_memory() -> Self {
        Self {
            state: RwLock::new(State::default()),
            snapshot: None,
        }
    }

    /// Open a store backed by a snapshot file in `data_dir`, loading it if present
    pub fn open<P: AsRef<Path>>(data_dir: P) -> Result<Self> {
        std::fs::create_dir_all(data_dir.as_ref())?;
        let snapshot = SnapshotFile::new(data_dir);

        let mut state = State::default();
        if let Some(data) = snapshot.load()? {
            state.users = data.users.into_iter().map(|u| (u.id, u)).collect();
            state.tasks = data.tasks.into_iter().map(|t| (t.id, t)).collect();
            state.next_user_id = data
                .next_user_id
                .max(state.users.keys().next_back().map_or(1, |id| id + 1));
            state.next_task_id = data
                .next_task_id
                .max(state.tasks.keys().next_back().map_or(1, |id| id + 1));
            info!(
                users = state.users.len(),
                tasks = state.tasks.len(),
                path = %snapshot.path().display(),
                "snapshot loaded"
            );
        }

        Ok(Self {
            state: RwLock::new(state),
            snapshot: Some(snapshot),
        })
    }

    /// Write the snapshot file. No-op for in-memory stores.
    pub fn save(&self) -> Result<()> {
        let Some(snapshot) = &self.snapshot else {
            return Ok(());
        };

        let data = {
            let state = self.state.read();
            SnapshotData {
                users: state.users.values().cloned().collect(),
                tasks: state.tasks.values().cloned().collect(),
                next_user_id: state.next_user_id,
                next_task_id: state.next_task_id,
                timestamp: unix_now(),
            }
        };

        snapshot.save(&data)?;
        info!(path = %snapshot.path().display(), "snapshot saved");
        Ok(())
    }

    // ==================== Users ====================

    pub fn create_user(&self, email: &str, resume: Option<(String, Vector)>) -> Result<User> {
        let mut state = self.state.write();

        if email_in_use(&state, email) {
            return Err(StorageError::EmailTaken(email.to_string()));
        }

        let id = state.next_user_id;
        state.next_user_id += 1;

        let (resume_text, resume_embedding) = match resume {
            Some((text, embedding)) => (Some(text), Some(embedding)),
            None => (None, None),
        };

        let user = User {
            id,
            email: email.to_string(),
            is_admin: false,
            created_at: Utc::now(),
            resume_text,
            resume_embedding,
        };
        state.users.insert(id, user.clone());
        Ok(user)
    }

    /// Whether a user already registered `email`. `create_user` checks again
    /// under the write lock.
    pub fn email_taken(&self, email: &str) -> bool {
        email_in_use(&self.state.read(), email)
    }

    pub fn get_user(&self, id: i64) -> Option<User> {
        self.state.read().users.get(&id).cloned()
    }

    pub fn set_resume(&self, id: i64, text: String, embedding: Vector) -> Result<User> {
        let mut state = self.state.write();
        let user = state.users.get_mut(&id).ok_or(StorageError::UserNotFound(id))?;
        user.resume_text = Some(text);
        user.resume_embedding = Some(embedding);
        Ok(user.clone())
    }

    /// Users with a resume embedding, in ascending id order
    pub fn candidates(&self) -> Vec<Candidate> {
        self.state
            .read()
            .users
            .values()
            .filter_map(|u| {
                u.resume_embedding
                    .as_ref()
                    .map(|e| Candidate::new(u.id, e.clone()))
            })
            .collect()
    }

    #[inline]
    #[must_use]
    pub fn user_count(&self) -> usize {
        self.state.read().users.len()
    }

    // ==================== Tasks ====================

    pub fn insert_task(&self, owner: i64, task: NewTask, assignment: AssignmentOutcome) -> Task {
        let mut state = self.state.write();
        let id = state.next_task_id;
        state.next_task_id += 1;

        let task = Task {
            id,
            title: task.title,
            description: task.description,
            status: task.status,
            total_minutes: task.total_minutes,
            user_id: owner,
            assignment,
            created_at: Utc::now(),
        };
        state.tasks.insert(id, task.clone());
        task
    }

    /// Tasks owned by `owner`, oldest first
    pub fn tasks_for(&self, owner: i64) -> Vec<Task> {
        self.state
            .read()
            .tasks
            .values()
            .filter(|t| t.user_id == owner)
            .cloned()
            .collect()
    }

    pub fn get_task(&self, owner: i64, id: i64) -> Result<Task> {
        self.state
            .read()
            .tasks
            .get(&id)
            .filter(|t| t.user_id == owner)
            .cloned()
            .ok_or(StorageError::TaskNotFound(id))
    }

    pub fn update_task(&self, owner: i64, id: i64, update: TaskUpdate) -> Result<Task> {
        self.modify_task(owner, id, |task| {
            if let Some(title) = update.title {
                task.title = title;
            }
            if let Some(description) = update.description {
                task.description = Some(description);
            }
            if let Some(total_minutes) = update.total_minutes {
                task.total_minutes = total_minutes;
            }
        })
    }

    pub fn update_status(&self, owner: i64, id: i64, status: String) -> Result<Task> {
        self.modify_task(owner, id, |task| task.status = status)
    }

    pub fn delete_task(&self, owner: i64, id: i64) -> Result<()> {
        let mut state = self.state.write();
        match state.tasks.get(&id) {
            Some(task) if task.user_id == owner => {
                state.tasks.remove(&id);
                Ok(())
            }
            _ => Err(StorageError::TaskNotFound(id)),
        }
    }

    fn modify_task(&self, owner: i64, id: i64, f: impl FnOnce(&mut Task)) -> Result<Task> {
        let mut state = self.state.write();
        let task = state
            .tasks
            .get_mut(&id)
            .filter(|t| t.user_id == owner)
            .ok_or(StorageError::TaskNotFound(id))?;
        f(task);
        Ok(task.clone())
    }

    // ==================== Stats ====================

    /// Users ranked by total minutes of the tasks assigned to them
    pub fn top_users(&self, limit: usize) -> Vec<TopUser> {
        let state = self.state.read();

        let mut minutes: HashMap<i64, i64> = HashMap::new();
        for task in state.tasks.values() {
            if let Some(assignee) = task.assigned_user_id() {
                let total = minutes.entry(assignee).or_insert(0);
                *total = total.saturating_add(task.total_minutes);
            }
        }

        let mut ranked: Vec<TopUser> = minutes
            .into_iter()
            .filter_map(|(user_id, total_minutes)| {
                state.users.get(&user_id).map(|u| TopUser {
                    user_id,
                    email: u.email.clone(),
                    total_minutes,
                })
            })
            .collect();

        ranked.sort_by(|a, b| {
            b.total_minutes
                .cmp(&a.total_minutes)
                .then(a.user_id.cmp(&b.user_id))
        });
        ranked.truncate(limit);
        ranked
    }
}

fn email_in_use(state: &State, email: &str) -> bool {
    state.users.values().any(|u| u.email == email)
}
