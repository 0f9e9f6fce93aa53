// File: src/store.rs
//! The task store capability surface and an in-memory implementation.
use crate::error::StoreError;
use crate::model::{NewProject, NewTag, NewTask, Project, Tag, TaskUpdate};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

/// Operations the importer needs from a host that persists projects, tags and tasks.
///
/// Calls are issued strictly one after another by a single import run; implementors
/// only need to be consistent per call.
#[async_trait]
pub trait TaskStore: Send + Sync {
    async fn list_projects(&self) -> Result<Vec<Project>, StoreError>;
    async fn create_project(&self, project: NewProject) -> Result<String, StoreError>;
    async fn list_tags(&self) -> Result<Vec<Tag>, StoreError>;
    async fn create_tag(&self, tag: NewTag) -> Result<String, StoreError>;
    async fn create_task(&self, task: NewTask) -> Result<String, StoreError>;
    async fn update_task(&self, id: &str, update: TaskUpdate) -> Result<(), StoreError>;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredTask {
    pub id: String,
    pub title: String,
    pub project_id: String,
    pub tag_ids: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Full contents of a store, used to seed or inspect a `MemoryStore`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreSnapshot {
    pub projects: Vec<Project>,
    pub tags: Vec<Tag>,
    pub tasks: Vec<StoredTask>,
}

/// A mutating call received by a `MemoryStore`, in arrival order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreOp {
    CreateProject { id: String, title: String },
    CreateTag { id: String, title: String },
    CreateTask { id: String, title: String, project_id: String },
    UpdateTask { id: String, tag_ids: Vec<String> },
}

#[derive(Debug, Default)]
struct MemoryState {
    snapshot: StoreSnapshot,
    ops: Vec<StoreOp>,
    next_id: u64,
}

impl MemoryState {
    fn next_id(&mut self, prefix: &str) -> String {
        self.next_id += 1;
        format!("{}-{}", prefix, self.next_id)
    }
}

/// In-memory store. Ids are sequential (`project-1`, `tag-2`, ...) so runs are
/// reproducible.
#[derive(Debug, Default)]
pub struct MemoryStore {
    state: Mutex<MemoryState>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_snapshot(snapshot: StoreSnapshot) -> Self {
        Self {
            state: Mutex::new(MemoryState {
                snapshot,
                ops: Vec::new(),
                next_id: 0,
            }),
        }
    }

    pub async fn snapshot(&self) -> StoreSnapshot {
        self.state.lock().await.snapshot.clone()
    }

    /// Mutating calls received so far.
    pub async fn ops(&self) -> Vec<StoreOp> {
        self.state.lock().await.ops.clone()
    }

    pub async fn clear_ops(&self) {
        self.state.lock().await.ops.clear();
    }

    /// Inserts a tag directly, bypassing the op log. Useful to model host defaults.
    pub async fn seed_tag(&self, tag: Tag) {
        self.state.lock().await.snapshot.tags.push(tag);
    }

    pub async fn seed_project(&self, project: Project) {
        self.state.lock().await.snapshot.projects.push(project);
    }

    pub async fn task(&self, id: &str) -> Option<StoredTask> {
        self.state
            .lock()
            .await
            .snapshot
            .tasks
            .iter()
            .find(|t| t.id == id)
            .cloned()
    }
}

#[async_trait]
impl TaskStore for MemoryStore {
    async fn list_projects(&self) -> Result<Vec<Project>, StoreError> {
        Ok(self.state.lock().await.snapshot.projects.clone())
    }

    async fn create_project(&self, project: NewProject) -> Result<String, StoreError> {
        let mut state = self.state.lock().await;
        let id = state.next_id("project");
        state.snapshot.projects.push(Project {
            id: id.clone(),
            title: project.title.clone(),
        });
        state.ops.push(StoreOp::CreateProject {
            id: id.clone(),
            title: project.title,
        });
        Ok(id)
    }

    async fn list_tags(&self) -> Result<Vec<Tag>, StoreError> {
        Ok(self.state.lock().await.snapshot.tags.clone())
    }

    async fn create_tag(&self, tag: NewTag) -> Result<String, StoreError> {
        let mut state = self.state.lock().await;
        let id = state.next_id("tag");
        state.snapshot.tags.push(Tag {
            id: id.clone(),
            title: tag.title.clone(),
            color: tag.color,
            parent_id: None,
        });
        state.ops.push(StoreOp::CreateTag {
            id: id.clone(),
            title: tag.title,
        });
        Ok(id)
    }

    async fn create_task(&self, task: NewTask) -> Result<String, StoreError> {
        let mut state = self.state.lock().await;
        if !state
            .snapshot
            .projects
            .iter()
            .any(|p| p.id == task.project_id)
        {
            return Err(StoreError::NotFound {
                kind: "project",
                id: task.project_id,
            });
        }
        let id = state.next_id("task");
        state.ops.push(StoreOp::CreateTask {
            id: id.clone(),
            title: task.title.clone(),
            project_id: task.project_id.clone(),
        });
        state.snapshot.tasks.push(StoredTask {
            id: id.clone(),
            title: task.title,
            project_id: task.project_id,
            tag_ids: task.tag_ids,
            notes: task.notes,
        });
        Ok(id)
    }

    async fn update_task(&self, id: &str, update: TaskUpdate) -> Result<(), StoreError> {
        let mut state = self.state.lock().await;
        if let Some(missing) = update
            .tag_ids
            .iter()
            .find(|tag_id| !state.snapshot.tags.iter().any(|t| &t.id == *tag_id))
        {
            return Err(StoreError::NotFound {
                kind: "tag",
                id: missing.clone(),
            });
        }
        let task = state
            .snapshot
            .tasks
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or_else(|| StoreError::NotFound {
                kind: "task",
                id: id.to_string(),
            })?;
        task.tag_ids = update.tag_ids.clone();
        state.ops.push(StoreOp::UpdateTask {
            id: id.to_string(),
            tag_ids: update.tag_ids,
        });
        Ok(())
    }
}
