// Manages the local JSON file that backs the command-line store.
//
// ⚠️ VERSION BUMP REQUIRED:
// Changes to the serialized shapes below (Project, Tag, LocalTask) require
// incrementing LOCAL_STORAGE_VERSION to keep older files readable.
use crate::context::AppContext;
use crate::error::StoreError;
use crate::model::{NewProject, NewTag, NewTask, Project, Tag, TaskUpdate};
use crate::store::{StoreSnapshot, StoredTask, TaskStore};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use fs2::FileExt;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

// Version history:
// - v1: projects, root tags and tasks with creation timestamps
const LOCAL_STORAGE_VERSION: u32 = 1;

#[derive(Debug, Clone, Serialize, Deserialize)]
struct LocalProject {
    id: String,
    title: String,
    color: String,
    #[serde(default)]
    backlog_enabled: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct LocalTask {
    id: String,
    title: String,
    project_id: String,
    #[serde(default)]
    tag_ids: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    notes: Option<String>,
    created: DateTime<Utc>,
}

/// Wrapper struct for versioned local storage
#[derive(Debug, Default, Serialize, Deserialize)]
struct LocalStorageData {
    #[serde(default)]
    version: u32,
    #[serde(default)]
    projects: Vec<LocalProject>,
    #[serde(default)]
    tags: Vec<Tag>,
    #[serde(default)]
    tasks: Vec<LocalTask>,
}

#[derive(Debug, Clone)]
pub struct LocalStorage {
    path: PathBuf,
}

impl LocalStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Opens the store at the context's default location.
    pub fn open(ctx: &dyn AppContext) -> anyhow::Result<Self> {
        Ok(Self::new(ctx.get_store_path()?))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Helper to get a sidecar lock file path
    fn get_lock_path(file_path: &Path) -> PathBuf {
        let mut lock_path = file_path.to_path_buf();
        if let Some(ext) = lock_path.extension() {
            let mut new_ext = ext.to_os_string();
            new_ext.push(".lock");
            lock_path.set_extension(new_ext);
        } else {
            lock_path.set_extension("lock");
        }
        lock_path
    }

    /// Runs `f` while holding an exclusive lock on the sidecar lock file.
    pub fn with_lock<F, T>(file_path: &Path, f: F) -> Result<T, StoreError>
    where
        F: FnOnce() -> Result<T, StoreError>,
    {
        if let Some(parent) = file_path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }
        let lock_path = Self::get_lock_path(file_path);
        let file = fs::OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(&lock_path)?;

        file.lock_exclusive()?;
        let result = f();
        FileExt::unlock(&file)?;
        result
    }

    /// Atomic write: Write to .tmp file then rename
    pub fn atomic_write<P: AsRef<Path>, C: AsRef<[u8]>>(
        path: P,
        contents: C,
    ) -> Result<(), StoreError> {
        let path = path.as_ref();
        let tmp_path = path.with_extension("tmp");
        fs::write(&tmp_path, contents)?;
        fs::rename(tmp_path, path)?;
        Ok(())
    }

    /// Reads the store file without locking. A missing file is an empty store.
    fn read_unlocked(&self) -> Result<LocalStorageData, StoreError> {
        if !self.path.exists() {
            return Ok(LocalStorageData {
                version: LOCAL_STORAGE_VERSION,
                ..Default::default()
            });
        }
        let json = fs::read_to_string(&self.path)?;
        let data: LocalStorageData =
            serde_json::from_str(&json).map_err(|e| StoreError::Corrupt {
                path: self.path.display().to_string(),
                reason: e.to_string(),
            })?;
        if data.version > LOCAL_STORAGE_VERSION {
            return Err(StoreError::Corrupt {
                path: self.path.display().to_string(),
                reason: format!(
                    "written by a newer version (v{}, supported v{})",
                    data.version, LOCAL_STORAGE_VERSION
                ),
            });
        }
        Ok(data)
    }

    fn read(&self) -> Result<LocalStorageData, StoreError> {
        Self::with_lock(&self.path, || self.read_unlocked())
    }

    /// Load, mutate and save under one lock. Nothing is written if `f` fails.
    fn modify<F, T>(&self, f: F) -> Result<T, StoreError>
    where
        F: FnOnce(&mut LocalStorageData) -> Result<T, StoreError>,
    {
        Self::with_lock(&self.path, || {
            let mut data = self.read_unlocked()?;
            let out = f(&mut data)?;
            data.version = LOCAL_STORAGE_VERSION;
            let json = serde_json::to_string_pretty(&data)?;
            Self::atomic_write(&self.path, json)?;
            Ok(out)
        })
    }

    /// Copies the whole store, e.g. to seed a dry run.
    pub fn snapshot(&self) -> Result<StoreSnapshot, StoreError> {
        let data = self.read()?;
        Ok(StoreSnapshot {
            projects: data
                .projects
                .into_iter()
                .map(|p| Project {
                    id: p.id,
                    title: p.title,
                })
                .collect(),
            tags: data.tags,
            tasks: data
                .tasks
                .into_iter()
                .map(|t| StoredTask {
                    id: t.id,
                    title: t.title,
                    project_id: t.project_id,
                    tag_ids: t.tag_ids,
                    notes: t.notes,
                })
                .collect(),
        })
    }

    fn new_id() -> String {
        uuid::Uuid::new_v4().to_string()
    }
}

#[async_trait]
impl TaskStore for LocalStorage {
    async fn list_projects(&self) -> Result<Vec<Project>, StoreError> {
        Ok(self.snapshot()?.projects)
    }

    async fn create_project(&self, project: NewProject) -> Result<String, StoreError> {
        self.modify(|data| {
            let id = Self::new_id();
            data.projects.push(LocalProject {
                id: id.clone(),
                title: project.title,
                color: project.color,
                backlog_enabled: project.backlog_enabled,
            });
            Ok(id)
        })
    }

    async fn list_tags(&self) -> Result<Vec<Tag>, StoreError> {
        Ok(self.read()?.tags)
    }

    async fn create_tag(&self, tag: NewTag) -> Result<String, StoreError> {
        self.modify(|data| {
            let id = Self::new_id();
            data.tags.push(Tag {
                id: id.clone(),
                title: tag.title,
                color: tag.color,
                parent_id: None,
            });
            Ok(id)
        })
    }

    async fn create_task(&self, task: NewTask) -> Result<String, StoreError> {
        self.modify(|data| {
            if !data.projects.iter().any(|p| p.id == task.project_id) {
                return Err(StoreError::NotFound {
                    kind: "project",
                    id: task.project_id,
                });
            }
            let id = Self::new_id();
            data.tasks.push(LocalTask {
                id: id.clone(),
                title: task.title,
                project_id: task.project_id,
                tag_ids: task.tag_ids,
                notes: task.notes,
                created: Utc::now(),
            });
            Ok(id)
        })
    }

    async fn update_task(&self, id: &str, update: TaskUpdate) -> Result<(), StoreError> {
        self.modify(|data| {
            let task = data
                .tasks
                .iter_mut()
                .find(|t| t.id == id)
                .ok_or_else(|| StoreError::NotFound {
                    kind: "task",
                    id: id.to_string(),
                })?;
            task.tag_ids = update.tag_ids;
            Ok(())
        })
    }
}
