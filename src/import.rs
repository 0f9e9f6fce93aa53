// File: src/import.rs
//! Reconciles parsed records against a `TaskStore`.
//!
//! The store handles project, task and tag calls independently with no
//! transaction spanning them, so an import runs in fixed phases:
//! 1. group records by project and collect state and tag titles,
//! 2. resolve or create every project,
//! 3. create every task with no tags,
//! 4. resolve or create every tag, then attach tag ids to the tasks.
//!
//! Every project exists before a task references it and every tag exists before
//! a task is tagged. A store failure aborts the run as-is; tasks created before
//! the failure stay in the store without their tags.
use crate::color_utils;
use crate::error::StoreError;
use crate::model::{
    CreatedTask, ImportRecord, NewProject, NewTag, NewTask, Project, Tag, TagKind, TaskUpdate,
};
use crate::store::TaskStore;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

/// Hook deciding whether a tag title with no exact root match should reuse
/// another existing tag instead of creating a new one.
pub trait TagPolicy: Send + Sync + std::fmt::Debug {
    fn fallback_match<'a>(&self, kind: TagKind, name: &str, existing: &'a [Tag])
    -> Option<&'a Tag>;
}

/// Only exact, case-sensitive title matches are reused.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExactOnly;

impl TagPolicy for ExactOnly {
    fn fallback_match<'a>(&self, _: TagKind, _: &str, _: &'a [Tag]) -> Option<&'a Tag> {
        None
    }
}

/// Hosts seed a root "In Progress" tag whose casing may differ from the tracker's
/// workflow state. A state named "in progress" in any casing reuses it.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultInProgress;

const IN_PROGRESS: &str = "in progress";

impl TagPolicy for DefaultInProgress {
    fn fallback_match<'a>(
        &self,
        kind: TagKind,
        name: &str,
        existing: &'a [Tag],
    ) -> Option<&'a Tag> {
        if kind != TagKind::State || !name.eq_ignore_ascii_case(IN_PROGRESS) {
            return None;
        }
        existing
            .iter()
            .find(|t| t.is_root() && t.title.eq_ignore_ascii_case(IN_PROGRESS))
    }
}

/// Records grouped by project in order of first appearance, plus the distinct
/// state and tag titles (also in order of first appearance).
#[derive(Debug, Default, PartialEq, Eq)]
pub struct ImportPlan<'a> {
    pub groups: Vec<(&'a str, Vec<&'a ImportRecord>)>,
    pub states: Vec<&'a str>,
    pub tags: Vec<&'a str>,
}

impl<'a> ImportPlan<'a> {
    pub fn build(records: &'a [ImportRecord]) -> Self {
        let mut plan = ImportPlan::default();
        let mut group_index: HashMap<&str, usize> = HashMap::new();
        let mut seen_states = HashSet::new();
        let mut seen_tags = HashSet::new();

        for record in records {
            let project = record.project.as_str();
            let idx = *group_index.entry(project).or_insert_with(|| {
                plan.groups.push((project, Vec::new()));
                plan.groups.len() - 1
            });
            plan.groups[idx].1.push(record);

            if record.has_state() && seen_states.insert(record.state.as_str()) {
                plan.states.push(record.state.as_str());
            }
            for tag in &record.tags {
                if seen_tags.insert(tag.as_str()) {
                    plan.tags.push(tag.as_str());
                }
            }
        }

        plan
    }

    pub fn project_names(&self) -> impl Iterator<Item = &'a str> + '_ {
        self.groups.iter().map(|(name, _)| *name)
    }
}

pub struct Importer {
    store: Arc<dyn TaskStore>,
    policy: Arc<dyn TagPolicy>,
    backlog_enabled: bool,
    rng: std::sync::Mutex<fastrand::Rng>,
}

impl Importer {
    pub fn new(store: Arc<dyn TaskStore>) -> Self {
        Self {
            store,
            policy: Arc::new(DefaultInProgress),
            backlog_enabled: true,
            rng: std::sync::Mutex::new(fastrand::Rng::new()),
        }
    }

    pub fn with_policy(mut self, policy: Arc<dyn TagPolicy>) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_backlog(mut self, enabled: bool) -> Self {
        self.backlog_enabled = enabled;
        self
    }

    /// Fixes the color generator seed so created colors are reproducible.
    pub fn with_seed(self, seed: u64) -> Self {
        Self {
            rng: std::sync::Mutex::new(fastrand::Rng::with_seed(seed)),
            ..self
        }
    }

    fn next_color(&self) -> String {
        match self.rng.lock() {
            Ok(mut rng) => color_utils::random_color_with(&mut rng),
            Err(_) => color_utils::random_color(),
        }
    }

    /// Imports the records and returns the created task ids in creation order.
    pub async fn import(&self, records: &[ImportRecord]) -> Result<Vec<CreatedTask>, StoreError> {
        let plan = ImportPlan::build(records);
        log::info!(
            "Importing {} record(s) into {} project(s)",
            records.len(),
            plan.groups.len()
        );

        let projects = self.resolve_projects(plan.project_names()).await?;

        let mut created = Vec::with_capacity(records.len());
        for (project_name, group) in &plan.groups {
            let project = projects.get(*project_name).ok_or_else(|| StoreError::NotFound {
                kind: "project",
                id: project_name.to_string(),
            })?;
            for record in group {
                let task = NewTask {
                    title: record.title.clone(),
                    project_id: project.id.clone(),
                    tag_ids: Vec::new(),
                    notes: record.notes().map(str::to_string),
                };
                let task_id = self.store.create_task(task).await?;
                log::debug!("Created task {} ({})", task_id, record.title);
                created.push(CreatedTask {
                    task_id,
                    record: (*record).clone(),
                });
            }
        }

        let state_tags = self
            .resolve_tags(plan.states.iter().copied(), TagKind::State)
            .await?;
        let custom_tags = self
            .resolve_tags(plan.tags.iter().copied(), TagKind::Custom)
            .await?;

        let mut tagged = 0;
        for task in &created {
            let tag_ids = tag_ids_for(&task.record, &state_tags, &custom_tags);
            if tag_ids.is_empty() {
                continue;
            }
            self.store
                .update_task(&task.task_id, TaskUpdate { tag_ids })
                .await?;
            tagged += 1;
        }

        log::info!("Imported {} task(s), {} tagged", created.len(), tagged);
        Ok(created)
    }

    /// Maps each project name to an existing project with the same title, creating
    /// the missing ones. Each name is created at most once.
    pub async fn resolve_projects<'n>(
        &self,
        names: impl IntoIterator<Item = &'n str>,
    ) -> Result<HashMap<String, Project>, StoreError> {
        let mut known = self.store.list_projects().await?;
        let mut resolved = HashMap::new();

        for name in names {
            if resolved.contains_key(name) {
                continue;
            }
            let project = match known.iter().find(|p| p.title == name) {
                Some(existing) => existing.clone(),
                None => {
                    let id = self
                        .store
                        .create_project(NewProject {
                            title: name.to_string(),
                            color: self.next_color(),
                            backlog_enabled: self.backlog_enabled,
                        })
                        .await?;
                    log::info!("Created project '{}'", name);
                    let project = Project {
                        id,
                        title: name.to_string(),
                    };
                    known.push(project.clone());
                    project
                }
            };
            resolved.insert(name.to_string(), project);
        }

        Ok(resolved)
    }

    /// Maps each tag title to the id of an existing root tag with that exact
    /// title, or of a newly created root tag. No store call is made for an empty
    /// input; otherwise the tag listing is fetched once.
    pub async fn resolve_tags<'n>(
        &self,
        names: impl IntoIterator<Item = &'n str>,
        kind: TagKind,
    ) -> Result<HashMap<String, String>, StoreError> {
        let mut names = names.into_iter().peekable();
        if names.peek().is_none() {
            return Ok(HashMap::new());
        }

        let existing = self.store.list_tags().await?;
        let mut resolved = HashMap::new();

        for name in names {
            if resolved.contains_key(name) {
                continue;
            }
            let reused = existing
                .iter()
                .find(|t| t.is_root() && t.title == name)
                .or_else(|| self.policy.fallback_match(kind, name, &existing));

            let id = match reused {
                Some(tag) => tag.id.clone(),
                None => {
                    let id = self
                        .store
                        .create_tag(NewTag::with_color(name, self.next_color()))
                        .await?;
                    log::info!("Created {} tag '{}'", kind, name);
                    id
                }
            };
            resolved.insert(name.to_string(), id);
        }

        Ok(resolved)
    }
}

/// The state tag (if any) followed by the record's tags in order. Names with
/// no mapping are skipped.
fn tag_ids_for(
    record: &ImportRecord,
    state_tags: &HashMap<String, String>,
    custom_tags: &HashMap<String, String>,
) -> Vec<String> {
    let state = record
        .has_state()
        .then(|| state_tags.get(&record.state))
        .flatten();

    state
        .into_iter()
        .chain(record.tags.iter().filter_map(|t| custom_tags.get(t)))
        .cloned()
        .collect()
}
