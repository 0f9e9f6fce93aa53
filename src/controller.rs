// File: src/controller.rs
//! Caller-facing import surface.
//! Hosts hand over raw CSV (text or bytes) or already parsed records and get back
//! the created tasks, or a structured error. All store access goes through the
//! `TaskStore` the controller was built with.
use crate::config::Config;
use crate::error::{FormatError, ImportError};
use crate::import::{DefaultInProgress, ExactOnly, Importer, TagPolicy};
use crate::model::{CreatedTask, ImportRecord, ImportStats, calculate_stats, parse};
use crate::store::TaskStore;
use std::sync::Arc;

/// Result of a completed import.
#[derive(Debug, Clone, Default)]
pub struct ImportOutcome {
    pub created: Vec<CreatedTask>,
    pub stats: ImportStats,
}

impl ImportOutcome {
    pub fn count(&self) -> usize {
        self.created.len()
    }

    pub fn is_empty(&self) -> bool {
        self.created.is_empty()
    }

    pub fn task_ids(&self) -> Vec<String> {
        self.created.iter().map(|c| c.task_id.clone()).collect()
    }
}

#[derive(Clone)]
pub struct ImportController {
    pub store: Arc<dyn TaskStore>,
    policy: Arc<dyn TagPolicy>,
    backlog_enabled: bool,
    seed: Option<u64>,
}

impl ImportController {
    pub fn new(store: Arc<dyn TaskStore>) -> Self {
        Self {
            store,
            policy: Arc::new(DefaultInProgress),
            backlog_enabled: true,
            seed: None,
        }
    }

    /// Builds a controller whose behavior follows the loaded configuration.
    pub fn from_config(store: Arc<dyn TaskStore>, config: &Config) -> Self {
        let policy: Arc<dyn TagPolicy> = if config.reuse_default_in_progress_tag {
            Arc::new(DefaultInProgress)
        } else {
            Arc::new(ExactOnly)
        };
        Self {
            store,
            policy,
            backlog_enabled: config.backlog_enabled,
            seed: None,
        }
    }

    pub fn with_policy(mut self, policy: Arc<dyn TagPolicy>) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    fn importer(&self) -> Importer {
        let importer = Importer::new(self.store.clone())
            .with_policy(self.policy.clone())
            .with_backlog(self.backlog_enabled);
        match self.seed {
            Some(seed) => importer.with_seed(seed),
            None => importer,
        }
    }

    /// Decodes UTF-8 bytes (an optional BOM is accepted) and imports them.
    pub async fn import_bytes(&self, bytes: &[u8]) -> Result<ImportOutcome, ImportError> {
        let text = std::str::from_utf8(bytes)
            .map_err(|e| FormatError::InvalidEncoding(e.to_string()))?;
        self.import_csv(text).await
    }

    /// Parses CSV text and imports the resulting records.
    ///
    /// A file with a valid header but no usable rows is not an error: it is
    /// logged and returns an empty outcome without touching the store.
    pub async fn import_csv(&self, text: &str) -> Result<ImportOutcome, ImportError> {
        let records = parse(text)?;
        if records.is_empty() {
            log::warn!("No tasks found in CSV, nothing to import");
            return Ok(ImportOutcome::default());
        }
        self.import_records(records).await
    }

    /// Imports records that were parsed earlier (for example after a preview).
    pub async fn import_records(
        &self,
        records: Vec<ImportRecord>,
    ) -> Result<ImportOutcome, ImportError> {
        let stats = calculate_stats(&records);
        let created = self.importer().import(&records).await?;
        Ok(ImportOutcome { created, stats })
    }

    pub fn stats(records: &[ImportRecord]) -> ImportStats {
        calculate_stats(records)
    }
}
