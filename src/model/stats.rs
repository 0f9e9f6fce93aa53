// File: ./src/model/stats.rs
use crate::model::item::ImportRecord;
use serde::Serialize;
use std::collections::HashSet;

/// Summary figures for a batch of parsed records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct ImportStats {
    pub total_tasks: usize,
    /// Distinct project names referenced.
    pub project_count: usize,
    /// Distinct free-form tag titles. States are not counted.
    pub tag_count: usize,
}

pub fn calculate_stats(records: &[ImportRecord]) -> ImportStats {
    let mut projects = HashSet::new();
    let mut tags = HashSet::new();

    for record in records {
        projects.insert(record.project.as_str());
        tags.extend(record.tags.iter().map(String::as_str));
    }

    ImportStats {
        total_tasks: records.len(),
        project_count: projects.len(),
        tag_count: tags.len(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(project: &str, tags: &[&str], state: &str) -> ImportRecord {
        ImportRecord {
            title: "t".to_string(),
            project: project.to_string(),
            description: String::new(),
            tags: tags.iter().map(|t| t.to_string()).collect(),
            state: state.to_string(),
        }
    }

    #[test]
    fn test_stats_example_batch() {
        let records = vec![
            record("P1", &["bug", "ui"], "Open"),
            record("P1", &[], "Open"),
        ];
        assert_eq!(
            calculate_stats(&records),
            ImportStats {
                total_tasks: 2,
                project_count: 1,
                tag_count: 2
            }
        );
    }

    #[test]
    fn test_stats_dedupes_across_records_and_ignores_state() {
        let records = vec![
            record("A", &["x", "x"], "x"),
            record("B", &["y"], "Done"),
            record("a", &["X"], ""),
        ];
        let stats = calculate_stats(&records);
        assert_eq!(stats.project_count, 3);
        assert_eq!(stats.tag_count, 3);
    }

    #[test]
    fn test_stats_empty() {
        assert_eq!(calculate_stats(&[]), ImportStats::default());
    }
}
