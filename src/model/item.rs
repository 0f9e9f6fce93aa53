// File: ./src/model/item.rs
// Records produced by the CSV parser and the entity shapes exchanged with a task store.
use serde::{Deserialize, Serialize};
use strum::Display;

/// Project name used when a row leaves the `Project` cell empty.
pub const DEFAULT_PROJECT: &str = "Default";

/// One parsed CSV data row mapped to task-import fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportRecord {
    pub title: String,
    pub project: String,
    pub description: String,
    /// Free-form labels in cell order. Duplicates are kept.
    pub tags: Vec<String>,
    pub state: String,
}

impl ImportRecord {
    /// Notes attached to the created task, if the description carries any text.
    pub fn notes(&self) -> Option<&str> {
        if self.description.trim().is_empty() {
            None
        } else {
            Some(&self.description)
        }
    }

    pub fn has_state(&self) -> bool {
        !self.state.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    pub id: String,
    pub title: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    pub id: String,
    pub title: String,
    pub color: String,
    #[serde(default)]
    pub parent_id: Option<String>,
}

impl Tag {
    pub fn is_root(&self) -> bool {
        self.parent_id.is_none()
    }
}

/// Which namespace a tag title was collected from during an import.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum TagKind {
    #[strum(to_string = "state")]
    State,
    #[strum(to_string = "custom")]
    Custom,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewProject {
    pub title: String,
    pub color: String,
    pub backlog_enabled: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagTheme {
    pub primary: String,
    pub auto_contrast: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewTag {
    pub title: String,
    pub color: String,
    pub theme: TagTheme,
}

impl NewTag {
    /// Root-level tag whose theme follows its color with automatic text contrast.
    pub fn with_color(title: &str, color: String) -> Self {
        Self {
            title: title.to_string(),
            theme: TagTheme {
                primary: color.clone(),
                auto_contrast: true,
            },
            color,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewTask {
    pub title: String,
    pub project_id: String,
    pub tag_ids: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskUpdate {
    pub tag_ids: Vec<String>,
}

/// A task id returned by the store, paired with the record it was created from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatedTask {
    pub task_id: String,
    pub record: ImportRecord,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(description: &str) -> ImportRecord {
        ImportRecord {
            title: "T".to_string(),
            project: DEFAULT_PROJECT.to_string(),
            description: description.to_string(),
            tags: vec![],
            state: String::new(),
        }
    }

    #[test]
    fn test_notes_only_for_non_blank_description() {
        assert_eq!(record("").notes(), None);
        assert_eq!(record("  \n\t").notes(), None);
        assert_eq!(record(" body ").notes(), Some(" body "));
    }

    #[test]
    fn test_new_tag_theme_mirrors_color() {
        let tag = NewTag::with_color("bug", "#aabbcc".to_string());
        assert_eq!(tag.theme.primary, "#aabbcc");
        assert!(tag.theme.auto_contrast);
    }

    #[test]
    fn test_tag_kind_display() {
        assert_eq!(TagKind::State.to_string(), "state");
        assert_eq!(TagKind::Custom.to_string(), "custom");
    }
}
