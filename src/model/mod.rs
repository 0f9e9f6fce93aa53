// File: ./src/model/mod.rs
pub mod item;
pub mod parser;
pub mod stats;

pub use item::{
    CreatedTask, DEFAULT_PROJECT, ImportRecord, NewProject, NewTag, NewTask, Project, Tag,
    TagKind, TagTheme, TaskUpdate,
};
pub use parser::{parse, parse_rows};
pub use stats::{ImportStats, calculate_stats};
