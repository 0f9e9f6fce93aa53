// Crate root library declaration and module exports.
pub mod cli;
pub mod color_utils;
pub mod config;
pub mod context;
pub mod controller;
pub mod error;
pub mod import;
pub mod model;
pub mod storage;
pub mod store;

pub use controller::{ImportController, ImportOutcome};
pub use error::{FormatError, ImportError, StoreError};
