//! COBOL copybook expansion driver.
//!
//! Wires the resolution engine to the outside world: configuration,
//! copybooks on disk, logging and the `cblc` command line.

pub mod analysis;
pub mod commands;
pub mod config;
pub mod fs_provider;
mod tracing_setup;

pub use analysis::{AnalysisFragment, Analyzer};
pub use config::{AnalysisConfig, ConfigError, ConfigStore, Settings};
pub use fs_provider::{FileSystemCopybooks, COPYBOOK_EXTENSIONS};
pub use tracing_setup::init_tracing;
