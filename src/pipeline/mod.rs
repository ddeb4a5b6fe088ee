//! Split and merge flows over a project's clip folders.

pub mod executor;

pub use executor::{ClipDirs, PipelineExecutor, ProgressCallback, SplitOutcome};
