/*
[INPUT]:  Public API exports for taskdeck-console crate
[OUTPUT]: Module declarations and public re-exports
[POS]:    Crate root - library entry point
[UPDATE]: When adding new modules or public exports
*/

pub mod collection;
pub mod config;
pub mod form;
pub mod history;
pub mod paging;
pub mod store;

// Re-export main types for convenience
pub use collection::{MergeOutcome, TaskCollection};
pub use config::{ConfigError, ConfigOverrides, ConsoleConfig};
pub use form::{FormController, FormError, FormMode, FormPhase, SubmitOutcome, TaskField};
pub use history::{ExecutionRow, ExecutionViewer, HistorySummary};
pub use paging::Page;
pub use store::{FetchOutcome, StoreSnapshot, StoreState, TaskStore};
