pub mod error;
pub mod orchestrator;
pub mod source;

pub use error::FetchError;
pub use orchestrator::SyncOrchestrator;
pub use source::{DataSource, FaultMode};
