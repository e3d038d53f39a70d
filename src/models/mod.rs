pub mod catalog;
mod orchestrator;
mod paths;
mod probe;
mod progress;
mod registry;
mod validate;

pub use catalog::ModelDescriptor;
pub use orchestrator::DownloadOrchestrator;
pub use paths::StorePaths;
pub use registry::{DownloadState, ModelRegistry};
pub use validate::{is_complete, locate_bundle};
