pub mod enrichment;
pub mod errors;
pub mod local;
pub mod task_runner;

pub use errors::AppError;
pub use local::{AddOpts, AppLocal};
