// mod.rs - External alignment tools and MSA orchestration

pub mod external;
pub mod runner;
pub mod traits;

pub use external::ExternalMsaTool;
pub use runner::{default_jobs, JobOutcome, MsaJob, MsaRunner};
pub use traits::{MsaTool, ToolError};
