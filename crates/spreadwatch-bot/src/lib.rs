//! Cross-exchange candidate scanner and spread monitor.
//!
//! Two independent periodic units share only the filesystem:
//! - the scan job rewrites the Candidate Store on a fixed schedule
//! - the spread loop reads it, samples both exchanges and rewrites the
//!   Results Store every polling interval

pub mod app;
pub mod config;
pub mod error;
pub mod jobs;
pub mod scheduler;
pub mod spread_loop;

pub use app::Application;
pub use config::AppConfig;
pub use error::{AppError, AppResult};
pub use jobs::ScanJob;
pub use scheduler::{Job, Scheduler};
pub use spread_loop::{SpreadLoop, SpreadPhase};
