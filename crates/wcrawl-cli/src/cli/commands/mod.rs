//! CLI command handlers, one file per command.

mod checksum;
mod completions;
mod fetch;
mod run;
mod scan;

pub use checksum::run_checksum;
pub use completions::run_completions;
pub use fetch::run_fetch;
pub use run::run_pipeline;
pub use scan::run_scan;
