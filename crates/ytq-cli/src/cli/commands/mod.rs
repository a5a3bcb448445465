//! CLI command handlers. Each command is in its own file.

mod add;
mod cancel;
mod completions;
mod remove;
mod retry;
mod run;
mod show;
mod status;

pub use add::run_add;
pub use cancel::run_cancel;
pub use completions::{print_completions, print_man};
pub use remove::run_remove;
pub use retry::run_retry;
pub use run::run_downloads;
pub use show::run_show;
pub use status::run_status;
