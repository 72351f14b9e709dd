//! Status output for human-facing commands
//!
//! Uses `cliclack` log lines in an interactive terminal and falls back to
//! plain, prefix-tagged lines in CI so logs stay greppable. Commands that
//! emit machine-readable data (`key`, `fingerprint`) print directly instead.

mod context;
mod output;

pub use context::UiContext;
pub use output::{key_value, remark, section, step_info, step_ok, step_warn};
