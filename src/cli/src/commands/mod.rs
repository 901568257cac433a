//! Commands for the scenario runner.

pub mod init;
pub mod run;
pub mod supports;
pub mod tokens;
