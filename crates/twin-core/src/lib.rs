pub mod config;
pub mod error;
pub mod shell;
pub mod types;

pub use config::TwinConfig;
pub use error::{Result, TwinError};
pub use shell::{AppShell, ShellState};
pub use types::*;
