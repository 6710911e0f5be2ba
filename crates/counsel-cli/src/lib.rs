//! counsel-cli library
//!
//! Argument definitions and command dispatch, exported for the binary and tests.

mod cli;
mod commands;
mod email_commands;
mod error;
mod execute;
pub mod logger;
mod magic_link_commands;
mod otp_commands;
mod password;


pub use cli::Cli;
pub use commands::Commands;
pub use email_commands::EmailCommands;
pub use error::{CliError, Result as CliResult};
pub use execute::{build_reconciler, execute};
pub use magic_link_commands::MagicLinkCommands;
pub use otp_commands::{OtpCommands, PurposeArg};
pub use password::{PASSWORD_ENV, read_password};
