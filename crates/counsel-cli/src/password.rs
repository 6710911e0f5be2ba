use crate::{CliError, CliResult};

use std::io;

/// Environment variable consulted before prompting
pub const PASSWORD_ENV: &str = "COUNSEL_PASSWORD";

/// Password from `COUNSEL_PASSWORD`, else an interactive prompt without echo.
pub fn read_password() -> CliResult<String> {
    resolve_password(std::env::var(PASSWORD_ENV).ok(), || {
        rpassword::prompt_password("Password: ")
    })
}

pub(crate) fn resolve_password(
    from_env: Option<String>,
    prompt: impl FnOnce() -> io::Result<String>,
) -> CliResult<String> {
    match from_env.filter(|password| !password.is_empty()) {
        Some(password) => Ok(password),
        None => prompt().map_err(|e| CliError::prompt(format!("Failed to read password: {e}"))),
    }
}
