use crate::{
    CliResult, Commands, EmailCommands, MagicLinkCommands, OtpCommands, read_password,
};

use counsel_config::Config;
use counsel_session::{
    FileStore, LoginCredentials, RegisterData, SessionPolicy, SessionReconciler, VerifyOtpRequest,
};

use std::sync::Arc;

use log::debug;
use serde_json::{Value, json};

/// Reconciler backed by the file store under the config directory.
///
/// `server` overrides `api.base_url`.
pub fn build_reconciler(config: &Config, server: Option<&str>) -> CliResult<SessionReconciler> {
    let storage_path = config.storage_path()?;
    debug!("Opening session store at {}", storage_path.display());
    let store = FileStore::open(storage_path)?;

    let base_url = server.unwrap_or(&config.api.base_url);
    let reconciler = SessionReconciler::http(
        base_url,
        config.api.timeout(),
        Arc::new(store),
        SessionPolicy::from(&config.session),
    )?;

    Ok(reconciler)
}

/// Run one command and return its JSON result.
pub async fn execute(command: Commands, reconciler: &SessionReconciler) -> CliResult<Value> {
    let value = match command {
        Commands::Login { username } => {
            let password = read_password()?;
            let outcome = reconciler
                .login(&LoginCredentials::new(username, password))
                .await?;
            serde_json::to_value(outcome)?
        }
        Commands::Logout => {
            reconciler.logout().await;
            json!({ "success": true })
        }
        Commands::Whoami => serde_json::to_value(reconciler.get_current_user().await)?,
        Commands::Cached => serde_json::to_value(reconciler.get_cached_user())?,
        Commands::Status => serde_json::to_value(reconciler.status())?,

        Commands::Register {
            email,
            password,
            first_name,
            last_name,
            username,
            phone,
            lawyer,
        } => {
            let data = RegisterData {
                email,
                password,
                first_name,
                last_name,
                is_seller: lawyer,
                username,
                phone,
                role: lawyer.then(|| "lawyer".to_string()),
                ..RegisterData::default()
            };
            reconciler.register(&data).await?;
            json!({ "success": true })
        }
        Commands::CheckAvailability { field, value } => {
            serde_json::to_value(reconciler.check_availability(field, &value).await?)?
        }

        Commands::Otp { action } => match action {
            OtpCommands::Send { email, purpose } => {
                serde_json::to_value(reconciler.send_otp(&email, purpose.into()).await?)?
            }
            OtpCommands::Resend { email, purpose } => {
                serde_json::to_value(reconciler.resend_otp(&email, purpose.into()).await?)?
            }
            OtpCommands::Verify {
                email,
                code,
                purpose,
                login_session_token,
            } => {
                let request = VerifyOtpRequest {
                    email,
                    otp: code,
                    purpose: purpose.into(),
                    login_session_token,
                };
                serde_json::to_value(reconciler.verify_otp(&request).await?)?
            }
            OtpCommands::Status => serde_json::to_value(reconciler.check_otp_status().await?)?,
        },

        Commands::MagicLink { action } => match action {
            MagicLinkCommands::Send { email } => {
                serde_json::to_value(reconciler.send_magic_link(&email).await?)?
            }
            MagicLinkCommands::Verify { token } => {
                serde_json::to_value(reconciler.verify_magic_link(&token).await?)?
            }
        },

        Commands::Email { action } => match action {
            EmailCommands::Send => {
                serde_json::to_value(reconciler.send_verification_email().await?)?
            }
            EmailCommands::Resend => {
                serde_json::to_value(reconciler.resend_verification_email().await?)?
            }
            EmailCommands::Verify { token } => {
                serde_json::to_value(reconciler.verify_email(&token).await?)?
            }
            EmailCommands::Request { email } => {
                serde_json::to_value(reconciler.request_verification_email(&email).await)?
            }
        },
    };

    Ok(value)
}
