use counsel_session::OtpPurpose;

use clap::{Subcommand, ValueEnum};

#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum PurposeArg {
    #[default]
    Login,
    Registration,
    VerifyEmail,
}

impl From<PurposeArg> for OtpPurpose {
    fn from(arg: PurposeArg) -> Self {
        match arg {
            PurposeArg::Login => OtpPurpose::Login,
            PurposeArg::Registration => OtpPurpose::Registration,
            PurposeArg::VerifyEmail => OtpPurpose::VerifyEmail,
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum OtpCommands {
    /// Email a one-time code
    Send {
        email: String,
        #[arg(long, value_enum, default_value_t)]
        purpose: PurposeArg,
    },
    /// Email a new one-time code
    Resend {
        email: String,
        #[arg(long, value_enum, default_value_t)]
        purpose: PurposeArg,
    },
    /// Verify a one-time code and sign in
    Verify {
        email: String,
        code: String,
        #[arg(long, value_enum, default_value_t)]
        purpose: PurposeArg,
        /// Token from the password step (required for login)
        #[arg(long)]
        login_session_token: Option<String>,
    },
    /// Show remaining attempts
    Status,
}
