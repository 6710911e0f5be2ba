use crate::{
    email_commands::EmailCommands, magic_link_commands::MagicLinkCommands,
    otp_commands::OtpCommands,
};

use counsel_session::AvailabilityField;

use clap::Subcommand;

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Sign in with username (or email); the password comes from
    /// COUNSEL_PASSWORD or a prompt
    Login { username: String },

    /// Sign out and clear every local trace of the session
    Logout,

    /// Verify the session with the server and print the current user
    Whoami,

    /// Print the cached user without contacting the server
    Cached,

    /// Print local session state
    Status,

    /// Create an account (does not sign in)
    Register {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
        #[arg(long)]
        first_name: String,
        #[arg(long)]
        last_name: String,
        #[arg(long)]
        username: Option<String>,
        #[arg(long)]
        phone: Option<String>,
        /// Register as a lawyer
        #[arg(long)]
        lawyer: bool,
    },

    /// Check whether an email, username or phone number is free
    CheckAvailability {
        /// email | username | phone
        field: AvailabilityField,
        value: String,
    },

    /// One-time code operations
    Otp {
        #[command(subcommand)]
        action: OtpCommands,
    },

    /// Passwordless sign-in links
    MagicLink {
        #[command(subcommand)]
        action: MagicLinkCommands,
    },

    /// Email address verification
    Email {
        #[command(subcommand)]
        action: EmailCommands,
    },
}
