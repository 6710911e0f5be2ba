use clap::Subcommand;

#[derive(Subcommand, Debug)]
pub enum MagicLinkCommands {
    /// Email a sign-in link
    Send { email: String },
    /// Sign in with the token from a link
    Verify { token: String },
}
