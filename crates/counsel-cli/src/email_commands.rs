use clap::Subcommand;

#[derive(Subcommand, Debug)]
pub enum EmailCommands {
    /// Send a verification link to the signed-in user
    Send,
    /// Send the verification link again
    Resend,
    /// Confirm the address with the token from a link
    Verify { token: String },
    /// Ask for a verification link without signing in
    Request { email: String },
}
