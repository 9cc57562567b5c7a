//! Session commands - log in, log out and show the current user
//!
//! Usage:
//! ```bash
//! rostrum login sam
//! rostrum whoami
//! rostrum logout
//! ```

use anyhow::Result;
use clap::Args;
use colored::Colorize;

use rostrum_client::AppContext;

use crate::{print_info, print_success};

/// Arguments for the login command
#[derive(Args)]
pub struct LoginArgs {
    /// User name to log in as
    user_name: String,
}

/// Log in and cache the session
pub async fn login(args: LoginArgs, ctx: &AppContext) -> Result<()> {
    let user = ctx.login(&args.user_name).await?;
    print_success(&format!("Logged in as {}", user.display_name().green()));
    Ok(())
}

/// Forget the cached session
pub async fn logout(ctx: &AppContext) -> Result<()> {
    ctx.logout().await?;
    print_success("You have successfully logged out.");
    Ok(())
}

/// Show who is logged in
pub fn whoami(ctx: &AppContext) -> Result<()> {
    match ctx.user() {
        Some(user) => {
            println!(
                "{} {}",
                user.display_name().green().bold(),
                format!("({})", user.user_name).dimmed()
            );
            if user.admin {
                println!("  {} admin", "•".cyan());
            }
        }
        None => print_info("Not logged in. Run 'rostrum login <user_name>'."),
    }
    Ok(())
}
