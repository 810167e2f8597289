use anyhow::Result;
use clap::Parser;
use crossterm::style::Stylize;
use harborctl_api_lib::auth::RegistryAuth;
use harborctl_api_lib::health::get_health;
use harborctl_api_lib::HarborClient;
use harborctl_lib::config::normalize_server;

use crate::AppContext;

/// Log in to a Harbor server and store the credentials
#[derive(Parser, Debug, Clone)]
pub struct LoginArgs {
    /// Server URL, e.g. https://harbor.example.com
    pub server: String,

    #[arg(short, long)]
    pub username: String,

    #[arg(short, long)]
    pub password: String,
}

pub async fn handle_login(
    args: &LoginArgs,
    ctx: &AppContext,
) -> Result<()> {
    let server = normalize_server(&args.server);
    let auth = RegistryAuth::basic(&args.username, &args.password);

    let client = HarborClient::new(&server, auth.clone());
    let health = get_health(&client).await?;

    if !health.healthy() {
        println!(
            "{} {} reports status '{}'",
            "⚠".yellow(),
            server,
            health.status
        );
    }

    let mut config = ctx.config.clone();
    config.add_server(&server, auth);
    ctx.store_config(&config)?;

    println!("{} Logged in to {}", "✓".green(), server.as_str().cyan());

    Ok(())
}
