use crate::commands::{Commands, handle_command};
use anyhow::Context;
use clap::{CommandFactory, Parser};
use clap_complete::{ArgValueCompleter, CompletionCandidate};
use crossterm::style::Stylize;
use harborctl_api_lib::HarborClient;
use harborctl_api_lib::auth::RegistryAuth;
use harborctl_lib::config::{CliConfig, normalize_server};
use std::{fs, path::PathBuf};

mod commands;
mod jobs;

/// Server settings Harbor's `GET /configurations` can report; backs
/// shell completion for `config get --key`.
pub static CONFIG_KEYS: &[&str] = &[
    "audit_log_forward_endpoint",
    "auth_mode",
    "ldap_url",
    "notification_enable",
    "project_creation_restriction",
    "quota_per_project_enable",
    "read_only",
    "robot_name_prefix",
    "robot_token_duration",
    "scanner_skip_update_pulltime",
    "self_registration",
    "session_timeout",
    "skip_audit_log_database",
    "storage_per_project",
    "token_expiration",
];

pub fn config_key_completer(
    current: &std::ffi::OsStr,
) -> Vec<CompletionCandidate> {
    let Some(current) = current.to_str() else {
        return vec![];
    };

    CONFIG_KEYS
        .iter()
        .filter(|key| key.starts_with(current))
        .map(CompletionCandidate::new)
        .collect()
}

pub fn config_key_arg_completer() -> ArgValueCompleter {
    ArgValueCompleter::new(config_key_completer)
}

#[derive(Parser, Debug)]
#[command(
    disable_help_flag = true,
    disable_version_flag = true,
    allow_hyphen_values = true,
    ignore_errors = true
)]
struct CoreCli {
    #[command(flatten)]
    server: ServerCli,

    #[clap(trailing_var_arg = true)]
    args: Vec<String>,
}

#[derive(clap::Args, Debug)]
struct ServerCli {
    /// Harbor server URL
    #[arg(long, env = "HARBOR_URL", hide_env_values = true)]
    server: Option<String>,

    /// Username for basic authentication
    #[arg(long, env = "HARBOR_USERNAME", hide_env_values = true)]
    username: Option<String>,

    /// Password for basic authentication
    #[arg(long, env = "HARBOR_PASSWORD", hide_env_values = true)]
    password: Option<String>,

    /// Path to the harborctl config file
    #[arg(long, env = "HARBORCTL_CONFIG", hide_env_values = true)]
    config: Option<PathBuf>,
}

impl ServerCli {
    fn get_config_file(&self) -> anyhow::Result<PathBuf> {
        if let Some(file) = &self.config {
            return Ok(file.clone());
        }

        std::env::var_os("HOME")
            .map(|home| PathBuf::from(home).join(".harborctl.json"))
            .ok_or_else(|| {
                anyhow::anyhow!("No config file specified and HOME is unset")
            })
    }

    fn load_config(&self) -> anyhow::Result<CliConfig> {
        let config_file = self.get_config_file()?;

        let config: CliConfig = if config_file.exists() {
            let config_data = fs::read_to_string(&config_file)
                .with_context(|| {
                    anyhow::anyhow!("Failed to read config file")
                })?;
            serde_json::from_str(&config_data).with_context(|| {
                anyhow::anyhow!("Failed to parse config file")
            })?
        } else {
            CliConfig::default()
        };

        Ok(config)
    }
}

pub struct AppContext {
    server: Option<String>,
    username: Option<String>,
    password: Option<String>,
    pub config: CliConfig,
    pub config_file: PathBuf,
}

impl AppContext {
    /// Build the API client: explicit flags win over the stored
    /// current server.
    pub fn client(&self) -> anyhow::Result<HarborClient> {
        if let Some(server) = &self.server {
            let server = normalize_server(server);

            let auth = match (&self.username, &self.password) {
                (Some(username), Some(password)) => {
                    RegistryAuth::basic(username, password)
                }
                _ => self
                    .config
                    .auth_for(&server)
                    .cloned()
                    .unwrap_or_else(RegistryAuth::anonymous),
            };

            return Ok(HarborClient::new(server, auth));
        }

        if let Some((server, auth)) = self.config.current_server() {
            return Ok(HarborClient::new(server, auth.clone()));
        }

        anyhow::bail!(
            "{}\n\n{}",
            "No Harbor server configured, pass --server or run login".red(),
            Cli::command().render_help().ansi()
        )
    }

    pub fn store_config(&self, config: &CliConfig) -> anyhow::Result<()> {
        let raw = serde_json::to_string_pretty(config)?;
        fs::write(&self.config_file, raw).with_context(|| {
            anyhow::anyhow!("Failed to write config file")
        })
    }
}

#[derive(Parser)]
#[command(name = "harborctl")]
struct Cli {
    #[command(flatten)]
    server: ServerCli,

    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    clap_complete::CompleteEnv::with_factory(|| Cli::command()).complete();

    let core_cli = CoreCli::parse();

    let config_file = core_cli.server.get_config_file()?;
    let config = core_cli.server.load_config()?;

    let ctx = AppContext {
        server: core_cli.server.server.clone(),
        username: core_cli.server.username.clone(),
        password: core_cli.server.password.clone(),
        config,
        config_file,
    };

    let mut args = core_cli.args;
    args.insert(0, Cli::command().get_name().to_string());

    let cli = Cli::parse_from(args);

    handle_command(&cli.command, &ctx).await?;

    Ok(())
}
