//! CLI entry and dispatch.

use anyhow::{Context, Result};
use clap::Parser;
use till_core::config;
use till_core::logging::{self, LogOptions};

mod commands;

#[derive(Parser)]
#[command(name = "till")]
#[command(version)]
#[command(about = "Point-of-sale login from the terminal")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Auth API base URL (overrides config)
    #[arg(long, global = true, value_name = "URL", env = "TILL_AUTH_URL")]
    auth_url: Option<String>,

    /// Mirror logs to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Print the final login screen state as JSON
    #[arg(long, global = true)]
    json: bool,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Sign in through the admin or manager panel
    Login {
        #[command(subcommand)]
        command: LoginCommands,
    },
    /// Recover a forgotten admin password
    Password {
        #[command(subcommand)]
        command: PasswordCommands,
    },
    /// Manage configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(clap::Subcommand)]
enum LoginCommands {
    /// Email and password login
    Admin {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    /// Four-digit PIN login
    Manager {
        #[arg(long, value_name = "DIGITS")]
        pin: String,
    },
}

#[derive(clap::Subcommand)]
enum PasswordCommands {
    /// Send a verification code to the account email
    Forgot {
        #[arg(long)]
        email: String,
    },
    /// Verify the emailed code and set a new password
    Reset {
        #[arg(long)]
        email: String,
        /// Five-digit verification code
        #[arg(long, value_name = "DIGITS")]
        otp: String,
        /// New password
        #[arg(long)]
        password: String,
        /// New password, again
        #[arg(long)]
        confirm: String,
    },
}

#[derive(clap::Subcommand)]
enum ConfigCommands {
    /// Show the path to the config file
    Path,
    /// Initialize a default config file (if not present)
    Init,
    /// Generate a fresh config from Rust defaults (for xtask)
    Generate,
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();

    let _log_guard = logging::init(&LogOptions {
        stderr: cli.verbose,
        dir: Some(config::paths::logs_dir()),
    })?;

    // one tokio runtime for everything
    let rt = tokio::runtime::Runtime::new().context("create tokio runtime")?;

    rt.block_on(async move { dispatch(cli).await })
}

async fn dispatch(cli: Cli) -> Result<()> {
    let Cli {
        command,
        auth_url,
        verbose: _,
        json,
    } = cli;

    let session = || -> Result<commands::Session> {
        let config = config::Config::load().context("load config")?;
        commands::Session::new(&config, auth_url.as_deref(), json)
    };

    match command {
        Commands::Login { command } => match command {
            LoginCommands::Admin { email, password } => {
                commands::login::admin(&session()?, &email, &password).await
            }
            LoginCommands::Manager { pin } => commands::login::manager(&session()?, &pin).await,
        },
        Commands::Password { command } => match command {
            PasswordCommands::Forgot { email } => {
                commands::password::forgot(&session()?, &email).await
            }
            PasswordCommands::Reset {
                email,
                otp,
                password,
                confirm,
            } => {
                commands::password::reset(
                    &session()?,
                    commands::password::ResetOptions {
                        email: &email,
                        otp: &otp,
                        password: &password,
                        confirm: &confirm,
                    },
                )
                .await
            }
        },
        Commands::Config { command } => match command {
            ConfigCommands::Path => {
                commands::config::path();
                Ok(())
            }
            ConfigCommands::Init => commands::config::init(),
            ConfigCommands::Generate => commands::config::generate(),
        },
    }
}
