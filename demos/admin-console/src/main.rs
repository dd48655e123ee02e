use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use careerlink::prelude::*;
use clap::{Parser, Subcommand};

/// Drives the Career Link admin session against a live identity API.
#[derive(Parser, Debug)]
#[command(name = "admin-console", version, about, long_about = None)]
struct Cli {
    /// Identity API base URL (e.g. http://localhost:8080/api)
    #[arg(long = "api-url", env = "CAREERLINK_API_URL", global = true)]
    api_url: Option<String>,

    /// File the bearer token is persisted in
    #[arg(long = "storage", env = "CAREERLINK_STORAGE", global = true)]
    storage: Option<PathBuf>,

    /// Seconds to wait for the session to settle
    #[arg(long = "timeout", default_value_t = 10, global = true)]
    timeout: u64,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Sign in and persist the token
    Login {
        #[arg(long)]
        email: String,

        #[arg(long, env = "CAREERLINK_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Restore the persisted session and print the guard's verdict
    Whoami,
    /// Sign out and remove the persisted token
    Logout,
}

impl Cli {
    fn config(&self) -> AdminConfig {
        let mut config = AdminConfig::from_env();
        if let Some(url) = &self.api_url {
            config.api_base_url = url.trim_end_matches('/').to_string();
        }
        if let Some(path) = &self.storage {
            config.storage_path = path.clone();
        }
        config
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    careerlink::telemetry::init("info");

    let cli = Cli::parse();
    match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<ExitCode, AdminError> {
    let console = AdminConsoleBuilder::with_config(cli.config()).build().await?;
    let wait = Duration::from_secs(cli.timeout);

    match cli.command {
        Command::Login { email, password } => {
            if let Err(e) = console.login(&email, &password).await {
                let session = console.snapshot();
                eprintln!(
                    "login failed: {}",
                    session.error.unwrap_or_else(|| e.to_string())
                );
                return Ok(ExitCode::FAILURE);
            }
            let session = settle(&console, wait).await;
            report(&session, console.route_decision());
            if console.route_decision() == RouteDecision::Render {
                println!("would navigate to {HOME_ROUTE}");
            }
        }
        Command::Whoami => {
            let session = settle(&console, wait).await;
            report(&session, console.route_decision());
        }
        Command::Logout => {
            console.logout();
            println!("signed out; guard: {:?}", console.route_decision());
        }
    }
    Ok(ExitCode::SUCCESS)
}

async fn settle(console: &AdminConsole, wait: Duration) -> Session {
    match tokio::time::timeout(wait, console.settled()).await {
        Ok(session) => session,
        Err(_) => {
            tracing::warn!(?wait, "session did not settle in time");
            console.snapshot()
        }
    }
}

fn report(session: &Session, decision: RouteDecision) {
    match &session.user {
        Some(user) => println!(
            "signed in as {} <{}> ({})",
            user.display_name(),
            user.email,
            user.role
        ),
        None => println!("not signed in"),
    }
    if let Some(error) = &session.error {
        println!("last error: {error}");
    }
    println!("guard: {decision:?}");
}
