//! Command-line driver for the session gate

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use std::sync::Arc;

use kvgate::session::FnNavigator;
use kvgate::{AuthGate, GateConfig};

#[derive(Parser, Debug)]
#[command(name = "kvgate", about = "Session gate for the Key-Value System API")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Exchange a username and password for a session token
    Login {
        username: String,
        #[arg(long, env = "KVGATE_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// End the current session
    Logout,
    /// Print the identity behind the current session
    Whoami,
    /// Ask the guard whether a destination may be entered
    Visit {
        destination: String,
        /// Destination the navigation starts from
        from: Option<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    kvgate::init_tracing();

    let config = GateConfig::load();
    let navigator = FnNavigator(|destination: &str| {
        tracing::info!("Host navigates to {}", destination);
    });
    let gate = AuthGate::new(&config, Arc::new(navigator));

    match cli.command {
        Command::Login { username, password } => {
            gate.login(&username, &password)
                .await
                .context("login failed")?;
            println!("logged in as {}", username);
        }
        Command::Logout => {
            gate.logout().await;
            println!("logged out");
        }
        Command::Whoami => {
            if !gate.is_authenticated().await {
                bail!("not logged in");
            }
            let profile = gate.fetch_identity().await.context("identity lookup failed")?;
            println!("{}", serde_json::to_string_pretty(&profile)?);
        }
        Command::Visit { destination, from } => {
            let decision = gate.navigate(&destination, from.as_deref()).await;
            println!("{:?}", decision);
        }
    }

    Ok(())
}
