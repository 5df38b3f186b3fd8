use std::io::Write as _;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{bail, Context};
use async_trait::async_trait;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use np_pilot::config::PilotConfig;
use np_pilot::context::RollingContext;
use np_pilot::gate::{AutoConfirm, Confirmer};
use np_pilot::orchestrator::{write_artifact, Pilot, TurnRequest};
use np_protocol::CommandPlan;
use np_provider::{ProviderCredentials, ProviderRegistry};
use np_transport::SshTransport;

#[derive(Parser, Debug)]
#[command(
    name = "nexpilot",
    version,
    about = "Natural-language copilot for Cisco NX-OS switches"
)]
struct Cli {
    /// Request to run as a single turn; omit for an interactive session
    #[arg(short, long)]
    request: Option<String>,

    /// Device hostname or address from the inventory
    #[arg(short, long)]
    target: Option<String>,

    /// Pin every turn to this provider id (no fallback)
    #[arg(short, long)]
    provider: Option<String>,

    /// Approve configuration changes without prompting
    #[arg(short = 'y', long)]
    yes: bool,

    /// Write the markdown report artifact to this path
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Configuration file
    #[arg(short, long, default_value = "nexpilot.toml")]
    config: PathBuf,

    /// List probed providers and exit
    #[arg(long)]
    list_providers: bool,
}

/// Prompts the operator on the terminal before configuration changes run.
struct TerminalConfirmer;

#[async_trait]
impl Confirmer for TerminalConfirmer {
    async fn confirm(&self, plan: &CommandPlan) -> bool {
        println!("\nThe plan contains configuration changes:");
        for command in plan.command_texts() {
            println!("  {command}");
        }
        matches!(
            prompt_line("Apply these changes? [y/N] ").await.as_deref(),
            Some("y") | Some("yes")
        )
    }
}

/// Read one trimmed, lowercased line from stdin. `None` on EOF.
async fn prompt_line(prompt: &str) -> Option<String> {
    print!("{prompt}");
    let _ = std::io::stdout().flush();
    tokio::task::spawn_blocking(|| {
        let mut line = String::new();
        match std::io::stdin().read_line(&mut line) {
            Ok(0) | Err(_) => None,
            Ok(_) => Some(line.trim().to_lowercase()),
        }
    })
    .await
    .ok()
    .flatten()
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Reports go to stdout; structured logs stay on stderr.
    tracing_subscriber::fmt()
        .json()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = PilotConfig::from_file(&cli.config)?;

    let credentials = ProviderCredentials::from_env();
    let registry = ProviderRegistry::probe(&credentials, &config.providers).await?;

    if cli.list_providers {
        for desc in registry.list() {
            println!(
                "{:<16} {:<28} priority {}  {}",
                desc.id,
                desc.label,
                desc.priority,
                if desc.available { "available" } else { "unavailable" }
            );
        }
        return Ok(());
    }

    let mut target = match (&cli.target, config.devices.len()) {
        (Some(selector), _) => config
            .find_device(selector)
            .with_context(|| format!("no device '{selector}' in inventory"))?,
        (None, 1) => config.devices[0].to_target(),
        (None, 0) => bail!("no devices configured in {}", cli.config.display()),
        (None, _) => bail!("multiple devices configured; pick one with --target"),
    };

    let confirmer: Box<dyn Confirmer> = if cli.yes || config.session.auto_confirm {
        Box::new(AutoConfirm(true))
    } else {
        Box::new(TerminalConfirmer)
    };

    let pilot = Pilot::new(
        registry,
        Box::new(SshTransport::new()),
        confirmer,
        Duration::from_secs(config.session.command_timeout_secs),
    );
    let mut context = RollingContext::new(config.session.context_window);

    if let Some(request_text) = cli.request {
        let request = match cli.provider {
            Some(id) => TurnRequest::pinned(request_text, id),
            None => TurnRequest::new(request_text),
        };
        let report = pilot.run_turn(&mut target, &request, &mut context).await;
        println!("{}", report.to_markdown());
        if let Some(path) = &cli.output {
            write_artifact(&report, path)?;
        }
        return Ok(());
    }

    // Interactive session: one turn per line, context carried across turns.
    println!("nexpilot session with {} — type a request, or 'quit' to exit", target.hostname);
    loop {
        let Some(line) = prompt_line("> ").await else {
            break;
        };
        if line.is_empty() {
            continue;
        }
        if line == "quit" || line == "exit" {
            break;
        }

        let request = match cli.provider.clone() {
            Some(id) => TurnRequest::pinned(line, id),
            None => TurnRequest::new(line),
        };
        let report = pilot.run_turn(&mut target, &request, &mut context).await;
        println!("{}", report.to_markdown());
        if let Some(path) = &cli.output {
            if let Err(e) = write_artifact(&report, path) {
                tracing::error!(error = %e, "artifact write failed");
            }
        }
    }

    Ok(())
}
