use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use std::sync::Arc;

use agent_lookup::proxy::MockBackend;
use agent_lookup::surface::{Binding, FieldKind, FormSurface, Indicator, MemoryForm};
use agent_lookup::{Config, LookupBackend, LookupController, LookupResponse, ProxyClient, SourceEvent};

#[derive(Parser)]
#[command(name = "agent-lookup")]
#[command(about = "Agent code lookup against a credential-holding proxy", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve an agent code against the live proxy endpoint
    Lookup {
        #[arg(help = "Agent code to resolve")]
        code: String,
        #[arg(long, help = "Proxy endpoint URL (defaults to AGENT_LOOKUP_PROXY_URL)")]
        endpoint: Option<String>,
        #[arg(long, help = "Request timeout in seconds")]
        timeout: Option<u64>,
    },
    /// Run the full controller standalone against an in-memory form
    Demo {
        #[arg(help = "Agent code to type into the form")]
        code: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Lookup {
            code,
            endpoint,
            timeout,
        } => run_lookup(&code, endpoint, timeout).await?,
        Commands::Demo { code } => run_demo(&code).await,
    }

    Ok(())
}

async fn run_lookup(code: &str, endpoint: Option<String>, timeout: Option<u64>) -> Result<()> {
    let mut config = match endpoint {
        Some(endpoint) => Config::new(endpoint),
        None => Config::from_env()?,
    };
    if let Some(timeout) = timeout {
        config = config.with_timeout(timeout);
    }

    let client = ProxyClient::new(&config)?;
    let response = client.lookup(code).await?;

    let name = match response {
        LookupResponse {
            success: true,
            data: Some(data),
        } => agent_lookup::resolve::agent_name(&data),
        _ => None,
    };

    match name {
        Some(name) => {
            println!("{name}");
            Ok(())
        }
        None => bail!("no agent name found for code {code}"),
    }
}

/// Standalone mode: no host runtime attached, canned backend response. Shows
/// the controller driving a form the way the embedded widget would.
async fn run_demo(code: &str) {
    let backend = Arc::new(MockBackend::respond_with(serde_json::json!({
        "success": true,
        "data": { "as_earned_AgentName": "Jane Doe" },
    })));
    let form = Arc::new(
        MemoryForm::new()
            .with_field("code", "as_earned_AgentCode", FieldKind::Text)
            .with_field("name", "agent_name", FieldKind::Text),
    );
    let controller = LookupController::new(
        backend,
        form.clone(),
        "code",
        Binding::by_default_patterns(),
    );

    form.type_into("code", code);
    controller.on_source_event(SourceEvent::Blur).await;

    println!("agent_name field: {:?}", form.value("name"));
    println!("success shown:    {}", form.indicator(Indicator::Success));
    println!("error shown:      {}", form.indicator(Indicator::Error));
}
