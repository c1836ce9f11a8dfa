use chromadesk::application::tools::DocumentTools;
use chromadesk::cli::commands::{Cli, Commands};
use chromadesk::cli::shell::{self, AdminSession};
use chromadesk::config::Settings;
use chromadesk::domain::values::query_limit::QueryLimit;
use chromadesk::domain::values::upload_format::UploadFormat;
use chromadesk::{build_backend, ChromaDesk};
use clap::Parser;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("chromadesk=info")),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let settings = match load_settings(&cli) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Error loading configuration: {e}");
            std::process::exit(1);
        }
    };

    if let Err(e) = run_command(settings, cli.command).await {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn load_settings(cli: &Cli) -> Result<Settings, Box<dyn std::error::Error>> {
    let mut settings = Settings::from_env()?;
    if let Some(host) = &cli.host {
        settings.endpoint.host = host.clone();
    }
    if let Some(port) = cli.port {
        settings.endpoint.port = port;
    }
    if let Some(collection) = &cli.collection {
        settings.endpoint.collection = collection.clone();
    }
    if let Some(backend) = &cli.backend {
        settings.backend = backend.parse()?;
    }
    Ok(settings)
}

async fn run_command(settings: Settings, cmd: Commands) -> Result<(), Box<dyn std::error::Error>> {
    match cmd {
        Commands::Ping => {
            let desk = ChromaDesk::new(&settings)?;
            let beat = desk.heartbeat().await?;
            println!("{} is up (heartbeat {beat})", settings.endpoint.base_url());
        }
        Commands::Add { documents } => {
            let desk = connected(&settings).await?;
            let ids = desk.store(documents).await?;
            println!("{}", serde_json::to_string_pretty(&ids)?);
        }
        Commands::Import { file, format } => {
            let format = format.map(|f| f.parse::<UploadFormat>()).transpose()?;
            let desk = connected(&settings).await?;
            let count = desk.ingest_file(&file, format).await?;
            println!("Stored {count} documents from {}", file.display());
        }
        Commands::Query { text, limit } => {
            let limit = QueryLimit::new(limit)?;
            let desk = connected(&settings).await?;
            let hits = desk.query(&text, limit).await?;
            println!("{}", serde_json::to_string_pretty(&hits)?);
        }
        Commands::List => {
            let desk = connected(&settings).await?;
            let overview = desk.overview().await?;
            println!("{}", serde_json::to_string_pretty(&overview)?);
        }
        Commands::Tool { name, json } => {
            let args: serde_json::Value = serde_json::from_str(&json)?;
            let desk = connected(&settings).await?;
            let response = desk.tools().dispatch(&name, args).await;
            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        Commands::Tools => {
            println!("{}", serde_json::to_string_pretty(&DocumentTools::declarations())?);
        }
        Commands::Shell => {
            let backend = build_backend(&settings)?;
            let mut session = AdminSession::new(settings.endpoint.clone(), backend);
            let stdin = tokio::io::BufReader::new(tokio::io::stdin());
            shell::run(&mut session, stdin, tokio::io::stdout()).await?;
        }
    }
    Ok(())
}

async fn connected(settings: &Settings) -> Result<ChromaDesk, Box<dyn std::error::Error>> {
    let desk = ChromaDesk::new(settings)?;
    desk.connect().await?;
    Ok(desk)
}
