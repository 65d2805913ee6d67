use std::path::Path;

use anyhow::Context;
use colored::Colorize;
use pagedrop_crypto::{derive_from_content, derive_from_title};
use pagedrop_server::{PagedropServer, ServerConfig};
use pagedrop_store::{open_store, ContentStore};
use pagedrop_types::Identifier;

use crate::cli::*;

pub async fn run_command(cli: Cli) -> anyhow::Result<()> {
    let config = load_config(cli.config.as_deref())?;
    match cli.command {
        Command::Serve(args) => cmd_serve(config, args).await,
        Command::Put(args) => cmd_put(&config, args).await,
        Command::Get(args) => cmd_get(&config, args).await,
        Command::Rm(args) => cmd_rm(&config, args).await,
        Command::Hash(args) => cmd_hash(args),
        Command::Inspect(args) => cmd_inspect(&config, args).await,
        Command::Config => cmd_config(&config),
    }
}

fn load_config(path: Option<&Path>) -> anyhow::Result<ServerConfig> {
    match path {
        Some(path) => Ok(ServerConfig::load(path)?),
        None => Ok(ServerConfig::default()),
    }
}

fn parse_identifier(value: &str) -> anyhow::Result<Identifier> {
    Identifier::new(value).with_context(|| format!("invalid identifier {value:?}"))
}

fn open(config: &ServerConfig) -> anyhow::Result<std::sync::Arc<dyn ContentStore>> {
    let store = open_store(&config.storage).context("failed to open content store")?;
    if config.storage.backend() == "chunked-memory" {
        tracing::warn!("chunked-memory storage does not outlive this command");
    }
    Ok(store)
}

async fn cmd_serve(mut config: ServerConfig, args: ServeArgs) -> anyhow::Result<()> {
    if let Some(bind) = args.bind {
        config.bind_addr = bind;
    }
    if let Some(url) = args.public_url {
        config.public_base_url = url;
    }
    println!(
        "{} pagedrop on {} (storage: {})",
        "▶".green().bold(),
        config.bind_addr.to_string().bold(),
        config.storage.backend().cyan()
    );
    PagedropServer::new(config)?.serve().await?;
    Ok(())
}

async fn cmd_put(config: &ServerConfig, args: PutArgs) -> anyhow::Result<()> {
    let payload = tokio::fs::read_to_string(&args.file)
        .await
        .with_context(|| format!("failed to read {}", args.file.display()))?;
    let id = match &args.id {
        Some(id) => parse_identifier(id)?,
        None => derive_from_content(&payload),
    };
    open(config)?.store(&id, &payload).await?;
    println!("{} Stored {}", "✓".green().bold(), id.to_string().yellow().bold());
    println!("  Characters: {}", payload.chars().count());
    println!("  Share URL: {}", config.share_url(&id).blue());
    Ok(())
}

async fn cmd_get(config: &ServerConfig, args: GetArgs) -> anyhow::Result<()> {
    let id = parse_identifier(&args.identifier)?;
    match open(config)?.retrieve(&id).await? {
        Some(payload) => print!("{payload}"),
        None => anyhow::bail!("nothing stored under {id}"),
    }
    Ok(())
}

async fn cmd_rm(config: &ServerConfig, args: RmArgs) -> anyhow::Result<()> {
    let id = parse_identifier(&args.identifier)?;
    if open(config)?.remove(&id).await? {
        println!("{} Removed {}", "✓".green().bold(), id.to_string().yellow());
    } else {
        println!("{} {} not found", "·".dimmed(), id.to_string().yellow());
    }
    Ok(())
}

fn cmd_hash(args: HashArgs) -> anyhow::Result<()> {
    let id = if args.title {
        derive_from_title(&args.input)
    } else {
        derive_from_content(&args.input)
    };
    println!("{id}");
    Ok(())
}

async fn cmd_inspect(config: &ServerConfig, args: InspectArgs) -> anyhow::Result<()> {
    let id = parse_identifier(&args.identifier)?;
    let store = open(config)?;
    let Some(info) = store.describe(&id).await? else {
        println!("{} {} not found", "·".dimmed(), id.to_string().yellow());
        return Ok(());
    };
    println!("{} ({})", id.to_string().yellow().bold(), store.backend_name().cyan());
    println!("  Characters: {}", info.char_len);
    println!("  Bytes: {}", info.byte_len);
    match info.chunks {
        Some(chunks) => println!("  Chunks: {chunks}"),
        None => println!("  Chunks: {}", "n/a".dimmed()),
    }
    Ok(())
}

fn cmd_config(config: &ServerConfig) -> anyhow::Result<()> {
    print!("{}", config.to_toml_string()?);
    Ok(())
}
