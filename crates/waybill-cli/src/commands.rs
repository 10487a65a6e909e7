use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use colored::Colorize;
use waybill_audit::AuditTrailService;
use waybill_ledger::{HttpLedgerClient, InMemoryLedger};
use waybill_server::{ServerConfig, WaybillServer};
use waybill_types::PackageId;

use crate::cli::*;

pub async fn run_command(cli: Cli) -> anyhow::Result<()> {
    let format = cli.format.clone();
    let node_url = cli.node_url.clone();
    match cli.command {
        Command::Serve(args) => cmd_serve(args, node_url).await,
        Command::NewId(args) => cmd_new_id(args, &format),
        Command::IndexKey(args) => cmd_index_key(args, &format),
        Command::Track(args) => cmd_track(args, node_url, &format).await,
        Command::History(args) => cmd_history(args, node_url, &format).await,
    }
}

/// Config file (or defaults), then environment, then command-line flags.
fn resolve_config(config_path: Option<&str>, node_url: Option<String>) -> anyhow::Result<ServerConfig> {
    let config = match config_path {
        Some(path) => ServerConfig::load(Path::new(path))?,
        None => ServerConfig::default(),
    };
    let mut config = config.apply_env()?;
    if let Some(url) = node_url.filter(|u| !u.is_empty()) {
        config.node_url = url;
    }
    Ok(config)
}

fn audit_service(config: &ServerConfig) -> anyhow::Result<AuditTrailService> {
    config.validate()?;
    let ledger = HttpLedgerClient::with_timeout(&config.node_url, config.request_timeout());
    let mut service = AuditTrailService::new(Arc::new(ledger));
    if let Some(explorer) = &config.explorer_url {
        service = service.with_explorer_url(explorer.clone());
    }
    Ok(service)
}

async fn cmd_serve(args: ServeArgs, node_url: Option<String>) -> anyhow::Result<()> {
    let mut config = resolve_config(args.config.as_deref(), node_url)?;
    if let Some(bind) = &args.bind {
        config.bind_addr = bind
            .parse()
            .with_context(|| format!("invalid bind address: {bind}"))?;
    }
    if let Some(explorer) = args.explorer_url {
        config.explorer_url = Some(explorer);
    }

    let server = if args.in_memory {
        tracing::warn!("serving from an in-memory ledger; records are lost on exit");
        WaybillServer::new(config, Arc::new(InMemoryLedger::default()))
    } else {
        WaybillServer::connect(config)?
    };

    let node_label = if args.in_memory {
        "in-memory".to_string()
    } else {
        server.config().node_url.clone()
    };
    println!(
        "{} Waybill API on {} (node: {})",
        "✓".green().bold(),
        server.config().bind_addr.to_string().bold(),
        node_label.cyan()
    );

    server
        .serve_with_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!(error = %e, "failed to listen for shutdown signal");
            }
        })
        .await?;
    Ok(())
}

fn cmd_new_id(args: NewIdArgs, format: &OutputFormat) -> anyhow::Result<()> {
    let ids: Vec<PackageId> = (0..args.count).map(|_| PackageId::generate()).collect();
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&ids)?),
        OutputFormat::Text => {
            for id in &ids {
                println!("{}", id.to_string().yellow());
            }
        }
    }
    Ok(())
}

fn cmd_index_key(args: IndexKeyArgs, format: &OutputFormat) -> anyhow::Result<()> {
    let package_id = PackageId::parse(&args.package_id)?;
    let key = AuditTrailService::index_key(&package_id);
    match format {
        OutputFormat::Json => println!(
            "{}",
            serde_json::to_string_pretty(&serde_json::json!({
                "packageID": package_id,
                "index": key.as_str(),
                "indexHex": key.to_hex(),
            }))?
        ),
        OutputFormat::Text => {
            println!("Package: {}", package_id.to_string().yellow());
            println!("  Index: {}", key.as_str().cyan());
            println!("  Hex:   {}", key.to_hex().dimmed());
        }
    }
    Ok(())
}

async fn cmd_track(args: TrackArgs, node_url: Option<String>, format: &OutputFormat) -> anyhow::Result<()> {
    let config = resolve_config(None, node_url)?;
    let service = audit_service(&config)?;
    let package_id = PackageId::parse(&args.package_id)?;

    let result = service
        .record_update(&package_id, &args.status, &args.location)
        .await?;

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&result)?),
        OutputFormat::Text => {
            println!("{} Status recorded", "✓".green().bold());
            println!("  Package:  {}", package_id.to_string().yellow());
            println!("  Status:   {} @ {}", result.data.status.bold(), result.data.location);
            println!("  Message:  {}", result.message_id.as_str().cyan());
            println!("  Explorer: {}", result.explorer_url.blue());
        }
    }
    Ok(())
}

async fn cmd_history(args: HistoryArgs, node_url: Option<String>, format: &OutputFormat) -> anyhow::Result<()> {
    let config = resolve_config(None, node_url)?;
    let service = audit_service(&config)?;
    let package_id = PackageId::parse(&args.package_id)?;

    let history = service.fetch_history(&package_id).await?;

    match format {
        OutputFormat::Json => println!(
            "{}",
            serde_json::to_string_pretty(&serde_json::json!({
                "packageID": package_id,
                "history": history,
            }))?
        ),
        OutputFormat::Text => {
            if history.is_empty() {
                println!("Audit trail for {}: no records.", package_id.to_string().yellow());
                return Ok(());
            }
            println!("Audit trail for {} ({} records)", package_id.to_string().yellow().bold(), history.len());
            for entry in &history {
                println!(
                    "  {}  {:<12} {}  {}",
                    waybill_types::timestamp::format(&entry.record.timestamp).dimmed(),
                    entry.record.status.green(),
                    entry.record.location,
                    entry.message_id.short_id().cyan()
                );
            }
        }
    }
    Ok(())
}
