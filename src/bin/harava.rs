// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

/**
 * Harava Binary
 * Command-line entry point for subdomain discovery and reconciliation
 *
 * © 2026 Bountyy Oy
 */

use anyhow::Result;
use clap::Parser;
use harava::{DiscoveryConfig, Orchestrator, PgDomainStore};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser, Debug)]
#[command(name = "harava", version, about = "Concurrent subdomain reconnaissance")]
struct Args {
    /// Target domain or URL (e.g. example.com, https://example.com/login)
    domain: String,

    /// Enable every source, including abuse-sensitive scrapers
    #[arg(long)]
    thorough: bool,

    /// Emit the result as JSON instead of plain text
    #[arg(long)]
    json: bool,

    /// Owner identifier for the persisted baseline
    #[arg(long, default_value = "default")]
    owner: String,

    /// PostgreSQL URL; enables baseline reconciliation when set
    #[arg(long, env = "HARAVA_DATABASE_URL")]
    database_url: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();

    let mut config = DiscoveryConfig::from_env();
    if args.thorough {
        config = config.thorough();
    }
    if let Some(url) = &args.database_url {
        config.database.url = url.clone();
        config.database.enabled = true;
    }

    let orchestrator = Orchestrator::new(&config)?;
    let discovery = orchestrator.discover(&args.domain).await?;

    if config.database.enabled {
        let store = PgDomainStore::new(&config.database).await?;
        store.init_schema().await?;
        let delta = harava::reconcile(&store, &discovery, &args.owner).await?;

        if args.json {
            println!("{}", serde_json::to_string_pretty(&delta)?);
        } else {
            println!(
                "{}: {} hostnames known, {} new",
                delta.domain,
                delta.all_hosts.len(),
                delta.new_hosts.len()
            );
            for host in &delta.new_hosts {
                println!("  + {}", host);
            }
        }

        if delta.has_new() {
            info!(new = delta.new_hosts.len(), "New hostnames recorded");
        }
    } else {
        if args.json {
            println!("{}", serde_json::to_string_pretty(&discovery)?);
        } else {
            println!(
                "{}: {} literal, {} wildcard",
                discovery.domain,
                discovery.literal.len(),
                discovery.wildcard.len()
            );
            for host in &discovery.literal {
                println!("  {}", host);
            }
            for host in &discovery.wildcard {
                println!("  {}", host);
            }
        }
    }

    if !discovery.stats.failed_sources.is_empty() {
        warn!(
            failed = ?discovery.stats.failed_sources,
            "Some sources failed during discovery"
        );
    }

    Ok(())
}
