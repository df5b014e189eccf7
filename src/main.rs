//! View-Tally: Main entry point

use clap::Parser;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::info;

use view_tally::cli::{Cli, Commands};
use view_tally::core::ident;
use view_tally::core::temporal::Timestamp;
use view_tally::counter::sweeper::spawn_sweeper;
use view_tally::counter::{CounterConfig, ViewCounter};
use view_tally::error::{Error, Result};
use view_tally::service::{ViewOutcome, ViewService};
use view_tally::store::InMemoryViewStore;

/// Summary of one simulation run
#[derive(Debug, Serialize)]
struct SimulationReport {
    views_submitted: u64,
    counted: u64,
    throttled: u64,
    clients_tracked: usize,
    entries_tracked: usize,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Simulate {
            clients,
            resources,
            views,
            cooldown_secs,
            step_ms,
            json,
        } => {
            if clients == 0 || resources == 0 {
                return Err(Error::Configuration(
                    "clients and resources must be non-zero".to_string(),
                ));
            }

            let report = simulate(clients, resources, views, cooldown_secs, step_ms).await?;

            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                println!("views submitted: {}", report.views_submitted);
                println!("counted:         {}", report.counted);
                println!("throttled:       {}", report.throttled);
                println!("clients tracked: {}", report.clients_tracked);
                println!("entries tracked: {}", report.entries_tracked);
            }
            Ok(())
        }
        Commands::Encode { id } => {
            println!("{}", ident::encode(id));
            Ok(())
        }
        Commands::Decode { id } => {
            println!("{}", ident::decode(&id)?);
            Ok(())
        }
    }
}

/// Push `views` synthetic views through a service over an in-memory store,
/// with clients and resources assigned round-robin and simulated time
/// advancing `step_ms` per view.
async fn simulate(
    clients: usize,
    resources: usize,
    views: u64,
    cooldown_secs: u64,
    step_ms: u64,
) -> Result<SimulationReport> {
    let config = CounterConfig::default().with_cooldown(Duration::from_secs(cooldown_secs));
    let counter = Arc::new(ViewCounter::new(config));

    let store = Arc::new(InMemoryViewStore::new());
    let resource_ids: Vec<String> = (1..=resources)
        .map(|i| format!("center-{}", ident::encode(i as u64)))
        .collect();
    for id in &resource_ids {
        store.register(id);
    }

    let service = ViewService::new(counter.clone(), store);

    let shutdown = CancellationToken::new();
    let sweeper = spawn_sweeper(counter.clone(), shutdown.clone());

    info!(clients, resources, views, cooldown_secs, "simulation started");

    let mut report = SimulationReport {
        views_submitted: 0,
        counted: 0,
        throttled: 0,
        clients_tracked: 0,
        entries_tracked: 0,
    };
    let mut now = Timestamp::now();

    for i in 0..views {
        let client = format!("198.51.100.{}", i as usize % clients);
        let resource = &resource_ids[i as usize % resources];
        match service.record_view(&client, resource, now).await? {
            ViewOutcome::Counted { .. } => report.counted += 1,
            ViewOutcome::Throttled => report.throttled += 1,
        }
        report.views_submitted += 1;
        now = now.add_millis(step_ms as i64);
    }

    report.clients_tracked = counter.client_count();
    report.entries_tracked = counter.entry_count();

    shutdown.cancel();
    let _ = sweeper.await;

    info!(
        counted = report.counted,
        throttled = report.throttled,
        "simulation finished"
    );

    Ok(report)
}
