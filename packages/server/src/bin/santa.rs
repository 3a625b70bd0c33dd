//! Secret Santa CLI
//!
//! Runs an exchange end to end against in-memory collaborators, or prints a
//! fresh invite code. Output is JSON.

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use rust_decimal::Decimal;
use serde::Serialize;
use santa_core::config::Config;
use santa_core::domains::exchanges::actions::{
    create_exchange, join_exchange, santa_target, JoinOutcome,
};
use santa_core::domains::exchanges::models::{NewExchange, UserProfile};
use santa_core::domains::exchanges::utils::generate_invite_code;
use santa_core::kernel::{BaseExchangeStore, InMemoryExchangeStore, NoopMessenger, ServerKernel};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "santa")]
#[command(about = "Secret Santa exchange tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create an exchange, join generated participants and print the draw
    Simulate {
        #[arg(long, default_value_t = 4)]
        participants: u32,
        #[arg(long, default_value = "25")]
        budget: Decimal,
        /// Seed the draw for reproducible output
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Print a fresh invite code
    Code {
        #[arg(long)]
        seed: Option<u64>,
    },
}

#[derive(Serialize)]
struct SimulationReport {
    code: String,
    budget: Decimal,
    matched: bool,
    pairs: Vec<PairReport>,
}

#[derive(Serialize)]
struct PairReport {
    giver: String,
    recipient: String,
    wishlist: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,santa_core=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let config = Config::from_env().context("Failed to load configuration")?;

    match cli.command {
        Commands::Simulate {
            participants,
            budget,
            seed,
        } => {
            let report = simulate(&config, participants, budget, seed).await?;
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        Commands::Code { seed } => {
            let mut rng = match seed {
                Some(seed) => fastrand::Rng::with_seed(seed),
                None => fastrand::Rng::new(),
            };
            println!("{}", generate_invite_code(&mut rng));
        }
    }

    Ok(())
}

async fn simulate(
    config: &Config,
    participants: u32,
    budget: Decimal,
    seed: Option<u64>,
) -> Result<SimulationReport> {
    let store = Arc::new(InMemoryExchangeStore::new());
    let mut kernel = ServerKernel::new(store.clone(), Arc::new(NoopMessenger), config);
    if let Some(seed) = seed {
        kernel.deps = kernel.deps.with_seed(seed);
    }
    kernel.start().await?;

    let organizer = UserProfile::new("Organizer");
    store.insert_user(&organizer).await?;

    let exchange = create_exchange(
        NewExchange {
            title: "Simulated exchange".to_string(),
            description: String::new(),
            budget,
            target_count: participants,
            creator_id: organizer.id,
        },
        kernel.deps(),
    )
    .await?;
    tracing::info!(code = %exchange.code, "Simulated exchange created");

    let mut users = Vec::new();
    let mut matched = false;
    for i in 1..=participants {
        let user = UserProfile::new(format!("Elf {}", i));
        store.insert_user(&user).await?;
        let wishlist = format!("Something nice for elf {}", i);
        let outcome = join_exchange(&exchange.code, user.id, &wishlist, kernel.deps()).await?;
        if let JoinOutcome::Joined { matched: true, .. } = outcome {
            matched = true;
        }
        users.push(user);
    }

    let mut pairs = Vec::new();
    for user in &users {
        if let Some(target) = santa_target(exchange.id, user.id, kernel.deps()).await? {
            pairs.push(PairReport {
                giver: user.name.clone(),
                recipient: target.recipient.name,
                wishlist: target.wishlist_text,
            });
        }
    }

    kernel.shutdown().await?;

    Ok(SimulationReport {
        code: exchange.code,
        budget,
        matched,
        pairs,
    })
}
