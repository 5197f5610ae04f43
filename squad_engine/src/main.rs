/// SquadEngine: Replay CLI
///
/// Loads a player catalog and an intent log, replays the log through the
/// engine, and prints each outcome plus the final state hash.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use squad_engine::catalog::Catalog;
use squad_engine::domain::RuleConfig;
use squad_engine::engine::SquadEngine;
use squad_engine::intents::Intent;
use squad_engine::state::TeamState;

#[derive(Parser, Debug)]
#[clap(version, about)]
/// Replay a fantasy squad intent log against a player catalog
struct Args {
    /// Player catalog JSON (array of players)
    #[arg(long, env = "SQUAD_CATALOG")]
    catalog: PathBuf,

    /// Intent log JSON (array of intents)
    #[arg(long, env = "SQUAD_INTENTS")]
    intents: PathBuf,

    /// Rule overrides JSON; defaults to the season rules
    #[arg(long, env = "SQUAD_RULES")]
    rules: Option<PathBuf>,

    /// Exit non-zero if any intent is rejected
    #[arg(long)]
    strict: bool,

    /// Print the final state as JSON
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    let catalog_json = fs::read_to_string(&args.catalog)
        .with_context(|| format!("reading catalog {}", args.catalog.display()))?;
    let catalog = Catalog::from_json(&catalog_json).context("loading catalog")?;

    let intents_json = fs::read_to_string(&args.intents)
        .with_context(|| format!("reading intents {}", args.intents.display()))?;
    let intents = Intent::list_from_json(&intents_json).context("parsing intents")?;

    let config = match &args.rules {
        Some(path) => {
            let json = fs::read_to_string(path)
                .with_context(|| format!("reading rules {}", path.display()))?;
            RuleConfig::from_json(&json).context("loading rules")?
        }
        None => RuleConfig::default(),
    };

    println!("Loaded {} players, {} intents", catalog.len(), intents.len());

    // Run 1
    let mut engine = SquadEngine::new(catalog.clone(), config.clone())?;
    let mut rejected = 0usize;
    for (i, intent) in intents.iter().enumerate() {
        match engine.apply(intent) {
            Ok(result) => {
                print!("[OK]     #{} {}", i + 1, result.intent);
                if let Some(delta) = result.price_delta {
                    print!(" delta={} penalty={}", delta, result.penalty);
                }
                if !result.shortfalls.is_empty() {
                    print!(" ({})", result.shortfalls.join(", "));
                }
                println!();
            }
            Err(err) => {
                rejected += 1;
                println!("[REJECT] #{} {}: {} {}", i + 1, intent.name(), err.code(), err);
            }
        }
    }
    let h1 = engine.state_hash();

    // Run 2 (determinism check): the accepted intents alone must rebuild
    // the same state.
    let accepted = engine.history().to_vec();
    let mut engine2 = SquadEngine::new(catalog, config)?;
    engine2.replay(&accepted)?;
    let h2 = engine2.state_hash();

    println!("\n===========================================");
    print_summary(engine.state());
    println!("hash: {}", h1);
    println!("accepted: {}, rejected: {}", accepted.len(), rejected);

    if args.json {
        println!("{}", serde_json::to_string_pretty(engine.state())?);
    }

    if h1 != h2 {
        println!("[FAIL] Determinism check failed: run1={} run2={}", h1, h2);
        std::process::exit(1);
    }
    if args.strict && rejected > 0 {
        std::process::exit(2);
    }
    Ok(())
}

fn print_summary(state: &TeamState) {
    match state {
        TeamState::Building { selection } => {
            println!("phase: building, {} players selected", selection.len());
        }
        TeamState::Managing { team } => {
            println!("phase: managing");
            for (i, p) in team.squad.slots().iter().enumerate() {
                let marker = if team.squad.is_captain(&p.id) { " (C)" } else { "" };
                let section = if i < team.squad.starters().len() { "XI " } else { "SUB" };
                println!(
                    "  {} {:<3} {:<24} {:>5}  {}{}",
                    section,
                    p.position.short_label(),
                    p.name,
                    p.price.to_string(),
                    p.club_id,
                    marker
                );
            }
            println!(
                "bank: {}  free transfers: {}  penalty: {}",
                team.bank, team.free_transfers, team.penalty_points
            );
        }
    }
}
