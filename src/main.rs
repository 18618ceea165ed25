//! sandcraft - a deterministic tile-based 2D sandbox simulation core
//!
//! Headless driver: runs the simulation on a fixed tick cadence with a
//! small scripted session, logging world state as it goes. Rendering and
//! input binding live in external front-ends that consume the session's
//! state snapshots.

mod config;

use anyhow::Result;
use config::SimConfig;
use sandcraft_physics::Category;
use sandcraft_world::{Confirm, Session};
use std::{env, path::PathBuf};
use tracing::{info, warn};

fn main() -> Result<()> {
    // WARN level by default; override via RUST_LOG.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    info!("Starting sandcraft v{}", env!("CARGO_PKG_VERSION"));

    let config = match env::args().nth(1) {
        Some(path) => SimConfig::load_from_path(&PathBuf::from(path)),
        None => SimConfig::load(),
    };
    info!(?config, "simulation settings");

    let mut session = Session::new(config.seed)?;
    run(&mut session, &config)?;

    summarize(&session);
    Ok(())
}

/// Drive the session through `config.ticks` ticks with a scripted probe:
/// the player equips the stone pickaxe and mines out a ground cell.
fn run(session: &mut Session, config: &SimConfig) -> Result<()> {
    let target = session.world().grid_to_xy_centre((0, 9));

    for tick in 0..config.ticks {
        if tick == 30 {
            session.select_hotbar_slot(2);
        }
        if tick >= 60 && tick % 20 == 0 && session.world().block_at(target).is_some() {
            if let Err(err) = session.left_click(target.x, target.y) {
                warn!(%err, "mining probe failed");
            }
        }

        session.step(config.tick_seconds);

        if session.player_dead() {
            info!(tick, "player died; starting over");
            session.new_game(Confirm::Yes)?;
        }

        if config.log_every > 0 && tick % config.log_every == 0 {
            log_state(session, tick);
        }
    }
    Ok(())
}

fn log_state(session: &Session, tick: u64) {
    let Some(player) = session.player() else {
        return;
    };
    let position = session
        .world()
        .player_position()
        .unwrap_or_default();
    let items = session
        .world()
        .things()
        .filter(|view| view.category == Category::Item)
        .count();
    info!(
        tick,
        x = position.x,
        y = position.y,
        health = player.health(),
        food = player.food(),
        things = session.world().thing_count(),
        dropped_items = items,
        "state"
    );
}

fn summarize(session: &Session) {
    let held: Vec<String> = session
        .hotbar()
        .stacks()
        .map(|(_, stack)| format!("{}x{}", stack.item().id(), stack.quantity()))
        .collect();
    info!(hotbar = held.join(", "), "final hotbar");

    if let Some(player) = session.player() {
        info!(
            health = player.health(),
            food = player.food(),
            "final player state"
        );
    }
}
