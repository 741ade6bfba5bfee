//! AlgoRace - Application Entry Point
//!
//! Generates an input array from the environment configuration, races the
//! configured algorithms over it and renders progress in the terminal.

use tokio::sync::mpsc::UnboundedReceiver;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use algorace::{
    RaceCoordinator, RaceReport,
    config::CONFIG,
    race::{ChannelSink, RaceEvent},
    utils::{format_elapsed, format_memory_mb, generate_array, pick_target, render_bar},
};

/// Width of the rendered progress bars
const BAR_WIDTH: usize = 30;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    let (plain, json) = if CONFIG.log.json {
        (None, Some(tracing_subscriber::fmt::layer().json()))
    } else {
        (Some(tracing_subscriber::fmt::layer()), None)
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| CONFIG.log.rust_log.clone().into()),
        )
        .with(plain)
        .with(json)
        .init();

    tracing::info!("Starting AlgoRace...");

    let input = &CONFIG.input;
    let values = generate_array(input.array_size, input.min_value, input.max_value);
    let mode = CONFIG.race.mode;
    let target = if mode.requires_target() {
        CONFIG.race.target.or_else(|| pick_target(&values))
    } else {
        None
    };
    tracing::info!(
        "Generated {} values in [{}, {}]",
        values.len(),
        input.min_value,
        input.max_value
    );

    let (sink, events) = ChannelSink::channel();
    let mut coordinator = RaceCoordinator::new()
        .with_progress_config(CONFIG.progress.clone())
        .on_unit_progress(sink.clone())
        .on_race_complete(sink.clone())
        .on_visual_progress(sink);

    coordinator.set_input(values)?;
    coordinator.prepare(mode, target)?;
    if !coordinator.start().is_started() {
        anyhow::bail!("Race did not start");
    }

    let report = tokio::select! {
        report = render_events(events) => report,
        _ = tokio::signal::ctrl_c() => {
            tracing::warn!("Interrupted; a running race cannot be cancelled, exiting");
            return Ok(());
        }
    };

    match report {
        Some(report) => print_report(&report)?,
        None => tracing::error!("Race ended without a report"),
    }

    Ok(())
}

/// Render progress until the final report arrives
async fn render_events(mut events: UnboundedReceiver<RaceEvent>) -> Option<RaceReport> {
    while let Some(event) = events.recv().await {
        match event {
            RaceEvent::VisualProgress { name, percent } => {
                println!("{:<20} {}", name, render_bar(percent, BAR_WIDTH));
            }
            RaceEvent::UnitFinished {
                name,
                elapsed,
                completed,
            } => {
                println!(
                    "{:<20} finished in {} (#{})",
                    name,
                    format_elapsed(elapsed),
                    completed
                );
            }
            RaceEvent::RaceFinished(report) => return Some(*report),
        }
    }
    None
}

fn print_report(report: &RaceReport) -> anyhow::Result<()> {
    println!();
    println!("Race {} ({}, {} values)", report.race_id, report.mode, report.input_len);
    if let Some(target) = report.target {
        println!("Target: {}", target);
    }
    for (position, entry) in report.ranking.iter().enumerate() {
        println!(
            "{:>2}. {:<20} {}",
            position + 1,
            entry.name,
            format_elapsed(entry.elapsed)
        );
    }
    if let Some(winner) = report.winner() {
        println!("Winner: {}", winner.name);
    }
    for fault in &report.faults {
        println!("Failed: {} ({})", fault.name, fault.message);
    }
    println!("Memory delta: {}", format_memory_mb(report.memory_delta_mb));

    if CONFIG.report.json {
        println!("{}", serde_json::to_string_pretty(report)?);
    }
    Ok(())
}
