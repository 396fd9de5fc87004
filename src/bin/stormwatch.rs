//! Stormwatch daemon.
//!
//! Starts the background refresh and feed tasks, then re-renders the Day 1-3
//! outlooks and the latest feed panels to stdout on every tick and after each
//! cycle that installed something. The render loop only reads the cache
//! directory and the last published panel snapshot. Logs go to stderr.
//! Ctrl-C stops the background tasks and exits.

use anyhow::anyhow;
use std::time::{Duration, SystemTime};
use stormwatch::config::StormwatchConfig;
use stormwatch::refresh::{Mirror, RefreshScheduler};
use stormwatch::render::{OutlookView, RenderOutcome, RenderSurface, TextSurface};
use stormwatch::resource::OutlookDay;
use stormwatch_feeds::{PanelSnapshot, spawn_panel_refresh};
use tokio::sync::{mpsc, watch};
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("stormwatch=info,stormwatch_feeds=info")),
        )
        .init();

    let config_path = StormwatchConfig::default_config_path();
    let config = StormwatchConfig::load_or_default(&config_path)?;
    config.validate()?;
    if !config_path.exists() {
        match config.save_to_file(&config_path) {
            Ok(()) => info!(path = %config_path.display(), "wrote default config"),
            Err(e) => warn!(path = %config_path.display(), error = %e, "cannot write default config"),
        }
    }

    let mirror = Mirror::from_config(&config)?;
    mirror.ensure_directories()?;
    let view = OutlookView::from_config(&config)?;
    info!(
        cache = %mirror.root().display(),
        resources = mirror.resources().len(),
        "stormwatch starting"
    );

    let (report_tx, mut report_rx) = mpsc::unbounded_channel();
    let handle = RefreshScheduler::new(mirror, config.refresh.interval())
        .with_reports(report_tx)
        .start()
        .ok_or_else(|| anyhow!("refresh scheduler already running"))?;

    let tick_every = Duration::from_secs(config.render.tick_secs);
    let (panel_rx, panel_task) = spawn_panel_refresh(config.feeds.clone(), tick_every);

    let mut tick = tokio::time::interval(tick_every);
    tick.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            _ = tick.tick() => render_pass(&view, &panel_rx),
            Some(report) = report_rx.recv() => {
                if report.installed_count() > 0 {
                    render_pass(&view, &panel_rx);
                }
            }
            signal = tokio::signal::ctrl_c() => {
                if let Err(e) = signal {
                    warn!(error = %e, "cannot listen for ctrl-c, shutting down");
                }
                break;
            }
        }
    }

    info!("stopping background tasks");
    panel_task.abort();
    handle.stop().await?;
    info!("stormwatch shut down cleanly");
    Ok(())
}

fn render_pass(view: &OutlookView, panels: &watch::Receiver<PanelSnapshot>) {
    let now = SystemTime::now();
    let mut surface = TextSurface::new();

    for day in OutlookDay::ALL {
        surface.begin(day.key());
        match view.render(day, &mut surface, now) {
            Ok(RenderOutcome::Rendered { entry, age_minutes }) => {
                debug!(day = %day, file = %entry.file_name(), age_minutes, "rendered");
            }
            Ok(RenderOutcome::Pending) => {}
            Err(e) => {
                warn!(day = %day, error = %e, "cache unreadable");
                surface.show_notice(&format!("Cache unreadable: {e}"));
            }
        }
    }

    let snapshot = panels.borrow().clone();
    for section in &snapshot.entries {
        surface.show_panel(section.kind.name(), &section.entries);
    }
    for error in &snapshot.errors {
        surface.show_notice(error);
    }

    println!("{}", surface.into_text());
}
