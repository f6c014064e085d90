use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};
use std::time::Duration;

use cs3split_core::context::AppConfig;
use cs3split_core::input::{LogOnlyPresser, platform_presser};
use cs3split_core::provider::{LogFileProvider, ReplayProvider, StreamProvider};
use cs3split_core::timer::{GameTimer, TimerPhase, TimerSnapshot};
use cs3split_core::{Autosplitter, TickOutcome};
use cs3split_types::BattleTag;
use tokio::time::MissedTickBehavior;
use tracing::info;

/// Live mode: tail the game log until Ctrl-C.
pub async fn run(
    config: &AppConfig,
    log: Option<PathBuf>,
    tick_ms: Option<u64>,
    segments: Option<usize>,
) -> Result<(), String> {
    let path = log
        .or_else(|| config.log_path())
        .ok_or("error: no log file configured (pass --log or set log_path in the config)")?;
    let provider =
        LogFileProvider::new(&path, &config.log_encoding).map_err(|e| e.to_string())?;

    let timer = Arc::new(GameTimer::new(segments.unwrap_or(config.segment_count)));
    let settings = Arc::new(RwLock::new(config.settings.clone()));
    let mut splitter = Autosplitter::new(provider, timer.clone(), settings, platform_presser());

    let tick_ms = tick_ms.unwrap_or(config.tick_interval_ms).max(1);
    let mut interval = tokio::time::interval(Duration::from_millis(tick_ms));
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

    println!("Watching {} (Ctrl-C to stop)", path.display());
    info!(path = %path.display(), tick_ms, "Live mode started");

    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    let mut last = timer.snapshot();
    let mut attached = false;
    loop {
        tokio::select! {
            _ = interval.tick() => {
                let now_attached = splitter.tick() != TickOutcome::Detached;
                if now_attached != attached {
                    println!("{}", if now_attached { "Attached" } else { "Waiting for log file..." });
                    attached = now_attached;
                }
                let snapshot = timer.snapshot();
                report_changes(&last, &snapshot);
                last = snapshot;
            }
            _ = &mut ctrl_c => break,
        }
    }

    splitter.shutdown();
    print_snapshot(&timer.snapshot())
}

/// Feed a recorded script through the pipeline, one tick per entry.
pub fn replay(config: &AppConfig, script: &Path, segments: Option<usize>) -> Result<(), String> {
    let provider = ReplayProvider::from_path(script).map_err(|e| e.to_string())?;
    let total = provider.remaining();

    let timer = Arc::new(GameTimer::new(segments.unwrap_or(config.segment_count)));
    let settings = Arc::new(RwLock::new(config.settings.clone()));
    let mut splitter =
        Autosplitter::new(provider, timer.clone(), settings, Arc::new(LogOnlyPresser));

    let mut ticks = 0usize;
    while !splitter.provider().is_finished() {
        splitter.tick();
        ticks += 1;
    }
    splitter.shutdown();

    info!(entries = total, ticks, attached = splitter.provider().is_attached(), "Replay finished");
    print_snapshot(&timer.snapshot())
}

pub fn list_battles(config: &AppConfig) -> Result<(), String> {
    for tag in BattleTag::ALL {
        let mark = if config.settings.split_enabled(tag) { "x" } else { " " };
        println!("[{mark}] {tag}");
    }
    Ok(())
}

pub fn set_battles(config: &mut AppConfig, tags: &[BattleTag], enabled: bool) -> Result<(), String> {
    for tag in tags {
        config.settings.set_split(*tag, enabled);
    }
    config.save().map_err(|e| e.to_string())?;

    let verb = if enabled { "Enabled" } else { "Disabled" };
    for tag in tags {
        println!("{verb} split for {tag}");
    }
    Ok(())
}

pub fn set_skip_animations(config: &mut AppConfig, enabled: bool) -> Result<(), String> {
    config.settings.skip_battle_animations = enabled;
    config.save().map_err(|e| e.to_string())?;
    println!(
        "Battle animation skipping {}",
        if enabled { "enabled" } else { "disabled" }
    );
    Ok(())
}

pub fn show_config(config: &AppConfig) -> Result<(), String> {
    match AppConfig::path() {
        Ok(path) => println!("Config file: {}", path.display()),
        Err(e) => println!("Config file: unavailable ({e})"),
    }
    let json = serde_json::to_string_pretty(config).map_err(|e| e.to_string())?;
    println!("{json}");
    Ok(())
}

fn report_changes(last: &TimerSnapshot, now: &TimerSnapshot) {
    let time = format_game_time(now.game_time_ms);

    if last.phase == TimerPhase::NotRunning && now.phase != TimerPhase::NotRunning {
        println!("[{time}] Run started");
    }
    for (idx, split_ms) in now.splits_ms.iter().enumerate().skip(last.splits_ms.len()) {
        println!("[{}] Split {}", format_game_time(*split_ms), idx + 1);
    }
    if last.paused != now.paused && now.phase == TimerPhase::Running {
        println!("[{time}] {}", if now.paused { "Paused" } else { "Resumed" });
    }
    if last.phase != TimerPhase::Ended && now.phase == TimerPhase::Ended {
        println!("[{time}] Run finished");
    }
}

fn print_snapshot(snapshot: &TimerSnapshot) -> Result<(), String> {
    let json = serde_json::to_string_pretty(snapshot).map_err(|e| e.to_string())?;
    println!("{json}");
    Ok(())
}

fn format_game_time(ms: u64) -> String {
    let secs = ms / 1000;
    format!(
        "{}:{:02}:{:02}.{:03}",
        secs / 3600,
        (secs / 60) % 60,
        secs % 60,
        ms % 1000
    )
}
