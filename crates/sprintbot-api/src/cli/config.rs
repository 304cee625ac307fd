//! `sprintbot config`.

use anyhow::Result;
use console::style;

use crate::state::AppState;

pub fn show(state: &AppState, json: bool) -> Result<()> {
    let config = &state.config;

    if json {
        let value = serde_json::json!({
            "data_dir": state.data_dir.display().to_string(),
            "sprint": &**config,
        });
        println!("{}", serde_json::to_string_pretty(&value)?);
        return Ok(());
    }

    println!();
    println!(
        "  {} sprintbot v{}",
        style("⚡").bold(),
        env!("CARGO_PKG_VERSION")
    );
    println!("  Data dir: {}", style(state.data_dir.display()).cyan());
    println!();
    println!("  {}", style("── Sprints ──").dim());
    println!(
        "  Duration: {}..={} min (default {})",
        config.min_duration,
        config.max_duration,
        style(config.default_duration).bold()
    );
    println!(
        "  Delay:    {}..={} min (default {})",
        config.min_delay,
        config.max_delay,
        style(config.default_delay).bold()
    );
    println!(
        "  Ticks:    every {}s, finish within {}s of the end, {}s per call",
        config.tick_interval_secs, config.finish_threshold_secs, config.tick_timeout_secs
    );
    println!(
        "  Display:  UTC{:+}min, {}-cell progress bar",
        config.display_utc_offset_minutes, config.progress_bar_width
    );
    println!();
    Ok(())
}
