//! Display utilities for the countdown CLI.
//!
//! This module provides formatted output for:
//! - Countdown snapshots (status, time, progress bar, finish estimate)
//! - The preset catalog
//! - Keyboard help and error messages

use crate::time;
use crate::types::{CountdownSnapshot, CountdownStatus, PresetCatalog};

/// Width of the progress bar in cells.
const BAR_WIDTH: usize = 20;

// ============================================================================
// Display
// ============================================================================

/// Display utilities for CLI output.
pub struct Display;

impl Display {
    /// Prints one snapshot as a status line.
    pub fn show_snapshot(snapshot: &CountdownSnapshot) {
        println!("{}", Self::render_snapshot(snapshot));
    }

    /// Prints one snapshot as a JSON line.
    pub fn show_snapshot_json(snapshot: &CountdownSnapshot) {
        match serde_json::to_string(snapshot) {
            Ok(json) => println!("{}", json),
            Err(e) => tracing::warn!("Failed to serialize snapshot: {}", e),
        }
    }

    /// Renders a snapshot, e.g.
    /// `[运行中] 00:00:42 [######..............]  30% 结束于 12:00:42 倒计时进行中`.
    pub fn render_snapshot(snapshot: &CountdownSnapshot) -> String {
        let marker = if snapshot.critical { " !" } else { "" };
        let mut line = format!(
            "[{}] {}{} {} {:>3}%",
            Self::status_label(snapshot.status),
            snapshot.formatted_time,
            marker,
            Self::progress_bar(snapshot.progress, BAR_WIDTH),
            (snapshot.progress * 100.0).round() as u32,
        );
        if snapshot.finish_time_text != time::NO_FINISH_TEXT {
            line.push_str(&format!(" 结束于 {}", snapshot.finish_time_text));
        }
        line.push(' ');
        line.push_str(&snapshot.status_message);
        line
    }

    /// Human-readable label for a status.
    pub fn status_label(status: CountdownStatus) -> &'static str {
        match status {
            CountdownStatus::Idle => "空闲",
            CountdownStatus::Running => "运行中",
            CountdownStatus::Paused => "已暂停",
            CountdownStatus::Completed => "已完成",
        }
    }

    /// Renders a `[###...]` bar for a progress ratio in `[0, 1]`.
    pub fn progress_bar(progress: f64, width: usize) -> String {
        let filled = ((progress.clamp(0.0, 1.0) * width as f64).round() as usize).min(width);
        format!("[{}{}]", "#".repeat(filled), ".".repeat(width - filled))
    }

    /// Prints the preset catalog.
    pub fn show_presets(catalog: &PresetCatalog) {
        println!("预设时长");
        println!("─────────────────────────────");
        for preset in catalog.presets() {
            println!(
                "  {}  {}",
                time::format_seconds(preset.seconds),
                preset.label
            );
        }
    }

    /// Prints the keyboard commands.
    pub fn show_help() {
        println!("命令: p 暂停 | r 继续 | x 复位 | s [时] [分] 秒 开始 | preset <名称> | l 预设列表 | q 退出");
    }

    /// Shows an error message.
    pub fn show_error(message: &str) {
        eprintln!("错误: {}", message);
    }
}

// ============================================================================
// Tests
// ============================================================================
