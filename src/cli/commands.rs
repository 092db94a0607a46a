//! Command definitions for the countdown CLI.
//!
//! Uses clap derive macro for argument parsing, plus the parser for the
//! single-line keyboard commands accepted while a countdown runs.

use std::path::PathBuf;
use std::time::Duration;

use clap::{Args, Parser, Subcommand};

use crate::types::CountdownConfig;

// ============================================================================
// CLI Structure
// ============================================================================

/// Countdown timer with pause/resume, presets and a completion chime
#[derive(Parser, Debug)]
#[command(
    name = "countdown",
    version,
    about = "终端倒计时器",
    long_about = "在终端中运行的倒计时器。\n\
                  支持暂停/继续、复位、预设时长，并在结束时播放提示音。",
    propagate_version = true
)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Enable verbose output for debugging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable the completion chime
    #[arg(long, global = true)]
    pub no_sound: bool,

    /// Preset catalog file (JSON array of {"label", "seconds"})
    #[arg(long, global = true, value_name = "FILE")]
    pub presets: Option<PathBuf>,

    /// Tick interval in milliseconds
    #[arg(
        long,
        global = true,
        hide = true,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub interval_ms: Option<u64>,
}

impl Cli {
    /// Builds the timer configuration from the global flags.
    pub fn config(&self) -> CountdownConfig {
        let mut config = CountdownConfig::default().with_sound(!self.no_sound);
        if let Some(ms) = self.interval_ms {
            config = config.with_tick_interval(Duration::from_millis(ms));
        }
        if let Some(path) = &self.presets {
            config = config.with_presets_path(path);
        }
        config
    }
}

// ============================================================================
// Subcommands
// ============================================================================

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Run a countdown in this terminal
    Start(StartArgs),

    /// List the preset catalog
    Presets {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },

    /// Generate shell completion scripts
    Completions {
        /// Shell type for completion script
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

// ============================================================================
// Start Command Arguments
// ============================================================================

/// Arguments for the start command
#[derive(Args, Debug, Clone, Default)]
pub struct StartArgs {
    /// Hours
    #[arg(default_value_t = 0, allow_negative_numbers = true)]
    pub hours: i64,

    /// Minutes
    #[arg(default_value_t = 0, allow_negative_numbers = true)]
    pub minutes: i64,

    /// Seconds
    #[arg(default_value_t = 0, allow_negative_numbers = true)]
    pub seconds: i64,

    /// Start a preset by label instead of a duration
    #[arg(short, long, conflicts_with_all = ["hours", "minutes", "seconds"])]
    pub preset: Option<String>,

    /// Keep accepting commands after the countdown completes
    #[arg(long)]
    pub stay: bool,

    /// Print every update as a JSON line
    #[arg(long)]
    pub json: bool,
}

// ============================================================================
// Keyboard commands
// ============================================================================

/// A command typed while the countdown is running.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputCommand {
    /// Start a new countdown
    Start {
        hours: i64,
        minutes: i64,
        seconds: i64,
    },
    Pause,
    Resume,
    Reset,
    /// Apply a preset by label
    Preset(String),
    /// Clear the active preset
    ClearPreset,
    /// List presets
    List,
    Help,
    Quit,
}

/// Parses one line of keyboard input.
///
/// Returns `Ok(None)` for blank lines.
pub fn parse_input(line: &str) -> Result<Option<InputCommand>, String> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }

    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };

    let command = match word {
        "p" | "pause" => InputCommand::Pause,
        "r" | "resume" => InputCommand::Resume,
        "x" | "reset" => InputCommand::Reset,
        "l" | "list" => InputCommand::List,
        "h" | "help" | "?" => InputCommand::Help,
        "q" | "quit" | "exit" => InputCommand::Quit,
        "s" | "start" => parse_start(rest)?,
        "preset" if rest.is_empty() => InputCommand::ClearPreset,
        "preset" => InputCommand::Preset(rest.to_string()),
        other => return Err(format!("未知命令: {}", other)),
    };
    Ok(Some(command))
}

/// Parses `[h] [m] s`, filling missing leading fields with zero.
fn parse_start(args: &str) -> Result<InputCommand, String> {
    let fields = args
        .split_whitespace()
        .map(|f| f.parse::<i64>().map_err(|_| format!("无效的数字: {}", f)))
        .collect::<Result<Vec<_>, _>>()?;

    let (hours, minutes, seconds) = match fields.as_slice() {
        [s] => (0, 0, *s),
        [m, s] => (0, *m, *s),
        [h, m, s] => (*h, *m, *s),
        _ => return Err("用法: s [时] [分] 秒".to_string()),
    };
    Ok(InputCommand::Start {
        hours,
        minutes,
        seconds,
    })
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    // ------------------------------------------------------------------------
    // Cli Tests
    // ------------------------------------------------------------------------

    mod cli_tests {
        use super::*;

        #[test]
        fn test_parse_no_args() {
            let cli = Cli::parse_from(["countdown"]);
            assert!(cli.command.is_none());
            assert!(!cli.verbose);
            assert!(!cli.no_sound);
        }

        #[test]
        fn test_parse_verbose_flag() {
            let cli = Cli::parse_from(["countdown", "-v"]);
            assert!(cli.verbose);
        }

        #[test]
        fn test_parse_presets_command() {
            let cli = Cli::parse_from(["countdown", "presets", "--json"]);
            assert!(matches!(cli.command, Some(Commands::Presets { json: true })));
        }

        #[test]
        fn test_config_from_flags() {
            let cli = Cli::parse_from([
                "countdown",
                "--no-sound",
                "--interval-ms",
                "50",
                "--presets",
                "/tmp/p.json",
                "presets",
            ]);
            let config = cli.config();
            assert!(!config.sound_enabled);
            assert_eq!(config.tick_interval, Duration::from_millis(50));
            assert_eq!(config.presets_path, Some(PathBuf::from("/tmp/p.json")));
        }

        #[test]
        fn test_zero_interval_rejected() {
            let result = Cli::try_parse_from(["countdown", "--interval-ms", "0", "presets"]);
            assert!(result.is_err());
        }
    }

    // ------------------------------------------------------------------------
    // Start Command Tests
    // ------------------------------------------------------------------------

    mod start_command_tests {
        use super::*;

        #[test]
        fn test_start_defaults() {
            let cli = Cli::parse_from(["countdown", "start"]);
            match cli.command {
                Some(Commands::Start(args)) => {
                    assert_eq!((args.hours, args.minutes, args.seconds), (0, 0, 0));
                    assert!(args.preset.is_none());
                    assert!(!args.stay);
                }
                _ => panic!("Expected Start command"),
            }
        }

        #[test]
        fn test_start_with_duration() {
            let cli = Cli::parse_from(["countdown", "start", "1", "30", "15"]);
            match cli.command {
                Some(Commands::Start(args)) => {
                    assert_eq!((args.hours, args.minutes, args.seconds), (1, 30, 15));
                }
                _ => panic!("Expected Start command"),
            }
        }

        #[test]
        fn test_start_with_negative_field() {
            let cli = Cli::parse_from(["countdown", "start", "0", "0", "-5"]);
            match cli.command {
                Some(Commands::Start(args)) => assert_eq!(args.seconds, -5),
                _ => panic!("Expected Start command"),
            }
        }

        #[test]
        fn test_start_with_preset() {
            let cli = Cli::parse_from(["countdown", "start", "--preset", "短休息 5 分钟"]);
            match cli.command {
                Some(Commands::Start(args)) => {
                    assert_eq!(args.preset.as_deref(), Some("短休息 5 分钟"));
                }
                _ => panic!("Expected Start command"),
            }
        }

        #[test]
        fn test_preset_conflicts_with_duration() {
            let result =
                Cli::try_parse_from(["countdown", "start", "0", "1", "0", "--preset", "x"]);
            assert!(result.is_err());
        }
    }

    // ------------------------------------------------------------------------
    // Keyboard Command Tests
    // ------------------------------------------------------------------------

    mod input_tests {
        use super::*;

        #[test]
        fn test_blank_line() {
            assert_eq!(parse_input("   "), Ok(None));
        }

        #[test]
        fn test_single_letter_commands() {
            assert_eq!(parse_input("p"), Ok(Some(InputCommand::Pause)));
            assert_eq!(parse_input("r"), Ok(Some(InputCommand::Resume)));
            assert_eq!(parse_input("x"), Ok(Some(InputCommand::Reset)));
            assert_eq!(parse_input("l"), Ok(Some(InputCommand::List)));
            assert_eq!(parse_input("q"), Ok(Some(InputCommand::Quit)));
            assert_eq!(parse_input("?"), Ok(Some(InputCommand::Help)));
        }

        #[test]
        fn test_start_field_counts() {
            assert_eq!(
                parse_input("s 90"),
                Ok(Some(InputCommand::Start {
                    hours: 0,
                    minutes: 0,
                    seconds: 90
                }))
            );
            assert_eq!(
                parse_input("start 1 30"),
                Ok(Some(InputCommand::Start {
                    hours: 0,
                    minutes: 1,
                    seconds: 30
                }))
            );
            assert_eq!(
                parse_input("s 1 2 3"),
                Ok(Some(InputCommand::Start {
                    hours: 1,
                    minutes: 2,
                    seconds: 3
                }))
            );
        }

        #[test]
        fn test_start_errors() {
            assert!(parse_input("s").is_err());
            assert!(parse_input("s 1 2 3 4").is_err());
            assert!(parse_input("s abc").is_err());
        }

        #[test]
        fn test_preset_with_spaces_in_label() {
            assert_eq!(
                parse_input("preset 番茄钟 25 分钟"),
                Ok(Some(InputCommand::Preset("番茄钟 25 分钟".to_string())))
            );
            assert_eq!(parse_input("preset"), Ok(Some(InputCommand::ClearPreset)));
        }

        #[test]
        fn test_unknown_command() {
            let err = parse_input("dance").unwrap_err();
            assert!(err.contains("dance"));
        }
    }
}
