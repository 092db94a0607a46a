//! Application wiring and the UI loop.
//!
//! `App` builds the engine, sound service and view-model explicitly, then
//! runs a single-threaded loop that applies engine events and keyboard
//! commands to the view-model in arrival order.

use std::ops::ControlFlow;

use anyhow::{Context, Result};
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::sync::mpsc;
use tracing::{debug, info};

use super::commands::{parse_input, InputCommand};
use super::display::Display;
use crate::engine::{TimerEngine, TimerEvent};
use crate::sound::SoundService;
use crate::types::{CountdownConfig, CountdownStatus};
use crate::viewmodel::CountdownViewModel;

/// How snapshots are printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputMode {
    /// Human-readable status lines
    #[default]
    Text,
    /// One JSON object per line
    Json,
    /// Nothing
    Quiet,
}

/// The wired-up countdown application.
pub struct App {
    view_model: CountdownViewModel<TimerEngine>,
    events: mpsc::UnboundedReceiver<TimerEvent>,
}

impl App {
    /// Builds the application from a configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid, the preset catalog
    /// cannot be loaded or the engine cannot start its thread.
    pub fn new(config: &CountdownConfig, output: OutputMode) -> Result<Self> {
        config.validate()?;
        let presets = config.load_presets().context("预设加载失败")?;

        let (event_tx, events) = mpsc::unbounded_channel();
        let engine = TimerEngine::with_interval(event_tx, config.tick_interval)?;
        let sound = SoundService::new(config.sound_enabled);

        let mut view_model = CountdownViewModel::new(engine, sound, presets)
            .with_critical_threshold(config.critical_threshold_seconds);

        match output {
            OutputMode::Text => {
                view_model.subscribe(Display::show_snapshot);
            }
            OutputMode::Json => {
                view_model.subscribe(Display::show_snapshot_json);
            }
            OutputMode::Quiet => {}
        }

        debug!("Application wired: {:?}", config);
        Ok(Self { view_model, events })
    }

    pub fn view_model(&self) -> &CountdownViewModel<TimerEngine> {
        &self.view_model
    }

    pub fn view_model_mut(&mut self) -> &mut CountdownViewModel<TimerEngine> {
        &mut self.view_model
    }

    /// Applies one keyboard command. Breaks on quit.
    pub fn apply(&mut self, command: InputCommand) -> ControlFlow<()> {
        let vm = &mut self.view_model;
        match command {
            InputCommand::Start {
                hours,
                minutes,
                seconds,
            } => {
                vm.start(hours, minutes, seconds);
            }
            InputCommand::Pause => vm.pause(),
            InputCommand::Resume => vm.resume(),
            InputCommand::Reset => vm.reset(),
            InputCommand::Preset(label) => {
                vm.select_preset_by_label(&label);
            }
            InputCommand::ClearPreset => {
                vm.select_preset(None);
            }
            InputCommand::List => Display::show_presets(vm.presets()),
            InputCommand::Help => Display::show_help(),
            InputCommand::Quit => return ControlFlow::Break(()),
        }
        ControlFlow::Continue(())
    }

    /// Runs until the countdown completes (unless `stay`), the user quits,
    /// or input ends while nothing is running.
    ///
    /// # Errors
    ///
    /// Returns an error if reading input fails.
    pub async fn run<R>(&mut self, input: R, stay: bool) -> Result<()>
    where
        R: AsyncBufRead + Unpin,
    {
        let mut lines = input.lines();
        let mut input_open = true;

        loop {
            tokio::select! {
                Some(event) = self.events.recv() => {
                    self.view_model.handle_event(event);
                    if !stay && self.view_model.status() == CountdownStatus::Completed {
                        break;
                    }
                }
                line = lines.next_line(), if input_open => {
                    match line.context("读取输入失败")? {
                        Some(line) => match parse_input(&line) {
                            Ok(Some(command)) => {
                                if self.apply(command).is_break() {
                                    info!("Quit requested");
                                    break;
                                }
                            }
                            Ok(None) => {}
                            Err(message) => Display::show_error(&message),
                        },
                        None => {
                            debug!("Input closed");
                            input_open = false;
                        }
                    }
                }
                else => break,
            }

            if !input_open && !self.view_model.is_running() {
                break;
            }
        }

        // The chime plays on a detached sink; let it finish before exiting.
        let sound = self.view_model.sound();
        if self.view_model.status() == CountdownStatus::Completed && sound.is_enabled() {
            tokio::time::sleep(sound.tone().total_duration()).await;
        }

        self.shutdown();
        Ok(())
    }

    /// Stops the engine and releases its thread.
    pub fn shutdown(&mut self) {
        self.view_model.driver_mut().shutdown();
    }
}

impl std::fmt::Debug for App {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("App")
            .field("view_model", &self.view_model)
            .finish_non_exhaustive()
    }
}
