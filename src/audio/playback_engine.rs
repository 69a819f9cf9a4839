//! Warm-up playback engine
//!
//! A dedicated thread owns the [`Sequencer`] and the step [`Scheduler`]. Every
//! control change arrives as a [`PlaybackCommand`] on a channel, so playback
//! state is only ever touched from that one thread. While a step is pending the
//! thread waits for commands until the step's deadline, then fires it.

use super::ToneSink;
use super::scheduler::Scheduler;
use anyhow::{Result, anyhow};
use crossbeam_channel::{Receiver, RecvTimeoutError, Sender, bounded, unbounded};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Instant;
use warmup_core::{
    Pattern, PlaybackSettings, PlaybackSnapshot, RootNote, Scale, Selection, Sequencer,
    StepOutcome, StepToken,
};

/// Commands that can be sent to the playback engine
#[derive(Debug)]
pub enum PlaybackCommand {
    Play,
    Pause,
    Toggle,
    /// Shift the cumulative transpose by this many semitones
    Transpose(i32),
    SelectScale(Scale),
    SelectPattern(Pattern),
    SelectRoot(RootNote),
    /// Reply with the current state
    Snapshot(Sender<PlaybackSnapshot>),
    /// Reply with the generated offsets
    Sequence(Sender<Vec<i32>>),
    Shutdown,
}

/// Handle to the playback thread
pub struct PlaybackEngine {
    command_tx: Sender<PlaybackCommand>,
    thread: Option<JoinHandle<()>>,
}

impl PlaybackEngine {
    /// Spawn the playback thread; nothing plays until [`PlaybackEngine::play`]
    pub fn new(
        sink: Arc<dyn ToneSink>,
        selection: Selection,
        settings: PlaybackSettings,
    ) -> Result<Self> {
        let (tx, rx) = unbounded();

        let thread = thread::Builder::new()
            .name("warmup-playback".to_string())
            .spawn(move || {
                PlaybackLoop::new(sink, selection, settings, rx).run();
            })?;

        Ok(PlaybackEngine {
            command_tx: tx,
            thread: Some(thread),
        })
    }

    pub fn play(&self) -> Result<()> {
        self.send(PlaybackCommand::Play)
    }

    pub fn pause(&self) -> Result<()> {
        self.send(PlaybackCommand::Pause)
    }

    pub fn toggle(&self) -> Result<()> {
        self.send(PlaybackCommand::Toggle)
    }

    pub fn transpose(&self, semitones: i32) -> Result<()> {
        self.send(PlaybackCommand::Transpose(semitones))
    }

    pub fn select_scale(&self, scale: Scale) -> Result<()> {
        self.send(PlaybackCommand::SelectScale(scale))
    }

    pub fn select_pattern(&self, pattern: Pattern) -> Result<()> {
        self.send(PlaybackCommand::SelectPattern(pattern))
    }

    pub fn select_root(&self, root: RootNote) -> Result<()> {
        self.send(PlaybackCommand::SelectRoot(root))
    }

    /// Current state, after every previously sent command has been applied
    pub fn snapshot(&self) -> Result<PlaybackSnapshot> {
        let (tx, rx) = bounded(1);
        self.send(PlaybackCommand::Snapshot(tx))?;
        rx.recv()
            .map_err(|_| anyhow!("Playback engine stopped before replying"))
    }

    pub fn sequence(&self) -> Result<Vec<i32>> {
        let (tx, rx) = bounded(1);
        self.send(PlaybackCommand::Sequence(tx))?;
        rx.recv()
            .map_err(|_| anyhow!("Playback engine stopped before replying"))
    }

    fn send(&self, command: PlaybackCommand) -> Result<()> {
        self.command_tx
            .send(command)
            .map_err(|e| anyhow!("Failed to send command: {}", e))
    }
}

impl Drop for PlaybackEngine {
    fn drop(&mut self) {
        let _ = self.command_tx.send(PlaybackCommand::Shutdown);
        if let Some(thread) = self.thread.take() {
            let _ = thread.join();
        }
    }
}

enum LoopAction {
    Continue,
    Shutdown,
}

/// Internal playback loop that runs in a dedicated thread
struct PlaybackLoop {
    sink: Arc<dyn ToneSink>,
    sequencer: Sequencer,
    scheduler: Scheduler,
    command_rx: Receiver<PlaybackCommand>,
}

impl PlaybackLoop {
    fn new(
        sink: Arc<dyn ToneSink>,
        selection: Selection,
        settings: PlaybackSettings,
        command_rx: Receiver<PlaybackCommand>,
    ) -> Self {
        Self {
            sink,
            sequencer: Sequencer::new(selection, &settings),
            scheduler: Scheduler::new(settings.step_interval()),
            command_rx,
        }
    }

    fn run(&mut self) {
        log::debug!(
            "playback loop started, one step every {:?}",
            self.scheduler.interval()
        );

        loop {
            let received = match self.scheduler.deadline() {
                Some(deadline) => match self.command_rx.recv_deadline(deadline) {
                    Ok(cmd) => Some(cmd),
                    Err(RecvTimeoutError::Timeout) => None,
                    Err(RecvTimeoutError::Disconnected) => break,
                },
                None => match self.command_rx.recv() {
                    Ok(cmd) => Some(cmd),
                    Err(_) => break, // Channel closed
                },
            };

            match received {
                Some(cmd) => {
                    if let LoopAction::Shutdown = self.handle_command(cmd) {
                        break;
                    }
                }
                None => self.fire_due(Instant::now()),
            }
        }

        log::debug!("playback loop finished");
    }

    fn handle_command(&mut self, cmd: PlaybackCommand) -> LoopAction {
        match cmd {
            PlaybackCommand::Play => {
                if !self.sequencer.is_playing() {
                    let token = self.sequencer.start();
                    self.begin(token);
                }
            }
            PlaybackCommand::Pause => {
                if self.sequencer.is_playing() {
                    // A step that is already scheduled sees a stale token and does nothing
                    self.sequencer.stop();
                    log::info!("playback stopped");
                }
            }
            PlaybackCommand::Toggle => match self.sequencer.toggle() {
                Some(token) => self.begin(token),
                None => log::info!("playback stopped"),
            },
            PlaybackCommand::Transpose(delta) => {
                let total = self.sequencer.transpose_by(delta);
                log::info!("transpose {:+} -> {:+}", delta, total);
            }
            PlaybackCommand::SelectScale(scale) => {
                let restart = self.sequencer.select_scale(scale);
                self.after_selection(restart);
            }
            PlaybackCommand::SelectPattern(pattern) => {
                let restart = self.sequencer.select_pattern(pattern);
                self.after_selection(restart);
            }
            PlaybackCommand::SelectRoot(root) => {
                let restart = self.sequencer.select_root(root);
                self.after_selection(restart);
            }
            PlaybackCommand::Snapshot(reply) => {
                let _ = reply.send(self.sequencer.snapshot());
            }
            PlaybackCommand::Sequence(reply) => {
                let _ = reply.send(self.sequencer.sequence().to_vec());
            }
            PlaybackCommand::Shutdown => {
                return LoopAction::Shutdown;
            }
        }
        LoopAction::Continue
    }

    fn begin(&mut self, token: StepToken) {
        log::info!(
            "playback started: {} {} from {}",
            self.sequencer.scale(),
            self.sequencer
                .pattern()
                .map(|p| p.name())
                .unwrap_or("(none)"),
            self.sequencer.root()
        );
        self.scheduler.arm(token);
    }

    fn after_selection(&mut self, restart: Option<StepToken>) {
        log::debug!("sequence is now {:?}", self.sequencer.sequence());
        if let Some(token) = restart {
            self.begin(token);
        }
    }

    fn fire_due(&mut self, now: Instant) {
        let Some(scheduled) = self.scheduler.take_due(now) else {
            return;
        };

        match self.sequencer.fire(scheduled.token) {
            StepOutcome::Emit(step) => {
                log::debug!(
                    "step {} offset {:+} -> {:.2} Hz",
                    step.position,
                    step.offset,
                    step.frequency
                );
                if let Err(e) = self.sink.emit(step.frequency) {
                    log::warn!("failed to emit tone: {}", e);
                }
                self.scheduler.rearm(scheduled, now);
            }
            StepOutcome::Skipped => {
                log::trace!("nothing to play, waiting for the next step");
                self.scheduler.rearm(scheduled, now);
            }
            StepOutcome::Cancelled => {
                log::trace!("dropping stale step {:?}", scheduled.token);
            }
        }
    }
}
