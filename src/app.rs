//! Session replay application: drives the engine with recorded frames on a
//! clock that follows the frame timestamps.

use crate::{
    audio::AudioTrigger,
    clock::ManualClock,
    config::Config,
    engine::{EngineEvent, FrameReport, GestureEngine, Telemetry},
    error::Result,
    session::{RecordedFrame, Session},
};
use log::{debug, info};
use serde::Serialize;
use std::fmt;

/// Totals for one replayed session
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SessionSummary {
    /// Frames processed
    pub frames: usize,
    /// Frames in which a primary person was found
    pub frames_with_person: usize,
    /// Key strikes, matched or not
    pub triggers: usize,
    /// Strikes that hit the expected note
    pub matched_notes: usize,
    /// Times the melody wrapped around
    pub rounds_completed: u32,
    /// Recognised wrist strokes
    pub strokes: usize,
    /// Capture time covered, in milliseconds
    pub duration_ms: u64,
}

impl fmt::Display for SessionSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Frames:          {} ({} with a player)", self.frames, self.frames_with_person)?;
        writeln!(f, "Key strikes:     {}", self.triggers)?;
        writeln!(f, "Matched notes:   {}", self.matched_notes)?;
        writeln!(f, "Rounds complete: {}", self.rounds_completed)?;
        writeln!(f, "Strokes:         {}", self.strokes)?;
        write!(f, "Duration:        {} ms", self.duration_ms)
    }
}

/// Main application struct
pub struct PianoApp {
    engine: GestureEngine,
    clock: ManualClock,
    summary: SessionSummary,
}

impl PianoApp {
    /// Create an app around a fresh engine.
    ///
    /// # Errors
    ///
    /// Returns an error if the engine rejects `config`.
    pub fn new(config: &Config, audio: Box<dyn AudioTrigger>) -> Result<Self> {
        info!("Initializing pose piano");
        let clock = ManualClock::new(0);
        let engine = GestureEngine::new(config, audio, Box::new(clock.clone()))?;
        Ok(Self {
            engine,
            clock,
            summary: SessionSummary::default(),
        })
    }

    #[must_use]
    pub const fn engine(&self) -> &GestureEngine {
        &self.engine
    }

    #[must_use]
    pub const fn summary(&self) -> SessionSummary {
        self.summary
    }

    /// Feed one recorded frame at its own timestamp
    pub fn step(&mut self, recorded: &RecordedFrame) -> FrameReport {
        self.clock.set(recorded.timestamp_ms);
        let round_before = self.engine.sequencer().current_round();

        let report = self.engine.process_frame(&recorded.frame(), Telemetry { fps: recorded.fps });

        self.summary.frames += 1;
        if report.snapshot.debug.person_score.is_some() {
            self.summary.frames_with_person += 1;
        }
        for event in &report.events {
            match event {
                EngineEvent::KeyTriggered { matched, .. } => {
                    self.summary.triggers += 1;
                    if *matched {
                        self.summary.matched_notes += 1;
                    }
                }
                EngineEvent::Stroke { .. } => self.summary.strokes += 1,
            }
        }
        let round_after = self.engine.sequencer().current_round();
        if round_after > round_before {
            self.summary.rounds_completed += round_after - round_before;
            info!("Round {} complete", round_before + 1);
        }

        report
    }

    /// Replay a whole session and return its totals
    pub fn run(&mut self, session: &Session) -> SessionSummary {
        info!("Replaying {} frames", session.len());
        for (i, recorded) in session.frames.iter().enumerate() {
            let report = self.step(recorded);
            if !report.events.is_empty() {
                debug!("Frame {}: {:?}", i, report.events);
            }
        }
        self.summary.duration_ms = self.summary.duration_ms.saturating_add(session.duration_ms());
        info!("Replay finished");
        self.summary
    }

    /// Restart the game and clear the totals
    pub fn restart(&mut self) {
        self.engine.restart();
        self.summary = SessionSummary::default();
    }
}
