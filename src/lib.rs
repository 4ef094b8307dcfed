//! Pose piano library: turns tracked body keypoints into virtual piano key
//! presses and drives a melody-matching game.
//!
//! The pipeline for each delivered frame is:
//! 1. Select the primary person (highest score above a minimum)
//! 2. Remap keypoints from detector space into display space
//! 3. Track each wrist in a short trajectory buffer
//! 4. Hit-test the newest wrist movement against the seven keys
//! 5. Feed strikes to the melody sequencer and the audio collaborator
//! 6. Optionally classify wrist strokes and estimate head rotation
//! 7. Emit a render snapshot
//!
//! Camera capture, keypoint detection, drawing and sound output are left to
//! collaborators; the engine only consumes [`pose::Frame`]s and calls an
//! [`audio::AudioTrigger`].
//!
//! # Examples
//!
//! ## Processing frames
//!
//! ```
//! use pose_piano::{
//!     audio::NullAudio,
//!     clock::ManualClock,
//!     config::Config,
//!     engine::{GestureEngine, Telemetry},
//!     pose::Frame,
//! };
//!
//! # fn main() -> pose_piano::Result<()> {
//! let clock = ManualClock::new(0);
//! let mut engine = GestureEngine::new(&Config::default(), Box::new(NullAudio), Box::new(clock.clone()))?;
//!
//! let report = engine.process_frame(&Frame::default(), Telemetry { fps: Some(30) });
//! assert!(report.events.is_empty());
//! assert_eq!(report.snapshot.keys.len(), 7);
//! # Ok(())
//! # }
//! ```
//!
//! ## Replaying a session
//!
//! ```
//! use pose_piano::{app::PianoApp, audio::NullAudio, config::Config, session::synthesize_performance};
//!
//! # fn main() -> pose_piano::Result<()> {
//! let config = Config::default();
//! let session = synthesize_performance(&config, 8)?;
//! let mut app = PianoApp::new(&config, Box::new(NullAudio))?;
//! let summary = app.run(&session);
//! assert_eq!(summary.matched_notes, 8);
//! # Ok(())
//! # }
//! ```
//!
//! ## Smoothing a wrist
//!
//! ```
//! use pose_piano::{geometry::Point, smoothing::create_smoother};
//!
//! # fn main() -> pose_piano::Result<()> {
//! let mut smoother = create_smoother("average:2")?;
//! smoother.smooth(Point::new(100.0, 400.0));
//! assert_eq!(smoother.smooth(Point::new(140.0, 480.0)), Point::new(120.0, 440.0));
//! # Ok(())
//! # }
//! ```

/// Points, sizes, rectangles and segment intersection
pub mod geometry;

/// Body parts, keypoints, persons and frames
pub mod pose;

/// Detector-space to display-space remapping
pub mod remap;

/// Directional stroke scoring
pub mod stroke;

/// Key hit-testing and debounce
pub mod keys;

/// Melody state machine and hints
pub mod sequencer;

/// Bounded wrist trajectories
pub mod trajectory;

/// Point smoothing for wrist and head values
pub mod smoothing;

/// Head rotation estimate
pub mod head_rotation;

/// Clock collaborator
pub mod clock;

/// Audio trigger collaborator
pub mod audio;

/// Per-frame orchestration
pub mod engine;

/// Recorded sessions
pub mod session;

/// Session replay application
pub mod app;

/// Error types and result handling
pub mod error;

/// Constants used throughout the library
pub mod constants;

/// Configuration management
pub mod config;

pub use error::{Error, Result};
