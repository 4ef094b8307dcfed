//! Audio trigger collaborators.
//!
//! The engine only requests "play key N"; voices, mixing and device access
//! belong to whoever implements [`AudioTrigger`]. Triggers are fire-and-forget
//! and must not block the frame pipeline.

use crate::constants::{KEY_COUNT, KEY_LABELS};
use log::{debug, info};
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread::{self, JoinHandle};

/// Receiver of key tone requests
pub trait AudioTrigger: Send {
    fn trigger(&self, key_index: usize);
}

/// Discards every trigger
#[derive(Debug, Clone, Copy, Default)]
pub struct NullAudio;

impl AudioTrigger for NullAudio {
    fn trigger(&self, _key_index: usize) {}
}

/// Logs the note name of every trigger
#[derive(Debug, Clone, Copy, Default)]
pub struct LoggingAudio;

impl AudioTrigger for LoggingAudio {
    fn trigger(&self, key_index: usize) {
        info!("♪ {}", KEY_LABELS[key_index % KEY_COUNT]);
    }
}

/// Forwards triggers over a channel to a sink running elsewhere
#[derive(Debug, Clone)]
pub struct ChannelAudio {
    tx: Sender<usize>,
}

impl ChannelAudio {
    #[must_use]
    pub fn new(tx: Sender<usize>) -> Self {
        Self { tx }
    }

    /// A trigger paired with the receiving end of its channel
    #[must_use]
    pub fn channel() -> (Self, Receiver<usize>) {
        let (tx, rx) = mpsc::channel();
        (Self { tx }, rx)
    }
}

impl AudioTrigger for ChannelAudio {
    fn trigger(&self, key_index: usize) {
        // A gone sink just means nobody is listening any more
        if self.tx.send(key_index).is_err() {
            debug!("Audio sink disconnected, dropping key {}", key_index);
        }
    }
}

/// Spawn `sink` on its own thread, fed by the returned [`ChannelAudio`].
/// The thread ends once every `ChannelAudio` clone has been dropped.
pub fn spawn_audio_sink<F>(mut sink: F) -> (ChannelAudio, JoinHandle<()>)
where
    F: FnMut(usize) + Send + 'static,
{
    let (audio, rx) = ChannelAudio::channel();
    let handle = thread::spawn(move || {
        for key in rx {
            sink(key);
        }
    });
    (audio, handle)
}
