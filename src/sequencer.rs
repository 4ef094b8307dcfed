//! Melody sequencing: which note the player must hit next, rest skipping,
//! round wraparound and the look-ahead hint window.

use crate::{
    constants::{KEY_COUNT, REST_NOTE},
    error::{Error, Result},
};
use log::debug;
use serde::Serialize;

/// Position in the melody
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SequencerState {
    pub note_index: usize,
    pub round: u32,
}

/// One upcoming note in the hint window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct HintEntry {
    /// 1-based position in the endless play order across rounds
    pub play_order: u64,
    /// Melody value, 0 for a rest
    pub note: u8,
    /// Offset of this entry within its hint group
    pub offset: usize,
}

impl HintEntry {
    /// Key that plays this note, `None` for rests
    #[must_use]
    pub fn key_index(&self) -> Option<usize> {
        (self.note != REST_NOTE).then(|| usize::from(self.note) - 1)
    }
}

/// State machine over a fixed melody
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteSequencer {
    melody: Vec<u8>,
    hint_group_size: usize,
    state: SequencerState,
}

/// Check that a melody is playable
///
/// # Errors
///
/// Returns an error if the melody is empty, holds values above the key count,
/// or consists only of rests.
pub fn validate_melody(melody: &[u8]) -> Result<()> {
    if melody.is_empty() {
        return Err(Error::InvalidMelody("Melody must not be empty".to_string()));
    }
    if let Some((i, note)) = melody.iter().enumerate().find(|(_, &n)| usize::from(n) > KEY_COUNT) {
        return Err(Error::InvalidMelody(format!(
            "Note {note} at position {i} is outside 0..={KEY_COUNT}"
        )));
    }
    if melody.iter().all(|&n| n == REST_NOTE) {
        return Err(Error::InvalidMelody("Melody contains only rests".to_string()));
    }
    Ok(())
}

impl NoteSequencer {
    /// Create a sequencer positioned at the first playable note of round 0.
    ///
    /// # Errors
    ///
    /// Returns an error for an unplayable melody (see [`validate_melody`]) or a
    /// zero hint group size.
    pub fn new(melody: Vec<u8>, hint_group_size: usize) -> Result<Self> {
        validate_melody(&melody)?;
        if hint_group_size == 0 {
            return Err(Error::InvalidInput("Hint group size must be greater than 0".to_string()));
        }
        let mut sequencer = Self {
            melody,
            hint_group_size,
            state: SequencerState { note_index: 0, round: 0 },
        };
        sequencer.skip_rests();
        Ok(sequencer)
    }

    #[must_use]
    pub fn melody(&self) -> &[u8] {
        &self.melody
    }

    #[must_use]
    pub const fn state(&self) -> SequencerState {
        self.state
    }

    #[must_use]
    pub const fn current_index(&self) -> usize {
        self.state.note_index
    }

    #[must_use]
    pub const fn current_round(&self) -> u32 {
        self.state.round
    }

    /// Note number (1..=7) the player must hit next
    #[must_use]
    pub fn current_expected_note(&self) -> u8 {
        self.melody[self.state.note_index]
    }

    /// Key index the player must hit next
    #[must_use]
    pub fn current_expected_key(&self) -> usize {
        usize::from(self.current_expected_note()).saturating_sub(1)
    }

    /// Move past rests so the expected note is always playable. Also applied
    /// at start and after wraparound, where a leading rest would otherwise
    /// wait for a key that does not exist.
    fn skip_rests(&mut self) {
        while self.state.note_index < self.melody.len() && self.melody[self.state.note_index] == REST_NOTE {
            self.state.note_index += 1;
        }
    }

    /// Feed a key trigger. A match advances past the note and any rests that
    /// follow, wrapping into the next round at the end of the melody. A
    /// mismatch leaves the state untouched.
    pub fn on_key_triggered(&mut self, key_index: usize) -> bool {
        if usize::from(self.current_expected_note()) != key_index + 1 {
            return false;
        }

        self.state.note_index += 1;
        self.skip_rests();
        if self.state.note_index >= self.melody.len() {
            self.state.round += 1;
            self.state.note_index = 0;
            self.skip_rests();
            debug!("Melody complete, starting round {}", self.state.round);
        }
        true
    }

    /// Remaining entries of the current hint group, from the current note to
    /// the end of its group
    #[must_use]
    pub fn hint_window(&self) -> Vec<HintEntry> {
        let len = self.melody.len();
        let index = self.state.note_index;
        let group_start = (index / self.hint_group_size) * self.hint_group_size;
        let group_end = (group_start + self.hint_group_size).min(len);
        let round_base = u64::from(self.state.round) * len as u64;

        (index..group_end)
            .map(|i| HintEntry {
                play_order: round_base + i as u64 + 1,
                note: self.melody[i],
                offset: i - group_start,
            })
            .collect()
    }

    /// Back to the start of round 0
    pub fn restart(&mut self) {
        self.state = SequencerState { note_index: 0, round: 0 };
        self.skip_rests();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_skip_and_wrap() {
        let mut seq = NoteSequencer::new(vec![1, 0, 2, 0], 4).unwrap();
        assert_eq!(seq.state(), SequencerState { note_index: 0, round: 0 });
        assert!(seq.on_key_triggered(0));
        assert_eq!(seq.current_index(), 2);
        assert!(seq.on_key_triggered(1));
        assert_eq!(seq.state(), SequencerState { note_index: 0, round: 1 });
    }

    #[test]
    fn test_mismatch_is_ignored() {
        let mut seq = NoteSequencer::new(vec![3, 4], 4).unwrap();
        assert!(!seq.on_key_triggered(0));
        assert!(!seq.on_key_triggered(6));
        assert_eq!(seq.current_index(), 0);
        assert_eq!(seq.current_expected_note(), 3);
        assert_eq!(seq.current_expected_key(), 2);
    }

    #[test]
    fn test_runs_of_rests_are_all_skipped() {
        let mut seq = NoteSequencer::new(vec![1, 0, 0, 0, 5], 4).unwrap();
        assert!(seq.on_key_triggered(0));
        assert_eq!(seq.current_index(), 4);
        assert_eq!(seq.current_expected_note(), 5);
    }

    #[test]
    fn test_leading_rests_skipped_at_start_and_wrap() {
        let mut seq = NoteSequencer::new(vec![0, 0, 2, 3], 4).unwrap();
        assert_eq!(seq.current_index(), 2);
        assert!(seq.on_key_triggered(1));
        assert!(seq.on_key_triggered(2));
        assert_eq!(seq.state(), SequencerState { note_index: 2, round: 1 });
    }

    #[test]
    fn test_repeated_notes_need_repeated_hits() {
        let mut seq = NoteSequencer::new(vec![1, 1, 5], 4).unwrap();
        assert!(seq.on_key_triggered(0));
        assert_eq!(seq.current_index(), 1);
        assert!(seq.on_key_triggered(0));
        assert_eq!(seq.current_index(), 2);
    }

    #[test]
    fn test_hint_window_within_group() {
        let mut seq = NoteSequencer::new(vec![1, 1, 5, 5, 6, 6, 5, 0, 4], 4).unwrap();
        let hints = seq.hint_window();
        assert_eq!(hints.len(), 4);
        assert_eq!(hints[0], HintEntry { play_order: 1, note: 1, offset: 0 });
        assert_eq!(hints[3], HintEntry { play_order: 4, note: 5, offset: 3 });

        seq.on_key_triggered(0);
        seq.on_key_triggered(0);
        let hints = seq.hint_window();
        assert_eq!(hints.len(), 2);
        assert_eq!(hints[0], HintEntry { play_order: 3, note: 5, offset: 2 });
    }

    #[test]
    fn test_hint_window_includes_rests_and_last_short_group() {
        let mut seq = NoteSequencer::new(vec![1, 2, 3, 4, 5, 0], 4).unwrap();
        for k in 0..4 {
            assert!(seq.on_key_triggered(k));
        }
        let hints = seq.hint_window();
        assert_eq!(hints.len(), 2);
        assert_eq!(hints[1].note, 0);
        assert_eq!(hints[1].key_index(), None);
        assert_eq!(hints[0].key_index(), Some(4));
    }

    #[test]
    fn test_play_order_counts_rounds() {
        let mut seq = NoteSequencer::new(vec![1, 2], 4).unwrap();
        seq.on_key_triggered(0);
        seq.on_key_triggered(1);
        let hints = seq.hint_window();
        assert_eq!(hints[0].play_order, 3);
        assert_eq!(hints[1].play_order, 4);
    }

    #[test]
    fn test_restart() {
        let mut seq = NoteSequencer::new(vec![1, 2], 4).unwrap();
        seq.on_key_triggered(0);
        seq.on_key_triggered(1);
        seq.on_key_triggered(0);
        seq.restart();
        assert_eq!(seq.state(), SequencerState { note_index: 0, round: 0 });
    }

    #[test]
    fn test_invalid_melodies_rejected() {
        assert!(matches!(NoteSequencer::new(vec![], 4), Err(Error::InvalidMelody(_))));
        assert!(matches!(NoteSequencer::new(vec![0, 0], 4), Err(Error::InvalidMelody(_))));
        assert!(matches!(NoteSequencer::new(vec![1, 8], 4), Err(Error::InvalidMelody(_))));
        assert!(NoteSequencer::new(vec![1], 0).is_err());
    }
}
