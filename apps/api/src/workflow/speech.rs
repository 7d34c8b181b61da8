//! Single-slot speech playback.
//!
//! idle → loading(text) → playing(text) → idle. Starting a new clip always
//! preempts the current one. Every start gets a fresh playback id; callbacks
//! carrying an older id (late synthesis results, stale "ended" events) are
//! ignored.

use serde::Serialize;

use crate::errors::AppError;

/// Synthesized speech is 16-bit little-endian PCM at this rate.
pub const SPEECH_SAMPLE_RATE: u32 = 24_000;
pub const SPEECH_CHANNELS: u16 = 1;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "camelCase")]
pub enum SpeechState {
    #[default]
    Idle,
    #[serde(rename_all = "camelCase")]
    Loading {
        playback_id: u64,
        text: String,
    },
    #[serde(rename_all = "camelCase")]
    Playing {
        playback_id: u64,
        text: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Toggle {
    /// The same text was active; playback stopped.
    Stopped,
    /// A new playback started loading; synthesize `text` for this id.
    Started { playback_id: u64, text: String },
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct SpeechController {
    #[serde(flatten)]
    state: SpeechState,
    #[serde(skip)]
    last_id: u64,
}

impl SpeechController {
    pub fn state(&self) -> &SpeechState {
        &self.state
    }

    fn active_text(&self) -> Option<&str> {
        match &self.state {
            SpeechState::Idle => None,
            SpeechState::Loading { text, .. } | SpeechState::Playing { text, .. } => Some(text),
        }
    }

    fn active_id(&self) -> Option<u64> {
        match &self.state {
            SpeechState::Idle => None,
            SpeechState::Loading { playback_id, .. } | SpeechState::Playing { playback_id, .. } => {
                Some(*playback_id)
            }
        }
    }

    /// Stops if `text` is already loading or playing; otherwise preempts
    /// whatever is active and starts loading `text`.
    pub fn toggle(&mut self, text: &str) -> Toggle {
        if self.active_text() == Some(text) {
            self.stop();
            return Toggle::Stopped;
        }

        self.stop();
        self.last_id += 1;
        self.state = SpeechState::Loading {
            playback_id: self.last_id,
            text: text.to_string(),
        };
        Toggle::Started {
            playback_id: self.last_id,
            text: text.to_string(),
        }
    }

    pub fn stop(&mut self) {
        self.state = SpeechState::Idle;
    }

    /// Audio for `playback_id` is ready. Returns false if that playback was
    /// stopped or preempted in the meantime.
    pub fn loaded(&mut self, playback_id: u64) -> bool {
        match std::mem::take(&mut self.state) {
            SpeechState::Loading { playback_id: id, text } if id == playback_id => {
                self.state = SpeechState::Playing { playback_id, text };
                true
            }
            other => {
                self.state = other;
                false
            }
        }
    }

    /// Synthesis or decoding failed. Returns to idle only if still current.
    pub fn failed(&mut self, playback_id: u64) -> bool {
        if self.active_id() == Some(playback_id) {
            self.stop();
            true
        } else {
            false
        }
    }

    /// Natural completion. Ignored unless `playback_id` is the clip playing now.
    pub fn ended(&mut self, playback_id: u64) -> bool {
        match self.state {
            SpeechState::Playing { playback_id: id, .. } if id == playback_id => {
                self.stop();
                true
            }
            _ => false,
        }
    }
}

/// Decoded speech clip.
#[derive(Debug, Clone, PartialEq)]
pub struct AudioClip {
    pub sample_rate: u32,
    pub channels: u16,
    /// Interleaved samples in [-1.0, 1.0).
    pub samples: Vec<f32>,
}

impl AudioClip {
    /// Decodes 16-bit little-endian PCM.
    pub fn from_pcm16(bytes: &[u8], sample_rate: u32, channels: u16) -> Result<Self, AppError> {
        if channels == 0 || sample_rate == 0 {
            return Err(AppError::Audio("sample rate and channel count must be positive".to_string()));
        }
        let frame_bytes = 2 * channels as usize;
        if bytes.len() % frame_bytes != 0 {
            return Err(AppError::Audio(format!(
                "PCM length {} is not a multiple of the {}-byte frame size",
                bytes.len(),
                frame_bytes
            )));
        }

        let samples = bytes
            .chunks_exact(2)
            .map(|pair| i16::from_le_bytes([pair[0], pair[1]]) as f32 / 32768.0)
            .collect();

        Ok(Self {
            sample_rate,
            channels,
            samples,
        })
    }

    pub fn frames(&self) -> usize {
        self.samples.len() / self.channels as usize
    }

    pub fn duration_ms(&self) -> u64 {
        self.frames() as u64 * 1000 / self.sample_rate as u64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn started_id(t: Toggle) -> u64 {
        match t {
            Toggle::Started { playback_id, .. } => playback_id,
            Toggle::Stopped => panic!("expected a start"),
        }
    }

    #[test]
    fn test_toggle_same_text_twice_returns_to_idle() {
        let mut c = SpeechController::default();
        let id = started_id(c.toggle("X"));
        assert!(c.loaded(id));
        assert_eq!(c.toggle("X"), Toggle::Stopped);
        assert_eq!(c.state(), &SpeechState::Idle);
    }

    #[test]
    fn test_toggle_while_loading_same_text_stops() {
        let mut c = SpeechController::default();
        let id = started_id(c.toggle("X"));
        assert_eq!(c.toggle("X"), Toggle::Stopped);
        assert!(!c.loaded(id));
        assert_eq!(c.state(), &SpeechState::Idle);
    }

    #[test]
    fn test_new_text_preempts_current() {
        let mut c = SpeechController::default();
        let first = started_id(c.toggle("X"));
        c.loaded(first);
        let second = started_id(c.toggle("Y"));
        assert_ne!(first, second);
        assert!(matches!(c.state(), SpeechState::Loading { text, .. } if text == "Y"));
    }

    #[test]
    fn test_stale_ended_is_ignored() {
        let mut c = SpeechController::default();
        let first = started_id(c.toggle("X"));
        c.loaded(first);
        let second = started_id(c.toggle("Y"));
        c.loaded(second);

        assert!(!c.ended(first));
        assert!(matches!(c.state(), SpeechState::Playing { playback_id, .. } if *playback_id == second));
        assert!(c.ended(second));
        assert_eq!(c.state(), &SpeechState::Idle);
    }

    #[test]
    fn test_failure_only_resets_current_playback() {
        let mut c = SpeechController::default();
        let first = started_id(c.toggle("X"));
        let second = started_id(c.toggle("Y"));
        assert!(!c.failed(first));
        assert!(c.failed(second));
        assert_eq!(c.state(), &SpeechState::Idle);
    }

    #[test]
    fn test_ids_survive_stop() {
        let mut c = SpeechController::default();
        let first = started_id(c.toggle("X"));
        c.stop();
        let second = started_id(c.toggle("X"));
        assert!(second > first);
    }

    #[test]
    fn test_decode_pcm16_mono() {
        let bytes = [0x00, 0x00, 0x00, 0x40, 0x00, 0x80];
        let clip = AudioClip::from_pcm16(&bytes, 24_000, 1).unwrap();
        assert_eq!(clip.samples, vec![0.0, 0.5, -1.0]);
        assert_eq!(clip.frames(), 3);
    }

    #[test]
    fn test_decode_duration() {
        let bytes = vec![0u8; 48_000];
        let clip = AudioClip::from_pcm16(&bytes, SPEECH_SAMPLE_RATE, SPEECH_CHANNELS).unwrap();
        assert_eq!(clip.duration_ms(), 1000);
    }

    #[test]
    fn test_decode_rejects_partial_frame() {
        assert!(matches!(
            AudioClip::from_pcm16(&[0x01, 0x02, 0x03], 24_000, 1),
            Err(AppError::Audio(_))
        ));
    }
}
