use async_trait::async_trait;
use booktape::infrastructure::audio::{AudioClip, AudioCodec, AudioError};
use booktape::infrastructure::repositories::TtsRepository;
use std::collections::HashMap;
use std::sync::Mutex;

/// Fake audio lasts one second per synthesized character.
pub const MS_PER_CHAR: u64 = 1000;

const HEADER_LEN: usize = 8;

/// Fake clip: `<duration_ms as 8 LE bytes><text bytes>`.
pub fn fake_audio(text: &str) -> Vec<u8> {
    let duration = text.chars().count() as u64 * MS_PER_CHAR;
    let mut bytes = duration.to_le_bytes().to_vec();
    bytes.extend_from_slice(text.as_bytes());
    bytes
}

/// Split a merged segment back into the chunk texts it contains, in order.
///
/// Only valid for ASCII chunk texts.
pub fn decode_segment(mut bytes: &[u8]) -> Vec<String> {
    let mut texts = Vec::new();
    while bytes.len() >= HEADER_LEN {
        let (header, rest) = bytes.split_at(HEADER_LEN);
        let duration = u64::from_le_bytes(header.try_into().unwrap());
        let len = (duration / MS_PER_CHAR) as usize;
        let (text, rest) = rest.split_at(len);
        texts.push(String::from_utf8(text.to_vec()).unwrap());
        bytes = rest;
    }
    texts
}

/// TTS provider that answers with fake clips and records every request.
#[derive(Default)]
pub struct FakeTts {
    calls: Mutex<Vec<String>>,
    failures: Mutex<HashMap<String, u32>>,
}

impl FakeTts {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reject every request for `text` until `heal` is called.
    pub fn fail_always(&self, text: &str) {
        self.failures
            .lock()
            .unwrap()
            .insert(text.to_string(), u32::MAX);
    }

    /// Reject the next `times` requests for `text`.
    pub fn fail_times(&self, text: &str, times: u32) {
        self.failures
            .lock()
            .unwrap()
            .insert(text.to_string(), times);
    }

    pub fn heal(&self) {
        self.failures.lock().unwrap().clear();
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl TtsRepository for FakeTts {
    async fn synthesize(&self, text: &str, _voice: &str) -> Result<Vec<u8>, String> {
        self.calls.lock().unwrap().push(text.to_string());

        let should_fail = match self.failures.lock().unwrap().get_mut(text) {
            Some(remaining) if *remaining > 0 => {
                if *remaining != u32::MAX {
                    *remaining -= 1;
                }
                true
            }
            _ => false,
        };

        if should_fail {
            return Err("OpenAI error: 503 Service Unavailable".to_string());
        }
        Ok(fake_audio(text))
    }

    fn provider(&self) -> &'static str {
        "fake"
    }

    fn max_input_chars(&self) -> usize {
        4096
    }
}

/// Reads durations from the fake clip header; encodes by concatenation.
pub struct FakeCodec;

impl AudioCodec for FakeCodec {
    fn decode(&self, bytes: Vec<u8>) -> Result<AudioClip, AudioError> {
        let header: [u8; HEADER_LEN] = bytes
            .get(..HEADER_LEN)
            .and_then(|h| h.try_into().ok())
            .ok_or_else(|| AudioError::Decode("clip shorter than its header".to_string()))?;
        Ok(AudioClip {
            duration_ms: u64::from_le_bytes(header),
            bytes,
        })
    }

    fn encode(&self, clips: &[AudioClip]) -> Result<Vec<u8>, AudioError> {
        if clips.is_empty() {
            return Err(AudioError::EmptySegment);
        }
        Ok(clips.iter().flat_map(|c| c.bytes.iter().copied()).collect())
    }
}
