pub mod mp3;

pub use mp3::Mp3Codec;

#[derive(Debug, thiserror::Error)]
pub enum AudioError {
    #[error("unreadable audio: {0}")]
    Decode(String),

    #[error("audio has no playable track")]
    NoTrack,

    #[error("cannot encode an empty segment")]
    EmptySegment,
}

/// Encoded audio together with its measured length.
#[derive(Debug, Clone, PartialEq)]
pub struct AudioClip {
    pub bytes: Vec<u8>,
    pub duration_ms: u64,
}

/// Decoding, duration measurement and re-encoding of synthesized audio.
pub trait AudioCodec: Send + Sync {
    /// Parse `bytes` and measure their duration.
    fn decode(&self, bytes: Vec<u8>) -> Result<AudioClip, AudioError>;

    /// Join clips, in order, into one playable file.
    fn encode(&self, clips: &[AudioClip]) -> Result<Vec<u8>, AudioError>;
}
