use std::io::{Cursor, ErrorKind};

use symphonia::core::errors::Error as SymphoniaError;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;
use symphonia::core::units::TimeBase;

use super::{AudioClip, AudioCodec, AudioError};

/// MP3 codec for speech API output.
///
/// Duration is the sum of packet durations on the default track. Segments are built by
/// concatenating frame streams, which keeps every clip byte-identical inside the segment.
#[derive(Debug, Clone, Copy, Default)]
pub struct Mp3Codec;

impl Mp3Codec {
    pub fn new() -> Self {
        Self
    }

    fn measure_ms(bytes: &[u8]) -> Result<u64, AudioError> {
        let source = MediaSourceStream::new(Box::new(Cursor::new(bytes.to_vec())), Default::default());
        let mut hint = Hint::new();
        hint.with_extension("mp3");

        let probed = symphonia::default::get_probe()
            .format(
                &hint,
                source,
                &FormatOptions::default(),
                &MetadataOptions::default(),
            )
            .map_err(|e| AudioError::Decode(e.to_string()))?;
        let mut format = probed.format;

        let track = format.default_track().ok_or(AudioError::NoTrack)?;
        let track_id = track.id;
        let time_base = match (track.codec_params.time_base, track.codec_params.sample_rate) {
            (Some(tb), _) => tb,
            (None, Some(rate)) => TimeBase::new(1, rate),
            (None, None) => return Err(AudioError::NoTrack),
        };

        let mut timestamp: u64 = 0;
        loop {
            match format.next_packet() {
                Ok(packet) => {
                    if packet.track_id() == track_id {
                        timestamp += packet.dur;
                    }
                }
                Err(SymphoniaError::IoError(e)) if e.kind() == ErrorKind::UnexpectedEof => break,
                Err(SymphoniaError::ResetRequired) => break,
                Err(e) => return Err(AudioError::Decode(e.to_string())),
            }
        }

        let time = time_base.calc_time(timestamp);
        Ok(time.seconds * 1000 + (time.frac * 1000.0).round() as u64)
    }
}

impl AudioCodec for Mp3Codec {
    fn decode(&self, bytes: Vec<u8>) -> Result<AudioClip, AudioError> {
        if bytes.is_empty() {
            return Err(AudioError::Decode("empty payload".to_string()));
        }
        let duration_ms = Self::measure_ms(&bytes)?;
        Ok(AudioClip { bytes, duration_ms })
    }

    fn encode(&self, clips: &[AudioClip]) -> Result<Vec<u8>, AudioError> {
        if clips.is_empty() {
            return Err(AudioError::EmptySegment);
        }
        let total: usize = clips.iter().map(|c| c.bytes.len()).sum();
        let mut merged = Vec::with_capacity(total);
        for clip in clips {
            merged.extend_from_slice(&clip.bytes);
        }
        Ok(merged)
    }
}
