/// Canonical output sample rate in Hz.
pub const FRAME_SAMPLE_RATE: u32 = 48_000;

/// Canonical channel count (interleaved stereo).
pub const FRAME_CHANNELS: usize = 2;

/// Duration of a single frame in milliseconds.
pub const FRAME_DURATION_MS: u32 = 20;

/// Samples per channel in one frame.
pub const SAMPLES_PER_FRAME: usize =
    (FRAME_SAMPLE_RATE as usize / 1000) * FRAME_DURATION_MS as usize;

/// Total interleaved samples in one frame.
pub const FRAME_LEN: usize = SAMPLES_PER_FRAME * FRAME_CHANNELS;

/// One transport-ready unit of audio: 20 ms of interleaved S16 stereo at
/// 48 kHz.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioFrame {
    pub samples: Vec<i16>,
}

impl AudioFrame {
    pub fn new(samples: Vec<i16>) -> Self {
        AudioFrame { samples }
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}
