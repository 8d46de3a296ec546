//! Audio frame pipeline: decoding playable files into fixed-size 48 kHz
//! stereo S16 frames and the transport they are streamed into.

pub mod encoder;
pub mod error;
pub mod frame;
pub mod transport;
#[cfg(test)]
mod tests;

pub use encoder::{AudioFrameEncoder, FrameSource, SymphoniaEncoder};
pub use error::AudioError;
pub use frame::{
    AudioFrame, FRAME_CHANNELS, FRAME_DURATION_MS, FRAME_LEN, FRAME_SAMPLE_RATE,
    SAMPLES_PER_FRAME,
};
pub use transport::{PcmFileSink, VoiceConnection};
