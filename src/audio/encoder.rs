use crate::audio::error::AudioError;
use crate::audio::frame::{AudioFrame, FRAME_CHANNELS, FRAME_LEN, FRAME_SAMPLE_RATE};
use async_trait::async_trait;
use rubato::{
    Resampler, SincFixedIn, SincInterpolationParameters, SincInterpolationType, WindowFunction,
};
use std::collections::VecDeque;
use std::fs::File;
use std::path::Path;
use symphonia::core::audio::{AudioBuffer, AudioBufferRef, Signal};
use symphonia::core::codecs::{Decoder, DecoderOptions, CODEC_TYPE_NULL};
use symphonia::core::errors::Error as SymphoniaError;
use symphonia::core::formats::{FormatOptions, FormatReader};
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;
use symphonia::core::sample::Sample;
use tracing::{debug, warn};

const LOG_TARGET: &str = "voxbot::audio::encoder";

/// Chunk size fed to the resampler per process call.
const RESAMPLER_CHUNK_SIZE: usize = 1024;

/// Lazy, finite, non-restartable sequence of transport-ready frames for one
/// playable file. End of sequence is natural completion; a mid-sequence
/// error is abnormal termination and the caller treats it as completion.
#[async_trait]
pub trait FrameSource: Send {
    async fn next_frame(&mut self) -> Result<Option<AudioFrame>, AudioError>;
}

/// Collaborator that opens a playable file and yields its audio frames.
#[async_trait]
pub trait AudioFrameEncoder: Send + Sync {
    async fn open(&self, path: &Path) -> Result<Box<dyn FrameSource>, AudioError>;
}

/// Encoder backed by Symphonia decoding plus Rubato resampling to the
/// canonical 48 kHz stereo frame format.
#[derive(Debug, Default)]
pub struct SymphoniaEncoder;

impl SymphoniaEncoder {
    pub fn new() -> Self {
        SymphoniaEncoder
    }
}

#[async_trait]
impl AudioFrameEncoder for SymphoniaEncoder {
    async fn open(&self, path: &Path) -> Result<Box<dyn FrameSource>, AudioError> {
        debug!(target: LOG_TARGET, path = %path.display(), "Setting up Symphonia format reader and decoder");
        let file = File::open(path)?;
        let mss = MediaSourceStream::new(Box::new(file), Default::default());

        let mut hint = Hint::new();
        if let Some(extension) = path.extension().and_then(|e| e.to_str()) {
            hint.with_extension(extension);
        }

        let probed = symphonia::default::get_probe().format(
            &hint,
            mss,
            &FormatOptions::default(),
            &MetadataOptions::default(),
        )?;
        let reader = probed.format;

        let track = reader
            .tracks()
            .iter()
            .find(|t| t.codec_params.codec != CODEC_TYPE_NULL)
            .ok_or_else(|| {
                AudioError::UnsupportedFormat("no suitable audio track found".to_string())
            })?
            .clone();

        let decoder =
            symphonia::default::get_codecs().make(&track.codec_params, &DecoderOptions::default())?;

        let source_rate = track
            .codec_params
            .sample_rate
            .ok_or(AudioError::MissingCodecParams("sample rate"))?;

        let resampler = if source_rate != FRAME_SAMPLE_RATE {
            debug!(target: LOG_TARGET, source_rate, target_rate = FRAME_SAMPLE_RATE, "Sample rate mismatch, initializing resampler");
            Some(build_resampler(source_rate)?)
        } else {
            None
        };

        Ok(Box::new(SymphoniaFrameSource {
            reader,
            decoder,
            track_id: track.id,
            resampler,
            input_buf: vec![Vec::new(); FRAME_CHANNELS],
            pending: VecDeque::new(),
            end_of_stream: false,
        }))
    }
}

fn build_resampler(source_rate: u32) -> Result<SincFixedIn<f32>, AudioError> {
    let params = SincInterpolationParameters {
        sinc_len: 256,
        f_cutoff: 0.95,
        interpolation: SincInterpolationType::Linear,
        oversampling_factor: 256,
        window: WindowFunction::BlackmanHarris2,
    };
    SincFixedIn::<f32>::new(
        f64::from(FRAME_SAMPLE_RATE) / f64::from(source_rate),
        2.0,
        params,
        RESAMPLER_CHUNK_SIZE,
        FRAME_CHANNELS,
    )
    .map_err(|e| AudioError::ResamplingError(format!("failed to create resampler: {}", e)))
}

struct SymphoniaFrameSource {
    reader: Box<dyn FormatReader>,
    decoder: Box<dyn Decoder>,
    track_id: u32,
    resampler: Option<SincFixedIn<f32>>,
    // Stereo planes waiting for the resampler to accumulate a full chunk.
    input_buf: Vec<Vec<f32>>,
    // Interleaved S16 samples not yet cut into frames.
    pending: VecDeque<i16>,
    end_of_stream: bool,
}

#[async_trait]
impl FrameSource for SymphoniaFrameSource {
    async fn next_frame(&mut self) -> Result<Option<AudioFrame>, AudioError> {
        while self.pending.len() < FRAME_LEN && !self.end_of_stream {
            self.decode_more()?;
            // Decoding is synchronous; stay cooperative inside the task.
            tokio::task::yield_now().await;
        }

        if self.pending.len() >= FRAME_LEN {
            let samples: Vec<i16> = self.pending.drain(..FRAME_LEN).collect();
            return Ok(Some(AudioFrame::new(samples)));
        }

        if !self.pending.is_empty() {
            // Final short frame: pad with silence.
            let mut samples: Vec<i16> = self.pending.drain(..).collect();
            samples.resize(FRAME_LEN, 0);
            return Ok(Some(AudioFrame::new(samples)));
        }

        Ok(None)
    }
}

impl SymphoniaFrameSource {
    /// Decodes one packet worth of audio into `pending`, or settles
    /// end-of-stream.
    fn decode_more(&mut self) -> Result<(), AudioError> {
        let packet = match self.reader.next_packet() {
            Ok(packet) => packet,
            Err(SymphoniaError::IoError(ref e))
                if e.kind() == std::io::ErrorKind::UnexpectedEof =>
            {
                self.finish()?;
                return Ok(());
            }
            Err(SymphoniaError::ResetRequired) => {
                self.finish()?;
                return Ok(());
            }
            Err(e) => return Err(e.into()),
        };

        if packet.track_id() != self.track_id {
            return Ok(());
        }

        let decoded = match self.decoder.decode(&packet) {
            Ok(decoded) => decoded,
            Err(SymphoniaError::DecodeError(msg)) => {
                warn!(target: LOG_TARGET, "Skipping undecodable packet: {}", msg);
                return Ok(());
            }
            Err(e) => return Err(e.into()),
        };

        let stereo = mix_to_stereo(buffer_to_f32_planes(&decoded));
        if stereo[0].is_empty() {
            return Ok(());
        }

        if self.resampler.is_some() {
            for (buf, plane) in self.input_buf.iter_mut().zip(stereo.into_iter()) {
                buf.extend(plane);
            }
            self.drain_resampler(false)?;
        } else {
            interleave_into(&mut self.pending, &stereo);
        }
        Ok(())
    }

    /// Flushes any buffered input through the resampler and marks the
    /// stream finished.
    fn finish(&mut self) -> Result<(), AudioError> {
        if self.end_of_stream {
            return Ok(());
        }
        self.drain_resampler(true)?;
        self.end_of_stream = true;
        Ok(())
    }

    fn drain_resampler(&mut self, flush: bool) -> Result<(), AudioError> {
        let resampler = match self.resampler.as_mut() {
            Some(resampler) => resampler,
            None => return Ok(()),
        };

        loop {
            let needed = resampler.input_frames_next();
            if self.input_buf[0].len() < needed {
                break;
            }
            let chunk: Vec<Vec<f32>> = self
                .input_buf
                .iter_mut()
                .map(|ch| ch.drain(..needed).collect())
                .collect();
            let output = resampler
                .process(&chunk, None)
                .map_err(|e| AudioError::ResamplingError(e.to_string()))?;
            interleave_into(&mut self.pending, &output);
        }

        if flush {
            if !self.input_buf[0].is_empty() {
                let chunk: Vec<Vec<f32>> = self
                    .input_buf
                    .iter_mut()
                    .map(|ch| ch.drain(..).collect())
                    .collect();
                let output = resampler
                    .process_partial(Some(&chunk), None)
                    .map_err(|e| AudioError::ResamplingError(e.to_string()))?;
                interleave_into(&mut self.pending, &output);
            }
            let tail = resampler
                .process_partial(None::<&[Vec<f32>]>, None)
                .map_err(|e| AudioError::ResamplingError(e.to_string()))?;
            interleave_into(&mut self.pending, &tail);
        }
        Ok(())
    }
}

/// Converts any decoded Symphonia buffer into per-channel f32 planes.
pub(crate) fn buffer_to_f32_planes(buf: &AudioBufferRef) -> Vec<Vec<f32>> {
    match buf {
        AudioBufferRef::U8(b) => convert_planes(b, |s: u8| (f32::from(s) - 128.0) / 128.0),
        AudioBufferRef::U16(b) => convert_planes(b, |s: u16| (f32::from(s) - 32768.0) / 32768.0),
        AudioBufferRef::U24(b) => {
            convert_planes(b, |s| (s.0 as f32 - 8_388_608.0) / 8_388_608.0)
        }
        AudioBufferRef::U32(b) => {
            convert_planes(b, |s: u32| ((f64::from(s) - 2_147_483_648.0) / 2_147_483_648.0) as f32)
        }
        AudioBufferRef::S8(b) => convert_planes(b, |s: i8| f32::from(s) / 128.0),
        AudioBufferRef::S16(b) => convert_planes(b, |s: i16| f32::from(s) / 32768.0),
        AudioBufferRef::S24(b) => convert_planes(b, |s| s.0 as f32 / 8_388_608.0),
        AudioBufferRef::S32(b) => {
            convert_planes(b, |s: i32| (f64::from(s) / 2_147_483_648.0) as f32)
        }
        AudioBufferRef::F32(b) => convert_planes(b, |s: f32| s),
        AudioBufferRef::F64(b) => convert_planes(b, |s: f64| s as f32),
    }
}

fn convert_planes<S: Sample + Copy>(
    buf: &AudioBuffer<S>,
    convert: impl Fn(S) -> f32,
) -> Vec<Vec<f32>> {
    let channels = buf.spec().channels.count();
    (0..channels)
        .map(|ch| buf.chan(ch).iter().map(|&s| convert(s)).collect())
        .collect()
}

/// Reduces arbitrary channel layouts to exactly two planes: mono is
/// duplicated, extra channels beyond the first two are dropped.
pub(crate) fn mix_to_stereo(mut planes: Vec<Vec<f32>>) -> Vec<Vec<f32>> {
    match planes.len() {
        0 => vec![Vec::new(), Vec::new()],
        1 => {
            let mono = planes.remove(0);
            vec![mono.clone(), mono]
        }
        2 => planes,
        _ => {
            planes.truncate(2);
            planes
        }
    }
}

/// Interleaves stereo f32 planes into S16 samples appended to `pending`.
pub(crate) fn interleave_into(pending: &mut VecDeque<i16>, planes: &[Vec<f32>]) {
    if planes.len() < FRAME_CHANNELS {
        return;
    }
    let frames = planes[0].len().min(planes[1].len());
    for i in 0..frames {
        for plane in planes.iter().take(FRAME_CHANNELS) {
            let sample = (plane[i] * 32767.0).clamp(-32768.0, 32767.0) as i16;
            pending.push_back(sample);
        }
    }
}
