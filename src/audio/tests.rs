//! Tests for frame geometry, sample conversion helpers and the PCM file
//! transport.

use super::encoder::{interleave_into, mix_to_stereo, SymphoniaEncoder};
use super::*;
use std::collections::VecDeque;

#[test]
fn test_frame_geometry() {
    assert_eq!(SAMPLES_PER_FRAME, 960);
    assert_eq!(FRAME_LEN, 1920);
}

#[test]
fn test_mix_to_stereo_duplicates_mono() {
    let planes = mix_to_stereo(vec![vec![0.1, 0.2, 0.3]]);
    assert_eq!(planes.len(), 2);
    assert_eq!(planes[0], planes[1]);
    assert_eq!(planes[0], vec![0.1, 0.2, 0.3]);
}

#[test]
fn test_mix_to_stereo_drops_extra_channels() {
    let planes = mix_to_stereo(vec![vec![0.1], vec![0.2], vec![0.9]]);
    assert_eq!(planes.len(), 2);
    assert_eq!(planes[0], vec![0.1]);
    assert_eq!(planes[1], vec![0.2]);
}

#[test]
fn test_interleave_clamps_out_of_range_samples() {
    let mut pending = VecDeque::new();
    interleave_into(&mut pending, &[vec![2.0, -2.0], vec![0.0, 0.5]]);

    let samples: Vec<i16> = pending.into_iter().collect();
    assert_eq!(samples[0], i16::MAX);
    assert_eq!(samples[1], 0);
    assert_eq!(samples[2], -32768);
    assert_eq!(samples[3], (0.5f32 * 32767.0) as i16);
}

#[test]
fn test_interleave_uses_shortest_plane() {
    let mut pending = VecDeque::new();
    interleave_into(&mut pending, &[vec![0.0, 0.0, 0.0], vec![0.0]]);
    assert_eq!(pending.len(), 2);
}

#[tokio::test]
async fn test_encoder_open_rejects_missing_file() {
    let encoder = SymphoniaEncoder::new();
    let result = encoder.open(std::path::Path::new("/nonexistent/track.mp3")).await;
    assert!(matches!(result, Err(AudioError::IoError(_))));
}

#[tokio::test]
async fn test_pcm_sink_writes_little_endian_samples() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("out.pcm");
    let sink = PcmFileSink::create(&path).await.unwrap();

    sink.set_speaking(true).await;
    sink.send_frame(AudioFrame::new(vec![1, -1, 256])).await.unwrap();
    sink.disconnect().await;

    let bytes = std::fs::read(&path).unwrap();
    assert_eq!(bytes, vec![0x01, 0x00, 0xff, 0xff, 0x00, 0x01]);
}

#[tokio::test]
async fn test_pcm_sink_rejects_send_after_disconnect() {
    let dir = tempfile::tempdir().unwrap();
    let sink = PcmFileSink::create(&dir.path().join("out.pcm")).await.unwrap();

    sink.disconnect().await;
    // A second disconnect is a no-op.
    sink.disconnect().await;

    let result = sink.send_frame(AudioFrame::new(vec![0; FRAME_LEN])).await;
    assert!(matches!(result, Err(AudioError::StreamError(_))));
}

#[test]
fn test_audio_error_display() {
    let error = AudioError::UnsupportedFormat("no suitable audio track found".to_string());
    assert_eq!(
        format!("{}", error),
        "Unsupported format: no suitable audio track found"
    );

    let error = AudioError::MissingCodecParams("sample rate");
    assert_eq!(format!("{}", error), "Missing codec parameters: sample rate");
}
