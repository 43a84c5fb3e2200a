//! Recording encoders
//!
//! Turns captured mono i16 samples into a file on disk:
//! - `audio/PCM`: 16-bit WAV via hound
//! - `audio/FLAC`: lossless FLAC via flacenc

use std::fs;
use std::io;
use std::path::Path;

use flacenc::bitsink::ByteSink;
use flacenc::component::BitRepr;
use flacenc::config;
use flacenc::error::Verify;
use flacenc::source::MemSource;
use hound::{SampleFormat, WavSpec, WavWriter};

use crate::domain::codec::AudioCodec;
use crate::domain::state::RecorderErrorKind;

/// Bits per sample (16-bit audio)
const BITS_PER_SAMPLE: usize = 16;

/// Number of channels (mono)
const CHANNELS: usize = 1;

/// Encode PCM samples to FLAC bytes
pub fn encode_to_flac(pcm_samples: &[i16], sample_rate: u32) -> Result<Vec<u8>, EncodingError> {
    let samples_i32: Vec<i32> = pcm_samples.iter().map(|&s| s as i32).collect();

    let config = config::Encoder::default()
        .into_verified()
        .map_err(|(_, e)| EncodingError::Config(format!("{:?}", e)))?;

    let source = MemSource::from_samples(
        &samples_i32,
        CHANNELS,
        BITS_PER_SAMPLE,
        sample_rate as usize,
    );

    let flac_stream = flacenc::encode_with_fixed_block_size(&config, source, config.block_size)
        .map_err(|e| EncodingError::Encode(format!("{:?}", e)))?;

    let mut sink = ByteSink::new();
    flac_stream
        .write(&mut sink)
        .map_err(|e| EncodingError::Encode(e.to_string()))?;

    Ok(sink.into_inner())
}

/// Write PCM samples to a 16-bit mono WAV file
pub fn write_wav(path: &Path, pcm_samples: &[i16], sample_rate: u32) -> Result<(), EncodingError> {
    let spec = WavSpec {
        channels: CHANNELS as u16,
        sample_rate,
        bits_per_sample: BITS_PER_SAMPLE as u16,
        sample_format: SampleFormat::Int,
    };

    let mut writer = WavWriter::create(path, spec)?;
    for &sample in pcm_samples {
        writer.write_sample(sample)?;
    }
    writer.finalize()?;
    Ok(())
}

/// Encode and write a finished recording in the given codec
pub fn write_recording(
    path: &Path,
    codec: AudioCodec,
    pcm_samples: &[i16],
    sample_rate: u32,
) -> Result<(), EncodingError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    match codec {
        AudioCodec::Pcm => write_wav(path, pcm_samples, sample_rate),
        AudioCodec::Flac => {
            let bytes = encode_to_flac(pcm_samples, sample_rate)?;
            fs::write(path, bytes)?;
            Ok(())
        }
        other => Err(EncodingError::UnsupportedCodec(other.name().to_string())),
    }
}

/// Encoding errors
#[derive(Debug, thiserror::Error)]
pub enum EncodingError {
    #[error("FLAC config error: {0}")]
    Config(String),

    #[error("FLAC encoding failed: {0}")]
    Encode(String),

    #[error("No encoder for codec {0}")]
    UnsupportedCodec(String),

    #[error("WAV write failed: {0}")]
    Wav(#[from] hound::Error),

    #[error("Write failed: {0}")]
    Io(#[from] io::Error),
}

impl EncodingError {
    /// Map onto the error kind reported to the recorder
    pub fn kind(&self) -> RecorderErrorKind {
        match self {
            Self::Io(e) | Self::Wav(hound::Error::IoError(e)) if is_out_of_space(e) => {
                RecorderErrorKind::OutOfSpaceError
            }
            Self::Config(_) | Self::UnsupportedCodec(_) => RecorderErrorKind::FormatError,
            _ => RecorderErrorKind::ResourceError,
        }
    }
}

#[cfg(unix)]
fn is_out_of_space(err: &io::Error) -> bool {
    // ENOSPC
    err.raw_os_error() == Some(28)
}

#[cfg(windows)]
fn is_out_of_space(err: &io::Error) -> bool {
    // ERROR_HANDLE_DISK_FULL, ERROR_DISK_FULL
    matches!(err.raw_os_error(), Some(39) | Some(112))
}

#[cfg(not(any(unix, windows)))]
fn is_out_of_space(_err: &io::Error) -> bool {
    false
}

#[cfg(test)]
mod tests {
    use super::*;

    const RATE: u32 = 16000;

    #[test]
    fn encode_silence() {
        let silence = vec![0i16; RATE as usize];
        let flac_data = encode_to_flac(&silence, RATE).unwrap();
        assert!(flac_data.len() > 50);
        assert_eq!(&flac_data[0..4], b"fLaC");
    }

    #[test]
    fn encode_at_high_rate() {
        let silence = vec![0i16; 8820];
        assert!(encode_to_flac(&silence, 88200).is_ok());
    }

    #[test]
    fn encode_with_signal() {
        let samples: Vec<i16> = (0..RATE as usize)
            .map(|i| {
                let t = i as f32 / RATE as f32;
                (f32::sin(2.0 * std::f32::consts::PI * 440.0 * t) * 16000.0) as i16
            })
            .collect();

        let flac_data = encode_to_flac(&samples, RATE).unwrap();
        assert!(flac_data.len() < samples.len() * 2);
    }

    #[test]
    fn write_wav_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("take.wav");
        let samples = vec![100i16; 800];

        write_recording(&path, AudioCodec::Pcm, &samples, 8000).unwrap();

        let reader = hound::WavReader::open(&path).unwrap();
        let spec = reader.spec();
        assert_eq!(spec.channels, 1);
        assert_eq!(spec.sample_rate, 8000);
        assert_eq!(spec.bits_per_sample, 16);
        assert_eq!(reader.len(), 800);
    }

    #[test]
    fn write_flac_file_creates_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("take.flac");

        write_recording(&path, AudioCodec::Flac, &vec![0i16; 1600], RATE).unwrap();

        let bytes = fs::read(&path).unwrap();
        assert_eq!(&bytes[0..4], b"fLaC");
    }

    #[test]
    fn lossy_codecs_are_unsupported() {
        let dir = tempfile::tempdir().unwrap();
        let err = write_recording(&dir.path().join("a.ogg"), AudioCodec::Vorbis, &[0; 10], RATE)
            .unwrap_err();
        assert_eq!(err.kind(), RecorderErrorKind::FormatError);
    }

    #[test]
    fn io_errors_map_to_resource_error() {
        let err = EncodingError::Io(io::Error::new(io::ErrorKind::PermissionDenied, "denied"));
        assert_eq!(err.kind(), RecorderErrorKind::ResourceError);
    }

    #[cfg(unix)]
    #[test]
    fn full_disk_maps_to_out_of_space() {
        let err = EncodingError::Io(io::Error::from_raw_os_error(28));
        assert_eq!(err.kind(), RecorderErrorKind::OutOfSpaceError);
    }
}
