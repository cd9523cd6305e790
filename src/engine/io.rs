//! Audio file I/O for AuraLynx
//!
//! Writes buffers as 16-bit mono WAV and reads provider-produced WAV files
//! back into the internal format. Imported audio is downmixed to mono and
//! resampled to 44.1kHz with linear interpolation.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use hound::{SampleFormat, WavReader, WavSpec, WavWriter};
use sha2::{Digest, Sha256};

use crate::engine::buffer::{AudioBuffer, CHANNELS, SAMPLE_RATE};
use crate::error::{AuraError, Result};

/// WAV spec of every file this crate writes
pub fn output_spec() -> WavSpec {
    WavSpec {
        channels: CHANNELS,
        sample_rate: SAMPLE_RATE,
        bits_per_sample: 16,
        sample_format: SampleFormat::Int,
    }
}

/// Write a buffer to a 16-bit mono WAV file
///
/// # Errors
/// * `Io` - If the file cannot be created or written
pub fn write_wav(buffer: &AudioBuffer, path: &Path) -> Result<()> {
    let mut writer = WavWriter::create(path, output_spec())?;
    for &sample in buffer.samples() {
        writer.write_sample(sample)?;
    }
    writer.finalize()?;

    tracing::debug!(
        path = %path.display(),
        samples = buffer.num_samples(),
        "wrote wav"
    );
    Ok(())
}

/// Read a WAV file into the internal mono 44.1kHz format
///
/// # Arguments
/// * `path` - Path to the WAV file to read
///
/// # Errors
/// * `FileNotFound` - If the file does not exist
/// * `InvalidAudio` - If the file is not a valid WAV file
/// * `UnsupportedFormat` - If the audio has more than 2 channels or an odd bit depth
pub fn read_wav(path: &Path) -> Result<AudioBuffer> {
    if !path.exists() {
        return Err(AuraError::FileNotFound {
            path: path.display().to_string(),
        });
    }

    let reader = WavReader::open(path).map_err(|e| AuraError::InvalidAudio {
        reason: format!("Failed to open WAV file {}: {}", path.display(), e),
        source: Some(Box::new(e)),
    })?;

    let spec = reader.spec();
    let channels = spec.channels as usize;
    if channels == 0 || channels > 2 {
        return Err(AuraError::UnsupportedFormat {
            format: format!("{}-channel audio (only mono/stereo supported)", channels),
        });
    }

    // Already in the internal format: no conversion needed
    if spec == output_spec() {
        let samples = reader
            .into_samples::<i16>()
            .collect::<std::result::Result<Vec<i16>, _>>()?;
        return Ok(AudioBuffer::from_samples(samples));
    }

    let interleaved = read_samples_as_f32(reader, spec.bits_per_sample, spec.sample_format)?;
    let mono = downmix(&interleaved, channels);
    let resampled = if spec.sample_rate != SAMPLE_RATE {
        resample_linear(&mono, SAMPLE_RATE as f64 / spec.sample_rate as f64)
    } else {
        mono
    };

    Ok(AudioBuffer::from_samples(
        resampled.into_iter().map(f32_to_i16).collect(),
    ))
}

/// SHA-256 of a file, hex encoded
pub fn file_sha256(path: &Path) -> Result<String> {
    let mut file = File::open(path)?;
    let mut hasher = Sha256::new();
    let mut chunk = [0u8; 8192];
    loop {
        let n = file.read(&mut chunk)?;
        if n == 0 {
            break;
        }
        hasher.update(&chunk[..n]);
    }
    Ok(hasher
        .finalize()
        .iter()
        .map(|b| format!("{:02x}", b))
        .collect())
}

// ============================================================================
// Internal helper functions
// ============================================================================

#[inline]
fn f32_to_i16(sample: f32) -> i16 {
    (sample * 32767.0).clamp(-32768.0, 32767.0) as i16
}

/// Read samples from WAV reader and convert to f32
fn read_samples_as_f32<R: Read>(
    mut reader: WavReader<R>,
    bits_per_sample: u16,
    sample_format: SampleFormat,
) -> Result<Vec<f32>> {
    let scale = match (sample_format, bits_per_sample) {
        (SampleFormat::Float, _) => {
            return Ok(reader
                .samples::<f32>()
                .collect::<std::result::Result<Vec<f32>, _>>()?)
        }
        (SampleFormat::Int, 8) => 128.0,
        (SampleFormat::Int, 16) => 32768.0,
        (SampleFormat::Int, 24) => 8388608.0,
        (SampleFormat::Int, 32) => 2147483648.0,
        (SampleFormat::Int, bits) => {
            return Err(AuraError::UnsupportedFormat {
                format: format!("{}-bit integer audio", bits),
            })
        }
    };

    // hound widens every integer depth up to 32 bits into i32
    Ok(reader
        .samples::<i32>()
        .map(|s| s.map(|v| v as f32 / scale))
        .collect::<std::result::Result<Vec<f32>, _>>()?)
}

/// Average interleaved frames down to one channel
fn downmix(samples: &[f32], channels: usize) -> Vec<f32> {
    if channels == 1 {
        return samples.to_vec();
    }
    samples
        .chunks_exact(channels)
        .map(|frame| frame.iter().sum::<f32>() / channels as f32)
        .collect()
}

/// Linear interpolation resampling
fn resample_linear(samples: &[f32], ratio: f64) -> Vec<f32> {
    if samples.is_empty() {
        return Vec::new();
    }

    let source_len = samples.len();
    let target_len = ((source_len as f64) * ratio).ceil() as usize;

    (0..target_len)
        .map(|i| {
            let src_pos = i as f64 / ratio;
            let src_idx = src_pos.floor() as usize;
            let frac = (src_pos - src_idx as f64) as f32;

            if src_idx + 1 < source_len {
                samples[src_idx] * (1.0 - frac) + samples[src_idx + 1] * frac
            } else if src_idx < source_len {
                samples[src_idx]
            } else {
                0.0
            }
        })
        .collect()
}

// ============================================================================
// Tests
// ============================================================================
