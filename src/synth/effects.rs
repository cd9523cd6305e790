//! Effects and output conversion
//!
//! Two cheap reverbs (a single-tap echo and a short centred convolution)
//! and the peak normalizer that turns float synthesis output into 16-bit PCM.

use num_traits::ToPrimitive;

use crate::engine::buffer::I16_FULL_SCALE;
use crate::engine::SAMPLE_RATE;
use crate::error::{AuraError, Result};

/// Mix in a copy of the signal delayed by `delay_seconds`
///
/// `out = (1 - wet_mix) * dry + wet_mix * delayed`, where the delayed copy
/// is zero-padded at the start. Buffers no longer than the delay are left
/// untouched.
pub fn simple_delay_reverb(buffer: &mut [f64], delay_seconds: f64, wet_mix: f64) {
    delay_reverb(buffer, delay_seconds, wet_mix, 1.0);
}

/// Single-tap echo with an attenuated tap
///
/// Same as [`simple_delay_reverb`] with the delayed copy scaled by
/// `tap_gain` before mixing.
pub fn delay_reverb(buffer: &mut [f64], delay_seconds: f64, wet_mix: f64, tap_gain: f64) {
    let delay = (delay_seconds.max(0.0) * SAMPLE_RATE as f64) as usize;
    if buffer.len() <= delay {
        return;
    }

    let dry_gain = 1.0 - wet_mix;
    let wet_gain = wet_mix * tap_gain;

    // Walk backwards so the delayed source sample is still dry when read
    for i in (0..buffer.len()).rev() {
        let delayed = if i >= delay { buffer[i - delay] } else { 0.0 };
        buffer[i] = dry_gain * buffer[i] + wet_gain * delayed;
    }
}

/// Short reverb by centred convolution with `kernel`
///
/// The convolution is aligned like numpy's `"same"` mode: output index `n`
/// takes input `n + (k - 1) / 2` under kernel tap 0. The result is blended
/// as `(1 - wet_mix) * dry + wet_mix * convolved`.
pub fn kernel_reverb(buffer: &mut [f64], kernel: &[f64], wet_mix: f64) {
    if kernel.is_empty() || buffer.is_empty() {
        return;
    }

    let offset = (kernel.len() - 1) / 2;
    let len = buffer.len() as isize;
    let convolved: Vec<f64> = (0..buffer.len())
        .map(|n| {
            kernel
                .iter()
                .enumerate()
                .filter_map(|(j, &tap)| {
                    let src = n as isize + offset as isize - j as isize;
                    (0..len).contains(&src).then(|| tap * buffer[src as usize])
                })
                .sum::<f64>()
        })
        .collect();

    for (sample, wet) in buffer.iter_mut().zip(convolved) {
        *sample = (1.0 - wet_mix) * *sample + wet_mix * wet;
    }
}

/// Scale so the loudest sample hits `peak_fraction` of full scale, then
/// convert to 16-bit PCM
///
/// Conversion truncates toward zero rather than rounding. An all-zero
/// buffer comes back as zeros.
///
/// # Errors
/// * `InvalidInput` - If `peak_fraction` is outside `(0, 1]`
/// * `SynthesisFailure` - If the buffer contains NaN or infinite samples
pub fn normalize_to_int16(buffer: &[f64], peak_fraction: f64) -> Result<Vec<i16>> {
    if !(peak_fraction > 0.0 && peak_fraction <= 1.0) {
        return Err(AuraError::invalid_input(format!(
            "peak fraction must be in (0, 1], got {}",
            peak_fraction
        )));
    }

    let max_abs = buffer.iter().fold(0.0_f64, |acc, &s| acc.max(s.abs()));
    if buffer.iter().any(|s| !s.is_finite()) {
        return Err(AuraError::synthesis(
            "normalize",
            format!(
                "non-finite sample in {}-sample buffer (peak_fraction={})",
                buffer.len(),
                peak_fraction
            ),
        ));
    }

    if max_abs == 0.0 {
        return Ok(vec![0; buffer.len()]);
    }

    buffer
        .iter()
        .map(|&s| {
            (s / max_abs * peak_fraction * I16_FULL_SCALE)
                .to_i16()
                .ok_or_else(|| {
                    AuraError::synthesis(
                        "normalize",
                        format!("sample {} out of 16-bit range (peak={})", s, max_abs),
                    )
                })
        })
        .collect()
}
