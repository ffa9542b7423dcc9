//! Turning interleaved I/Q samples into per-subcarrier amplitude and phase

use num_complex::Complex;

/// One complex channel estimate per subcarrier.
/// A trailing unmatched sample is taken as `I` with `Q = 0`.
pub fn subcarriers(samples: &[i8]) -> impl Iterator<Item = Complex<f64>> + '_ {
    samples.chunks(2).map(|pair| {
        let re = pair[0] as f64;
        let im = pair.get(1).copied().unwrap_or(0) as f64;
        Complex::new(re, im)
    })
}

/// `sqrt(I² + Q²)` per subcarrier
pub fn amplitudes(samples: &[i8]) -> Vec<f64> {
    subcarriers(samples).map(|c| c.norm()).collect()
}

/// `atan2(Q, I)` per subcarrier, in `(-π, π]`
pub fn phases(samples: &[i8]) -> Vec<f64> {
    subcarriers(samples).map(|c| c.arg()).collect()
}
