/// Index of the first non-finite sample, if any.
pub fn first_non_finite(samples: &[f64]) -> Option<usize> {
    samples.iter().position(|v| !v.is_finite())
}

/// Arithmetic mean; 0.0 for an empty slice.
pub fn mean(samples: &[f64]) -> f64 {
    if samples.is_empty() {
        return 0.0;
    }
    samples.iter().sum::<f64>() / samples.len() as f64
}

/// Population standard deviation; 0.0 for an empty slice.
pub fn stddev(samples: &[f64]) -> f64 {
    if samples.is_empty() {
        return 0.0;
    }
    let m = mean(samples);
    let var = samples.iter().map(|v| (v - m) * (v - m)).sum::<f64>() / samples.len() as f64;
    var.sqrt()
}
