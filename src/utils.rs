// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

//! Numeric helpers shared by the model and the feature hasher.

/// 32-bit `MurmurHash3` (x86 variant) of `data`, returned as a signed value.
///
/// Feature hashing uses the sign of the hash to decide whether to flip the
/// feature value, so the signed interpretation is what callers need.
#[must_use]
#[allow(clippy::cast_possible_wrap, clippy::cast_possible_truncation)]
pub fn murmurhash3_32(data: &[u8], seed: u32) -> i32 {
    const C1: u32 = 0xcc9e_2d51;
    const C2: u32 = 0x1b87_3593;

    let mut h = seed;
    let mut chunks = data.chunks_exact(4);

    for chunk in &mut chunks {
        let mut k = u32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]);
        k = k.wrapping_mul(C1).rotate_left(15).wrapping_mul(C2);
        h ^= k;
        h = h.rotate_left(13).wrapping_mul(5).wrapping_add(0xe654_6b64);
    }

    let tail = chunks.remainder();
    if !tail.is_empty() {
        let mut k = 0u32;
        for (i, byte) in tail.iter().enumerate() {
            k |= u32::from(*byte) << (8 * i);
        }
        k = k.wrapping_mul(C1).rotate_left(15).wrapping_mul(C2);
        h ^= k;
    }

    h ^= data.len() as u32;
    h ^= h >> 16;
    h = h.wrapping_mul(0x85eb_ca6b);
    h ^= h >> 13;
    h = h.wrapping_mul(0xc2b2_ae35);
    h ^= h >> 16;

    h as i32
}

/// Logistic sigmoid.
#[must_use]
pub fn sigmoid(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}

/// Replace `scores` with their softmax, in place.
pub fn softmax_in_place(scores: &mut [f64]) {
    let max = scores.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let mut sum = 0.0;
    for s in scores.iter_mut() {
        *s = (*s - max).exp();
        sum += *s;
    }
    if sum > 0.0 {
        for s in scores.iter_mut() {
            *s /= sum;
        }
    }
}

/// Replace one-vs-rest `scores` with normalized sigmoid probabilities, in place.
///
/// If every sigmoid underflows to zero the row becomes uniform.
#[allow(clippy::cast_precision_loss)]
pub fn ovr_normalize_in_place(scores: &mut [f64]) {
    let mut sum = 0.0;
    for s in scores.iter_mut() {
        *s = sigmoid(*s);
        sum += *s;
    }
    if sum > 0.0 {
        for s in scores.iter_mut() {
            *s /= sum;
        }
    } else if !scores.is_empty() {
        let uniform = 1.0 / scores.len() as f64;
        scores.fill(uniform);
    }
}

/// Format a float the way Python's `repr` does: shortest round-trip digits,
/// a trailing `.0` on whole numbers, and a signed two-digit exponent outside
/// `[1e-4, 1e16)` (`3.2e-07`, `1e+17`).
#[must_use]
pub fn format_float(value: f64) -> String {
    if value.is_nan() {
        return "nan".to_string();
    }
    let repr = format!("{value:?}");
    match repr.split_once('e') {
        Some((mantissa, exp)) => {
            let (sign, digits) = exp.strip_prefix('-').map_or(("+", exp), |d| ("-", d));
            format!("{mantissa}e{sign}{digits:0>2}")
        }
        None => repr,
    }
}

/// Index of the largest value; the first one wins ties.
#[must_use]
pub fn argmax(values: &[f64]) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (i, &v) in values.iter().enumerate() {
        match best {
            Some((_, b)) if v <= b => {}
            _ => best = Some((i, v)),
        }
    }
    best.map(|(i, _)| i)
}
