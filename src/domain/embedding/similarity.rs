//! Vector similarity

/// Calculate cosine similarity between two vectors
///
/// Returns a value in `[-1, 1]`. Empty vectors, vectors of different
/// dimension, and zero-norm vectors have similarity `0.0`; this never divides
/// by zero and never returns NaN.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    checked_cosine_similarity(a, b).unwrap_or(0.0)
}

/// Cosine similarity, or `None` when the vectors cannot be compared
///
/// Empty, mismatched, zero-norm or non-finite input yields `None`, so callers
/// can keep such vectors from matching at any threshold.
pub fn checked_cosine_similarity(a: &[f32], b: &[f32]) -> Option<f32> {
    if a.len() != b.len() || a.is_empty() {
        return None;
    }

    let dot_product: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return None;
    }

    let similarity = dot_product / (norm_a * norm_b);

    similarity.is_finite().then(|| similarity.clamp(-1.0, 1.0))
}
