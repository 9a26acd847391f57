//! Cosine similarity over embedding vectors

/// Cosine similarity between two equal-length vectors
///
/// Returns `dot(a, b) / (||a|| * ||b||)`, clamped to [-1, 1] to absorb
/// floating-point rounding. Returns exactly `0.0` when either vector has zero
/// magnitude, or when the lengths differ, rather than dividing by zero.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() {
        return 0.0;
    }

    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    (dot / (norm_a * norm_b)).clamp(-1.0, 1.0)
}
