/// Cosine similarity in `[-1, 1]`.
///
/// Mismatched lengths, empty inputs, zero-norm vectors and non-finite results score `0.0`.
#[inline]
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let (dot, norm_a_sq, norm_b_sq) = a
        .iter()
        .zip(b.iter())
        .fold((0.0f32, 0.0f32, 0.0f32), |(dot, na, nb), (&av, &bv)| {
            (dot + av * bv, na + av * av, nb + bv * bv)
        });

    let norm_a = norm_a_sq.sqrt();
    let norm_b = norm_b_sq.sqrt();

    let similarity = dot / (norm_a * norm_b);
    if norm_a == 0.0 || norm_b == 0.0 || !similarity.is_finite() {
        0.0
    } else {
        similarity.clamp(-1.0, 1.0)
    }
}
