use blake3::Hasher;

/// Hashes an embedding input together with the model that will embed it.
///
/// Vectors from different models are not comparable, so the model name is part of
/// the key. The model is length-prefixed so no model/text split can collide.
#[inline]
pub fn hash_embedding_input(model: &str, text: &str) -> [u8; 32] {
    let mut hasher = Hasher::new();
    hasher.update(&(model.len() as u64).to_le_bytes());
    hasher.update(model.as_bytes());
    hasher.update(b"|");
    hasher.update(text.as_bytes());
    *hasher.finalize().as_bytes()
}

/// Computes a 64-bit hash of the input, truncated from the 256-bit BLAKE3 output.
///
/// Used for seeding deterministic stub vectors; not for uniqueness guarantees.
#[inline]
pub fn hash_to_u64(data: &[u8]) -> u64 {
    let hash = blake3::hash(data);
    let mut bytes = [0u8; 8];
    bytes.copy_from_slice(&hash.as_bytes()[0..8]);
    u64::from_le_bytes(bytes)
}
