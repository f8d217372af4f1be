//! Binary vector codec and similarity math.
//!
//! The vector store delivers embeddings as fixed-width binary blobs:
//! little-endian f32, no header, no padding. Encoding and decoding live
//! here so the wire format has exactly one owner, with the round-trip law
//! `decode(encode(x)) == x` bit-for-bit.

use crate::error::CodecError;

/// Encodes a vector as a little-endian f32 blob.
pub fn encode(vector: &[f32]) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(vector.len() * 4);
    for value in vector {
        bytes.extend_from_slice(&value.to_le_bytes());
    }
    bytes
}

/// Decodes a little-endian f32 blob back into a vector.
///
/// # Errors
///
/// Returns [`CodecError::TruncatedBlob`] if the blob length is not a
/// multiple of 4. Partial values are never silently dropped.
pub fn decode(bytes: &[u8]) -> Result<Vec<f32>, CodecError> {
    if bytes.len() % 4 != 0 {
        return Err(CodecError::TruncatedBlob(bytes.len()));
    }
    Ok(bytes
        .chunks_exact(4)
        .map(|chunk| f32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]))
        .collect())
}

/// Cosine similarity between two vectors.
///
/// Returns `None` (never `NaN`) when the vectors differ in length or either
/// has zero norm. Mixed-length inputs are refused outright rather than
/// truncated to the shorter vector.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> Option<f32> {
    if a.len() != b.len() || a.is_empty() {
        return None;
    }

    // Accumulate in f64: squared f32 magnitudes can overflow an f32
    // accumulator, and inf/inf would surface as NaN.
    let mut dot = 0.0f64;
    let mut norm_a = 0.0f64;
    let mut norm_b = 0.0f64;
    for (&x, &y) in a.iter().zip(b.iter()) {
        let (x, y) = (x as f64, y as f64);
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }

    if norm_a == 0.0 || norm_b == 0.0 {
        return None;
    }

    let similarity = dot / (norm_a.sqrt() * norm_b.sqrt());
    if similarity.is_finite() {
        Some(similarity as f32)
    } else {
        None
    }
}

/// Cosine distance (`1 - similarity`), matching the store's KNN metric.
///
/// `None` under the same conditions as [`cosine_similarity`].
pub fn cosine_distance(a: &[f32], b: &[f32]) -> Option<f32> {
    cosine_similarity(a, b).map(|sim| 1.0 - sim)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip_is_bit_exact() {
        let original = vec![0.0f32, 1.0, -1.0, f32::MIN_POSITIVE, 1234.5678, -0.25];
        let decoded = decode(&encode(&original)).unwrap();
        assert_eq!(original.len(), decoded.len());
        for (a, b) in original.iter().zip(decoded.iter()) {
            assert_eq!(a.to_bits(), b.to_bits());
        }
    }

    #[test]
    fn test_decode_empty_blob() {
        assert_eq!(decode(&[]).unwrap(), Vec::<f32>::new());
    }

    #[test]
    fn test_decode_rejects_truncated_blob() {
        let mut bytes = encode(&[1.0, 2.0]);
        bytes.pop();
        assert_eq!(decode(&bytes), Err(CodecError::TruncatedBlob(7)));
    }

    #[test]
    fn test_cosine_of_self_is_one() {
        let v = vec![0.3, -0.7, 0.2, 0.9];
        let sim = cosine_similarity(&v, &v).unwrap();
        assert!((sim - 1.0).abs() < 1e-5, "self-similarity was {}", sim);
    }

    #[test]
    fn test_cosine_orthogonal_is_zero() {
        let sim = cosine_similarity(&[1.0, 0.0], &[0.0, 1.0]).unwrap();
        assert!(sim.abs() < 1e-6);
    }

    #[test]
    fn test_cosine_opposite_is_negative_one() {
        let sim = cosine_similarity(&[1.0, 0.0], &[-1.0, 0.0]).unwrap();
        assert!((sim + 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_cosine_mixed_length_is_none() {
        assert_eq!(cosine_similarity(&[1.0, 0.0], &[1.0, 0.0, 0.0]), None);
    }

    #[test]
    fn test_cosine_zero_norm_is_none_not_nan() {
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 0.0]), None);
        assert_eq!(cosine_similarity(&[1.0, 0.0], &[0.0, 0.0]), None);
    }

    #[test]
    fn test_cosine_large_magnitude_is_never_nan() {
        // Squared 1e30 overflows an f32 accumulator; the score must stay
        // well-defined instead of degrading to inf/inf.
        let a = vec![1.0e30f32, 0.0];
        let sim = cosine_similarity(&a, &a);
        assert_eq!(sim, Some(1.0));

        let b = vec![-1.0e30f32, 0.0];
        let sim = cosine_similarity(&a, &b);
        assert_eq!(sim, Some(-1.0));

        if let Some(s) = cosine_similarity(&[f32::MAX, f32::MAX], &[f32::MAX, -f32::MAX]) {
            assert!(!s.is_nan());
        }
    }

    #[test]
    fn test_cosine_empty_is_none() {
        assert_eq!(cosine_similarity(&[], &[]), None);
    }

    #[test]
    fn test_cosine_distance_inverts_similarity() {
        let dist = cosine_distance(&[1.0, 0.0], &[1.0, 0.0]).unwrap();
        assert!(dist.abs() < 1e-5);
    }
}
