//! Fixed-width MinHash signature.

use crate::hash_kit::HashKit;
use crate::shingler::Shingle;
use std::collections::HashSet;

/// `W` 64-bit minima, one per independent hash function.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MinHashSignature {
    pub hashes: Vec<u64>,
}

impl MinHashSignature {
    #[must_use]
    pub fn width(&self) -> usize {
        self.hashes.len()
    }
}

/// Builds a length-`width` signature over `shingles` using `kit`.
///
/// Fuses the `W` passes into one pass per shingle: for each shingle we
/// compute all `W` hashes once and fold them into the running minima,
/// rather than iterating the shingle set `W` times.
#[must_use]
pub fn compute_minhash(shingles: &HashSet<Shingle>, width: u32, kit: &HashKit) -> MinHashSignature {
    let width = width as usize;
    let mut hashes = vec![u64::MAX; width];
    for shingle in shingles {
        let encoded = shingle.encode();
        for (i, slot) in hashes.iter_mut().enumerate() {
            let h = kit.hash(i as u32, &encoded);
            if h < *slot {
                *slot = h;
            }
        }
    }
    MinHashSignature { hashes }
}

/// Empirical fraction of matching signature positions — an unbiased
/// estimator of Jaccard similarity.
#[must_use]
pub fn estimate_similarity(a: &MinHashSignature, b: &MinHashSignature) -> f64 {
    if a.hashes.is_empty() {
        return 0.0;
    }
    let matching = a.hashes.iter().zip(&b.hashes).filter(|(x, y)| x == y).count();
    matching as f64 / a.hashes.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shingler::Shingler;

    #[test]
    fn test_empty_input_is_all_max() {
        let kit = HashKit::new(1);
        let sig = compute_minhash(&HashSet::new(), 10, &kit);
        assert!(sig.hashes.iter().all(|&h| h == u64::MAX));
    }

    #[test]
    fn test_width_invariant() {
        let kit = HashKit::new(1);
        let s = Shingler::new(2);
        let shingles = s.shingles("a b c d");
        let sig = compute_minhash(&shingles, 16, &kit);
        assert_eq!(sig.width(), 16);
    }

    #[test]
    fn test_identical_sets_match_fully() {
        let kit = HashKit::new(1);
        let s = Shingler::new(2);
        let shingles = s.shingles("the quick brown fox");
        let sig1 = compute_minhash(&shingles, 64, &kit);
        let sig2 = compute_minhash(&shingles, 64, &kit);
        assert_eq!(sig1, sig2);
        assert!((estimate_similarity(&sig1, &sig2) - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_disjoint_sets_rarely_fully_match() {
        let kit = HashKit::new(1);
        let s = Shingler::new(2);
        let shingles1 = s.shingles("the quick brown fox jumps over");
        let shingles2 = s.shingles("completely unrelated content goes here instead");
        let sig1 = compute_minhash(&shingles1, 128, &kit);
        let sig2 = compute_minhash(&shingles2, 128, &kit);
        assert!(estimate_similarity(&sig1, &sig2) < 0.5);
    }

    #[test]
    fn test_estimate_similarity_empty_signature_is_zero() {
        let empty = MinHashSignature { hashes: vec![] };
        assert_eq!(estimate_similarity(&empty, &empty), 0.0);
    }

    // Empirical fraction of agreeing positions converges to the true
    // Jaccard similarity as W grows, for a pair of sets with known overlap.
    #[test]
    fn test_jaccard_estimator_converges() {
        let kit = HashKit::new(99);
        let a: HashSet<Shingle> = (0..80).map(|i| Shingle(vec![format!("t{i}")])).collect();
        let b: HashSet<Shingle> = (40..120).map(|i| Shingle(vec![format!("t{i}")])).collect();
        let intersection = 40.0;
        let union = 120.0;
        let true_j = intersection / union;

        let sig_a = compute_minhash(&a, 4096, &kit);
        let sig_b = compute_minhash(&b, 4096, &kit);
        let est = estimate_similarity(&sig_a, &sig_b);
        assert!((est - true_j).abs() < 0.05, "estimate {est} vs true {true_j}");
    }
}
