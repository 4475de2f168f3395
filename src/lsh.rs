//! Band partition of a MinHash signature, bucket map, candidate emission.

use crate::hash_kit::HashKit;
use crate::signature::MinHashSignature;
use std::collections::{HashMap, HashSet};

/// `(bandwidth, band_count)` — rows per band and how many bands to carve
/// out of the signature for one LSH scheme. A caller can combine several
/// schemes freely, each with its own bucket map.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BandScheme {
    pub bandwidth: u32,
    pub band_count: u32,
}

impl BandScheme {
    #[must_use]
    pub const fn new(bandwidth: u32, band_count: u32) -> Self {
        Self { bandwidth, band_count }
    }

    /// Derives `(bandwidth, band_count)` for a signature of width `w` given
    /// rows-per-band `r`, discarding a trailing short band.
    #[must_use]
    pub const fn from_width_and_rows(width: u32, rows_per_band: u32) -> Self {
        let r = if rows_per_band == 0 { 1 } else { rows_per_band };
        Self { bandwidth: r, band_count: width / r }
    }
}

/// One scheme's bucket map: band key -> insertion-ordered label sequence.
/// Labels here are interned `u32` indices, matching
/// [`crate::union_find::UnionFind`].
#[derive(Debug, Default)]
pub struct BucketMap {
    buckets: HashMap<u64, Vec<u32>>,
}

impl BucketMap {
    #[must_use]
    pub fn new() -> Self {
        Self { buckets: HashMap::new() }
    }

    /// Appends `label` to the bucket for `key`, returning the bucket's
    /// first (possibly just-inserted) label — the union-find representative
    /// to merge `label` with.
    pub fn append(&mut self, key: u64, label: u32) -> u32 {
        let bucket = self.buckets.entry(key).or_default();
        bucket.push(label);
        bucket[0]
    }

    #[must_use]
    pub fn get(&self, key: u64) -> &[u32] {
        self.buckets.get(&key).map_or(&[], Vec::as_slice)
    }
}

/// Owns one [`BucketMap`] per configured [`BandScheme`].
pub struct LshIndex {
    width: u32,
    schemes: Vec<BandScheme>,
    maps: Vec<BucketMap>,
    kit: HashKit,
}

impl LshIndex {
    #[must_use]
    pub fn new(width: u32, schemes: Vec<BandScheme>, kit: HashKit) -> Self {
        let maps = schemes.iter().map(|_| BucketMap::new()).collect();
        Self { width, schemes, maps, kit }
    }

    /// Computes band keys for `signature` under every scheme, appends
    /// `label` to each bucket, and returns `(scheme_index, representative)`
    /// pairs for every band key touched — one union-find merge per pair.
    pub fn index(&mut self, label: u32, signature: &MinHashSignature) -> Vec<(usize, u32)> {
        let mut merges = Vec::new();
        for (scheme_idx, scheme) in self.schemes.iter().enumerate() {
            let rows = scheme.bandwidth.max(1) as usize;
            let bands = scheme.band_count as usize;
            for band_idx in 0..bands {
                let start = band_idx * rows;
                if start >= self.width as usize {
                    break;
                }
                let end = (start + rows).min(signature.hashes.len());
                let slice = &signature.hashes[start..end];
                let key = self.kit.band_hash(band_idx as u32, slice);
                let rep = self.maps[scheme_idx].append(key, label);
                merges.push((scheme_idx, rep));
            }
        }
        merges
    }

    /// Union of bucket contents over every band key a signature would
    /// produce under every scheme — a query path not exercised by the
    /// streaming clusterer, but kept as a named operation in its own right.
    #[must_use]
    pub fn candidates(&self, signature: &MinHashSignature) -> HashSet<u32> {
        let mut out = HashSet::new();
        for (scheme_idx, scheme) in self.schemes.iter().enumerate() {
            let rows = scheme.bandwidth.max(1) as usize;
            let bands = scheme.band_count as usize;
            for band_idx in 0..bands {
                let start = band_idx * rows;
                if start >= self.width as usize {
                    break;
                }
                let end = (start + rows).min(signature.hashes.len());
                let slice = &signature.hashes[start..end];
                let key = self.kit.band_hash(band_idx as u32, slice);
                out.extend(self.maps[scheme_idx].get(key).iter().copied());
            }
        }
        out
    }
}
