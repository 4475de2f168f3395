//! Orchestrates Shingler -> MinHash -> LSH -> Union-Find.

use crate::error::ClusterError;
use crate::hash_kit::HashKit;
use crate::lsh::{BandScheme, LshIndex};
use crate::planner::plan;
use crate::shingler::{Shingle, Shingler};
use crate::signature::compute_minhash;
use crate::union_find::UnionFind;
use std::collections::HashMap;
use std::collections::HashSet;
use std::hash::Hash;

/// Either raw text (the [`Shingler`] runs) or a precomputed shingle set.
pub enum Features<'a> {
    Text(&'a str),
    Shingles(HashSet<Shingle>),
}

impl<'a> From<&'a str> for Features<'a> {
    fn from(text: &'a str) -> Self {
        Features::Text(text)
    }
}

impl From<HashSet<Shingle>> for Features<'static> {
    fn from(shingles: HashSet<Shingle>) -> Self {
        Features::Shingles(shingles)
    }
}

/// Configuration accepted at construction.
#[derive(Debug, Clone)]
pub struct ClustererConfig {
    pub width: u32,
    pub threshold: f64,
    pub shingle_span: u32,
    pub hash_seed: u64,
}

impl Default for ClustererConfig {
    fn default() -> Self {
        Self {
            width: crate::defaults::cluster::WIDTH,
            threshold: crate::defaults::cluster::THRESHOLD,
            shingle_span: crate::defaults::cluster::SHINGLE_SPAN,
            hash_seed: crate::defaults::cluster::HASH_SEED,
        }
    }
}

/// Near-duplicate clustering engine: MinHash signatures, LSH banding,
/// incremental union-find merging.
pub struct Clusterer<L: Eq + Hash + Clone> {
    shingler: Shingler,
    width: u32,
    kit: HashKit,
    lsh: LshIndex,
    union_find: UnionFind,
    labels: Vec<L>,
    label_index: HashMap<L, u32>,
}

impl<L: Eq + Hash + Clone> Clusterer<L> {
    /// Constructs a new engine. Rejects width 0, threshold outside `(0,1)`,
    /// or shingle span 0.
    pub fn new(width: u32, threshold: f64, shingle_span: u32, hash_seed: u64) -> Result<Self, ClusterError> {
        if width == 0 {
            return Err(ClusterError::Configuration("width must be nonzero".to_string()));
        }
        if !(threshold > 0.0 && threshold < 1.0) {
            return Err(ClusterError::Configuration("threshold must be in (0, 1)".to_string()));
        }
        if shingle_span == 0 {
            return Err(ClusterError::Configuration("shingle_span must be nonzero".to_string()));
        }
        let config = ClustererConfig { width, threshold, shingle_span, hash_seed };
        Ok(Self::from_config(config))
    }

    #[must_use]
    pub fn from_config(config: ClustererConfig) -> Self {
        let rows_per_band = plan(config.width, config.threshold);
        let scheme = BandScheme::from_width_and_rows(config.width, rows_per_band);
        let kit = HashKit::new(config.hash_seed);
        Self {
            shingler: Shingler::new(config.shingle_span as usize),
            width: config.width,
            kit,
            lsh: LshIndex::new(config.width, vec![scheme], kit),
            union_find: UnionFind::new(),
            labels: Vec::new(),
            label_index: HashMap::new(),
        }
    }

    fn intern(&mut self, label: L) -> u32 {
        if let Some(&idx) = self.label_index.get(&label) {
            return idx;
        }
        let idx = self.labels.len() as u32;
        self.labels.push(label.clone());
        self.label_index.insert(label, idx);
        idx
    }

    fn derive_label_from_bytes(bytes: &[u8]) -> u64 {
        // Label derived from the input's own bytes when the caller omits
        // one. Kept independent of the per-instance HashKit seed so it's
        // stable across Clusterer instances built with different seeds.
        crate::hash_kit::HashKit::new(0).hash(0, bytes)
    }

    /// Inserts an item. `label` is an opaque caller identifier; when `L` is
    /// `u64` and no natural label exists, callers typically derive one via
    /// [`Clusterer::derive_label`].
    pub fn add_item(&mut self, features: Features<'_>, label: L) {
        let idx = self.intern(label);
        self.union_find.touch(idx);

        let shingles = match features {
            Features::Text(text) => self.shingler.shingles(text),
            Features::Shingles(s) => s,
        };
        let signature = compute_minhash(&shingles, self.width, &self.kit);
        for (_, rep) in self.lsh.index(idx, &signature) {
            self.union_find.union(idx, rep);
        }
    }

    /// `add_item` over raw bytes, returning [`ClusterError::Input`] if the
    /// bytes aren't valid UTF-8.
    pub fn add_item_bytes(&mut self, bytes: &[u8], label: L) -> Result<(), ClusterError> {
        let text = std::str::from_utf8(bytes)?;
        self.add_item(Features::Text(text), label);
        Ok(())
    }

    /// Derives a stable `u64` label from raw input bytes, for callers that
    /// omit an explicit label.
    #[must_use]
    pub fn derive_label(features_bytes: &[u8]) -> u64 {
        Self::derive_label_from_bytes(features_bytes)
    }

    /// Current equivalence classes, as sets of caller labels. Never fails.
    pub fn get_clusters(&mut self) -> Vec<HashSet<L>> {
        self.union_find
            .classes()
            .into_iter()
            .map(|indices| indices.into_iter().map(|i| self.labels[i as usize].clone()).collect())
            .collect()
    }
}
