//! simcluster - incremental near-duplicate text clustering via MinHash/LSH

#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::similar_names)]
#![allow(clippy::must_use_candidate)]

pub mod clusterer;
pub mod config;
pub mod defaults;
pub mod discovery;
pub mod error;
pub mod hash_kit;
pub mod lift;
pub mod lsh;
pub mod planner;
pub mod shingler;
pub mod signature;
pub mod union_find;

pub use clusterer::{Clusterer, ClustererConfig, Features};
pub use config::{ClusterConfig, LiftConfig};
pub use defaults::default_config_toml;
pub use error::ClusterError;
pub use hash_kit::HashKit;
pub use lift::{
    aul_score, aul_score_plot, clusters_from_counts, clusters_from_labeled_points, clusters_from_labels,
    ScoredCluster,
};
pub use lsh::{BandScheme, BucketMap, LshIndex};
pub use planner::plan;
pub use shingler::{Shingle, Shingler};
pub use signature::{compute_minhash, estimate_similarity, MinHashSignature};
pub use union_find::UnionFind;
