//! Named constants for the clustering engine's default configuration.

pub mod cluster {
    pub const WIDTH: u32 = 10;
    pub const THRESHOLD: f64 = 0.5;
    pub const SHINGLE_SPAN: u32 = 3;
    pub const HASH_SEED: u64 = 0x5bd1_e995;
}

pub mod lift {
    /// Cluster-size threshold above which a cluster counts as "predicted
    /// positive" (non-singleton) rather than individually checked.
    pub const SIZE_THRESHOLD: usize = 1;
}

pub fn default_config_toml() -> String {
    format!(
        r"[cluster]
width = {width}
threshold = {threshold}
shingle_span = {span}
hash_seed = {seed}

[lift]
size_threshold = {size_threshold}
",
        width = cluster::WIDTH,
        threshold = cluster::THRESHOLD,
        span = cluster::SHINGLE_SPAN,
        seed = cluster::HASH_SEED,
        size_threshold = lift::SIZE_THRESHOLD,
    )
}
