//! Layered `.toml` configuration for the clustering engine, mirroring the
//! `$HOME/.simclusterrc` then local-`.simclusterrc` chain.

use crate::defaults;
use std::path::Path;

macro_rules! apply_config {
    ($self:ident, $table:ident, $($key:literal => $field:ident as usize),+ $(,)?) => {
        $( if let Some(v) = get_usize($table, $key) { $self.$field = v as u32; } )+
    };
}

/// Tunables for [`crate::clusterer::Clusterer`] construction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClusterConfig {
    pub width: u32,
    pub threshold: f64,
    pub shingle_span: u32,
    pub hash_seed: u64,
}

impl Default for ClusterConfig {
    fn default() -> Self {
        Self {
            width: defaults::cluster::WIDTH,
            threshold: defaults::cluster::THRESHOLD,
            shingle_span: defaults::cluster::SHINGLE_SPAN,
            hash_seed: defaults::cluster::HASH_SEED,
        }
    }
}

impl ClusterConfig {
    fn load_config_chain(base: Self) -> Self {
        let mut config = base;
        if let Some(home) = std::env::var_os("HOME")
            && let Ok(content) = std::fs::read_to_string(Path::new(&home).join(".simclusterrc"))
        {
            config.merge_from_toml(&content);
        }
        if let Ok(content) = std::fs::read_to_string(".simclusterrc") {
            config.merge_from_toml(&content);
        }
        config
    }

    #[must_use]
    pub fn load() -> Self {
        Self::load_config_chain(Self::default())
    }

    #[must_use]
    pub fn load_from(path: &Path) -> Self {
        let mut config = Self::default();
        if let Ok(content) = std::fs::read_to_string(path) {
            config.merge_from_toml(&content);
        } else {
            eprintln!("Warning: Could not read config file: {}", path.display());
        }
        config
    }

    #[must_use]
    pub fn load_from_content(content: &str) -> Self {
        let mut config = Self::default();
        config.merge_from_toml(content);
        config
    }

    fn merge_from_toml(&mut self, content: &str) {
        let table = match content.parse::<toml::Table>() {
            Ok(t) => t,
            Err(e) => {
                eprintln!("Warning: Failed to parse config: {e}");
                return;
            }
        };
        if let Some(t) = table.get("cluster").and_then(|v| v.as_table()) {
            apply_config!(self, t,
                "width" => width as usize,
                "shingle_span" => shingle_span as usize,
            );
            if let Some(threshold) = get_f64(t, "threshold") {
                self.threshold = threshold;
            }
            if let Some(seed) = t.get("hash_seed").and_then(toml::Value::as_integer) {
                self.hash_seed = seed as u64;
            }
        }
    }

    /// Builds a [`crate::clusterer::Clusterer`] from this configuration,
    /// surfacing validation failures as [`crate::error::ClusterError`].
    pub fn build<L: Eq + std::hash::Hash + Clone>(
        &self,
    ) -> Result<crate::clusterer::Clusterer<L>, crate::error::ClusterError> {
        crate::clusterer::Clusterer::new(self.width, self.threshold, self.shingle_span, self.hash_seed)
    }
}

fn get_usize(table: &toml::Table, key: &str) -> Option<usize> {
    table.get(key).and_then(toml::Value::as_integer).and_then(|v| usize::try_from(v).ok())
}

fn get_f64(table: &toml::Table, key: &str) -> Option<f64> {
    table.get(key).and_then(toml::Value::as_float)
}

/// Tunables for the AUL evaluator: below
/// `size_threshold`, a cluster contributes its true-positive count rather
/// than its full size to the vertical-extent estimate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LiftConfig {
    pub size_threshold: usize,
}

impl Default for LiftConfig {
    fn default() -> Self {
        Self { size_threshold: defaults::lift::SIZE_THRESHOLD }
    }
}

impl LiftConfig {
    #[must_use]
    pub fn load_from(path: &Path) -> Self {
        let mut config = Self::default();
        if let Ok(content) = std::fs::read_to_string(path) {
            config.merge_from_toml(&content);
        }
        config
    }

    fn merge_from_toml(&mut self, content: &str) {
        let Ok(table) = content.parse::<toml::Table>() else { return };
        if let Some(t) = table.get("lift").and_then(|v| v.as_table())
            && let Some(thresh) = get_usize(t, "size_threshold")
        {
            self.size_threshold = thresh;
        }
    }
}
