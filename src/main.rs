#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::similar_names)]

use clap::{Parser, Subcommand, ValueEnum};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use simcluster::{
    aul_score, aul_score_plot, clusters_from_labels, default_config_toml, plan, ClusterConfig,
    Clusterer, Features, LiftConfig,
};
use std::io::BufRead;
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(name = "simcluster", version, about = "Near-duplicate text clustering via MinHash/LSH")]
struct Cli {
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Json,
    Table,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Cluster the text files found under the given paths, or read one
    /// item per stdin line when given a single path of `-`.
    Cluster {
        #[arg(required = true)]
        paths: Vec<String>,
        #[arg(long, short)]
        out: Option<PathBuf>,
        #[arg(long, short, value_enum, default_value = "json")]
        format: OutputFormat,
    },
    /// Score a clustering against ground truth using Area Under Lift.
    Aul {
        /// Path to a JSON file of `{"clusters": [["label", ...], ...]}`.
        /// A label of the form `<cluster-id>:<seq-id>` is a true positive;
        /// a bare label (no `:`) is a true negative.
        input: PathBuf,
    },
    /// Print the rows-per-band the planner chooses for width/threshold.
    Plan {
        #[arg(long, default_value_t = simcluster::defaults::cluster::WIDTH)]
        width: u32,
        #[arg(long, default_value_t = simcluster::defaults::cluster::THRESHOLD)]
        threshold: f64,
    },
}

#[derive(Debug, Serialize)]
struct ClusterOutput {
    cluster_count: usize,
    clusters: Vec<Vec<String>>,
}

#[derive(Debug, Deserialize)]
struct AulInput {
    clusters: Vec<Vec<String>>,
}

fn main() {
    let cli = Cli::parse();
    ensure_default_config_exists();

    match cli.command {
        Commands::Cluster { paths, out, format } => {
            run_cluster(&paths, out.as_deref(), cli.config.as_deref(), format);
        }
        Commands::Aul { input } => run_aul(&input, cli.config.as_deref()),
        Commands::Plan { width, threshold } => run_plan(width, threshold),
    }
}

fn ensure_default_config_exists() {
    let local_config = Path::new(".simclusterrc");
    if local_config.exists() {
        return;
    }
    if let Some(home) = std::env::var_os("HOME") {
        let home_config = Path::new(&home).join(".simclusterrc");
        if !home_config.exists()
            && let Err(e) = std::fs::write(&home_config, default_config_toml())
        {
            eprintln!("Note: Could not write default config to {}: {}", home_config.display(), e);
        }
    }
}

fn load_cluster_config(config_path: Option<&Path>) -> ClusterConfig {
    match config_path {
        Some(path) => ClusterConfig::load_from(path),
        None => ClusterConfig::load(),
    }
}

/// Reads lines from `reader` as `(label, item)` pairs, one item per
/// non-empty line, labelled by line position. Split out from
/// `read_stdin_items` so the line-splitting logic can be exercised
/// without a real stdin handle.
fn parse_item_lines<R: BufRead>(reader: R) -> Vec<(String, String)> {
    reader
        .lines()
        .map_while(Result::ok)
        .enumerate()
        .filter(|(_, line)| !line.is_empty())
        .map(|(i, line)| (i.to_string(), line))
        .collect()
}

fn read_stdin_items() -> Vec<(String, String)> {
    let stdin = std::io::stdin();
    parse_item_lines(stdin.lock())
}

fn render_cluster_table(clusters: &[Vec<String>]) -> String {
    let mut out = String::new();
    out.push_str(&format!("  {:>6}  {}\n", "size", "members"));
    out.push_str(&format!("  {:>6}  {}\n", "----", "-------"));
    for c in clusters {
        out.push_str(&format!("  {:>6}  {}\n", c.len(), c.join(", ")));
    }
    out
}

fn run_cluster(paths: &[String], out: Option<&Path>, config_path: Option<&Path>, format: OutputFormat) {
    let config = load_cluster_config(config_path);

    let texts: Vec<(String, String)> = if paths == ["-"] {
        read_stdin_items()
    } else {
        let mut files = Vec::new();
        for path in paths {
            files.extend(simcluster::discovery::find_text_files(Path::new(path)));
        }
        if files.is_empty() {
            eprintln!("No text files found.");
            std::process::exit(1);
        }
        // Parallel precompute: reading and normalizing each file is
        // independent work, done with rayon before the single-threaded
        // incremental merge (the Clusterer itself isn't shared across
        // threads).
        files
            .par_iter()
            .filter_map(|path| {
                std::fs::read_to_string(path)
                    .ok()
                    .map(|content| (path.display().to_string(), content))
            })
            .collect()
    };

    if texts.is_empty() {
        eprintln!("No items to cluster.");
        std::process::exit(1);
    }

    let mut clusterer: Clusterer<String> = match config.build() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Configuration error: {e}");
            std::process::exit(1);
        }
    };
    for (label, text) in &texts {
        clusterer.add_item(Features::Text(text), label.clone());
    }

    let clusters = clusterer.get_clusters();
    let mut clusters: Vec<Vec<String>> = clusters
        .into_iter()
        .map(|set| {
            let mut labels: Vec<String> = set.into_iter().collect();
            labels.sort_unstable();
            labels
        })
        .collect();
    clusters.sort_by(|a, b| b.len().cmp(&a.len()).then(a.cmp(b)));

    let rendered = match format {
        OutputFormat::Json => {
            let output = ClusterOutput { cluster_count: clusters.len(), clusters };
            let mut json = serde_json::to_string_pretty(&output).expect("serialize cluster output");
            json.push('\n');
            json
        }
        OutputFormat::Table => render_cluster_table(&clusters),
    };
    match out {
        Some(path) => {
            if let Err(e) = std::fs::write(path, &rendered) {
                eprintln!("Could not write output to {}: {}", path.display(), e);
                std::process::exit(1);
            }
        }
        None => print!("{rendered}"),
    }
}

fn run_aul(input: &Path, config_path: Option<&Path>) {
    let lift_config = match config_path {
        Some(path) => LiftConfig::load_from(path),
        None => LiftConfig::default(),
    };
    let content = match std::fs::read_to_string(input) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Could not read {}: {}", input.display(), e);
            std::process::exit(1);
        }
    };
    let parsed: AulInput = match serde_json::from_str(&content) {
        Ok(p) => p,
        Err(e) => {
            eprintln!("Could not parse {}: {}", input.display(), e);
            std::process::exit(1);
        }
    };
    let clusters = clusters_from_labels(&parsed.clusters);
    let score = aul_score(&clusters, lift_config.size_threshold);
    let (plot_score, xs, ys) = aul_score_plot(&clusters, lift_config.size_threshold);
    println!("aul_score: {score:.6}");
    println!("aul_score (plot mode): {plot_score:.6}");
    println!("curve points: {}", xs.len().min(ys.len()));
}

fn run_plan(width: u32, threshold: f64) {
    let rows_per_band = plan(width, threshold);
    let band_count = width / rows_per_band.max(1);
    println!("width: {width}");
    println!("threshold: {threshold}");
    println!("rows_per_band: {rows_per_band}");
    println!("band_count: {band_count}");
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_cli_cluster_parsing() {
        let cli = Cli::try_parse_from(["simcluster", "cluster", "some/dir"]).unwrap();
        assert!(matches!(cli.command, Commands::Cluster { .. }));
    }

    #[test]
    fn test_cli_plan_defaults() {
        let cli = Cli::try_parse_from(["simcluster", "plan"]).unwrap();
        match cli.command {
            Commands::Plan { width, threshold } => {
                assert_eq!(width, simcluster::defaults::cluster::WIDTH);
                assert!((threshold - simcluster::defaults::cluster::THRESHOLD).abs() < 1e-12);
            }
            _ => panic!("expected Plan"),
        }
    }

    #[test]
    fn test_cli_aul_requires_input() {
        assert!(Cli::try_parse_from(["simcluster", "aul"]).is_err());
        assert!(Cli::try_parse_from(["simcluster", "aul", "scores.json"]).is_ok());
    }

    #[test]
    fn test_cli_cluster_format_flag() {
        let cli = Cli::try_parse_from(["simcluster", "cluster", "-", "--format", "table"]).unwrap();
        match cli.command {
            Commands::Cluster { format, .. } => assert_eq!(format, OutputFormat::Table),
            _ => panic!("expected Cluster"),
        }
    }

    #[test]
    fn test_run_plan_executes() {
        run_plan(20, 0.3);
    }

    #[test]
    fn test_run_cluster_end_to_end() {
        let tmp = TempDir::new().unwrap();
        std::fs::write(tmp.path().join("a.txt"), "the quick brown fox jumps").unwrap();
        std::fs::write(tmp.path().join("b.txt"), "the quick brown fox jumps.").unwrap();
        let out = tmp.path().join("out.json");
        run_cluster(&[tmp.path().display().to_string()], Some(&out), None, OutputFormat::Json);
        let content = std::fs::read_to_string(&out).unwrap();
        assert!(content.contains("cluster_count"));
    }

    #[test]
    fn test_run_cluster_table_format() {
        let tmp = TempDir::new().unwrap();
        std::fs::write(tmp.path().join("a.txt"), "the quick brown fox jumps").unwrap();
        let out = tmp.path().join("out.txt");
        run_cluster(&[tmp.path().display().to_string()], Some(&out), None, OutputFormat::Table);
        let content = std::fs::read_to_string(&out).unwrap();
        assert!(content.contains("size") && content.contains("members"));
    }

    #[test]
    fn test_parse_item_lines_skips_blank_lines() {
        let input = b"first item\n\nsecond item\n" as &[u8];
        let items = parse_item_lines(input);
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].1, "first item");
        assert_eq!(items[1].1, "second item");
    }

    #[test]
    fn test_run_aul_end_to_end() {
        let tmp = TempDir::new().unwrap();
        let input = tmp.path().join("scores.json");
        std::fs::write(
            &input,
            r#"{"clusters": [["a:0", "a:1", "a:2", "b:0"], ["x"], ["y"], ["z"]]}"#,
        )
        .unwrap();
        run_aul(&input, None);
    }

    #[test]
    fn test_ensure_default_config_exists() {
        ensure_default_config_exists();
    }
}
