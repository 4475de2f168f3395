//! Area-Under-Lift (AUL) clustering-quality evaluator.
//!
//! Groups clusters by equal predicted size (descending), walks the groups
//! accumulating running totals, and scores by a homogeneity-assumption
//! rule: non-singleton clusters are charged for their full size, singletons
//! are charged only for their true positives.

use std::cmp::Ordering;

/// One scored cluster: `size` is the predicted-positive count (cluster
/// size); `positives` is the true-positive count inside it.
#[derive(Debug, Clone, Copy)]
pub struct ScoredCluster {
    pub size: usize,
    pub positives: usize,
}

fn group_by_size(mut clusters: Vec<ScoredCluster>) -> Vec<(usize, Vec<usize>)> {
    clusters.sort_by(|a, b| b.size.cmp(&a.size));
    let mut groups: Vec<(usize, Vec<usize>)> = Vec::new();
    for c in clusters {
        match groups.last_mut() {
            Some((size, positives)) if *size == c.size => positives.push(c.positives),
            _ => groups.push((c.size, vec![c.positives])),
        }
    }
    groups
}

/// Geometric (closed-form) AUL score.
#[must_use]
pub fn aul_score(clusters: &[ScoredCluster], size_threshold: usize) -> f64 {
    aul_score_impl(clusters, size_threshold, false).0
}

/// Plot-mode AUL score plus the `(x, y)` step-curve a lift plot would draw.
/// Exists so tests can assert the two modes agree to floating-point
/// tolerance.
#[must_use]
pub fn aul_score_plot(clusters: &[ScoredCluster], size_threshold: usize) -> (f64, Vec<f64>, Vec<f64>) {
    let (score, xs, ys) = aul_score_impl(clusters, size_threshold, true);
    (score, xs, ys)
}

fn aul_score_impl(clusters: &[ScoredCluster], size_threshold: usize, plot: bool) -> (f64, Vec<f64>, Vec<f64>) {
    let groups = group_by_size(clusters.to_vec());

    let mut total_any = 0.0f64;
    let mut total_true = 0.0f64;
    let mut assumed_vertical = 0.0f64;
    let mut aul = 0.0f64;
    let mut xs = Vec::new();
    let mut ys = Vec::new();
    let mut bin_height = 0.0f64;
    let mut bin_right_edge = 0.0f64;

    for (size, positives) in &groups {
        let n = positives.len();
        let group_height: f64 = positives.iter().map(|&p| p as f64).sum();
        total_true += group_height;

        let group_width = *size as f64 * n as f64;
        total_any += group_width;

        let height_incr = if *size > size_threshold { group_width } else { group_height };
        assumed_vertical += height_incr;

        if plot {
            let avg_true_score = group_height / n as f64;
            for _ in positives {
                bin_height += avg_true_score;
                aul += bin_height * *size as f64;
                xs.push(bin_right_edge);
                bin_right_edge += *size as f64;
                xs.push(bin_right_edge);
                ys.push(bin_height);
                ys.push(bin_height);
            }
        } else {
            aul += total_true * group_width - ((n as f64 - 1.0) * *size as f64 * group_height) / 2.0;
        }
    }

    if total_true > total_any {
        eprintln!(
            "Warning: number of positives found ({total_true}) exceeds total count of {total_any}"
        );
    }

    let rect_area = assumed_vertical * total_any;
    let score = if rect_area == 0.0 { 0.0 } else { aul / rect_area };

    if plot && total_any > 0.0 && assumed_vertical > 0.0 {
        for x in &mut xs {
            *x /= total_any;
        }
        for y in &mut ys {
            *y /= assumed_vertical;
        }
    }

    (score, xs, ys)
}

/// Convenience constructor from parallel `size[i]`/`pos[i]` arrays.
#[must_use]
pub fn clusters_from_counts(sizes: &[usize], positives: &[usize]) -> Vec<ScoredCluster> {
    sizes
        .iter()
        .zip(positives)
        .map(|(&size, &p)| ScoredCluster { size, positives: p })
        .collect()
}

/// Convenience constructor from clusters of binary-coded points.
#[must_use]
pub fn clusters_from_labeled_points(clusters: &[Vec<bool>]) -> Vec<ScoredCluster> {
    clusters
        .iter()
        .filter(|c| !c.is_empty())
        .map(|c| ScoredCluster { size: c.len(), positives: c.iter().filter(|&&b| b).count() })
        .collect()
}

/// Convenience constructor from clusters of raw caller labels, applying
/// the external ground-truth convention: a label of the form
/// `"<cluster-id>:<seq-id>"` is a true positive, a bare label (no `:`) is
/// a true negative. The clustering engine itself never interprets
/// labels this way; only this evaluation step does.
#[must_use]
pub fn clusters_from_labels<S: AsRef<str>>(clusters: &[Vec<S>]) -> Vec<ScoredCluster> {
    clusters
        .iter()
        .filter(|c| !c.is_empty())
        .map(|c| {
            let positives = c.iter().filter(|label| label.as_ref().contains(':')).count();
            ScoredCluster { size: c.len(), positives }
        })
        .collect()
}

impl PartialEq for ScoredCluster {
    fn eq(&self, other: &Self) -> bool {
        self.size == other.size && self.positives == other.positives
    }
}
impl Eq for ScoredCluster {}
impl PartialOrd for ScoredCluster {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
impl Ord for ScoredCluster {
    fn cmp(&self, other: &Self) -> Ordering {
        self.size.cmp(&other.size).then(self.positives.cmp(&other.positives))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Boundary cases.
    #[test]
    fn test_no_clusters_is_zero() {
        assert_eq!(aul_score(&[], 1), 0.0);
    }

    #[test]
    fn test_all_singletons_is_half() {
        // With every cluster of size 1 (threshold 1), the tied-group
        // formula reduces to (n+1)/(2n) regardless of the true/false split
        // (Q cancels out of the ratio) — which converges to, but isn't
        // exactly, 0.5 for finite n. Use a large singleton population so
        // the asymptotic boundary case holds within tolerance.
        let n = 2000;
        let sizes = vec![1usize; n];
        let positives: Vec<usize> = (0..n).map(|i| usize::from(i % 2 == 0)).collect();
        let clusters = clusters_from_counts(&sizes, &positives);
        assert!((aul_score(&clusters, 1) - 0.5).abs() < 1e-3);
    }

    #[test]
    fn test_one_perfect_homogeneous_cluster_is_one() {
        let clusters = vec![ScoredCluster { size: 4, positives: 4 }];
        assert!((aul_score(&clusters, 1) - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_rect_area_zero_gives_zero() {
        let clusters = vec![ScoredCluster { size: 0, positives: 0 }];
        assert_eq!(aul_score(&clusters, 1), 0.0);
    }

    #[test]
    fn test_plot_and_geometric_modes_agree() {
        let sizes = [3usize, 3, 2, 1, 1, 1];
        let positives = [3usize, 2, 2, 0, 1, 0];
        let clusters = clusters_from_counts(&sizes, &positives);
        let geometric = aul_score(&clusters, 1);
        let (plotted, _, _) = aul_score_plot(&clusters, 1);
        assert!((geometric - plotted).abs() < 1e-9, "{geometric} vs {plotted}");
    }

    #[test]
    fn test_imperfect_clustering_between_half_and_one() {
        // a:0..2 and b:0 are true positives that cluster together; x,y,z
        // are unclustered negatives.
        let clusters = vec![
            ScoredCluster { size: 4, positives: 4 },
            ScoredCluster { size: 1, positives: 0 },
            ScoredCluster { size: 1, positives: 0 },
            ScoredCluster { size: 1, positives: 0 },
        ];
        let score = aul_score(&clusters, 1);
        assert!(score > 0.5, "expected score > 0.5, got {score}");
    }

    #[test]
    fn test_clusters_from_labeled_points_skips_empty() {
        let clusters = vec![vec![true, false], vec![], vec![true]];
        let scored = clusters_from_labeled_points(&clusters);
        assert_eq!(scored.len(), 2);
    }

    #[test]
    fn test_clusters_from_labels_applies_colon_convention() {
        let clusters = vec![
            vec!["a:0".to_string(), "a:1".to_string(), "a:2".to_string(), "b:0".to_string()],
            vec!["x".to_string()],
            vec!["y".to_string()],
            vec!["z".to_string()],
        ];
        let scored = clusters_from_labels(&clusters);
        assert_eq!(scored.len(), 4);
        assert_eq!(scored[0].size, 4);
        assert_eq!(scored[0].positives, 4);
        assert!(scored[1..].iter().all(|c| c.size == 1 && c.positives == 0));
    }

    #[test]
    fn test_clusters_from_labels_skips_empty_clusters() {
        let clusters: Vec<Vec<String>> = vec![vec!["a:0".to_string()], vec![]];
        assert_eq!(clusters_from_labels(&clusters).len(), 1);
    }

    #[test]
    fn test_tie_grouping_matches_manual_grouping() {
        let clusters = clusters_from_counts(&[2, 2, 2], &[1, 2, 0]);
        let groups = group_by_size(clusters);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].0, 2);
        assert_eq!(groups[0].1.len(), 3);
    }
}
