//! Stable k-means: cluster a window of durations into `k` groups, retrying
//! with a fresh random seeding whenever a cluster comes up empty.

use std::collections::HashSet;

use rand::seq::SliceRandom;
use rand::Rng;

use crate::error::{MorseError, Result};

const LLOYD_MAX_ITERS: usize = 50;

/// Cluster `xs` into `k` groups. Whitens by the sample standard deviation
/// before running Lloyd's algorithm so that the convergence tolerance doesn't
/// depend on the raw millisecond scale, then restores it on the returned
/// centroids. Retries with a new random seeding (up to `max_retries` times)
/// whenever a run collapses a cluster to zero members, since an empty
/// cluster means the seeding was unlucky rather than that the data has fewer
/// than `k` natural groups.
pub fn stable_kmeans(xs: &[f64], k: usize, max_retries: usize) -> Result<(Vec<f64>, Vec<usize>)> {
    if xs.len() < k {
        return Err(MorseError::process(
            "insufficient samples for k-means: fewer points than clusters",
        ));
    }

    let mean = xs.iter().sum::<f64>() / xs.len() as f64;
    let variance = xs.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / xs.len() as f64;
    let std = variance.sqrt();
    let std = if std > f64::EPSILON { std } else { 1.0 };
    let ys: Vec<f64> = xs.iter().map(|x| x / std).collect();
    let factor = xs[0] / ys[0];

    let mut rng = rand::thread_rng();
    for _ in 0..max_retries.max(1) {
        let mut centroids = seed_centroids(&ys, k, &mut rng);
        for _ in 0..LLOYD_MAX_ITERS {
            let labels: Vec<usize> = ys.iter().map(|&y| nearest(&centroids, y)).collect();
            let updated = recompute_centroids(&ys, &labels, k, &centroids);
            let converged = updated
                .iter()
                .zip(&centroids)
                .all(|(a, b)| (a - b).abs() < 1e-9);
            centroids = updated;
            if converged {
                break;
            }
        }

        let labels: Vec<usize> = ys.iter().map(|&y| nearest(&centroids, y)).collect();
        let distinct: HashSet<usize> = labels.iter().copied().collect();
        if distinct.len() == k {
            let out: Vec<f64> = centroids.iter().map(|c| c * factor).collect();
            return Ok((out, labels));
        }
    }

    Err(MorseError::process(
        "stable k-means exhausted its retry budget without filling every cluster",
    ))
}

fn seed_centroids(ys: &[f64], k: usize, rng: &mut impl Rng) -> Vec<f64> {
    let mut idx: Vec<usize> = (0..ys.len()).collect();
    idx.shuffle(rng);
    idx.into_iter().take(k).map(|i| ys[i]).collect()
}

fn nearest(centroids: &[f64], y: f64) -> usize {
    centroids
        .iter()
        .enumerate()
        .min_by(|(_, a), (_, b)| (y - **a).abs().partial_cmp(&(y - **b).abs()).unwrap())
        .map(|(i, _)| i)
        .expect("centroids is never empty")
}

fn recompute_centroids(ys: &[f64], labels: &[usize], k: usize, prev: &[f64]) -> Vec<f64> {
    let mut sums = vec![0.0; k];
    let mut counts = vec![0usize; k];
    for (&y, &label) in ys.iter().zip(labels) {
        sums[label] += y;
        counts[label] += 1;
    }
    (0..k)
        .map(|i| {
            if counts[i] > 0 {
                sums[i] / counts[i] as f64
            } else {
                prev[i]
            }
        })
        .collect()
}

#[cfg(test)]
mod test {
    use super::*;

    fn synthetic_groups(centers: &[f64], per_group: usize) -> Vec<f64> {
        let mut xs = Vec::with_capacity(centers.len() * per_group);
        for &c in centers {
            for i in 0..per_group {
                // small deterministic jitter, no two points identical
                xs.push(c + (i % 3) as f64 * 0.25 - 0.25);
            }
        }
        xs
    }

    #[test]
    fn recovers_two_well_separated_clusters() {
        let xs = synthetic_groups(&[300.0, 900.0], 12);
        let (centroids, labels) = stable_kmeans(&xs, 2, 10).unwrap();
        assert_eq!(centroids.len(), 2);
        let mut counts = [0usize; 2];
        for l in labels {
            counts[l] += 1;
        }
        assert_eq!(counts, [12, 12]);
    }

    #[test]
    fn recovers_three_well_separated_clusters() {
        let xs = synthetic_groups(&[300.0, 900.0, 2100.0], 12);
        let (centroids, labels) = stable_kmeans(&xs, 3, 10).unwrap();
        assert_eq!(centroids.len(), 3);
        let mut counts = [0usize; 3];
        for l in labels {
            counts[l] += 1;
        }
        assert_eq!(counts, [12, 12, 12]);
    }

    #[test]
    fn rejects_fewer_points_than_clusters() {
        let err = stable_kmeans(&[1.0, 2.0], 3, 5).unwrap_err();
        assert_eq!(err.code(), MorseError::CODE_PROCESS);
    }
}
