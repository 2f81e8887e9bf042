use super::quality::coherence;
use super::traits::{Group, Partition};
use crate::error::{Error, Result};
use crate::vector::squared_euclidean;

/// Check that every point has the dimensionality of the first one.
///
/// Returns that dimensionality (0 for empty input).
pub(crate) fn check_dimensions(data: &[Vec<f32>]) -> Result<usize> {
    let Some(first) = data.first() else {
        return Ok(0);
    };
    let d = first.len();
    for (index, point) in data.iter().enumerate().skip(1) {
        if point.len() != d {
            return Err(Error::DimensionMismatch {
                index,
                expected: d,
                found: point.len(),
            });
        }
    }
    Ok(d)
}

/// Mean of the points at `members`. `members` must be non-empty.
pub(crate) fn mean_of(data: &[Vec<f32>], members: &[usize], dim: usize) -> Vec<f32> {
    debug_assert!(!members.is_empty());
    let mut out = vec![0.0f32; dim];
    for &i in members {
        for (o, x) in out.iter_mut().zip(&data[i]) {
            *o += x;
        }
    }
    let n = members.len() as f32;
    for o in &mut out {
        *o /= n;
    }
    out
}

/// Index of the nearest centroid. Ties go to the lowest index.
#[inline]
pub(crate) fn nearest(point: &[f32], centroids: &[Vec<f32>]) -> usize {
    let mut best = 0;
    let mut best_dist = f32::INFINITY;
    for (k, c) in centroids.iter().enumerate() {
        let dist = squared_euclidean(point, c);
        if dist < best_dist {
            best_dist = dist;
            best = k;
        }
    }
    best
}

/// Build a partition from raw labels in `0..n_slots`.
///
/// Empty slots are dropped and the surviving groups are renumbered in slot
/// order; centroids are recomputed from the final membership.
pub(crate) fn partition_from_labels(
    data: &[Vec<f32>],
    dim: usize,
    raw_labels: &[usize],
    n_slots: usize,
    iterations: usize,
    converged: bool,
) -> Partition {
    let mut slots: Vec<Vec<usize>> = vec![Vec::new(); n_slots];
    for (i, &l) in raw_labels.iter().enumerate() {
        slots[l].push(i);
    }

    let mut labels = vec![0usize; raw_labels.len()];
    let mut groups = Vec::with_capacity(n_slots);
    let mut inertia = 0.0f32;

    for members in slots.into_iter().filter(|m| !m.is_empty()) {
        let gid = groups.len();
        let centroid = mean_of(data, &members, dim);

        let mut dist_sum = 0.0f32;
        for &i in &members {
            labels[i] = gid;
            let d2 = squared_euclidean(&data[i], &centroid);
            inertia += d2;
            dist_sum += d2.sqrt();
        }

        let coherence = coherence(dist_sum / members.len() as f32);
        groups.push(Group {
            centroid,
            members,
            coherence,
        });
    }

    Partition {
        groups,
        labels,
        iterations,
        converged,
        inertia,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_slots_are_dropped_and_renumbered() {
        let data = vec![vec![0.0], vec![1.0], vec![10.0]];
        let p = partition_from_labels(&data, 1, &[3, 3, 1], 4, 1, true);

        assert_eq!(p.n_groups(), 2);
        assert_eq!(p.labels, vec![1, 1, 0]);
        assert_eq!(p.groups[0].members, vec![2]);
        assert_eq!(p.groups[1].members, vec![0, 1]);
        assert_eq!(p.groups[0].coherence, 1.0);
        assert!((p.groups[1].centroid[0] - 0.5).abs() < 1e-6);
        assert!((p.inertia - 0.5).abs() < 1e-6);
    }

    #[test]
    fn nearest_breaks_ties_low() {
        let centroids = vec![vec![1.0], vec![-1.0], vec![1.0]];
        assert_eq!(nearest(&[0.0], &centroids), 0);
        assert_eq!(nearest(&[1.0], &centroids), 0);
        assert_eq!(nearest(&[-0.5], &centroids), 1);
    }

    #[test]
    fn dimension_check_reports_index() {
        let data = vec![vec![1.0, 2.0], vec![3.0]];
        assert_eq!(
            check_dimensions(&data),
            Err(Error::DimensionMismatch {
                index: 1,
                expected: 2,
                found: 1
            })
        );
        assert_eq!(check_dimensions(&[]), Ok(0));
    }
}
