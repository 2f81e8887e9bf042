use concept_cluster::cluster::{Agglomerative, Clustering, Kmeans, Partition};
use concept_cluster::{
    cosine_similarity, euclidean_distance, reduce_dimensions, silhouette_score,
};
use proptest::prelude::*;

fn points(dim: usize, max: usize) -> impl Strategy<Value = Vec<Vec<f32>>> {
    prop::collection::vec(prop::collection::vec(-10.0f32..10.0, dim), 1..max)
}

/// Every point lands in exactly one non-empty group, and labels agree.
fn check_partition(p: &Partition, n: usize) -> Result<(), TestCaseError> {
    prop_assert_eq!(p.labels.len(), n);
    let mut seen = vec![false; n];
    for (gid, g) in p.groups.iter().enumerate() {
        prop_assert!(!g.is_empty());
        for &i in &g.members {
            prop_assert!(!seen[i], "point {} in two groups", i);
            seen[i] = true;
            prop_assert_eq!(p.labels[i], gid);
        }
    }
    prop_assert!(seen.iter().all(|&s| s));
    Ok(())
}

proptest! {
    #[test]
    fn prop_kmeans_partitions_input(data in points(2, 20), k in 1usize..6) {
        let p = Kmeans::new(k).with_seed(42).fit(&data).unwrap();
        check_partition(&p, data.len())?;
        prop_assert!(p.n_groups() <= k.min(data.len()));
    }

    #[test]
    fn prop_agglomerative_partitions_input(data in points(3, 16), target in 1usize..5) {
        let p = Agglomerative::new(target).fit(&data).unwrap();
        check_partition(&p, data.len())?;
        prop_assert_eq!(p.n_groups(), target.min(data.len()));
    }

    #[test]
    fn prop_coherence_in_unit_interval(data in points(2, 20), k in 1usize..4) {
        let p = Kmeans::new(k).with_seed(7).fit(&data).unwrap();
        for g in &p.groups {
            prop_assert!(g.coherence > 0.0 && g.coherence <= 1.0);
        }
    }

    #[test]
    fn prop_silhouette_bounded(data in points(2, 20), k in 2usize..5) {
        let labels = Kmeans::new(k).with_seed(1).fit_predict(&data).unwrap();
        let s = silhouette_score(&data, &labels).unwrap();
        prop_assert!((-1.0..=1.0).contains(&s), "silhouette {}", s);
    }

    #[test]
    fn prop_cosine_symmetric_and_bounded(
        a in prop::collection::vec(-5.0f32..5.0, 4),
        b in prop::collection::vec(-5.0f32..5.0, 4),
    ) {
        let ab = cosine_similarity(&a, &b).unwrap();
        let ba = cosine_similarity(&b, &a).unwrap();
        prop_assert!((ab - ba).abs() < 1e-6);
        prop_assert!((-1.0..=1.0).contains(&ab));
    }

    #[test]
    fn prop_euclidean_metric_basics(
        a in prop::collection::vec(-5.0f32..5.0, 3),
        b in prop::collection::vec(-5.0f32..5.0, 3),
    ) {
        prop_assert_eq!(euclidean_distance(&a, &a).unwrap(), 0.0);
        let ab = euclidean_distance(&a, &b).unwrap();
        prop_assert!(ab >= 0.0);
        prop_assert!((ab - euclidean_distance(&b, &a).unwrap()).abs() < 1e-5);
    }

    #[test]
    fn prop_reduce_keeps_shape(data in points(4, 12), target in 1usize..6) {
        let out = reduce_dimensions(&data, target).unwrap();
        prop_assert_eq!(out.len(), data.len());
        for row in &out {
            prop_assert_eq!(row.len(), target.min(4));
        }
    }
}
