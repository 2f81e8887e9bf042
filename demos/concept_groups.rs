//! Group a handful of toy document embeddings into concepts, then let auto
//! mode pick the cluster count.

use concept_cluster::{
    ClusterEngine, ClusterOptions, ClusteringResult, InMemoryEmbeddings, Method,
};

fn print_clusters(result: &ClusteringResult) {
    for cluster in &result.clusters {
        let ids: Vec<&str> = cluster.member_ids().collect();
        println!(
            "  {:<12} coherence {:.3}  {:?}",
            cluster.id, cluster.coherence, ids
        );
        for sub in &cluster.sub_clusters {
            let ids: Vec<&str> = sub.member_ids().collect();
            println!("    {:<12} coherence {:.3}  {:?}", sub.id, sub.coherence, ids);
        }
    }
    if !result.unclustered.is_empty() {
        println!("  unclustered: {:?}", result.unclustered);
    }
    println!(
        "  silhouette {:.3}, mean coherence {:.3}",
        result.analytics.silhouette, result.analytics.mean_coherence
    );
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    // Three loose topics in a 3-d embedding space.
    let docs = [
        ("rust-ownership", vec![0.90, 0.10, 0.00]),
        ("rust-lifetimes", vec![0.85, 0.15, 0.05]),
        ("rust-traits", vec![0.80, 0.05, 0.10]),
        ("sourdough", vec![0.05, 0.90, 0.10]),
        ("focaccia", vec![0.10, 0.85, 0.05]),
        ("baguette", vec![0.00, 0.80, 0.15]),
        ("tides", vec![0.10, 0.05, 0.90]),
        ("moon-phases", vec![0.05, 0.10, 0.85]),
        ("eclipses", vec![0.15, 0.00, 0.80]),
    ];
    let ids: Vec<String> = docs.iter().map(|(id, _)| id.to_string()).collect();
    let source: InMemoryEmbeddings = docs.into_iter().collect();

    let engine = ClusterEngine::new(source);

    let options = ClusterOptions {
        max_clusters: 3,
        seed: Some(42),
        ..ClusterOptions::with_method(Method::Kmeans)
    };
    if let Some(result) = engine.cluster_documents(&ids, &options).await?.completed() {
        println!("=== k-means (k=3) ===");
        print_clusters(&result);
    }

    let options = ClusterOptions {
        max_clusters: 2,
        include_sub_clusters: true,
        sub_cluster_min_size: 4,
        sub_cluster_count: 2,
        seed: Some(42),
        ..ClusterOptions::with_method(Method::Hierarchical)
    };
    if let Some(result) = engine.cluster_documents(&ids, &options).await?.completed() {
        println!("\n=== hierarchical (2 clusters, sub-clusters) ===");
        print_clusters(&result);
    }

    if let Some(auto) = engine.auto_cluster(&ids).await?.completed() {
        println!("\n=== auto ===");
        for s in &auto.scores {
            println!("  k={} score {:.3} groups {}", s.k, s.score, s.groups);
        }
        println!("  {}", auto.recommendation);
        print_clusters(&auto.result);
    }

    Ok(())
}
