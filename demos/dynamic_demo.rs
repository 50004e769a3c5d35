//! Chunked insertion, removal and query walkthrough over a random cloud.
//!
//! Run with `cargo run --example dynamic_demo --release`.

use kdforest::{DynamicKdForest, FlatPointCloud, KdForestParams, SquaredEuclidean};
use rand::Rng;

const NUM_POINTS: usize = 1_000_000;
const CHUNK: usize = 100;

fn main() {
    let mut rng = rand::thread_rng();
    let mut cloud = FlatPointCloud::<3>::with_capacity(NUM_POINTS);
    for _ in 0..NUM_POINTS {
        cloud.push([
            rng.gen_range(0.0..1.0),
            rng.gen_range(0.0..1.0),
            rng.gen_range(0.0..1.0),
        ]);
    }

    let mut index = DynamicKdForest::new(&cloud, SquaredEuclidean, KdForestParams::default());

    let mut first = 0;
    while first < NUM_POINTS {
        let last = (first + CHUNK - 1).min(NUM_POINTS - 1);
        index.add_points(first, last).unwrap();
        first += CHUNK;
    }

    // Drop the most recent point again.
    index.remove_point(NUM_POINTS - 1);

    let stats = index.stats();
    println!(
        "forest: {} subtrees, {} live / {} total points, ~{} KiB",
        stats.subtrees,
        stats.live_points,
        stats.total_points,
        stats.heap_bytes / 1024
    );

    let query = [0.5, 0.5, 0.5];

    let nearest = index.find_knn(&query, 1);
    println!("knn(k=1):");
    for n in &nearest {
        println!("  index: {}, dist_sq: {:.6}, point: {:?}", n.index, n.dist, cloud.point(n.index));
    }

    let top5 = index.find_knn(&query, 5);
    println!("knn(k=5):");
    for (rank, n) in top5.iter().enumerate() {
        println!("  #{rank}: index: {}, dist_sq: {:.6}", n.index, n.dist);
    }

    let in_radius = index.find_radius(&query, 0.0005);
    println!(
        "radius(r_sq=0.0005): {} points, worst dist_sq {:.6}",
        in_radius.len(),
        in_radius.worst_item().map_or(f64::NAN, |n| n.dist)
    );
}
