use kdforest::{
    DistanceMetric, DynamicKdForest, FlatPointCloud, KdForestParams, Manhattan, PointCloud,
    SquaredEuclidean,
};
use rand::Rng;

fn random_cloud(n: usize) -> FlatPointCloud<3> {
    let mut rng = rand::thread_rng();
    let mut cloud = FlatPointCloud::with_capacity(n);
    for _ in 0..n {
        cloud.push([
            rng.gen_range(0.0..1.0),
            rng.gen_range(0.0..1.0),
            rng.gen_range(0.0..1.0),
        ]);
    }
    cloud
}

fn brute_force_knn<M: DistanceMetric<3>>(
    cloud: &FlatPointCloud<3>,
    metric: &M,
    query: &[f64; 3],
    k: usize,
) -> Vec<(usize, f64)> {
    let mut all: Vec<(usize, f64)> = (0..cloud.size())
        .map(|i| (i, metric.distance(query, &cloud.point(i))))
        .collect();
    all.sort_by(|a, b| a.1.partial_cmp(&b.1).unwrap().then(a.0.cmp(&b.0)));
    all.truncate(k);
    all
}

#[test]
fn test_knn_matches_brute_force() {
    let cloud = random_cloud(2000);
    let mut forest = DynamicKdForest::new(&cloud, SquaredEuclidean, KdForestParams::default());

    // Insert in uneven chunks to exercise carry-merges.
    forest.add_points(0, 999).unwrap();
    forest.add_points(1000, 1499).unwrap();
    forest.add_points(1500, 1999).unwrap();

    let mut rng = rand::thread_rng();
    for _ in 0..50 {
        let query = [
            rng.gen_range(-0.2..1.2),
            rng.gen_range(-0.2..1.2),
            rng.gen_range(-0.2..1.2),
        ];
        for k in [1, 5, 17] {
            let expected = brute_force_knn(&cloud, &SquaredEuclidean, &query, k);
            let got = forest.find_knn(&query, k);

            assert_eq!(got.len(), k);
            for (n, (index, dist)) in got.iter().zip(expected) {
                assert_eq!(n.index, index);
                assert!((n.dist - dist).abs() < 1e-12);
            }
        }
    }
}

#[test]
fn test_knn_with_manhattan_metric() {
    let cloud = random_cloud(500);
    let mut forest = DynamicKdForest::new(&cloud, Manhattan, KdForestParams::default());
    forest.add_points(0, 499).unwrap();

    let query = [0.5, 0.5, 0.5];
    let expected = brute_force_knn(&cloud, &Manhattan, &query, 10);
    let got = forest.find_knn(&query, 10);

    for (n, (index, dist)) in got.iter().zip(expected) {
        assert_eq!(n.index, index);
        assert!((n.dist - dist).abs() < 1e-12);
    }
}

#[test]
fn test_knn_is_ascending() {
    let cloud = random_cloud(1000);
    let mut forest = DynamicKdForest::new(&cloud, SquaredEuclidean, KdForestParams::default());
    forest.add_points(0, 999).unwrap();

    let got = forest.find_knn(&[0.1, 0.9, 0.5], 25);
    assert_eq!(got.len(), 25);
    for pair in got.windows(2) {
        assert!(pair[0].dist <= pair[1].dist);
    }
}

#[test]
fn test_knn_returns_fewer_when_short() {
    let cloud = random_cloud(3);
    let mut forest = DynamicKdForest::new(&cloud, SquaredEuclidean, KdForestParams::default());
    forest.add_points(0, 2).unwrap();

    assert_eq!(forest.find_knn(&[0.0, 0.0, 0.0], 10).len(), 3);
    assert!(forest.find_knn(&[0.0, 0.0, 0.0], 0).is_empty());
}

#[test]
fn test_knn_independent_of_subtree_layout() {
    let cloud = random_cloud(1024);

    // One big batch versus many small ones: the forests partition points
    // differently but must answer identically.
    let mut bulk = DynamicKdForest::new(&cloud, SquaredEuclidean, KdForestParams::default());
    bulk.add_points(0, 1023).unwrap();

    let mut chunked = DynamicKdForest::new(&cloud, SquaredEuclidean, KdForestParams::default());
    let mut next = 0;
    for chunk in [100, 1, 399, 24, 500] {
        chunked.add_points(next, next + chunk - 1).unwrap();
        next += chunk;
    }
    assert_eq!(next, 1024);

    let mut rng = rand::thread_rng();
    for _ in 0..20 {
        let query = [
            rng.gen_range(0.0..1.0),
            rng.gen_range(0.0..1.0),
            rng.gen_range(0.0..1.0),
        ];
        let a = bulk.find_knn(&query, 8);
        let b = chunked.find_knn(&query, 8);
        assert_eq!(a.len(), b.len());
        for (na, nb) in a.iter().zip(&b) {
            assert_eq!(na.index, nb.index);
            assert!((na.dist - nb.dist).abs() < 1e-12);
        }
    }
}
