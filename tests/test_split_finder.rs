use approx::assert_relative_eq;
use subhalo_finder::search::brute_force_in_sphere;
use subhalo_finder::{PeriodicGrid, PeriodicPolicy, SplitSubhaloFinder, search_batch};

#[test]
fn test_query_across_seam() {
    let width = 50.0;
    let xs = [49.99, 25.0, 0.5];
    let ys = [10.0, 10.0, 49.8];
    let zs = [10.0, 10.0, 10.0];
    let mut grid = PeriodicGrid::new(10, width, xs.len()).unwrap();
    grid.insert(&xs, &ys, &zs).unwrap();

    let mut finder = SplitSubhaloFinder::new(&grid, &xs, &ys, &zs).unwrap();
    assert_eq!(finder.policy(), PeriodicPolicy::MinimumImage);

    let (idx, dr2) = finder.find_subhalos([0.02, 10.0, 10.0], 0.1).unwrap();
    assert_eq!(idx, &[0]);
    assert_relative_eq!(dr2[0], 0.0009, epsilon = 1e-10);

    // Wraps along y from the low face.
    let (idx, dr2) = finder.find_subhalos([0.5, 0.1, 10.0], 0.5).unwrap();
    assert_eq!(idx, &[2]);
    assert_relative_eq!(dr2[0], 0.09, epsilon = 1e-9);
}

#[test]
fn test_matches_brute_force() {
    let width = 20.0;
    let n = 300;
    let xs: Vec<f64> = (0..n).map(|i| (i as f64 * 0.731) % width).collect();
    let ys: Vec<f64> = (0..n).map(|i| (i as f64 * 1.619) % width).collect();
    let zs: Vec<f64> = (0..n).map(|i| (i as f64 * 3.141) % width).collect();
    let mut grid = PeriodicGrid::new(8, width, n).unwrap();
    grid.insert(&xs, &ys, &zs).unwrap();
    let domain = *grid.domain();

    let mut finder = SplitSubhaloFinder::new(&grid, &xs, &ys, &zs).unwrap();
    for (center, radius) in [
        ([0.0, 0.0, 0.0], 3.0),
        ([19.9, 10.0, 0.1], 4.5),
        ([10.0, 10.0, 10.0], 0.0),
        ([5.0, 15.0, 2.0], 12.0),
    ] {
        let (idx, dr2) = finder.find_subhalos(center, radius).unwrap();
        let mut got: Vec<(usize, f64)> = idx.iter().copied().zip(dr2.iter().copied()).collect();
        got.sort_by_key(|&(j, _)| j);

        let mut expected = brute_force_in_sphere(
            &domain,
            &xs,
            &ys,
            &zs,
            center,
            radius,
            PeriodicPolicy::MinimumImage,
        );
        expected.sort_by_key(|&(j, _)| j);

        assert_eq!(got.len(), expected.len());
        for ((gj, gd), (ej, ed)) in got.iter().zip(&expected) {
            assert_eq!(gj, ej);
            assert_relative_eq!(*gd, *ed, epsilon = 1e-9);
        }
    }
}

#[test]
fn test_batch_agrees_with_single_queries() {
    let width = 12.0;
    let xs: Vec<f64> = (0..120).map(|i| (i as f64 * 0.913) % width).collect();
    let ys: Vec<f64> = (0..120).map(|i| (i as f64 * 1.377) % width).collect();
    let zs: Vec<f64> = (0..120).map(|i| (i as f64 * 2.281) % width).collect();
    let mut grid = PeriodicGrid::new(4, width, xs.len()).unwrap();
    grid.insert(&xs, &ys, &zs).unwrap();

    let targets = [[0.0, 0.0, 0.0, 2.0], [6.0, 11.5, 3.0, 1.2], [11.9, 0.1, 5.0, 3.5]];
    let batch = search_batch(&grid, &xs, &ys, &zs, &targets, false).unwrap();

    let mut finder = SplitSubhaloFinder::new(&grid, &xs, &ys, &zs).unwrap();
    for (t, result) in targets.iter().zip(&batch) {
        let (idx, dr2) = finder.find_subhalos([t[0], t[1], t[2]], t[3]).unwrap();
        assert_eq!(result.indices, idx);
        assert_eq!(result.dist_sq, dr2);
    }
}
