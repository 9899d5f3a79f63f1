use pillarvox::math::Real;
use pillarvox::voxelization::{
    voxelize, Capacity, InvalidArgument, PointCloud, VoxelizationError, VoxelizationParams,
    Voxelizer,
};

const UNIT_GRID: [Real; 3] = [1.0, 1.0, 1.0];
const RANGE: [Real; 6] = [0.0, 0.0, 0.0, 10.0, 10.0, 10.0];

#[test]
fn full_voxel_keeps_first_points_and_true_count() {
    // Five points in voxel (2, 3, 4), tagged by their intensity.
    let points: Vec<Real> = (0..5)
        .flat_map(|i| [2.1 + i as Real * 0.1, 3.5, 4.5, i as Real])
        .collect();
    let cloud = PointCloud::new(&points, 4).unwrap();

    let result = voxelize(&cloud, &UNIT_GRID, &RANGE, 3, 100, None, true)
        .unwrap()
        .unwrap();

    assert_eq!(result.num_voxels(), 1);
    assert_eq!(result.coords()[0].as_slice(), &[2, 3, 4]);
    assert_eq!(result.num_points_per_voxel(), &[3]);
    assert_eq!(result.true_num_points_per_voxel(), &[5]);

    let tags: Vec<Real> = result.voxel_points(0).unwrap().map(|pt| pt[3]).collect();
    assert_eq!(tags, vec![0.0, 1.0, 2.0]);
    assert_eq!(result.stats().dropped_by_max_points, 2);
}

#[test]
fn voxel_budget_drops_later_voxels_entirely() {
    let points = [
        5.5, 5.5, 5.5, //
        1.5, 1.5, 1.5, //
        5.2, 5.7, 5.1, //
        1.1, 1.2, 1.3,
    ];
    let cloud = PointCloud::new(&points, 3).unwrap();

    let result = voxelize(&cloud, &UNIT_GRID, &RANGE, 32, 1, None, true)
        .unwrap()
        .unwrap();

    assert_eq!(result.num_voxels(), 1);
    assert_eq!(result.coords()[0].as_slice(), &[5, 5, 5]);
    assert_eq!(result.num_points_per_voxel(), &[2]);
    assert_eq!(result.find(&[1, 1, 1]), None);
    assert_eq!(result.stats().dropped_by_max_voxels, 2);
}

#[test]
fn unknown_reduce_mode_is_rejected() {
    // The coordinates range is invalid too: the reduce mode is checked first.
    let cloud = PointCloud::new(&[1.0, 2.0, 3.0], 3).unwrap();
    let err = voxelize(&cloud, &UNIT_GRID, &[0.0; 6], 32, 100, Some("avg"), true).unwrap_err();

    assert_eq!(
        err,
        VoxelizationError::InvalidArgument(InvalidArgument::UnknownReduceMode("avg".to_owned()))
    );
    assert!(err.is_invalid_argument());
    assert!(err.to_string().contains("avg"));
}

#[test]
fn empty_cloud() {
    let cloud = PointCloud::new(&[], 4).unwrap();
    let result = voxelize(&cloud, &UNIT_GRID, &RANGE, 32, 100, Some("max"), true)
        .unwrap()
        .unwrap();

    assert!(result.is_empty());
    assert!(result.coords().is_empty());
    assert!(result.num_points_per_voxel().is_empty());
    assert_eq!(result.stats().num_points, 0);
}

#[test]
fn out_of_range_points_are_ignored() {
    let points = [
        -0.5, 1.0, 1.0, //
        1.0, 10.0, 1.0, //
        1.0, 1.0, 12.0, //
        9.99, 0.0, 0.0,
    ];
    let cloud = PointCloud::new(&points, 3).unwrap();
    let result = voxelize(&cloud, &UNIT_GRID, &RANGE, -1, -1, None, true)
        .unwrap()
        .unwrap();

    assert_eq!(result.num_voxels(), 1);
    assert_eq!(result.coords()[0].as_slice(), &[9, 0, 0]);
    assert_eq!(result.true_num_points_per_voxel(), &[1]);
    assert_eq!(result.stats().out_of_range, 3);
}

#[test]
fn ranges_that_are_not_whole_numbers_of_voxels() {
    // 2.6 voxels along x: the third cell is cut at 2.6.
    let long_range = [0.0, 0.0, 0.0, 2.6, 1.0, 1.0];
    let beyond = PointCloud::new(&[2.8, 0.5, 0.5], 3).unwrap();
    let result = voxelize(&beyond, &UNIT_GRID, &long_range, 32, 100, None, true)
        .unwrap()
        .unwrap();
    assert!(result.is_empty());
    assert_eq!(result.stats().out_of_range, 1);

    let inside = PointCloud::new(&[2.5, 0.5, 0.5], 3).unwrap();
    let result = voxelize(&inside, &UNIT_GRID, &long_range, 32, 100, None, true)
        .unwrap()
        .unwrap();
    assert_eq!(result.coords()[0].as_slice(), &[2, 0, 0]);

    // 2.4 voxels along x: the partial third cell still admits points.
    let short_range = [0.0, 0.0, 0.0, 2.4, 1.0, 1.0];
    let inside = PointCloud::new(&[2.2, 0.5, 0.5], 3).unwrap();
    let result = voxelize(&inside, &UNIT_GRID, &short_range, 32, 100, None, true)
        .unwrap()
        .unwrap();
    assert_eq!(result.num_voxels(), 1);
    assert_eq!(result.coords()[0].as_slice(), &[2, 0, 0]);
    assert_eq!(result.stats().out_of_range, 0);
}

#[test]
fn unbounded_capacities() {
    let points: Vec<Real> = (0..1000).flat_map(|i| [0.5, 0.5, (i % 10) as Real + 0.5]).collect();
    let cloud = PointCloud::new(&points, 3).unwrap();
    let params = VoxelizationParams::new(&UNIT_GRID, &RANGE)
        .with_capacities(Capacity::Unbounded, Capacity::Unbounded);
    let result = Voxelizer::new(params).voxelize(&cloud, true).unwrap().unwrap();

    assert_eq!(result.num_voxels(), 10);
    assert!(result.num_points_per_voxel().iter().all(|n| *n == 100));
    assert_eq!(result.stats().num_stored(), 1000);
}

#[test]
fn malformed_arguments() {
    let cloud = PointCloud::new(&[1.0, 2.0, 3.0], 3).unwrap();

    let err = voxelize(&cloud, &[1.0, 1.0], &RANGE, 32, 100, None, true).unwrap_err();
    assert!(matches!(
        err,
        VoxelizationError::InvalidArgument(InvalidArgument::DimensionMismatch {
            what: "voxel_size",
            ..
        })
    ));

    let err = voxelize(&cloud, &UNIT_GRID, &RANGE, 0, 100, None, true).unwrap_err();
    assert_eq!(
        err,
        VoxelizationError::InvalidArgument(InvalidArgument::ZeroCapacity("max_points"))
    );

    // 4D grid over 3-wide rows.
    let range_4d = [0.0, 0.0, 0.0, 0.0, 1.0, 1.0, 1.0, 1.0];
    let err = voxelize(&cloud, &[1.0; 4], &range_4d, 32, 100, None, true).unwrap_err();
    assert!(matches!(
        err,
        VoxelizationError::InvalidArgument(InvalidArgument::PointStride { ndim: 4, .. })
    ));
}
