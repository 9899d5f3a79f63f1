use approx::assert_relative_eq;
use pillarvox::math::Real;
use pillarvox::voxelization::{
    PointCloud, ReduceMode, Representation, VoxelFeatures, VoxelizationParams, Voxelizer,
};

// Two voxels: (0, 0, 0) receives four points, (1, 0, 0) receives one.
const POINTS: [Real; 20] = [
    0.1, 0.2, 0.3, 1.0, //
    0.4, 0.5, 0.6, 8.0, //
    1.5, 0.5, 0.5, 4.0, //
    0.7, 0.8, 0.9, 3.0, //
    0.9, 0.9, 0.9, 100.0, // <- over capacity, must not be reduced.
];

fn reduce(mode: ReduceMode) -> pillarvox::voxelization::VoxelizationResult {
    let cloud = PointCloud::new(&POINTS, 4).unwrap();
    let params = VoxelizationParams::new(&[1.0, 1.0, 1.0], &[0.0, 0.0, 0.0, 2.0, 2.0, 2.0])
        .with_max_points(3);
    Voxelizer::new(params)
        .with_reduce_mode(mode)
        .voxelize(&cloud, true)
        .unwrap()
        .unwrap()
}

#[test]
fn sum_over_stored_points() {
    let result = reduce(ReduceMode::Sum);
    assert_eq!(result.num_points_per_voxel(), &[3, 1]);
    assert_eq!(result.true_num_points_per_voxel(), &[4, 1]);

    let row = result.reduced_row(0).unwrap();
    assert_relative_eq!(row[0], 1.2, epsilon = 1.0e-5);
    assert_relative_eq!(row[1], 1.5, epsilon = 1.0e-5);
    assert_relative_eq!(row[2], 1.8, epsilon = 1.0e-5);
    assert_relative_eq!(row[3], 12.0);
    assert_eq!(result.reduced_row(1).unwrap(), &[1.5, 0.5, 0.5, 4.0]);
}

#[test]
fn mean_over_stored_points() {
    let result = reduce(ReduceMode::Mean);
    let row = result.reduced_row(0).unwrap();
    assert_relative_eq!(row[0], 0.4, epsilon = 1.0e-5);
    assert_relative_eq!(row[1], 0.5, epsilon = 1.0e-5);
    assert_relative_eq!(row[2], 0.6, epsilon = 1.0e-5);
    assert_relative_eq!(row[3], 4.0);
    assert_eq!(result.reduced_row(1).unwrap(), &[1.5, 0.5, 0.5, 4.0]);
}

#[test]
fn max_over_stored_points() {
    let result = reduce(ReduceMode::Max);
    assert_eq!(result.reduced_row(0).unwrap(), &[0.7, 0.8, 0.9, 8.0]);
}

#[test]
fn reduced_and_raw_representations_are_exclusive() {
    let result = reduce(ReduceMode::Sum);
    assert!(result.voxel_points(0).is_none());
    assert!(matches!(
        result.features(),
        VoxelFeatures::Reduced {
            mode: ReduceMode::Sum,
            ..
        }
    ));

    let cloud = PointCloud::new(&POINTS, 4).unwrap();
    let params = VoxelizationParams::new(&[1.0, 1.0, 1.0], &[0.0, 0.0, 0.0, 2.0, 2.0, 2.0]);
    let raw = Voxelizer::new(params)
        .with_representation(Representation::Points)
        .voxelize(&cloud, true)
        .unwrap()
        .unwrap();
    assert!(raw.reduced_row(0).is_none());
    assert_eq!(raw.voxel_points(0).unwrap().len(), 4);
}

#[test]
fn reduction_matches_manual_reduction_of_raw_points() {
    let cloud = PointCloud::new(&POINTS, 4).unwrap();
    let params = VoxelizationParams::new(&[1.0, 1.0, 1.0], &[0.0, 0.0, 0.0, 2.0, 2.0, 2.0])
        .with_max_points(3);
    let raw = Voxelizer::new(params.clone())
        .voxelize(&cloud, true)
        .unwrap()
        .unwrap();

    for mode in [ReduceMode::Sum, ReduceMode::Mean, ReduceMode::Max] {
        let reduced = Voxelizer::new(params.clone())
            .with_reduce_mode(mode)
            .voxelize(&cloud, true)
            .unwrap()
            .unwrap();

        for i in 0..raw.num_voxels() {
            let mut expected = [0.0; 4];
            let _ = mode.reduce(raw.voxel_points(i).unwrap(), &mut expected);
            assert_eq!(reduced.reduced_row(i).unwrap(), &expected);
        }
    }
}
