use super::random_cloud;
use pillarvox::math::Real;
#[cfg(feature = "parallel")]
use pillarvox::voxelization::ReduceMode;
use pillarvox::voxelization::{
    dynamic_voxelize, Backend, PointCloud, VoxelizationError, VoxelizationParams, Voxelizer,
};

const VOXEL_SIZE: [Real; 3] = [0.5, 0.5, 1.0];
const RANGE: [Real; 6] = [-10.0, -10.0, -3.0, 10.0, 10.0, 1.0];

fn params() -> VoxelizationParams {
    VoxelizationParams::new(&VOXEL_SIZE, &RANGE)
        .with_max_points(5)
        .with_max_voxels(300)
}

#[test]
fn sequential_backend_ignores_non_deterministic_flag() {
    let data = random_cloud(11, 4000, 1, 11.0);
    let cloud = PointCloud::new(&data, 4).unwrap();
    let voxelizer = Voxelizer::new(params());

    let deterministic = voxelizer.voxelize(&cloud, true).unwrap();
    let relaxed = voxelizer.voxelize(&cloud, false).unwrap();
    assert!(relaxed.is_some());
    assert_eq!(deterministic, relaxed);
}

#[test]
fn parallel_non_deterministic_request_produces_nothing() {
    let data = random_cloud(12, 100, 1, 5.0);
    let cloud = PointCloud::new(&data, 4).unwrap();
    let voxelizer = Voxelizer::new(params()).with_backend(Backend::Parallel);

    match voxelizer.voxelize(&cloud, false) {
        Ok(result) => {
            assert!(Backend::Parallel.is_available());
            assert_eq!(result, None);
        }
        Err(err) => {
            assert!(!Backend::Parallel.is_available());
            assert_eq!(err, VoxelizationError::UnsupportedOperation(Backend::Parallel));
        }
    }
}

#[test]
fn validation_comes_before_backend_selection() {
    let cloud = PointCloud::new(&[0.0; 4], 4).unwrap();
    let voxelizer = Voxelizer::new(params().with_max_points(0)).with_backend(Backend::Parallel);
    let err = voxelizer.voxelize(&cloud, true).unwrap_err();
    assert!(err.is_invalid_argument());
}

#[cfg(not(feature = "parallel"))]
#[test]
fn parallel_backend_is_not_compiled_in() {
    let cloud = PointCloud::new(&[0.0; 4], 4).unwrap();
    let voxelizer = Voxelizer::new(params()).with_backend(Backend::Parallel);
    let err = voxelizer.voxelize(&cloud, true).unwrap_err();
    assert!(err.is_unsupported());

    let err = dynamic_voxelize(&cloud, &VOXEL_SIZE, &RANGE, 3, Backend::Parallel).unwrap_err();
    assert!(err.is_unsupported());
}

#[cfg(feature = "parallel")]
#[test]
fn parallel_backend_matches_sequential_backend() {
    for seed in 0..4 {
        let data = random_cloud(seed, 20000, 2, 11.0);
        let cloud = PointCloud::new(&data, 5).unwrap();

        for mode in [None, Some(ReduceMode::Sum), Some(ReduceMode::Mean), Some(ReduceMode::Max)] {
            let mut voxelizer = Voxelizer::new(params());
            if let Some(mode) = mode {
                voxelizer = voxelizer.with_reduce_mode(mode);
            }

            let sequential = voxelizer.voxelize(&cloud, true).unwrap().unwrap();
            let parallel = voxelizer
                .clone()
                .with_backend(Backend::Parallel)
                .voxelize(&cloud, true)
                .unwrap()
                .unwrap();

            assert_eq!(sequential, parallel);
        }

        assert_eq!(
            dynamic_voxelize(&cloud, &VOXEL_SIZE, &RANGE, 3, Backend::Sequential).unwrap(),
            dynamic_voxelize(&cloud, &VOXEL_SIZE, &RANGE, 3, Backend::Parallel).unwrap(),
        );
    }
}

#[cfg(feature = "parallel")]
#[test]
fn parallel_runs_are_identical() {
    let data = random_cloud(99, 50000, 1, 10.0);
    let cloud = PointCloud::new(&data, 4).unwrap();
    let voxelizer = Voxelizer::new(params()).with_backend(Backend::Parallel);

    let first = voxelizer.voxelize(&cloud, true).unwrap().unwrap();
    for _ in 0..3 {
        assert_eq!(voxelizer.voxelize(&cloud, true).unwrap().unwrap(), first);
    }
}
