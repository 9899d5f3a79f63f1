mod backends;
mod reduction;
mod scenarios;

use pillarvox::math::Real;

/// A seeded cloud of `n` points with `channels` extra features, spread over
/// `[-extent, extent]` along each of the three spatial dimensions.
pub fn random_cloud(seed: u64, n: usize, channels: usize, extent: Real) -> Vec<Real> {
    let mut rng = oorandom::Rand64::new(seed as u128);
    let row_width = 3 + channels;
    let mut data = Vec::with_capacity(n * row_width);

    for _ in 0..n {
        for _ in 0..3 {
            data.push((rng.rand_float() as Real * 2.0 - 1.0) * extent);
        }
        for _ in 0..channels {
            data.push(rng.rand_float() as Real);
        }
    }

    data
}
