use rand::Rng;
use rand_distr::StandardNormal;

/// Uniform draw on [0, 1). Every probabilistic
/// branch takes exactly one of these.
pub(crate) fn unit<R: Rng + ?Sized>(rng: &mut R) -> f64 {
    rng.gen::<f64>()
}

/// Draw from N(mean, stdev).
pub(crate) fn gaussian<R: Rng + ?Sized>(rng: &mut R, mean: f64, stdev: f64) -> f64 {
    let z: f64 = rng.sample(StandardNormal);
    mean + z * stdev
}

/// Fair coin, used by crossover field selection.
pub(crate) fn coin<R: Rng + ?Sized>(rng: &mut R) -> bool {
    unit(rng) < 0.5
}
