//! Random sub-sampling without replacement.

use rand::Rng;

/// A random sub-sample of a population.
#[derive(Debug, Clone, PartialEq)]
pub struct Sample {
    /// Positions of the drawn values in the population, in draw order.
    pub indices: Vec<usize>,
    /// The drawn values, in draw order.
    pub values: Vec<f64>,
}

/// Draws `size` distinct positions from `population` uniformly at random.
///
/// If `size` exceeds the population, the whole population is returned in a
/// random order.
///
/// # Examples
///
/// ```
/// use rand::SeedableRng;
/// use samplingviz_stats::sample::draw_sample;
///
/// let mut rng = rand::rngs::StdRng::seed_from_u64(7);
/// let sample = draw_sample(&[1.0, 2.0, 3.0, 4.0], 2, &mut rng);
/// assert_eq!(sample.values.len(), 2);
/// ```
pub fn draw_sample<R>(population: &[f64], size: usize, rng: &mut R) -> Sample
where
    R: Rng + ?Sized,
{
    let amount = size.min(population.len());
    let indices = rand::seq::index::sample(rng, population.len(), amount).into_vec();
    let values = indices.iter().map(|&i| population[i]).collect();
    tracing::debug!(population = population.len(), amount, "drew sample");
    Sample { indices, values }
}
