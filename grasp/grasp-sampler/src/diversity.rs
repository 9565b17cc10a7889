//! Diversity-based down-selection of grasp sets.
//!
//! Each grasp is embedded as a weighted feature vector of its center, axis,
//! local surface shape and width. Selection is a greedy farthest-point
//! sweep: a point joins when it is farther than the current threshold from
//! everything already chosen, and the threshold halves every round.

use grasp_object::GraspableObject;
use grasp_types::{DiversityParams, ParallelJawGrasp};
use nalgebra::{Matrix3, Point3, SVector, SymmetricEigen, Vector3};
use rand::Rng;
use rand::seq::SliceRandom;
use tracing::{debug, info};

/// Length of a grasp feature vector: center, axis, variance ratios, width.
pub const FEATURE_DIM: usize = 10;

/// A weighted grasp embedding.
pub type GraspFeature = SVector<f64, FEATURE_DIM>;

/// Greedy farthest-point selection of a diverse grasp subset.
///
/// # Example
///
/// ```
/// use grasp_sampler::DiversitySelector;
/// use grasp_types::DiversityParams;
/// use nalgebra::SVector;
/// use rand::SeedableRng;
/// use rand::rngs::StdRng;
///
/// let features: Vec<SVector<f64, 10>> = (0..20)
///     .map(|i| SVector::<f64, 10>::repeat(f64::from(i)))
///     .collect();
///
/// let selector = DiversitySelector::new(DiversityParams::default().with_num_samples(5));
/// let mut rng = StdRng::seed_from_u64(0);
/// let picked = selector.select_indices(&features, &mut rng);
/// assert_eq!(picked.len(), 5);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct DiversitySelector {
    params: DiversityParams,
    dist_thresh_multiplier: f64,
}

impl DiversitySelector {
    /// Create a selector that never stops early on the threshold.
    #[must_use]
    pub fn new(params: DiversityParams) -> Self {
        Self {
            params,
            dist_thresh_multiplier: 0.0,
        }
    }

    /// Stop once the threshold drops below `multiplier` times the largest
    /// pairwise feature distance.
    #[must_use]
    pub fn with_dist_thresh_multiplier(mut self, multiplier: f64) -> Self {
        self.dist_thresh_multiplier = multiplier.max(0.0);
        self
    }

    /// Selection parameters.
    #[must_use]
    pub fn params(&self) -> &DiversityParams {
        &self.params
    }

    /// Weighted feature vector of every grasp.
    pub fn feature_vectors<O>(&self, object: &O, grasps: &[ParallelJawGrasp]) -> Vec<GraspFeature>
    where
        O: GraspableObject + ?Sized,
    {
        let surface_points = object.surface_points();
        let p = &self.params;

        grasps
            .iter()
            .map(|grasp| {
                let center = grasp.center();
                let radius = grasp.max_width();
                let local: Vec<Point3<f64>> = surface_points
                    .iter()
                    .filter(|s| (*s - center).norm() < radius)
                    .copied()
                    .collect();
                let variances = explained_variance_ratio(&local);

                let mut feature = GraspFeature::zeros();
                feature
                    .fixed_rows_mut::<3>(0)
                    .copy_from(&(center.coords * p.gamma_center));
                feature
                    .fixed_rows_mut::<3>(3)
                    .copy_from(&(grasp.axis() * p.gamma_axis));
                feature
                    .fixed_rows_mut::<3>(6)
                    .copy_from(&(variances * p.gamma_variances));
                feature[9] = grasp.max_width() * p.gamma_width;
                feature
            })
            .collect()
    }

    /// Select a diverse subset of `grasps`, in selection order.
    pub fn select<O, R>(&self, object: &O, grasps: Vec<ParallelJawGrasp>, rng: &mut R) -> Vec<ParallelJawGrasp>
    where
        O: GraspableObject + ?Sized,
        R: Rng + ?Sized,
    {
        let features = self.feature_vectors(object, &grasps);
        let indices = self.select_indices(&features, rng);

        let mut slots: Vec<Option<ParallelJawGrasp>> = grasps.into_iter().map(Some).collect();
        let selected: Vec<ParallelJawGrasp> = indices
            .iter()
            .filter_map(|&i| slots.get_mut(i).and_then(Option::take))
            .collect();

        info!("Selected {} of {} grasps for diversity", selected.len(), slots.len());
        selected
    }

    /// Indices of a diverse subset of `features`, in selection order.
    ///
    /// Runs at most `max_iter - 1` rounds and returns at most `num_samples`
    /// indices. Never fails; small or degenerate inputs yield fewer indices.
    pub fn select_indices<R>(&self, features: &[GraspFeature], rng: &mut R) -> Vec<usize>
    where
        R: Rng + ?Sized,
    {
        let quota = self.params.num_samples;
        let mut selected: Vec<usize> = Vec::new();
        if features.is_empty() || quota == 0 {
            return selected;
        }

        let max_dist = max_pairwise_distance(features);
        let floor = self.dist_thresh_multiplier * max_dist;
        let mut threshold = max_dist;
        let mut chosen = vec![false; features.len()];

        // Rounds are numbered from 1, so `max_iter` allows `max_iter - 1` of them
        for round in 1..self.params.max_iter {
            if selected.len() >= quota {
                break;
            }
            if threshold < floor {
                debug!("Diversity threshold {:.4} below floor at round {}", threshold, round);
                break;
            }

            let mut pending: Vec<usize> = Vec::new();
            for (i, feature) in features.iter().enumerate() {
                if chosen[i] {
                    continue;
                }
                let min_dist = selected
                    .iter()
                    .chain(pending.iter())
                    .map(|&j| (feature - features[j]).norm())
                    .fold(f64::INFINITY, f64::min);
                if min_dist > threshold {
                    pending.push(i);
                }
            }

            let remaining = quota - selected.len();
            if pending.len() > remaining {
                pending.shuffle(rng);
                pending.truncate(remaining);
            }
            for &i in &pending {
                chosen[i] = true;
            }
            selected.extend(pending);
            threshold /= 2.0;
        }

        selected
    }
}

/// Explained variance ratio of a 3-component PCA, largest first.
///
/// Returns zeros for fewer than three points or a cloud with no spread.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn explained_variance_ratio(points: &[Point3<f64>]) -> Vector3<f64> {
    if points.len() < 3 {
        return Vector3::zeros();
    }

    let count = points.len() as f64;
    let centroid = points.iter().fold(Vector3::zeros(), |acc, p| acc + p.coords) / count;

    let mut covariance = Matrix3::zeros();
    for p in points {
        let centered = p.coords - centroid;
        covariance += centered * centered.transpose();
    }
    covariance /= count;

    let mut eigenvalues: Vec<f64> = SymmetricEigen::new(covariance)
        .eigenvalues
        .iter()
        .map(|v| v.max(0.0))
        .collect();
    eigenvalues.sort_by(|a, b| b.partial_cmp(a).unwrap_or(std::cmp::Ordering::Equal));

    let total: f64 = eigenvalues.iter().sum();
    if total <= f64::EPSILON * count || !total.is_finite() {
        return Vector3::zeros();
    }
    Vector3::from_iterator(eigenvalues.into_iter().map(|v| v / total))
}

fn max_pairwise_distance(features: &[GraspFeature]) -> f64 {
    let mut max_dist = 0.0_f64;
    for (i, a) in features.iter().enumerate() {
        for b in &features[i + 1..] {
            max_dist = max_dist.max((a - b).norm());
        }
    }
    max_dist
}
