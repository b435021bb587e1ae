//! Walker initialization.
//!
//! Chains must start at physically plausible configurations or the burn-in
//! dominates the run. Two seeding strategies: assign electrons to atoms in
//! proportion to nuclear charge, or follow a mean-field population
//! analysis.

use nalgebra::Vector3;
use rand::seq::SliceRandom;
use rand::Rng;
use rand_distr::{Distribution, Normal};

use crate::systems::Geometry;

/// Mean-field reference exposing the population analysis needed to seed
/// walkers. Implemented by whatever SCF layer feeds this crate.
pub trait MeanField {
    fn atom_coords(&self) -> Vec<Vector3<f64>>;
    fn atom_charges(&self) -> Vec<u32>;
    /// Net molecular charge.
    fn net_charge(&self) -> i32;
    /// Per-atom electron populations (e.g., Mulliken).
    fn population(&self) -> Vec<f64>;
}

/// Draw `n` items from `pool` without replacement, reshuffling and
/// restarting whenever a full pass is exhausted, then permute the
/// concatenated draws. Guarantees every pool element appears
/// `floor(n / pool.len())` or `ceil(n / pool.len())` times.
fn take<R: Rng>(pool: &[usize], n: usize, rng: &mut R) -> Vec<usize> {
    assert!(!pool.is_empty(), "cannot sample from an empty pool");
    let mut out = Vec::with_capacity(n);
    let mut remaining = n;
    while remaining > pool.len() {
        let mut pass = pool.to_vec();
        pass.shuffle(rng);
        out.extend(pass);
        remaining -= pool.len();
    }
    let mut pass = pool.to_vec();
    pass.shuffle(rng);
    out.extend_from_slice(&pass[..remaining]);
    out.shuffle(rng);
    out
}

/// Seed `n_walker` independent chains from an atomic geometry.
///
/// Each electron is assigned to an atom with probability proportional to
/// the atom's nuclear charge (the assignment pool repeats each atom index
/// by its charge), then placed at the atom's coordinate plus isotropic
/// Gaussian noise of scale `var`.
pub fn sample_start<R: Rng>(
    geom: &Geometry,
    n_walker: usize,
    n_electrons: usize,
    var: f64,
    rng: &mut R,
) -> Vec<Vec<Vector3<f64>>> {
    let pool: Vec<usize> = geom
        .charges
        .iter()
        .enumerate()
        .flat_map(|(atom, &z)| std::iter::repeat(atom).take(z as usize))
        .collect();
    assert!(!pool.is_empty(), "geometry must carry at least one charge");

    let normal = Normal::new(0.0, var).unwrap();
    (0..n_walker)
        .map(|_| {
            take(&pool, n_electrons, rng)
                .into_iter()
                .map(|atom| {
                    geom.coords[atom]
                        + Vector3::new(
                            normal.sample(rng),
                            normal.sample(rng),
                            normal.sample(rng),
                        )
                })
                .collect()
        })
        .collect()
}

/// Seed a batch of `bs` walkers from a mean-field reference.
///
/// Expected per-atom occupancy is the nuclear charge minus the mean-field
/// population, perturbed per walker by Gaussian noise of scale
/// `charge_std`, then converted to integer electron counts summing to the
/// molecule's electron count by largest-remainder proportional allocation.
/// Electrons sit at their atom's center plus isotropic Gaussian noise of
/// scale `elec_std`.
pub fn rand_from_mf<M: MeanField, R: Rng>(
    mf: &M,
    bs: usize,
    charge_std: f64,
    elec_std: f64,
    rng: &mut R,
) -> Vec<Vec<Vector3<f64>>> {
    let coords = mf.atom_coords();
    let charges = mf.atom_charges();
    let populations = mf.population();
    assert_eq!(coords.len(), charges.len(), "one coordinate per atom");
    assert_eq!(populations.len(), charges.len(), "one population per atom");

    let total_charge: i64 = charges.iter().map(|&z| z as i64).sum();
    let n_electrons = (total_charge - mf.net_charge() as i64) as usize;

    let base: Vec<f64> = charges
        .iter()
        .zip(populations.iter())
        .map(|(&z, &pop)| z as f64 - pop)
        .collect();
    let normal = Normal::new(0.0, 1.0).unwrap();

    (0..bs)
        .map(|_| {
            let weights: Vec<f64> = base
                .iter()
                .map(|&c| (c + charge_std * normal.sample(rng)).max(0.0))
                .collect();
            let occupations = allocate_occupations(&weights, &charges, n_electrons);

            let mut walker = Vec::with_capacity(n_electrons);
            for (atom, &occ) in occupations.iter().enumerate() {
                for _ in 0..occ {
                    walker.push(
                        coords[atom]
                            + Vector3::new(
                                normal.sample(rng),
                                normal.sample(rng),
                                normal.sample(rng),
                            ) * elec_std,
                    );
                }
            }
            walker
        })
        .collect()
}

/// Largest-remainder rounding of proportional quotas to integer
/// occupations summing exactly to `n_electrons`. Falls back to the nuclear
/// charges as weights when the perturbed weights all vanish.
fn allocate_occupations(weights: &[f64], charges: &[u32], n_electrons: usize) -> Vec<usize> {
    let mut weights = weights.to_vec();
    if weights.iter().sum::<f64>() <= 0.0 {
        weights = charges.iter().map(|&z| z as f64).collect();
    }
    let total: f64 = weights.iter().sum();
    assert!(total > 0.0, "occupation weights must not all vanish");

    let quotas: Vec<f64> = weights
        .iter()
        .map(|&w| w / total * n_electrons as f64)
        .collect();
    let mut occupations: Vec<usize> = quotas.iter().map(|&q| q.floor() as usize).collect();
    let assigned: usize = occupations.iter().sum();

    let mut order: Vec<usize> = (0..quotas.len()).collect();
    order.sort_by(|&a, &b| {
        let rem_a = quotas[a] - quotas[a].floor();
        let rem_b = quotas[b] - quotas[b].floor();
        rem_b.partial_cmp(&rem_a).unwrap()
    });
    for k in 0..(n_electrons - assigned) {
        occupations[order[k % order.len()]] += 1;
    }
    occupations
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn water_like() -> Geometry {
        Geometry::new(
            vec![
                Vector3::new(0.0, 0.0, 0.0),
                Vector3::new(0.0, 0.0, 1.8),
                Vector3::new(1.4, 1.1, 0.0),
            ],
            vec![1, 1, 8],
        )
    }

    #[test]
    fn test_sample_start_shape_and_assignment() {
        // Charges [1, 1, 8] repeat to a pool of exactly 10 indices, so 10
        // electrons make one full without-replacement pass: every walker
        // gets exactly charge-many electrons per atom.
        let geom = water_like();
        let mut rng = StdRng::seed_from_u64(41);
        let batch = sample_start(&geom, 4, 10, 0.1, &mut rng);

        assert_eq!(batch.len(), 4);
        for walker in &batch {
            assert_eq!(walker.len(), 10);
            let mut counts = [0usize; 3];
            for r in walker {
                let (atom, _) = geom
                    .coords
                    .iter()
                    .enumerate()
                    .map(|(a, c)| (a, (r - c).norm()))
                    .min_by(|x, y| x.1.partial_cmp(&y.1).unwrap())
                    .unwrap();
                counts[atom] += 1;
            }
            assert_eq!(counts, [1, 1, 8]);
        }
    }

    #[test]
    fn test_take_charge_proportional_over_many_walkers() {
        // With fewer electrons than pool entries, assignments stay
        // charge-proportional on average: the charge-8 atom draws roughly
        // 8 of every 10 assignments.
        let pool: Vec<usize> = vec![0, 1, 2, 2, 2, 2, 2, 2, 2, 2];
        let mut rng = StdRng::seed_from_u64(43);
        let mut heavy = 0usize;
        let n_draws = 4000;
        for _ in 0..n_draws {
            let picked = take(&pool, 1, &mut rng);
            if picked[0] == 2 {
                heavy += 1;
            }
        }
        let fraction = heavy as f64 / n_draws as f64;
        assert!((fraction - 0.8).abs() < 0.03, "fraction = {fraction}");
    }

    #[test]
    fn test_take_spans_repeated_passes() {
        let pool = vec![0, 1, 2];
        let mut rng = StdRng::seed_from_u64(47);
        let picked = take(&pool, 7, &mut rng);
        assert_eq!(picked.len(), 7);
        // Two full passes plus one extra: each element appears 2 or 3 times.
        for element in 0..3 {
            let count = picked.iter().filter(|&&p| p == element).count();
            assert!((2..=3).contains(&count), "element {element}: {count}");
        }
    }

    struct FakeScf;
    impl MeanField for FakeScf {
        fn atom_coords(&self) -> Vec<Vector3<f64>> {
            vec![
                Vector3::new(0.0, 0.0, 0.0),
                Vector3::new(0.0, 0.0, 1.8),
                Vector3::new(1.4, 1.1, 0.0),
            ]
        }
        fn atom_charges(&self) -> Vec<u32> {
            vec![1, 1, 8]
        }
        fn net_charge(&self) -> i32 {
            0
        }
        fn population(&self) -> Vec<f64> {
            vec![0.6, 0.6, 0.8]
        }
    }

    #[test]
    fn test_rand_from_mf_shape() {
        let mut rng = StdRng::seed_from_u64(53);
        let batch = rand_from_mf(&FakeScf, 6, 0.25, 1.0, &mut rng);
        assert_eq!(batch.len(), 6);
        for walker in &batch {
            assert_eq!(walker.len(), 10);
        }
    }

    #[test]
    fn test_allocate_occupations_exact_total() {
        let weights = vec![0.4, 0.4, 7.2];
        let charges = vec![1, 1, 8];
        let occ = allocate_occupations(&weights, &charges, 10);
        assert_eq!(occ.iter().sum::<usize>(), 10);
        assert!(occ[2] >= 8);
    }

    #[test]
    fn test_allocate_occupations_degenerate_weights() {
        let occ = allocate_occupations(&[0.0, 0.0], &[1, 3], 4);
        assert_eq!(occ.iter().sum::<usize>(), 4);
        assert_eq!(occ, vec![1, 3]);
    }
}
