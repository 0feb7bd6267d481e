//! Newton-Raphson solution of Kepler's equation `E - e·sin(E) = M`.

use std::f64::consts::TAU;

pub const DEFAULT_TOLERANCE: f64 = 1e-6;
pub const DEFAULT_MAX_ITERATIONS: usize = 100;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KeplerSolver {
    /// Largest absolute update (radians) accepted as converged.
    pub tolerance: f64,
    pub max_iterations: usize,
}

impl Default for KeplerSolver {
    fn default() -> Self {
        Self {
            tolerance: DEFAULT_TOLERANCE,
            max_iterations: DEFAULT_MAX_ITERATIONS,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct KeplerSolution {
    /// Eccentric anomaly in radians, one per input mean anomaly.
    pub eccentric_anomaly: Vec<f64>,
    pub iterations: usize,
    /// False when `max_iterations` ran out first; the values are then the
    /// last Newton estimate.
    pub converged: bool,
}

impl KeplerSolver {
    pub fn new(tolerance: f64, max_iterations: usize) -> Self {
        Self {
            tolerance,
            max_iterations,
        }
    }

    /// Solve for every mean anomaly (radians) of `mean_anomaly`, starting
    /// from `E₀ = M`. `eccentricity` must lie in [0, 1).
    pub fn solve(&self, mean_anomaly: &[f64], eccentricity: f64) -> KeplerSolution {
        self.solve_from(mean_anomaly.to_vec(), mean_anomaly, eccentricity)
    }

    /// Same as [`solve`](Self::solve) with a caller supplied initial guess.
    pub fn solve_from(
        &self,
        initial: Vec<f64>,
        mean_anomaly: &[f64],
        eccentricity: f64,
    ) -> KeplerSolution {
        debug_assert_eq!(initial.len(), mean_anomaly.len());

        let mut ecc_anomaly = initial;
        let mut iterations = 0;
        let mut converged = false;

        while iterations < self.max_iterations {
            iterations += 1;
            let mut max_update = 0.0_f64;

            for (e_anom, &m) in ecc_anomaly.iter_mut().zip(mean_anomaly) {
                let f = *e_anom - eccentricity * e_anom.sin() - m;
                let f_prime = 1.0 - eccentricity * e_anom.cos();
                let update = f / f_prime;
                *e_anom -= update;
                max_update = max_update.max(update.abs());
            }

            if max_update < self.tolerance {
                converged = true;
                break;
            }
        }

        KeplerSolution {
            eccentric_anomaly: ecc_anomaly,
            iterations,
            converged,
        }
    }
}

/// True anomaly in degrees, [0, 360), from the eccentric anomaly in radians.
pub fn true_anomaly_deg(eccentric_anomaly: f64, eccentricity: f64) -> f64 {
    let half = eccentric_anomaly / 2.0;
    let y = (1.0 + eccentricity).sqrt() * half.sin();
    let x = (1.0 - eccentricity).sqrt() * half.cos();
    let nu = 2.0 * y.atan2(x);
    wrap_360(nu.to_degrees())
}

/// Reduce a mean anomaly in radians to [0, 2π).
pub fn reduce_anomaly(mean_anomaly: f64) -> f64 {
    let m = mean_anomaly.rem_euclid(TAU);
    if m >= TAU {
        0.0
    } else {
        m
    }
}

/// Wrap degrees into [0, 360). `rem_euclid` alone can round up to 360.0 for
/// tiny negative inputs.
pub fn wrap_360(deg: f64) -> f64 {
    let wrapped = deg.rem_euclid(360.0);
    if wrapped >= 360.0 {
        0.0
    } else {
        wrapped
    }
}
