use crate::error::{MdError, Result};
use crate::pairs::PairList;
use crate::pbc::minimum_image;
use crate::run_md::ForceProvider;
use nalgebra::Vector2;
use tracing::debug;

/// Lennard-Jones parameters for a single atom type.
///
/// `sigma` is the per-atom value. Pairs interact with `sigma_pair = 2 * sigma`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LjParams {
    pub sigma: f64,
    pub epsilon: f64,
    pub cutoff: f64,
}

/// How the pair interaction is truncated at the cutoff.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Cutoff {
    /// Plain truncation. The energy jumps at `r = cutoff`.
    Hard,
    /// Quintic switch over `[cutoff - window, cutoff]`.
    Switched { window: f64 },
}

impl Cutoff {
    /// Pick the truncation mode from an optional switching window.
    /// A missing or zero window selects the hard cutoff.
    pub fn from_window(window: Option<f64>) -> Self {
        match window {
            Some(w) if w != 0.0 => Cutoff::Switched { window: w },
            _ => Cutoff::Hard,
        }
    }
}

/// LJ energy and `-(dU/dr) / r` for a squared distance.
///
/// Multiplying the second value by the displacement `x_i - x_j` gives the
/// force on atom `i`.
#[inline]
fn lj_pair(r2: f64, sigma_pair2: f64, epsilon: f64) -> (f64, f64) {
    let s2 = sigma_pair2 / r2;
    let s6 = s2 * s2 * s2;
    let s12 = s6 * s6;
    let energy = 4.0 * epsilon * (s12 - s6);
    let f_over_r = 24.0 * epsilon * (2.0 * s12 - s6) / r2;
    (energy, f_over_r)
}

/// Quintic switch `S(x) = 1 - 10x^3 + 15x^4 - 6x^5` with `x = (r - r_on) / window`,
/// returned together with `dS/dr`.
#[inline]
fn switch(r: f64, r_on: f64, window: f64) -> (f64, f64) {
    let x = (r - r_on) / window;
    if x <= 0.0 {
        return (1.0, 0.0);
    }
    if x >= 1.0 {
        return (0.0, 0.0);
    }
    let x2 = x * x;
    let x3 = x2 * x;
    let s = 1.0 - x3 * (10.0 - 15.0 * x + 6.0 * x2);
    let one_minus = 1.0 - x;
    let ds_dr = -30.0 * x2 * one_minus * one_minus / window;
    (s, ds_dr)
}

/// Brute-force Lennard-Jones evaluator for a square periodic box.
#[derive(Debug, Clone)]
pub struct LennardJones {
    pub params: LjParams,
    pub cutoff: Cutoff,
    pub box_length: f64,
    pairs: PairList,
    sigma_pair2: f64,
    r_cut2: f64,
    r_on: f64,
    r_on2: f64,
}

impl LennardJones {
    /// Build an evaluator for `n_atoms` atoms.
    ///
    /// Fails with [`MdError::Config`] if the cutoff is not smaller than half
    /// the box length, or if the switching window is outside `(0, cutoff]`.
    pub fn new(params: LjParams, box_length: f64, n_atoms: usize, cutoff: Cutoff) -> Result<Self> {
        if !(params.sigma > 0.0) {
            return Err(MdError::Config(format!("sigma must be positive, got {}", params.sigma)));
        }
        if !(params.epsilon > 0.0) {
            return Err(MdError::Config(format!("epsilon must be positive, got {}", params.epsilon)));
        }
        if !(box_length > 0.0) {
            return Err(MdError::Config(format!("box length must be positive, got {}", box_length)));
        }
        if !(params.cutoff > 0.0) {
            return Err(MdError::Config(format!("cutoff must be positive, got {}", params.cutoff)));
        }
        if params.cutoff >= 0.5 * box_length {
            return Err(MdError::Config(format!(
                "cutoff ({}) must be smaller than half the box length ({}) for the minimum-image convention",
                params.cutoff,
                0.5 * box_length
            )));
        }

        // zero window is the hard cutoff, not a degenerate switch
        let cutoff = match cutoff {
            Cutoff::Switched { window } if window == 0.0 => Cutoff::Hard,
            other => other,
        };
        let r_on = match cutoff {
            Cutoff::Hard => params.cutoff,
            Cutoff::Switched { window } => {
                if !(window > 0.0 && window <= params.cutoff) {
                    return Err(MdError::Config(format!(
                        "switching window ({}) must satisfy 0 < window <= cutoff ({})",
                        window, params.cutoff
                    )));
                }
                params.cutoff - window
            }
        };

        let pairs = PairList::new(n_atoms)?;
        let sigma_pair = 2.0 * params.sigma;
        debug!(
            "LJ evaluator: {} atoms, {} pairs, cutoff mode {:?}",
            n_atoms,
            pairs.len(),
            cutoff
        );

        Ok(LennardJones {
            params,
            cutoff,
            box_length,
            pairs,
            sigma_pair2: sigma_pair * sigma_pair,
            r_cut2: params.cutoff * params.cutoff,
            r_on,
            r_on2: r_on * r_on,
        })
    }

    pub fn pairs(&self) -> &PairList {
        &self.pairs
    }

    /// Energy and `-(dE/dr) / r` of one pair, or `None` outside the cutoff.
    #[inline]
    fn pair_terms(&self, r2: f64) -> Option<(f64, f64)> {
        match self.cutoff {
            Cutoff::Hard => {
                if r2 > self.r_cut2 {
                    return None;
                }
                Some(lj_pair(r2, self.sigma_pair2, self.params.epsilon))
            }
            Cutoff::Switched { window } => {
                if r2 >= self.r_cut2 {
                    return None;
                }
                let (u, f_over_r) = lj_pair(r2, self.sigma_pair2, self.params.epsilon);
                if r2 <= self.r_on2 {
                    return Some((u, f_over_r));
                }
                let r = r2.sqrt();
                let (s, ds_dr) = switch(r, self.r_on, window);
                // product rule: -(d(S U)/dr) / r = S * (-(dU/dr) / r) - U * S' / r
                Some((s * u, s * f_over_r - u * ds_dr / r))
            }
        }
    }

    /// Pair energy at separation `r`, with the configured truncation.
    pub fn pair_energy(&self, r: f64) -> f64 {
        self.pair_terms(r * r).map_or(0.0, |(e, _)| e)
    }

    /// Radial pair force `-dE/dr` at separation `r` (positive is repulsive).
    pub fn pair_force(&self, r: f64) -> f64 {
        self.pair_terms(r * r).map_or(0.0, |(_, f_over_r)| f_over_r * r)
    }

    /// Total potential energy only.
    pub fn potential_energy(&self, positions: &[Vector2<f64>]) -> Result<f64> {
        self.compute(positions).map(|(energy, _)| energy)
    }
}

impl ForceProvider for LennardJones {
    fn n_atoms(&self) -> usize {
        self.pairs.n_atoms()
    }

    fn compute(&self, positions: &[Vector2<f64>]) -> Result<(f64, Vec<Vector2<f64>>)> {
        let n = self.pairs.n_atoms();
        if positions.len() != n {
            return Err(MdError::SizeMismatch {
                expected: n,
                found: positions.len(),
            });
        }

        let mut energy = 0.0;
        let mut forces = vec![Vector2::zeros(); n];

        for &(i, j) in self.pairs.iter() {
            let rij = minimum_image(positions[i] - positions[j], self.box_length);
            let r2 = rij.norm_squared();
            if let Some((e, f_over_r)) = self.pair_terms(r2) {
                energy += e;
                let fij = rij * f_over_r;
                forces[i] += fij;
                forces[j] -= fij;
            }
        }

        Ok((energy, forces))
    }
}
