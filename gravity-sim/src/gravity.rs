// Copyright 2025 John Brosnihan
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//! Newtonian gravity: pairwise acceleration accumulation
//!
//! Every body attracts every other body with an acceleration
//!
//! **a_B = Σ_{S ≠ B} -G * m_S * r / |r|³**, with **r = p_B - p_S**
//!
//! summed over all sources in registration order. The sum is exact O(n²)
//! with no softening: sources are excluded by index, never by distance, so
//! two distinct bodies at the same position produce a singular term.
//! [`SingularityPolicy`] decides whether that term is evaluated (yielding
//! infinities or NaN) or reported.
//!
//! ## Parallel Computation
//!
//! Accelerations for one step only read the previous step's positions, so
//! with the `parallel` feature the per-body sums are spread over rayon's
//! pool. Each body's own sum still runs serially in registration order,
//! which keeps parallel and serial results bit-identical.
//!
//! # References
//!
//! - Newton, I. (1687). "Philosophiæ Naturalis Principia Mathematica"
//! - Aarseth, S. J. (2003). "Gravitational N-Body Simulations"

use crate::components::{Acceleration, Position};
use crate::config::{SingularityPolicy, DEFAULT_PARALLEL_THRESHOLD};
use crate::units::UnitSystem;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// A pair of distinct bodies found at zero separation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SingularPair {
    /// Index of the body being accelerated
    pub body: usize,
    /// Index of the coincident source
    pub source: usize,
}

/// Gravitational force law with a fixed constant
///
/// `G` is expressed in the owning simulation's units and is converted once,
/// in [`Gravity::in_units`].
///
/// # Example
///
/// ```
/// use gravity_sim::components::Position;
/// use gravity_sim::gravity::Gravity;
///
/// let gravity = Gravity::new(1.0);
/// let positions = [Position::new(0.0, 0.0, 0.0), Position::new(2.0, 0.0, 0.0)];
/// let masses = [1.0, 4.0];
///
/// // Body 0 is pulled toward body 1 with G*m/r² = 4/4 = 1
/// let acc = gravity.acceleration_on(0, &positions, &masses).unwrap();
/// assert_eq!(acc.ax(), 1.0);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Gravity {
    g_constant: f64,
    policy: SingularityPolicy,
    parallel_threshold: usize,
}

impl Gravity {
    /// Create a force law with an explicit gravitational constant
    pub fn new(g_constant: f64) -> Self {
        Gravity {
            g_constant,
            policy: SingularityPolicy::default(),
            parallel_threshold: DEFAULT_PARALLEL_THRESHOLD,
        }
    }

    /// Create a force law using CODATA G converted into `units`
    pub fn in_units(units: &UnitSystem) -> Self {
        Self::new(units.gravitational_constant())
    }

    /// Set the zero-separation policy
    pub fn with_policy(mut self, policy: SingularityPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Set the body count at which accelerations are computed in parallel
    pub fn with_parallel_threshold(mut self, threshold: usize) -> Self {
        self.parallel_threshold = threshold;
        self
    }

    /// Gravitational constant in simulation units
    pub fn g_constant(&self) -> f64 {
        self.g_constant
    }

    /// Zero-separation policy in effect
    pub fn policy(&self) -> SingularityPolicy {
        self.policy
    }

    /// Body count at which the force pass fans out
    pub fn parallel_threshold(&self) -> usize {
        self.parallel_threshold
    }

    /// Total acceleration on body `target` from every other body
    ///
    /// `positions` and `masses` are indexed by registration order and must
    /// have the same length. Under [`SingularityPolicy::Detect`] a source at
    /// exactly the same position is reported instead of evaluated.
    pub fn acceleration_on(
        &self,
        target: usize,
        positions: &[Position],
        masses: &[f64],
    ) -> Result<Acceleration, SingularPair> {
        let here = &positions[target];
        let mut total = Acceleration::zero();

        for (source, (there, &mass)) in positions.iter().zip(masses).enumerate() {
            if source == target {
                continue;
            }

            // Coincidence is positional identity; r² alone underflows for tiny gaps
            if self.policy == SingularityPolicy::Detect && here == there {
                return Err(SingularPair { body: target, source });
            }

            let [rx, ry, rz] = here.offset_from(there);
            let r_squared = rx * rx + ry * ry + rz * rz;

            // -G*m / |r|³
            let scale = -self.g_constant * mass / (r_squared * r_squared.sqrt());
            total.accumulate(&Acceleration::new(scale * rx, scale * ry, scale * rz));
        }

        Ok(total)
    }

    /// Compute the acceleration of every body into `out`
    ///
    /// `out` is resized to `positions.len()`. The first singular pair in
    /// registration order is returned under [`SingularityPolicy::Detect`].
    pub fn accelerations(
        &self,
        positions: &[Position],
        masses: &[f64],
        out: &mut Vec<Acceleration>,
    ) -> Result<(), SingularPair> {
        debug_assert_eq!(positions.len(), masses.len());
        out.clear();

        #[cfg(feature = "parallel")]
        {
            if positions.len() >= self.parallel_threshold {
                return self.accelerations_parallel(positions, masses, out);
            }
        }

        self.accelerations_sequential(positions, masses, out)
    }

    fn accelerations_sequential(
        &self,
        positions: &[Position],
        masses: &[f64],
        out: &mut Vec<Acceleration>,
    ) -> Result<(), SingularPair> {
        for target in 0..positions.len() {
            out.push(self.acceleration_on(target, positions, masses)?);
        }
        Ok(())
    }

    #[cfg(feature = "parallel")]
    fn accelerations_parallel(
        &self,
        positions: &[Position],
        masses: &[f64],
        out: &mut Vec<Acceleration>,
    ) -> Result<(), SingularPair> {
        let results: Vec<Result<Acceleration, SingularPair>> = (0..positions.len())
            .into_par_iter()
            .map(|target| self.acceleration_on(target, positions, masses))
            .collect();

        // Scan in order so the reported pair does not depend on scheduling
        for result in results {
            out.push(result?);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::units::GRAVITATIONAL_CONSTANT;

    #[test]
    fn test_gravitational_constant_in_si() {
        let gravity = Gravity::in_units(&UnitSystem::si());
        assert_eq!(gravity.g_constant(), GRAVITATIONAL_CONSTANT);
        assert_eq!(gravity.policy(), SingularityPolicy::Propagate);
        assert_eq!(gravity.parallel_threshold(), DEFAULT_PARALLEL_THRESHOLD);
    }

    #[test]
    fn test_single_body_feels_nothing() {
        let gravity = Gravity::new(GRAVITATIONAL_CONSTANT);
        let acc = gravity.acceleration_on(0, &[Position::new(5.0, 5.0, 5.0)], &[1e30]).unwrap();
        assert_eq!(acc, Acceleration::zero());
    }

    #[test]
    fn test_inverse_square_magnitude() {
        let gravity = Gravity::new(GRAVITATIONAL_CONSTANT);
        let positions = [Position::zero(), Position::new(0.0, 10.0, 0.0)];
        let masses = [1.0, 1e12];

        let acc = gravity.acceleration_on(0, &positions, &masses).unwrap();
        let expected = GRAVITATIONAL_CONSTANT * 1e12 / 100.0;
        assert!((acc.ay() - expected).abs() / expected < 1e-12);
        assert_eq!(acc.ax(), 0.0);
        assert_eq!(acc.az(), 0.0);
    }

    #[test]
    fn test_pairwise_accelerations_are_opposite_for_equal_masses() {
        let gravity = Gravity::new(1.0);
        let positions = [Position::new(-1.0, 0.0, 0.0), Position::new(1.0, 0.0, 0.0)];
        let masses = [3.0, 3.0];

        let mut out = Vec::new();
        gravity.accelerations(&positions, &masses, &mut out).unwrap();
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].ax(), -out[1].ax());
        assert!(out[0].ax() > 0.0);
        // G*m/r² = 3/4
        assert!((out[0].ax() - 0.75).abs() < 1e-15);
    }

    #[test]
    fn test_coincident_bodies_propagate_non_finite() {
        let gravity = Gravity::new(1.0);
        let positions = [Position::zero(), Position::zero()];
        let acc = gravity.acceleration_on(0, &positions, &[1.0, 1.0]).unwrap();
        assert!(!acc.is_valid());
    }

    #[test]
    fn test_coincident_bodies_detected() {
        let gravity = Gravity::new(1.0).with_policy(SingularityPolicy::Detect);
        let positions = [Position::new(1.0, 0.0, 0.0), Position::zero(), Position::zero()];
        let mut out = Vec::new();
        let err = gravity.accelerations(&positions, &[1.0, 1.0, 1.0], &mut out).unwrap_err();
        assert_eq!(err, SingularPair { body: 1, source: 2 });
    }

    #[test]
    fn test_detect_only_flags_identical_positions() {
        let gravity = Gravity::new(1.0).with_policy(SingularityPolicy::Detect);
        // r² underflows to zero here, but the bodies are distinct
        let positions = [Position::zero(), Position::new(1e-170, 0.0, 0.0)];
        let acc = gravity.acceleration_on(0, &positions, &[1.0, 1.0]).unwrap();
        assert!(!acc.is_valid());

        let positions = [Position::new(-0.0, 2.0, 0.0), Position::new(0.0, 2.0, 0.0)];
        assert_eq!(
            gravity.acceleration_on(0, &positions, &[1.0, 1.0]),
            Err(SingularPair { body: 0, source: 1 })
        );
    }

    #[test]
    fn test_massless_source_contributes_nothing() {
        let gravity = Gravity::new(1.0);
        let positions = [Position::zero(), Position::new(1.0, 0.0, 0.0)];
        let acc = gravity.acceleration_on(0, &positions, &[1.0, 0.0]).unwrap();
        assert_eq!(acc.magnitude(), 0.0);
    }

    #[cfg(feature = "parallel")]
    #[test]
    fn test_parallel_matches_sequential_bitwise() {
        let n = 40;
        let positions: Vec<Position> = (0..n)
            .map(|i| {
                let t = i as f64 * 0.37;
                Position::new(t.cos() * (1.0 + i as f64), t.sin() * 2.5, (i % 7) as f64 - 3.0)
            })
            .collect();
        let masses: Vec<f64> = (0..n).map(|i| 1.0 + (i % 5) as f64).collect();

        let mut serial = Vec::new();
        Gravity::new(1.0)
            .with_parallel_threshold(usize::MAX)
            .accelerations(&positions, &masses, &mut serial)
            .unwrap();

        let mut parallel = Vec::new();
        Gravity::new(1.0)
            .with_parallel_threshold(0)
            .accelerations(&positions, &masses, &mut parallel)
            .unwrap();

        assert_eq!(serial, parallel);
    }
}
