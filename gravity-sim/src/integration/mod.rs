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
//! Simulation clock and time-stepping schemes
//!
//! The [`StepClock`] turns a timestep and a requested horizon into a fixed
//! number of trajectory slots. An [`Integrator`] advances one body's state
//! by one slot given the acceleration computed from the previous slot.
//!
//! # Step Count
//!
//! ```text
//! n_steps        = ceil(maxtime / dt) + 1
//! actual_maxtime = dt * (n_steps - 1)
//! ```
//!
//! The extra slot holds the initial condition. Rounding up means the
//! realized horizon is never shorter than requested and is always an exact
//! multiple of `dt`.
//!
//! # Timestep Guidelines
//!
//! - Too small: millions of slots per body and wasted memory
//! - Too large: the whole horizon fits in one or two steps and orbits
//!   are not resolved
//! - For a closed orbit, aim for at least a few hundred steps per period

use crate::components::Acceleration;
use crate::error::{Result, SimulationError};
use crate::trajectory::StateRecord;
use std::ops::Range;

mod taylor;

pub use taylor::TaylorIntegrator;

/// Upper bound on slots per trajectory
pub const MAX_STEPS: usize = u32::MAX as usize;

/// Horizon below which a run is flagged as under-resolved
const MIN_RESOLVED_STEPS: usize = 10;

/// Step size, step count and realized horizon of a run
///
/// All values are in the simulation's time unit.
///
/// # Example
///
/// ```
/// use gravity_sim::integration::StepClock;
///
/// let clock = StepClock::new(3.0, 10.0).unwrap();
/// assert_eq!(clock.n_steps(), 5);
/// assert_eq!(clock.maxtime(), 12.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepClock {
    dt: f64,
    n_steps: usize,
    maxtime: f64,
}

impl StepClock {
    /// Derive the clock from a timestep and a requested horizon
    ///
    /// A zero horizon still yields one step after the initial condition.
    pub fn new(dt: f64, maxtime: f64) -> Result<Self> {
        if !(dt > 0.0 && dt.is_finite()) {
            return Err(SimulationError::InvalidTimestep(dt));
        }
        if !(maxtime >= 0.0 && maxtime.is_finite()) {
            return Err(SimulationError::InvalidDuration(maxtime));
        }

        let steps = (maxtime / dt).ceil().max(1.0);
        if !steps.is_finite() || steps >= MAX_STEPS as f64 {
            return Err(SimulationError::StepCountOverflow { dt, maxtime });
        }

        let n_steps = steps as usize + 1;
        Ok(StepClock {
            dt,
            n_steps,
            maxtime: dt * (n_steps - 1) as f64,
        })
    }

    /// Timestep
    pub fn dt(&self) -> f64 {
        self.dt
    }

    /// Number of trajectory slots, including the initial condition
    pub fn n_steps(&self) -> usize {
        self.n_steps
    }

    /// Realized horizon, `dt * (n_steps - 1)`
    pub fn maxtime(&self) -> f64 {
        self.maxtime
    }

    /// Index of the last slot
    pub fn final_index(&self) -> usize {
        self.n_steps - 1
    }

    /// Timestamp of slot `index`, computed as a product to avoid drift
    pub fn time_at(&self, index: usize) -> f64 {
        self.dt * index as f64
    }

    /// Indices the integrator computes: `1..n_steps`
    pub fn steps(&self) -> Range<usize> {
        1..self.n_steps
    }
}

/// Trait for time-stepping schemes
///
/// An integrator maps the state of one body at slot `i - 1` and the
/// acceleration evaluated there to the state at slot `i`.
pub trait Integrator: Send + Sync {
    /// Get the name of this integrator
    fn name(&self) -> &str;

    /// Get the timestep used by this integrator
    fn timestep(&self) -> f64;

    /// Check the timestep against the simulated horizon
    ///
    /// Returns a note when the run looks under-resolved or needlessly large.
    /// The note is advisory; callers log it rather than fail.
    fn validate_timestep(&self, horizon: f64) -> std::result::Result<(), String> {
        let dt = self.timestep();

        if dt <= 0.0 || !dt.is_finite() {
            return Err(format!("Invalid timestep: {}. Must be positive and finite.", dt));
        }

        if horizon > 0.0 && horizon / dt < MIN_RESOLVED_STEPS as f64 {
            return Err(format!(
                "Timestep {} covers the horizon {} in fewer than {} steps; \
                motion will be poorly resolved.",
                dt, horizon, MIN_RESOLVED_STEPS
            ));
        }

        if horizon / dt > 1e7 {
            return Err(format!(
                "Timestep {} needs {:.0} steps to cover the horizon {}; \
                every body will store that many records.",
                dt,
                (horizon / dt).ceil(),
                horizon
            ));
        }

        Ok(())
    }

    /// Produce the record for slot `step` from the record at `step - 1`
    fn advance(
        &self,
        previous: &StateRecord,
        acceleration: &Acceleration,
        step: usize,
    ) -> StateRecord;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_division() {
        let clock = StepClock::new(1.0, 10.0).unwrap();
        assert_eq!(clock.n_steps(), 11);
        assert_eq!(clock.maxtime(), 10.0);
        assert_eq!(clock.final_index(), 10);
        assert_eq!(clock.steps(), 1..11);
    }

    #[test]
    fn test_uneven_division_rounds_up() {
        let clock = StepClock::new(0.3, 1.0).unwrap();
        assert_eq!(clock.n_steps(), 5);
        assert!(clock.maxtime() >= 1.0);
        assert!((clock.maxtime() - 1.2).abs() < 1e-12);
    }

    #[test]
    fn test_zero_horizon_keeps_one_step() {
        let clock = StepClock::new(0.5, 0.0).unwrap();
        assert_eq!(clock.n_steps(), 2);
        assert_eq!(clock.maxtime(), 0.5);
    }

    #[test]
    fn test_step_count_properties() {
        let cases = [(0.1, 1.0), (0.7, 5.0), (2.0, 3.0), (0.125, 0.3), (5.0, 5.0), (3.0, 0.1)];
        for &(dt, maxtime) in &cases {
            let clock = StepClock::new(dt, maxtime).unwrap();
            assert!(clock.n_steps() >= 2);
            assert_eq!(clock.n_steps() - 1, ((maxtime / dt).ceil() as usize).max(1));
            assert_eq!(clock.maxtime(), dt * (clock.n_steps() - 1) as f64);
            assert!(clock.maxtime() >= maxtime);
        }
    }

    #[test]
    fn test_time_at_is_a_product() {
        let clock = StepClock::new(0.1, 1.0).unwrap();
        assert_eq!(clock.time_at(0), 0.0);
        assert_eq!(clock.time_at(7), 0.1 * 7.0);
    }

    #[test]
    fn test_invalid_inputs() {
        assert_eq!(StepClock::new(0.0, 1.0).unwrap_err(), SimulationError::InvalidTimestep(0.0));
        assert_eq!(
            StepClock::new(-1.0, 1.0).unwrap_err(),
            SimulationError::InvalidTimestep(-1.0)
        );
        assert!(matches!(
            StepClock::new(f64::NAN, 1.0),
            Err(SimulationError::InvalidTimestep(_))
        ));
        assert!(matches!(
            StepClock::new(f64::INFINITY, 1.0),
            Err(SimulationError::InvalidTimestep(_))
        ));
        assert_eq!(
            StepClock::new(1.0, -1.0).unwrap_err(),
            SimulationError::InvalidDuration(-1.0)
        );
        assert!(matches!(StepClock::new(1.0, f64::NAN), Err(SimulationError::InvalidDuration(_))));
    }

    #[test]
    fn test_overflowing_step_count() {
        assert!(matches!(
            StepClock::new(1e-300, 1e300),
            Err(SimulationError::StepCountOverflow { .. })
        ));
    }
}
