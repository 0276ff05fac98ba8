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
//! Second-order Taylor (kick-drift) integrator
//!
//! Advances a body by one step using only the state and acceleration at
//! the previous step:
//!
//! ```text
//! x(t + dt) = x(t) + v(t)*dt + 0.5*a(t)*dt²
//! v(t + dt) = v(t) + a(t)*dt
//! t_i       = i * dt
//! ```
//!
//! # Properties
//!
//! - **Explicit**: one force evaluation per step
//! - **Not symplectic**: orbital energy drifts; the drift shrinks with `dt`
//! - **Global error**: first order in `dt` for velocity
//!
//! The position update matches the drift half of velocity Verlet; the
//! velocity update is a plain Euler kick with the old acceleration.

use super::Integrator;
use crate::components::Acceleration;
use crate::error::{Result, SimulationError};
use crate::trajectory::StateRecord;

/// Taylor-series integrator with a fixed timestep
///
/// # Example
///
/// ```
/// use gravity_sim::components::{Acceleration, Position, Velocity};
/// use gravity_sim::integration::{Integrator, TaylorIntegrator};
/// use gravity_sim::trajectory::StateRecord;
///
/// let integrator = TaylorIntegrator::new(0.5).unwrap();
/// let start = StateRecord::new(Position::zero(), Velocity::new(2.0, 0.0, 0.0), 0.0);
/// let next = integrator.advance(&start, &Acceleration::zero(), 1);
/// assert_eq!(next.position.x(), 1.0);
/// assert_eq!(next.time, 0.5);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TaylorIntegrator {
    timestep: f64,
}

impl TaylorIntegrator {
    /// Create an integrator with the given timestep
    ///
    /// Fails if the timestep is non-positive, NaN or infinite.
    pub fn new(timestep: f64) -> Result<Self> {
        if !(timestep > 0.0 && timestep.is_finite()) {
            return Err(SimulationError::InvalidTimestep(timestep));
        }
        Ok(TaylorIntegrator { timestep })
    }
}

impl Integrator for TaylorIntegrator {
    fn name(&self) -> &str {
        "Taylor (kick-drift)"
    }

    fn timestep(&self) -> f64 {
        self.timestep
    }

    fn advance(
        &self,
        previous: &StateRecord,
        acceleration: &Acceleration,
        step: usize,
    ) -> StateRecord {
        let dt = self.timestep;
        StateRecord::new(
            previous.position.advance(&previous.velocity, acceleration, dt),
            previous.velocity.advance(acceleration, dt),
            dt * step as f64,
        )
    }
}
