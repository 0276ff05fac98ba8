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
//! Simulation configuration
//!
//! Everything that is fixed for the lifetime of a [`Simulation`](crate::Simulation)
//! apart from the clock itself: the unit system, how zero separations are
//! treated, and when the per-step force pass fans out across threads.

use crate::units::UnitSystem;

/// Default body count at which accelerations are computed in parallel
pub const DEFAULT_PARALLEL_THRESHOLD: usize = 64;

/// What to do when two distinct bodies occupy exactly the same position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SingularityPolicy {
    /// Evaluate the force law anyway and let infinities and NaN flow into
    /// the trajectory
    #[default]
    Propagate,
    /// Stop the run with
    /// [`SimulationError::SingularSeparation`](crate::SimulationError::SingularSeparation)
    Detect,
}

/// Configuration for a simulation run
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationConfig {
    /// Units all stored values are expressed in
    pub units: UnitSystem,
    /// Handling of zero separation between distinct bodies
    pub singularity: SingularityPolicy,
    /// Minimum body count for the rayon force pass (ignored without the
    /// `parallel` feature)
    pub parallel_threshold: usize,
    /// Whether to log timestep notes at construction
    pub validate_timestep: bool,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        SimulationConfig {
            units: UnitSystem::si(),
            singularity: SingularityPolicy::Propagate,
            parallel_threshold: DEFAULT_PARALLEL_THRESHOLD,
            validate_timestep: true,
        }
    }
}

impl SimulationConfig {
    /// Default configuration: SI units, propagate singularities
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a different unit system
    pub fn with_units(mut self, units: UnitSystem) -> Self {
        self.units = units;
        self
    }

    /// Set the zero-separation policy
    pub fn with_singularity_policy(mut self, policy: SingularityPolicy) -> Self {
        self.singularity = policy;
        self
    }

    /// Set the body count at which the force pass runs in parallel
    ///
    /// `usize::MAX` keeps every run serial; `0` always fans out.
    pub fn with_parallel_threshold(mut self, threshold: usize) -> Self {
        self.parallel_threshold = threshold;
        self
    }

    /// Skip timestep notes at construction
    pub fn without_timestep_validation(mut self) -> Self {
        self.validate_timestep = false;
        self
    }
}
