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
//! Error types for simulation construction, registration and integration
//!
//! All fallible operations in the crate return [`Result`], whose error type
//! is [`SimulationError`]. Configuration problems are reported at
//! construction or registration time and never deferred to `run`.

use thiserror::Error;

/// Crate-wide result type alias.
pub type Result<T> = std::result::Result<T, SimulationError>;

/// Errors raised by the simulator.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SimulationError {
    /// Time step was zero, negative, NaN or infinite.
    #[error("invalid timestep {0}: must be positive and finite")]
    InvalidTimestep(f64),

    /// Requested duration was negative or not finite.
    #[error("invalid duration {0}: must be non-negative and finite")]
    InvalidDuration(f64),

    /// The requested horizon needs more steps than can be stored.
    #[error("duration {maxtime} with timestep {dt} needs too many steps")]
    StepCountOverflow {
        /// Timestep in simulation time units
        dt: f64,
        /// Requested duration in simulation time units
        maxtime: f64,
    },

    /// Trajectory storage for this many slots could not be reserved.
    #[error("cannot allocate a trajectory of {slots} records")]
    TrajectoryAllocation {
        /// Requested slot count
        slots: usize,
    },

    /// Mass was negative or not finite.
    #[error("invalid mass {value} for body '{body}'")]
    InvalidMass {
        /// Body name
        body: String,
        /// Converted mass value
        value: f64,
    },

    /// Radius was negative or not finite.
    #[error("invalid radius {value} for body '{body}'")]
    InvalidRadius {
        /// Body name
        body: String,
        /// Converted radius value
        value: f64,
    },

    /// Initial position or velocity contained NaN or infinite components.
    #[error("initial state of body '{0}' is not finite")]
    NonFiniteInitialState(String),

    /// Bodies cannot be registered once the simulation has run.
    #[error("body registration is closed after run")]
    RegistrationClosed,

    /// `run` was invoked on a simulation that already ran.
    #[error("simulation has already run")]
    AlreadyRun,

    /// No body with the given name or id exists.
    #[error("unknown body '{0}'")]
    UnknownBody(String),

    /// Trajectory access outside `[0, len)`.
    #[error("index {index} out of range for trajectory of length {len}")]
    IndexOutOfRange {
        /// Requested index
        index: usize,
        /// Trajectory length
        len: usize,
    },

    /// A diagnostic asked for a step the integrator has not written yet.
    #[error("step {step} has not been computed (computed through {computed})")]
    StepNotComputed {
        /// Requested step
        step: usize,
        /// Number of leading slots holding known values
        computed: usize,
    },

    /// Two distinct bodies occupy the same position.
    ///
    /// Only reported under [`SingularityPolicy::Detect`](crate::config::SingularityPolicy::Detect).
    #[error("bodies '{body}' and '{source_body}' coincide at step {step}")]
    SingularSeparation {
        /// Step being computed
        step: usize,
        /// Body whose acceleration was being accumulated
        body: String,
        /// Source body at zero separation
        source_body: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_is_informative() {
        let e = SimulationError::InvalidTimestep(-1.0);
        let msg = e.to_string();
        assert!(msg.contains("invalid timestep"));
        assert!(msg.contains("-1"));

        let e = SimulationError::TrajectoryAllocation { slots: 12 };
        assert_eq!(e.to_string(), "cannot allocate a trajectory of 12 records");
    }

    #[test]
    fn test_singular_separation_names_both_bodies() {
        let e = SimulationError::SingularSeparation {
            step: 3,
            body: "a".to_string(),
            source_body: "b".to_string(),
        };
        let msg = e.to_string();
        assert!(msg.contains("'a'") && msg.contains("'b'") && msg.contains("step 3"));
    }
}
