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
//! # Gravity Sim
//!
//! A small gravitational N-body simulator for teaching and demonstration.
//! Bodies interact through exact pairwise Newtonian gravity, are advanced
//! with a fixed-step second-order Taylor scheme, and every step of every
//! body is kept in a preallocated trajectory.
//!
//! ## Features
//!
//! - **Unit-aware boundary**: inputs are dimensioned `uom` quantities, read
//!   out once in the simulation's [`UnitSystem`]
//! - **Fixed clock**: `n_steps = ceil(maxtime / dt) + 1`, horizon snapped to
//!   a multiple of `dt`
//! - **Step barrier**: each step reads only the fully committed previous step
//! - **Reproducible**: registration order fixes summation order
//! - **Parallelization**: optional Rayon fan-out of the per-step force pass
//! - **Diagnostics**: energy, momentum and center of mass per step
//!
//! ## Example
//!
//! ```rust
//! use gravity_sim::units::{Length, Mass, Time};
//! use gravity_sim::{BodySpec, Simulation};
//! use uom::si::length::{kilometer, meter};
//! use uom::si::mass::kilogram;
//! use uom::si::time::{hour, second};
//!
//! let mut sim = Simulation::new(Time::new::<second>(60.0), Time::new::<hour>(1.0)).unwrap();
//! let mass = Mass::new::<kilogram>(1e10);
//! let zero = Length::new::<meter>(0.0);
//! sim.add_body(BodySpec::new("a", mass)).unwrap();
//! sim.add_body(BodySpec::new("b", mass).position(Length::new::<kilometer>(1.0), zero, zero))
//!     .unwrap();
//! sim.run().unwrap();
//!
//! let b = sim.body_by_name("b").unwrap();
//! assert_eq!(b.trajectory().len(), 61);
//! assert!(b.trajectory().last_computed().position.x() < 1000.0);
//! ```

#![warn(missing_docs)]

/// Body registration and storage
pub mod body;

/// Position, velocity and acceleration vectors
pub mod components;

/// Simulation configuration
pub mod config;

/// Energy, momentum and center-of-mass observables
pub mod diagnostics;

/// Error types
pub mod error;

/// Newtonian pairwise force law
pub mod gravity;

/// Step clock and time-stepping schemes
pub mod integration;

/// Simulation driver
pub mod simulation;

/// Per-body trajectory storage
pub mod trajectory;

/// Unit systems over `uom` quantities
pub mod units;

pub use body::{Body, BodyId, BodySpec};
pub use config::{SimulationConfig, SingularityPolicy};
pub use error::{Result, SimulationError};
pub use simulation::Simulation;
pub use trajectory::{StateRecord, Trajectory};
pub use units::UnitSystem;
