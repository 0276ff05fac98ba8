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
//! Bodies and their registration input

use crate::components::{Position, Velocity as Velocity3};
use crate::error::{Result, SimulationError};
use crate::trajectory::Trajectory;
use crate::units::{Length, Mass, UnitSystem, Velocity};
use std::fmt;
use uom::si::length::meter;
use uom::si::velocity::meter_per_second;

/// Stable handle for a registered body: its registration index
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BodyId(usize);

impl BodyId {
    pub(crate) fn new(index: usize) -> Self {
        BodyId(index)
    }

    /// Registration index
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for BodyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A point mass and its recorded trajectory
///
/// Mass and radius are fixed at registration. The radius is carried for
/// callers (plotting, future collision handling) and does not enter the
/// force law.
#[derive(Debug, Clone)]
pub struct Body {
    name: String,
    mass: f64,
    radius: f64,
    trajectory: Trajectory,
}

impl Body {
    /// Name given at registration
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Mass in simulation mass units
    pub fn mass(&self) -> f64 {
        self.mass
    }

    /// Radius in simulation length units
    pub fn radius(&self) -> f64 {
        self.radius
    }

    /// Recorded trajectory
    pub fn trajectory(&self) -> &Trajectory {
        &self.trajectory
    }

    pub(crate) fn trajectory_mut(&mut self) -> &mut Trajectory {
        &mut self.trajectory
    }
}

/// Registration input for one body
///
/// Every value is a dimensioned `uom` quantity; reading it out in the
/// simulation's unit system happens in [`BodySpec::build`]. Position and
/// velocity default to zero and radius to zero meters.
///
/// # Example
///
/// ```
/// use gravity_sim::body::BodySpec;
/// use gravity_sim::units::{earth_masses, Length, Velocity};
/// use uom::si::length::{astronomical_unit, kilometer, meter};
/// use uom::si::velocity::{kilometer_per_second, meter_per_second};
///
/// let zero = Length::new::<meter>(0.0);
/// let earth = BodySpec::new("Earth", earth_masses(1.0))
///     .position(Length::new::<astronomical_unit>(1.0), zero, zero)
///     .velocity(
///         Velocity::new::<meter_per_second>(0.0),
///         Velocity::new::<kilometer_per_second>(29.78),
///         Velocity::new::<meter_per_second>(0.0),
///     )
///     .radius(Length::new::<kilometer>(6371.0));
/// assert_eq!(earth.name(), "Earth");
/// ```
///
/// A quantity of the wrong dimension is rejected by the compiler:
///
/// ```compile_fail
/// use gravity_sim::body::BodySpec;
/// use gravity_sim::units::Length;
/// use uom::si::length::meter;
///
/// let spec = BodySpec::new("rock", Length::new::<meter>(1.0));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct BodySpec {
    name: String,
    position: [Length; 3],
    velocity: [Velocity; 3],
    mass: Mass,
    radius: Length,
}

impl BodySpec {
    /// Describe a body by name and mass, at rest at the origin
    pub fn new(name: impl Into<String>, mass: Mass) -> Self {
        BodySpec {
            name: name.into(),
            position: [Length::new::<meter>(0.0); 3],
            velocity: [Velocity::new::<meter_per_second>(0.0); 3],
            mass,
            radius: Length::new::<meter>(0.0),
        }
    }

    /// Set the initial position
    pub fn position(mut self, x: Length, y: Length, z: Length) -> Self {
        self.position = [x, y, z];
        self
    }

    /// Set the initial velocity
    pub fn velocity(mut self, vx: Velocity, vy: Velocity, vz: Velocity) -> Self {
        self.velocity = [vx, vy, vz];
        self
    }

    /// Set the radius
    pub fn radius(mut self, radius: Length) -> Self {
        self.radius = radius;
        self
    }

    /// Body name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Read out in `units` and allocate an `n_steps` trajectory
    pub(crate) fn build(self, units: &UnitSystem, n_steps: usize) -> Result<Body> {
        let [x, y, z] = self.position.map(|q| units.length(q));
        let position = Position::new(x, y, z);
        let [vx, vy, vz] = self.velocity.map(|q| units.velocity(q));
        let velocity = Velocity3::new(vx, vy, vz);
        let mass = units.mass(self.mass);
        let radius = units.length(self.radius);

        if !(mass >= 0.0 && mass.is_finite()) {
            return Err(SimulationError::InvalidMass { body: self.name, value: mass });
        }
        if !(radius >= 0.0 && radius.is_finite()) {
            return Err(SimulationError::InvalidRadius { body: self.name, value: radius });
        }
        if !position.is_valid() || !velocity.is_valid() {
            return Err(SimulationError::NonFiniteInitialState(self.name));
        }

        let trajectory = Trajectory::initialize(n_steps, position, velocity)?;
        Ok(Body { name: self.name, mass, radius, trajectory })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uom::si::length::kilometer;
    use uom::si::mass::{gram, kilogram};
    use uom::si::velocity::kilometer_per_second;

    fn kg(value: f64) -> Mass {
        Mass::new::<kilogram>(value)
    }

    fn m(value: f64) -> Length {
        Length::new::<meter>(value)
    }

    #[test]
    fn test_build_reads_out_units() {
        let body = BodySpec::new("probe", Mass::new::<gram>(500.0))
            .position(Length::new::<kilometer>(1.0), m(2.0), m(3.0))
            .velocity(
                Velocity::new::<kilometer_per_second>(1.0),
                Velocity::new::<meter_per_second>(0.0),
                Velocity::new::<meter_per_second>(0.0),
            )
            .radius(Length::new::<kilometer>(0.5))
            .build(&UnitSystem::si(), 5)
            .unwrap();

        assert_eq!(body.name(), "probe");
        assert!((body.mass() - 0.5).abs() < 1e-12);
        assert_eq!(body.radius(), 500.0);
        let first = body.trajectory().initial();
        assert_eq!(first.position, Position::new(1000.0, 2.0, 3.0));
        assert_eq!(first.velocity, Velocity3::new(1000.0, 0.0, 0.0));
        assert_eq!(body.trajectory().len(), 5);
    }

    #[test]
    fn test_build_rejects_negative_mass_and_radius() {
        let err = BodySpec::new("neg", kg(-1.0)).build(&UnitSystem::si(), 2).unwrap_err();
        assert!(matches!(err, SimulationError::InvalidMass { .. }));

        let err = BodySpec::new("neg", kg(1.0))
            .radius(m(-3.0))
            .build(&UnitSystem::si(), 2)
            .unwrap_err();
        assert!(matches!(err, SimulationError::InvalidRadius { .. }));
    }

    #[test]
    fn test_build_rejects_non_finite_state() {
        let err = BodySpec::new("nan", kg(1.0))
            .position(m(f64::NAN), m(0.0), m(0.0))
            .build(&UnitSystem::si(), 2)
            .unwrap_err();
        assert_eq!(err, SimulationError::NonFiniteInitialState("nan".to_string()));
    }

    #[test]
    fn test_build_reports_unreservable_trajectory() {
        let err = BodySpec::new("huge", kg(1.0)).build(&UnitSystem::si(), usize::MAX).unwrap_err();
        assert_eq!(err, SimulationError::TrajectoryAllocation { slots: usize::MAX });
    }

    #[test]
    fn test_massless_body_is_allowed() {
        let body = BodySpec::new("tracer", kg(0.0)).build(&UnitSystem::si(), 2).unwrap();
        assert_eq!(body.mass(), 0.0);
    }
}
