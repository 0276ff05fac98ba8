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
//! The simulation driver
//!
//! A [`Simulation`] is built once from a timestep and a requested horizon,
//! receives its bodies through [`Simulation::add_body`], and is then
//! advanced to the end of its horizon by a single call to
//! [`Simulation::run`].
//!
//! # Step Barrier
//!
//! For each step `i` the driver snapshots every body's position at `i - 1`,
//! computes all accelerations from that snapshot, and only then commits the
//! step-`i` records. No body ever sees another body's step-`i` state while
//! step `i` is being computed.
//!
//! # Iteration Order
//!
//! Bodies are visited, and sources summed, in registration order. Given the
//! same registrations in the same order, two runs produce bit-identical
//! trajectories whether or not the force pass runs in parallel.

use crate::body::{Body, BodyId, BodySpec};
use crate::components::{Acceleration, Position};
use crate::config::SimulationConfig;
use crate::error::{Result, SimulationError};
use crate::gravity::Gravity;
use crate::integration::{Integrator, StepClock, TaylorIntegrator};
use crate::trajectory::Trajectory;
use crate::units::{Time, UnitSystem};
use log::{debug, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Registering,
    Finished,
}

/// A fixed-horizon gravitational simulation
///
/// # Example
///
/// ```
/// use gravity_sim::units::{Mass, Time, Velocity};
/// use gravity_sim::{BodySpec, Simulation};
/// use uom::si::mass::kilogram;
/// use uom::si::time::second;
/// use uom::si::velocity::meter_per_second;
///
/// let mut sim = Simulation::new(Time::new::<second>(1.0), Time::new::<second>(10.0)).unwrap();
/// assert_eq!(sim.n_steps(), 11);
///
/// let still = Velocity::new::<meter_per_second>(0.0);
/// let probe = BodySpec::new("probe", Mass::new::<kilogram>(1.0))
///     .velocity(Velocity::new::<meter_per_second>(1.0), still, still);
/// let id = sim.add_body(probe).unwrap();
/// sim.run().unwrap();
///
/// let last = sim.trajectory(id).unwrap().read(10).unwrap();
/// assert_eq!(last.position.x(), 10.0);
/// assert_eq!(last.time, 10.0);
/// ```
#[derive(Debug, Clone)]
pub struct Simulation {
    clock: StepClock,
    config: SimulationConfig,
    gravity: Gravity,
    integrator: TaylorIntegrator,
    bodies: Vec<Body>,
    phase: Phase,
}

impl Simulation {
    /// Create a simulation in SI units
    ///
    /// The realized horizon is `maxtime` rounded up to a whole number of
    /// steps; see [`Simulation::maxtime`].
    pub fn new(dt: Time, maxtime: Time) -> Result<Self> {
        Self::with_config(dt, maxtime, SimulationConfig::default())
    }

    /// Create a simulation with an explicit configuration
    pub fn with_config(dt: Time, maxtime: Time, config: SimulationConfig) -> Result<Self> {
        let units = config.units;
        let dt = units.time(dt);
        let maxtime = units.time(maxtime);

        let clock = StepClock::new(dt, maxtime)?;
        let integrator = TaylorIntegrator::new(clock.dt())?;
        let gravity = Gravity::in_units(&units)
            .with_policy(config.singularity)
            .with_parallel_threshold(config.parallel_threshold);

        if config.validate_timestep {
            if let Err(note) = integrator.validate_timestep(maxtime) {
                warn!("{}", note);
            }
        }

        debug!(
            "Simulation in {} units: dt = {}, {} steps, horizon {} (requested {})",
            units,
            clock.dt(),
            clock.n_steps(),
            clock.maxtime(),
            maxtime
        );

        Ok(Simulation {
            clock,
            config,
            gravity,
            integrator,
            bodies: Vec::new(),
            phase: Phase::Registering,
        })
    }

    /// Timestep in simulation time units
    pub fn dt(&self) -> f64 {
        self.clock.dt()
    }

    /// Number of trajectory slots per body, including the initial condition
    pub fn n_steps(&self) -> usize {
        self.clock.n_steps()
    }

    /// Realized horizon in simulation time units
    pub fn maxtime(&self) -> f64 {
        self.clock.maxtime()
    }

    /// Realized horizon tagged with the simulation's time unit
    pub fn maxtime_quantity(&self) -> Time {
        self.config.units.time_quantity(self.clock.maxtime())
    }

    /// The step clock
    pub fn clock(&self) -> &StepClock {
        &self.clock
    }

    /// Unit system all stored values use
    pub fn units(&self) -> &UnitSystem {
        &self.config.units
    }

    /// Configuration
    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Gravitational constant in simulation units
    pub fn gravitational_constant(&self) -> f64 {
        self.gravity.g_constant()
    }

    /// Name of the time-stepping scheme
    pub fn integrator_name(&self) -> &str {
        self.integrator.name()
    }

    /// Register a body
    ///
    /// Reads every quantity out in the simulation's units and writes
    /// trajectory slot 0. Fails on invalid mass, radius or initial state,
    /// when the trajectory cannot be allocated, and once
    /// [`Simulation::run`] has been called.
    pub fn add_body(&mut self, spec: BodySpec) -> Result<BodyId> {
        if self.phase != Phase::Registering {
            return Err(SimulationError::RegistrationClosed);
        }

        let body = spec.build(&self.config.units, self.clock.n_steps())?;
        let id = BodyId::new(self.bodies.len());
        debug!(
            "Registered body {} '{}' (mass {}, radius {}) at {:?}",
            id,
            body.name(),
            body.mass(),
            body.radius(),
            body.trajectory().initial().position.as_array()
        );
        self.bodies.push(body);
        Ok(id)
    }

    /// All bodies in registration order
    pub fn bodies(&self) -> &[Body] {
        &self.bodies
    }

    /// Number of registered bodies
    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }

    /// Look up a body by id
    pub fn body(&self, id: BodyId) -> Option<&Body> {
        self.bodies.get(id.index())
    }

    /// Id of the first body registered under `name`
    pub fn find(&self, name: &str) -> Option<BodyId> {
        self.bodies.iter().position(|b| b.name() == name).map(BodyId::new)
    }

    /// First body registered under `name`
    pub fn body_by_name(&self, name: &str) -> Result<&Body> {
        self.bodies
            .iter()
            .find(|b| b.name() == name)
            .ok_or_else(|| SimulationError::UnknownBody(name.to_string()))
    }

    /// Trajectory of a body
    pub fn trajectory(&self, id: BodyId) -> Result<&Trajectory> {
        self.body(id)
            .map(Body::trajectory)
            .ok_or_else(|| SimulationError::UnknownBody(id.to_string()))
    }

    /// Whether [`Simulation::run`] has been called
    pub fn has_run(&self) -> bool {
        self.phase == Phase::Finished
    }

    /// Integrate every body through every step
    ///
    /// Closes registration. May be called once; a second call fails with
    /// [`SimulationError::AlreadyRun`]. Under
    /// [`SingularityPolicy::Detect`](crate::config::SingularityPolicy::Detect)
    /// the run stops at the first coincident pair and the trajectories keep
    /// every step completed before it.
    pub fn run(&mut self) -> Result<()> {
        if self.phase == Phase::Finished {
            return Err(SimulationError::AlreadyRun);
        }
        self.phase = Phase::Finished;

        info!(
            "Running {} bodies for {} steps (dt = {}, {})",
            self.bodies.len(),
            self.clock.final_index(),
            self.clock.dt(),
            self.integrator.name()
        );

        let masses: Vec<f64> = self.bodies.iter().map(Body::mass).collect();
        let mut positions: Vec<Position> = Vec::with_capacity(self.bodies.len());
        let mut accelerations: Vec<Acceleration> = Vec::with_capacity(self.bodies.len());

        for step in self.clock.steps() {
            positions.clear();
            positions.extend(self.bodies.iter().map(|b| b.trajectory()[step - 1].position));

            let pass = self.gravity.accelerations(&positions, &masses, &mut accelerations);
            if let Err(pair) = pass {
                return Err(SimulationError::SingularSeparation {
                    step,
                    body: self.bodies[pair.body].name().to_string(),
                    source_body: self.bodies[pair.source].name().to_string(),
                });
            }

            for (body, acceleration) in self.bodies.iter_mut().zip(&accelerations) {
                let previous = body.trajectory()[step - 1];
                let next = self.integrator.advance(&previous, acceleration, step);
                body.trajectory_mut()
                    .write(step, next.position, next.velocity, next.time)?;
            }
        }

        let invalid: Vec<&str> = self
            .bodies
            .iter()
            .filter(|b| !b.trajectory().last_computed().is_valid())
            .map(Body::name)
            .collect();
        if !invalid.is_empty() {
            warn!("Non-finite state at end of run for {:?}", invalid);
        }

        info!("Run complete: t = {}", self.clock.maxtime());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SingularityPolicy;
    use crate::units::{Length, LengthUnit, Mass, MassUnit, TimeUnit};
    use uom::si::length::meter;
    use uom::si::mass::kilogram;
    use uom::si::time::{day, hour, second};

    fn secs(value: f64) -> Time {
        Time::new::<second>(value)
    }

    fn at_rest(name: &str, x: f64) -> BodySpec {
        let zero = Length::new::<meter>(0.0);
        BodySpec::new(name, Mass::new::<kilogram>(1e10))
            .position(Length::new::<meter>(x), zero, zero)
    }

    #[test]
    fn test_construction_derives_clock() {
        let sim = Simulation::new(secs(1.0), secs(10.0)).unwrap();
        assert_eq!(sim.n_steps(), 11);
        assert_eq!(sim.maxtime(), 10.0);
        assert_eq!(sim.maxtime_quantity(), secs(10.0));
        assert_eq!(sim.dt(), 1.0);
        assert_eq!(sim.clock().final_index(), 10);
        assert_eq!(sim.clock().time_at(4), 4.0);
        assert!(!sim.has_run());
    }

    #[test]
    fn test_construction_reads_out_time_units() {
        let sim = Simulation::new(Time::new::<hour>(1.0), Time::new::<day>(1.0)).unwrap();
        assert_eq!(sim.dt(), 3600.0);
        assert_eq!(sim.n_steps(), 25);
    }

    #[test]
    fn test_construction_rejects_bad_input() {
        assert_eq!(
            Simulation::new(secs(0.0), secs(1.0)).unwrap_err(),
            SimulationError::InvalidTimestep(0.0)
        );
        assert_eq!(
            Simulation::new(secs(f64::NAN), secs(1.0)).unwrap_err().to_string(),
            "invalid timestep NaN: must be positive and finite"
        );
    }

    #[test]
    fn test_custom_unit_system() {
        let units = UnitSystem::new(LengthUnit::Kilometer, TimeUnit::Hour, MassUnit::Kilogram);
        let config = SimulationConfig::new().with_units(units);
        let mut sim =
            Simulation::with_config(secs(1800.0), Time::new::<hour>(2.0), config).unwrap();
        assert_eq!(sim.dt(), 0.5);
        assert_eq!(sim.n_steps(), 5);
        assert_eq!(sim.units(), &units);
        assert_eq!(sim.config().units, units);
        assert_eq!(sim.config().singularity, SingularityPolicy::Propagate);

        let id = sim.add_body(at_rest("a", 2000.0)).unwrap();
        assert_eq!(sim.trajectory(id).unwrap().initial().position.x(), 2.0);
    }

    #[test]
    fn test_lookup_by_name_and_id() {
        let mut sim = Simulation::new(secs(1.0), secs(2.0)).unwrap();
        let a = sim.add_body(at_rest("a", 0.0)).unwrap();
        let b = sim.add_body(at_rest("b", 10.0)).unwrap();

        assert_eq!(a.index(), 0);
        assert_eq!(b.index(), 1);
        assert_eq!(sim.find("b"), Some(b));
        assert_eq!(sim.find("c"), None);
        assert_eq!(sim.body_by_name("a").unwrap().name(), "a");
        assert_eq!(
            sim.body_by_name("c").unwrap_err(),
            SimulationError::UnknownBody("c".to_string())
        );
        assert_eq!(sim.body_count(), 2);
    }

    #[test]
    fn test_run_fills_every_slot() {
        let mut sim = Simulation::new(secs(1.0), secs(5.0)).unwrap();
        let a = sim.add_body(at_rest("a", -50.0)).unwrap();
        sim.add_body(at_rest("b", 50.0)).unwrap();
        assert_eq!(sim.trajectory(a).unwrap().computed_len(), 1);

        sim.run().unwrap();
        for body in sim.bodies() {
            let traj = body.trajectory();
            assert!(traj.is_complete());
            for (i, record) in traj.iter().enumerate() {
                assert_eq!(record.time, i as f64);
            }
        }
    }

    #[test]
    fn test_run_seals_registration() {
        let mut sim = Simulation::new(secs(1.0), secs(2.0)).unwrap();
        sim.add_body(at_rest("a", 0.0)).unwrap();
        sim.run().unwrap();

        assert!(sim.has_run());
        assert_eq!(
            sim.add_body(at_rest("late", 1.0)).unwrap_err(),
            SimulationError::RegistrationClosed
        );
        assert_eq!(sim.run().unwrap_err(), SimulationError::AlreadyRun);
    }

    #[test]
    fn test_run_with_no_bodies() {
        let mut sim = Simulation::new(secs(1.0), secs(3.0)).unwrap();
        sim.run().unwrap();
        assert!(sim.bodies().is_empty());
    }

    #[test]
    fn test_detected_singularity_stops_run() {
        let config = SimulationConfig::new().with_singularity_policy(SingularityPolicy::Detect);
        let mut sim = Simulation::with_config(secs(1.0), secs(3.0), config).unwrap();
        sim.add_body(at_rest("a", 0.0)).unwrap();
        sim.add_body(at_rest("b", 0.0)).unwrap();

        let err = sim.run().unwrap_err();
        assert_eq!(
            err,
            SimulationError::SingularSeparation {
                step: 1,
                body: "a".to_string(),
                source_body: "b".to_string(),
            }
        );
        assert_eq!(sim.bodies()[0].trajectory().computed_len(), 1);
    }

    #[test]
    fn test_propagated_singularity_poisons_state() {
        let mut sim = Simulation::new(secs(1.0), secs(3.0)).unwrap();
        let a = sim.add_body(at_rest("a", 0.0)).unwrap();
        sim.add_body(at_rest("b", 0.0)).unwrap();

        sim.run().unwrap();
        let last = sim.trajectory(a).unwrap().last_computed();
        assert!(!last.is_valid());
    }
}
