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
//! Conservation diagnostics over recorded trajectories
//!
//! Read-only observables for checking a run: energies, linear momentum,
//! center of mass, and pairwise separation at a given step. A step can be
//! inspected once every body's trajectory has computed it; before that the
//! functions return [`SimulationError::StepNotComputed`].
//!
//! The Taylor scheme is not symplectic, so total energy drifts slowly. The
//! drift is a useful convergence check: halving `dt` should shrink it.

use crate::body::{Body, BodyId};
use crate::components::{Position, Velocity};
use crate::error::{Result, SimulationError};
use crate::trajectory::StateRecord;
use crate::Simulation;

/// Kinetic energy of one body: ½ m v²
pub fn calculate_kinetic_energy(velocity: &Velocity, mass: f64) -> f64 {
    0.5 * mass * velocity.magnitude_squared()
}

/// Gravitational potential energy of one pair: -G m₁ m₂ / r
pub fn calculate_pair_potential(g: f64, m1: f64, p1: &Position, m2: f64, p2: &Position) -> f64 {
    -g * m1 * m2 / p1.distance_to(p2)
}

/// Records of every body at `step`, in registration order
fn records_at(sim: &Simulation, step: usize) -> Result<Vec<(&Body, &StateRecord)>> {
    if step >= sim.n_steps() {
        return Err(SimulationError::IndexOutOfRange {
            index: step,
            len: sim.n_steps(),
        });
    }
    sim.bodies()
        .iter()
        .map(|body| {
            let traj = body.trajectory();
            traj.computed(step)
                .map(|record| (body, record))
                .ok_or(SimulationError::StepNotComputed {
                    step,
                    computed: traj.computed_len(),
                })
        })
        .collect()
}

/// Total kinetic energy at `step`
pub fn kinetic_energy(sim: &Simulation, step: usize) -> Result<f64> {
    Ok(records_at(sim, step)?
        .iter()
        .map(|(body, record)| calculate_kinetic_energy(&record.velocity, body.mass()))
        .sum())
}

/// Total gravitational potential energy at `step`, summed over unordered pairs
pub fn potential_energy(sim: &Simulation, step: usize) -> Result<f64> {
    let records = records_at(sim, step)?;
    let g = sim.gravitational_constant();
    let mut total = 0.0;
    for (i, (b1, r1)) in records.iter().enumerate() {
        for (b2, r2) in &records[i + 1..] {
            total += calculate_pair_potential(g, b1.mass(), &r1.position, b2.mass(), &r2.position);
        }
    }
    Ok(total)
}

/// Kinetic plus potential energy at `step`
pub fn total_energy(sim: &Simulation, step: usize) -> Result<f64> {
    Ok(kinetic_energy(sim, step)? + potential_energy(sim, step)?)
}

/// Total linear momentum Σ m v at `step`
pub fn linear_momentum(sim: &Simulation, step: usize) -> Result<[f64; 3]> {
    let mut total = [0.0; 3];
    for (body, record) in records_at(sim, step)? {
        for (acc, v) in total.iter_mut().zip(record.velocity.as_array()) {
            *acc += body.mass() * v;
        }
    }
    Ok(total)
}

/// Mass-weighted mean position at `step`
///
/// Returns the origin when the total mass is zero.
pub fn center_of_mass(sim: &Simulation, step: usize) -> Result<Position> {
    let mut weighted = [0.0; 3];
    let mut total_mass = 0.0;
    for (body, record) in records_at(sim, step)? {
        for (acc, x) in weighted.iter_mut().zip(record.position.as_array()) {
            *acc += body.mass() * x;
        }
        total_mass += body.mass();
    }
    if total_mass == 0.0 {
        return Ok(Position::zero());
    }
    Ok(Position::from_array(weighted.map(|w| w / total_mass)))
}

/// Distance between two bodies at `step`
pub fn separation(sim: &Simulation, a: BodyId, b: BodyId, step: usize) -> Result<f64> {
    let pa = computed_position(sim, a, step)?;
    let pb = computed_position(sim, b, step)?;
    Ok(pa.distance_to(&pb))
}

fn computed_position(sim: &Simulation, id: BodyId, step: usize) -> Result<Position> {
    let traj = sim.trajectory(id)?;
    if step >= traj.len() {
        return Err(SimulationError::IndexOutOfRange { index: step, len: traj.len() });
    }
    traj.computed(step)
        .map(|record| record.position)
        .ok_or(SimulationError::StepNotComputed {
            step,
            computed: traj.computed_len(),
        })
}
