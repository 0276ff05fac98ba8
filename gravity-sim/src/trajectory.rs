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
//! Per-body trajectory storage
//!
//! A [`Trajectory`] is a fixed-size, time-indexed array of
//! [`StateRecord`]s. Slot 0 holds the initial condition; slots
//! `1..len()` are written by the integrator one step at a time.
//!
//! Unwritten slots are zero-filled. [`Trajectory::read`] returns them as-is,
//! while [`Trajectory::computed`] consults the high-water mark and returns
//! `None` for any slot the integrator has not reached yet.

use crate::components::{Position, Velocity};
use crate::error::{Result, SimulationError};
use std::ops::Index;

/// One time sample of a body's state
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct StateRecord {
    /// Position in simulation length units
    pub position: Position,
    /// Velocity in simulation velocity units
    pub velocity: Velocity,
    /// Elapsed simulation time
    pub time: f64,
}

impl StateRecord {
    /// Create a record
    pub fn new(position: Position, velocity: Velocity, time: f64) -> Self {
        StateRecord { position, velocity, time }
    }

    /// Check that position and velocity are finite
    pub fn is_valid(&self) -> bool {
        self.position.is_valid() && self.velocity.is_valid() && self.time.is_finite()
    }
}

/// Fixed-length time series of one body's state
///
/// # Example
///
/// ```
/// use gravity_sim::components::{Position, Velocity};
/// use gravity_sim::trajectory::Trajectory;
///
/// let mut traj =
///     Trajectory::initialize(3, Position::zero(), Velocity::new(1.0, 0.0, 0.0)).unwrap();
/// assert_eq!(traj.len(), 3);
/// assert_eq!(traj.computed_len(), 1);
///
/// // Slot 2 reads as a zero placeholder but is not yet computed
/// assert_eq!(traj.read(2).unwrap().time, 0.0);
/// assert!(traj.computed(2).is_none());
///
/// traj.write(1, Position::new(1.0, 0.0, 0.0), Velocity::new(1.0, 0.0, 0.0), 1.0).unwrap();
/// assert_eq!(traj.computed_len(), 2);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Trajectory {
    records: Vec<StateRecord>,
    /// Number of leading slots that hold known values
    computed: usize,
}

impl Trajectory {
    /// Allocate `n_steps` records and write the initial condition at t = 0
    ///
    /// A request for zero slots still allocates slot 0. Storage that cannot
    /// be reserved is reported as [`SimulationError::TrajectoryAllocation`]
    /// rather than aborting.
    pub fn initialize(n_steps: usize, position: Position, velocity: Velocity) -> Result<Self> {
        let len = n_steps.max(1);
        let mut records = Vec::new();
        records
            .try_reserve_exact(len)
            .map_err(|_| SimulationError::TrajectoryAllocation { slots: len })?;
        records.push(StateRecord::new(position, velocity, 0.0));
        records.resize(len, StateRecord::default());
        Ok(Trajectory { records, computed: 1 })
    }

    /// Read the record at `index`, written or not
    pub fn read(&self, index: usize) -> Result<&StateRecord> {
        self.records.get(index).ok_or(SimulationError::IndexOutOfRange {
            index,
            len: self.records.len(),
        })
    }

    /// Overwrite the record at `index`
    ///
    /// Writing the slot directly after the high-water mark advances it.
    pub fn write(
        &mut self,
        index: usize,
        position: Position,
        velocity: Velocity,
        time: f64,
    ) -> Result<()> {
        let len = self.records.len();
        let slot = self
            .records
            .get_mut(index)
            .ok_or(SimulationError::IndexOutOfRange { index, len })?;
        *slot = StateRecord::new(position, velocity, time);

        if index == self.computed {
            self.computed += 1;
        }
        Ok(())
    }

    /// Read the record at `index` only if the integrator has produced it
    pub fn computed(&self, index: usize) -> Option<&StateRecord> {
        if index < self.computed {
            self.records.get(index)
        } else {
            None
        }
    }

    /// High-water mark: the number of leading slots holding known values
    pub fn computed_len(&self) -> usize {
        self.computed
    }

    /// Whether every slot has been computed
    pub fn is_complete(&self) -> bool {
        self.computed == self.records.len()
    }

    /// The initial condition
    pub fn initial(&self) -> &StateRecord {
        &self.records[0]
    }

    /// The most recent computed record
    pub fn last_computed(&self) -> &StateRecord {
        &self.records[self.computed - 1]
    }

    /// Total number of slots
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Always false; a trajectory holds at least its initial condition
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// All slots, including unwritten placeholders
    pub fn records(&self) -> &[StateRecord] {
        &self.records
    }

    /// Iterate over the computed records only
    pub fn iter(&self) -> impl Iterator<Item = &StateRecord> {
        self.records[..self.computed].iter()
    }

    /// Computed positions in time order
    pub fn positions(&self) -> impl Iterator<Item = Position> + '_ {
        self.iter().map(|r| r.position)
    }

    /// Computed velocities in time order
    pub fn velocities(&self) -> impl Iterator<Item = Velocity> + '_ {
        self.iter().map(|r| r.velocity)
    }

    /// Computed timestamps in time order
    pub fn times(&self) -> impl Iterator<Item = f64> + '_ {
        self.iter().map(|r| r.time)
    }
}

impl Index<usize> for Trajectory {
    type Output = StateRecord;

    /// # Panics
    ///
    /// Panics if `index >= self.len()`.
    fn index(&self, index: usize) -> &StateRecord {
        &self.records[index]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Trajectory {
        Trajectory::initialize(4, Position::new(1.0, 2.0, 3.0), Velocity::new(-1.0, 0.0, 0.5))
            .unwrap()
    }

    #[test]
    fn test_initialize_writes_slot_zero() {
        let traj = sample();
        let first = traj.read(0).unwrap();
        assert_eq!(first.position, Position::new(1.0, 2.0, 3.0));
        assert_eq!(first.velocity, Velocity::new(-1.0, 0.0, 0.5));
        assert_eq!(first.time, 0.0);
        assert_eq!(traj.initial(), first);
    }

    #[test]
    fn test_unwritten_slots_are_zero_placeholders() {
        let traj = sample();
        for i in 1..traj.len() {
            assert_eq!(*traj.read(i).unwrap(), StateRecord::default());
            assert!(traj.computed(i).is_none());
        }
    }

    #[test]
    fn test_out_of_range_access() {
        let mut traj = sample();
        assert_eq!(
            traj.read(4).unwrap_err(),
            SimulationError::IndexOutOfRange { index: 4, len: 4 }
        );
        assert!(traj.write(10, Position::zero(), Velocity::zero(), 0.0).is_err());
    }

    #[test]
    #[should_panic]
    fn test_index_out_of_range_panics() {
        let traj = sample();
        let _ = traj[4];
    }

    #[test]
    fn test_high_water_mark_advances_contiguously() {
        let mut traj = sample();

        // A write past the mark does not count as computed
        traj.write(2, Position::zero(), Velocity::zero(), 2.0).unwrap();
        assert_eq!(traj.computed_len(), 1);

        traj.write(1, Position::zero(), Velocity::zero(), 1.0).unwrap();
        assert_eq!(traj.computed_len(), 2);

        // Rewriting an already computed slot leaves the mark alone
        traj.write(1, Position::zero(), Velocity::zero(), 1.0).unwrap();
        assert_eq!(traj.computed_len(), 2);
        assert!(!traj.is_complete());
    }

    #[test]
    fn test_iterators_cover_computed_slots() {
        let mut traj = sample();
        let position = Position::new(0.0, 2.0, 3.5);
        traj.write(1, position, Velocity::new(-1.0, 0.0, 0.5), 1.0).unwrap();

        let times: Vec<f64> = traj.times().collect();
        assert_eq!(times, vec![0.0, 1.0]);
        assert_eq!(traj.positions().count(), 2);
        assert_eq!(traj.velocities().last(), Some(Velocity::new(-1.0, 0.0, 0.5)));
        assert_eq!(traj.last_computed().time, 1.0);
    }

    #[test]
    fn test_zero_length_request_keeps_initial_slot() {
        let traj = Trajectory::initialize(0, Position::zero(), Velocity::zero()).unwrap();
        assert_eq!(traj.len(), 1);
        assert!(traj.is_complete());
        assert!(!traj.is_empty());
    }

    #[test]
    fn test_unreservable_length_is_an_error() {
        let err =
            Trajectory::initialize(usize::MAX, Position::zero(), Velocity::zero()).unwrap_err();
        assert_eq!(err, SimulationError::TrajectoryAllocation { slots: usize::MAX });
    }
}
