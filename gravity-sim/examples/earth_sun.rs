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
//! Earth-Sun orbit example
//!
//! Integrates the Earth around the Sun for one year with a one-hour step
//! and prints a monthly summary of orbital radius and energy drift.
//!
//! # Running
//!
//! ```bash
//! cargo run --example earth_sun --release
//! ```

use gravity_sim::diagnostics::{separation, total_energy};
use gravity_sim::units::{earth_masses, julian_years, solar_masses, Length, Time, Velocity};
use gravity_sim::{BodySpec, Simulation};
use uom::si::length::{astronomical_unit, kilometer, meter};
use uom::si::time::{day, hour, second};
use uom::si::velocity::{kilometer_per_second, meter_per_second};

/// Meters to astronomical units
fn au(meters: f64) -> f64 {
    Length::new::<meter>(meters).get::<astronomical_unit>()
}

/// Seconds to days
fn days(seconds: f64) -> f64 {
    Time::new::<second>(seconds).get::<day>()
}

fn main() -> gravity_sim::Result<()> {
    let mut sim = Simulation::new(Time::new::<hour>(1.0), julian_years(1.0))?;

    let sun = sim.add_body(
        BodySpec::new("Sun", solar_masses(1.0)).radius(Length::new::<kilometer>(696_000.0)),
    )?;
    let zero = Length::new::<meter>(0.0);
    let still = Velocity::new::<meter_per_second>(0.0);
    let earth = sim.add_body(
        BodySpec::new("Earth", earth_masses(1.0))
            .position(Length::new::<astronomical_unit>(1.0), zero, zero)
            .velocity(still, Velocity::new::<kilometer_per_second>(29.78), still)
            .radius(Length::new::<kilometer>(6_371.0)),
    )?;

    println!("=== Earth-Sun Orbit ===");
    println!("Integrator:   {}", sim.integrator_name());
    println!("Timestep:     {} s", sim.dt());
    println!("Steps:        {}", sim.n_steps());
    println!("Horizon:      {:.2} days", sim.maxtime_quantity().get::<day>());
    println!();

    sim.run()?;

    let initial_energy = total_energy(&sim, 0)?;
    let steps_per_month = (Time::new::<day>(30.0).get::<second>() / sim.dt()).round() as usize;

    println!("{:>8} {:>12} {:>14}", "day", "radius (AU)", "energy drift");
    for step in (0..sim.n_steps()).step_by(steps_per_month) {
        let r = separation(&sim, sun, earth, step)?;
        let drift = (total_energy(&sim, step)? - initial_energy) / initial_energy.abs();
        let elapsed = days(sim.trajectory(earth)?[step].time);
        println!("{:>8.1} {:>12.6} {:>14.3e}", elapsed, au(r), drift);
    }

    let end = sim.trajectory(earth)?.last_computed().position;
    println!();
    println!(
        "Earth ends at ({:.4}, {:.4}, {:.4}) AU",
        au(end.x()),
        au(end.y()),
        au(end.z())
    );

    Ok(())
}
