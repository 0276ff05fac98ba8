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
//! Units of measure at the simulation boundary
//!
//! Inputs are dimensioned `uom` quantities ([`Length`], [`Time`], [`Mass`],
//! [`Velocity`]), so handing a mass to a length parameter does not compile.
//! Every simulation computes in one [`UnitSystem`] chosen at construction
//! (meters, seconds and kilograms by default); quantities are read out in
//! that system exactly once, at registration, and the integrator only ever
//! sees plain `f64` values.
//!
//! # Example
//!
//! ```
//! use gravity_sim::units::{Length, UnitSystem};
//! use uom::si::length::kilometer;
//!
//! let units = UnitSystem::si();
//! assert_eq!(units.length(Length::new::<kilometer>(1.5)), 1500.0);
//! ```

use std::fmt;
use uom::si::length::{astronomical_unit, kilometer, meter};
use uom::si::mass::{gram, kilogram};
use uom::si::ratio::ratio;
use uom::si::time::{day, hour, minute, second};

pub use uom::si::f64::{Length, Mass, Time, Velocity};

/// Newtonian gravitational constant in SI units (m³ kg⁻¹ s⁻²)
///
/// CODATA 2018 recommended value: 6.67430(15) × 10⁻¹¹
pub const GRAVITATIONAL_CONSTANT: f64 = 6.674_30e-11;

/// Days per Julian year
pub const DAYS_PER_JULIAN_YEAR: f64 = 365.25;

/// Earth mass in kilograms
pub const EARTH_MASS: f64 = 5.972_2e24;

/// Solar mass in kilograms
pub const SOLAR_MASS: f64 = 1.988_92e30;

/// Mass given in Earth masses
pub fn earth_masses(value: f64) -> Mass {
    Mass::new::<kilogram>(value * EARTH_MASS)
}

/// Mass given in solar masses
pub fn solar_masses(value: f64) -> Mass {
    Mass::new::<kilogram>(value * SOLAR_MASS)
}

/// Time given in Julian years
pub fn julian_years(value: f64) -> Time {
    Time::new::<day>(value * DAYS_PER_JULIAN_YEAR)
}

/// Units of length
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum LengthUnit {
    /// SI meter
    #[default]
    Meter,
    /// 1000 meters
    Kilometer,
    /// Astronomical unit
    AstronomicalUnit,
}

impl LengthUnit {
    /// Magnitude of `length` in this unit
    pub fn magnitude(self, length: Length) -> f64 {
        match self {
            LengthUnit::Meter => length.get::<meter>(),
            LengthUnit::Kilometer => length.get::<kilometer>(),
            LengthUnit::AstronomicalUnit => length.get::<astronomical_unit>(),
        }
    }

    /// One of this unit
    pub fn one(self) -> Length {
        self.quantity(1.0)
    }

    /// Tag `value` with this unit
    pub fn quantity(self, value: f64) -> Length {
        match self {
            LengthUnit::Meter => Length::new::<meter>(value),
            LengthUnit::Kilometer => Length::new::<kilometer>(value),
            LengthUnit::AstronomicalUnit => Length::new::<astronomical_unit>(value),
        }
    }

    /// Conventional symbol
    pub fn symbol(self) -> &'static str {
        match self {
            LengthUnit::Meter => "m",
            LengthUnit::Kilometer => "km",
            LengthUnit::AstronomicalUnit => "AU",
        }
    }
}

/// Units of time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TimeUnit {
    /// SI second
    #[default]
    Second,
    /// 60 seconds
    Minute,
    /// 3600 seconds
    Hour,
    /// 86400 seconds
    Day,
    /// Julian year of 365.25 days
    Year,
}

impl TimeUnit {
    /// Magnitude of `time` in this unit
    pub fn magnitude(self, time: Time) -> f64 {
        match self {
            TimeUnit::Second => time.get::<second>(),
            TimeUnit::Minute => time.get::<minute>(),
            TimeUnit::Hour => time.get::<hour>(),
            TimeUnit::Day => time.get::<day>(),
            // uom's `year` is 365 days
            TimeUnit::Year => time.get::<day>() / DAYS_PER_JULIAN_YEAR,
        }
    }

    /// One of this unit
    pub fn one(self) -> Time {
        self.quantity(1.0)
    }

    /// Tag `value` with this unit
    pub fn quantity(self, value: f64) -> Time {
        match self {
            TimeUnit::Second => Time::new::<second>(value),
            TimeUnit::Minute => Time::new::<minute>(value),
            TimeUnit::Hour => Time::new::<hour>(value),
            TimeUnit::Day => Time::new::<day>(value),
            TimeUnit::Year => julian_years(value),
        }
    }

    /// Conventional symbol
    pub fn symbol(self) -> &'static str {
        match self {
            TimeUnit::Second => "s",
            TimeUnit::Minute => "min",
            TimeUnit::Hour => "h",
            TimeUnit::Day => "d",
            TimeUnit::Year => "yr",
        }
    }
}

/// Units of mass
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum MassUnit {
    /// SI kilogram
    #[default]
    Kilogram,
    /// 1/1000 kilogram
    Gram,
    /// Mass of the Earth
    EarthMass,
    /// Mass of the Sun
    SolarMass,
}

impl MassUnit {
    /// Magnitude of `mass` in this unit
    pub fn magnitude(self, mass: Mass) -> f64 {
        match self {
            MassUnit::Kilogram => mass.get::<kilogram>(),
            MassUnit::Gram => mass.get::<gram>(),
            MassUnit::EarthMass | MassUnit::SolarMass => (mass / self.one()).get::<ratio>(),
        }
    }

    /// One of this unit
    pub fn one(self) -> Mass {
        match self {
            MassUnit::Kilogram => Mass::new::<kilogram>(1.0),
            MassUnit::Gram => Mass::new::<gram>(1.0),
            MassUnit::EarthMass => earth_masses(1.0),
            MassUnit::SolarMass => solar_masses(1.0),
        }
    }

    /// Conventional symbol
    pub fn symbol(self) -> &'static str {
        match self {
            MassUnit::Kilogram => "kg",
            MassUnit::Gram => "g",
            MassUnit::EarthMass => "M⊕",
            MassUnit::SolarMass => "M☉",
        }
    }
}

/// The consistent set of units a simulation computes in
///
/// Velocity is derived as length over time, so an astronomical system
/// stores velocities in AU/day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct UnitSystem {
    /// Unit of length
    pub length: LengthUnit,
    /// Unit of time
    pub time: TimeUnit,
    /// Unit of mass
    pub mass: MassUnit,
}

impl UnitSystem {
    /// Build a unit system from its three base units
    pub fn new(length: LengthUnit, time: TimeUnit, mass: MassUnit) -> Self {
        UnitSystem { length, time, mass }
    }

    /// Meters, seconds, kilograms
    pub fn si() -> Self {
        UnitSystem::default()
    }

    /// Astronomical units, days, solar masses
    pub fn astronomical() -> Self {
        UnitSystem::new(LengthUnit::AstronomicalUnit, TimeUnit::Day, MassUnit::SolarMass)
    }

    /// Gravitational constant expressed in this system
    ///
    /// G has dimension L³ M⁻¹ T⁻², so the SI value is rescaled by
    /// `mass * time² / length³`.
    pub fn gravitational_constant(&self) -> f64 {
        let length = self.length.one().get::<meter>();
        let time = self.time.one().get::<second>();
        let mass = self.mass.one().get::<kilogram>();
        GRAVITATIONAL_CONSTANT * mass * time * time / (length * length * length)
    }

    /// Magnitude of a length in this system
    pub fn length(&self, length: Length) -> f64 {
        self.length.magnitude(length)
    }

    /// Magnitude of a time in this system
    pub fn time(&self, time: Time) -> f64 {
        self.time.magnitude(time)
    }

    /// Magnitude of a mass in this system
    pub fn mass(&self, mass: Mass) -> f64 {
        self.mass.magnitude(mass)
    }

    /// Magnitude of a velocity in this system's length per time
    pub fn velocity(&self, velocity: Velocity) -> f64 {
        // Distance covered in one time unit, read in length units
        self.length.magnitude(velocity * self.time.one())
    }

    /// Tag a raw time value with this system's time unit
    pub fn time_quantity(&self, value: f64) -> Time {
        self.time.quantity(value)
    }

    /// Tag a raw length value with this system's length unit
    pub fn length_quantity(&self, value: f64) -> Length {
        self.length.quantity(value)
    }
}

impl fmt::Display for UnitSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}, {}, {}]",
            self.length.symbol(),
            self.time.symbol(),
            self.mass.symbol()
        )
    }
}
