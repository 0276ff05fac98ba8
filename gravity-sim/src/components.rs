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
//! Kinematic state vectors
//!
//! Position, velocity and acceleration are stored as double-precision
//! 3-vectors in whatever [`UnitSystem`](crate::units::UnitSystem) the owning
//! simulation was built with. They carry no unit tag of their own: unit
//! checking happens once, when a body is registered.

/// 3D position in simulation length units
///
/// # Examples
///
/// ```
/// use gravity_sim::components::Position;
///
/// let a = Position::new(3.0, 0.0, 0.0);
/// let b = Position::new(0.0, 4.0, 0.0);
/// assert_eq!(a.distance_to(&b), 5.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Position {
    x: f64,
    y: f64,
    z: f64,
}

impl Position {
    /// Create a new position with the given coordinates
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Position { x, y, z }
    }

    /// The origin
    pub fn zero() -> Self {
        Position::new(0.0, 0.0, 0.0)
    }

    /// Get the x coordinate
    pub fn x(&self) -> f64 {
        self.x
    }

    /// Get the y coordinate
    pub fn y(&self) -> f64 {
        self.y
    }

    /// Get the z coordinate
    pub fn z(&self) -> f64 {
        self.z
    }

    /// Check if all coordinates are finite (not NaN or infinite)
    pub fn is_valid(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }

    /// Get the position as an array
    pub fn as_array(&self) -> [f64; 3] {
        [self.x, self.y, self.z]
    }

    /// Create a position from an array
    pub fn from_array(arr: [f64; 3]) -> Self {
        Position::new(arr[0], arr[1], arr[2])
    }

    /// Separation vector `self - other`
    pub fn offset_from(&self, other: &Position) -> [f64; 3] {
        [self.x - other.x, self.y - other.y, self.z - other.z]
    }

    /// Euclidean distance between two positions
    pub fn distance_to(&self, other: &Position) -> f64 {
        let [dx, dy, dz] = self.offset_from(other);
        (dx * dx + dy * dy + dz * dz).sqrt()
    }

    /// Second-order Taylor advance: `p + v*dt + a/2*dt²`
    pub fn advance(&self, velocity: &Velocity, acceleration: &Acceleration, dt: f64) -> Position {
        let half_dt_sq = 0.5 * dt * dt;
        Position::new(
            self.x + velocity.dx * dt + acceleration.ax * half_dt_sq,
            self.y + velocity.dy * dt + acceleration.ay * half_dt_sq,
            self.z + velocity.dz * dt + acceleration.az * half_dt_sq,
        )
    }
}

/// 3D velocity in simulation length-per-time units
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Velocity {
    dx: f64,
    dy: f64,
    dz: f64,
}

impl Velocity {
    /// Create a new velocity with the given components
    pub fn new(dx: f64, dy: f64, dz: f64) -> Self {
        Velocity { dx, dy, dz }
    }

    /// Create a zero velocity (at rest)
    pub fn zero() -> Self {
        Velocity::new(0.0, 0.0, 0.0)
    }

    /// Get the x component
    pub fn dx(&self) -> f64 {
        self.dx
    }

    /// Get the y component
    pub fn dy(&self) -> f64 {
        self.dy
    }

    /// Get the z component
    pub fn dz(&self) -> f64 {
        self.dz
    }

    /// Check if all components are finite (not NaN or infinite)
    pub fn is_valid(&self) -> bool {
        self.dx.is_finite() && self.dy.is_finite() && self.dz.is_finite()
    }

    /// Get the velocity as an array
    pub fn as_array(&self) -> [f64; 3] {
        [self.dx, self.dy, self.dz]
    }

    /// Create a velocity from an array
    pub fn from_array(arr: [f64; 3]) -> Self {
        Velocity::new(arr[0], arr[1], arr[2])
    }

    /// Squared speed
    pub fn magnitude_squared(&self) -> f64 {
        self.dx * self.dx + self.dy * self.dy + self.dz * self.dz
    }

    /// Speed
    pub fn magnitude(&self) -> f64 {
        self.magnitude_squared().sqrt()
    }

    /// First-order advance: `v + a*dt`
    pub fn advance(&self, acceleration: &Acceleration, dt: f64) -> Velocity {
        Velocity::new(
            self.dx + acceleration.ax * dt,
            self.dy + acceleration.ay * dt,
            self.dz + acceleration.az * dt,
        )
    }
}

/// 3D acceleration in simulation length-per-time² units
///
/// Built up by summing one contribution per gravitating source.
///
/// # Examples
///
/// ```
/// use gravity_sim::components::Acceleration;
///
/// let mut acc = Acceleration::zero();
/// acc.accumulate(&Acceleration::new(1.0, 0.0, 0.0));
/// acc.accumulate(&Acceleration::new(0.0, -2.0, 0.0));
/// assert_eq!(acc.as_array(), [1.0, -2.0, 0.0]);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Acceleration {
    ax: f64,
    ay: f64,
    az: f64,
}

impl Acceleration {
    /// Create a new acceleration with the given components
    pub fn new(ax: f64, ay: f64, az: f64) -> Self {
        Acceleration { ax, ay, az }
    }

    /// Create a zero acceleration
    pub fn zero() -> Self {
        Acceleration::new(0.0, 0.0, 0.0)
    }

    /// Get the x component
    pub fn ax(&self) -> f64 {
        self.ax
    }

    /// Get the y component
    pub fn ay(&self) -> f64 {
        self.ay
    }

    /// Get the z component
    pub fn az(&self) -> f64 {
        self.az
    }

    /// Check if all components are finite (not NaN or infinite)
    pub fn is_valid(&self) -> bool {
        self.ax.is_finite() && self.ay.is_finite() && self.az.is_finite()
    }

    /// Get the acceleration as an array
    pub fn as_array(&self) -> [f64; 3] {
        [self.ax, self.ay, self.az]
    }

    /// Add another acceleration to this one
    pub fn accumulate(&mut self, other: &Acceleration) {
        self.ax += other.ax;
        self.ay += other.ay;
        self.az += other.az;
    }

    /// Magnitude of the acceleration
    pub fn magnitude(&self) -> f64 {
        (self.ax * self.ax + self.ay * self.ay + self.az * self.az).sqrt()
    }
}
