//! Motion samples consumed by the loop.

/// A three-axis quantity in the sensor frame.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Vector {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vector {
    pub const ZERO: Vector = Vector::new(0.0, 0.0, 0.0);

    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }
}

impl From<[f64; 3]> for Vector {
    fn from([x, y, z]: [f64; 3]) -> Self {
        Self { x, y, z }
    }
}

/// Linear acceleration and angular velocity along three axes.
///
/// A `Motion` is replaced as a whole; the loop never updates it field by
/// field.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Motion {
    pub acceleration: Vector,
    pub angular_velocity: Vector,
}

impl Motion {
    pub const fn new(acceleration: Vector, angular_velocity: Vector) -> Self {
        Self {
            acceleration,
            angular_velocity,
        }
    }

    /// The six scalars in filter argument order: ax, ay, az, wx, wy, wz.
    pub fn components(&self) -> [f64; 6] {
        [
            self.acceleration.x,
            self.acceleration.y,
            self.acceleration.z,
            self.angular_velocity.x,
            self.angular_velocity.y,
            self.angular_velocity.z,
        ]
    }
}
