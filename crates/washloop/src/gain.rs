//! A stand-in filter: per-axis gain followed by a symmetric clamp.
//!
//! This is not a motion-cueing algorithm. It only gives the runner a
//! bounded, deterministic [`Filter`] to drive.

use serde::Serialize;
use thiserror::Error;
use washloop_core::Filter;

/// Platform displacement and attitude.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct Pose {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub roll: f64,
    pub pitch: f64,
    pub yaw: f64,
}

#[derive(Debug, Error, PartialEq)]
pub enum GainError {
    #[error("{axis} input is not finite: {value}")]
    NonFinite { axis: &'static str, value: f64 },
}

const AXES: [&str; 6] = [
    "acceleration x",
    "acceleration y",
    "acceleration z",
    "angular velocity x",
    "angular velocity y",
    "angular velocity z",
];

#[derive(Clone, Debug)]
pub struct GainFilter {
    gain: f64,
    limit: f64,
}

impl GainFilter {
    pub fn new(gain: f64, limit: f64) -> Self {
        Self {
            gain,
            limit: limit.abs(),
        }
    }

    fn shape(&self, value: f64) -> f64 {
        (value * self.gain).clamp(-self.limit, self.limit)
    }
}

impl Filter for GainFilter {
    type Position = Pose;
    type Error = GainError;

    fn filter(
        &mut self,
        ax: f64,
        ay: f64,
        az: f64,
        wx: f64,
        wy: f64,
        wz: f64,
    ) -> Result<Pose, GainError> {
        let inputs = [ax, ay, az, wx, wy, wz];
        if let Some((axis, value)) = AXES
            .iter()
            .zip(inputs)
            .find(|(_, value)| !value.is_finite())
        {
            return Err(GainError::NonFinite { axis: *axis, value });
        }

        let [x, y, z, roll, pitch, yaw] = inputs.map(|v| self.shape(v));
        Ok(Pose {
            x,
            y,
            z,
            roll,
            pitch,
            yaw,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scales_each_axis() {
        let mut filter = GainFilter::new(0.5, 10.0);
        let pose = filter.filter(1.0, 2.0, 3.0, 4.0, 5.0, 6.0).unwrap();
        assert_eq!(
            pose,
            Pose {
                x: 0.5,
                y: 1.0,
                z: 1.5,
                roll: 2.0,
                pitch: 2.5,
                yaw: 3.0,
            }
        );
    }

    #[test]
    fn clamps_to_limit() {
        let mut filter = GainFilter::new(1.0, -0.25);
        let pose = filter.filter(9.0, -9.0, 0.1, 0.0, 0.0, 0.0).unwrap();
        assert_eq!(pose.x, 0.25);
        assert_eq!(pose.y, -0.25);
        assert_eq!(pose.z, 0.1);
    }

    #[test]
    fn rejects_non_finite_input() {
        let mut filter = GainFilter::new(1.0, 1.0);
        let err = filter
            .filter(0.0, 0.0, 0.0, 0.0, f64::INFINITY, 0.0)
            .unwrap_err();
        assert_eq!(
            err,
            GainError::NonFinite {
                axis: "angular velocity y",
                value: f64::INFINITY,
            }
        );
    }
}
