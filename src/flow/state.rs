use std::ops::{AddAssign, Mul};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::math::Vector3;

/// Primitive flow variables at a point: `(rho, u, v, w, p, T)`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Primitive {
    pub density: f64,
    pub velocity: Vector3,
    pub pressure: f64,
    pub temperature: f64,
}

impl Primitive {
    /// Creates a primitive state.
    #[must_use]
    pub fn new(density: f64, velocity: Vector3, pressure: f64, temperature: f64) -> Self {
        Self {
            density,
            velocity,
            pressure,
            temperature,
        }
    }

    /// Scales every component by `1 / weight_sum`.
    #[must_use]
    pub fn normalized(self, weight_sum: f64) -> Self {
        self * weight_sum.recip()
    }

    /// Replaces the density by the ideal-gas value `p / (R T)`.
    #[must_use]
    pub fn with_ideal_gas_density(mut self, gas_constant: f64) -> Self {
        self.density = self.pressure / (self.temperature * gas_constant);
        self
    }
}

impl AddAssign for Primitive {
    fn add_assign(&mut self, rhs: Self) {
        self.density += rhs.density;
        self.velocity += rhs.velocity;
        self.pressure += rhs.pressure;
        self.temperature += rhs.temperature;
    }
}

impl Mul<f64> for Primitive {
    type Output = Self;

    fn mul(self, rhs: f64) -> Self {
        Self {
            density: self.density * rhs,
            velocity: self.velocity * rhs,
            pressure: self.pressure * rhs,
            temperature: self.temperature * rhs,
        }
    }
}

/// Conservative flow variables stored on grid nodes: `(rho, rho*u, rho*E)`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Conservative {
    pub density: f64,
    pub momentum: Vector3,
    /// Total energy per unit volume.
    pub energy: f64,
}
