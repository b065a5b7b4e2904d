#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

use super::{Conservative, Primitive};

/// Gas properties and immersed boundary settings.
///
/// # Example
///
/// ```
/// use immerse::flow::FlowModel;
///
/// let model = FlowModel::default().near_surface_layers(2);
/// assert!(model.validate().is_ok());
/// assert_eq!(model.image_stencil_radius, 2);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct FlowModel {
    /// Ratio of specific heats.
    pub gamma: f64,

    /// Specific gas constant `R` in `p = rho R T`.
    pub gas_constant: f64,

    /// Ghost layers (counted inward from the surface) reconstructed by the
    /// method of image. Deeper layers are extrapolated from the layer above.
    pub near_surface_layers: usize,

    /// Starting half-width of the inverse distance stencil around image
    /// points and re-exposed nodes.
    pub image_stencil_radius: usize,
}

impl Default for FlowModel {
    fn default() -> Self {
        Self {
            gamma: 1.4,
            gas_constant: 287.058,
            near_surface_layers: 1,
            image_stencil_radius: 2,
        }
    }
}

impl FlowModel {
    /// Set the ratio of specific heats.
    #[must_use]
    pub const fn gamma(mut self, gamma: f64) -> Self {
        self.gamma = gamma;
        self
    }

    /// Set the specific gas constant.
    #[must_use]
    pub const fn gas_constant(mut self, gas_constant: f64) -> Self {
        self.gas_constant = gas_constant;
        self
    }

    /// Set how many ghost layers use the method of image.
    #[must_use]
    pub const fn near_surface_layers(mut self, layers: usize) -> Self {
        self.near_surface_layers = layers;
        self
    }

    /// Set the starting stencil half-width for image interpolation.
    #[must_use]
    pub const fn image_stencil_radius(mut self, radius: usize) -> Self {
        self.image_stencil_radius = radius;
        self
    }

    /// Checks that the parameters are physically meaningful.
    ///
    /// # Errors
    ///
    /// Returns the first offending field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.gamma.is_nan() || self.gamma <= 1.0 {
            return Err(ConfigError::Invalid {
                field: "gamma",
                reason: format!("must exceed 1, got {}", self.gamma),
            });
        }
        if self.gas_constant.is_nan() || self.gas_constant <= 0.0 {
            return Err(ConfigError::Invalid {
                field: "gas_constant",
                reason: format!("must be positive, got {}", self.gas_constant),
            });
        }
        if self.near_surface_layers == 0 {
            return Err(ConfigError::Invalid {
                field: "near_surface_layers",
                reason: "at least the first ghost layer needs the method of image".into(),
            });
        }
        if self.image_stencil_radius == 0 {
            return Err(ConfigError::Invalid {
                field: "image_stencil_radius",
                reason: "must be at least 1".into(),
            });
        }
        Ok(())
    }

    /// Converts a conservative state to primitive variables.
    #[must_use]
    pub fn to_primitive(&self, state: &Conservative) -> Primitive {
        let density = state.density;
        let velocity = state.momentum / density;
        let kinetic = 0.5 * density * velocity.norm_squared();
        let pressure = (self.gamma - 1.0) * (state.energy - kinetic);
        Primitive {
            density,
            velocity,
            pressure,
            temperature: pressure / (density * self.gas_constant),
        }
    }

    /// Converts primitive variables to a conservative state.
    #[must_use]
    pub fn to_conservative(&self, state: &Primitive) -> Conservative {
        Conservative {
            density: state.density,
            momentum: state.velocity * state.density,
            energy: state.pressure / (self.gamma - 1.0)
                + 0.5 * state.density * state.velocity.norm_squared(),
        }
    }
}
