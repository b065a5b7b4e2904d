use crate::flow::{FlowModel, Primitive};
use crate::geometry::{Projection, Shape, ThermalCondition, VelocityCondition};
use crate::math::orthogonal_basis;
use crate::operations::interpolation::WeightedSum;

/// Flow states at the boundary point and the image point of a ghost node.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlowReconstruction {
    /// State satisfying the wall conditions at the boundary point.
    pub boundary: Primitive,
    /// Image point estimate corrected by the boundary state.
    pub image: Primitive,
}

/// Enforces the wall conditions of `shape` at the boundary point and blends
/// them into the interpolated image estimate.
///
/// `estimate` is the unnormalized donor sum around the image point.
#[must_use]
pub fn reconstruct_flow(
    shape: &Shape,
    projection: &Projection,
    mut estimate: WeightedSum,
    model: &FlowModel,
    tiny: f64,
) -> FlowReconstruction {
    let image = estimate.normalized();
    let surface = shape.surface_velocity(&projection.boundary);

    let velocity = match shape.velocity_condition() {
        VelocityCondition::NoSlip => surface,
        VelocityCondition::Slip => {
            let n = projection.normal;
            let (ta, tb) = orthogonal_basis(&n);
            n * surface.dot(&n) + ta * image.velocity.dot(&ta) + tb * image.velocity.dot(&tb)
        }
    };

    // Zero normal pressure gradient; the curvature term is neglected.
    let pressure = image.pressure;
    let temperature = match shape.thermal_condition() {
        ThermalCondition::Adiabatic => image.temperature,
        ThermalCondition::Isothermal(wall) => wall,
    };

    let boundary = Primitive::new(0.0, velocity, pressure, temperature)
        .with_ideal_gas_density(model.gas_constant);

    let dist2 = (projection.boundary - projection.image).norm_squared();
    estimate.add(&boundary, dist2, tiny);

    FlowReconstruction {
        boundary,
        image: estimate.normalized(),
    }
}

/// Ghost state from the boundary and image states.
///
/// Velocity varies linearly through the wall; pressure and temperature are
/// copied from the image. The density is left to the equation of state.
#[must_use]
pub fn method_of_image(boundary: &Primitive, image: &Primitive) -> Primitive {
    Primitive {
        density: image.density,
        velocity: boundary.velocity * 2.0 - image.velocity,
        pressure: image.pressure,
        temperature: image.temperature,
    }
}
