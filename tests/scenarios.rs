//! End-to-end classification and reconstruction on small grids.
//!
//! Unless stated otherwise the grid spans `[-1.5, 1.5]^3` with 30 cells per
//! axis (spacing 0.1), a halo of two nodes and two ghost layers. Node `n`
//! along an axis sits at `-1.5 + (n - 2) * 0.1`, so node 17 is the origin.

#![allow(clippy::unwrap_used)]
#![allow(clippy::float_cmp)]

use approx::assert_relative_eq;
use immerse::error::ReconstructionError;
use immerse::flow::{FlowModel, Primitive};
use immerse::geometry::{Aabb, Containment, Geometry, Motion, Polyhedron, Shape, ShapeId};
use immerse::grid::{Partition, Region, Space, TimeLevel};
use immerse::math::{Point3, Vector3};
use immerse::operations::{ComputeGeometryDomain, ImmersedBoundaryTreatment};
use immerse::ImmerseError;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn p(x: f64, y: f64, z: f64) -> Point3 {
    Point3::new(x, y, z)
}

fn partition() -> Partition {
    let domain = Aabb::new(p(-1.5, -1.5, -1.5), p(1.5, 1.5, 1.5));
    Partition::new(domain, [30; 3], 2, 2).unwrap()
}

/// Space around `shapes` filled with uniform flow at every time level.
fn space_with(shapes: Vec<Shape>, model: &FlowModel, flow: Primitive) -> (Space, Vec<ShapeId>) {
    let mut geometry = Geometry::new();
    let ids = shapes.into_iter().map(|s| geometry.add(s)).collect();
    let mut space = Space::new(partition(), geometry);
    let state = model.to_conservative(&flow.with_ideal_gas_density(model.gas_constant));
    for level in 0..immerse::grid::TIME_LEVELS {
        space.initialize_flow(TimeLevel::new(level).unwrap(), |_| state);
    }
    (space, ids)
}

fn quiescent() -> Primitive {
    Primitive::new(0.0, Vector3::zeros(), 1.0e5, 300.0)
}

fn unit_sphere() -> Shape {
    Shape::sphere(Point3::origin(), 1.0).unwrap()
}

/// Regular octahedron `|x| + |y| + |z| <= size`.
fn octahedron(size: f64) -> Polyhedron {
    let v = [
        p(size, 0.0, 0.0),
        p(-size, 0.0, 0.0),
        p(0.0, size, 0.0),
        p(0.0, -size, 0.0),
        p(0.0, 0.0, size),
        p(0.0, 0.0, -size),
    ];
    let tris = [
        [0, 2, 4],
        [1, 4, 2],
        [0, 4, 3],
        [0, 5, 2],
        [1, 3, 4],
        [1, 2, 5],
        [0, 3, 5],
        [1, 5, 3],
    ];
    Polyhedron::from_triangles(&v, &tris).unwrap()
}

fn ghost_states(space: &Space, model: &FlowModel) -> Vec<(usize, Primitive)> {
    space
        .nodes()
        .iter()
        .filter(|n| n.ghost_layer > 0)
        .map(|n| (n.ghost_layer, model.to_primitive(n.state(TimeLevel::CURRENT))))
        .collect()
}

#[test]
fn sphere_layers_follow_distance_to_surface() {
    init_tracing();
    let model = FlowModel::default();
    let (mut space, ids) = space_with(vec![unit_sphere()], &model, quiescent());
    let report = ComputeGeometryDomain::new(model).execute(&mut space).unwrap();

    let sphere = Region::Solid(ids[0]);
    // x = 1.0 lies on the surface and is owned.
    let surface = space.node([27, 17, 17]);
    assert_eq!(surface.region, sphere);
    assert_eq!((surface.interface_layer, surface.ghost_layer), (1, 1));
    // x = 0.9 reaches fluid through an in-plane diagonal.
    assert_eq!(space.node([26, 17, 17]).ghost_layer, 1);
    // x = 0.8 only reaches fluid in the second layer.
    let second = space.node([25, 17, 17]);
    assert_eq!((second.interface_layer, second.ghost_layer), (2, 2));
    // x = 0.5 is deep inside.
    assert_eq!(space.node([22, 17, 17]).interface_layer, 0);
    assert_eq!(space.node([22, 17, 17]).ghost_layer, 0);
    // x = 1.1 is fluid and never classified.
    assert_eq!(space.node([28, 17, 17]).region, Region::Fluid);
    assert_eq!(space.node([28, 17, 17]).interface_layer, 0);

    assert_eq!(report.ghosts_per_layer.len(), 2);
    assert!(report.ghosts_per_layer.iter().all(|&n| n > 0));
    assert_eq!(report.exposed, 0);
}

#[test]
fn sphere_ownership_is_exact_and_layers_are_consistent() {
    init_tracing();
    let model = FlowModel::default();
    let (mut space, ids) = space_with(vec![unit_sphere()], &model, quiescent());
    let report = ComputeGeometryDomain::new(model).execute(&mut space).unwrap();

    let part = space.partition();
    let mut owned = 0;
    for (idx, node) in space.nodes().iter().enumerate() {
        let ijk = part.coords(idx);
        if !part.is_interior(ijk) {
            assert_eq!(node.region, Region::Exterior);
            continue;
        }
        let inside = part.point(ijk).coords.norm_squared() <= 1.0;
        assert_eq!(node.region == Region::Solid(ids[0]), inside);
        owned += usize::from(inside);

        if node.ghost_layer != 0 {
            assert_ne!(node.interface_layer, 0);
        }
        if node.interface_layer != 0 {
            assert!(node.owner().is_some());
        }
        assert!(!node.pending);
    }
    assert_eq!(report.owned, owned);
    assert_eq!(report.claimed, owned);
}

#[test]
fn stationary_reclassification_changes_nothing() {
    init_tracing();
    let model = FlowModel::default();
    let (mut space, _) = space_with(vec![unit_sphere()], &model, quiescent());
    let op = ComputeGeometryDomain::new(model);
    let first = op.execute(&mut space).unwrap();
    let before = space.nodes().to_vec();

    let second = op.execute(&mut space).unwrap();
    assert_eq!(space.nodes(), before.as_slice());
    assert_eq!(second.claimed, 0);
    assert_eq!(second.released, 0);
    assert_eq!(second.ghosts_per_layer, first.ghosts_per_layer);
}

#[test]
fn first_shape_keeps_shared_nodes() {
    init_tracing();
    let model = FlowModel::default();
    let a = Shape::sphere(p(-0.3, 0.0, 0.0), 0.6).unwrap();
    let b = Shape::sphere(p(0.3, 0.0, 0.0), 0.6).unwrap();
    let (mut space, ids) = space_with(vec![a.clone(), b], &model, quiescent());
    ComputeGeometryDomain::new(model).execute(&mut space).unwrap();

    assert_eq!(space.node([17, 17, 17]).region, Region::Solid(ids[0]));
    let part = space.partition();
    for (idx, node) in space.nodes().iter().enumerate() {
        if node.region == Region::Solid(ids[1]) {
            let point = part.point(part.coords(idx));
            assert_eq!(a.locate(&point), Containment::Outside);
        }
    }
}

#[test]
fn quiescent_flow_is_preserved() {
    init_tracing();
    let model = FlowModel::default().near_surface_layers(1);
    let (mut space, _) = space_with(vec![unit_sphere()], &model, quiescent());
    let domain = ComputeGeometryDomain::new(model).execute(&mut space).unwrap();
    let treatment = ImmersedBoundaryTreatment::new(TimeLevel::CURRENT, model)
        .execute(&mut space)
        .unwrap();

    assert_eq!(treatment.per_layer, domain.ghosts_per_layer);
    assert_eq!(treatment.image_nodes, domain.ghosts_per_layer[0]);
    assert_eq!(treatment.extrapolated_nodes, domain.ghosts_per_layer[1]);

    for (_, ghost) in ghost_states(&space, &model) {
        assert_relative_eq!(ghost.pressure, 1.0e5, max_relative = 1e-9);
        assert_relative_eq!(ghost.temperature, 300.0, max_relative = 1e-9);
        assert!(ghost.velocity.norm() < 1e-9);
    }
}

#[test]
fn no_slip_wall_reverses_ghost_velocity() {
    init_tracing();
    let model = FlowModel::default();
    let flow = Primitive::new(0.0, Vector3::new(10.0, 0.0, 0.0), 1.0e5, 300.0);
    let (mut space, _) = space_with(vec![unit_sphere()], &model, flow);
    ComputeGeometryDomain::new(model).execute(&mut space).unwrap();
    ImmersedBoundaryTreatment::new(TimeLevel::CURRENT, model)
        .execute(&mut space)
        .unwrap();

    let ghosts = ghost_states(&space, &model);
    assert!(!ghosts.is_empty());
    for (_, ghost) in ghosts {
        assert!(ghost.velocity.x < 0.0 && ghost.velocity.x >= -10.0 - 1e-9);
        assert!(ghost.velocity.y.abs() < 1e-9);
        assert!(ghost.velocity.z.abs() < 1e-9);
    }
}

#[test]
fn slip_wall_keeps_tangential_flow_at_ghost_nodes() {
    init_tracing();
    let model = FlowModel::default();
    let flow = Primitive::new(0.0, Vector3::new(10.0, 0.0, 0.0), 1.0e5, 300.0);
    let sphere = unit_sphere()
        .with_friction(0.0)
        .with_motion(Motion::Moving)
        .with_velocity(Vector3::new(0.0, 2.0, 0.0));
    let (mut space, _) = space_with(vec![sphere], &model, flow);
    ComputeGeometryDomain::new(model).execute(&mut space).unwrap();
    ImmersedBoundaryTreatment::new(TimeLevel::CURRENT, model)
        .execute(&mut space)
        .unwrap();

    // (0, 1, 0) lies on the surface with normal +y: the free stream is
    // tangential and kept, the normal velocity follows the wall.
    let node = space.node([17, 27, 17]);
    assert_eq!(node.ghost_layer, 1);
    let ghost = model.to_primitive(node.state(TimeLevel::CURRENT));
    assert_relative_eq!(ghost.velocity.x, 10.0, epsilon = 1e-3);
    assert_relative_eq!(ghost.velocity.y, 2.0, epsilon = 1e-3);
    assert_relative_eq!(ghost.velocity.z, 0.0, epsilon = 1e-3);
}

#[test]
fn moving_no_slip_wall_drags_ghost_nodes() {
    init_tracing();
    let model = FlowModel::default();
    let sphere = unit_sphere()
        .with_motion(Motion::Moving)
        .with_velocity(Vector3::new(5.0, 0.0, 0.0))
        .with_angular_velocity(Vector3::new(0.0, 0.0, 2.0));
    let (mut space, _) = space_with(vec![sphere], &model, quiescent());
    ComputeGeometryDomain::new(model).execute(&mut space).unwrap();
    let report = ImmersedBoundaryTreatment::new(TimeLevel::CURRENT, model)
        .execute(&mut space)
        .unwrap();
    assert!(report.image_nodes > 0 && report.extrapolated_nodes > 0);

    // At (1, 0, 0) the surface moves with V + w x r = (5, 2, 0).
    let node = space.node([27, 17, 17]);
    assert_eq!(node.ghost_layer, 1);
    let ghost = model.to_primitive(node.state(TimeLevel::CURRENT));
    assert_relative_eq!(ghost.velocity.x, 5.0, epsilon = 1e-3);
    assert_relative_eq!(ghost.velocity.y, 2.0, epsilon = 1e-3);
    assert_relative_eq!(ghost.velocity.z, 0.0, epsilon = 1e-3);

    // Every ghost node moves with the body, against the resting fluid.
    for (_, ghost) in ghost_states(&space, &model) {
        assert!(ghost.velocity.x > 0.0, "{:?}", ghost.velocity);
    }
}

#[test]
fn isothermal_wall_heats_ghost_nodes() {
    init_tracing();
    let model = FlowModel::default().near_surface_layers(2);
    let sphere = unit_sphere().with_wall_temperature(350.0);
    let (mut space, _) = space_with(vec![sphere], &model, quiescent());
    ComputeGeometryDomain::new(model).execute(&mut space).unwrap();
    let report = ImmersedBoundaryTreatment::new(TimeLevel::CURRENT, model)
        .execute(&mut space)
        .unwrap();
    assert_eq!(report.extrapolated_nodes, 0);

    for (_, ghost) in ghost_states(&space, &model) {
        assert!(ghost.temperature > 300.0 && ghost.temperature < 350.0);
        assert_relative_eq!(ghost.pressure, 1.0e5, max_relative = 1e-9);
        // Density follows the equation of state.
        let rho = model.to_conservative(&ghost).density;
        let expected = 1.0e5 / (model.gas_constant * ghost.temperature);
        assert_relative_eq!(rho, expected, max_relative = 1e-9);
    }
}

#[test]
fn treatment_writes_only_the_requested_level() {
    init_tracing();
    let model = FlowModel::default();
    let hot = unit_sphere().with_wall_temperature(400.0);
    let (mut space, _) = space_with(vec![hot], &model, quiescent());
    ComputeGeometryDomain::new(model).execute(&mut space).unwrap();
    let level = TimeLevel::new(1).unwrap();
    let before = space.nodes().to_vec();
    ImmersedBoundaryTreatment::new(level, model).execute(&mut space).unwrap();

    for (node, old) in space.nodes().iter().zip(&before) {
        assert_eq!(node.states[0], old.states[0]);
        assert_eq!(node.states[2], old.states[2]);
        if node.ghost_layer == 0 {
            assert_eq!(node.states[1], old.states[1]);
        } else {
            assert_ne!(node.states[1], old.states[1]);
        }
    }
}

#[test]
fn moving_sphere_exposes_trailing_nodes() {
    init_tracing();
    let model = FlowModel::default();
    let sphere = unit_sphere()
        .with_motion(Motion::Moving)
        .with_velocity(Vector3::new(1.0, 0.0, 0.0));
    let (mut space, ids) = space_with(vec![sphere], &model, quiescent());
    let op = ComputeGeometryDomain::new(model);
    op.execute(&mut space).unwrap();
    assert_eq!(space.node([7, 17, 17]).region, Region::Solid(ids[0]));

    space
        .geometry_mut()
        .get_mut(ids[0])
        .unwrap()
        .displace(Vector3::new(0.1, 0.0, 0.0));
    let report = op.execute(&mut space).unwrap();
    assert!(report.released > 0);
    assert!(report.exposed > 0);
    assert!(report.exposed <= report.released);

    // x = -1.0 is now 1.1 away from the centre.
    let trailing = space.node([7, 17, 17]);
    assert_eq!(trailing.region, Region::Fluid);
    assert!(trailing.is_settled_fluid());
    assert_eq!(trailing.facet, None);
    let prim = model.to_primitive(trailing.state(TimeLevel::CURRENT));
    assert_relative_eq!(prim.pressure, 1.0e5, max_relative = 1e-9);
    assert_relative_eq!(prim.temperature, 300.0, max_relative = 1e-9);

    assert!(space.nodes().iter().all(|n| !n.pending));
    // The moved surface is classified again.
    let sphere = space.geometry().get(ids[0]).unwrap();
    assert!(!sphere.is_resolved());
    let part = space.partition();
    for (idx, node) in space.nodes().iter().enumerate() {
        if node.ghost_layer > 0 {
            let d = (part.point(part.coords(idx)) - sphere.centroid()).norm();
            assert!(d <= 1.0 + 1e-12, "ghost outside the moved sphere at {d}");
        }
    }
}

#[test]
fn octahedron_ghosts_are_reconstructed() {
    init_tracing();
    let model = FlowModel::default();
    let shape = Shape::polyhedron(octahedron(0.75), Point3::origin());
    let (mut space, ids) = space_with(vec![shape], &model, quiescent());
    let domain = ComputeGeometryDomain::new(model).execute(&mut space).unwrap();
    assert!(domain.owned > 0);

    // |x| + |y| + |z| = 0.7 is inside, 0.8 is outside.
    assert_eq!(space.node([24, 17, 17]).region, Region::Solid(ids[0]));
    assert_eq!(space.node([22, 19, 17]).region, Region::Solid(ids[0]));
    assert_eq!(space.node([25, 17, 17]).region, Region::Fluid);
    assert!(space
        .nodes()
        .iter()
        .filter(|n| n.owner().is_some())
        .all(|n| n.facet.is_some()));

    let report = ImmersedBoundaryTreatment::new(TimeLevel::CURRENT, model)
        .execute(&mut space)
        .unwrap();
    assert_eq!(report.total(), domain.ghosts_per_layer.iter().sum::<usize>());
    for (_, ghost) in ghost_states(&space, &model) {
        assert_relative_eq!(ghost.pressure, 1.0e5, max_relative = 1e-9);
        assert_relative_eq!(ghost.temperature, 300.0, max_relative = 1e-9);
    }
}

#[test]
fn released_nodes_without_fluid_neighbours_are_an_error() {
    init_tracing();
    let model = FlowModel::default();
    let (mut space, _) = space_with(vec![unit_sphere()], &model, quiescent());
    // Every fluid node awaits reconstruction, as when bodies separate
    // faster than the fluid can fill the gap.
    for node in space.nodes_mut() {
        if node.region == Region::Fluid {
            node.pending = true;
        }
    }

    let err = ComputeGeometryDomain::new(model)
        .execute(&mut space)
        .unwrap_err();
    assert!(matches!(
        err,
        ImmerseError::Reconstruction(ReconstructionError::NoDonor { shape: None, .. })
    ));
}

#[test]
fn invalid_model_is_rejected() {
    let model = FlowModel::default().near_surface_layers(0);
    let (mut space, _) = space_with(vec![unit_sphere()], &FlowModel::default(), quiescent());
    assert!(matches!(
        ComputeGeometryDomain::new(model).execute(&mut space),
        Err(ImmerseError::Config(_))
    ));
    assert!(matches!(
        ImmersedBoundaryTreatment::new(TimeLevel::CURRENT, model).execute(&mut space),
        Err(ImmerseError::Config(_))
    ));
}
