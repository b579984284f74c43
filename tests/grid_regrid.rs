use flame_grid::grid::{BoundaryCondition, GridOptions, Mesh};
use flame_grid::grid_error::GridError;

fn unit_points(n: usize) -> Vec<f64> {
    (0..n).map(|j| j as f64).collect()
}

fn wide_options() -> GridOptions {
    GridOptions {
        grid_max: 10.0,
        grid_min: 1e-3,
        ..GridOptions::default()
    }
}

/// Ramp on the first four points, flat afterwards.
fn ramp_then_flat(n: usize) -> Vec<f64> {
    (0..n).map(|j| (j as f64).min(3.0)).collect()
}

#[test]
fn steep_right_end_grows_the_domain() {
    let mut mesh = Mesh::new(unit_points(11), wide_options()).unwrap();
    let mut y = vec![(0..11).map(|j| if j == 10 { 1.0 } else { 0.0 }).collect()];
    assert!(mesh.regrid(&mut y).unwrap());
    assert_eq!(mesh.n_points(), 14);
    assert_eq!(&mesh.x()[10..], &[10.0, 11.0, 12.0, 13.0]);
    assert_eq!(&y[0][10..], &[1.0; 4]);
    assert_eq!(mesh.jb(), 13);
    assert!(mesh.updated());
}

#[test]
fn steep_left_end_grows_the_domain() {
    let mut mesh = Mesh::new(unit_points(6), wide_options()).unwrap();
    let mut y = vec![vec![1.0, 0.0, 0.0, 0.0, 0.0, 0.0]];
    assert!(mesh.regrid(&mut y).unwrap());
    assert_eq!(&mesh.x()[..4], &[-3.0, -2.0, -1.0, 0.0]);
    assert_eq!(&y[0][..5], &[1.0, 1.0, 1.0, 1.0, 0.0]);
}

#[test]
fn fixed_left_location_never_grows_left() {
    let options = GridOptions {
        fixed_left_loc: true,
        ..wide_options()
    };
    let mut mesh = Mesh::new(unit_points(6), options).unwrap();
    let mut y = vec![vec![1.0, 0.0, 0.0, 0.0, 0.0, 0.0]];
    assert!(!mesh.regrid(&mut y).unwrap());
    assert_eq!(mesh.x()[0], 0.0);
}

#[test]
fn flat_right_end_is_trimmed() {
    let options = GridOptions {
        fixed_left_loc: true,
        right_bc: BoundaryCondition::ZeroGradient,
        ..wide_options()
    };
    let mut mesh = Mesh::new(unit_points(11), options).unwrap();
    let mut y = vec![ramp_then_flat(11)];
    assert!(mesh.regrid(&mut y).unwrap());
    // at most add_point_count points per call
    assert_eq!(mesh.x(), unit_points(8).as_slice());
    assert_eq!(y[0], ramp_then_flat(8));
}

#[test]
fn trimming_stops_at_minimum_size() {
    let options = GridOptions {
        fixed_left_loc: true,
        right_bc: BoundaryCondition::ZeroGradient,
        add_point_count: 10,
        ..wide_options()
    };
    let mut mesh = Mesh::new(unit_points(11), options).unwrap();
    let mut y = vec![(0..11).map(|j| if j == 0 { 0.0 } else { 1.0 }).collect()];
    assert!(mesh.regrid(&mut y).unwrap());
    assert_eq!(mesh.n_points(), 5);
}

#[test]
fn fixed_value_end_is_frozen() {
    let options = GridOptions {
        fixed_left_loc: true,
        ..wide_options()
    };
    let mut mesh = Mesh::new(unit_points(11), options).unwrap();
    let mut y = vec![ramp_then_flat(11)];
    assert!(!mesh.regrid(&mut y).unwrap());
    assert_eq!(mesh.n_points(), 11);
    assert!(!mesh.updated());
}

#[test]
fn fixed_burned_value_freezes_burned_end() {
    let options = GridOptions {
        fixed_left_loc: true,
        fixed_burned_val: true,
        right_bc: BoundaryCondition::ZeroGradient,
        ..wide_options()
    };
    let mut mesh = Mesh::new(unit_points(11), options).unwrap();
    let mut y = vec![ramp_then_flat(11)];
    assert!(!mesh.regrid(&mut y).unwrap());
}

#[test]
fn masked_variables_do_not_vote() {
    let mut mesh = Mesh::new(unit_points(11), wide_options()).unwrap();
    mesh.set_adaptation_components(2, vec![true, true], vec![false, true]);
    let mut y = vec![
        (0..11).map(|j| if j == 10 { 1.0 } else { 0.0 }).collect(),
        vec![0.5; 11],
    ];
    assert!(!mesh.regrid(&mut y).unwrap());
    assert_eq!(mesh.n_points(), 11);
}

#[test]
fn twin_flame_grows_left_only_to_the_symmetry_plane() {
    let options = GridOptions {
        twin_flame: true,
        unburned_left: false,
        left_bc: BoundaryCondition::ZeroGradient,
        ..wide_options()
    };
    let x: Vec<f64> = (0..11).map(|j| 0.5 + j as f64).collect();
    let mut mesh = Mesh::new(x, options).unwrap();
    let mut y = vec![(0..11).map(|j| if j == 0 { 1.0 } else { 0.0 }).collect()];
    assert!(mesh.regrid(&mut y).unwrap());
    assert_eq!(&mesh.x()[..3], &[0.0, 0.5, 1.5]);
    assert_eq!(mesh.n_points(), 12);
    assert_eq!((mesh.ju(), mesh.jb()), (11, 0));

    // already on the plane: nothing more to add
    let mut y = vec![(0..12).map(|j| if j == 0 { 1.0 } else { 0.0 }).collect()];
    assert!(!mesh.regrid(&mut y).unwrap());
}

#[test]
fn unstrained_flame_keeps_room_downstream() {
    let mut mesh = Mesh::new(unit_points(11), wide_options()).unwrap();
    let mut y = vec![vec![1.0; 11]];
    let mut qdot = vec![0.0; 11];
    qdot[8] = 1.0;
    assert!(mesh.regrid_unstrained(&mut y, &mut qdot).unwrap());
    assert_eq!(mesh.n_points(), 14);
    assert_eq!(qdot.len(), 14);
    assert_eq!(qdot[8], 1.0);
    assert_eq!(y[0], vec![1.0; 14]);
}

#[test]
fn unstrained_without_heat_release_behaves_like_regrid() {
    let mut mesh = Mesh::new(unit_points(11), wide_options()).unwrap();
    let mut y = vec![vec![1.0; 11]];
    let mut qdot = vec![0.0; 11];
    assert!(!mesh.regrid_unstrained(&mut y, &mut qdot).unwrap());
    let err = mesh.regrid_unstrained(&mut y, &mut vec![0.0; 3]).unwrap_err();
    assert_eq!(
        err,
        GridError::DimensionMismatch {
            what: "qdot",
            expected: 11,
            found: 3
        }
    );
}

fn curved_options(center_grid_min: f64) -> GridOptions {
    GridOptions {
        curved_flame: true,
        left_bc: BoundaryCondition::ControlVolume,
        center_grid_min,
        ..wide_options()
    }
}

fn step_at_left(n: usize) -> Vec<Vec<f64>> {
    vec![(0..n).map(|j| if j == 0 { 1.0 } else { 0.0 }).collect()]
}

#[test]
fn curved_flame_snaps_near_axis_point_onto_the_axis() {
    let x: Vec<f64> = (0..11).map(|j| 1.0005 + j as f64).collect();
    let mut mesh = Mesh::new(x, curved_options(1e-3)).unwrap();
    let mut y = step_at_left(11);
    assert!(mesh.regrid(&mut y).unwrap());
    assert_eq!(&mesh.x()[..2], &[0.0, 1.0005]);
    assert_eq!(mesh.geometry().r[0], 0.0);

    let mut y = step_at_left(12);
    assert!(!mesh.regrid(&mut y).unwrap());
    assert_eq!(mesh.x()[0], 0.0);
}

#[test]
fn curved_flame_reports_end_stranded_inside_center_floor() {
    // planar floor (grid_min) would allow snapping; the center floor does not
    let x: Vec<f64> = (0..11).map(|j| 0.05 + j as f64).collect();
    let mut mesh = Mesh::new(x.clone(), curved_options(0.1)).unwrap();
    let mut y = step_at_left(11);
    let err = mesh.regrid(&mut y).unwrap_err();
    assert!(matches!(err, GridError::GeometricInfeasibility(_)), "{err}");
    assert_eq!(mesh.x(), x.as_slice());
    assert_eq!(y, step_at_left(11));
}

#[test]
fn curved_flame_grows_to_axis_past_center_floor() {
    let x: Vec<f64> = (0..11).map(|j| 2.05 + j as f64).collect();
    let mut mesh = Mesh::new(x, curved_options(0.1)).unwrap();
    let mut y = step_at_left(11);
    assert!(mesh.regrid(&mut y).unwrap());
    // 2.05 -> 1.05 -> 0.05 lands inside the floor and is moved to the axis
    assert_eq!(mesh.x()[0], 0.0);
    assert!((mesh.x()[1] - 1.05).abs() < 1e-12);
    assert_eq!(mesh.n_points(), 13);
}

#[test]
fn unstrained_removal_keeps_downstream_width() {
    let options = GridOptions {
        fixed_left_loc: true,
        right_bc: BoundaryCondition::ZeroGradient,
        ..wide_options()
    };
    let mut qdot = vec![0.0; 11];
    qdot[3] = 1.0;

    // flame thickness 1, downstream width 5: the point at x = 9 is the last
    // one whose removal still leaves 5 behind the flame at x = 3
    let mut mesh = Mesh::new(unit_points(11), options.clone()).unwrap();
    let mut y = vec![ramp_then_flat(11)];
    assert!(mesh.regrid_unstrained(&mut y, &mut qdot).unwrap());
    assert_eq!(mesh.x(), unit_points(9).as_slice());
    assert_eq!(qdot.len(), 9);

    let mut qdot = vec![0.0; 11];
    qdot[5] = 1.0;
    let mut mesh = Mesh::new(unit_points(11), options).unwrap();
    let mut y = vec![ramp_then_flat(11)];
    assert!(!mesh.regrid_unstrained(&mut y, &mut qdot).unwrap());
    assert_eq!(mesh.n_points(), 11);
}

#[test]
fn last_remap_carries_extra_arrays() {
    let mut mesh = Mesh::new(unit_points(11), wide_options()).unwrap();
    assert!(mesh.last_remap().is_none());
    let mut y = vec![(0..11).map(|j| if j == 10 { 1.0 } else { 0.0 }).collect()];
    assert!(mesh.regrid(&mut y).unwrap());

    let plan = mesh.last_remap().unwrap();
    assert_eq!((plan.old_len(), plan.len()), (11, 14));
    assert!(!plan.is_empty());
    assert_eq!(plan.sources()[13].copied_from(), Some(10));
    let pressure: Vec<f64> = (0..11).map(|j| j as f64).collect();
    let carried = plan.apply(&pressure).unwrap();
    assert_eq!(&carried[9..], &[9.0, 10.0, 10.0, 10.0, 10.0]);

    let mut y = vec![vec![0.0; 14]];
    assert!(!mesh.regrid(&mut y).unwrap());
    assert!(mesh.last_remap().is_none());
}
