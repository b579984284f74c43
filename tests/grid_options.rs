use flame_grid::grid::{BoundaryCondition, Curvature, GridOptions, Mesh};
use flame_grid::grid_error::GridError;

#[test]
fn partial_json_fills_in_defaults() {
    let options: GridOptions = serde_json::from_str(
        r#"{ "vtol_in": 0.3, "left_bc": "ZeroGradient", "curved_flame": true }"#,
    )
    .unwrap();
    assert_eq!(options.vtol_in, 0.3);
    assert_eq!(options.dvtol_in, GridOptions::default().dvtol_in);
    assert_eq!(options.left_bc, BoundaryCondition::ZeroGradient);
    assert_eq!(options.right_bc, BoundaryCondition::FixedValue);
    assert_eq!(options.curvature(), Curvature::Cylindrical);
    options.validate().unwrap();
}

#[test]
fn options_survive_json() {
    let options = GridOptions {
        grid_max: 1e-3,
        right_bc: BoundaryCondition::WallFlux,
        add_point_count: 5,
        ..GridOptions::default()
    };
    let text = serde_json::to_string(&options).unwrap();
    let back: GridOptions = serde_json::from_str(&text).unwrap();
    assert_eq!(back, options);
}

#[test]
fn unknown_boundary_condition_is_rejected() {
    let result: Result<GridOptions, _> = serde_json::from_str(r#"{ "left_bc": "Periodic" }"#);
    assert!(result.is_err());
}

#[test]
fn rejected_options_leave_mesh_untouched() {
    let mut mesh = Mesh::uniform(5, 0.0, 1.0, GridOptions::default()).unwrap();
    let before = mesh.options().clone();

    let inverted = GridOptions {
        grid_min: 1.0,
        grid_max: 0.5,
        ..GridOptions::default()
    };
    let err = mesh.set_options(inverted).unwrap_err();
    assert!(matches!(err, GridError::InvalidConfiguration(_)), "{err}");
    assert_eq!(mesh.options(), &before);

    let twin_unburned_left = GridOptions {
        twin_flame: true,
        left_bc: BoundaryCondition::ZeroGradient,
        ..GridOptions::default()
    };
    assert!(mesh.set_options(twin_unburned_left).is_err());

    for (name, options) in [
        (
            "rm_tol",
            GridOptions {
                rm_tol: 1.5,
                ..GridOptions::default()
            },
        ),
        (
            "uniformity_tol",
            GridOptions {
                uniformity_tol: 1.0,
                ..GridOptions::default()
            },
        ),
        (
            "vtol_in",
            GridOptions {
                vtol_in: -0.1,
                ..GridOptions::default()
            },
        ),
    ] {
        let err = mesh.set_options(options).unwrap_err();
        assert!(err.to_string().contains(name), "{name}: {err}");
    }
    assert_eq!(mesh.options(), &before);
}

#[test]
fn new_options_reset_per_variable_overrides() {
    let options = GridOptions {
        vtol_in: 0.6,
        dvtol_in: 10.0,
        grid_max: 10.0,
        grid_min: 1e-3,
        ..GridOptions::default()
    };
    let mut mesh = Mesh::new(vec![0.0, 1.0, 2.0], options.clone()).unwrap();
    mesh.set_adaptation_components(1, Vec::new(), Vec::new());
    mesh.set_tolerances(0, 5.0, 50.0).unwrap();
    let mut y = vec![vec![0.0, 0.0, 1.0]];
    assert!(!mesh.adapt(&mut y).unwrap());

    mesh.set_options(options).unwrap();
    assert!(mesh.adapt(&mut y).unwrap());
    assert_eq!(mesh.n_points(), 4);
}
