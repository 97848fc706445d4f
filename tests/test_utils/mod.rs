use tetspring::{BindPolicy, ElasticSolid, Integration, SimParams, SolidBuilder};

/*
 * Setup code shared by the integration tests.
 */

pub const BASE_PARAMS: SimParams = SimParams {
    gravity: [0.0, -9.81, 0.0],
    time_step: 0.001,
    mass_density: 1.0,
    stiffness: 1000.0,
    damping: 0.0,
    integration: Integration::Symplectic,
    bind_policy: BindPolicy::Strict,
};

#[allow(dead_code)]
pub const WEIGHTLESS_PARAMS: SimParams = SimParams {
    gravity: [0.0, 0.0, 0.0],
    ..BASE_PARAMS
};

#[allow(dead_code)]
pub fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// The canonical unit tetrahedron on the coordinate axes.
pub fn one_tet_geometry() -> (Vec<[f64; 3]>, Vec<[usize; 4]>) {
    let verts = vec![
        [0.0, 0.0, 0.0],
        [1.0, 0.0, 0.0],
        [0.0, 1.0, 0.0],
        [0.0, 0.0, 1.0],
    ];
    (verts, vec![[0, 1, 2, 3]])
}

/// Two tetrahedra sharing the (1, 2, 3) face, and with it three edges.
#[allow(dead_code)]
pub fn two_tet_geometry() -> (Vec<[f64; 3]>, Vec<[usize; 4]>) {
    let verts = vec![
        [0.0, 0.0, 0.0],
        [1.0, 0.0, 0.0],
        [0.0, 1.0, 0.0],
        [0.0, 0.0, 1.0],
        [1.0, 1.0, 1.0],
    ];
    (verts, vec![[0, 1, 2, 3], [1, 2, 3, 4]])
}

/// Builds a one-tet solid whose surface vertices coincide with its corners.
#[allow(dead_code)]
pub fn one_tet_solid(params: SimParams) -> ElasticSolid {
    let (verts, cells) = one_tet_geometry();
    SolidBuilder::new(params)
        .set_geometry(verts.clone(), cells)
        .set_surface(verts)
        .build()
        .expect("Failed to build a one tet solid.")
}
