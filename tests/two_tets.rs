mod test_utils;

use approx::*;
use tetspring::*;
pub use test_utils::*;

fn two_tet_solid() -> ElasticSolid {
    let (verts, cells) = two_tet_geometry();
    SolidBuilder::new(WEIGHTLESS_PARAMS)
        .set_geometry(verts, cells)
        .build()
        .unwrap()
}

/// Two tetrahedra sharing a face share its three edges: 6 + 6 - 3 springs,
/// with each shared spring represented exactly once.
#[test]
fn shared_edges_deduplicate() {
    let solid = two_tet_solid();
    assert_eq!(solid.tetrahedra().len(), 2);
    assert_eq!(solid.springs().len(), 9);

    // The shared edges appear in both tetrahedra as the same spring index.
    let shared = |a: usize, b: usize| {
        let find = |tet: &Tetrahedron| {
            tet.springs
                .iter()
                .copied()
                .find(|&s| {
                    let e = solid.springs()[s].nodes;
                    e == [a, b] || e == [b, a]
                })
                .unwrap()
        };
        let tets = solid.tetrahedra();
        assert_eq!(find(&tets[0]), find(&tets[1]));
    };
    shared(1, 2);
    shared(1, 3);
    shared(2, 3);
}

/// Total lumped node mass equals density times total rest volume.
#[test]
fn mass_is_conserved() {
    let solid = two_tet_solid();
    let total_volume: f64 = solid.tetrahedra().iter().map(|t| t.rest_volume).sum();
    let total_mass: f64 = solid.nodes().iter().map(|n| n.mass).sum();
    assert_relative_eq!(
        total_mass,
        WEIGHTLESS_PARAMS.mass_density * total_volume,
        max_relative = 1e-12
    );
}

/// Each tetrahedron spreads its whole volume over its six edges, so the
/// tributary volumes also add up to the total rest volume.
#[test]
fn tributary_volume_adds_up() {
    let solid = two_tet_solid();
    let total_volume: f64 = solid.tetrahedra().iter().map(|t| t.rest_volume).sum();
    let total_tributary: f64 = solid.springs().iter().map(|s| s.tributary_volume).sum();
    assert_relative_eq!(total_tributary, total_volume, max_relative = 1e-12);
}

/// A surface point on the shared face is contained by both neighbors; scan
/// order must bind it to exactly one, the first.
#[test]
fn shared_face_point_binds_once() {
    let (verts, cells) = two_tet_geometry();
    // Centroid of the shared (1, 2, 3) face.
    let face_point = [1.0 / 3.0, 1.0 / 3.0, 1.0 / 3.0];
    let solid = SolidBuilder::new(WEIGHTLESS_PARAMS)
        .set_geometry(verts, cells)
        .set_surface(vec![face_point])
        .build()
        .unwrap();

    let binding = &solid.skin_bindings()[0];
    assert_eq!(binding.tet, 0);
    assert_relative_eq!(
        binding.weights.iter().sum::<f64>(),
        1.0,
        max_relative = 1e-10
    );
}
