use crate::node::Node;
use crate::Vec3;

/// Volumes below this are treated as degenerate at assembly.
pub(crate) const DEGENERACY_EPS: f64 = 1e-12;

/// Signed volume of the tetrahedron `(a, b, c, d)` via the scalar triple
/// product. Positive when `(a, b, c)` winds counter-clockwise seen from `d`.
pub(crate) fn signed_volume(a: &Vec3, b: &Vec3, c: &Vec3, d: &Vec3) -> f64 {
    (b - a).dot(&(c - a).cross(&(d - a))) / 6.0
}

/// A four-node volumetric element together with its six edge springs.
#[derive(Clone, Debug, PartialEq)]
pub struct Tetrahedron {
    /// Corner node indices (A, B, C, D).
    pub nodes: [usize; 4],
    /// Indices of the deduplicated springs covering the six edges.
    pub springs: [usize; 6],
    /// Rest volume, computed once at assembly. It is the reference for
    /// mass and tributary-volume distribution and for barycentric weights;
    /// it is never updated as the body deforms.
    pub rest_volume: f64,
}

impl Tetrahedron {
    pub fn corners(&self, nodes: &[Node]) -> [Vec3; 4] {
        self.nodes.map(|i| nodes[i].pos)
    }

    pub fn centroid(&self, nodes: &[Node]) -> Vec3 {
        let [a, b, c, d] = self.corners(nodes);
        (a + b + c + d) / 4.0
    }

    /// Tests whether `p` lies inside this element.
    ///
    /// For each face, `p` must lie on the same side of the face plane as the
    /// opposite corner. The boundary counts as inside, so a point exactly on
    /// a shared face is accepted by both neighbors and scan order decides
    /// which one binds it.
    pub fn contains(&self, nodes: &[Node], p: &Vec3) -> bool {
        let [a, b, c, d] = self.corners(nodes);
        same_side(&a, &b, &c, &d, p)
            && same_side(&b, &c, &d, &a, p)
            && same_side(&c, &d, &a, &b, p)
            && same_side(&d, &a, &b, &c, p)
    }

    /// Barycentric weight of `p` for corner `i`: replace corner `i` with `p`
    /// and take the ratio of the resulting sub-volume to the rest volume.
    ///
    /// All four weights are computed independently rather than deriving the
    /// last from the other three; for a point genuinely inside they sum to
    /// one, so the sum doubles as a containment consistency check.
    pub fn barycentric_coord(&self, nodes: &[Node], i: usize, p: &Vec3) -> f64 {
        let mut c = self.corners(nodes);
        c[i] = *p;
        signed_volume(&c[0], &c[1], &c[2], &c[3]).abs() / self.rest_volume
    }

    pub fn barycentric(&self, nodes: &[Node], p: &Vec3) -> [f64; 4] {
        [0, 1, 2, 3].map(|i| self.barycentric_coord(nodes, i, p))
    }

    /// Signed barycentric weights of `p`.
    ///
    /// Unlike [`barycentric`](Self::barycentric) these stay a valid affine
    /// combination (summing to one) for points outside the element, going
    /// negative past a face, which makes them usable for extrapolated skin
    /// bindings.
    pub(crate) fn barycentric_signed(&self, nodes: &[Node], p: &Vec3) -> [f64; 4] {
        let corners = self.corners(nodes);
        let vol = signed_volume(&corners[0], &corners[1], &corners[2], &corners[3]);
        [0, 1, 2, 3].map(|i| {
            let mut c = corners;
            c[i] = *p;
            signed_volume(&c[0], &c[1], &c[2], &c[3]) / vol
        })
    }
}

fn same_side(a: &Vec3, b: &Vec3, c: &Vec3, opposite: &Vec3, p: &Vec3) -> bool {
    let normal = (b - a).cross(&(c - a));
    (opposite - a).dot(&normal) * (p - a).dot(&normal) >= 0.0
}
