use serde::{Deserialize, Serialize};

use crate::node::Node;
use crate::tet::Tetrahedron;
use crate::Vec3;

/// Policy for surface vertices that no tetrahedron contains.
///
/// This can happen at numerical boundaries or when the render surface pokes
/// past the simulated volume. Silently skipping such vertices would leave
/// them frozen in place, so the choice is made explicit.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum BindPolicy {
    /// Fail binding with [`Error::UnboundVertex`](crate::Error::UnboundVertex).
    #[default]
    Strict,
    /// Bind to the tetrahedron with the nearest centroid using signed
    /// barycentric weights, which extrapolate linearly outside the element.
    Nearest,
}

/// Fixed barycentric attachment of one surface vertex to one tetrahedron.
///
/// The weights are computed once from the rest pose and never recomputed:
/// they encode a fixed relationship between the surface point and the
/// element corners, and the deformed surface point is simply the blend of
/// the corners' current positions under those weights.
#[derive(Clone, Debug, PartialEq)]
pub struct SkinBinding {
    /// Index of the enclosing tetrahedron.
    pub tet: usize,
    /// Barycentric weights for corners A..D.
    pub weights: [f64; 4],
}

impl SkinBinding {
    /// Reconstructs the surface position from the current corner positions.
    pub fn position(&self, tets: &[Tetrahedron], nodes: &[Node]) -> Vec3 {
        let corners = tets[self.tet].nodes;
        let mut p = Vec3::zeros();
        for (&w, &n) in self.weights.iter().zip(corners.iter()) {
            p += nodes[n].pos * w;
        }
        p
    }
}
