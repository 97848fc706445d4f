use crate::node::Node;

/// Canonical key identifying a spring by its unordered endpoint pair.
///
/// Two candidate springs are the same edge iff they connect the same two
/// nodes in either order, so the key stores the endpoints sorted. Shared
/// edges between tetrahedra deduplicate through a map keyed on this.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct EdgeKey([usize; 2]);

impl EdgeKey {
    pub fn new(a: usize, b: usize) -> EdgeKey {
        if a <= b {
            EdgeKey([a, b])
        } else {
            EdgeKey([b, a])
        }
    }
}

/// An elastic link between two nodes carrying a share of the body volume.
///
/// The user-facing stiffness is a density; each spring's effective
/// stiffness is that density times the tributary volume it represents,
/// normalized by rest length squared so elastic energy scales with the
/// undeformed geometry.
#[derive(Clone, Debug, PartialEq)]
pub struct Spring {
    /// Endpoint node indices.
    pub nodes: [usize; 2],
    /// Separation at rest, fixed at assembly. Strictly positive.
    pub rest_length: f64,
    /// Current separation, refreshed at the end of every step.
    pub length: f64,
    pub stiffness: f64,
    pub damping: f64,
    /// Sum of volume/6 contributions from every adjacent tetrahedron.
    pub tributary_volume: f64,
}

impl Spring {
    pub(crate) fn new(nodes: [usize; 2], rest_length: f64, stiffness: f64, damping: f64) -> Spring {
        Spring {
            nodes,
            rest_length,
            length: rest_length,
            stiffness,
            damping,
            tributary_volume: 0.0,
        }
    }

    pub fn effective_stiffness(&self) -> f64 {
        self.stiffness * self.tributary_volume / (self.rest_length * self.rest_length)
    }

    /// Elastic potential energy at the current length.
    pub fn potential_energy(&self) -> f64 {
        let d = self.length - self.rest_length;
        0.5 * self.effective_stiffness() * d * d
    }

    /// Applies equal and opposite spring forces to the two endpoints.
    ///
    /// Reads the `length` computed at the end of the previous step, so
    /// lengths must be refreshed before the next force pass.
    pub(crate) fn accumulate_forces(&self, nodes: &mut [Node]) {
        let [i, j] = self.nodes;
        let u = (nodes[i].pos - nodes[j].pos).normalize();
        let mut f = self.effective_stiffness() * (self.length - self.rest_length);
        if self.damping > 0.0 {
            f += self.damping * (nodes[i].vel - nodes[j].vel).dot(&u);
        }
        let force = u * f;
        nodes[i].force -= force;
        nodes[j].force += force;
    }

    pub(crate) fn update_length(&mut self, nodes: &[Node]) {
        self.length = (nodes[self.nodes[0]].pos - nodes[self.nodes[1]].pos).norm();
    }
}
