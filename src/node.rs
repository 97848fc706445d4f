use crate::Vec3;

/// A simulated point mass.
///
/// Mass is lumped onto the node by the assembler: every adjacent
/// tetrahedron contributes a quarter of its rest mass. The force field is a
/// transient accumulator with a reset-accumulate-consume protocol driven by
/// the stepper; its value between steps is meaningless.
#[derive(Clone, Debug, PartialEq)]
pub struct Node {
    pub pos: Vec3,
    pub vel: Vec3,
    pub force: Vec3,
    pub mass: f64,
    fixed: bool,
}

impl Node {
    pub(crate) fn new(pos: Vec3) -> Node {
        Node {
            pos,
            vel: Vec3::zeros(),
            force: Vec3::zeros(),
            mass: 0.0,
            fixed: false,
        }
    }

    /// Marks this node as externally driven.
    ///
    /// A fixed node is skipped by the integrator entirely; its position is
    /// authoritative only from the pin collaborator that flagged it.
    pub fn set_fixed(&mut self, fixed: bool) {
        self.fixed = fixed;
    }

    pub fn is_fixed(&self) -> bool {
        self.fixed
    }

    /// Accumulates the gravitational body force `mass * g`.
    pub(crate) fn apply_gravity(&mut self, gravity: &Vec3) {
        self.force += gravity * self.mass;
    }
}
