use log::info;

use crate::solid::ElasticSolid;
use crate::{Error, Vec3};

/// Axis-aligned box used to select nodes for pinning.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Aabb {
    pub min: [f64; 3],
    pub max: [f64; 3],
}

impl Aabb {
    pub fn contains(&self, p: &Vec3) -> bool {
        (0..3).all(|i| self.min[i] <= p[i] && p[i] <= self.max[i])
    }
}

/// Externally driven pin constraint over a set of nodes.
///
/// The pin set owns the fixed node indices and each node's rest offset from
/// a driving origin; the solid only sees the fixed flag and the written
/// positions. [`apply`](Self::apply) must be called strictly between steps,
/// never while one is in flight, so the integrator never reads a partially
/// updated node.
#[derive(Clone, Debug)]
pub struct PinSet {
    indices: Vec<usize>,
    offsets: Vec<Vec3>,
}

impl PinSet {
    /// Flags every node inside `region` as fixed and records its offset
    /// from `origin`.
    pub fn from_region(solid: &mut ElasticSolid, region: Aabb, origin: [f64; 3]) -> PinSet {
        let origin = Vec3::from(origin);
        let mut indices = Vec::new();
        let mut offsets = Vec::new();
        for (i, node) in solid.nodes_mut().iter_mut().enumerate() {
            if region.contains(&node.pos) {
                node.set_fixed(true);
                indices.push(i);
                offsets.push(node.pos - origin);
            }
        }
        info!("Pinned {} nodes", indices.len());
        PinSet { indices, offsets }
    }

    /// Flags the given nodes as fixed, recording offsets from `origin`.
    pub fn from_indices(
        solid: &mut ElasticSolid,
        indices: Vec<usize>,
        origin: [f64; 3],
    ) -> Result<PinSet, Error> {
        let origin = Vec3::from(origin);
        let num_nodes = solid.nodes().len();
        let mut offsets = Vec::with_capacity(indices.len());
        for &index in &indices {
            if index >= num_nodes {
                return Err(Error::IndexOutOfBounds { index, num_nodes });
            }
        }
        for &i in &indices {
            let node = &mut solid.nodes_mut()[i];
            node.set_fixed(true);
            offsets.push(node.pos - origin);
        }
        Ok(PinSet { indices, offsets })
    }

    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    /// Drives the pinned nodes to `origin` plus their recorded offsets.
    pub fn apply(&self, solid: &mut ElasticSolid, origin: [f64; 3]) {
        let origin = Vec3::from(origin);
        let nodes = solid.nodes_mut();
        for (&i, offset) in self.indices.iter().zip(self.offsets.iter()) {
            nodes[i].pos = origin + offset;
        }
    }

    /// Releases the pinned nodes back to the integrator.
    pub fn release(self, solid: &mut ElasticSolid) {
        let nodes = solid.nodes_mut();
        for &i in &self.indices {
            nodes[i].set_fixed(false);
        }
    }
}
