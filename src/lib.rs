//! Volumetric mass-spring soft-body simulation.
//!
//! A solid is assembled from a tetrahedral mesh: one point mass per mesh
//! vertex, one elastic spring per unique edge, with tetrahedron mass and
//! volume lumped onto the nodes and springs they touch. A separate render
//! surface is attached to the volume through fixed barycentric skin
//! bindings and follows the deformation at no extra simulation cost.

mod node;
mod parse;
mod pin;
mod skin;
mod solid;
mod spring;
mod tet;

pub use self::node::Node;
pub use self::parse::{parse_ele, parse_node};
pub use self::pin::{Aabb, PinSet};
pub use self::skin::{BindPolicy, SkinBinding};
pub use self::solid::{ElasticSolid, Integration, SimParams, SolidBuilder};
pub use self::spring::{EdgeKey, Spring};
pub use self::tet::Tetrahedron;

pub type Vec3 = na::Vector3<f64>;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Degenerate tetrahedron {cell:?} with volume {volume:e}")]
    DegenerateElement { cell: [usize; 4], volume: f64 },
    #[error("Node index {index} out of bounds ({num_nodes} nodes)")]
    IndexOutOfBounds { index: usize, num_nodes: usize },
    #[error("Surface vertex {vertex} is not contained in any tetrahedron")]
    UnboundVertex { vertex: usize },
    #[error("Invalid parameter: {name:?}")]
    InvalidParameter { name: String },
    #[error("Node {node} has zero mass but is not fixed")]
    ZeroMassNode { node: usize },
    #[error("Geometry parse error at line {line}: {reason}")]
    ParseGeometry { line: usize, reason: String },
}
