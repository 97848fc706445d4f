use ahash::AHashMap;
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use crate::node::Node;
use crate::skin::{BindPolicy, SkinBinding};
use crate::spring::{EdgeKey, Spring};
use crate::tet::{signed_volume, Tetrahedron, DEGENERACY_EPS};
use crate::{Error, Vec3};

/// Integration scheme used to advance the simulation.
///
/// The two schemes share every pass except the order of the velocity and
/// position updates. That ordering is not cosmetic: advancing position with
/// the freshly updated velocity gives the symplectic variant materially
/// better energy behavior for oscillatory spring systems at the same step.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Integration {
    /// Forward Euler: position advances with the previous velocity.
    Explicit,
    /// Semi-implicit Euler: velocity first, then position with the new
    /// velocity.
    Symplectic,
}

/// Simulation parameters. Validated once by [`SolidBuilder::build`];
/// a solid cannot be constructed from an invalid configuration.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SimParams {
    pub gravity: [f64; 3],
    /// Fixed time step, strictly positive.
    pub time_step: f64,
    /// Mass per unit volume, strictly positive.
    pub mass_density: f64,
    /// Stiffness per unit volume. Zero disables elastic forces.
    pub stiffness: f64,
    /// Damping coefficient for the relative-velocity term. Zero disables it.
    pub damping: f64,
    pub integration: Integration,
    pub bind_policy: BindPolicy,
}

impl Default for SimParams {
    fn default() -> SimParams {
        SimParams {
            gravity: [0.0, -9.81, 0.0],
            time_step: 0.001,
            mass_density: 1.0,
            stiffness: 1000.0,
            damping: 0.0,
            integration: Integration::Symplectic,
            bind_policy: BindPolicy::Strict,
        }
    }
}

impl SimParams {
    fn validate(&self) -> Result<(), Error> {
        let invalid = |name: &str| Error::InvalidParameter {
            name: name.to_string(),
        };
        if !(self.time_step > 0.0) {
            return Err(invalid("time_step"));
        }
        if !(self.mass_density > 0.0) {
            return Err(invalid("mass_density"));
        }
        if !(self.stiffness >= 0.0) {
            return Err(invalid("stiffness"));
        }
        if !(self.damping >= 0.0) {
            return Err(invalid("damping"));
        }
        Ok(())
    }
}

/// Assembles an [`ElasticSolid`] from parsed geometry.
#[derive(Clone, Debug, Default)]
pub struct SolidBuilder {
    params: SimParams,
    positions: Vec<[f64; 3]>,
    cells: Vec<[usize; 4]>,
    surface: Vec<[f64; 3]>,
}

impl SolidBuilder {
    pub fn new(params: SimParams) -> SolidBuilder {
        SolidBuilder {
            params,
            positions: Vec::new(),
            cells: Vec::new(),
            surface: Vec::new(),
        }
    }

    /// Sets the volumetric rest geometry: node positions and tetrahedron
    /// index 4-tuples.
    pub fn set_geometry(&mut self, positions: Vec<[f64; 3]>, cells: Vec<[usize; 4]>) -> &mut Self {
        self.positions = positions;
        self.cells = cells;
        self
    }

    /// Sets the render surface vertices to bind to the volume. Optional; a
    /// solid without a surface simulates but produces no skin positions.
    pub fn set_surface(&mut self, positions: Vec<[f64; 3]>) -> &mut Self {
        self.surface = positions;
        self
    }

    pub fn build(&self) -> Result<ElasticSolid, Error> {
        self.params.validate()?;

        let mut nodes: Vec<Node> = self
            .positions
            .iter()
            .map(|&p| Node::new(Vec3::from(p)))
            .collect();

        let (mut springs, tets) = build_topology(&nodes, &self.cells, &self.params)?;
        distribute_mass(&mut nodes, &mut springs, &tets, self.params.mass_density);

        let total_volume: f64 = tets.iter().map(|t| t.rest_volume).sum();
        info!(
            "Assembled solid: {} nodes, {} springs, {} tetrahedra, volume {:.6e}, mass {:.6e}",
            nodes.len(),
            springs.len(),
            tets.len(),
            total_volume,
            total_volume * self.params.mass_density,
        );

        let skin = bind_skin(&self.surface, &tets, &nodes, self.params.bind_policy)?;

        let mut solid = ElasticSolid {
            params: self.params,
            nodes,
            springs,
            tets,
            skin,
            surface_positions: vec![[0.0; 3]; self.surface.len()],
        };
        solid.update_surface_positions();
        Ok(solid)
    }
}

fn build_topology(
    nodes: &[Node],
    cells: &[[usize; 4]],
    params: &SimParams,
) -> Result<(Vec<Spring>, Vec<Tetrahedron>), Error> {
    let mut springs = Vec::new();
    let mut edge_map: AHashMap<EdgeKey, usize> = AHashMap::new();
    let mut tets = Vec::with_capacity(cells.len());

    for &cell in cells {
        for &index in &cell {
            if index >= nodes.len() {
                return Err(Error::IndexOutOfBounds {
                    index,
                    num_nodes: nodes.len(),
                });
            }
        }
        for i in 0..4 {
            for j in i + 1..4 {
                if cell[i] == cell[j] {
                    return Err(Error::DegenerateElement { cell, volume: 0.0 });
                }
            }
        }

        let [a, b, c, d] = cell.map(|i| nodes[i].pos);
        let volume = signed_volume(&a, &b, &c, &d).abs();
        if volume <= DEGENERACY_EPS {
            return Err(Error::DegenerateElement { cell, volume });
        }

        // One spring per unique unordered edge; shared edges reuse the
        // spring created by an earlier cell.
        let mut edges = [0usize; 6];
        let mut e = 0;
        for i in 0..4 {
            for j in i + 1..4 {
                let key = EdgeKey::new(cell[i], cell[j]);
                edges[e] = *edge_map.entry(key).or_insert_with(|| {
                    let rest = (nodes[cell[i]].pos - nodes[cell[j]].pos).norm();
                    springs.push(Spring::new(
                        [cell[i], cell[j]],
                        rest,
                        params.stiffness,
                        params.damping,
                    ));
                    springs.len() - 1
                });
                e += 1;
            }
        }

        tets.push(Tetrahedron {
            nodes: cell,
            springs: edges,
            rest_volume: volume,
        });
    }

    Ok((springs, tets))
}

/// Lumps each tetrahedron's rest mass onto its corners (a quarter each) and
/// its rest volume onto its edge springs (a sixth each).
fn distribute_mass(
    nodes: &mut [Node],
    springs: &mut [Spring],
    tets: &[Tetrahedron],
    density: f64,
) {
    for tet in tets {
        for &n in &tet.nodes {
            nodes[n].mass += tet.rest_volume * density / 4.0;
        }
        for &s in &tet.springs {
            springs[s].tributary_volume += tet.rest_volume / 6.0;
        }
    }
}

fn bind_skin(
    surface: &[[f64; 3]],
    tets: &[Tetrahedron],
    nodes: &[Node],
    policy: BindPolicy,
) -> Result<Vec<SkinBinding>, Error> {
    let mut skin = Vec::with_capacity(surface.len());
    for (vertex, &p) in surface.iter().enumerate() {
        let p = Vec3::from(p);
        // Linear scan; first containing tetrahedron wins, which also breaks
        // face-boundary ties consistently.
        let enclosing = tets.iter().position(|t| t.contains(nodes, &p));
        let binding = match enclosing {
            Some(tet) => {
                let weights = tets[tet].barycentric(nodes, &p);
                // The four weights are computed independently; summing to
                // one confirms the containment test agreed with them.
                debug_assert!(approx::relative_eq!(
                    weights.iter().sum::<f64>(),
                    1.0,
                    max_relative = 1e-4
                ));
                SkinBinding { tet, weights }
            }
            None => match policy {
                BindPolicy::Strict => return Err(Error::UnboundVertex { vertex }),
                BindPolicy::Nearest => {
                    let tet = nearest_tet(tets, nodes, &p)
                        .ok_or(Error::UnboundVertex { vertex })?;
                    warn!(
                        "surface vertex {} lies outside the volume; \
                         extrapolating from tetrahedron {}",
                        vertex, tet
                    );
                    SkinBinding {
                        tet,
                        weights: tets[tet].barycentric_signed(nodes, &p),
                    }
                }
            },
        };
        skin.push(binding);
    }
    if !skin.is_empty() {
        debug!("Bound {} surface vertices", skin.len());
    }
    Ok(skin)
}

fn nearest_tet(tets: &[Tetrahedron], nodes: &[Node], p: &Vec3) -> Option<usize> {
    tets.iter()
        .enumerate()
        .map(|(i, t)| (i, (t.centroid(nodes) - p).norm_squared()))
        .min_by(|(_, a), (_, b)| a.total_cmp(b))
        .map(|(i, _)| i)
}

/// A fully assembled soft body: nodes, deduplicated springs, tetrahedra and
/// skin bindings, advanced one fixed step at a time.
///
/// All collections are created at assembly and never resized; per-step
/// mutation is limited to node state and spring lengths. The node
/// collection is exposed mutably for the pin-constraint collaborator,
/// which must write strictly between steps.
#[derive(Clone, Debug)]
pub struct ElasticSolid {
    params: SimParams,
    nodes: Vec<Node>,
    springs: Vec<Spring>,
    tets: Vec<Tetrahedron>,
    skin: Vec<SkinBinding>,
    surface_positions: Vec<[f64; 3]>,
}

impl ElasticSolid {
    pub fn params(&self) -> &SimParams {
        &self.params
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn nodes_mut(&mut self) -> &mut [Node] {
        &mut self.nodes
    }

    pub fn springs(&self) -> &[Spring] {
        &self.springs
    }

    pub fn springs_mut(&mut self) -> &mut [Spring] {
        &mut self.springs
    }

    pub fn tetrahedra(&self) -> &[Tetrahedron] {
        &self.tets
    }

    pub fn skin_bindings(&self) -> &[SkinBinding] {
        &self.skin
    }

    /// Surface vertex positions as of the last completed step, in the order
    /// the surface was given to the builder.
    pub fn surface_positions(&self) -> &[[f64; 3]] {
        &self.surface_positions
    }

    /// Total mechanical energy: kinetic plus spring potential. Gravity is
    /// excluded. Useful for stability diagnostics.
    pub fn mechanical_energy(&self) -> f64 {
        let kinetic: f64 = self
            .nodes
            .iter()
            .map(|n| 0.5 * n.mass * n.vel.norm_squared())
            .sum();
        let elastic: f64 = self.springs.iter().map(|s| s.potential_energy()).sum();
        kinetic + elastic
    }

    /// Advances the simulation by one fixed time step.
    ///
    /// Pass order is part of the correctness contract: reset and apply
    /// gravity, accumulate spring forces, integrate free nodes, refresh
    /// spring lengths, reconstruct the skin. Fixed nodes are skipped
    /// entirely; their positions belong to the pin collaborator.
    pub fn step(&mut self) -> Result<(), Error> {
        let dt = self.params.time_step;
        let gravity = Vec3::from(self.params.gravity);

        for node in &mut self.nodes {
            node.force = Vec3::zeros();
            node.apply_gravity(&gravity);
        }

        for spring in &self.springs {
            spring.accumulate_forces(&mut self.nodes);
        }

        for (i, node) in self.nodes.iter_mut().enumerate() {
            if node.is_fixed() {
                continue;
            }
            if !(node.mass > 0.0) {
                return Err(Error::ZeroMassNode { node: i });
            }
            match self.params.integration {
                Integration::Explicit => {
                    node.pos += node.vel * dt;
                    node.vel += node.force * (dt / node.mass);
                }
                Integration::Symplectic => {
                    node.vel += node.force * (dt / node.mass);
                    node.pos += node.vel * dt;
                }
            }
        }

        for spring in &mut self.springs {
            spring.update_length(&self.nodes);
        }

        self.update_surface_positions();
        Ok(())
    }

    fn update_surface_positions(&mut self) {
        for (out, binding) in self.surface_positions.iter_mut().zip(self.skin.iter()) {
            *out = binding.position(&self.tets, &self.nodes).into();
        }
    }
}
