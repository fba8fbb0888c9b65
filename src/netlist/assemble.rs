//! Netlist assembly: classified paths become wires and gate connections.

use std::collections::HashSet;

use rand::{rngs::StdRng, RngExt, SeedableRng};

use crate::ir::{
    Connection, ConnectionTarget, Gate, Netlist, PlacedGate, Role, TerminalRef, Wire, WireId,
};
use crate::trace::{PathEnd, TracedPath};

/// Assembly tuning.
#[derive(Clone, Copy, Debug)]
pub struct AssemblyParams {
    /// Immediate dead ends of different gates closer than this are joined.
    pub merge_distance: f64,
    /// Seed for wire ids; `None` draws a fresh seed.
    pub wire_id_seed: Option<u64>,
}

/// Issues unique random wire ids.
pub struct WireIdGenerator {
    rng: StdRng,
    issued: HashSet<WireId>,
}

impl WireIdGenerator {
    pub fn new(seed: Option<u64>) -> Self {
        let seed = seed.unwrap_or_else(|| rand::rng().random::<u64>());
        Self {
            rng: StdRng::seed_from_u64(seed),
            issued: HashSet::new(),
        }
    }

    pub fn next_id(&mut self) -> WireId {
        loop {
            let id = WireId::new(format!("{:016x}", self.rng.random::<u64>()));
            if self.issued.insert(id.clone()) {
                return id;
            }
        }
    }
}

struct Fragment<'a> {
    owner: usize,
    role: Role,
    path: &'a TracedPath,
}

/// Builds the netlist from every gate's classified paths.
///
/// `paths` and `roles` are index-aligned with `gates`, and each inner pair
/// of vectors is index-aligned too. Paths are numbered gate by gate, then in
/// path order; that numbering fixes wire creation order and the greedy
/// pairing of dead-end fragments.
///
/// Dead ends come out as [`ConnectionTarget::Unresolved`]; see
/// [`super::classify_external`] for turning them into markers.
pub fn assemble(
    gates: &[PlacedGate],
    paths: &[Vec<TracedPath>],
    roles: &[Vec<Role>],
    params: AssemblyParams,
) -> Netlist {
    let fragments: Vec<Fragment<'_>> = paths
        .iter()
        .zip(roles)
        .enumerate()
        .flat_map(|(owner, (ps, rs))| {
            ps.iter()
                .zip(rs)
                .map(move |(path, role)| Fragment {
                    owner,
                    role: *role,
                    path,
                })
        })
        .collect();

    let partner = pair_fragments(&fragments, params.merge_distance);
    let mut ids = WireIdGenerator::new(params.wire_id_seed);
    let mut netlist = Netlist::default();
    let mut connections: Vec<Vec<Connection>> = vec![Vec::new(); gates.len()];
    let mut attach = |owner: usize, conn: Connection| {
        let list = &mut connections[owner];
        match conn.role {
            Role::Input => list.insert(0, conn),
            Role::Output => list.push(conn),
        }
    };

    for (i, frag) in fragments.iter().enumerate() {
        let wire_id = match partner[i] {
            Some(j) if j < i => continue,
            Some(j) => {
                let other = &fragments[j];
                let mut points = frag.path.waypoints.clone();
                points.extend(other.path.waypoints.iter().rev());
                let wire_id = ids.next_id();
                netlist.wires.insert(
                    wire_id.clone(),
                    Wire {
                        points,
                        terminals: vec![terminal(gates, frag), terminal(gates, other)],
                    },
                );
                attach(
                    other.owner,
                    Connection {
                        wire: wire_id.clone(),
                        role: other.role,
                        target: ConnectionTarget::Gate(gates[frag.owner].id),
                    },
                );
                attach(
                    frag.owner,
                    Connection {
                        wire: wire_id.clone(),
                        role: frag.role,
                        target: ConnectionTarget::Gate(gates[other.owner].id),
                    },
                );
                continue;
            }
            None => ids.next_id(),
        };

        netlist.wires.insert(
            wire_id.clone(),
            Wire {
                points: frag.path.waypoints.clone(),
                terminals: vec![terminal(gates, frag)],
            },
        );
        let target = match frag.path.end {
            PathEnd::Gate(id) => ConnectionTarget::Gate(id),
            PathEnd::DeadEnd => ConnectionTarget::Unresolved,
        };
        attach(
            frag.owner,
            Connection {
                wire: wire_id,
                role: frag.role,
                target,
            },
        );
    }

    netlist.gates = gates
        .iter()
        .zip(connections)
        .map(|(g, connections)| build_gate(g, connections))
        .collect();
    netlist
}

/// Greedy pairing of immediate dead ends of different gates.
fn pair_fragments(fragments: &[Fragment<'_>], max_distance: f64) -> Vec<Option<usize>> {
    let mut partner = vec![None; fragments.len()];
    for i in 0..fragments.len() {
        if partner[i].is_some() || !fragments[i].path.is_immediate_dead_end() {
            continue;
        }
        let here = fragments[i].path.last();
        let found = (0..fragments.len()).find(|&j| {
            j != i
                && partner[j].is_none()
                && fragments[j].owner != fragments[i].owner
                && fragments[j].path.is_immediate_dead_end()
                && fragments[j].path.last().distance(here) < max_distance
        });
        if let Some(j) = found {
            partner[i] = Some(j);
            partner[j] = Some(i);
        }
    }
    partner
}

fn terminal(gates: &[PlacedGate], frag: &Fragment<'_>) -> TerminalRef {
    TerminalRef {
        gate: gates[frag.owner].id,
        role: frag.role,
    }
}

fn build_gate(placed: &PlacedGate, connections: Vec<Connection>) -> Gate {
    let connected_wires: Vec<WireId> = connections.iter().map(|c| c.wire.clone()).collect();
    Gate {
        id: placed.id,
        gate_type: placed.gate_type,
        rotation: placed.rotation,
        x: placed.bbox.x,
        y: placed.bbox.y,
        width: placed.bbox.width,
        height: placed.bbox.height,
        num_inputs: Gate::arity_for(connected_wires.len()),
        connected_wires,
        connections,
    }
}
