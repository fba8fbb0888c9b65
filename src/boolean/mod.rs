//! Boolean synthesis: from a netlist with external markers to one
//! expression per probe.
//!
//! Toggles are labelled `A, B, ..., Z, A1, B1, ...` and probes `Y0, Y1, ...`
//! in list order. A wire whose waypoints contain both ends of a marker is
//! bound to that marker's label, placeholder targets are rewritten to the
//! bound labels, and each probe's driver gate is expanded depth-first.

mod expr;

pub use expr::{Expr, Op};

use std::collections::{BTreeMap, HashMap, HashSet};
use std::fmt;

use serde::Serialize;

use crate::ir::{ConnectionTarget, ExternalKind, Gate, GateId, Marker, Netlist, Point, Role, WireId};

/// Input label for the `index`-th toggle.
pub fn input_label(index: usize) -> String {
    let letter = char::from(b'A' + (index % 26) as u8);
    if index < 26 {
        letter.to_string()
    } else {
        format!("{letter}{}", index / 26)
    }
}

/// Output label for the `index`-th probe.
pub fn output_label(index: usize) -> String {
    format!("Y{index}")
}

/// One output's recovered expression.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Equation {
    pub output: String,
    /// `None` when no gate touches a wire bound to the output.
    pub expr: Option<Expr>,
}

impl Equation {
    /// Right-hand side as text.
    pub fn rhs(&self) -> String {
        match &self.expr {
            Some(e) => e.to_string(),
            None => "<unconnected>".to_string(),
        }
    }
}

impl fmt::Display for Equation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} = {}", self.output, self.rhs())
    }
}

/// A placeholder target that had no geometric match and got the default
/// label instead.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct LabelFallback {
    pub gate: GateId,
    pub wire: WireId,
    pub label: String,
}

/// Result of synthesis.
#[derive(Clone, Debug, PartialEq)]
pub struct Synthesis {
    /// The netlist with toggle/probe placeholders rewritten to labels.
    pub netlist: Netlist,
    pub inputs: Vec<String>,
    pub equations: Vec<Equation>,
    pub fallbacks: Vec<LabelFallback>,
}

impl Synthesis {
    /// `"Y0 = ..."` lines, one per probe.
    pub fn lines(&self) -> Vec<String> {
        self.equations.iter().map(ToString::to_string).collect()
    }

    /// Output label to right-hand side.
    pub fn to_map(&self) -> BTreeMap<String, String> {
        self.equations
            .iter()
            .map(|eq| (eq.output.clone(), eq.rhs()))
            .collect()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Binding {
    Input(usize),
    Output(usize),
}

/// Recovers one expression per probe.
///
/// Pure: the same netlist always yields byte-identical output.
pub fn synthesize(netlist: &Netlist) -> Synthesis {
    let inputs: Vec<String> = (0..netlist.toggles.len()).map(input_label).collect();
    let outputs: Vec<String> = (0..netlist.probes.len()).map(output_label).collect();

    let bindings = bind_wires(netlist);

    let mut rewritten = netlist.clone();
    let mut fallbacks = Vec::new();
    for gate in rewritten.gates.iter_mut() {
        for conn in gate.connections.iter_mut() {
            let ConnectionTarget::External(kind) = conn.target else {
                continue;
            };
            let bound = match (kind, bindings.get(&conn.wire)) {
                (ExternalKind::Toggle, Some(Binding::Input(i))) => Some(inputs[*i].clone()),
                (ExternalKind::Probe, Some(Binding::Output(i))) => Some(outputs[*i].clone()),
                _ => None,
            };
            let label = bound.unwrap_or_else(|| {
                let default = match kind {
                    ExternalKind::Toggle => inputs.first().cloned().unwrap_or_else(|| "A".into()),
                    ExternalKind::Probe => outputs.first().cloned().unwrap_or_else(|| "Y0".into()),
                };
                tracing::warn!(
                    gate = %gate.id,
                    wire = %conn.wire,
                    label = %default,
                    "no marker matches wire; using default label"
                );
                fallbacks.push(LabelFallback {
                    gate: gate.id,
                    wire: conn.wire.clone(),
                    label: default.clone(),
                });
                default
            });
            conn.target = ConnectionTarget::Label(label);
        }
    }

    let equations: Vec<Equation> = {
        let mut expander = Expander::new(&rewritten.gates, &inputs, &bindings);
        outputs
            .iter()
            .enumerate()
            .map(|(k, label)| {
                let driver = rewritten
                    .gates
                    .iter()
                    .filter(|g| {
                        g.connected_wires
                            .iter()
                            .any(|w| bindings.get(w) == Some(&Binding::Output(k)))
                    })
                    .map(|g| g.id)
                    .min();
                Equation {
                    output: label.clone(),
                    expr: driver.map(|id| expander.expand(id)),
                }
            })
            .collect()
    };

    Synthesis {
        netlist: rewritten,
        inputs,
        equations,
        fallbacks,
    }
}

/// `"Y0 = ..."` lines for a netlist.
pub fn expressions(netlist: &Netlist) -> Vec<String> {
    synthesize(netlist).lines()
}

/// Binds each wire to the first toggle whose ends both lie on it, or failing
/// that to the first such probe.
fn bind_wires(netlist: &Netlist) -> HashMap<WireId, Binding> {
    let mut bindings = HashMap::new();
    for (id, wire) in &netlist.wires {
        let points: HashSet<Point> = wire.points.iter().copied().collect();
        let hits = |m: &Marker| points.contains(&m.ends[0]) && points.contains(&m.ends[1]);
        let binding = match netlist.toggles.iter().position(hits) {
            Some(i) => Some(Binding::Input(i)),
            None => netlist.probes.iter().position(hits).map(Binding::Output),
        };
        if let Some(b) = binding {
            bindings.insert(id.clone(), b);
        }
    }
    bindings
}

/// Memoized depth-first expansion of gates into expressions.
struct Expander<'a> {
    gates: &'a [Gate],
    by_id: HashMap<GateId, usize>,
    input_labels: HashSet<&'a str>,
    fan_in: HashMap<GateId, Vec<GateId>>,
    wire_labels: HashMap<GateId, Vec<&'a str>>,
    memo: HashMap<GateId, Expr>,
    in_progress: HashSet<GateId>,
}

impl<'a> Expander<'a> {
    fn new(gates: &'a [Gate], inputs: &'a [String], bindings: &HashMap<WireId, Binding>) -> Self {
        let by_id: HashMap<GateId, usize> = gates.iter().enumerate().map(|(i, g)| (g.id, i)).collect();

        let mut fan_in: HashMap<GateId, Vec<GateId>> = HashMap::new();
        let mut push_unique = |to: GateId, from: GateId| {
            let list = fan_in.entry(to).or_default();
            if !list.contains(&from) {
                list.push(from);
            }
        };
        for gate in gates {
            for conn in &gate.connections {
                let ConnectionTarget::Gate(other) = conn.target else {
                    continue;
                };
                if !by_id.contains_key(&other) {
                    continue;
                }
                match conn.role {
                    Role::Input => push_unique(gate.id, other),
                    Role::Output => push_unique(other, gate.id),
                }
            }
        }

        let mut wire_labels: HashMap<GateId, Vec<&'a str>> = HashMap::new();
        for gate in gates {
            let labels = wire_labels.entry(gate.id).or_default();
            for wire in &gate.connected_wires {
                if let Some(Binding::Input(i)) = bindings.get(wire) {
                    let label = inputs[*i].as_str();
                    if !labels.contains(&label) {
                        labels.push(label);
                    }
                }
            }
        }

        Self {
            gates,
            by_id,
            input_labels: inputs.iter().map(String::as_str).collect(),
            fan_in,
            wire_labels,
            memo: HashMap::new(),
            in_progress: HashSet::new(),
        }
    }

    fn expand(&mut self, id: GateId) -> Expr {
        if let Some(done) = self.memo.get(&id) {
            return done.clone();
        }
        let Some(&index) = self.by_id.get(&id) else {
            return Expr::Missing;
        };
        if !self.in_progress.insert(id) {
            return Expr::Cycle;
        }

        let gates = self.gates;
        let gate = &gates[index];
        let mut operands = Vec::new();
        let mut used_labels: HashSet<String> = HashSet::new();
        let mut used_sources: HashSet<GateId> = HashSet::new();

        for conn in gate.connections_with_role(Role::Input) {
            match &conn.target {
                ConnectionTarget::Gate(src) if self.by_id.contains_key(src) => {
                    used_sources.insert(*src);
                    operands.push(self.expand(*src));
                }
                ConnectionTarget::Label(label) if self.input_labels.contains(label.as_str()) => {
                    used_labels.insert(label.clone());
                    operands.push(Expr::Var(label.clone()));
                }
                _ => {}
            }
        }

        let sources = self.fan_in.get(&id).cloned().unwrap_or_default();
        for src in sources {
            if !used_sources.contains(&src) {
                operands.push(self.expand(src));
            }
        }

        let labels = self.wire_labels.get(&id).cloned().unwrap_or_default();
        for label in labels {
            if operands.len() >= gate.num_inputs {
                break;
            }
            if used_labels.insert(label.to_string()) {
                operands.push(Expr::Var(label.to_string()));
            }
        }

        operands.truncate(gate.num_inputs);
        let expr = Expr::combine(gate.gate_type, operands);

        self.in_progress.remove(&id);
        self.memo.insert(id, expr.clone());
        expr
    }
}
