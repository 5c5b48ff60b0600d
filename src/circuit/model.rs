//! Circuit model: gates and nets over a gate-level [`Dag`].

use std::collections::HashMap;

use tracing::debug;

use super::types::{GateId, GateKind, NetId};
use crate::error::{GatepathError, Result};
use crate::graph::Dag;
use crate::netlist::NetlistAst;

/// One logic primitive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Gate {
    /// Unique gate name
    pub name: String,
    /// Primitive implemented by the gate
    pub kind: GateKind,
    /// Gates driving this gate's inputs, in connection order, without duplicates
    pub inputs: Vec<GateId>,
    /// Input pins in declaration order (a net may appear more than once)
    pub input_nets: Vec<NetId>,
    /// The single net this gate drives
    pub output: NetId,
}

/// One signal wire.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Net {
    /// Unique net name
    pub name: String,
    /// Driving gate, absent for primary inputs and undriven wires
    pub source: Option<GateId>,
    /// Gates consuming this net, in connection order, without duplicates
    pub destinations: Vec<GateId>,
}

impl Net {
    fn new(name: String) -> Self {
        Self {
            name,
            source: None,
            destinations: Vec::new(),
        }
    }
}

/// A flat combinational circuit.
///
/// Gates and nets live in arenas indexed by [`GateId`] and [`NetId`]; they
/// reference each other by index only. Every gate is also a node of an
/// acyclic gate-level graph in which `g -> d` means `d` consumes the net
/// driven by `g`. All mutators keep that graph acyclic, so a fully built
/// circuit never needs a separate cycle check.
#[derive(Debug, Clone, Default)]
pub struct Circuit {
    gates: Vec<Gate>,
    gate_index: HashMap<String, GateId>,
    nets: Vec<Net>,
    net_index: HashMap<String, NetId>,
    primary_inputs: Vec<NetId>,
    primary_outputs: Vec<NetId>,
    graph: Dag<String>,
}

impl Circuit {
    /// Create an empty circuit.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a circuit from a parsed netlist.
    ///
    /// Ports and wires are declared first, then gates in source order. Nets
    /// that only appear on gate pins are declared implicitly.
    pub fn from_ast(ast: NetlistAst) -> Result<Self> {
        let mut circuit = Circuit::new();

        for name in ast.inputs.iter().chain(&ast.outputs).chain(&ast.wires) {
            circuit.declare_net(name.as_str())?;
        }

        for inst in &ast.instances {
            for pin in std::iter::once(&inst.output).chain(&inst.inputs) {
                if !circuit.net_index.contains_key(pin) {
                    debug!(net = %pin, gate = %inst.name, line = inst.line, "implicit net");
                    circuit.declare_net(pin.as_str())?;
                }
            }
            circuit.instantiate(inst.name.as_str(), inst.kind, &inst.output, &inst.inputs)?;
        }

        circuit.designate_primary_inputs(&ast.inputs)?;
        circuit.designate_primary_outputs(&ast.outputs)?;

        debug!(
            module = %ast.module_name,
            gates = circuit.gate_count(),
            nets = circuit.net_count(),
            "built circuit"
        );
        Ok(circuit)
    }

    // ============ Construction ============

    /// Declare a net. Declaring an existing net returns its id unchanged.
    pub fn declare_net(&mut self, name: impl Into<String>) -> Result<NetId> {
        let name = name.into();
        if self.gate_index.contains_key(&name) {
            return Err(GatepathError::NameCollision { name });
        }
        if let Some(&id) = self.net_index.get(&name) {
            return Ok(id);
        }
        let id = NetId(self.nets.len());
        self.net_index.insert(name.clone(), id);
        self.nets.push(Net::new(name));
        Ok(id)
    }

    /// Add a gate driving the already declared net `output`.
    ///
    /// Consumers already attached to `output` become fanout of the new gate.
    pub fn add_gate(&mut self, name: impl Into<String>, kind: GateKind, output: &str) -> Result<GateId> {
        let name = name.into();
        if self.gate_index.contains_key(&name) {
            return Err(GatepathError::DuplicateGate { name });
        }
        if self.net_index.contains_key(&name) {
            return Err(GatepathError::NameCollision { name });
        }
        let out = self.net_id(output)?;
        if let Some(existing) = self.nets[out.0].source {
            return Err(GatepathError::MultipleDriver {
                net: output.to_string(),
                existing: self.gates[existing.0].name.clone(),
                driver: name,
            });
        }

        let id = GateId(self.gates.len());
        self.graph.add_node(name.clone());
        self.gate_index.insert(name.clone(), id);
        self.gates.push(Gate {
            name,
            kind,
            inputs: Vec::new(),
            input_nets: Vec::new(),
            output: out,
        });
        self.nets[out.0].source = Some(id);

        // A fresh gate has no fanin, so linking it to existing consumers cannot close a loop.
        for dest in self.nets[out.0].destinations.clone() {
            self.link(id, dest)?;
        }
        debug!(gate = %self.gates[id.0].name, %kind, net = output, "added gate");
        Ok(id)
    }

    /// Attach `net` as the next input pin of `gate`.
    ///
    /// If the net already has a driver this adds the driver-to-gate edge and
    /// fails with [`GatepathError::Cycle`] when that edge would close a loop,
    /// leaving the circuit unchanged.
    pub fn attach_input(&mut self, gate: &str, net: &str) -> Result<()> {
        let gate = self.gate_id(gate)?;
        let net = self.net_id(net)?;
        self.attach(gate, net)
    }

    /// Add a gate together with its input pins, atomically.
    ///
    /// On any failure the gate and every edge it introduced are removed again.
    pub fn instantiate<S: AsRef<str>>(
        &mut self,
        name: impl Into<String>,
        kind: GateKind,
        output: &str,
        inputs: &[S],
    ) -> Result<GateId> {
        let pins = inputs
            .iter()
            .map(|net| self.net_id(net.as_ref()))
            .collect::<Result<Vec<_>>>()?;
        let id = self.add_gate(name, kind, output)?;
        for net in pins {
            if let Err(err) = self.attach(id, net) {
                self.retract_gate(id);
                return Err(err);
            }
        }
        Ok(id)
    }

    /// Add the gate-level edge `source -> dest`.
    ///
    /// `dest` becomes a consumer of the net driven by `source`.
    pub fn connect(&mut self, source: &str, dest: &str) -> Result<()> {
        let src = self.gate_id(source)?;
        let dst = self.gate_id(dest)?;
        self.link(src, dst)?;
        let net = self.gates[src.0].output;
        push_unique(&mut self.nets[net.0].destinations, dst);
        if !self.gates[dst.0].input_nets.contains(&net) {
            self.gates[dst.0].input_nets.push(net);
        }
        Ok(())
    }

    /// Mark nets as primary inputs. Either every name resolves or nothing changes.
    pub fn designate_primary_inputs<S: AsRef<str>>(&mut self, names: &[S]) -> Result<()> {
        let ids = self.resolve_nets(names)?;
        for id in ids {
            push_unique(&mut self.primary_inputs, id);
        }
        Ok(())
    }

    /// Mark nets as primary outputs. Either every name resolves or nothing changes.
    pub fn designate_primary_outputs<S: AsRef<str>>(&mut self, names: &[S]) -> Result<()> {
        let ids = self.resolve_nets(names)?;
        for id in ids {
            push_unique(&mut self.primary_outputs, id);
        }
        Ok(())
    }

    // ============ Queries ============

    /// Number of gates.
    pub fn gate_count(&self) -> usize {
        self.gates.len()
    }

    /// Number of nets.
    pub fn net_count(&self) -> usize {
        self.nets.len()
    }

    /// All gates in insertion order; a gate's position is its [`GateId`].
    pub fn gates(&self) -> &[Gate] {
        &self.gates
    }

    /// All nets in declaration order; a net's position is its [`NetId`].
    pub fn nets(&self) -> &[Net] {
        &self.nets
    }

    /// Find a gate by name.
    pub fn gate(&self, name: &str) -> Option<&Gate> {
        self.gate_index.get(name).map(|id| &self.gates[id.0])
    }

    /// Find a net by name.
    pub fn net(&self, name: &str) -> Option<&Net> {
        self.net_index.get(name).map(|id| &self.nets[id.0])
    }

    /// Get a gate by id.
    pub fn gate_by_id(&self, id: GateId) -> &Gate {
        &self.gates[id.0]
    }

    /// Get a net by id.
    pub fn net_by_id(&self, id: NetId) -> &Net {
        &self.nets[id.0]
    }

    /// The gate driving `net`, if any.
    pub fn driver(&self, net: &Net) -> Option<&Gate> {
        net.source.map(|id| &self.gates[id.0])
    }

    /// Primary input nets in designation order.
    pub fn primary_inputs(&self) -> impl Iterator<Item = &Net> {
        self.primary_inputs.iter().map(|id| &self.nets[id.0])
    }

    /// Primary output nets in designation order.
    pub fn primary_outputs(&self) -> impl Iterator<Item = &Net> {
        self.primary_outputs.iter().map(|id| &self.nets[id.0])
    }

    /// Whether `net` is designated as a primary input.
    pub fn is_primary_input(&self, net: NetId) -> bool {
        self.primary_inputs.contains(&net)
    }

    /// Whether `net` is designated as a primary output.
    pub fn is_primary_output(&self, net: NetId) -> bool {
        self.primary_outputs.contains(&net)
    }

    /// Gate-level connectivity graph, keyed by gate name.
    pub fn graph(&self) -> &Dag<String> {
        &self.graph
    }

    // ============ Internals ============

    fn gate_id(&self, name: &str) -> Result<GateId> {
        self.gate_index
            .get(name)
            .copied()
            .ok_or_else(|| GatepathError::UnknownGate {
                name: name.to_string(),
            })
    }

    fn net_id(&self, name: &str) -> Result<NetId> {
        self.net_index
            .get(name)
            .copied()
            .ok_or_else(|| GatepathError::UnknownNet {
                name: name.to_string(),
            })
    }

    fn resolve_nets<S: AsRef<str>>(&self, names: &[S]) -> Result<Vec<NetId>> {
        names.iter().map(|name| self.net_id(name.as_ref())).collect()
    }

    fn attach(&mut self, gate: GateId, net: NetId) -> Result<()> {
        let driver = self.nets[net.0].source;
        self.gates[gate.0].input_nets.push(net);
        let recorded = push_unique(&mut self.nets[net.0].destinations, gate);
        if let Some(src) = driver {
            if let Err(err) = self.link(src, gate) {
                self.gates[gate.0].input_nets.pop();
                if recorded {
                    self.nets[net.0].destinations.pop();
                }
                return Err(err);
            }
        }
        Ok(())
    }

    fn link(&mut self, src: GateId, dst: GateId) -> Result<()> {
        self.graph
            .add_edge(self.gates[src.0].name.clone(), self.gates[dst.0].name.clone())?;
        push_unique(&mut self.gates[dst.0].inputs, src);
        Ok(())
    }

    /// Undo [`Circuit::add_gate`] for the most recently added gate.
    fn retract_gate(&mut self, id: GateId) {
        debug_assert_eq!(id.0 + 1, self.gates.len(), "only the newest gate can be retracted");
        let Some(gate) = self.gates.pop() else {
            return;
        };
        self.graph.remove_node(&gate.name);
        self.gate_index.remove(&gate.name);

        let output = &mut self.nets[gate.output.0];
        output.source = None;
        for &dest in output.destinations.iter().filter(|&&d| d != id) {
            self.gates[dest.0].inputs.retain(|&g| g != id);
        }
        for net in gate.input_nets {
            self.nets[net.0].destinations.retain(|&g| g != id);
        }
        debug!(gate = %gate.name, "retracted gate");
    }
}

/// Append `item` unless already present. Returns whether it was appended.
fn push_unique<T: PartialEq>(items: &mut Vec<T>, item: T) -> bool {
    if items.contains(&item) {
        return false;
    }
    items.push(item);
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    /// a, b -> n1 (NAND) -> w1 -> n2 (NOT) -> out
    fn nand_not() -> Circuit {
        let mut c = Circuit::new();
        for net in ["a", "b", "w1", "out"] {
            c.declare_net(net).unwrap();
        }
        c.instantiate("n1", GateKind::Nand, "w1", &["a", "b"]).unwrap();
        c.instantiate("n2", GateKind::Not, "out", &["w1"]).unwrap();
        c.designate_primary_inputs(&["a", "b"]).unwrap();
        c.designate_primary_outputs(&["out"]).unwrap();
        c
    }

    #[test]
    fn test_build_nand_not() {
        let c = nand_not();
        assert_eq!(c.gate_count(), 2);
        let n2 = c.gate("n2").unwrap();
        assert_eq!(n2.inputs, vec![GateId(0)]);
        let w1 = c.net("w1").unwrap();
        assert_eq!(w1.source, Some(GateId(0)));
        assert_eq!(w1.destinations, vec![GateId(1)]);
        assert_eq!(c.graph().children(&"n1".to_string()).unwrap(), vec![&"n2".to_string()]);
        assert_eq!(
            c.primary_inputs().map(|n| n.name.as_str()).collect::<Vec<_>>(),
            vec!["a", "b"]
        );
    }

    #[test]
    fn test_consumer_before_driver() {
        let mut c = Circuit::new();
        for net in ["a", "w", "y"] {
            c.declare_net(net).unwrap();
        }
        c.instantiate("sink", GateKind::Not, "y", &["w"]).unwrap();
        c.instantiate("src", GateKind::Not, "w", &["a"]).unwrap();
        assert_eq!(c.gate("sink").unwrap().inputs, vec![GateId(1)]);
        assert!(c.graph().is_acyclic());
        assert_eq!(c.graph().edge_count(), 1);
    }

    #[test]
    fn test_duplicate_gate() {
        let mut c = nand_not();
        c.declare_net("z").unwrap();
        let err = c.add_gate("n1", GateKind::Not, "z").unwrap_err();
        assert!(matches!(err, GatepathError::DuplicateGate { ref name } if name == "n1"));
    }

    #[test]
    fn test_names_are_global() {
        let mut c = nand_not();
        assert!(matches!(
            c.declare_net("n1"),
            Err(GatepathError::NameCollision { .. })
        ));
        assert!(matches!(
            c.add_gate("w1", GateKind::Not, "out"),
            Err(GatepathError::NameCollision { .. })
        ));
    }

    #[test]
    fn test_unknown_references() {
        let mut c = nand_not();
        assert!(matches!(
            c.connect("n1", "ghost"),
            Err(GatepathError::UnknownGate { ref name }) if name == "ghost"
        ));
        assert!(matches!(
            c.designate_primary_outputs(&["out", "nope"]),
            Err(GatepathError::UnknownNet { ref name }) if name == "nope"
        ));
        assert_eq!(c.primary_outputs().count(), 1);
        assert!(matches!(
            c.add_gate("n3", GateKind::Not, "missing"),
            Err(GatepathError::UnknownNet { .. })
        ));
    }

    #[test]
    fn test_multiple_driver_rejected() {
        let mut c = nand_not();
        let err = c.add_gate("n3", GateKind::Not, "w1").unwrap_err();
        match err {
            GatepathError::MultipleDriver { net, existing, driver } => {
                assert_eq!(net, "w1");
                assert_eq!(existing, "n1");
                assert_eq!(driver, "n3");
            }
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(c.net("w1").unwrap().source, Some(GateId(0)));
    }

    #[test]
    fn test_connect_closing_loop_fails_immediately() {
        let mut c = Circuit::new();
        for net in ["x", "y"] {
            c.declare_net(net).unwrap();
        }
        c.add_gate("g1", GateKind::Not, "x").unwrap();
        c.add_gate("g2", GateKind::Not, "y").unwrap();
        c.connect("g2", "g1").unwrap();
        let err = c.connect("g1", "g2").unwrap_err();
        assert!(matches!(err, GatepathError::Cycle { ref from, ref to } if from == "g1" && to == "g2"));
        assert!(c.net("x").unwrap().destinations.is_empty());
        assert!(c.gate("g2").unwrap().inputs.is_empty());
    }

    #[test]
    fn test_cycle_through_nets_rolls_back_gate() {
        let mut c = Circuit::new();
        for net in ["w1", "w2"] {
            c.declare_net(net).unwrap();
        }
        // g2 consumes w1 and drives w2; g1 would consume w2 and drive w1.
        c.instantiate("g2", GateKind::Not, "w2", &["w1"]).unwrap();
        let err = c.instantiate("g1", GateKind::Not, "w1", &["w2"]).unwrap_err();
        assert!(err.is_cycle());

        assert!(c.gate("g1").is_none());
        assert_eq!(c.gate_count(), 1);
        assert!(!c.graph().contains(&"g1".to_string()));
        assert_eq!(c.net("w1").unwrap().source, None);
        assert_eq!(c.net("w1").unwrap().destinations, vec![GateId(0)]);
        assert!(c.net("w2").unwrap().destinations.is_empty());
        assert!(c.gate("g2").unwrap().inputs.is_empty());

        // The name is free again.
        c.declare_net("a").unwrap();
        c.instantiate("g1", GateKind::Not, "w1", &["a"]).unwrap();
        assert_eq!(c.gate("g2").unwrap().inputs, vec![GateId(1)]);
    }

    #[test]
    fn test_self_loop_rejected() {
        let mut c = Circuit::new();
        c.declare_net("w").unwrap();
        c.add_gate("g", GateKind::Not, "w").unwrap();
        assert!(c.attach_input("g", "w").unwrap_err().is_cycle());
        assert!(c.gate("g").unwrap().input_nets.is_empty());
        assert!(c.net("w").unwrap().destinations.is_empty());
    }

    #[test]
    fn test_repeated_pin_keeps_destination_unique() {
        let mut c = Circuit::new();
        for net in ["a", "w", "y"] {
            c.declare_net(net).unwrap();
        }
        c.instantiate("inv", GateKind::Not, "w", &["a"]).unwrap();
        c.instantiate("g", GateKind::Nand, "y", &["w", "w"]).unwrap();
        let g = c.gate("g").unwrap();
        assert_eq!(g.input_nets.len(), 2);
        assert_eq!(g.inputs, vec![GateId(0)]);
        assert_eq!(c.net("w").unwrap().destinations, vec![GateId(1)]);
    }
}
