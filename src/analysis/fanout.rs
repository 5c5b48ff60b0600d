//! Fanout extraction.

use indexmap::IndexMap;

use crate::circuit::Circuit;

/// Gate name to the names of the gates consuming its output.
///
/// Every gate has an entry; sink gates map to an empty list.
pub type FanoutReport = IndexMap<String, Vec<String>>;

/// Fanout of every gate, in gate insertion order.
///
/// Each list is the destination list of the gate's output net, so it has no
/// duplicates and follows connection order.
pub fn fanout(circuit: &Circuit) -> FanoutReport {
    circuit
        .gates()
        .iter()
        .map(|gate| {
            let destinations = circuit
                .net_by_id(gate.output)
                .destinations
                .iter()
                .map(|&d| circuit.gate_by_id(d).name.clone())
                .collect();
            (gate.name.clone(), destinations)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::circuit::GateKind;

    #[test]
    fn test_fanout_matches_net_destinations() {
        let mut c = Circuit::new();
        for net in ["a", "w", "y1", "y2", "y3"] {
            c.declare_net(net).unwrap();
        }
        c.instantiate("drv", GateKind::Not, "w", &["a"]).unwrap();
        c.instantiate("u2", GateKind::Not, "y2", &["w"]).unwrap();
        c.instantiate("u1", GateKind::Nand, "y1", &["w", "w"]).unwrap();
        c.instantiate("u3", GateKind::Nor, "y3", &["y1", "w"]).unwrap();

        let report = fanout(&c);
        assert_eq!(report.keys().collect::<Vec<_>>(), vec!["drv", "u2", "u1", "u3"]);
        assert_eq!(report["drv"], vec!["u2", "u1", "u3"]);
        assert_eq!(report["u1"], vec!["u3"]);
        assert!(report["u2"].is_empty());
        assert!(report["u3"].is_empty());

        for gate in c.gates() {
            let net = c.net_by_id(gate.output);
            let expected: Vec<&str> = net
                .destinations
                .iter()
                .map(|&d| c.gate_by_id(d).name.as_str())
                .collect();
            assert_eq!(report[&gate.name], expected);
            let unique: std::collections::HashSet<_> = expected.iter().collect();
            assert_eq!(unique.len(), expected.len());
        }
    }
}
