//! Text rendering of analysis results.
//!
//! The formats follow what designers expect from a quick netlist sanity
//! check: a fanout table, the critical path with its logic depth, and an
//! optional per-node depth listing.

use std::fmt;

use indexmap::IndexMap;

use crate::analysis::{Analyzer, CriticalPaths, DepthReport, FanoutReport, LongestPath, Strategy};
use crate::circuit::{Circuit, GateKind};
use crate::error::Result;

/// What to analyze and print.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AnalysisOptions {
    /// Longest-path algorithm
    pub strategy: Strategy,
    /// List every maximal path (always enumerated exhaustively)
    pub all_paths: bool,
    /// Print the fanout table
    pub fanout: bool,
    /// Print per-node logic depths
    pub depths: bool,
    /// Print circuit statistics
    pub stats: bool,
}

impl AnalysisOptions {
    /// Every section except the exhaustive path listing, whose cost grows
    /// with the number of paths rather than the size of the circuit.
    pub fn full() -> Self {
        Self {
            fanout: true,
            depths: true,
            stats: true,
            ..Self::default()
        }
    }
}

/// Summary counts for a circuit.
#[derive(Debug, Clone, PartialEq)]
pub struct CircuitStats {
    pub gates: usize,
    pub nets: usize,
    pub primary_inputs: usize,
    pub primary_outputs: usize,
    pub edges: usize,
    /// Gate count per kind, in [`GateKind::ALL`] order, omitting absent kinds
    pub by_kind: IndexMap<GateKind, usize>,
    /// Gates whose output is complemented (NOT, NAND, NOR, XNOR)
    pub inverting: usize,
    /// Gate with the largest fanout (first by name on ties)
    pub max_fanout: Option<(String, usize)>,
    /// Mean fanout per gate
    pub average_fanout: f64,
}

impl CircuitStats {
    /// Gather statistics from a circuit and its fanout.
    pub fn collect(circuit: &Circuit, fanout: &FanoutReport) -> Self {
        let by_kind = GateKind::ALL
            .into_iter()
            .map(|kind| (kind, circuit.gates().iter().filter(|g| g.kind == kind).count()))
            .filter(|&(_, count)| count > 0)
            .collect();

        let inverting = circuit.gates().iter().filter(|g| g.kind.is_inverting()).count();

        let max_fanout = fanout
            .iter()
            .map(|(name, dests)| (name, dests.len()))
            .max_by(|a, b| a.1.cmp(&b.1).then_with(|| b.0.cmp(a.0)))
            .map(|(name, count)| (name.clone(), count));

        let total: usize = fanout.values().map(Vec::len).sum();
        let average_fanout = if fanout.is_empty() {
            0.0
        } else {
            total as f64 / fanout.len() as f64
        };

        Self {
            gates: circuit.gate_count(),
            nets: circuit.net_count(),
            primary_inputs: circuit.primary_inputs().count(),
            primary_outputs: circuit.primary_outputs().count(),
            edges: circuit.graph().edge_count(),
            by_kind,
            inverting,
            max_fanout,
            average_fanout,
        }
    }
}

impl fmt::Display for CircuitStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Circuit statistics:")?;
        writeln!(f, "Gates: {}", self.gates)?;
        writeln!(f, "Nets: {}", self.nets)?;
        writeln!(f, "Primary inputs: {}", self.primary_inputs)?;
        writeln!(f, "Primary outputs: {}", self.primary_outputs)?;
        writeln!(f, "Gate-to-gate connections: {}", self.edges)?;
        let kinds: Vec<String> = self
            .by_kind
            .iter()
            .map(|(kind, count)| format!("{} {}", kind, count))
            .collect();
        writeln!(f, "Gate kinds: {}", kinds.join(", "))?;
        writeln!(f, "Inverting gates: {}", self.inverting)?;
        if let Some((name, count)) = &self.max_fanout {
            writeln!(f, "Max fanout: {} ({})", count, name)?;
        }
        write!(f, "Average fanout: {:.2}", self.average_fanout)
    }
}

/// Fanout table sorted by gate name.
pub fn format_fanout(report: &FanoutReport) -> String {
    let mut names: Vec<&String> = report.keys().collect();
    names.sort();
    let mut out = String::from("Fanout information:");
    for name in names {
        let dests = &report[name];
        if dests.is_empty() {
            out.push_str(&format!("\n{} - No fanouts", name));
        } else {
            out.push_str(&format!("\n{} - {}", name, dests.join(", ")));
        }
    }
    out
}

/// Critical path with its logic depth and the gates it crosses.
pub fn format_longest_path(longest: &LongestPath, gates: &[&str]) -> String {
    let mut out = String::from("Longest path information:");
    out.push_str(&format!("\nPath length (logic depth): {}", longest.logic_depth()));
    out.push_str(&format!("\nPath: {}", longest.path.join(" -> ")));
    if !gates.is_empty() {
        out.push_str(&format!("\nGates in path: {}", gates.join(" -> ")));
    }
    out
}

/// Every maximal path, one per line.
pub fn format_critical_paths(paths: &CriticalPaths) -> String {
    let mut out = format!(
        "Critical paths ({} of logic depth {}):",
        paths.paths.len(),
        paths.length.saturating_sub(1)
    );
    for path in &paths.paths {
        out.push_str(&format!("\n{}", path.join(" -> ")));
    }
    out
}

/// Node depths followed by primary output depths.
pub fn format_depths(report: &DepthReport) -> String {
    let mut out = String::from("Logic depths:");
    for (name, depth) in &report.nodes {
        out.push_str(&format!("\n{}: {}", name, depth));
    }
    if !report.outputs.is_empty() {
        out.push_str("\nPrimary output depths:");
        for (name, depth) in &report.outputs {
            out.push_str(&format!("\n{}: {}", name, depth));
        }
    }
    out
}

/// Run the analyses selected by `options` and render them.
pub fn render_report(circuit: &Circuit, options: &AnalysisOptions) -> Result<String> {
    let analyzer = Analyzer::new(circuit);
    let mut sections = Vec::new();

    if options.stats {
        sections.push(CircuitStats::collect(circuit, &analyzer.fanout()).to_string());
    }

    let longest = analyzer.longest_path(options.strategy)?;
    sections.push(format_longest_path(&longest, &analyzer.gates_on_path(&longest.path)));

    if options.all_paths {
        sections.push(format_critical_paths(&analyzer.all_longest_paths()?));
    }
    if options.fanout {
        sections.push(format_fanout(&analyzer.fanout()));
    }
    if options.depths {
        sections.push(format_depths(&analyzer.logic_depths()?));
    }

    Ok(sections.join("\n\n"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

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
    fn test_longest_path_text() {
        let c = nand_not();
        let text = render_report(&c, &AnalysisOptions::default()).unwrap();
        assert_eq!(
            text,
            "Longest path information:\n\
             Path length (logic depth): 2\n\
             Path: a -> n1 -> n2\n\
             Gates in path: n1 -> n2"
        );
    }

    #[test]
    fn test_fanout_text_is_sorted() {
        let mut report = FanoutReport::new();
        report.insert("z".to_string(), vec![]);
        report.insert("m".to_string(), vec!["z".to_string(), "q".to_string()]);
        assert_eq!(format_fanout(&report), "Fanout information:\nm - z, q\nz - No fanouts");
    }

    #[test]
    fn test_all_sections() {
        let c = nand_not();
        let options = AnalysisOptions {
            strategy: Strategy::Exhaustive,
            all_paths: true,
            fanout: true,
            depths: true,
            stats: true,
        };
        let text = render_report(&c, &options).unwrap();
        assert!(text.starts_with("Circuit statistics:"));
        assert!(text.contains("Critical paths (2 of logic depth 2):\na -> n1 -> n2\nb -> n1 -> n2"));
        assert!(text.contains("n1 - n2"));
        assert!(text.contains("Primary output depths:\nout: 2"));
    }

    #[test]
    fn test_stats() {
        let c = nand_not();
        let stats = CircuitStats::collect(&c, &crate::analysis::fanout(&c));
        assert_eq!(stats.gates, 2);
        assert_eq!(stats.nets, 4);
        assert_eq!(stats.edges, 1);
        assert_eq!(stats.by_kind.get(&GateKind::Nand), Some(&1));
        assert_eq!(stats.by_kind.get(&GateKind::Xor), None);
        assert_eq!(stats.inverting, 2);
        assert_eq!(stats.max_fanout, Some(("n1".to_string(), 1)));
        assert_relative_eq!(stats.average_fanout, 0.5);
        assert!(stats.to_string().contains("Gate kinds: NOT 1, NAND 1"));
    }

    /// Two gates per stage, each fed by both outputs of the previous stage,
    /// so the number of maximal paths doubles with every stage.
    fn ladder(stages: usize) -> Circuit {
        let mut c = Circuit::new();
        c.declare_net("x").unwrap();
        c.declare_net("y").unwrap();
        let (mut left, mut right) = ("x".to_string(), "y".to_string());
        for i in 0..stages {
            let (na, nb) = (format!("na{}", i), format!("nb{}", i));
            c.declare_net(na.as_str()).unwrap();
            c.declare_net(nb.as_str()).unwrap();
            c.instantiate(format!("a{}", i), GateKind::Nand, &na, &[&left, &right]).unwrap();
            c.instantiate(format!("b{}", i), GateKind::Nor, &nb, &[&left, &right]).unwrap();
            (left, right) = (na, nb);
        }
        c.designate_primary_inputs(&["x", "y"]).unwrap();
        c.designate_primary_outputs(&[left, right]).unwrap();
        c
    }

    #[test]
    fn test_full_options_skip_path_enumeration() {
        let options = AnalysisOptions::full();
        assert!(!options.all_paths);
        assert_eq!(options.strategy, Strategy::DynamicProgramming);

        let c = ladder(24);
        let text = render_report(&c, &options).unwrap();
        assert!(text.contains("Path length (logic depth): 24"));
        assert!(text.contains("Inverting gates: 48"));
        assert!(text.contains("Logic depths:"));
        assert!(!text.contains("Critical paths"));
    }

    #[test]
    fn test_stats_empty_circuit() {
        let c = Circuit::new();
        let stats = CircuitStats::collect(&c, &FanoutReport::new());
        assert_relative_eq!(stats.average_fanout, 0.0);
        assert!(stats.max_fanout.is_none());
    }
}
