//! Circuit validation.

use tracing::warn;

use crate::error::{GatepathError, Result};

use super::Circuit;

/// Validate a circuit for analysis.
///
/// Checks:
/// - The circuit contains at least one gate
/// - No primary input net is driven by a gate
///
/// Undriven internal nets and gate outputs that nothing consumes are legal
/// but suspicious; they are reported as warnings.
pub fn validate_circuit(circuit: &Circuit) -> Result<()> {
    if circuit.gate_count() == 0 {
        return Err(GatepathError::InvalidTopology {
            message: "Circuit has no gates".to_string(),
        });
    }

    for net in circuit.primary_inputs() {
        if let Some(driver) = circuit.driver(net) {
            return Err(GatepathError::InvalidTopology {
                message: format!(
                    "Primary input '{}' is driven by gate '{}'",
                    net.name, driver.name
                ),
            });
        }
    }

    for (idx, net) in circuit.nets().iter().enumerate() {
        let id = super::NetId(idx);
        if net.source.is_none() && !circuit.is_primary_input(id) && !net.destinations.is_empty() {
            warn!(net = %net.name, "net is consumed but never driven");
        }
        if net.source.is_some() && net.destinations.is_empty() && !circuit.is_primary_output(id) {
            warn!(net = %net.name, "gate output is not consumed and not a primary output");
        }
    }

    Ok(())
}
