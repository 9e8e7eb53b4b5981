//! Canonical basis-state ordering
//!
//! A basis state is a fixed-width binary string, most significant bit first,
//! ordered by its integer value. Every matrix row, matrix column, and
//! probability-vector index in this crate goes through these functions;
//! there is no second place where the ordering is defined.

use crate::error::{MitigationError, Result};

/// Number of basis states for a register of `n_qubits`
pub fn dimension(n_qubits: usize) -> usize {
    1 << n_qubits
}

/// Bitstring label for a basis-state index
pub fn state_label(index: usize, n_qubits: usize) -> String {
    format!("{:0width$b}", index, width = n_qubits)
}

/// All basis-state labels in canonical order
pub fn basis_states(n_qubits: usize) -> Vec<String> {
    (0..dimension(n_qubits))
        .map(|i| state_label(i, n_qubits))
        .collect()
}

/// Canonical index of a bitstring label
///
/// Fails if the label has the wrong width or contains characters other than
/// '0' and '1'.
pub fn state_index(label: &str, n_qubits: usize) -> Result<usize> {
    if label.len() != n_qubits {
        return Err(MitigationError::Precondition(format!(
            "state label '{}' has width {}, expected {}",
            label,
            label.len(),
            n_qubits
        )));
    }
    if !label.bytes().all(|b| b == b'0' || b == b'1') {
        return Err(MitigationError::Precondition(format!(
            "state label '{}' is not a binary string",
            label
        )));
    }
    usize::from_str_radix(label, 2).map_err(|_| {
        MitigationError::Precondition(format!("state label '{}' is not a binary string", label))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dimension() {
        assert_eq!(dimension(1), 2);
        assert_eq!(dimension(3), 8);
    }

    #[test]
    fn test_state_label_msb_first() {
        assert_eq!(state_label(0, 3), "000");
        assert_eq!(state_label(5, 3), "101");
        assert_eq!(state_label(7, 3), "111");
    }

    #[test]
    fn test_basis_states_canonical_order() {
        assert_eq!(basis_states(2), vec!["00", "01", "10", "11"]);
    }

    #[test]
    fn test_state_index_round_trip() {
        for n_qubits in 1..=4 {
            for index in 0..dimension(n_qubits) {
                let label = state_label(index, n_qubits);
                assert_eq!(state_index(&label, n_qubits).unwrap(), index);
            }
        }
    }

    #[test]
    fn test_state_index_rejects_wrong_width() {
        assert!(state_index("01", 3).is_err());
        assert!(state_index("0101", 3).is_err());
    }

    #[test]
    fn test_state_index_rejects_non_binary() {
        assert!(state_index("0x1", 3).is_err());
        assert!(state_index("+01", 3).is_err());
    }
}
