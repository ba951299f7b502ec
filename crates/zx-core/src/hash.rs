use sha2::{Digest, Sha256};

use crate::diagram::{Spider, ZxDiagram};

/// Computes the canonical structural hash for the provided diagram.
///
/// The hash covers node labels in node-id order and the undirected edge set
/// in sorted `(min, max)` order, so structurally equal diagrams hash
/// identically regardless of edge insertion order. The evolution engine uses
/// this hash as the stable diagram identity when carrying probability mass
/// across ensemble regenerations.
pub fn canonical_hash(diagram: &ZxDiagram) -> String {
    let mut hasher = Sha256::new();
    hasher.update((diagram.node_count() as u64).to_le_bytes());
    for (node, label) in diagram.labels() {
        hasher.update(node.as_raw().to_le_bytes());
        hasher.update(match label.spider {
            Spider::Z => b"Z",
            Spider::X => b"X",
        });
        hasher.update(label.phase.numer().to_le_bytes());
        hasher.update(label.phase.denom().to_le_bytes());
    }
    let signatures = diagram.edge_signatures();
    hasher.update((signatures.len() as u64).to_le_bytes());
    for (a, b) in signatures {
        hasher.update(a.to_le_bytes());
        hasher.update(b.to_le_bytes());
    }
    format!("{:x}", hasher.finalize())
}
