//! 16-component Clifford feature mapping of a diagram.
//!
//! Maps a diagram to a Cl(1,3) multivector for visualization and feature
//! extraction. Spiders contribute rotor terms (scalar plus bivectors), edge
//! phase deltas a gauge-connection vector part, triangles a trivector part,
//! and global Z/X imbalance the pseudoscalar. The exact basis arithmetic is
//! an implementation detail; consumers rely only on determinism and unit
//! normalization.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use zx_core::{NodeId, Spider, ZxDiagram};

/// Number of multivector components: grades 0 through 4 of Cl(1,3).
pub const CLIFFORD_DIM: usize = 16;

/// Maps a diagram to a unit-norm 16-component multivector.
///
/// Layout: `[0]` scalar, `[1..5]` vectors, `[5..11]` bivectors,
/// `[11..15]` trivectors, `[15]` pseudoscalar. The empty diagram maps to the
/// zero vector. Callers must pass a diagram that satisfies
/// [`ZxDiagram::validate`].
pub fn zx_to_clifford(diagram: &ZxDiagram) -> [f64; CLIFFORD_DIM] {
    let mut components = [0.0; CLIFFORD_DIM];
    if diagram.is_empty() {
        return components;
    }

    let adjacency = diagram.adjacency();
    let degree = |id: NodeId| adjacency.get(&id).map_or(0, Vec::len);
    let edge_count = diagram.edge_count().max(1) as f64;

    // Spiders as rotors: Z into the scalar/e01 plane, X into e12/e13.
    for (&node, label) in diagram.labels() {
        let phase = label.phase.radians();
        let weight = (1.0 + degree(node) as f64).sqrt();
        match label.spider {
            Spider::Z => {
                components[0] += weight * (phase / 2.0).cos();
                components[5] += weight * (phase / 2.0).sin();
            }
            Spider::X => {
                components[8] += weight * phase.cos();
                components[9] += weight * phase.sin();
            }
        }
    }

    // Edge phase deltas as a gauge connection on the vector part.
    for &(u, v) in diagram.edges() {
        let (Some(label_u), Some(label_v)) = (diagram.label(u), diagram.label(v)) else {
            continue;
        };
        let delta = label_v.phase.radians() - label_u.phase.radians();
        let weight = ((degree(u) + degree(v)) as f64 / 2.0).sqrt() / edge_count;
        components[1] += weight * delta.cos();
        components[2] += weight * delta.sin();
        components[3] += weight * (2.0 * delta).cos();
        components[4] += weight * (2.0 * delta).sin();

        if label_u.spider != label_v.spider {
            let sum = label_u.phase.radians() + label_v.phase.radians();
            let mixed_weight = 1.0 / edge_count.sqrt();
            components[6] += mixed_weight * (-delta).sin();
            components[7] += mixed_weight * sum.cos();
            components[10] += mixed_weight * sum.sin();
        }
    }

    // Triangles as trivector content, scaled by their phase alignment.
    let triangles = detect_triangles(diagram, &adjacency);
    if !triangles.is_empty() {
        let alignment = triangle_alignment(diagram, &triangles);
        let strength =
            alignment * (triangles.len() as f64).sqrt() / diagram.node_count().max(1) as f64;
        for &(a, b, c) in &triangles {
            let orientation = triangle_phases(diagram, a, b, c).iter().sum::<f64>() / 3.0;
            components[11] += strength * orientation.sin();
            components[12] += strength * orientation.cos();
            components[13] += strength * (2.0 * orientation).sin();
            components[14] += strength * (2.0 * orientation).cos();
        }
    }

    components[15] = 0.5 * chirality(diagram);

    let magnitude = components.iter().map(|c| c * c).sum::<f64>().sqrt();
    if magnitude > 0.0 {
        for component in components.iter_mut() {
            *component /= magnitude;
        }
    }
    components
}

fn detect_triangles(
    diagram: &ZxDiagram,
    adjacency: &BTreeMap<NodeId, Vec<NodeId>>,
) -> Vec<(NodeId, NodeId, NodeId)> {
    let nodes = diagram.nodes();
    let connected = |a: NodeId, b: NodeId| adjacency.get(&a).is_some_and(|n| n.contains(&b));
    let mut triangles = Vec::new();
    for i in 0..nodes.len() {
        for j in (i + 1)..nodes.len() {
            if !connected(nodes[i], nodes[j]) {
                continue;
            }
            for k in (j + 1)..nodes.len() {
                if connected(nodes[j], nodes[k]) && connected(nodes[k], nodes[i]) {
                    triangles.push((nodes[i], nodes[j], nodes[k]));
                }
            }
        }
    }
    triangles
}

fn triangle_phases(diagram: &ZxDiagram, a: NodeId, b: NodeId, c: NodeId) -> [f64; 3] {
    let phase = |id| {
        diagram
            .label(id)
            .map_or(0.0, |label| label.phase.radians())
    };
    [phase(a), phase(b), phase(c)]
}

/// Mean phase alignment across triangles: `exp(-var(phases))` per triangle,
/// so tightly aligned triads score near 1.
fn triangle_alignment(diagram: &ZxDiagram, triangles: &[(NodeId, NodeId, NodeId)]) -> f64 {
    let mut total = 0.0;
    for &(a, b, c) in triangles {
        let phases = triangle_phases(diagram, a, b, c);
        let mean = phases.iter().sum::<f64>() / 3.0;
        let variance = phases.iter().map(|p| (p - mean) * (p - mean)).sum::<f64>() / 3.0;
        total += (-variance).exp();
    }
    total / triangles.len() as f64
}

/// Global chirality from Z/X imbalance weighted by phase spread.
fn chirality(diagram: &ZxDiagram) -> f64 {
    let total = diagram.node_count();
    if total == 0 {
        return 0.0;
    }
    let imbalance = (diagram.z_count() as f64 - diagram.x_count() as f64) / total as f64;
    let phases: Vec<f64> = diagram
        .labels()
        .values()
        .map(|label| label.phase.radians())
        .collect();
    let phase_var = if phases.len() > 1 {
        let mean = phases.iter().sum::<f64>() / phases.len() as f64;
        phases.iter().map(|p| (p - mean) * (p - mean)).sum::<f64>() / phases.len() as f64
    } else {
        0.0
    };
    imbalance * phase_var.sqrt() * 0.1
}

/// Per-grade magnitudes of a multivector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradeDecomposition {
    /// Grade-0 component.
    pub scalar: f64,
    /// Grade-1 components `e0..e3`.
    pub vectors: [f64; 4],
    /// Grade-2 components `e01..e23`.
    pub bivectors: [f64; 6],
    /// Grade-3 components `e012..e123`.
    pub trivectors: [f64; 4],
    /// Grade-4 component `e0123`.
    pub pseudoscalar: f64,
    /// Euclidean norm of the vector part.
    pub vector_magnitude: f64,
    /// Euclidean norm of the bivector part.
    pub bivector_magnitude: f64,
    /// Euclidean norm of the trivector part.
    pub trivector_magnitude: f64,
    /// Euclidean norm of the whole multivector.
    pub total_magnitude: f64,
}

/// Splits a multivector into its grade components and magnitudes.
pub fn grade_decomposition(components: &[f64; CLIFFORD_DIM]) -> GradeDecomposition {
    let norm = |slice: &[f64]| slice.iter().map(|c| c * c).sum::<f64>().sqrt();
    let mut vectors = [0.0; 4];
    vectors.copy_from_slice(&components[1..5]);
    let mut bivectors = [0.0; 6];
    bivectors.copy_from_slice(&components[5..11]);
    let mut trivectors = [0.0; 4];
    trivectors.copy_from_slice(&components[11..15]);
    GradeDecomposition {
        scalar: components[0],
        vectors,
        bivectors,
        trivectors,
        pseudoscalar: components[15],
        vector_magnitude: norm(&components[1..5]),
        bivector_magnitude: norm(&components[5..11]),
        trivector_magnitude: norm(&components[11..15]),
        total_magnitude: norm(components),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use zx_core::{NodeLabel, Phase};

    fn triangle_diagram() -> ZxDiagram {
        let mut diagram = ZxDiagram::new();
        let a = diagram.add_node(NodeLabel::new(Spider::Z, Phase::zero()));
        let b = diagram.add_node(NodeLabel::new(Spider::Z, Phase::zero()));
        let c = diagram.add_node(NodeLabel::new(Spider::X, Phase::new(1, 4).unwrap()));
        diagram.add_edge(a, b).unwrap();
        diagram.add_edge(b, c).unwrap();
        diagram.add_edge(c, a).unwrap();
        diagram
    }

    #[test]
    fn empty_diagram_maps_to_zero() {
        assert_eq!(zx_to_clifford(&ZxDiagram::new()), [0.0; CLIFFORD_DIM]);
    }

    #[test]
    fn nonempty_diagram_maps_to_unit_norm() {
        let components = zx_to_clifford(&triangle_diagram());
        let norm = components.iter().map(|c| c * c).sum::<f64>().sqrt();
        assert!((norm - 1.0).abs() < 1e-12);
    }

    #[test]
    fn triangles_produce_trivector_content() {
        let decomposition = grade_decomposition(&zx_to_clifford(&triangle_diagram()));
        assert!(decomposition.trivector_magnitude > 0.0);
    }

    #[test]
    fn mapping_is_deterministic() {
        let diagram = triangle_diagram();
        assert_eq!(zx_to_clifford(&diagram), zx_to_clifford(&diagram));
    }
}
