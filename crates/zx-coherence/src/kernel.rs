//! Pairwise coherence kernel.
//!
//! `coherence(d1, d2) = structural_overlap(d1, d2) · exp(-edit_distance / decay)`
//! with the decay base defaulting to φ. The kernel is symmetric, bounded in
//! `[0, 1]`, and exactly 1 on the diagonal.

use zx_core::{ZxDiagram, PHI};

/// Number of histogram buckets used for the phase-distribution signal.
pub const PHASE_BINS: usize = 16;

/// Two phases closer than this (in radians) count as matching in the
/// edit-distance label comparison.
pub const PHASE_TOLERANCE: f64 = 0.1;

/// Coherence between two diagrams with the default φ decay base.
///
/// Callers must pass diagrams satisfying [`ZxDiagram::validate`]; the matrix
/// builder checks this once per ensemble.
pub fn coherence(d1: &ZxDiagram, d2: &ZxDiagram) -> f64 {
    coherence_with_decay(d1, d2, PHI)
}

/// Coherence with an explicit exponential decay base.
///
/// The φ default is a modelling choice, not a structural necessity, so the
/// base stays configurable.
pub fn coherence_with_decay(d1: &ZxDiagram, d2: &ZxDiagram, decay: f64) -> f64 {
    let overlap = structural_overlap(d1, d2);
    let distance = edit_distance(d1, d2);
    (overlap * (-distance / decay).exp()).clamp(0.0, 1.0)
}

/// Structural similarity in `[0, 1]`: the geometric mean of four signals
/// (node-count ratio, edge-count similarity, Z/X ratio similarity, and
/// phase-histogram cosine similarity).
pub fn structural_overlap(d1: &ZxDiagram, d2: &ZxDiagram) -> f64 {
    let (n1, n2) = (d1.node_count(), d2.node_count());
    let node_sim = if n1 == 0 && n2 == 0 {
        1.0
    } else if n1 == 0 || n2 == 0 {
        0.0
    } else {
        n1.min(n2) as f64 / n1.max(n2) as f64
    };

    let (e1, e2) = (d1.edge_count(), d2.edge_count());
    let edge_sim = 1.0 - e1.abs_diff(e2) as f64 / e1.max(e2).max(1) as f64;

    let type_sim = if n1 > 0 && n2 > 0 {
        let ratio1 = d1.z_count() as f64 / n1 as f64;
        let ratio2 = d2.z_count() as f64 / n2 as f64;
        1.0 - (ratio1 - ratio2).abs()
    } else {
        1.0
    };

    let phase_sim = phase_histogram_similarity(d1, d2);

    (node_sim * edge_sim * type_sim * phase_sim).powf(0.25)
}

/// Structural edit-distance proxy: node-count difference plus edge-count
/// difference plus, when node counts match, a per-node label mismatch
/// penalty (+1 per differing spider kind, +0.5 per phase difference above
/// [`PHASE_TOLERANCE`]).
///
/// True minimal-rewrite distance is NP-hard; this proxy only needs to be
/// symmetric, zero on identical diagrams, and monotone in structural change.
pub fn edit_distance(d1: &ZxDiagram, d2: &ZxDiagram) -> f64 {
    let node_diff = d1.node_count().abs_diff(d2.node_count()) as f64;
    let edge_diff = d1.edge_count().abs_diff(d2.edge_count()) as f64;

    let mut label_diff = 0.0;
    if d1.node_count() == d2.node_count() {
        for (node, label1) in d1.labels() {
            let Some(label2) = d2.label(*node) else {
                continue;
            };
            if label1.spider != label2.spider {
                label_diff += 1.0;
            }
            if (label1.phase.radians() - label2.phase.radians()).abs() > PHASE_TOLERANCE {
                label_diff += 0.5;
            }
        }
    }

    node_diff + edge_diff + label_diff
}

fn phase_histogram(diagram: &ZxDiagram) -> [f64; PHASE_BINS] {
    let mut histogram = [0.0; PHASE_BINS];
    let bin_width = 2.0 * std::f64::consts::PI / PHASE_BINS as f64;
    for label in diagram.labels().values() {
        let bin = ((label.phase.radians() / bin_width) as usize).min(PHASE_BINS - 1);
        histogram[bin] += 1.0;
    }
    histogram
}

fn phase_histogram_similarity(d1: &ZxDiagram, d2: &ZxDiagram) -> f64 {
    if d1.labels().is_empty() && d2.labels().is_empty() {
        return 1.0;
    }
    if d1.labels().is_empty() || d2.labels().is_empty() {
        return 0.0;
    }
    let hist1 = phase_histogram(d1);
    let hist2 = phase_histogram(d2);
    let norm1 = hist1.iter().map(|v| v * v).sum::<f64>().sqrt();
    let norm2 = hist2.iter().map(|v| v * v).sum::<f64>().sqrt();
    if norm1 == 0.0 || norm2 == 0.0 {
        return 0.0;
    }
    let dot: f64 = hist1.iter().zip(hist2.iter()).map(|(a, b)| a * b).sum();
    dot / (norm1 * norm2)
}
