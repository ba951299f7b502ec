use proptest::prelude::*;
use zx_coherence::coherence_matrix;
use zx_core::{RngHandle, PHI};
use zx_ensemble::diverse_ensemble;
use zx_spec::{analyze_generation_content, eigendecompose, project_onto_eigenspace, spectral_gap};

proptest! {
    #[test]
    fn random_coherence_matrices_decompose_cleanly(seed in any::<u64>(), size in 1usize..15) {
        let mut rng = RngHandle::from_seed(seed);
        let ensemble = diverse_ensemble(size, 1, 8, &mut rng).unwrap();
        let matrix = coherence_matrix(&ensemble).unwrap();
        let decomp = eigendecompose(&matrix).unwrap();

        prop_assert_eq!(decomp.eigenvalues.len(), size);
        for pair in decomp.eigenvalues.windows(2) {
            prop_assert!(pair[0] >= pair[1] - 1e-9);
        }
        // Trace is preserved: the diagonal is all ones.
        let trace: f64 = decomp.eigenvalues.iter().sum();
        prop_assert!((trace - size as f64).abs() < 1e-6);
        // Eigenvectors stay unit length and satisfy the eigen equation.
        for (lambda, vector) in decomp.eigenvalues.iter().zip(decomp.eigenvectors.iter()) {
            let norm: f64 = vector.iter().map(|v| v * v).sum::<f64>().sqrt();
            prop_assert!((norm - 1.0).abs() < 1e-6);
            let applied = matrix.apply(vector);
            for (av, x) in applied.iter().zip(vector.iter()) {
                prop_assert!((av - lambda * x).abs() < 1e-6);
            }
        }
    }
}

#[test]
fn analysis_never_mutates_its_inputs() {
    let mut rng = RngHandle::from_seed(31);
    let ensemble = diverse_ensemble(8, 1, 8, &mut rng).unwrap();
    let matrix = coherence_matrix(&ensemble).unwrap();
    let before = matrix.clone();
    let decomp = eigendecompose(&matrix).unwrap();
    let rho = vec![1.0 / 8.0; 8];
    let _ = analyze_generation_content(&rho, &decomp);
    let _ = project_onto_eigenspace(&rho, &decomp.eigenvectors, &decomp.phi_indices);
    let _ = spectral_gap(&decomp.eigenvalues);
    assert_eq!(matrix, before);
}

#[test]
fn identical_diagrams_expose_a_rank_one_spectrum() {
    // All-ones matrix: one eigenvalue n, the rest zero.
    let seed = zx_core::ZxDiagram::seed();
    let ensemble = vec![seed.clone(), seed.clone(), seed];
    let matrix = coherence_matrix(&ensemble).unwrap();
    let decomp = eigendecompose(&matrix).unwrap();
    assert!((decomp.eigenvalues[0] - 3.0).abs() < 1e-9);
    assert!(decomp.eigenvalues[1].abs() < 1e-9);
    assert!(decomp.eigenvalues[2].abs() < 1e-9);
    assert!((decomp.spectral_gap - 3.0).abs() < 1e-9);
}

#[test]
fn generation_matching_finds_phi_in_a_crafted_spectrum() {
    use zx_coherence::CoherenceMatrix;
    // Diagonal spectrum containing phi and the shared -phi/2 real part.
    let matrix = CoherenceMatrix::from_rows(&[
        vec![PHI, 0.0, 0.0],
        vec![0.0, -PHI / 2.0, 0.0],
        vec![0.0, 0.0, 0.2],
    ])
    .unwrap();
    let decomp = eigendecompose(&matrix).unwrap();
    assert!(decomp.phi_indices.contains(&0));
    let structure = &decomp.generation_structure;
    assert_eq!(structure.generations[0].eigenvalue_index, 0);
    assert!(structure.generations[0].relative_error < 1e-9);
    assert!(structure.cubic_checks[0].satisfies_cubic);
    let content = analyze_generation_content(&[0.6, 0.3, 0.1], &decomp);
    assert_eq!(content.dominant_generation, Some(1));
}

#[test]
fn projection_onto_all_eigenvectors_recovers_rho() {
    let mut rng = RngHandle::from_seed(47);
    let ensemble = diverse_ensemble(6, 1, 6, &mut rng).unwrap();
    let matrix = coherence_matrix(&ensemble).unwrap();
    let decomp = eigendecompose(&matrix).unwrap();
    let rho = vec![1.0 / 6.0; 6];
    let all: Vec<usize> = (0..6).collect();
    let projected = project_onto_eigenspace(&rho, &decomp.eigenvectors, &all);
    for (p, r) in projected.iter().zip(rho.iter()) {
        assert!((p - r).abs() < 1e-6);
    }
}
