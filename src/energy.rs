// Laplacian energy: sum of squared eigenvalues
//
//   E(M) = Σ λᵢ²
//
// Only the sum is consumed, so eigenvalue order carries no meaning. Like a
// LAPACK `eigh` call, both backends read only the lower triangle (diagonal
// included) of the matrix and treat it as symmetric.
//
// Backends:
// - DenseEigenSolver: full symmetric eigen-decomposition (nalgebra), O(m³)
// - TraceEnergy: Σλ² = trace(S²) = ‖S‖²_F for the symmetric view S, O(m²)

use nalgebra::{DMatrix, SymmetricEigen};
use serde::{Deserialize, Serialize};

use crate::errors::{CentralityError, CentralityResult, NodeTarget};

/// Reduces a real square matrix to its spectral energy.
///
/// Errors are reported against `NodeTarget::FullGraph`; callers re-label them
/// with `CentralityError::for_target`.
pub trait SpectralEnergy: Send + Sync {
    fn name(&self) -> &'static str;

    fn energy(&self, matrix: &DMatrix<f64>) -> CentralityResult<f64>;
}

/// Which backend computes energies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EnergyBackend {
    #[default]
    Dense,
    Trace,
}

impl EnergyBackend {
    pub fn solver(self, max_iterations: Option<usize>) -> Box<dyn SpectralEnergy> {
        match self {
            EnergyBackend::Dense => Box::new(DenseEigenSolver { max_iterations }),
            EnergyBackend::Trace => Box::new(TraceEnergy),
        }
    }
}

/// Full dense symmetric eigen-decomposition.
#[derive(Debug, Clone, Copy, Default)]
pub struct DenseEigenSolver {
    /// QR sweep cap; `None` scales with the matrix size, `Some(0)` is unbounded
    pub max_iterations: Option<usize>,
}

const MIN_ITERATIONS: usize = 10_000;
const ITERATIONS_PER_ROW: usize = 30;

impl DenseEigenSolver {
    fn iteration_cap(&self, size: usize) -> usize {
        self.max_iterations
            .unwrap_or_else(|| MIN_ITERATIONS.max(ITERATIONS_PER_ROW * size))
    }
}

impl SpectralEnergy for DenseEigenSolver {
    fn name(&self) -> &'static str {
        "dense-eigen"
    }

    fn energy(&self, matrix: &DMatrix<f64>) -> CentralityResult<f64> {
        check_square_and_finite(matrix)?;
        if matrix.nrows() == 0 {
            return Ok(0.0);
        }

        let cap = self.iteration_cap(matrix.nrows());
        let eigen = SymmetricEigen::try_new(matrix.clone(), f64::EPSILON, cap).ok_or_else(|| {
            CentralityError::numeric(
                NodeTarget::FullGraph,
                format!("eigen-decomposition did not converge within {} iterations", cap),
            )
        })?;

        let energy: f64 = eigen.eigenvalues.iter().map(|lambda| lambda * lambda).sum();
        check_finite_energy(energy)
    }
}

/// Closed-form energy from the squared entries of the symmetric view.
#[derive(Debug, Clone, Copy, Default)]
pub struct TraceEnergy;

impl SpectralEnergy for TraceEnergy {
    fn name(&self) -> &'static str {
        "trace"
    }

    fn energy(&self, matrix: &DMatrix<f64>) -> CentralityResult<f64> {
        check_square_and_finite(matrix)?;

        let m = matrix.nrows();
        let mut diagonal = 0.0;
        let mut lower = 0.0;
        for c in 0..m {
            diagonal += matrix[(c, c)] * matrix[(c, c)];
            for r in (c + 1)..m {
                lower += matrix[(r, c)] * matrix[(r, c)];
            }
        }
        check_finite_energy(diagonal + 2.0 * lower)
    }
}

/// Overflowing sums must not reach the aggregator as inf or NaN.
fn check_finite_energy(energy: f64) -> CentralityResult<f64> {
    if !energy.is_finite() {
        return Err(CentralityError::numeric(
            NodeTarget::FullGraph,
            "energy is not finite",
        ));
    }
    Ok(energy)
}

fn check_square_and_finite(matrix: &DMatrix<f64>) -> CentralityResult<()> {
    if !matrix.is_square() {
        return Err(CentralityError::numeric(
            NodeTarget::FullGraph,
            format!("matrix is {}x{}, not square", matrix.nrows(), matrix.ncols()),
        ));
    }
    if matrix.iter().any(|v| !v.is_finite()) {
        return Err(CentralityError::numeric(
            NodeTarget::FullGraph,
            "matrix has a non-finite entry",
        ));
    }
    Ok(())
}
