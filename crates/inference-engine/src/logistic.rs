//! Class-Weighted Binary Logistic Regression
//!
//! Minimises `½‖w‖² + C · Σ sᵢ · logloss(yᵢ, σ(w·xᵢ + b))` where `sᵢ` is the
//! weight of the sample's class. The intercept is not penalised. The solver
//! is a damped Newton method.

use crate::FitError;
use ndarray::{concatenate, Array1, Array2, ArrayView2, Axis};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Per-class sample weights
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClassWeights {
    /// Weight of label 0
    pub negative: f64,
    /// Weight of label 1
    pub positive: f64,
}

impl Default for ClassWeights {
    fn default() -> Self {
        Self {
            negative: 1.0,
            positive: 1.0,
        }
    }
}

impl ClassWeights {
    /// Weight each label by the other label's count over the training size,
    /// so the minority label is upweighted
    pub fn inverse_frequency(n_y0: usize, n_y1: usize, train_size: usize) -> Self {
        let n = train_size.max(1) as f64;
        Self {
            negative: n_y1 as f64 / n,
            positive: n_y0 as f64 / n,
        }
    }

    /// Weight of a label
    pub fn weight(&self, label: u8) -> f64 {
        if label == 1 {
            self.positive
        } else {
            self.negative
        }
    }
}

/// Solver settings
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SolverConfig {
    /// Inverse regularisation strength
    pub c: f64,
    /// Maximum Newton iterations
    pub max_iter: usize,
    /// Stop once every parameter moves less than this
    pub tol: f64,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            c: 1.0,
            max_iter: 100,
            tol: 1e-4,
        }
    }
}

/// Outcome of a solver run
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolverSummary {
    pub iterations: usize,
    pub converged: bool,
    pub loss: f64,
}

/// Logistic sigmoid
pub fn sigmoid(z: f64) -> f64 {
    if z >= 0.0 {
        1.0 / (1.0 + (-z).exp())
    } else {
        let e = z.exp();
        e / (1.0 + e)
    }
}

/// `ln(1 + eˣ)` without overflow
fn softplus(x: f64) -> f64 {
    x.max(0.0) + (-x.abs()).exp().ln_1p()
}

/// Fitted coefficients and intercept
#[derive(Debug, Clone, PartialEq)]
pub struct LogisticRegression {
    coefficients: Array1<f64>,
    intercept: f64,
}

impl LogisticRegression {
    /// Build from known parameters
    pub fn from_parts(coefficients: Array1<f64>, intercept: f64) -> Self {
        Self { coefficients, intercept }
    }

    /// Coefficient per feature
    pub fn coefficients(&self) -> &Array1<f64> {
        &self.coefficients
    }

    /// Intercept
    pub fn intercept(&self) -> f64 {
        self.intercept
    }

    /// Fit on `x` and 0/1 labels `y`
    pub fn fit(
        x: ArrayView2<f64>,
        y: &[u8],
        weights: ClassWeights,
        config: &SolverConfig,
    ) -> Result<(Self, SolverSummary), FitError> {
        if x.nrows() != y.len() {
            return Err(FitError::ShapeMismatch {
                features: x.nrows(),
                target: y.len(),
            });
        }

        let n_features = x.ncols();
        let ones = Array2::<f64>::ones((x.nrows(), 1));
        let design = concatenate(Axis(1), &[x.view(), ones.view()])
            .map_err(|e| FitError::Solver(e.to_string()))?;
        let labels: Array1<f64> = y.iter().map(|&v| f64::from(v)).collect();
        let sample_weights: Array1<f64> = y.iter().map(|&v| weights.weight(v)).collect();

        // Identity on the coefficients, zero on the intercept
        let mut penalty = Array1::ones(n_features + 1);
        penalty[n_features] = 0.0;

        let objective = |theta: &Array1<f64>| -> f64 {
            let z = design.dot(theta);
            let data: f64 = z
                .iter()
                .zip(labels.iter())
                .zip(sample_weights.iter())
                .map(|((&z, &y), &s)| s * if y > 0.5 { softplus(-z) } else { softplus(z) })
                .sum();
            0.5 * (theta * theta * &penalty).sum() + config.c * data
        };

        let mut theta = Array1::<f64>::zeros(n_features + 1);
        let mut loss = objective(&theta);
        let mut summary = SolverSummary {
            iterations: 0,
            converged: false,
            loss,
        };

        for iteration in 1..=config.max_iter {
            let p = design.dot(&theta).mapv(sigmoid);
            let residual = &sample_weights * &(&p - &labels) * config.c;
            let gradient = design.t().dot(&residual) + &theta * &penalty;

            let curvature = &sample_weights * &p.mapv(|v| v * (1.0 - v)) * config.c;
            let weighted = &design * &curvature.view().insert_axis(Axis(1));
            let mut hessian = design.t().dot(&weighted);
            for i in 0..n_features {
                hessian[[i, i]] += 1.0;
            }

            let step = solve_spd(&hessian, &gradient)
                .ok_or_else(|| FitError::Solver(format!("singular Hessian at iteration {}", iteration)))?;

            // Backtrack until the objective does not increase
            let mut scale = 1.0;
            let mut candidate = &theta - &(&step * scale);
            let mut candidate_loss = objective(&candidate);
            while candidate_loss > loss && scale > 1e-8 {
                scale *= 0.5;
                candidate = &theta - &(&step * scale);
                candidate_loss = objective(&candidate);
            }

            let max_move = step.iter().fold(0.0f64, |m, v| m.max(v.abs())) * scale;
            theta = candidate;
            loss = candidate_loss;
            summary = SolverSummary {
                iterations: iteration,
                converged: max_move < config.tol,
                loss,
            };
            debug!("Newton iteration {}: loss={:.6}, max step={:.2e}", iteration, loss, max_move);

            if summary.converged {
                break;
            }
        }

        if !summary.converged {
            warn!(
                "Logistic regression did not converge in {} iterations (loss={:.6})",
                config.max_iter, loss
            );
        }

        let intercept = theta[n_features];
        let coefficients = theta.slice(ndarray::s![..n_features]).to_owned();
        Ok((Self { coefficients, intercept }, summary))
    }

    /// Signed distance to the decision boundary, one per row
    pub fn decision_function(&self, x: &Array2<f64>) -> Array1<f64> {
        x.dot(&self.coefficients) + self.intercept
    }

    /// Probability of label 1, one per row
    pub fn predict_proba(&self, x: &Array2<f64>) -> Vec<f64> {
        self.decision_function(x).iter().map(|&z| sigmoid(z)).collect()
    }

    /// Label per row: 1 when the probability of label 1 exceeds 0.5
    pub fn predict(&self, x: &Array2<f64>) -> Vec<u8> {
        self.decision_function(x).iter().map(|&z| u8::from(z > 0.0)).collect()
    }
}

/// Solve `a · x = b` for symmetric positive definite `a` via Cholesky
fn solve_spd(a: &Array2<f64>, b: &Array1<f64>) -> Option<Array1<f64>> {
    let n = a.nrows();
    let mut l = Array2::<f64>::zeros((n, n));

    for i in 0..n {
        for j in 0..=i {
            let mut sum = a[[i, j]];
            for k in 0..j {
                sum -= l[[i, k]] * l[[j, k]];
            }
            if i == j {
                if sum <= 0.0 || !sum.is_finite() {
                    return None;
                }
                l[[i, i]] = sum.sqrt();
            } else {
                l[[i, j]] = sum / l[[j, j]];
            }
        }
    }

    // Forward substitution: L y = b
    let mut y = Array1::<f64>::zeros(n);
    for i in 0..n {
        let mut sum = b[i];
        for k in 0..i {
            sum -= l[[i, k]] * y[k];
        }
        y[i] = sum / l[[i, i]];
    }

    // Back substitution: Lᵀ x = y
    let mut x = Array1::<f64>::zeros(n);
    for i in (0..n).rev() {
        let mut sum = y[i];
        for k in (i + 1)..n {
            sum -= l[[k, i]] * x[k];
        }
        x[i] = sum / l[[i, i]];
    }

    Some(x)
}
