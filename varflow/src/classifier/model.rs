// Feature scaling and L2-regularised logistic regression

use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::common::error::VarflowError;

/// Centre each feature on its mean and divide by its (population) standard deviation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandardScaler {
	pub mean: Vec<f64>,
	pub scale: Vec<f64>,
}

impl StandardScaler {
	pub fn fit(rows: &[Vec<f64>]) -> Result<Self, VarflowError> {
		let n = rows.len();
		if n == 0 { return Err(VarflowError::Model{desc: "can not fit scaler to an empty data set".to_string()}) }
		let p = rows[0].len();
		let mut mean = vec!(0.0; p);
		for r in rows.iter() {
			for (m, x) in mean.iter_mut().zip(r.iter()) { *m += x }
		}
		mean.iter_mut().for_each(|m| *m /= n as f64);
		let mut var = vec!(0.0; p);
		for r in rows.iter() {
			for ((v, m), x) in var.iter_mut().zip(mean.iter()).zip(r.iter()) { *v += (x - m) * (x - m) }
		}
		// Constant features are left unscaled
		let scale = var.iter().map(|v| {
			let sd = (v / n as f64).sqrt();
			if sd > f64::EPSILON { sd } else { 1.0 }
		}).collect();
		Ok(StandardScaler{mean, scale})
	}
	
	pub fn transform_row(&self, row: &[f64]) -> Vec<f64> {
		row.iter().zip(self.mean.iter().zip(self.scale.iter())).map(|(x, (m, s))| (x - m) / s).collect()
	}
	
	pub fn transform(&self, rows: &[Vec<f64>]) -> Vec<Vec<f64>> {
		rows.iter().map(|r| self.transform_row(r)).collect()
	}
}

fn sigmoid(z: f64) -> f64 {
	if z >= 0.0 { 1.0 / (1.0 + (-z).exp()) }
	else { let e = z.exp(); e / (1.0 + e) }
}

// log(1 + exp(z)) without overflow
fn softplus(z: f64) -> f64 {
	z.max(0.0) + (-z.abs()).exp().ln_1p()
}

// Gaussian elimination with partial pivoting.  None if the matrix is singular.
fn solve(mut a: Vec<Vec<f64>>, mut b: Vec<f64>) -> Option<Vec<f64>> {
	let n = b.len();
	for col in 0..n {
		let piv = (col..n).max_by(|i, j| a[*i][col].abs().total_cmp(&a[*j][col].abs()))?;
		if a[piv][col].abs() < 1.0e-12 { return None }
		a.swap(col, piv);
		b.swap(col, piv);
		for row in col + 1..n {
			let f = a[row][col] / a[col][col];
			if f != 0.0 {
				for k in col..n { a[row][k] -= f * a[col][k] }
				b[row] -= f * b[col];
			}
		}
	}
	let mut x = vec!(0.0; n);
	for row in (0..n).rev() {
		let s: f64 = (row + 1..n).map(|k| a[row][k] * x[k]).sum();
		x[row] = (b[row] - s) / a[row][row];
	}
	Some(x)
}

/// Binary logistic regression with an L2 penalty on the coefficients (not the intercept).
/// `c` is the inverse of the regularisation strength.
#[derive(Debug, Clone)]
pub struct LogisticRegression {
	pub c: f64,
	pub max_iter: usize,
	pub tol: f64,
}

impl Default for LogisticRegression {
	fn default() -> Self { LogisticRegression{c: 1.0, max_iter: 100, tol: 1.0e-8} }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LogitFit {
	pub coefficients: Vec<f64>,
	pub intercept: f64,
	pub n_iter: usize,
	pub converged: bool,
}

impl LogisticRegression {
	// Penalised negative log likelihood for parameters w (w[0] is the intercept)
	fn objective(&self, x: &[Vec<f64>], y: &[f64], w: &[f64]) -> f64 {
		let nll: f64 = x.iter().zip(y.iter()).map(|(r, yi)| {
			let z = linear(w, r);
			softplus(z) - yi * z
		}).sum();
		nll + 0.5 / self.c * w[1..].iter().map(|b| b * b).sum::<f64>()
	}
	
	/// Fit by Newton-Raphson (IRLS) with step halving.  `y` holds 0/1 labels.
	pub fn fit(&self, x: &[Vec<f64>], y: &[f64]) -> Result<LogitFit, VarflowError> {
		if x.is_empty() || x.len() != y.len() { 
			return Err(VarflowError::Model{desc: format!("{} observations for {} labels", x.len(), y.len())})
		}
		if !(self.c > 0.0) { return Err(VarflowError::Model{desc: format!("C must be positive (got {})", self.c)}) }
		let n_pos = y.iter().filter(|v| **v > 0.5).count();
		if n_pos == 0 || n_pos == y.len() {
			return Err(VarflowError::Model{desc: "training data must contain both true and false positives".to_string()})
		}
		let p = x[0].len() + 1;
		let lambda = 1.0 / self.c;
		let mut w = vec!(0.0; p);
		let mut obj = self.objective(x, y, &w);
		let mut n_iter = 0;
		let mut converged = false;
		while n_iter < self.max_iter {
			let mut grad = vec!(0.0; p);
			let mut hess = vec!(vec!(0.0; p); p);
			for (r, yi) in x.iter().zip(y.iter()) {
				let mu = sigmoid(linear(&w, r));
				let d = mu - yi;
				let h = mu * (1.0 - mu);
				grad[0] += d;
				hess[0][0] += h;
				for j in 1..p {
					grad[j] += d * r[j - 1];
					hess[0][j] += h * r[j - 1];
					for k in j..p { hess[j][k] += h * r[j - 1] * r[k - 1] }
				}
			}
			for j in 1..p {
				grad[j] += lambda * w[j];
				hess[j][j] += lambda;
				for k in 0..j { hess[j][k] = hess[k][j] }
			}
			let gmax = grad.iter().fold(0.0f64, |m, g| m.max(g.abs()));
			trace!("Logistic regression iteration {}: objective {}, max gradient {}", n_iter, obj, gmax);
			if gmax <= self.tol * (x.len() as f64) {
				converged = true;
				break
			}
			let step = solve(hess, grad.clone()).ok_or_else(|| VarflowError::Model{desc: "singular Hessian".to_string()})?;
			n_iter += 1;
			let mut t = 1.0;
			loop {
				let w_new: Vec<f64> = w.iter().zip(step.iter()).map(|(a, s)| a - t * s).collect();
				let obj_new = self.objective(x, y, &w_new);
				if obj_new <= obj + 1.0e-12 * (1.0 + obj.abs()) || t < 1.0e-10 {
					w = w_new;
					obj = obj_new;
					break
				}
				t *= 0.5;
			}
		}
		if !converged { warn!("Logistic regression did not converge after {} iterations", n_iter) }
		debug!("Logistic regression fitted in {} iterations", n_iter);
		Ok(LogitFit{intercept: w[0], coefficients: w[1..].to_vec(), n_iter, converged})
	}
}

fn linear(w: &[f64], r: &[f64]) -> f64 {
	w[0] + w[1..].iter().zip(r.iter()).map(|(b, x)| b * x).sum::<f64>()
}

/// A trained classifier as stored on disk
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FittedModel {
	pub features: Vec<String>,
	pub scaler: StandardScaler,
	pub coefficients: Vec<f64>,
	pub intercept: f64,
	pub c: f64,
	pub n_iter: usize,
	pub score: f64,
}

impl FittedModel {
	pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, VarflowError> {
		let file = File::open(path.as_ref())?;
		let model: FittedModel = serde_json::from_reader(BufReader::new(file))?;
		if model.coefficients.len() != model.features.len() || model.scaler.mean.len() != model.features.len() {
			return Err(VarflowError::Model{desc: format!("inconsistent model file {}", path.as_ref().display())})
		}
		Ok(model)
	}
	
	pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), VarflowError> {
		let mut wrt = BufWriter::new(File::create(path)?);
		serde_json::to_writer_pretty(&mut wrt, self)?;
		writeln!(wrt)?;
		wrt.flush()?;
		Ok(())
	}
	
	fn check_len(&self, row: &[f64]) -> Result<(), VarflowError> {
		if row.len() == self.features.len() { Ok(()) }
		else { Err(VarflowError::Model{desc: format!("expected {} features, got {}", self.features.len(), row.len())}) }
	}
	
	// Probability of a true positive for already scaled features
	fn scaled_proba(&self, row: &[f64]) -> f64 {
		sigmoid(self.intercept + self.coefficients.iter().zip(row.iter()).map(|(b, x)| b * x).sum::<f64>())
	}
	
	/// Probability that a site with the given (unscaled) annotations is a true positive
	pub fn predict_proba(&self, row: &[f64]) -> Result<f64, VarflowError> {
		self.check_len(row)?;
		Ok(self.scaled_proba(&self.scaler.transform_row(row)))
	}
	
	pub fn predict(&self, row: &[f64]) -> Result<bool, VarflowError> {
		self.predict_proba(row).map(|p| p > 0.5)
	}
	
	/// Fraction of correctly classified rows (scaled features, 0/1 labels)
	pub fn accuracy(&self, x: &[Vec<f64>], y: &[f64]) -> f64 {
		if x.is_empty() { return 0.0 }
		let correct = x.iter().zip(y.iter()).filter(|(r, yi)| (self.scaled_proba(r) > 0.5) == (**yi > 0.5)).count();
		correct as f64 / x.len() as f64
	}
}
