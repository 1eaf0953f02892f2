// Supervised filtering of variant calls.
//
// A logistic regression model is trained on the annotations of calls known to be
// true positives (e.g. present in a gold standard call set) and false positives.

use std::path::{Path, PathBuf};

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use crate::common::error::VarflowError;

pub mod model;
pub mod table;

pub use model::{FittedModel, LogisticRegression, StandardScaler};
pub use table::AnnotationTable;

/// Options for `Classifier::train`
#[derive(Debug, Clone)]
pub struct TrainConfig {
	outprefix: String,
	test_size: f64,
	seed: u64,
	c: f64,
	max_iter: usize,
}

impl TrainConfig {
	pub fn new(outprefix: &str) -> Self {
		TrainConfig{outprefix: outprefix.to_owned(), test_size: 0.25, seed: 0, c: 1.0, max_iter: 100}
	}
	// Fraction of the data held back to assess the model
	pub fn test_size(mut self, x: f64) -> Self { self.test_size = x; self }
	pub fn seed(mut self, seed: u64) -> Self { self.seed = seed; self }
	pub fn c(mut self, c: f64) -> Self { self.c = c; self }
	pub fn max_iter(mut self, n: usize) -> Self { self.max_iter = n; self }
	
	/// Validate and return the path of the model file
	pub fn model_path(&self) -> Result<PathBuf, VarflowError> {
		if self.outprefix.is_empty() { return Err(VarflowError::missing("outprefix")) }
		if !(self.test_size > 0.0 && self.test_size < 1.0) {
			return Err(VarflowError::invalid("test_size", self.test_size, &["a fraction between 0 and 1"]))
		}
		if !(self.c > 0.0) { return Err(VarflowError::invalid("C", self.c, &["a positive number"])) }
		if self.max_iter == 0 { return Err(VarflowError::invalid("max_iter", 0, &["a positive number of iterations"])) }
		Ok(PathBuf::from(format!("{}.sav", self.outprefix)))
	}
}

// Shuffle 0..n and split into (train, test) index sets
fn train_test_split(n: usize, test_size: f64, seed: u64) -> Result<(Vec<usize>, Vec<usize>), VarflowError> {
	let n_test = (test_size * n as f64).ceil() as usize;
	if n_test == 0 || n_test >= n {
		return Err(VarflowError::Model{desc: format!("can not split {} observations with test_size {}", n, test_size)})
	}
	let mut ix: Vec<usize> = (0..n).collect();
	let mut rng = StdRng::seed_from_u64(seed);
	ix.shuffle(&mut rng);
	let train = ix.split_off(n_test);
	Ok((train, ix))
}

fn select(ix: &[usize], x: &[Vec<f64>], y: &[f64]) -> (Vec<Vec<f64>>, Vec<f64>) {
	ix.iter().map(|i| (x[*i].clone(), y[*i])).unzip()
}

#[derive(Debug, Default, Clone)]
pub struct Classifier {
	pub fitted_model: Option<PathBuf>,
	pub score: Option<f64>,
}

impl Classifier {
	pub fn new() -> Self { Classifier::default() }
	
	/// Classifier for a previously trained model
	pub fn from_model<P: AsRef<Path>>(path: P) -> Result<Self, VarflowError> {
		let model = FittedModel::load(path.as_ref())?;
		Ok(Classifier{fitted_model: Some(path.as_ref().to_owned()), score: Some(model.score)})
	}
	
	pub fn model(&self) -> Result<FittedModel, VarflowError> {
		match &self.fitted_model {
			Some(p) => FittedModel::load(p),
			None => Err(VarflowError::missing("fitted_model")),
		}
	}
	
	/// Train on true positive (`tp`) and false positive (`fp`) annotation tables.
	/// The model is written to `<outprefix>.sav` and its path returned.
	pub fn train<P: AsRef<Path>, Q: AsRef<Path>>(&mut self, tp: P, fp: Q, cfg: &TrainConfig) -> Result<PathBuf, VarflowError> {
		let outfile = cfg.model_path()?;
		let tp_table = AnnotationTable::from_path(tp.as_ref())?;
		let fp_table = AnnotationTable::from_path(fp.as_ref())?;
		let fp_rows = fp_table.rows_ordered_as(tp_table.features()).ok_or_else(|| VarflowError::Table{
			path: format!("{}", fp.as_ref().display()), 
			desc: format!("annotation columns do not match those of {}", tp.as_ref().display())})?;
		let x: Vec<Vec<f64>> = tp_table.rows().iter().cloned().chain(fp_rows.into_iter()).collect();
		let y: Vec<f64> = std::iter::repeat(1.0).take(tp_table.rows().len())
			.chain(std::iter::repeat(0.0).take(fp_table.rows().len())).collect();
		info!("Training on {} true positive and {} false positive sites with {} features", 
			tp_table.rows().len(), fp_table.rows().len(), tp_table.features().len());
		
		let scaler = StandardScaler::fit(&x)?;
		let x = scaler.transform(&x);
		let (train_ix, test_ix) = train_test_split(x.len(), cfg.test_size, cfg.seed)?;
		let (x_train, y_train) = select(&train_ix, &x, &y);
		let (x_test, y_test) = select(&test_ix, &x, &y);
		
		let lr = LogisticRegression{c: cfg.c, max_iter: cfg.max_iter, ..Default::default()};
		let fit = lr.fit(&x_train, &y_train)?;
		let mut model = FittedModel{features: tp_table.features().to_vec(), scaler, coefficients: fit.coefficients,
			intercept: fit.intercept, c: cfg.c, n_iter: fit.n_iter, score: 0.0};
		model.score = model.accuracy(&x_test, &y_test);
		info!("Score for the logistic regression fitted model is: {}", model.score);
		
		model.save(&outfile)?;
		self.fitted_model = Some(outfile.clone());
		self.score = Some(model.score);
		Ok(outfile)
	}
}
