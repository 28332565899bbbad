use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

/// One forecast step; the step index is the position in the sequence
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionPoint {
    pub yhat: f64,
}

/// What a model returns for one symbol. `confidence` is a percentage (0..=100).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelOutput {
    pub predictions: Vec<PredictionPoint>,
    pub confidence: f64,
}

impl ModelOutput {
    pub fn from_values(values: &[f64], confidence: f64) -> Self {
        Self {
            predictions: values.iter().map(|&yhat| PredictionPoint { yhat }).collect(),
            confidence,
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelKind {
    Prophet,
    Xgboost,
    Lstm,
    Ensemble,
}

impl ModelKind {
    /// Order in which the consensus vote polls models
    pub const ALL: [ModelKind; 4] = [
        ModelKind::Prophet,
        ModelKind::Xgboost,
        ModelKind::Lstm,
        ModelKind::Ensemble,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ModelKind::Prophet => "prophet",
            ModelKind::Xgboost => "xgboost",
            ModelKind::Lstm => "lstm",
            ModelKind::Ensemble => "ensemble",
        }
    }
}

impl fmt::Display for ModelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ModelKind {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "prophet" => Ok(ModelKind::Prophet),
            "xgboost" => Ok(ModelKind::Xgboost),
            "lstm" => Ok(ModelKind::Lstm),
            "ensemble" => Ok(ModelKind::Ensemble),
            _ => Err(ModelError::Unknown(s.to_string())),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    #[error("unknown model '{0}'. Valid: prophet, xgboost, lstm, ensemble")]
    Unknown(String),
    #[error("{model} model failed: {reason}")]
    Failed { model: ModelKind, reason: String },
}

/// Forecast capability. Rules only see this trait, so a real model can replace a stub
/// without touching them.
pub trait Predictor: Send + Sync {
    fn kind(&self) -> ModelKind;
    fn predict(&self, symbol: &str) -> Result<ModelOutput, ModelError>;
}

/// Fixed output regardless of symbol
#[derive(Debug, Clone)]
pub struct StubPredictor {
    kind: ModelKind,
    output: ModelOutput,
}

impl StubPredictor {
    pub fn new(kind: ModelKind, output: ModelOutput) -> Self {
        Self { kind, output }
    }

    /// Placeholder forecasts used until real models are wired in
    pub fn placeholder(kind: ModelKind) -> Self {
        let output = match kind {
            ModelKind::Prophet => ModelOutput::from_values(&[100.0, 99.0, 98.0], 72.5),
            ModelKind::Xgboost => ModelOutput::from_values(&[100.0, 101.0, 100.5], 70.2),
            ModelKind::Lstm => ModelOutput::from_values(&[100.0, 101.5, 102.0], 68.4),
            ModelKind::Ensemble => ModelOutput::from_values(&[100.0, 101.0, 103.0], 75.0),
        };
        Self::new(kind, output)
    }
}

impl Predictor for StubPredictor {
    fn kind(&self) -> ModelKind {
        self.kind
    }

    fn predict(&self, _symbol: &str) -> Result<ModelOutput, ModelError> {
        Ok(self.output.clone())
    }
}

/// One predictor per model kind
#[derive(Clone)]
pub struct ModelSet {
    prophet: Arc<dyn Predictor>,
    xgboost: Arc<dyn Predictor>,
    lstm: Arc<dyn Predictor>,
    ensemble: Arc<dyn Predictor>,
}

impl ModelSet {
    pub fn placeholders() -> Self {
        Self {
            prophet: Arc::new(StubPredictor::placeholder(ModelKind::Prophet)),
            xgboost: Arc::new(StubPredictor::placeholder(ModelKind::Xgboost)),
            lstm: Arc::new(StubPredictor::placeholder(ModelKind::Lstm)),
            ensemble: Arc::new(StubPredictor::placeholder(ModelKind::Ensemble)),
        }
    }

    /// Replaces the predictor registered for `predictor.kind()`
    pub fn with(mut self, predictor: Arc<dyn Predictor>) -> Self {
        match predictor.kind() {
            ModelKind::Prophet => self.prophet = predictor,
            ModelKind::Xgboost => self.xgboost = predictor,
            ModelKind::Lstm => self.lstm = predictor,
            ModelKind::Ensemble => self.ensemble = predictor,
        }
        self
    }

    pub fn get(&self, kind: ModelKind) -> &dyn Predictor {
        match kind {
            ModelKind::Prophet => self.prophet.as_ref(),
            ModelKind::Xgboost => self.xgboost.as_ref(),
            ModelKind::Lstm => self.lstm.as_ref(),
            ModelKind::Ensemble => self.ensemble.as_ref(),
        }
    }

    pub fn predict(&self, kind: ModelKind, symbol: &str) -> Result<ModelOutput, ModelError> {
        self.get(kind).predict(symbol)
    }
}
