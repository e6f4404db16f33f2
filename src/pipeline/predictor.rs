//! Prediction pipeline
//!
//! Wires the stores and the inference stages together: read the history
//! window from `general`, evaluate the tree over the current snapshot,
//! compute trends against history, rank drivers, render the explanation.
//! The pipeline reads records only; writes go through the logging helpers.

use std::sync::Arc;

use chrono::{Duration, Utc};
use serde::Serialize;

use crate::explain::{describe_trend, explain};
use crate::model::{AttackRecord, DailyFeatures, Namespace};
use crate::observability::{Logger, Severity};
use crate::records::{RecordEngine, StoredRecord};
use crate::trends::{compute_trends, Trend};
use crate::tree::{DecisionTree, FeatureObservation, TreeResult};

use super::errors::PredictResult;

/// Days of history consulted for trend analysis
pub const HISTORY_WINDOW_DAYS: i64 = 7;

/// Structured breakdown of one prediction
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DetailedExplanation {
    /// One-line summary with the band and main factors
    pub summary: String,
    /// Top driver descriptions, strongest first
    #[serde(rename = "keyFactors")]
    pub key_factors: Vec<String>,
    /// One line per evaluated feature's trajectory
    pub trends: Vec<String>,
    /// Recommendation per problematic feature
    pub recommendations: Vec<String>,
}

/// Everything a caller needs to present a prediction
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PredictionMeta {
    /// One-line explanation
    pub explanation: String,
    /// Structured breakdown
    #[serde(rename = "detailedExplanation")]
    pub detailed: DetailedExplanation,
    /// Every split visited during evaluation
    pub features: Vec<FeatureObservation>,
    /// Trend per unique evaluated feature
    pub trends: Vec<Trend>,
}

/// A scored prediction
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Prediction {
    /// Risk probability in [0, 1]
    pub score: f64,
    /// Explanation and supporting detail
    pub meta: PredictionMeta,
}

/// Risk predictor over a record engine and an immutable tree.
pub struct Predictor {
    records: Arc<RecordEngine>,
    tree: DecisionTree,
}

impl Predictor {
    /// Builds a predictor from an explicit tree
    pub fn new(records: Arc<RecordEngine>, tree: DecisionTree) -> Self {
        Self { records, tree }
    }

    /// Builds a predictor using the bundled pre-trained tree
    pub fn with_bundled_tree(records: Arc<RecordEngine>) -> TreeResult<Self> {
        Ok(Self::new(records, DecisionTree::bundled()?))
    }

    /// The tree in use
    pub fn tree(&self) -> &DecisionTree {
        &self.tree
    }

    /// Scores one daily snapshot against the tree and the stored history.
    pub async fn predict(&self, features: &DailyFeatures) -> PredictResult<Prediction> {
        let cutoff = Utc::now() - Duration::days(HISTORY_WINDOW_DAYS);
        let rows = self.records.read_since(Namespace::General, cutoff).await?;

        // history rows that no longer decode are skipped, not fatal
        let history: Vec<DailyFeatures> = rows
            .iter()
            .filter_map(|record| record.data_as::<DailyFeatures>().ok())
            .collect();

        let evaluation = self.tree.evaluate(features)?;
        let trends = compute_trends(features, &history, &evaluation.path);
        let explanation = explain(evaluation.score, &evaluation.path, &trends);

        Logger::log(
            Severity::Info,
            "prediction_scored",
            &[
                ("history_len", &history.len().to_string()),
                ("path_len", &evaluation.path.len().to_string()),
                ("score", &format!("{:.4}", evaluation.score)),
            ],
        );

        Ok(Prediction {
            score: evaluation.score,
            meta: PredictionMeta {
                explanation: explanation.summary.clone(),
                detailed: DetailedExplanation {
                    summary: explanation.summary,
                    key_factors: explanation.key_factors,
                    trends: trends.iter().map(describe_trend).collect(),
                    recommendations: explanation.recommendations,
                },
                features: evaluation.path,
                trends,
            },
        })
    }

    /// Upserts the daily snapshot keyed by its day label (e.g. an ISO
    /// date), preserving `createdAt` when the day is logged twice.
    pub async fn log_snapshot(
        &self,
        day: impl Into<crate::engine::RecordKey>,
        features: &DailyFeatures,
    ) -> PredictResult<StoredRecord> {
        Ok(self
            .records
            .upsert(day, features, Namespace::General)
            .await?)
    }

    /// Appends an attack to the log. Fails on a duplicate id.
    pub async fn log_attack(
        &self,
        id: impl Into<crate::engine::RecordKey>,
        attack: &AttackRecord,
    ) -> PredictResult<StoredRecord> {
        Ok(self
            .records
            .create(id, attack, Namespace::Migraines)
            .await?)
    }
}
