//! The end-to-end analysis entry point.
//!
//! `load -> metrics -> classification -> ranking + gaps -> summary -> report`,
//! with the difficulty predictor consulted alongside the summary stage.
//! Nothing here prints; callers decide how to present the result.

use serde::{Deserialize, Serialize};

use crate::config::AnalyticsConfig;
use crate::dataset::Dataset;
use crate::error::Result;
use crate::gaps::detect_learning_gaps;
use crate::loader::{LoadStats, ResponseSource, SourceInfo, load_with_stats};
use crate::metrics::{QuestionMetrics, compute_question_metrics};
use crate::predictor::{DifficultyPredictor, UnavailablePredictor, predict_or_sentinel};
use crate::quality::QualityLabel;
use crate::ranking::{StudentRanking, rank_students};
use crate::report::render_report;
use crate::summary::summarize;

pub use crate::summary::ExamSummary;

/// One row of the per-question report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestionRow {
    pub question_id: String,
    pub avg_score: f64,
    pub pass_rate: f64,
    pub max_marks: f64,
    pub discrimination_index: f64,
    pub quality: QualityLabel,
    pub ml_difficulty: String,
}

/// Per-question results, in ascending question id order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestionReport {
    pub rows: Vec<QuestionRow>,
}

impl QuestionReport {
    pub fn get(&self, question_id: &str) -> Option<&QuestionRow> {
        self.rows.iter().find(|r| r.question_id == question_id)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Exam-level findings for the instructor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Insights {
    pub exam_summary: ExamSummary,
    pub weak_questions: Vec<String>,
    pub top_students: Vec<String>,
    pub bottom_students: Vec<String>,
    pub teacher_report: String,
}

/// Everything produced by one analysis run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Analysis {
    pub report: QuestionReport,
    pub insights: Insights,
    pub ranking: StudentRanking,
    pub load_stats: LoadStats,
    pub source: SourceInfo,
}

/// Runs the pipeline with a fixed configuration and predictor.
pub struct ExamAnalyzer {
    config: AnalyticsConfig,
    predictor: Box<dyn DifficultyPredictor>,
}

impl Default for ExamAnalyzer {
    fn default() -> Self {
        Self::new(AnalyticsConfig::default())
    }
}

impl ExamAnalyzer {
    pub fn new(config: AnalyticsConfig) -> Self {
        Self {
            config,
            predictor: Box::new(UnavailablePredictor),
        }
    }

    #[must_use]
    pub fn with_predictor(mut self, predictor: Box<dyn DifficultyPredictor>) -> Self {
        self.predictor = predictor;
        self
    }

    pub fn config(&self) -> &AnalyticsConfig {
        &self.config
    }

    /// Validate configuration, load the source and analyse it.
    pub fn analyze(&self, source: &dyn ResponseSource) -> Result<Analysis> {
        self.config.validate()?;
        let loaded = load_with_stats(source)?;
        let (report, insights, ranking) = self.analyze_dataset(&loaded.dataset);
        Ok(Analysis {
            report,
            insights,
            ranking,
            load_stats: loaded.stats,
            source: loaded.source,
        })
    }

    /// Analyse an already validated dataset.
    pub fn analyze_dataset(&self, dataset: &Dataset) -> (QuestionReport, Insights, StudentRanking) {
        let metrics = compute_question_metrics(dataset, &self.config);
        let ranking = rank_students(dataset);
        let weak_questions = detect_learning_gaps(&metrics, &self.config.gap_policy);

        let top_students = ranking.top(self.config.ranking_size);
        let bottom_students = ranking.bottom(self.config.ranking_size);

        let exam_summary = summarize(&metrics)
            .with_weak_questions(weak_questions.clone())
            .with_students(top_students.clone(), bottom_students.clone());
        let teacher_report = render_report(&exam_summary, &weak_questions);

        let question_ids: Vec<String> = metrics.iter().map(|m| m.question_id.clone()).collect();
        let difficulties = predict_or_sentinel(self.predictor.as_ref(), &question_ids);
        tracing::debug!(
            predictor = self.predictor.name(),
            available = self.predictor.is_available(),
            "Attached difficulty labels"
        );

        let report = QuestionReport {
            rows: metrics
                .into_iter()
                .zip(difficulties)
                .map(|(m, ml_difficulty)| question_row(m, ml_difficulty))
                .collect(),
        };

        tracing::info!(
            questions = report.len(),
            excellent = exam_summary.excellent_questions,
            weak = weak_questions.len(),
            "Exam analysis complete"
        );

        let insights = Insights {
            exam_summary,
            weak_questions,
            top_students,
            bottom_students,
            teacher_report,
        };
        (report, insights, ranking)
    }
}

fn question_row(metrics: QuestionMetrics, ml_difficulty: String) -> QuestionRow {
    QuestionRow {
        question_id: metrics.question_id,
        avg_score: metrics.avg_score,
        pass_rate: metrics.pass_rate,
        max_marks: metrics.max_marks,
        discrimination_index: metrics.discrimination_index,
        quality: metrics.quality,
        ml_difficulty,
    }
}

/// Analyse `source` with default settings and no difficulty model.
pub fn analyze(source: &dyn ResponseSource) -> Result<(QuestionReport, Insights)> {
    let analysis = ExamAnalyzer::default().analyze(source)?;
    Ok((analysis.report, analysis.insights))
}
