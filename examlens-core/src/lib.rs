//! # examlens Core
//!
//! Analytics pipeline for exam responses. Turns a table of
//! `(question, student_id, marks)` observations into per-question difficulty
//! and discrimination statistics, quality labels, a student ranking, learning
//! gaps and a plain-text report for the instructor.
//!
//! ```no_run
//! use examlens_core::{CsvSource, analyze};
//!
//! let (report, insights) = analyze(&CsvSource::open("student_responses.csv"))?;
//! for row in &report.rows {
//!     println!("{} {:.2} {}", row.question_id, row.discrimination_index, row.quality);
//! }
//! println!("{}", insights.teacher_report);
//! # Ok::<(), examlens_core::AnalyticsError>(())
//! ```

pub mod config;
pub mod dataset;
pub mod error;
pub mod gaps;
pub mod loader;
pub mod metrics;
pub mod pipeline;
pub mod predictor;
pub mod quality;
pub mod ranking;
pub mod report;
pub mod summary;

// Re-export commonly used types at the crate root.
pub use config::{
    AnalyticsConfig, AnalyticsOverrides, ConfigOverrides, ExamConfig, MlConfig, MlOverrides,
    config_exists, load_config,
};
pub use dataset::{Dataset, Response};
pub use error::{AnalyticsError, Result};
pub use gaps::{GapPolicy, detect_learning_gaps};
pub use loader::{CsvSource, LoadStats, ResponseSource, SourceInfo, load, load_with_stats};
pub use metrics::{QuestionMetrics, compute_question_metrics};
pub use pipeline::{Analysis, ExamAnalyzer, Insights, QuestionReport, QuestionRow, analyze};
pub use predictor::{DifficultyPredictor, NOT_AVAILABLE, UnavailablePredictor};
pub use quality::{QUALITY_RULES, QualityLabel, QualityRule, classify};
pub use ranking::{StudentRanking, StudentTotal, rank_students};
pub use report::render_report;
pub use summary::{ExamSummary, summarize};
