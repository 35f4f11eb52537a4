//! End-to-end tests running the pipeline against CSV files on disk.

use pretty_assertions::assert_eq;
use std::fmt::Write as _;
use std::path::PathBuf;
use tempfile::TempDir;

use examlens_core::{
    AnalyticsError, CsvSource, ExamAnalyzer, NOT_AVAILABLE, QualityLabel, analyze,
};

fn write_csv(dir: &TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, content).unwrap();
    path
}

/// Ten students, three questions with distinct profiles:
/// Q1 tracks ability, Q2 everyone aces, Q3 almost nobody passes.
fn class_csv() -> String {
    let mut csv = String::from("question,student_id,marks,section\n");
    for i in 1..=10 {
        let ability = i as f64 / 2.0; // 0.5 ..= 5.0
        writeln!(csv, "Q1,S{i},{ability},A").unwrap();
        writeln!(csv, "Q2,S{i},5,A").unwrap();
        let q3 = if i == 10 { 2 } else { 0 };
        writeln!(csv, "Q3,S{i},{q3},A").unwrap();
    }
    csv
}

#[test]
fn analyze_realistic_class() {
    let dir = TempDir::new().unwrap();
    let path = write_csv(&dir, "class.csv", &class_csv());

    let (report, insights) = analyze(&CsvSource::open(&path)).unwrap();
    assert_eq!(report.len(), 3);

    // k = floor(0.27 * 10) = 2: bottom {S1, S2}, top {S9, S10}.
    let q1 = report.get("Q1").unwrap();
    assert_eq!(q1.max_marks, 5.0);
    assert!((q1.discrimination_index - (4.75 - 0.75) / 5.0).abs() < 1e-12);
    assert_eq!(q1.quality, QualityLabel::Excellent);

    let q2 = report.get("Q2").unwrap();
    assert_eq!(q2.pass_rate, 1.0);
    assert_eq!(q2.discrimination_index, 0.0);
    assert_eq!(q2.quality, QualityLabel::TooEasy);

    let q3 = report.get("Q3").unwrap();
    assert_eq!(q3.pass_rate, 0.1);
    // top avg (0 + 2) / 2 = 1, bottom avg 0, max 2
    assert_eq!(q3.discrimination_index, 0.5);
    assert_eq!(q3.quality, QualityLabel::Excellent);
    assert!(report.rows.iter().all(|r| r.ml_difficulty == NOT_AVAILABLE));

    // best avg is Q2 (5.0); Q3 avg 0.2 < 2.0
    assert_eq!(insights.weak_questions, vec!["Q3"]);
    assert_eq!(insights.top_students, vec!["S10", "S9", "S8", "S7", "S6"]);
    assert_eq!(insights.bottom_students, vec!["S5", "S4", "S3", "S2", "S1"]);

    let summary = &insights.exam_summary;
    assert_eq!(summary.excellent_questions, 2);
    assert_eq!(summary.too_easy_questions, 1);
    assert_eq!(summary.good_percentage, 66.67);
    assert!(insights.teacher_report.contains("Excellent question share: 66.67%"));
    assert!(insights.teacher_report.contains("  - Q3\n"));
}

#[test]
fn dropped_rows_do_not_reach_metrics() {
    let dir = TempDir::new().unwrap();
    let path = write_csv(
        &dir,
        "messy.csv",
        "question,student_id,marks\nQ1,S1,4\nQ1,S2,absent\nQ1,S3,\nQ1,S4,2\n",
    );

    let analysis = ExamAnalyzer::default()
        .analyze(&CsvSource::open(&path))
        .unwrap();
    assert_eq!(analysis.load_stats.total_rows, 4);
    assert_eq!(analysis.load_stats.dropped_rows, 2);
    assert_eq!(analysis.report.get("Q1").unwrap().avg_score, 3.0);
    assert_eq!(analysis.ranking.len(), 2);
}

#[test]
fn missing_marks_column_is_schema_error() {
    let dir = TempDir::new().unwrap();
    let path = write_csv(&dir, "bad.csv", "question,student_id\nQ1,S1\n");

    let err = analyze(&CsvSource::open(&path)).unwrap_err();
    assert!(matches!(err, AnalyticsError::Schema { .. }));
    assert!(err.to_string().contains("marks"));
}

#[test]
fn all_non_numeric_marks_is_empty_dataset() {
    let dir = TempDir::new().unwrap();
    let path = write_csv(
        &dir,
        "text.csv",
        "question,student_id,marks\nQ1,S1,A\nQ1,S2,B+\n",
    );

    let err = analyze(&CsvSource::open(&path)).unwrap_err();
    assert!(matches!(err, AnalyticsError::EmptyDataset { dropped: 2 }));
}

#[test]
fn semicolon_delimited_source() {
    let dir = TempDir::new().unwrap();
    let path = write_csv(
        &dir,
        "semi.csv",
        "question;student_id;marks\nQ1;S1;3\nQ1;S2;1\n",
    );

    let (report, _) = analyze(&CsvSource::open(&path).with_delimiter(';')).unwrap();
    assert_eq!(report.get("Q1").unwrap().avg_score, 2.0);
}
