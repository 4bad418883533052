//! Integration tests for the analysis engine.
//!
//! These tests drive the public [`Analyzer`] API against the CSV fixtures and
//! read the generated workbooks back with calamine.

use calamine::{Data, Range, Reader, Xlsx, open_workbook};
use lex_explore::{
    AnalysisConfig, AnalysisError, AnalysisStage, Analyzer, CancellationToken, ChartKind,
    ProgressUpdate,
};
use pretty_assertions::assert_eq;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

// ============================================================================
// Helper Functions
// ============================================================================

fn fixtures_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures")
}

fn small_images() -> AnalysisConfig {
    AnalysisConfig::builder()
        .image_size(480, 360)
        .build()
        .expect("valid config")
}

fn loaded(fixture: &str) -> Analyzer {
    let analyzer = Analyzer::builder()
        .config(small_images())
        .build()
        .expect("Failed to build analyzer");
    assert!(analyzer.load(fixtures_path().join(fixture)), "load {fixture}");
    analyzer
}

fn file_names(files: &[PathBuf]) -> Vec<String> {
    let mut names: Vec<String> = files
        .iter()
        .map(|f| f.file_name().unwrap().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

fn png_files(dir: &Path) -> Vec<PathBuf> {
    std::fs::read_dir(dir)
        .unwrap()
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.extension().is_some_and(|e| e == "png"))
        .collect()
}

fn read_sheet(path: &Path, sheet: &str) -> Range<Data> {
    let mut workbook: Xlsx<_> = open_workbook(path).expect("Failed to open workbook");
    workbook
        .worksheet_range(sheet)
        .expect("Failed to read worksheet")
}

fn as_f64(cell: Option<&Data>) -> f64 {
    match cell {
        Some(Data::Float(v)) => *v,
        Some(Data::Int(v)) => *v as f64,
        other => panic!("expected a number, got {other:?}"),
    }
}

// ============================================================================
// Loading & Classification
// ============================================================================

#[test]
fn test_classification_of_skill_scale() {
    let analyzer = loaded("skills.csv");

    assert_eq!(analyzer.shape(), Some((12, 4)));
    assert_eq!(analyzer.numeric_columns(), vec!["age", "income"]);
    assert_eq!(analyzer.categorical_columns(), vec!["score", "department"]);
}

#[test]
fn test_semicolon_file_is_sniffed() {
    let analyzer = loaded("workload.csv");
    assert_eq!(analyzer.numeric_columns(), vec!["hours", "age", "income"]);
    assert_eq!(analyzer.categorical_columns(), vec!["team"]);
}

#[test]
fn test_load_generated_workbook() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("levels.xlsx");

    let mut workbook = rust_xlsxwriter::Workbook::new();
    let sheet = workbook.add_worksheet();
    sheet.write_string(0, 0, "level").unwrap();
    sheet.write_string(0, 1, "salary").unwrap();
    for (row, (level, salary)) in [(1, 30.5), (2, 41.0), (3, 52.25), (2, 44.0)]
        .into_iter()
        .enumerate()
    {
        let row = row as u32 + 1;
        sheet.write_number(row, 0, level).unwrap();
        sheet.write_number(row, 1, salary).unwrap();
    }
    workbook.save(&path).unwrap();

    let analyzer = Analyzer::new();
    assert!(analyzer.load(&path));
    assert_eq!(analyzer.categorical_columns(), vec!["level"]);
    assert_eq!(analyzer.numeric_columns(), vec!["salary"]);
}

#[test]
fn test_gapped_integer_scale_stays_numeric() {
    let dir = tempfile::tempdir().unwrap();
    let csv = dir.path().join("levels.csv");
    std::fs::write(&csv, "lvl,score\n1,10.5\n2,12.0\n4,9.25\n2,11.0\n1,8.0\n").unwrap();

    let analyzer = Analyzer::new();
    assert!(analyzer.load(&csv));
    assert_eq!(analyzer.numeric_columns(), vec!["lvl", "score"]);
    assert!(analyzer.categorical_columns().is_empty());
}

#[test]
fn test_unsupported_extension_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("data.json");
    std::fs::write(&path, "{}").unwrap();

    let analyzer = Analyzer::new();
    let err = analyzer.try_load(&path).unwrap_err();
    assert_eq!(err.error_code(), "UNSUPPORTED_FORMAT");
    assert!(!analyzer.is_loaded());
}

// ============================================================================
// Correlation & Scatter
// ============================================================================

#[test]
fn test_end_to_end_correlation_and_scatter() {
    let dir = tempfile::tempdir().unwrap();
    let analyzer = loaded("skills.csv");

    let table = analyzer.try_build_correlation(dir.path()).unwrap();
    let name = table.file_name().unwrap().to_string_lossy().into_owned();
    assert!(name.starts_with("correlation_table_") && name.ends_with(".xlsx"));

    let range = read_sheet(&table, "Correlation");
    assert_eq!(range.get_size(), (3, 3));
    assert_eq!(range.get_value((0, 1)), Some(&Data::String("age".to_string())));
    assert_eq!(range.get_value((0, 2)), Some(&Data::String("income".to_string())));
    assert_eq!(range.get_value((2, 0)), Some(&Data::String("income".to_string())));
    assert_eq!(as_f64(range.get_value((1, 1))), 1.0);
    assert_eq!(as_f64(range.get_value((2, 2))), 1.0);

    let r = as_f64(range.get_value((1, 2)));
    assert!((r - 0.3679).abs() < 1e-3, "r = {r}");
    assert_eq!(r, as_f64(range.get_value((2, 1))));

    // |r| < 0.9: success with an empty directory
    let scatter = analyzer.try_build_scatter(dir.path(), 0.9).unwrap();
    assert!(scatter.files.is_empty());
    assert!(scatter.directory.is_dir());
    assert!(png_files(&scatter.directory).is_empty());
}

#[test]
fn test_scatter_for_strong_pairs() {
    let dir = tempfile::tempdir().unwrap();
    let analyzer = loaded("workload.csv");

    let strict = analyzer.try_build_scatter(dir.path(), 0.9).unwrap();
    assert_eq!(file_names(&strict.files), vec!["hours_vs_age.png"]);

    let loose = analyzer.try_build_scatter(dir.path(), 0.3).unwrap();
    assert_ne!(loose.directory, strict.directory);
    assert_eq!(
        file_names(&loose.files),
        vec!["age_vs_income.png", "hours_vs_age.png", "hours_vs_income.png"]
    );
}

#[test]
fn test_scatter_needs_two_numeric_columns() {
    let dir = tempfile::tempdir().unwrap();
    let csv = dir.path().join("one.csv");
    std::fs::write(&csv, "x,label\n1.5,a\n2.5,b\n").unwrap();
    let out = dir.path().join("out");
    std::fs::create_dir(&out).unwrap();

    let analyzer = Analyzer::new();
    assert!(analyzer.load(&csv));
    let err = analyzer.try_build_scatter(&out, 0.6).unwrap_err();

    assert!(matches!(err, AnalysisError::InsufficientNumericColumns { found: 1 }));
    assert!(err.to_string().contains("Insufficient numeric data"));
    assert_eq!(std::fs::read_dir(&out).unwrap().count(), 0);
    assert!(!analyzer.build_correlation(&out));
}

// ============================================================================
// Pie & Histogram
// ============================================================================

#[test]
fn test_pie_charts() {
    let dir = tempfile::tempdir().unwrap();
    let analyzer = loaded("skills.csv");

    let output = analyzer.try_build_pie(dir.path()).unwrap();

    let dir_name = output.directory.file_name().unwrap().to_string_lossy().into_owned();
    assert!(dir_name.starts_with("pie_chart_"));
    assert_eq!(file_names(&output.files), vec!["department.png", "score.png"]);
}

#[test]
fn test_histograms_and_crosstabs() {
    let dir = tempfile::tempdir().unwrap();
    let analyzer = loaded("skills.csv");

    let output = analyzer.try_build_histograms(dir.path(), 10).unwrap();

    assert_eq!(
        file_names(&output.files),
        vec![
            "age_by_department.png",
            "age_by_score.png",
            "department_by_score.png",
            "income_by_department.png",
            "income_by_score.png",
            "score_by_department.png",
        ]
    );
    assert_eq!(png_files(&output.directory).len(), 6);
}

#[test]
fn test_build_charts_dispatch() {
    let dir = tempfile::tempdir().unwrap();
    let analyzer = loaded("workload.csv");

    assert!(analyzer.build_charts(dir.path(), ChartKind::Pie));
    assert!(analyzer.build_charts(dir.path(), ChartKind::Histogram { bins: 5 }));
    assert!(analyzer.build_charts(dir.path(), ChartKind::scatter()));

    let mut prefixes: Vec<String> = std::fs::read_dir(dir.path())
        .unwrap()
        .map(|entry| {
            let name = entry.unwrap().file_name().to_string_lossy().into_owned();
            name.rsplitn(3, '_').nth(2).unwrap_or_default().to_string()
        })
        .collect();
    prefixes.sort();
    assert_eq!(
        prefixes,
        vec!["histogram_by_category", "pie_chart", "scatter_plot"]
    );
}

#[test]
fn test_missing_output_root_creates_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("nope");
    let analyzer = loaded("skills.csv");

    let err = analyzer.try_build_pie(&missing).unwrap_err();
    assert!(err.is_precondition());
    assert!(!missing.exists());
}

// ============================================================================
// Summary
// ============================================================================

#[test]
fn test_summary_statistics() {
    let dir = tempfile::tempdir().unwrap();
    let csv = dir.path().join("values.csv");
    std::fs::write(&csv, "value,city\n1,Oslo\n2,Rome\n3,Oslo\n4,Lima\n5,Rome\n").unwrap();

    let analyzer = Analyzer::new();
    assert!(analyzer.load(&csv));
    let path = analyzer.try_summarize(dir.path()).unwrap();

    let name = path.file_name().unwrap().to_string_lossy().into_owned();
    assert!(name.starts_with("dataset_analysis_"));

    let range = read_sheet(&path, "Info");
    assert_eq!(range.get_size(), (3, 10));
    assert_eq!(range.get_value((0, 0)), Some(&Data::String("Column".to_string())));
    assert_eq!(range.get_value((0, 9)), Some(&Data::String("Examples".to_string())));

    assert_eq!(range.get_value((1, 0)), Some(&Data::String("value".to_string())));
    assert_eq!(range.get_value((1, 1)), Some(&Data::String("Int64".to_string())));
    assert_eq!(as_f64(range.get_value((1, 2))), 5.0);
    assert_eq!(as_f64(range.get_value((1, 4))), 1.0);
    assert_eq!(as_f64(range.get_value((1, 5))), 5.0);
    assert_eq!(as_f64(range.get_value((1, 6))), 3.0);
    assert_eq!(as_f64(range.get_value((1, 7))), 3.0);

    assert_eq!(range.get_value((2, 0)), Some(&Data::String("city".to_string())));
    assert_eq!(range.get_value((2, 4)), Some(&Data::String("N/A".to_string())));
    assert_eq!(range.get_value((2, 8)), Some(&Data::String("Oslo".to_string())));
    assert_eq!(
        range.get_value((2, 9)),
        Some(&Data::String("[Oslo, Rome, Lima]".to_string()))
    );
}

#[test]
fn test_summary_of_high_cardinality_text_column() {
    let dir = tempfile::tempdir().unwrap();
    let csv = dir.path().join("people.csv");
    let mut contents = String::from("name,age\n");
    for i in 0..4000 {
        contents.push_str(&format!("Person number {i:05},{}\n", 20 + i % 50));
    }
    std::fs::write(&csv, contents).unwrap();

    let analyzer = Analyzer::new();
    assert!(analyzer.load(&csv));
    let path = analyzer.try_summarize(dir.path()).unwrap();

    let range = read_sheet(&path, "Info");
    assert_eq!(range.get_size(), (3, 10));
    match range.get_value((1, 9)) {
        Some(Data::String(examples)) => {
            assert_eq!(examples.chars().count(), 32_767);
            assert!(examples.starts_with("[Person number 00000"));
        }
        other => panic!("expected the example list, got {other:?}"),
    }
    assert_eq!(as_f64(range.get_value((2, 4))), 20.0);
}

#[test]
fn test_column_summaries_json() {
    let analyzer = loaded("skills.csv");
    let summaries = analyzer.column_summaries().unwrap();

    assert_eq!(summaries.len(), 4);
    assert_eq!(summaries[0].dtype, "Categorical");
    assert_eq!(summaries[0].unique_values, 3);
    assert_eq!(summaries[3].non_null, 11);

    let json = serde_json::to_value(&summaries).unwrap();
    assert_eq!(json[1]["column"], "age");
    assert_eq!(json[1]["min"], 23.0);
    assert_eq!(json[1]["max"], 61.0);
}

// ============================================================================
// Cancellation & Collisions
// ============================================================================

#[test]
fn test_cancellation_mid_run_then_reset() {
    let dir = tempfile::tempdir().unwrap();
    let token = CancellationToken::new();
    let trigger = token.clone();
    let armed = Arc::new(AtomicBool::new(true));
    let armed_in_callback = armed.clone();

    let analyzer = Analyzer::builder()
        .config(small_images())
        .cancellation_token(token.clone())
        .on_progress(move |update: ProgressUpdate| {
            if update.items_processed == Some(1) && armed_in_callback.swap(false, Ordering::SeqCst)
            {
                trigger.cancel();
            }
        })
        .build()
        .unwrap();
    assert!(analyzer.load(fixtures_path().join("skills.csv")));

    // Two pie charts are due; the first triggers cancellation
    let err = analyzer.try_build_pie(dir.path()).unwrap_err();
    assert!(err.is_cancelled());
    let run_dirs: Vec<PathBuf> = std::fs::read_dir(dir.path())
        .unwrap()
        .map(|entry| entry.unwrap().path())
        .collect();
    assert_eq!(run_dirs.len(), 1);
    assert_eq!(png_files(&run_dirs[0]).len(), 1);

    analyzer.reset();
    let output = analyzer.try_build_pie(dir.path()).unwrap();
    assert_eq!(output.files.len(), 2);
    assert!(!armed.load(Ordering::SeqCst));
}

#[test]
fn test_cancel_while_idle_fails_next_operation() {
    let dir = tempfile::tempdir().unwrap();
    let analyzer = loaded("skills.csv");

    analyzer.cancel();
    assert!(!analyzer.build_histograms(dir.path(), 15));

    // The directory exists but holds no chart
    let run_dir = std::fs::read_dir(dir.path())
        .unwrap()
        .next()
        .unwrap()
        .unwrap()
        .path();
    assert!(png_files(&run_dir).is_empty());

    analyzer.reset();
    assert!(analyzer.build_histograms(dir.path(), 15));
}

#[test]
fn test_progress_counts_every_chart() {
    let dir = tempfile::tempdir().unwrap();
    let charts = Arc::new(AtomicUsize::new(0));
    let counter = charts.clone();

    let analyzer = Analyzer::builder()
        .config(small_images())
        .on_progress(move |update| {
            if matches!(
                update.stage,
                AnalysisStage::Histograms | AnalysisStage::Crosstabs
            ) {
                counter.fetch_add(1, Ordering::SeqCst);
            }
        })
        .build()
        .unwrap();
    assert!(analyzer.load(fixtures_path().join("skills.csv")));
    assert!(analyzer.build_histograms(dir.path(), 8));

    assert_eq!(charts.load(Ordering::SeqCst), 6);
}

#[test]
fn test_same_second_outputs_do_not_collide() {
    let dir = tempfile::tempdir().unwrap();
    let analyzer = loaded("skills.csv");

    let first = analyzer.try_build_correlation(dir.path()).unwrap();
    let second = analyzer.try_build_correlation(dir.path()).unwrap();
    let third = analyzer.try_build_correlation(dir.path()).unwrap();

    assert_ne!(first, second);
    assert_ne!(second, third);
    assert!(first.exists() && second.exists() && third.exists());
}
