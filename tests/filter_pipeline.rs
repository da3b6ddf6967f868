//! Integration tests for matrices and filter pipelines.

use expression_matrix::prelude::*;
use std::io::Write;
use tempfile::NamedTempFile;

const PROBES: [&str; 12] = [
    "AFFX-BioB-5_at",
    "1000_at",
    "1001_at",
    "1002_f_at",
    "1003_f_at",
    "1004_x_at",
    "1005_st",
    "1006_s_at",
    "1007_at",
    "1008_g_at",
    "1009_at",
    "1010_at",
];

/// Synthetic expression values, 12 probes × 6 samples.
///
/// - Probes 0-8: expressed (values around 100-1000)
/// - Probe 9: mostly missing (one present value)
/// - Probe 10: low, partly negative
/// - Probe 11: expressed but called absent in every sample
fn create_synthetic_expression() -> DenseMatrix {
    let n_samples = 6;
    let mut seed = 42u64;
    let mut simple_rand = move || -> f64 {
        seed = seed.wrapping_mul(1103515245).wrapping_add(12345);
        ((seed >> 16) & 0x7FFF) as f64 / 32768.0
    };

    let rows: Vec<Vec<f64>> = (0..PROBES.len())
        .map(|probe| {
            (0..n_samples)
                .map(|sample| {
                    let noise = 0.9 + 0.2 * simple_rand();
                    match probe {
                        9 if sample > 0 => f64::NAN,
                        10 => (sample as f64 - 2.0) * noise,
                        _ => 100.0 * (probe as f64 + 1.0) * noise,
                    }
                })
                .collect()
        })
        .collect();

    let mut matrix = DenseMatrix::from_rows(&rows).unwrap();
    matrix.set_row_names(&PROBES).unwrap();
    let samples: Vec<String> = (0..n_samples).map(|i| format!("S{}", i)).collect();
    matrix.set_column_names(&samples).unwrap();
    matrix
}

fn create_presence_calls() -> StringMatrix {
    let rows: Vec<Vec<String>> = (0..PROBES.len())
        .map(|probe| {
            (0..6)
                .map(|sample| {
                    let call = match probe {
                        11 => "A",
                        10 if sample % 2 == 0 => "M",
                        _ => "P",
                    };
                    call.to_string()
                })
                .collect()
        })
        .collect();
    let mut flags = StringMatrix::from_rows(rows).unwrap();
    flags.set_row_names(&PROBES).unwrap();
    let samples: Vec<String> = (0..6).map(|i| format!("S{}", i)).collect();
    flags.set_column_names(&samples).unwrap();
    flags
}

fn create_cleaning_pipeline() -> FilterPipeline {
    let mut missing = RowMissingFilter::new();
    missing.set_min_present_fraction(0.5).unwrap();
    let mut level = RowLevelFilter::new(RowCriterion::Mean);
    level.set_remove_all_negative(true);
    level.set_low_cut(10.0, false).unwrap();

    FilterPipeline::new()
        .name("cleaning")
        .row_affy_names([
            ProbeCriterion::Affx,
            ProbeCriterion::X,
            ProbeCriterion::St,
            ProbeCriterion::F,
        ])
        .row_missing(missing)
        .row_absent(None, Some(0.5), false)
        .row_level(level)
}

#[test]
fn test_dense_lookup_and_missing() {
    let mut matrix = DenseMatrix::from_rows(&[
        vec![1.0, 2.0, 3.0, 4.0],
        vec![11.0, 12.0, 13.0, 14.0],
        vec![21.0, f64::NAN, 23.0, 24.0],
    ])
    .unwrap();
    matrix.set_row_names(&["a", "b", "c"]).unwrap();
    matrix.set_column_names(&["w", "x", "y", "z"]).unwrap();

    assert!(matrix.is_missing(2, 1));
    assert_eq!(matrix.num_missing(), 1);
    assert_eq!(matrix.row_by_name("b").unwrap(), vec![11.0, 12.0, 13.0, 14.0]);
    assert!(matches!(
        matrix.row_by_name("nope"),
        Err(MatrixError::NotFound { axis: Axis::Row, .. })
    ));
}

#[test]
fn test_probe_name_filter_removes_matches() {
    let matrix = create_synthetic_expression();
    let filter = RowAffyNameFilter::new([
        ProbeCriterion::Affx,
        ProbeCriterion::X,
        ProbeCriterion::St,
        ProbeCriterion::F,
    ]);

    let filtered = filter.filter(&matrix).unwrap();
    assert_eq!(filtered.rows(), matrix.rows() - 5);
    assert!(!filtered.contains_row_name("AFFX-BioB-5_at"));
    assert!(filtered.contains_row_name("1006_s_at"));
}

#[test]
fn test_item_level_blanks_negatives() {
    let matrix = create_synthetic_expression();
    let mut filter = ItemLevelFilter::new();
    filter.set_low_cut(0.0).unwrap();

    let filtered = filter.filter(&matrix).unwrap();
    assert_eq!(filtered.rows(), matrix.rows());
    assert_eq!(filtered.columns(), matrix.columns());
    let row = filtered.row_index_by_name("1009_at").unwrap();
    // Probe 10 is negative in samples 0 and 1
    assert!(filtered.get_quick(row, 0).is_nan());
    assert!(filtered.get_quick(row, 1).is_nan());
    assert!((filtered.get_quick(row, 2) - matrix.get_quick(row, 2)).abs() < 1e-10);
}

#[test]
fn test_ragged_columns_follow_rows() {
    let mut ragged = RaggedMatrix::new();
    ragged.add_row("r0", SparseVector::from_pairs(&[(0, 1.0), (2, 2.0)]).unwrap());
    ragged.add_row("r1", SparseVector::from_pairs(&[(1, 3.0)]).unwrap());
    assert_eq!(ragged.columns(), 3);
    assert!(!ragged.is_dirty());

    ragged.add_row("r2", SparseVector::from_pairs(&[(6, 4.0)]).unwrap());
    assert!(ragged.is_dirty());
    assert_eq!(ragged.columns(), 7);
    assert_eq!(ragged.materialize_row(0), &[1.0, 0.0, 2.0, 0.0, 0.0, 0.0, 0.0]);
}

#[test]
fn test_full_cleaning_pipeline() {
    let matrix = create_synthetic_expression();
    let flags = create_presence_calls();

    let (filtered, summaries) = create_cleaning_pipeline()
        .run_with_summaries(&matrix, Some(&flags))
        .unwrap();

    assert_eq!(
        filtered.row_names(),
        vec!["1000_at", "1001_at", "1006_s_at", "1007_at"]
    );
    assert_eq!(filtered.column_names(), matrix.column_names());
    for name in filtered.row_names() {
        assert_eq!(
            filtered.row_by_name(&name).unwrap(),
            matrix.row_by_name(&name).unwrap()
        );
    }

    let removed: Vec<usize> = summaries.iter().map(|s| s.n_removed).collect();
    // Probe names, then 1008_g_at (missing), 1010_at (absent), 1009_at (low mean)
    assert_eq!(removed, vec![5, 1, 1, 1]);
    // The input is untouched
    assert_eq!(matrix.rows(), PROBES.len());
}

#[test]
fn test_pipeline_on_other_storage() {
    let dense = create_synthetic_expression();
    let flags = create_presence_calls();
    let pipeline = create_cleaning_pipeline();
    let expected = pipeline.run(&dense, Some(&flags)).unwrap().row_names();

    let rows: Vec<Vec<f64>> = (0..dense.rows()).map(|r| dense.row_obj(r)).collect();
    let mut fast = FastRowMatrix::from_rows(rows).unwrap();
    fast.set_row_names(&dense.row_names()).unwrap();
    fast.set_column_names(&dense.column_names()).unwrap();

    let out = pipeline.run(&fast, Some(&flags)).unwrap();
    assert_eq!(out.row_names(), expected);
    assert_eq!(out.row(0), dense.row_by_name(&expected[0]).unwrap().as_slice());
}

#[test]
fn test_filters_on_compressed_storage() {
    let dense = create_synthetic_expression();
    let mut triplets = Vec::new();
    for row in 0..dense.rows() {
        for col in 0..dense.columns() {
            triplets.push((row, col, dense.get_quick(row, col)));
        }
    }
    let mut sparse =
        CompressedSparseMatrix::from_triplets(dense.rows(), dense.columns(), &triplets).unwrap();
    sparse.set_row_names(&PROBES).unwrap();

    let filter = RowNameFilter::include(["1000_at", "1007_at"]);
    let out = filter
        .filter_with(&sparse, &|r: usize, c: usize| CompressedSparseMatrix::new(r, c))
        .unwrap();
    assert_eq!(out.rows(), 2);
    assert_eq!(out.nnz(), 12);
    assert_eq!(out.row_by_name("1007_at").unwrap(), dense.row_by_name("1007_at").unwrap());
}

#[test]
fn test_pipeline_config_file_round_trip() {
    let config = create_cleaning_pipeline().to_config(Some("Expression cleaning"));

    let mut file = NamedTempFile::new().unwrap();
    write!(file, "{}", config.to_yaml().unwrap()).unwrap();
    file.flush().unwrap();

    let loaded = PipelineConfig::from_file(file.path()).unwrap();
    assert_eq!(loaded, config);

    let matrix = create_synthetic_expression();
    let flags = create_presence_calls();
    let from_file = FilterPipeline::from_config(&loaded)
        .run(&matrix, Some(&flags))
        .unwrap();
    let direct = create_cleaning_pipeline().run(&matrix, Some(&flags)).unwrap();
    assert_eq!(from_file.row_names(), direct.row_names());
}

#[test]
fn test_missing_flags_is_reported() {
    let matrix = create_synthetic_expression();
    let err = create_cleaning_pipeline().run(&matrix, None).unwrap_err();
    assert!(err.to_string().contains("Step 3 (row_absent) failed"));
}

#[test]
fn test_logging_init() {
    expression_matrix::logging::init(0);
    // A second call keeps the first subscriber
    assert!(!expression_matrix::logging::init(3));
}
