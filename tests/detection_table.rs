use model_examples::{DetectionTable, ExampleError, Field, Labels, write_report};

const THRESHOLD: f32 = 0.3;

fn scenario() -> DetectionTable {
    DetectionTable::build(
        3,
        &[1.0, 2.0, 3.0],
        &[0.9, 0.2, 0.5],
        &[[0.0, 0.0, 1.0, 1.0], [0.0, 0.0, 1.0, 1.0], [0.1, 0.1, 0.9, 0.9]],
        THRESHOLD,
    )
    .unwrap()
}

// 简单的线性同余序列，生成可复现的置信度
fn scores(seed: u32, n: usize) -> Vec<f32> {
    let mut state = seed;
    (0..n)
        .map(|_| {
            state = state.wrapping_mul(1_664_525).wrapping_add(1_013_904_223);
            (state >> 8) as f32 / (1u32 << 24) as f32
        })
        .collect()
}

#[test]
fn test_scenario_rows() {
    let table = scenario();
    assert_eq!(table.row_indices().collect::<Vec<_>>(), vec![0, 2]);
    assert_eq!(table.field_at(0, Field::DetectionScore).unwrap(), 0.9);
    assert_eq!(table.field_at(0, Field::DetectionClass).unwrap(), 1.0);
    assert_eq!(table.field_at(2, Field::DetectionScore).unwrap(), 0.5);
    assert_eq!(table.field_at(2, Field::DetectionClass).unwrap(), 3.0);
    assert!(matches!(
        table.field_at(1, Field::Ymin),
        Err(ExampleError::NotFound(_))
    ));
}

#[test]
fn test_empty_detections() {
    let table = DetectionTable::build(0, &[], &[], &[], THRESHOLD).unwrap();
    assert!(table.is_empty());
    assert_eq!(table.row_indices().count(), 0);

    let mut out = Vec::new();
    write_report(&table, &Labels::default(), &mut out).unwrap();
    assert!(out.is_empty());
}

#[test]
fn test_rows_above_threshold_in_ascending_order() {
    for seed in 0..50 {
        let n = 40;
        let scores = scores(seed, n);
        let classes = vec![1.0; n];
        let boxes = vec![[0.0, 0.0, 1.0, 1.0]; n];
        let table = DetectionTable::build(n, &classes, &scores, &boxes, THRESHOLD).unwrap();

        let rows: Vec<usize> = table.row_indices().collect();
        assert!(rows.windows(2).all(|w| w[0] < w[1]));
        assert!(rows.iter().all(|&r| r < n));
        for (i, &score) in scores.iter().enumerate() {
            assert_eq!(table.get(i).is_some(), score > THRESHOLD, "seed {seed} 行 {i}");
        }
        for (_, row) in table.iter() {
            assert!(row.score > THRESHOLD);
        }
    }
}

#[test]
fn test_build_is_idempotent() {
    let s = scores(7, 25);
    let classes: Vec<f32> = (1..=25).map(|c| c as f32).collect();
    let boxes = vec![[0.2, 0.3, 0.4, 0.5]; 25];

    let a = DetectionTable::build(25, &classes, &s, &boxes, THRESHOLD).unwrap();
    let b = DetectionTable::build(25, &classes, &s, &boxes, THRESHOLD).unwrap();
    assert_eq!(a, b);
    assert_eq!(
        a.row_indices().collect::<Vec<_>>(),
        b.row_indices().collect::<Vec<_>>()
    );
}

#[test]
fn test_label_lookup_bounds() {
    let labels = Labels::from_lines((1..=90).map(|i| format!("label{i}")));
    let table = DetectionTable::build(
        3,
        &[1.0, 90.0, 91.0],
        &[0.9, 0.9, 0.9],
        &[[0.0; 4]; 3],
        THRESHOLD,
    )
    .unwrap();

    assert_eq!(table.label_for(0, &labels).unwrap(), "label1");
    assert_eq!(table.label_for(1, &labels).unwrap(), "label90");
    assert!(matches!(
        table.label_for(2, &labels),
        Err(ExampleError::IndexOutOfRange { class_id: 91, len: 90 })
    ));
}

#[test]
fn test_mismatched_lengths_fail_fast() {
    let err = DetectionTable::build(2, &[1.0, 2.0], &[0.9, 0.8], &[[0.0; 4]], THRESHOLD).unwrap_err();
    assert!(matches!(err, ExampleError::Malformed(_)));
}
