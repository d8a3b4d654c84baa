//! Comprehensive edge case and boundary condition tests.

use yolo_eval::matching::{match_image, ImageMatch, MatchOptions, MatchPolicy};
use yolo_eval::metrics::calculate_iou;
use yolo_eval::stats::AggregateStats;
use yolo_eval::types::{AbsoluteBox, ImageDimensions, MatchLabel, NormalizedBox};

fn nbox(cx: f64, cy: f64, w: f64, h: f64) -> NormalizedBox {
    NormalizedBox::new(0, cx, cy, w, h)
}

fn labels(result: &ImageMatch) -> Vec<MatchLabel> {
    result.records.iter().map(|r| r.label()).collect()
}

fn fold_one(result: &ImageMatch) -> AggregateStats {
    let mut stats = AggregateStats::new();
    stats.fold(&result.summary, &result.records);
    stats
}

// ============================================================================
// REFERENCE SCENARIOS
// ============================================================================

#[test]
fn test_identical_box_is_true_positive() {
    let result = match_image(
        &[nbox(0.5, 0.5, 0.2, 0.2)],
        &[nbox(0.5, 0.5, 0.2, 0.2)],
        "a.png",
        &MatchOptions::default(),
    );

    assert_eq!(labels(&result), vec![MatchLabel::TruePositive]);
    assert!((result.records[0].iou() - 1.0).abs() < 1e-10);
}

#[test]
fn test_far_apart_boxes_give_false_negative() {
    let result = match_image(
        &[nbox(0.1, 0.1, 0.1, 0.1)],
        &[nbox(0.9, 0.9, 0.1, 0.1)],
        "b.png",
        &MatchOptions::default(),
    );

    let fn_count = labels(&result).iter().filter(|&&l| l == MatchLabel::FalseNegative).count();
    assert_eq!(fn_count, 1);
    assert_eq!(result.records[0].iou(), 0.0);
    assert_eq!(result.summary.max_iou_achieved, 0.0);
}

#[test]
fn test_prediction_without_ground_truth() {
    let result = match_image(&[], &[nbox(0.5, 0.5, 0.1, 0.1)], "c.png", &MatchOptions::default());
    let stats = fold_one(&result);

    assert_eq!(stats.false_positives, 1);
    assert_eq!(stats.true_positives, 0);
    assert_eq!(stats.false_negatives, 0);
    assert!(stats.duplicate_images.is_empty());
}

#[test]
fn test_duplicate_identical_predictions() {
    let result = match_image(
        &[nbox(0.5, 0.5, 0.4, 0.4)],
        &[nbox(0.5, 0.5, 0.4, 0.4), nbox(0.5, 0.5, 0.4, 0.4)],
        "d.png",
        &MatchOptions::default(),
    );
    let stats = fold_one(&result);

    assert_eq!(
        labels(&result),
        vec![MatchLabel::TruePositive, MatchLabel::FalsePositive]
    );
    assert_eq!(stats.true_positives, 1);
    assert_eq!(stats.false_positives, 1);
    assert_eq!(stats.duplicate_images, vec!["d.png"]);
}

#[test]
fn test_zero_overlap_corpus_average_is_zero() {
    let mut stats = AggregateStats::new();
    for (idx, (gt, pred)) in [
        (vec![nbox(0.1, 0.1, 0.1, 0.1)], vec![nbox(0.9, 0.9, 0.1, 0.1)]),
        (vec![], vec![]),
        (vec![nbox(0.2, 0.8, 0.1, 0.1)], vec![]),
    ]
    .iter()
    .enumerate()
    {
        let result = match_image(gt, pred, &format!("{idx}.png"), &MatchOptions::default());
        stats.fold(&result.summary, &result.records);
    }

    assert_eq!(stats.average_iou(), 0.0);
    assert!(!stats.average_iou().is_nan());
}

// ============================================================================
// GEOMETRY EDGE CASES
// ============================================================================

#[test]
fn test_degenerate_boxes_have_zero_iou() {
    let line = AbsoluteBox::new(0.0, 0.0, 10.0, 0.0);
    assert_eq!(calculate_iou(&line, &line), 0.0);

    let result = match_image(
        &[nbox(0.5, 0.5, 0.0, 0.0)],
        &[nbox(0.5, 0.5, 0.0, 0.0)],
        "degenerate.png",
        &MatchOptions::default(),
    );
    assert_eq!(
        labels(&result),
        vec![MatchLabel::FalseNegative, MatchLabel::FalsePositive]
    );
}

#[test]
fn test_out_of_range_coordinates_are_not_clamped() {
    // Both boxes hang over the left edge by the same amount
    let gt = nbox(0.0, 0.5, 0.2, 0.2);
    let abs = gt.to_absolute(ImageDimensions::default());
    assert!(abs.x1 < 0.0);

    let result = match_image(&[gt], &[gt], "edge.png", &MatchOptions::default());
    assert_eq!(labels(&result), vec![MatchLabel::TruePositive]);
}

#[test]
fn test_dimensions_do_not_change_iou_for_uniform_scale() {
    let gt = [nbox(0.5, 0.5, 0.2, 0.2)];
    let pred = [nbox(0.55, 0.5, 0.2, 0.2)];

    let small = match_image(&gt, &pred, "s.png", &MatchOptions::default());
    let large = match_image(
        &gt,
        &pred,
        "l.png",
        &MatchOptions {
            dimensions: ImageDimensions::new(2048, 2048),
            ..MatchOptions::default()
        },
    );
    assert!((small.records[0].iou() - large.records[0].iou()).abs() < 1e-9);
}

// ============================================================================
// MATCHING EDGE CASES
// ============================================================================

#[test]
fn test_threshold_boundary_is_inclusive() {
    // Contained box with a quarter of the area: IoU = 0.25
    let gt = [nbox(0.5, 0.5, 0.5, 0.5)];
    let pred = [nbox(0.5, 0.5, 0.25, 0.25)];
    let options = MatchOptions {
        iou_threshold: 0.25,
        ..MatchOptions::default()
    };

    let result = match_image(&gt, &pred, "t.png", &options);
    assert_eq!(labels(&result), vec![MatchLabel::TruePositive]);
}

#[test]
fn test_tie_goes_to_first_prediction() {
    // Two predictions shifted left and right by the same amount
    let gt = [nbox(0.5, 0.5, 0.25, 0.25)];
    let left = nbox(0.4375, 0.5, 0.25, 0.25);
    let right = nbox(0.5625, 0.5, 0.25, 0.25);

    let dims = ImageDimensions::new(100, 100);
    let options = MatchOptions {
        dimensions: dims,
        ..MatchOptions::default()
    };
    let result = match_image(&gt, &[left, right], "tie.png", &options);

    assert_eq!(result.records[0].label(), MatchLabel::TruePositive);
    assert_eq!(result.records[0].pred_box(), Some(&left.to_absolute(dims)));
    assert_eq!(result.records[1].pred_box(), Some(&right.to_absolute(dims)));
}

#[test]
fn test_many_predictions_one_ground_truth() {
    let gt = [nbox(0.5, 0.5, 0.3, 0.3)];
    let preds: Vec<NormalizedBox> = (0..10)
        .map(|i| nbox(0.5 + 0.01 * i as f64, 0.5, 0.3, 0.3))
        .collect();

    let result = match_image(&gt, &preds, "many.png", &MatchOptions::default());
    assert_eq!(result.summary.true_positive_count, 1);
    assert_eq!(result.records.len(), 10);
    assert_eq!(result.records[0].label(), MatchLabel::TruePositive);
    assert!((result.records[0].iou() - 1.0).abs() < 1e-10);
}

#[test]
fn test_competing_ground_truths_by_policy() {
    let gt = [nbox(0.5, 0.5, 0.4, 0.4), nbox(0.5, 0.5, 0.38, 0.38)];
    let pred = [nbox(0.5, 0.5, 0.4, 0.4)];

    let exclusive = fold_one(&match_image(&gt, &pred, "x.png", &MatchOptions::default()));
    assert_eq!(exclusive.true_positives, 1);
    assert_eq!(exclusive.false_negatives, 1);
    assert_eq!(exclusive.false_positives, 0);

    let reuse = fold_one(&match_image(
        &gt,
        &pred,
        "x.png",
        &MatchOptions {
            policy: MatchPolicy::ReuseCandidates,
            ..MatchOptions::default()
        },
    ));
    assert_eq!(reuse.true_positives, 2);
    assert_eq!(reuse.false_negatives, 0);
    assert_eq!(reuse.false_positives, 0);
}

#[test]
fn test_class_ids_are_not_considered() {
    let gt = [NormalizedBox::new(0, 0.5, 0.5, 0.2, 0.2)];
    let pred = [NormalizedBox::new(7, 0.5, 0.5, 0.2, 0.2)];

    let result = match_image(&gt, &pred, "cls.png", &MatchOptions::default());
    assert_eq!(labels(&result), vec![MatchLabel::TruePositive]);
}

#[test]
fn test_large_image_keeps_counts_balanced() {
    let mut gt = Vec::new();
    let mut pred = Vec::new();
    for i in 0..30 {
        for j in 0..30 {
            let cx = 0.015 + i as f64 / 30.0;
            let cy = 0.015 + j as f64 / 30.0;
            gt.push(nbox(cx, cy, 0.02, 0.02));
            if (i + j) % 3 != 0 {
                pred.push(nbox(cx, cy, 0.02, 0.02));
            }
        }
    }

    let result = match_image(&gt, &pred, "grid.png", &MatchOptions::default());
    let stats = fold_one(&result);
    assert_eq!(stats.true_positives, pred.len());
    assert_eq!(stats.false_negatives, gt.len() - pred.len());
    assert_eq!(stats.false_positives, 0);
}
