use super::*;
use crate::color::{ColorSplitConfig, HueClass};
use crate::testing;

fn plate_evaluator() -> SweepEvaluator {
    SweepEvaluator {
        baseline: PipelineConfig {
            blur_size: 3,
            binarization: BinarizationConfig {
                mode: ThresholdMode::adaptive_gaussian(33, 2),
                invert: true,
            },
            min_area: MinArea::Pixels(30),
            ..SweepEvaluator::default().baseline
        },
        ..SweepEvaluator::default()
    }
}

#[test]
fn test_default_combinations() {
    let evaluator = SweepEvaluator::default();
    assert_eq!(evaluator.combinations(), 2 * 3 * 18);
    assert_eq!(evaluator.strategies().len(), evaluator.combinations());
}

#[test]
fn test_ids_follow_parameters() {
    let evaluator = SweepEvaluator {
        masks: vec![MaskSize::Five],
        peak_cleanup_sizes: vec![3],
        alphas: vec![0.0, 0.05],
        absolute_levels: vec![20],
        ..SweepEvaluator::default()
    };
    let ids: Vec<String> = evaluator.strategies().into_iter().map(|(id, _)| id).collect();
    assert_eq!(ids, ["a-L2-5-3-0", "a-L2-5-3-0.05", "t-L2-5-3-20"]);

    let (_, strategy) = evaluator.strategies().pop().unwrap();
    assert_eq!(
        strategy,
        SeedStrategy::DistanceTransform {
            metric: DistanceMetric::L2,
            mask: MaskSize::Five,
            threshold: DtThreshold::Absolute(20),
            peak_cleanup: 3,
        }
    );
}

#[test]
fn test_results_sorted_by_count() {
    testing::init_tracing();
    let evaluator = SweepEvaluator {
        peak_cleanup_sizes: vec![1, 3],
        alphas: vec![0.0, 0.1, 0.2],
        absolute_levels: vec![5, 30, 255],
        ..plate_evaluator()
    };
    let report = evaluator.run(&testing::dumbbell_plate()).unwrap();

    assert_eq!(report.baseline, 1);
    assert_eq!(report.results.len(), evaluator.combinations());
    assert!(report.results.windows(2).all(|w| w[0].count >= w[1].count));
    assert!(report.improving().all(|r| r.count > report.baseline));
}

#[test]
fn test_color_split_in_baseline_is_ignored() {
    let evaluator = SweepEvaluator {
        peak_cleanup_sizes: vec![1],
        alphas: vec![0.0],
        absolute_levels: vec![0, 255],
        ..plate_evaluator()
    };
    let split = ColorSplitConfig {
        class_a: HueClass {
            hue_center: 0,
            hue_tolerance: 10,
            ..HueClass::default()
        },
        class_b: HueClass {
            hue_center: 120,
            hue_tolerance: 10,
            ..HueClass::default()
        },
    };
    let with_split = SweepEvaluator {
        baseline: PipelineConfig {
            color_split: Some(split),
            ..evaluator.baseline
        },
        ..evaluator.clone()
    };

    let plain = evaluator.run(&testing::dumbbell_plate()).unwrap();
    let report = with_split.run(&testing::dumbbell_plate()).unwrap();
    assert_eq!(report.baseline, 1);
    assert_eq!(report.baseline, plain.baseline);
    assert_eq!(report.results, plain.results);
    assert!(report.results.iter().any(|r| r.count != report.baseline));
}

#[test]
fn test_zero_threshold_counts_at_least_as_many() {
    let evaluator = SweepEvaluator {
        alphas: Vec::new(),
        absolute_levels: vec![0, 255],
        ..plate_evaluator()
    };
    let report = evaluator.run(&testing::two_colony_plate()).unwrap();

    let count_of = |id: &str| {
        report
            .results
            .iter()
            .find(|r| r.id == id)
            .map(|r| r.count)
            .unwrap()
    };
    for mask in ["3", "5"] {
        for pk in [1, 3, 5] {
            let low = count_of(&format!("t-L2-{mask}-{pk}-0"));
            let high = count_of(&format!("t-L2-{mask}-{pk}-255"));
            assert!(low >= high, "mask {mask} pk {pk}: {low} < {high}");
            // Nothing passes a gate above 255.
            assert_eq!(high, 0);
        }
    }
}

#[test]
fn test_report_json_shape() {
    let report = SweepReport {
        baseline: 3,
        results: vec![SweepResult {
            id: "t-L2-3-1-20".to_string(),
            params: SeedStrategy::DistanceTransform {
                metric: DistanceMetric::L2,
                mask: MaskSize::Three,
                threshold: DtThreshold::Absolute(20),
                peak_cleanup: 1,
            },
            count: 5,
        }],
    };
    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["baseline"], 3);
    assert_eq!(json["results"][0]["id"], "t-L2-3-1-20");
    assert_eq!(json["results"][0]["count"], 5);
    assert_eq!(json["results"][0]["params"]["kind"], "distance-transform");
    assert_eq!(json["results"][0]["params"]["mask"], 3);
    assert_eq!(json["results"][0]["params"]["threshold"]["absolute"], 20);
    assert_eq!(report.improving().count(), 1);
}

#[test]
fn test_invalid_baseline_is_rejected() {
    let evaluator = SweepEvaluator {
        baseline: PipelineConfig {
            effective_radius_pct: 10.0,
            ..PipelineConfig::default()
        },
        ..SweepEvaluator::default()
    };
    assert!(evaluator.run(&testing::empty_plate()).is_err());
}

#[test]
fn test_oversized_peak_cleanup_is_rejected() {
    let evaluator = SweepEvaluator {
        peak_cleanup_sizes: vec![1, 101],
        ..SweepEvaluator::default()
    };
    assert!(evaluator.run(&testing::empty_plate()).is_err());
}
