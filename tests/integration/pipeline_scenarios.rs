//! Pipeline Scenario Tests
//!
//! End-to-end runs through the orchestrator for both strategies.

use std::time::Duration;

use prodcon::output::MemorySink;
use prodcon::{Pipeline, PipelineConfig, PipelineError, QueueStrategy, TaskDelays};

fn sequence(count: i64) -> Vec<i64> {
    (1..=count).collect()
}

#[test]
fn test_standard_run_capacity_five_twenty_items() {
    for strategy in QueueStrategy::ALL {
        let mut pipeline = Pipeline::with_strategy(5, strategy).unwrap();
        let report = pipeline.run(20).unwrap();

        assert_eq!(pipeline.source_container(), sequence(20));
        assert_eq!(pipeline.destination_container(), sequence(20));
        assert_eq!(report.counts.items_produced, 20);
        assert_eq!(report.counts.items_consumed, 20);
        assert!(report.counts.max_queue_depth >= 1);
        assert!(report.counts.max_queue_depth <= 5);
        assert!(report.integrity_passed(), "{} lost or reordered items", strategy);
        assert!(report.synchronization.balanced);
        assert_eq!(report.strategy, strategy);
    }
}

#[test]
fn test_capacity_exceeds_item_count() {
    for strategy in QueueStrategy::ALL {
        let mut pipeline = Pipeline::with_strategy(100, strategy).unwrap();
        let report = pipeline.run(50).unwrap();

        assert_eq!(pipeline.destination_container(), sequence(50));
        assert!(report.counts.max_queue_depth <= 50);
        assert!(report.integrity_passed());
    }
}

#[test]
fn test_small_custom_source() {
    for strategy in QueueStrategy::ALL {
        let mut pipeline = Pipeline::with_strategy(5, strategy).unwrap();
        pipeline.initialize_source_items(&[100, 200, 300]);

        let report = pipeline.run_current_source().unwrap();
        assert_eq!(pipeline.destination_container(), vec![100, 200, 300]);
        assert_eq!(report.counts.items_consumed, 3);
    }
}

#[test]
fn test_empty_run() {
    for strategy in QueueStrategy::ALL {
        let mut pipeline = Pipeline::with_strategy(5, strategy).unwrap();
        let report = pipeline.run(0).unwrap();

        assert!(pipeline.destination_container().is_empty());
        assert_eq!(report.counts.items_produced, 0);
        assert_eq!(report.counts.items_consumed, 0);
        assert_eq!(report.counts.max_queue_depth, 0);
        assert_eq!(report.timing.average_time_per_item_ms, None);
        assert_eq!(report.timing.average_producer_wait_ms, None);
        assert!(report.integrity_passed());
    }
}

#[test]
fn test_single_item_run() {
    for strategy in QueueStrategy::ALL {
        let mut pipeline = Pipeline::with_strategy(5, strategy).unwrap();
        let report = pipeline.run(1).unwrap();

        assert_eq!(pipeline.destination_container(), vec![1]);
        assert_eq!(report.counts.max_queue_depth, 1);
        assert!((report.utilization.utilization_rate - 20.0).abs() < 1e-9);
        assert!(report.integrity_passed());
    }
}

#[test]
fn test_custom_source_preserves_order() {
    let items = [10, 20, 30, 40, 50];
    for strategy in QueueStrategy::ALL {
        let mut pipeline = Pipeline::with_strategy(3, strategy).unwrap();
        pipeline.initialize_source_items(&items);

        let report = pipeline.run_current_source().unwrap();
        assert_eq!(pipeline.destination_container(), items.to_vec());
        assert_eq!(report.counts.source_size, 5);
        assert!(report.integrity_passed());
    }
}

#[test]
fn test_custom_source_with_duplicates_and_negatives() {
    let items = [3, -1, 3, 0, i64::MAX, i64::MIN];
    let mut pipeline = Pipeline::with_strategy(2, QueueStrategy::ConditionGated).unwrap();
    pipeline.initialize_source_items(&items);

    pipeline.run_current_source().unwrap();
    assert_eq!(pipeline.destination_container(), items.to_vec());
}

#[test]
fn test_absent_entries_are_skipped() {
    for strategy in QueueStrategy::ALL {
        let mut pipeline = Pipeline::with_strategy(2, strategy).unwrap();
        pipeline.initialize_source_with_gaps(vec![Some(1), None, Some(3), None, Some(5)]);

        let report = pipeline.run_current_source().unwrap();
        assert_eq!(pipeline.source_container(), vec![1, 3, 5]);
        assert_eq!(pipeline.destination_container(), vec![1, 3, 5]);
        assert_eq!(report.counts.items_skipped, 2);
        assert_eq!(report.counts.items_produced, 3);
        assert!(report.integrity_passed());
    }
}

#[test]
fn test_small_buffer_producer_wait_without_delays() {
    for strategy in QueueStrategy::ALL {
        let mut pipeline = Pipeline::with_strategy(2, strategy).unwrap();
        let report = pipeline.run(10).unwrap();

        assert!(report.timing.producer_wait_ms > 0.0, "{} recorded no producer wait", strategy);
        assert!(report.counts.max_queue_depth <= 2);
        assert_eq!(pipeline.destination_container(), sequence(10));
    }
}

#[test]
fn test_slow_consumer_makes_producer_wait() {
    for strategy in QueueStrategy::ALL {
        let mut pipeline = Pipeline::with_strategy(2, strategy)
            .unwrap()
            .with_delays(TaskDelays::new(Duration::ZERO, Duration::from_millis(5)));
        let report = pipeline.run(10).unwrap();

        assert!(report.timing.producer_wait_ms > 0.0);
        assert_eq!(report.counts.max_queue_depth, 2, "{} never filled the buffer", strategy);
        assert!(report.synchronization.blocking_observed);
        assert!(report.integrity_passed());
    }
}

#[test]
fn test_containers_are_independent_copies() {
    let mut pipeline = Pipeline::new(4).unwrap();
    pipeline.run(5).unwrap();

    let mut source = pipeline.source_container();
    let mut destination = pipeline.destination_container();
    source.clear();
    destination.push(99);

    assert_eq!(pipeline.source_container(), sequence(5));
    assert_eq!(pipeline.destination_container(), sequence(5));
}

#[test]
fn test_reset_then_rerun() {
    for strategy in QueueStrategy::ALL {
        let mut pipeline = Pipeline::with_strategy(3, strategy).unwrap();
        pipeline.run(8).unwrap();

        pipeline.reset_statistics();
        assert!(pipeline.destination_container().is_empty());
        assert_eq!(pipeline.stats_snapshot().items_consumed, 0);

        let report = pipeline.run_current_source().unwrap();
        assert_eq!(pipeline.destination_container(), sequence(8));
        assert_eq!(report.counts.items_consumed, 8);
    }
}

#[test]
fn test_reset_then_run_with_different_item_count() {
    for strategy in QueueStrategy::ALL {
        let mut pipeline = Pipeline::with_strategy(4, strategy).unwrap();
        pipeline.initialize_source_with_gaps(vec![Some(1), None, Some(2), Some(3), None, Some(4), Some(5)]);
        let first = pipeline.run_current_source().unwrap();
        assert_eq!(first.counts.items_skipped, 2);
        assert_eq!(first.counts.items_produced, 5);

        pipeline.reset_statistics();
        let report = pipeline.run(2).unwrap();

        assert_eq!(pipeline.source_container(), sequence(2));
        assert_eq!(pipeline.destination_container(), sequence(2));
        assert_eq!(report.counts.items_produced, 2);
        assert_eq!(report.counts.items_consumed, 2);
        assert_eq!(report.counts.items_skipped, 0);
        assert!(report.counts.max_queue_depth <= 2, "{} kept the previous high-water mark", strategy);
        assert_eq!(report.counts.destination_size, 2);
        assert!(report.integrity_passed());
    }
}

#[test]
fn test_consecutive_runs_do_not_accumulate() {
    let sink = MemorySink::new();
    let reports = sink.handle();
    let mut pipeline = Pipeline::new(2).unwrap().with_sink(Box::new(sink));

    pipeline.run(6).unwrap();
    let second = pipeline.run(3).unwrap();

    assert_eq!(pipeline.destination_container(), sequence(3));
    assert_eq!(second.counts.items_produced, 3);

    let emitted = reports.lock();
    assert_eq!(emitted.len(), 2);
    assert_ne!(emitted[0].run_id, emitted[1].run_id);
}

#[test]
fn test_analysis_is_repeatable() {
    let mut pipeline = Pipeline::with_strategy(4, QueueStrategy::ConditionGated).unwrap();
    pipeline.run(6).unwrap();

    let first = pipeline.perform_analysis();
    let second = pipeline.perform_analysis();
    assert_eq!(first.counts, second.counts);
    assert_eq!(first.timing, second.timing);
    assert_eq!(first.integrity, second.integrity);
}

#[test]
fn test_configuration_errors() {
    assert!(matches!(Pipeline::new(0), Err(PipelineError::Configuration { .. })));

    let config = PipelineConfig {
        capacity: -3,
        ..PipelineConfig::default()
    };
    assert!(matches!(Pipeline::from_config(&config), Err(PipelineError::Configuration { .. })));
}

#[test]
fn test_from_config_applies_strategy() {
    let config = PipelineConfig {
        capacity: 7,
        strategy: QueueStrategy::ConditionGated,
        ..PipelineConfig::default()
    };
    let mut pipeline = Pipeline::from_config(&config).unwrap();
    assert_eq!(pipeline.capacity(), 7);
    assert_eq!(pipeline.strategy(), QueueStrategy::ConditionGated);
    assert!(pipeline.run(3).unwrap().integrity_passed());
}
