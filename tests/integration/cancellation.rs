//! Cancellation Tests
//!
//! A run cancelled from another thread must return promptly with a
//! cancellation error, keep its partial results and leave the pipeline
//! reusable.

use std::thread;
use std::time::{Duration, Instant};

use prodcon::{Pipeline, PipelineError, QueueStrategy, TaskDelays};

fn slow_pipeline(strategy: QueueStrategy) -> Pipeline {
    Pipeline::with_strategy(2, strategy)
        .unwrap()
        .with_delays(TaskDelays::new(Duration::from_millis(10), Duration::from_millis(20)))
}

#[test]
fn test_cancel_interrupts_run() {
    for strategy in QueueStrategy::ALL {
        let mut pipeline = slow_pipeline(strategy);
        let handle = pipeline.cancel_handle();

        let canceller = thread::spawn(move || {
            thread::sleep(Duration::from_millis(100));
            handle.cancel();
        });

        let started = Instant::now();
        let result = pipeline.run(200);
        canceller.join().unwrap();

        assert!(
            matches!(result, Err(PipelineError::Cancelled { .. })),
            "{} run was not cancelled",
            strategy
        );
        assert!(result.unwrap_err().is_cancellation());
        assert!(started.elapsed() < Duration::from_secs(2), "{} cancellation was slow", strategy);
    }
}

#[test]
fn test_partial_results_are_a_prefix() {
    for strategy in QueueStrategy::ALL {
        let mut pipeline = slow_pipeline(strategy);
        let handle = pipeline.cancel_handle();

        let canceller = thread::spawn(move || {
            thread::sleep(Duration::from_millis(120));
            handle.cancel();
        });
        let result = pipeline.run(200);
        canceller.join().unwrap();
        assert!(result.is_err());

        let destination = pipeline.destination_container();
        let stats = pipeline.stats_snapshot();
        assert!(destination.len() < 200);
        assert_eq!(destination, (1..=destination.len() as i64).collect::<Vec<_>>());
        assert_eq!(stats.items_consumed, destination.len() as u64);
        assert!(stats.items_produced >= stats.items_consumed);
        assert!(pipeline.last_report().is_none());
    }
}

#[test]
fn test_pipeline_reusable_after_cancel() {
    for strategy in QueueStrategy::ALL {
        let mut pipeline = slow_pipeline(strategy);
        let handle = pipeline.cancel_handle();

        let canceller = thread::spawn({
            let handle = handle.clone();
            move || {
                thread::sleep(Duration::from_millis(60));
                handle.cancel();
            }
        });
        assert!(pipeline.run(200).is_err());
        canceller.join().unwrap();
        assert!(handle.is_cancelled());

        let mut pipeline = pipeline.with_delays(TaskDelays::none());
        let report = pipeline.run(10).unwrap();
        assert!(!handle.is_cancelled());
        assert_eq!(pipeline.destination_container(), (1..=10).collect::<Vec<i64>>());
        assert!(report.integrity_passed());
    }
}

#[test]
fn test_cancel_before_run_is_cleared() {
    let mut pipeline = Pipeline::new(3).unwrap();
    pipeline.cancel_handle().cancel();

    let report = pipeline.run(5).unwrap();
    assert!(report.integrity_passed());
}
