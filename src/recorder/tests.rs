use std::time::Duration;

use super::{Recorder, Sample};
use crate::error::{MeterError, MeterResult, StatsError};

fn close(left: f64, right: f64) -> bool {
    (left - right).abs() < 1e-9
}

#[test]
fn measure_returns_the_call_value_and_appends_a_sample() -> MeterResult<()> {
    let recorder = Recorder::new();
    let value = recorder.measure("slow_add", || {
        std::thread::sleep(Duration::from_millis(2));
        40u64.saturating_add(2)
    });
    if value != 42 {
        return Err(MeterError::stats("Expected the measured call value to pass through"));
    }
    if recorder.sample_count("slow_add") != 1 {
        return Err(MeterError::stats("Expected exactly one sample"));
    }
    let samples = recorder
        .samples("slow_add")
        .ok_or_else(|| MeterError::stats("Expected samples for slow_add"))?;
    let first = samples
        .first()
        .ok_or_else(|| MeterError::stats("Expected a first sample"))?;
    if first.duration_secs < 0.001 {
        return Err(MeterError::stats(format!(
            "Expected a measurable duration, got {}",
            first.duration_secs
        )));
    }
    if first.memory_kb < 0.0 {
        return Err(MeterError::stats("Expected a non-negative memory reading"));
    }
    Ok(())
}

#[test]
fn wrapped_closures_accumulate_under_one_name() -> MeterResult<()> {
    let recorder = Recorder::new();
    let mut counter = 0u32;
    let mut wrapped = recorder.wrap("ticks", || {
        counter = counter.saturating_add(1);
        counter
    });
    for _ in 0..5 {
        wrapped();
    }
    drop(wrapped);
    if counter != 5 {
        return Err(MeterError::stats("Expected the wrapped closure to run 5 times"));
    }
    if recorder.sample_count("ticks") != 5 {
        return Err(MeterError::stats(format!(
            "Expected 5 samples, got {}",
            recorder.sample_count("ticks")
        )));
    }
    Ok(())
}

#[test]
fn same_name_merges_and_first_call_order_is_kept() -> MeterResult<()> {
    let recorder = Recorder::new();
    recorder.measure("alpha", || ());
    recorder.measure("beta", || ());
    recorder.measure("alpha", || ());
    if recorder.sample_count("alpha") != 2 {
        return Err(MeterError::stats("Expected both alpha calls to merge"));
    }
    let names = recorder.function_names();
    if names != ["alpha", "beta"] {
        return Err(MeterError::stats(format!("Unexpected name order: {:?}", names)));
    }
    Ok(())
}

#[test]
fn concurrent_measurements_keep_every_sample() -> MeterResult<()> {
    let recorder = Recorder::new();
    std::thread::scope(|scope| {
        for _ in 0..4 {
            let handle = recorder.clone();
            drop(scope.spawn(move || {
                for _ in 0..25 {
                    handle.measure("shared", || 1u64);
                }
            }));
        }
    });
    if recorder.sample_count("shared") != 100 {
        return Err(MeterError::stats(format!(
            "Expected 100 samples, got {}",
            recorder.sample_count("shared")
        )));
    }
    Ok(())
}

#[test]
fn panicking_calls_leave_no_sample_and_do_not_wedge_the_recorder() -> MeterResult<()> {
    let recorder = Recorder::new();
    let outcome = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
        recorder.measure("explodes", || -> u32 {
            std::panic::panic_any("deliberate test panic")
        })
    }));
    if outcome.is_ok() {
        return Err(MeterError::stats("Expected the measured call to panic"));
    }
    if recorder.sample_count("explodes") != 0 {
        return Err(MeterError::stats("Expected no sample from the panicking call"));
    }

    let value = recorder.measure("explodes", || 7u32);
    if value != 7 {
        return Err(MeterError::stats("Expected the recorder to keep working"));
    }
    if recorder.sample_count("explodes") != 1 {
        return Err(MeterError::stats("Expected one sample after the recovery call"));
    }
    Ok(())
}

#[test]
fn err_returning_calls_are_completed_and_recorded() -> MeterResult<()> {
    let recorder = Recorder::new();
    let outcome: Result<u32, String> =
        recorder.measure("fallible", || Err("backend unavailable".to_owned()));
    match outcome {
        Err(message) => {
            if message != "backend unavailable" {
                return Err(MeterError::stats(format!("Unexpected error value: {}", message)));
            }
        }
        Ok(value) => {
            return Err(MeterError::stats(format!(
                "Expected the error value to pass through, got {}",
                value
            )));
        }
    }
    if recorder.sample_count("fallible") != 1 {
        return Err(MeterError::stats(format!(
            "Expected the completed call to leave one sample, got {}",
            recorder.sample_count("fallible")
        )));
    }
    Ok(())
}

#[test]
fn recorded_samples_round_through_the_accessors() -> MeterResult<()> {
    let recorder = Recorder::with_scaler(500.0);
    if !close(recorder.scaler(), 500.0) {
        return Err(MeterError::stats("Expected the configured scaler"));
    }
    recorder.record("seeded", Sample::new(0.25, 64.0));
    let samples = recorder
        .samples("seeded")
        .ok_or_else(|| MeterError::stats("Expected samples for seeded"))?;
    let first = samples
        .first()
        .ok_or_else(|| MeterError::stats("Expected one sample"))?;
    if !close(first.duration_secs, 0.25) || !close(first.memory_kb, 64.0) {
        return Err(MeterError::stats("Expected the recorded sample values back"));
    }
    Ok(())
}

#[test]
fn summarize_rejects_unknown_names() -> MeterResult<()> {
    let recorder = Recorder::new();
    match recorder.summarize("missing") {
        Err(StatsError::NoSamples { name }) => {
            if name != "missing" {
                return Err(MeterError::stats(format!("Unexpected name in error: {}", name)));
            }
            Ok(())
        }
        Ok(summary) => Err(MeterError::stats(format!(
            "Expected an error, got a summary with count {}",
            summary.count
        ))),
        Err(other) => Err(MeterError::stats(format!("Unexpected error: {}", other))),
    }
}
