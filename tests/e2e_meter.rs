use std::future::Future;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::time::Duration;

use tempfile::tempdir;

use callmeter::config::{Settings, load_settings};
use callmeter::recorder::{Recorder, Sample};
use callmeter::report;
use callmeter::store;
use callmeter::track;

fn close(left: f64, right: f64) -> bool {
    (left - right).abs() < 1e-9
}

fn run_async<F>(future: F) -> Result<(), String>
where
    F: Future<Output = Result<(), String>>,
{
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|err| format!("Failed to build runtime: {}", err))?;
    runtime.block_on(future)
}

#[test]
fn e2e_measure_report_save_and_plot() -> Result<(), String> {
    run_async(async {
        let dir = tempdir().map_err(|err| format!("tempdir failed: {}", err))?;
        let settings = Settings {
            data_dir: dir.path().join("performances"),
            chart_output: dir.path().join("charts").join("trend.png"),
            ..Settings::default()
        };

        let recorder = Recorder::with_scaler(settings.scaler);
        for _ in 0..3 {
            recorder.measure("busy_wait", || std::thread::sleep(Duration::from_millis(2)));
        }

        if track::tracking_active() {
            return Err("Tracking should be inactive without the tally allocator".to_owned());
        }
        let samples = recorder
            .samples("busy_wait")
            .ok_or_else(|| "Expected samples for busy_wait".to_owned())?;
        if samples.len() != 3 {
            return Err(format!("Expected 3 samples, got {}", samples.len()));
        }
        for sample in &samples {
            if sample.duration_secs <= 0.0 {
                return Err("Expected a positive duration".to_owned());
            }
            if sample.memory_kb.abs() > f64::EPSILON {
                return Err("Expected zero memory without the tally allocator".to_owned());
            }
        }

        let summary = recorder
            .summarize("busy_wait")
            .map_err(|err| format!("summarize failed: {}", err))?;
        if summary.count != 3 {
            return Err(format!("Unexpected count: {}", summary.count));
        }

        let lines = report::summary_lines(&recorder, 5);
        if !lines.iter().any(|line| line == "Function: busy_wait") {
            return Err(format!("Missing function header: {:?}", lines));
        }

        let chart = report::emit(&recorder, &settings, true)
            .await
            .map_err(|err| format!("emit failed: {}", err))?
            .ok_or_else(|| "Expected a chart path".to_owned())?;
        let chart_len = std::fs::metadata(&chart)
            .map_err(|err| format!("Missing chart: {}", err))?
            .len();
        if chart_len == 0 {
            return Err("Chart file is empty".to_owned());
        }

        let runs = store::latest_files(&settings.data_dir, 10)
            .await
            .map_err(|err| format!("latest_files failed: {}", err))?;
        if runs.len() != 1 {
            return Err(format!("Expected one run file, got {}", runs.len()));
        }
        let first = runs.first().ok_or_else(|| "Missing run file".to_owned())?;
        let loaded = store::load_samples(first)
            .await
            .map_err(|err| format!("load_samples failed: {}", err))?;
        if loaded.len() != 3 {
            return Err(format!("Expected 3 saved samples, got {}", loaded.len()));
        }
        Ok(())
    })
}

#[test]
fn e2e_concurrent_calls_keep_every_sample() -> Result<(), String> {
    let recorder = Recorder::new();
    std::thread::scope(|scope| {
        for _ in 0..4 {
            let worker = recorder.clone();
            drop(scope.spawn(move || {
                for _ in 0..25 {
                    worker.measure("spin", || std::hint::black_box(1_u64));
                }
            }));
        }
    });

    if recorder.sample_count("spin") != 100 {
        return Err(format!(
            "Expected 100 samples, got {}",
            recorder.sample_count("spin")
        ));
    }
    Ok(())
}

#[test]
fn e2e_panicking_calls_leave_the_meter_usable() -> Result<(), String> {
    let recorder = Recorder::new();
    let result = catch_unwind(AssertUnwindSafe(|| {
        recorder.measure("explode", || -> u64 { std::panic::panic_any("kaboom") })
    }));
    if result.is_ok() {
        return Err("Expected the panic to propagate".to_owned());
    }
    if recorder.sample_count("explode") != 0 {
        return Err("No sample should be recorded for a panicking call".to_owned());
    }

    recorder.measure("recovered", || 1_u64);
    if recorder.sample_count("recovered") != 1 {
        return Err("Expected measuring to keep working after a panic".to_owned());
    }
    Ok(())
}

#[test]
fn e2e_spike_filtering_and_memory_asymmetry() -> Result<(), String> {
    let recorder = Recorder::new();
    recorder.record("api_call", Sample::new(1.0, 10.0));
    recorder.record("api_call", Sample::new(1.0, 20.0));
    recorder.record("api_call", Sample::new(1.0, 30.0));
    recorder.record("api_call", Sample::new(1_000_000.0, 40.0));

    let summary = recorder
        .summarize("api_call")
        .map_err(|err| format!("summarize failed: {}", err))?;
    if summary.count != 3 {
        return Err(format!(
            "Expected the spike to be filtered out, count={}",
            summary.count
        ));
    }
    if !close(summary.total_time, 3.0) {
        return Err(format!("Unexpected total: {}", summary.total_time));
    }
    if !close(summary.mean_memory_kb, 25.0) {
        return Err(format!(
            "Memory should average over unfiltered samples, got {}",
            summary.mean_memory_kb
        ));
    }
    Ok(())
}

#[test]
fn e2e_config_file_drives_the_pipeline() -> Result<(), String> {
    run_async(async {
        let dir = tempdir().map_err(|err| format!("tempdir failed: {}", err))?;
        let config_path = dir.path().join("callmeter.toml");
        let data_dir = dir.path().join("history");
        let content = format!(
            "scaler = 10.0\nprecision = 2\ndata_dir = '{}'\n",
            data_dir.display()
        );
        std::fs::write(&config_path, content).map_err(|err| format!("write failed: {}", err))?;

        let settings =
            load_settings(Some(&config_path)).map_err(|err| format!("load failed: {}", err))?;
        if settings.precision != 2 {
            return Err(format!("Unexpected precision: {}", settings.precision));
        }

        let recorder = Recorder::with_scaler(settings.scaler);
        recorder.record("flaky", Sample::new(1.0, 5.0));
        recorder.record("flaky", Sample::new(1.0, 5.0));
        recorder.record("flaky", Sample::new(50.0, 5.0));

        let summary = recorder
            .summarize("flaky")
            .map_err(|err| format!("summarize failed: {}", err))?;
        if summary.count != 2 {
            return Err(format!(
                "Expected the configured scaler to filter the spike, count={}",
                summary.count
            ));
        }

        let lines = report::summary_lines(&recorder, settings.precision);
        if !lines.iter().any(|line| line == "  Total Time: 2.00") {
            return Err(format!("Expected two-decimal formatting: {:?}", lines));
        }

        if report::emit(&recorder, &settings, false)
            .await
            .map_err(|err| format!("emit failed: {}", err))?
            .is_some()
        {
            return Err("Expected no chart without show_plot".to_owned());
        }
        let runs = store::latest_files(&settings.data_dir, 10)
            .await
            .map_err(|err| format!("latest_files failed: {}", err))?;
        if runs.len() != 1 {
            return Err(format!("Expected one run file, got {}", runs.len()));
        }
        Ok(())
    })
}
