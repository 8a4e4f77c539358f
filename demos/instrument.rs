//! Measures two small workloads, prints their summaries, saves the run,
//! and renders a trend chart.
//!
//! Run with `cargo run --example instrument`. Repeat a few times to give
//! the chart some history.

use callmeter::config::Settings;
use callmeter::error::MeterResult;
use callmeter::logger;
use callmeter::recorder::Recorder;
use callmeter::report;
use callmeter::track::TallyAllocator;

#[global_allocator]
static GLOBAL: TallyAllocator = TallyAllocator::system();

fn fibonacci(n: u64) -> u64 {
    if n < 2 {
        n
    } else {
        fibonacci(n.saturating_sub(1)).saturating_add(fibonacci(n.saturating_sub(2)))
    }
}

fn render_rows(rows: usize) -> String {
    let lines: Vec<String> = (0..rows).map(|index| format!("row {}", index)).collect();
    lines.join("\n")
}

#[tokio::main]
async fn main() -> MeterResult<()> {
    logger::init_logging(false, false);

    let settings = Settings::default();
    let recorder = Recorder::with_scaler(settings.scaler);

    let mut timed_fibonacci = recorder.wrap("fibonacci", || fibonacci(24));
    for _ in 0..12 {
        timed_fibonacci();
    }

    for rows in [64, 256, 1024] {
        let rendered = recorder.measure("render_rows", || render_rows(rows));
        tracing::debug!("Rendered {} bytes", rendered.len());
    }

    if let Some(path) = report::emit(&recorder, &settings, true).await? {
        tracing::info!("Trend chart written to {}", path.display());
    }
    Ok(())
}
