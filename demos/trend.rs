//! Renders a trend chart from previously saved runs, with mean and median
//! reference lines.
//!
//! Run `cargo run --example instrument` a few times first, then
//! `cargo run --example trend`.

use callmeter::charts;
use callmeter::config::Settings;
use callmeter::error::MeterResult;
use callmeter::logger;

#[tokio::main]
async fn main() -> MeterResult<()> {
    logger::init_logging(false, false);

    let settings = Settings {
        show_mean: true,
        show_median: true,
        ..Settings::default()
    };
    let options = settings.trend_options();
    match charts::plot_latest_runs(&settings.data_dir, &settings.chart_output, &options).await? {
        Some(path) => println!("Chart written to {}", path.display()),
        None => println!("No runs recorded yet under {}", settings.data_dir.display()),
    }
    Ok(())
}
