//! Terminal monitor for X-Plane UDP telemetry
//!
//! Usage:
//!   xplane-monitor                          # Print the channel dump as it changes
//!   xplane-monitor --config monitor.yaml    # Use a config file
//!   xplane-monitor --simulate               # Replay bundled sample packets
//!   xplane-monitor --chart 17 --series 3    # Strip chart of pitch, roll, heading

use clap::Parser;
use futures::StreamExt;
use std::path::PathBuf;
use std::time::Duration;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use xplane_monitor::{
    MonitorConfig, MonitorConnection, Raster, StripChartBuffer, UpdateRate, XPlaneMonitor,
};

#[derive(Parser, Debug)]
#[command(name = "xplane-monitor", about = "Live monitor for X-Plane UDP telemetry")]
struct Args {
    /// Path to a YAML configuration file
    #[arg(short = 'f', long = "config", env = "XPLANE_MONITOR_CONFIG")]
    config: Option<PathBuf>,

    /// Replay the bundled sample packets instead of listening
    #[arg(long)]
    simulate: bool,

    /// Milliseconds between simulated packets
    #[arg(long, default_value_t = 100)]
    interval_ms: u64,

    /// Draw a strip chart of this DATA group instead of printing the dump
    #[arg(long)]
    chart: Option<i32>,

    /// Number of group fields to chart, starting at field 0
    #[arg(long, default_value_t = 3)]
    series: usize,

    /// Maximum redraws per second
    #[arg(long, default_value_t = 4)]
    rate: u32,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("xplane_monitor=info".parse()?))
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let config = match &args.config {
        Some(path) => MonitorConfig::load(path)?,
        None => MonitorConfig::default(),
    }
    .with_env_overrides()?;
    config.validate()?;

    let connection = if args.simulate {
        XPlaneMonitor::simulate(Duration::from_millis(args.interval_ms))
    } else {
        XPlaneMonitor::listen(&config).await?
    };

    println!("Monitoring. Press Ctrl+C to stop.");
    match args.chart {
        Some(group_id) => run_chart(&connection, &config, group_id, &args).await?,
        None => run_dump(&connection, args.rate).await,
    }

    connection.shutdown();
    info!(sequence = connection.current().sequence, "Monitor stopped");
    Ok(())
}

async fn run_dump(connection: &MonitorConnection, rate: u32) {
    let mut snapshots = connection.snapshots(UpdateRate::Max(rate));
    let mut shutdown = std::pin::pin!(tokio::signal::ctrl_c());

    loop {
        tokio::select! {
            _ = &mut shutdown => break,
            snapshot = snapshots.next() => match snapshot {
                Some(snapshot) => println!("{snapshot}\n"),
                None => break,
            },
        }
    }
}

async fn run_chart(
    connection: &MonitorConnection,
    config: &MonitorConfig,
    group_id: i32,
    args: &Args,
) -> anyhow::Result<()> {
    let geometry = config.chart.geometry();
    let mut chart = StripChartBuffer::new(geometry);
    let series = chart.configure(args.series);
    chart.set_scale(config.chart.max_amplitude)?;
    let mut raster = Raster::new(geometry);

    let mut samples = connection.group_samples(group_id, UpdateRate::Max(args.rate));
    let mut shutdown = std::pin::pin!(tokio::signal::ctrl_c());

    loop {
        let values = tokio::select! {
            _ = &mut shutdown => break,
            values = samples.next() => match values {
                Some(values) => values,
                None => break,
            },
        };

        if let Err(e) = chart.push_sample(&values[..series]) {
            warn!("Skipping sample: {}", e);
        }
        chart.advance_into(&mut raster);
        // Home the cursor and redraw in place
        print!("\x1b[H{}", raster.to_ascii());
    }
    Ok(())
}
