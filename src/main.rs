mod app;

use std::time::Duration;

use anyhow::{Context, Result, anyhow, ensure};
use clap::Parser;
use tracing_subscriber::EnvFilter;
use trustgraph_radial::trust::{
    DEFAULT_SERVICE_URL, DataFetcher, RadialLayoutConfig, SceneConfig, build_scene,
    load_neighborhood,
};

#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Args {
    /// Public key of the peer to center the graph on.
    #[arg(long)]
    focus: String,

    /// Base URL of the trust service; `/display` is appended.
    #[arg(long, env = "TRUSTGRAPH_SERVICE_URL", default_value = DEFAULT_SERVICE_URL)]
    service_url: String,

    #[arg(long, default_value_t = 10)]
    timeout_secs: u64,

    #[arg(long, default_value_t = 15.0)]
    min_radius: f64,

    #[arg(long, default_value_t = 25.0)]
    max_radius: f64,

    #[arg(long, default_value_t = 2.0)]
    stroke_min: f64,

    #[arg(long, default_value_t = 10.0)]
    stroke_max: f64,

    #[arg(long, default_value_t = 220.0)]
    ring_spacing: f64,

    /// Fetch once, print the laid-out scene as JSON and exit.
    #[arg(long)]
    dump: bool,
}

impl Args {
    fn scene_config(&self) -> Result<SceneConfig> {
        ensure!(
            self.min_radius <= self.max_radius,
            "--min-radius ({}) exceeds --max-radius ({})",
            self.min_radius,
            self.max_radius
        );
        ensure!(
            self.stroke_min <= self.stroke_max,
            "--stroke-min ({}) exceeds --stroke-max ({})",
            self.stroke_min,
            self.stroke_max
        );
        ensure!(
            self.ring_spacing > 0.0,
            "--ring-spacing must be positive, got {}",
            self.ring_spacing
        );

        Ok(SceneConfig {
            layout: RadialLayoutConfig {
                ring_spacing: self.ring_spacing,
                ..RadialLayoutConfig::default()
            },
            min_radius: self.min_radius,
            max_radius: self.max_radius,
            stroke_width_min: self.stroke_min,
            stroke_width_max: self.stroke_max,
        })
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn main() -> Result<()> {
    init_tracing();

    let args = Args::parse();
    let scene_config = args.scene_config()?;
    let fetcher = DataFetcher::new(&args.service_url, Duration::from_secs(args.timeout_secs))
        .context("cannot reach the trust service from this environment")?;
    tracing::info!(focus = %args.focus, service = %args.service_url, "starting");

    if args.dump {
        let graph = load_neighborhood(&fetcher, &args.focus)?;
        let scene = build_scene(graph.into(), &scene_config, |_| true);
        let json = serde_json::to_string_pretty(&scene).context("failed to serialize scene")?;
        println!("{json}");
        return Ok(());
    }

    let options = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default().with_inner_size([1440.0, 920.0]),
        ..Default::default()
    };

    eframe::run_native(
        "trustgraph",
        options,
        Box::new(move |cc| {
            Ok(Box::new(app::TrustGraphApp::new(
                cc,
                fetcher,
                scene_config,
                args.focus,
            )))
        }),
    )
    .map_err(|error| anyhow!("viewer exited with an error: {error}"))
}
