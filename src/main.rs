mod app;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use mindmap_view::config::{DEFAULT_CLICK_THRESHOLD, DEFAULT_FONT_SIZE, DEFAULT_MAX_WIDTH, PixelRatio, ViewerSettings};
use mindmap_view::view::SearchMode;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Args {
    /// Tree JSON: `{ text, nodes }` or an array of test records.
    tree: PathBuf,
    #[arg(long, default_value_t = DEFAULT_MAX_WIDTH)]
    max_width: f32,
    #[arg(long, default_value_t = DEFAULT_FONT_SIZE)]
    font_size: f32,
    /// Initial search query.
    #[arg(long, default_value = "")]
    search: String,
    /// Fuzzy search instead of substring.
    #[arg(long)]
    fuzzy: bool,
    /// Surface pixels per screen point, or `auto`.
    #[arg(long, default_value = "2", value_parser = parse_pixel_ratio)]
    pixel_ratio: PixelRatio,
    #[arg(long, default_value_t = DEFAULT_CLICK_THRESHOLD)]
    click_threshold: f32,
}

impl Args {
    fn settings(&self) -> ViewerSettings {
        ViewerSettings {
            max_width: self.max_width,
            font_size: self.font_size,
            pixel_ratio: self.pixel_ratio,
            click_threshold: self.click_threshold,
            initial_search: self.search.clone(),
            search_mode: if self.fuzzy {
                SearchMode::Fuzzy
            } else {
                SearchMode::Substring
            },
            ..ViewerSettings::default()
        }
    }
}

fn parse_pixel_ratio(raw: &str) -> Result<PixelRatio, String> {
    raw.parse::<PixelRatio>().map_err(|error| error.to_string())
}

fn main() -> Result<()> {
    init_tracing()?;

    let args = Args::parse();
    let settings = args.settings();
    settings.validate().context("invalid viewer settings")?;
    info!(
        tree = %args.tree.display(),
        max_width = settings.max_width,
        font_size = settings.font_size,
        pixel_ratio = %settings.pixel_ratio,
        "starting viewer"
    );

    let options = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default().with_inner_size([1440.0, 920.0]),
        ..Default::default()
    };

    let tree_path = args.tree;
    eframe::run_native(
        "mindmap-view",
        options,
        Box::new(move |cc| Ok(Box::new(app::MindmapApp::new(cc, tree_path, settings)))),
    )
    .map_err(|error| anyhow::anyhow!("viewer exited with an error: {error}"))
}

fn init_tracing() -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,mindmap_view=debug"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .compact()
        .try_init()
        .map_err(|error| anyhow::anyhow!("failed to initialize tracing subscriber: {error}"))
}
