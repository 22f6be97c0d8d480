mod app;

use std::path::PathBuf;

use clap::Parser;

#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Args {
    /// JSON file with the artist's connections.
    #[arg(long)]
    data: PathBuf,

    /// Focal artist name; overrides any name stored in the data file.
    #[arg(long)]
    artist: Option<String>,

    /// Optional layout tuning file (TOML).
    #[arg(long)]
    config: Option<PathBuf>,
}

fn main() -> eframe::Result<()> {
    tracing_subscriber::fmt::init();

    let args = Args::parse();
    let layout = match args.config.as_deref().map(artist_network::load_config) {
        Some(Ok(layout)) => layout,
        Some(Err(error)) => {
            tracing::warn!("{error:#}; using default layout settings");
            artist_network::LayoutConfig::default()
        }
        None => artist_network::LayoutConfig::default(),
    };

    let options = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default().with_inner_size([1280.0, 860.0]),
        ..Default::default()
    };

    let source = app::DataSource {
        path: args.data,
        artist: args.artist,
    };
    eframe::run_native(
        "artist-network",
        options,
        Box::new(move |cc| Ok(Box::new(app::ArtistNetworkApp::new(cc, source, layout)))),
    )
}
