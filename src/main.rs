use std::path::PathBuf;

use clap::Parser;
use eframe::{NativeOptions, egui};

use specviz::app::VisualizerApp;
use specviz::audio::devices::list_input_devices;
use specviz::config::{AnimationSettings, Settings, VisualizerMode};

#[derive(Parser)]
#[command(name = "specviz", about = "Real-time audio spectrum visualizer")]
struct Args {
    /// Visualization mode
    #[arg(short, long, value_enum)]
    mode: Option<VisualizerMode>,

    /// Number of frequency bars
    #[arg(long, value_name = "N")]
    bars: Option<usize>,

    /// Audio device name fragment or index
    #[arg(short, long, value_name = "NAME")]
    device: Option<String>,

    /// List available input devices and exit
    #[arg(long)]
    list_devices: bool,

    /// Disable ambient particle effects
    #[arg(long)]
    no_particles: bool,

    /// Settings file path
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    if args.list_devices {
        let host = cpal::default_host();
        for (i, name) in list_input_devices(&host).iter().enumerate() {
            println!("{i}: {name}");
        }
        return Ok(());
    }

    let config_path = args
        .config
        .clone()
        .unwrap_or_else(|| PathBuf::from("specviz.json"));
    let mut settings = if config_path.exists() {
        Settings::load(&config_path)?
    } else {
        Settings::default()
    };

    if let Some(mode) = args.mode {
        settings.mode = mode;
        settings.animation = AnimationSettings::for_mode(mode);
    }
    if let Some(bars) = args.bars {
        settings.bar_count = bars;
    }
    if let Some(device) = args.device {
        settings.audio.device = Some(device);
    }
    if args.no_particles {
        settings.particles.enabled = false;
    }
    settings.validate()?;

    let options = NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([900.0, 420.0])
            .with_title("Spectrum Visualizer"),
        ..Default::default()
    };

    eframe::run_native(
        "Spectrum Visualizer",
        options,
        Box::new(move |cc| {
            VisualizerApp::new(cc, settings, config_path)
                .map(|app| Box::new(app) as Box<dyn eframe::App>)
                .map_err(Into::into)
        }),
    )
    .map_err(|e| anyhow::anyhow!(e.to_string()))?;

    Ok(())
}
