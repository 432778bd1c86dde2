/// wire3d - Rotating ASCII wireframe
///
/// Renders an OBJ model (or a unit cube) as a spinning, depth-shaded
/// wireframe. Controls:
///   - Q/ESC/Ctrl-C: Quit
use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;
use wire3d_core::Loader;
use wire3d_terminal::{cli::Cli, load_model_or_cube, Config, TerminalApp, TerminalDisplay};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(cli.log_filter()))
        .with_writer(std::io::stderr)
        .init();

    let mut config = match &cli.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };
    cli.apply(&mut config);
    config.validate().context("invalid configuration")?;

    let loader = Loader::new(config.model.target_size);
    let model = load_model_or_cube(cli.model.as_deref(), &loader);

    let mut display = TerminalDisplay::stdout(
        config.animation.clear_between_frames,
        config.animation.foreground()?,
    );
    let mut app = TerminalApp::new(model, &config)?.with_frame_limit(cli.frames);
    app.run(&mut display).context("terminal rendering failed")?;

    Ok(())
}
