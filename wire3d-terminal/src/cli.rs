use std::path::PathBuf;

use clap::Parser;

use crate::config::Config;

/// Rotating ASCII wireframe renderer for the terminal.
#[derive(Parser, Debug)]
#[command(name = "wire3d", version, about, long_about = None)]
pub struct Cli {
    /// OBJ model to render. Falls back to a unit cube when absent or unreadable.
    pub model: Option<PathBuf>,

    /// TOML configuration file.
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Viewport width in characters (overrides the config).
    #[arg(long)]
    pub width: Option<u16>,

    /// Viewport height in characters (overrides the config).
    #[arg(long)]
    pub height: Option<u16>,

    /// Stop after this many frames instead of running until interrupted.
    #[arg(long)]
    pub frames: Option<u64>,

    /// Enable debug logging.
    #[arg(short, long)]
    pub verbose: bool,

    /// Log level: error, warn, info, debug, trace.
    #[arg(long, default_value = "info")]
    pub log_level: String,
}

impl Cli {
    /// Apply command-line overrides on top of a loaded config
    pub fn apply(&self, config: &mut Config) {
        if let Some(width) = self.width {
            config.camera.width = width;
        }
        if let Some(height) = self.height {
            config.camera.height = height;
        }
    }

    pub fn log_filter(&self) -> &str {
        if self.verbose {
            "debug"
        } else {
            &self.log_level
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_arguments() {
        let cli = Cli::try_parse_from(["wire3d"]).unwrap();
        assert!(cli.model.is_none());
        assert!(cli.frames.is_none());
        assert_eq!(cli.log_filter(), "info");
    }

    #[test]
    fn test_model_and_overrides() {
        let cli = Cli::try_parse_from([
            "wire3d", "teapot.obj", "--width", "120", "--frames", "10", "-v",
        ])
        .unwrap();
        assert_eq!(cli.model, Some(PathBuf::from("teapot.obj")));
        assert_eq!(cli.frames, Some(10));
        assert_eq!(cli.log_filter(), "debug");

        let mut config = Config::default();
        cli.apply(&mut config);
        assert_eq!(config.camera.width, 120);
        assert_eq!(config.camera.height, 40);
    }

    #[test]
    fn test_invalid_width_rejected() {
        assert!(Cli::try_parse_from(["wire3d", "--width", "wide"]).is_err());
    }
}
