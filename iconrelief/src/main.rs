//! `iconrelief` command line viewer

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use iconrelief::visualization::{Viewer, ViewerConfig};
use tracing::info;

/// Extrude an SVG icon and show it in an orbit viewer
#[derive(Debug, Parser)]
#[command(name = "iconrelief", version, about)]
struct Cli {
    /// SVG file to extrude [default: favicon.svg]
    svg: Option<PathBuf>,

    /// JSON configuration file; flags given here override it
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Extrusion depth in document units
    #[arg(long)]
    depth: Option<f32>,

    /// Largest dimension of the fitted icon
    #[arg(long)]
    target_size: Option<f32>,

    /// Keep SVG's downward Y axis (by default Y is negated so the icon renders upright)
    #[arg(long)]
    no_flip_y: bool,

    /// Apply orbit input immediately instead of easing it out
    #[arg(long)]
    no_damping: bool,

    /// Window width in logical pixels
    #[arg(long)]
    width: Option<u32>,

    /// Window height in logical pixels
    #[arg(long)]
    height: Option<u32>,
}

impl Cli {
    /// Defaults, then the config file, then flags
    fn resolve_config(&self) -> Result<ViewerConfig> {
        let mut config = match &self.config {
            Some(path) => ViewerConfig::from_file(path)
                .with_context(|| format!("failed to read config file {}", path.display()))?,
            None => ViewerConfig::default(),
        };

        if let Some(svg) = &self.svg {
            config.svg_path = svg.clone();
        }
        if let Some(depth) = self.depth {
            config.build.extrude.depth = depth;
        }
        if let Some(target_size) = self.target_size {
            config.build.fit.target_size = target_size;
        }
        if self.no_flip_y {
            config.build.shapes.flip_y = false;
        }
        if self.no_damping {
            config.controls.enable_damping = false;
        }
        if let Some(width) = self.width {
            config.window.width = width;
        }
        if let Some(height) = self.height {
            config.window.height = height;
        }

        config.validate().context("invalid configuration")?;
        Ok(config)
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let cli = Cli::parse();
    let config = cli.resolve_config()?;
    info!(
        svg = %config.svg_path.display(),
        depth = config.build.extrude.depth,
        target_size = config.build.fit.target_size,
        "configuration resolved"
    );

    Viewer::new(config)?.run().context("viewer failed")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_without_flags() {
        let cli = Cli::parse_from(["iconrelief"]);
        let config = cli.resolve_config().unwrap();
        assert_eq!(config, ViewerConfig::default());
    }

    #[test]
    fn test_flags_override_defaults() {
        let cli = Cli::parse_from([
            "iconrelief",
            "logo.svg",
            "--depth",
            "4",
            "--target-size",
            "200",
            "--no-flip-y",
            "--no-damping",
            "--width",
            "640",
            "--height",
            "480",
        ]);
        let config = cli.resolve_config().unwrap();

        assert_eq!(config.svg_path, PathBuf::from("logo.svg"));
        assert_eq!(config.build.extrude.depth, 4.0);
        assert_eq!(config.build.fit.target_size, 200.0);
        assert!(!config.build.shapes.flip_y);
        assert!(!config.controls.enable_damping);
        assert_eq!((config.window.width, config.window.height), (640, 480));
    }

    #[test]
    fn test_flags_override_config_file() {
        let path = std::env::temp_dir().join(format!("iconrelief-cli-{}.json", std::process::id()));
        std::fs::write(&path, r#"{ "svg_path": "from-file.svg", "build": { "extrude": { "depth": 7 } } }"#).unwrap();

        let cli = Cli::parse_from(["iconrelief".to_string(), "--config".to_string(), path.display().to_string()]);
        let config = cli.resolve_config().unwrap();
        assert_eq!(config.svg_path, PathBuf::from("from-file.svg"));
        assert_eq!(config.build.extrude.depth, 7.0);

        let cli = Cli::parse_from([
            "iconrelief".to_string(),
            "--config".to_string(),
            path.display().to_string(),
            "--depth".to_string(),
            "2".to_string(),
        ]);
        assert_eq!(cli.resolve_config().unwrap().build.extrude.depth, 2.0);

        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_invalid_flag_values_are_rejected() {
        let cli = Cli::parse_from(["iconrelief", "--depth", "0"]);
        assert!(cli.resolve_config().is_err());
    }

    #[test]
    fn test_missing_config_file_is_an_error() {
        let cli = Cli::parse_from(["iconrelief", "--config", "no/such/config.json"]);
        assert!(cli.resolve_config().is_err());
    }

    #[test]
    fn test_help_describes_default_y_flip() {
        use clap::CommandFactory;

        let help = Cli::command().render_help().to_string();
        let help = help.split_whitespace().collect::<Vec<_>>().join(" ");
        assert!(help.contains("--no-flip-y"));
        assert!(help.contains("by default Y is negated so the icon renders upright"));
    }
}
