// config.rs — command line and viewer.json

use crate::catalog::{ImageCatalog, ImageId, DEFAULT_IMAGES, DEFAULT_INITIAL_IMAGE};
use clap::Parser;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Initial sky rotation about the vertical axis, in degrees.
pub const DEFAULT_INITIAL_YAW: f32 = 160.0;

#[derive(Parser, Debug, Default)]
#[command(name = "panorama_tour", about = "Auto-rotating 360° panorama tour")]
pub struct Cli {
    /// Path to a viewer.json configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// UI language (en, zh-Hans)
    #[arg(short, long)]
    pub lang: Option<String>,

    /// Panorama to show first; added to the catalog if missing
    #[arg(short, long)]
    pub image: Option<String>,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid configuration: {0}")]
    Json(#[from] serde_json::Error),

    #[error("the image catalog is empty")]
    EmptyCatalog,

    #[error("initial image {0} is not in the catalog")]
    UnknownInitialImage(String),
}

pub type Result<T> = std::result::Result<T, ConfigError>;

/// Contents of `viewer.json`. Every field is optional.
///
/// Without `initial_image` the tour opens on the built-in default image if
/// the catalog has it, else on the first catalog entry.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ViewerConfig {
    pub images: Vec<String>,
    pub initial_image: Option<String>,
    pub initial_yaw_degrees: f32,
    pub language: Option<String>,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            images: DEFAULT_IMAGES.iter().map(|s| s.to_string()).collect(),
            initial_image: None,
            initial_yaw_degrees: DEFAULT_INITIAL_YAW,
            language: None,
        }
    }
}

impl ViewerConfig {
    pub fn from_json_str(text: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&text)
    }

    /// Explicit path if given, else `assets/viewer.json` if present, else
    /// the built-in tour.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::from_file(path);
        }
        match crate::i18n::find_asset(Path::new("viewer.json")) {
            Some(path) => {
                log::info!("using configuration {}", path.display());
                Self::from_file(&path)
            }
            None => Ok(Self::default()),
        }
    }

    /// Applies command-line overrides on top of the file.
    pub fn with_cli(mut self, cli: &Cli) -> Self {
        if let Some(image) = &cli.image {
            if !self.images.contains(image) {
                self.images.push(image.clone());
            }
            self.initial_image = Some(image.clone());
        }
        if let Some(lang) = &cli.lang {
            self.language = Some(lang.clone());
        }
        self
    }

    pub fn catalog(&self) -> ImageCatalog {
        ImageCatalog::new(self.images.iter().map(String::as_str))
    }

    pub fn initial_image(&self) -> ImageId {
        let source = match &self.initial_image {
            Some(image) => image.as_str(),
            None if self.images.iter().any(|s| s == DEFAULT_INITIAL_IMAGE) => DEFAULT_INITIAL_IMAGE,
            None => self.images.first().map_or(DEFAULT_INITIAL_IMAGE, String::as_str),
        };
        ImageId::new(source)
    }

    fn validate(&self) -> Result<()> {
        if self.images.is_empty() {
            return Err(ConfigError::EmptyCatalog);
        }
        if let Some(initial) = &self.initial_image {
            if !self.images.contains(initial) {
                return Err(ConfigError::UnknownInitialImage(initial.clone()));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_object_means_defaults() {
        let config = ViewerConfig::from_json_str("{}").unwrap();
        assert_eq!(config, ViewerConfig::default());
        assert_eq!(config.catalog().len(), 5);
        assert_eq!(config.initial_image().source(), DEFAULT_INITIAL_IMAGE);
    }

    #[test]
    fn custom_tour() {
        let config = ViewerConfig::from_json_str(
            r#"{ "images": ["a.jpg", "b.jpg"], "initial_image": "b.jpg", "language": "zh-Hans" }"#,
        )
        .unwrap();
        assert_eq!(config.catalog().len(), 2);
        assert_eq!(config.initial_image().source(), "b.jpg");
        assert_eq!(config.language.as_deref(), Some("zh-Hans"));
    }

    #[test]
    fn rejects_bad_catalogs() {
        assert!(matches!(
            ViewerConfig::from_json_str(r#"{ "images": [] }"#),
            Err(ConfigError::EmptyCatalog)
        ));
        assert!(matches!(
            ViewerConfig::from_json_str(r#"{ "images": ["a.jpg"], "initial_image": "b.jpg" }"#),
            Err(ConfigError::UnknownInitialImage(_))
        ));
        assert!(matches!(
            ViewerConfig::from_json_str(r#"{ "imgs": [] }"#),
            Err(ConfigError::Json(_))
        ));
    }

    #[test]
    fn missing_initial_image_falls_back_to_first_entry() {
        let config = ViewerConfig::from_json_str(r#"{ "images": ["a.jpg", "b.jpg"] }"#).unwrap();
        assert_eq!(config.initial_image().source(), "a.jpg");

        let config =
            ViewerConfig::from_json_str(r#"{ "images": ["a.jpg", "images/kitchen2.jpg"] }"#).unwrap();
        assert_eq!(config.initial_image().source(), DEFAULT_INITIAL_IMAGE);
    }

    #[test]
    fn missing_file_reports_path() {
        let err = ViewerConfig::from_file(Path::new("does/not/exist.json")).unwrap_err();
        assert!(err.to_string().contains("does/not/exist.json"));
    }

    #[test]
    fn cli_image_joins_catalog_and_becomes_initial() {
        let cli = Cli {
            image: Some("extra.jpg".to_string()),
            ..Cli::default()
        };
        let config = ViewerConfig::default().with_cli(&cli);
        assert!(config.catalog().contains(&ImageId::from("extra.jpg")));
        assert_eq!(config.initial_image().source(), "extra.jpg");
    }
}
