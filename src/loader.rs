// loader.rs — background panorama decoding

use image::io::Reader as ImageReader;
use image::{GenericImageView, RgbaImage};
use panorama_tour::i18n;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::sync::mpsc::Sender;
use std::thread;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("{source_path}: {err}")]
    Open {
        source_path: String,
        #[source]
        err: std::io::Error,
    },

    #[error("{source_path}: {err}")]
    Decode {
        source_path: String,
        #[source]
        err: image::ImageError,
    },
}

/// Outcome of one background load, tagged with the source it was requested
/// under so stale results can be told apart.
pub struct LoadedImage {
    pub source: String,
    pub result: Result<RgbaImage, LoadError>,
}

/// Resolves a catalog source to a file: as given, else next to the
/// executable.
pub fn resolve(source: &str) -> PathBuf {
    let direct = PathBuf::from(source.trim_start_matches('/'));
    if direct.exists() {
        return direct;
    }
    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(|dir| dir.join(&direct)))
        .filter(|p| p.exists())
        .unwrap_or(direct)
}

pub fn load_rgba(source: &str, path: &Path) -> Result<RgbaImage, LoadError> {
    let file = File::open(path).map_err(|err| LoadError::Open {
        source_path: source.to_string(),
        err,
    })?;

    let img = ImageReader::new(BufReader::new(file))
        .with_guessed_format()
        .map_err(image::ImageError::IoError)
        .and_then(|mut r| {
            r.no_limits();
            r.decode()
        })
        .map_err(|err| LoadError::Decode {
            source_path: source.to_string(),
            err,
        })?;

    let (w, h) = img.dimensions();
    log::info!(
        "{}",
        i18n::tr_with("log.image_loaded_size", &[("w", w.to_string()), ("h", h.to_string())])
    );
    Ok(img.to_rgba8())
}

/// Decodes `source` on a worker thread and sends the outcome to `tx`.
pub fn spawn_load(source: String, tx: Sender<LoadedImage>) {
    thread::spawn(move || {
        let path = resolve(&source);
        log::info!(
            "{}",
            i18n::tr_with("log.loading_image_bg", &[("path", path.display().to_string())])
        );

        let result = load_rgba(&source, &path);
        if tx.send(LoadedImage { source, result }).is_err() {
            log::error!("{}", i18n::tr("error.send_to_main_failed"));
        }
    });
}
