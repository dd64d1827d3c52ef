use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Failed to load map: {0}")]
    Tiled(#[from] tiled::Error),

    #[error("Couldn't load the texture {path:?}: {message}")]
    Texture { path: PathBuf, message: String },

    #[error("Tileset {tileset} starts past the last representable gid")]
    GidOverflow { tileset: String },
}

impl Error {
    pub(crate) fn texture(path: PathBuf, err: macroquad::Error) -> Self {
        Error::Texture {
            path,
            message: err.to_string(),
        }
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
