use std::path::PathBuf;

use ember_assets::DecodeError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ImportError {
    #[error("failed to import {}: {source}", path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: DecodeError,
    },
}
