use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Why a strict load failed.
///
/// Only returned by [`Ini::try_open`](crate::Ini::try_open) and
/// [`Ini::try_from_reader`](crate::Ini::try_from_reader). The regular constructors treat these
/// conditions as an empty document instead.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to open {}", .path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to read data")]
    Read {
        #[source]
        source: io::Error,
    },
}
