use std::{io, path::PathBuf, result};

/// This is a specialized Result, similar to std::io::Result
pub type Result<T> = result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
  /// Input is not a class file: too short to hold a header, or wrong magic.
  /// The header operations never fail in any other way.
  #[error("Invalid class file format: {reason}")]
  InvalidFormat { reason: String },

  /// Reading or writing a file or directory during a tree walk failed.
  #[error("I/O error on {}: {source}", .path.display())]
  Io {
    path: PathBuf,
    #[source]
    source: io::Error,
  },
}

impl Error {
  pub fn invalid_format<T>(reason: &str) -> Result<T> {
    Err(Error::InvalidFormat {
      reason: reason.to_string(),
    })
  }

  pub(crate) fn io(path: impl Into<PathBuf>) -> impl FnOnce(io::Error) -> Error {
    let path = path.into();
    move |source| Error::Io { path, source }
  }

  pub fn is_invalid_format(&self) -> bool {
    matches!(self, Error::InvalidFormat { .. })
  }
}
