use std::error::Error;
use std::fmt;
use std::fmt::Display;
use std::fmt::Formatter;
use std::io;
use std::path::Path;
use std::path::PathBuf;

#[derive(Debug)]
pub enum TransmuteError {
  Read { path: PathBuf, source: io::Error },
  Write { path: PathBuf, source: io::Error },
  Document { path: PathBuf, source: serde_yaml::Error },
}

impl TransmuteError {
  pub fn read(path: &Path, source: io::Error) -> Self {
    TransmuteError::Read {
      path: path.to_owned(),
      source,
    }
  }

  pub fn write(path: &Path, source: io::Error) -> Self {
    TransmuteError::Write {
      path: path.to_owned(),
      source,
    }
  }

  pub fn document(path: &Path, source: serde_yaml::Error) -> Self {
    TransmuteError::Document {
      path: path.to_owned(),
      source,
    }
  }
}

impl Display for TransmuteError {
  fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
    match self {
      TransmuteError::Read { path, source } => {
        write!(f, "failed to read {}: {}", path.display(), source)
      }
      TransmuteError::Write { path, source } => {
        write!(f, "failed to write {}: {}", path.display(), source)
      }
      TransmuteError::Document { path, source } => {
        write!(f, "malformed mapping document {}: {}", path.display(), source)
      }
    }
  }
}

impl Error for TransmuteError {
  fn source(&self) -> Option<&(dyn Error + 'static)> {
    match self {
      TransmuteError::Read { source, .. } | TransmuteError::Write { source, .. } => Some(source),
      TransmuteError::Document { source, .. } => Some(source),
    }
  }
}

pub type TransmuteResult<T> = Result<T, TransmuteError>;
