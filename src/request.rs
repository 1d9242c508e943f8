//! Move request construction and validation.
//!
//! The builder mirrors a loosely typed call site: every field may be absent,
//! and `build()` reports the first missing or malformed one.

use std::path::{Path, PathBuf};

use crate::errors::MoveError;

/// A validated batch: move `names` (basenames) from `from` into `to`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveRequest {
    from: PathBuf,
    to: PathBuf,
    names: Vec<String>,
}

impl MoveRequest {
    pub fn builder() -> MoveRequestBuilder {
        MoveRequestBuilder::default()
    }

    pub fn from_dir(&self) -> &Path {
        &self.from
    }

    pub fn to_dir(&self) -> &Path {
        &self.to
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Source paths of the top-level entries, in request order.
    pub fn sources(&self) -> impl Iterator<Item = PathBuf> + '_ {
        self.names.iter().map(|n| self.from.join(n))
    }
}

#[derive(Debug, Default, Clone)]
pub struct MoveRequestBuilder {
    from: Option<PathBuf>,
    to: Option<PathBuf>,
    names: Option<Vec<String>>,
}

impl MoveRequestBuilder {
    pub fn from(mut self, from: impl Into<PathBuf>) -> Self {
        self.from = Some(from.into());
        self
    }

    pub fn to(mut self, to: impl Into<PathBuf>) -> Self {
        self.to = Some(to.into());
        self
    }

    pub fn names<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.names = Some(names.into_iter().map(Into::into).collect());
        self
    }

    /// Validate in order `from`, `to`, `names`; first violation wins.
    pub fn build(self) -> Result<MoveRequest, MoveError> {
        let from = self
            .from
            .filter(|p| !p.as_os_str().is_empty())
            .ok_or(MoveError::FromNotString)?;
        let to = self
            .to
            .filter(|p| !p.as_os_str().is_empty())
            .ok_or(MoveError::ToNotString)?;
        let names = self.names.ok_or(MoveError::NamesNotArray)?;
        if names.is_empty() {
            return Err(MoveError::EmptyNames);
        }
        if let Some(bad) = names.iter().find(|n| !is_basename(n)) {
            return Err(MoveError::InvalidName(bad.clone()));
        }
        Ok(MoveRequest { from, to, names })
    }
}

/// A single path component that stays inside its parent.
fn is_basename(name: &str) -> bool {
    !name.is_empty()
        && name != "."
        && name != ".."
        && !name.contains('/')
        && !(cfg!(windows) && name.contains('\\'))
}
