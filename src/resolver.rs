use crate::{
    canonical::{canonicalize, is_escaping, SEPARATOR},
    errors::{ReferenceError, ResourceError},
    location,
};
use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};

/// A base directory joined with a canonical name that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPath {
    canonical: String,
    path: PathBuf,
}

impl ResolvedPath {
    pub fn canonical(&self) -> &str { &self.canonical }
    pub fn path(&self) -> &Path { &self.path }
    pub fn into_path_buf(self) -> PathBuf { self.path }
}

/// Opens resources by relative name, confined to a trusted base directory.
#[derive(Debug, Clone)]
pub struct ResourceRoot {
    base: PathBuf,
}

impl ResourceRoot {
    pub fn new(base: impl Into<PathBuf>) -> Self { Self { base: base.into() } }

    /// Root bound to the directory of the running executable.
    pub fn install() -> Result<Self, ResourceError> {
        let dir = location::install_dir().map_err(|source| ResourceError::OpenFailed {
            name: "<install dir>".to_string(),
            source,
        })?;
        Ok(Self::new(dir))
    }

    pub fn base(&self) -> &Path { &self.base }

    /// Validate `name` and join it to the base directory without touching the
    /// filesystem.
    pub fn resolve(&self, name: &str) -> Result<ResolvedPath, ResourceError> {
        if name.is_empty() {
            return Err(ResourceError::InvalidArgument { reason: "name is empty", source: None });
        }
        let canonical = canonicalize(name);
        if is_escaping(&canonical) {
            tracing::warn!(name = name, canonical = %canonical, "rejected escaping resource name");
            return Err(ResourceError::InvalidArgument {
                reason: "name is not a relative reference",
                source: Some(ReferenceError::Escaping),
            });
        }
        check_reference(&canonical).map_err(|e| ResourceError::InvalidArgument {
            reason: "name is not a relative reference",
            source: Some(e),
        })?;

        let mut path = self.base.clone();
        for segment in canonical.split(SEPARATOR).filter(|s| !s.is_empty()) {
            path.push(segment);
        }
        tracing::debug!(name = name, path = %path.display(), "resolved resource");
        Ok(ResolvedPath { canonical, path })
    }

    /// Open `name` for reading. The returned file is positioned at offset 0 and
    /// owned by the caller.
    pub fn open(&self, name: &str) -> Result<File, ResourceError> {
        let resolved = self.resolve(name)?;
        let not_found = || ResourceError::NotFound { name: name.to_string() };
        let file = File::open(resolved.path()).map_err(|e| {
            if is_not_found(&e) {
                not_found()
            } else {
                ResourceError::OpenFailed { name: name.to_string(), source: e }
            }
        })?;
        let meta = file
            .metadata()
            .map_err(|e| ResourceError::OpenFailed { name: name.to_string(), source: e })?;
        if meta.is_dir() {
            return Err(not_found());
        }
        Ok(file)
    }

    /// [`ResourceRoot::open`] for callers holding an optional name; `None` is
    /// rejected like an empty name.
    pub fn open_opt(&self, name: Option<&str>) -> Result<File, ResourceError> {
        match name {
            Some(name) => self.open(name),
            None => Err(ResourceError::InvalidArgument { reason: "name is missing", source: None }),
        }
    }
}

/// Open `name` relative to the install directory.
pub fn open(name: &str) -> Result<File, ResourceError> {
    ResourceRoot::install()?.open(name)
}

fn check_reference(canonical: &str) -> Result<(), ReferenceError> {
    match canonical.char_indices().find(|(_, c)| c.is_control()) {
        Some((offset, _)) => Err(ReferenceError::ControlCharacter { offset }),
        None => Ok(()),
    }
}

// Missing file, missing parent directory and paths the OS refuses to interpret all
// count as "not there".
fn is_not_found(e: &io::Error) -> bool {
    matches!(
        e.kind(),
        io::ErrorKind::NotFound | io::ErrorKind::NotADirectory | io::ErrorKind::InvalidInput
    )
}
