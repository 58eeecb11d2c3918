use std::io;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

static INSTALL_DIR: OnceLock<PathBuf> = OnceLock::new();

/// Directory containing the running executable. Computed on first use and kept for
/// the life of the process; a failed lookup is not cached.
pub fn install_dir() -> io::Result<&'static Path> {
    if let Some(dir) = INSTALL_DIR.get() {
        return Ok(dir.as_path());
    }
    let dir = discover()?;
    // racing initialisers compute the same value, any winner is fine
    Ok(INSTALL_DIR.get_or_init(|| dir).as_path())
}

fn discover() -> io::Result<PathBuf> {
    let exe = dunce::canonicalize(std::env::current_exe()?)?;
    let dir = exe.parent().ok_or_else(|| {
        io::Error::new(
            io::ErrorKind::NotFound,
            format!("executable has no parent directory: {}", exe.display()),
        )
    })?;
    tracing::debug!(install_dir = %dir.display(), "resolved install directory");
    Ok(dir.to_path_buf())
}
