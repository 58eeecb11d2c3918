//! Open read-only resources by relative name from the directory the program is
//! installed in, refusing any name that would leave it.
//!
//! ```no_run
//! use std::io::Read;
//!
//! let mut file = resroot::open("data/strings.txt")?;
//! let mut text = String::new();
//! file.read_to_string(&mut text)?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod canonical;
pub mod config;
pub mod errors;
pub mod location;
pub mod logging;
pub mod resolver;
pub mod server;


pub use canonical::{canonicalize, is_escaping, is_path_escaping};
pub use errors::ResourceError;
pub use resolver::{open, ResolvedPath, ResourceRoot};
