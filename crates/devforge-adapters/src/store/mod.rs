//! Template store adapters.

mod bundled;
mod directory;

pub use bundled::{BUNDLED_TEMPLATES, BundledFile, BundledTemplate, install_bundled};
pub use directory::DirectoryStore;
