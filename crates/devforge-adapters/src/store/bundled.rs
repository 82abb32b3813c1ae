//! Templates compiled into the binary.
//!
//! A fresh install has an empty registry, yet `defaults.template` names
//! `node-typescript`. [`install_bundled`] writes the templates listed here
//! into a registry directory so the default works out of the box.

use std::path::Path;

use tracing::{debug, info, instrument, warn};

use devforge_core::{application::ports::Filesystem, error::ForgeResult};

/// One file of a bundled template, relative to the template root.
#[derive(Debug, Clone, Copy)]
pub struct BundledFile {
    pub path: &'static str,
    pub contents: &'static str,
    pub executable: bool,
}

/// A template shipped inside the binary.
#[derive(Debug, Clone, Copy)]
pub struct BundledTemplate {
    pub name: &'static str,
    pub files: &'static [BundledFile],
}

macro_rules! bundled_file {
    ($template:literal, $path:literal) => {
        bundled_file!($template, $path, false)
    };
    ($template:literal, $path:literal, executable) => {
        bundled_file!($template, $path, true)
    };
    ($template:literal, $path:literal, $executable:expr) => {
        BundledFile {
            path: $path,
            contents: include_str!(concat!("../../templates/", $template, "/", $path)),
            executable: $executable,
        }
    };
}

/// Every template that ships with DevForge.
pub const BUNDLED_TEMPLATES: &[BundledTemplate] = &[BundledTemplate {
    name: "node-typescript",
    files: &[
        bundled_file!("node-typescript", "template.json"),
        bundled_file!("node-typescript", "package.json.hbs"),
        bundled_file!("node-typescript", "README.md.hbs"),
        bundled_file!("node-typescript", "src/index.ts.hbs"),
        bundled_file!("node-typescript", ".gitignore"),
        bundled_file!("node-typescript", ".husky/pre-commit", executable),
    ],
}];

/// Write every bundled template that `root` does not already hold.
///
/// A template directory that exists is left alone, whatever it contains.
/// Returns the names written, in [`BUNDLED_TEMPLATES`] order.
#[instrument(skip(fs), fields(root = %root.display()))]
pub fn install_bundled(fs: &dyn Filesystem, root: &Path) -> ForgeResult<Vec<&'static str>> {
    let mut installed = Vec::new();
    for template in BUNDLED_TEMPLATES {
        let dest = root.join(template.name);
        if fs.exists(&dest) {
            debug!(template = template.name, "already in registry");
            continue;
        }
        if let Err(e) = write_template(fs, template, &dest) {
            // Half a template would shadow the next install attempt.
            if let Err(cleanup) = fs.remove_dir_all(&dest) {
                warn!(template = template.name, error = %cleanup, "could not remove partial template");
            }
            return Err(e);
        }
        info!(template = template.name, "installed bundled template");
        installed.push(template.name);
    }
    Ok(installed)
}

fn write_template(fs: &dyn Filesystem, template: &BundledTemplate, dest: &Path) -> ForgeResult<()> {
    fs.create_dir_all(dest)?;
    for file in template.files {
        let path = dest.join(file.path);
        if let Some(parent) = path.parent() {
            fs.create_dir_all(parent)?;
        }
        fs.write_atomic(&path, file.contents.as_bytes())?;
        if file.executable {
            fs.set_executable(&path)?;
        }
    }
    Ok(())
}
