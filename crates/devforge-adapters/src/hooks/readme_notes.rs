use std::fmt::Write as _;
use std::path::Path;
use std::sync::Arc;

use devforge_core::{
    application::ports::{Filesystem, HookResult, PostRenderHook},
    domain::{RenderConfig, keys},
};

const README: &str = "README.md";

/// Appends a "Getting started" section to the generated README.
#[derive(Clone)]
pub struct ReadmeNotesHook {
    fs: Arc<dyn Filesystem>,
}

impl ReadmeNotesHook {
    pub const NAME: &'static str = "readme-notes";

    pub fn new(fs: Arc<dyn Filesystem>) -> Self {
        Self { fs }
    }
}

/// Markdown appended for `config`.
pub fn getting_started(config: &RenderConfig) -> String {
    let mut notes = String::from("\n## Getting started\n\n");

    let features: Vec<&str> = [
        (keys::TYPESCRIPT, "TypeScript"),
        (keys::TESTING, "Testing"),
        (keys::CI, "Continuous integration"),
    ]
    .into_iter()
    .filter(|(key, _)| config.is_truthy(key))
    .map(|(_, label)| label)
    .collect();

    if !features.is_empty() {
        notes.push_str("Enabled features:\n\n");
        for feature in &features {
            let _ = writeln!(notes, "- {feature}");
        }
        notes.push('\n');
    }

    notes.push_str("```sh\nnpm install\n");
    if config.is_truthy(keys::TESTING) {
        notes.push_str("npm test\n");
    }
    notes.push_str("npm run dev\n```\n");
    notes
}

impl PostRenderHook for ReadmeNotesHook {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn after_create(&self, output_root: &Path, config: &RenderConfig) -> HookResult<()> {
        let readme = output_root.join(README);
        if !self.fs.exists(&readme) {
            return Ok(());
        }
        let mut contents = self.fs.read_to_string(&readme)?;
        if !contents.ends_with('\n') {
            contents.push('\n');
        }
        contents.push_str(&getting_started(config));
        self.fs.write_atomic(&readme, contents.as_bytes())?;
        Ok(())
    }
}
