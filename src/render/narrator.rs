/// Narration scripts: the cleaned text a speech engine would read.

use std::path::{Path, PathBuf};
use tracing::debug;

use super::{NarrationRequest, Provider, ProviderError};
use crate::core::narration::clean_for_narration;

/// Writes `page_{n}_narration.txt` into `out_dir`.
#[derive(Debug, Clone)]
pub struct ScriptNarrator {
    pub out_dir: PathBuf,
}

impl ScriptNarrator {
    pub fn new(out_dir: impl AsRef<Path>) -> Self {
        Self {
            out_dir: out_dir.as_ref().to_path_buf(),
        }
    }
}

impl Provider<NarrationRequest, PathBuf> for ScriptNarrator {
    fn name(&self) -> &str {
        "script"
    }

    fn provide(&self, request: &NarrationRequest) -> Result<PathBuf, ProviderError> {
        let script = clean_for_narration(&request.text);
        if script.is_empty() {
            return Err(ProviderError::Rejected(format!(
                "page {} has nothing to narrate",
                request.page
            )));
        }
        std::fs::create_dir_all(&self.out_dir)?;
        let path = self
            .out_dir
            .join(format!("page_{}_narration.txt", request.page));
        std::fs::write(&path, script)?;
        debug!(path = %path.display(), "wrote narration script");
        Ok(path)
    }
}
