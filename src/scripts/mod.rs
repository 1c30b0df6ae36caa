//! Copying helper scripts into the Zabbix external-scripts directory

use std::fs::Permissions;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info};

use crate::SyncResult;

/// Extensions that get the execute bits after copying
const EXECUTABLE_SUFFIXES: [&str; 2] = [".sh", ".py"];

/// A file placed into the external-scripts directory
#[derive(Debug, Clone, PartialEq)]
pub struct CopiedScript {
    pub destination: PathBuf,
    pub executable: bool,
}

/// Regular files directly inside `dir`, sorted by path. Symlinks are
/// followed; directories and dangling links are skipped.
pub async fn regular_files(dir: &Path) -> SyncResult<Vec<PathBuf>> {
    let mut entries = tokio::fs::read_dir(dir).await?;
    let mut files = Vec::new();
    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        match tokio::fs::metadata(&path).await {
            Ok(meta) if meta.is_file() => files.push(path),
            Ok(_) => {}
            Err(e) => debug!("Skipping {}: {}", path.display(), e),
        }
    }
    files.sort();
    Ok(files)
}

pub fn is_executable_script(name: &str) -> bool {
    EXECUTABLE_SUFFIXES.iter().any(|suffix| name.ends_with(suffix))
}

pub struct ScriptCopier {
    target_dir: PathBuf,
}

impl ScriptCopier {
    pub fn new(target_dir: impl Into<PathBuf>) -> Self {
        Self {
            target_dir: target_dir.into(),
        }
    }

    /// Copy one file, overwriting a same-named file in the target directory.
    pub async fn copy_script(&self, source: &Path) -> SyncResult<CopiedScript> {
        let name = source.file_name().ok_or_else(|| {
            std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                format!("not a file path: {}", source.display()),
            )
        })?;
        let destination = self.target_dir.join(name);

        tokio::fs::copy(source, &destination).await?;

        let executable = is_executable_script(&name.to_string_lossy());
        if executable {
            let mode = tokio::fs::metadata(&destination).await?.permissions().mode();
            tokio::fs::set_permissions(&destination, Permissions::from_mode(mode | 0o111)).await?;
            info!("Script copied and made executable: {}", destination.display());
        } else {
            info!("File copied: {}", destination.display());
        }

        Ok(CopiedScript {
            destination,
            executable,
        })
    }

    /// Copy every regular file in `source_dir`. The target directory is
    /// created if needed; a file that fails to copy is logged and skipped.
    pub async fn copy_all(&self, source_dir: &Path) -> SyncResult<Vec<CopiedScript>> {
        tokio::fs::create_dir_all(&self.target_dir).await?;

        let mut copied = Vec::new();
        for source in regular_files(source_dir).await? {
            match self.copy_script(&source).await {
                Ok(script) => copied.push(script),
                Err(e) => error!("Failed to copy {}: {}", source.display(), e.user_message()),
            }
        }
        Ok(copied)
    }
}
