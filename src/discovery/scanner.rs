use super::types::FileDescriptor;
use anyhow::{Context, Result};
use std::path::Path;

/// Scans `dir` for regular files and returns their descriptors, sorted by name.
///
/// Subdirectories are not descended into. Files whose names are not valid
/// UTF-8 are skipped with a warning, since their names could not be carried
/// through the plan and the output table.
pub async fn scan_directory(dir: &Path) -> Result<Vec<FileDescriptor>> {
    let mut entries = tokio::fs::read_dir(dir)
        .await
        .with_context(|| format!("unable to open directory {}", dir.display()))?;

    let mut files = Vec::new();
    while let Some(entry) = entries
        .next_entry()
        .await
        .with_context(|| format!("failed to read directory {}", dir.display()))?
    {
        let metadata = entry
            .metadata()
            .await
            .with_context(|| format!("failed to stat {}", entry.path().display()))?;
        if !metadata.is_file() {
            continue;
        }

        let name = match entry.file_name().into_string() {
            Ok(name) => name,
            Err(raw) => {
                tracing::warn!("Skipping file with non-UTF-8 name: {:?}", raw);
                continue;
            }
        };

        files.push(FileDescriptor {
            name,
            size: metadata.len(),
        });
    }

    // Deterministic order regardless of how the OS returns entries.
    files.sort_by(|a, b| a.name.cmp(&b.name));

    tracing::info!(
        "Discovered {} file(s) in {} ({} bytes total)",
        files.len(),
        dir.display(),
        super::types::total_size(&files)
    );
    for file in &files {
        tracing::debug!("  {:<30} {:>10} bytes", file.name, file.size);
    }

    Ok(files)
}
