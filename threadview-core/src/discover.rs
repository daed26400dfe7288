use std::fs;
use std::path::{MAIN_SEPARATOR, Path, PathBuf};
use std::time::SystemTime;

use walkdir::WalkDir;

use crate::config::ClaudeRoot;
use crate::error::{Result, ThreadviewError};

const SUBAGENT_PREFIX: &str = "agent-";

/// Directory name Claude Code uses for the project at `cwd`.
pub fn expected_project_dir_name(cwd: &Path) -> String {
    let cwd = cwd.to_string_lossy();
    let normalized = cwd
        .strip_prefix(MAIN_SEPARATOR)
        .unwrap_or(&cwd)
        .replace([MAIN_SEPARATOR, '.'], "-");
    format!("-{normalized}")
}

/// Finds the project directory for `cwd`: an exact name match first, then
/// the first directory whose name ends with the project's base name.
pub fn find_project_dir(projects_root: &Path, cwd: &Path) -> Result<PathBuf> {
    let read_dir =
        fs::read_dir(projects_root).map_err(|source| ThreadviewError::ProjectsDirUnreadable {
            path: projects_root.to_path_buf(),
            source,
        })?;

    let mut candidates = read_dir
        .filter_map(std::result::Result::ok)
        .filter(|entry| entry.file_type().is_ok_and(|file_type| file_type.is_dir()))
        .filter_map(|entry| entry.file_name().into_string().ok())
        .collect::<Vec<_>>();
    candidates.sort();

    let expected = expected_project_dir_name(cwd);
    if let Some(name) = candidates.iter().find(|name| **name == expected) {
        return Ok(projects_root.join(name));
    }

    let project_name = cwd
        .file_name()
        .map(|name| name.to_string_lossy().replace('.', "-"))
        .unwrap_or_default();
    if !project_name.is_empty()
        && let Some(name) = candidates.iter().find(|name| name.ends_with(&project_name))
    {
        tracing::debug!(candidate = %name, "matched project directory by suffix");
        return Ok(projects_root.join(name));
    }

    Err(ThreadviewError::ProjectNotFound {
        cwd: cwd.to_path_buf(),
        expected,
    })
}

/// Main-session transcripts directly inside `project_dir` with their
/// modification times; sub-agent logs are excluded.
fn transcript_candidates(project_dir: &Path) -> Vec<(PathBuf, SystemTime)> {
    WalkDir::new(project_dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
        .into_iter()
        .filter_map(std::result::Result::ok)
        .filter(|entry| entry.file_type().is_file())
        .filter(|entry| {
            entry.file_name().to_str().is_some_and(|name| {
                name.ends_with(".jsonl") && !name.starts_with(SUBAGENT_PREFIX)
            })
        })
        .map(|entry| {
            let modified = entry
                .metadata()
                .ok()
                .and_then(|meta| meta.modified().ok())
                .unwrap_or(SystemTime::UNIX_EPOCH);
            (entry.into_path(), modified)
        })
        .collect()
}

/// Locates the most recently modified main-session transcript for the
/// project at `cwd`.
pub fn find_latest_transcript(root: &ClaudeRoot, cwd: &Path) -> Result<PathBuf> {
    let project_dir = find_project_dir(&root.projects_dir(), cwd)?;

    let candidates = transcript_candidates(&project_dir);
    let count = candidates.len();
    let Some((selected, _)) = candidates
        .into_iter()
        .max_by_key(|(_, modified)| *modified)
    else {
        return Err(ThreadviewError::NoTranscripts { path: project_dir });
    };

    let session_id = selected
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default();
    tracing::info!(
        session_id = %session_id,
        candidates = count,
        path = %selected.display(),
        "using session"
    );

    Ok(selected)
}
