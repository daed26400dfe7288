use std::env;
use std::ffi::OsString;
use std::path::PathBuf;

use dirs::home_dir;

use crate::error::{Result, ThreadviewError};

pub const CLAUDE_CONFIG_DIR_ENV: &str = "CLAUDE_CONFIG_DIR";
pub const OUTPUT_DIR_ENV: &str = "VISUALIZE_OUTPUT_DIR";
pub const DEFAULT_OUTPUT_DIR: &str = "./dist";

/// Root of the Claude data directory that holds per-project transcripts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClaudeRoot {
    pub path: PathBuf,
}

impl ClaudeRoot {
    pub fn from_env_or_home() -> Result<Self> {
        Self::resolve(env::var_os(CLAUDE_CONFIG_DIR_ENV), home_dir())
    }

    // Precedence:
    // 1) CLAUDE_CONFIG_DIR (official Claude Code config/data root env)
    // 2) ~/.claude (Claude default)
    pub fn resolve(config_dir: Option<OsString>, home: Option<PathBuf>) -> Result<Self> {
        if let Some(config_dir) = config_dir.filter(|path| !path.is_empty()) {
            return Ok(Self {
                path: PathBuf::from(config_dir),
            });
        }

        let home = home.ok_or(ThreadviewError::HomeDirectoryNotFound)?;
        Ok(Self {
            path: home.join(".claude"),
        })
    }

    pub fn projects_dir(&self) -> PathBuf {
        self.path.join("projects")
    }
}

pub fn output_dir_from_env(explicit: Option<PathBuf>) -> PathBuf {
    resolve_output_dir(explicit, env::var_os(OUTPUT_DIR_ENV))
}

// Precedence:
// 1) explicit command-line argument
// 2) VISUALIZE_OUTPUT_DIR
// 3) ./dist
pub fn resolve_output_dir(explicit: Option<PathBuf>, env_value: Option<OsString>) -> PathBuf {
    explicit
        .or_else(|| env_value.filter(|dir| !dir.is_empty()).map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_DIR))
}
