//! Environment configuration
//!
//! Both servers are configured exclusively through environment variables;
//! there are no config files and no command-line options.

use std::env;
use std::path::PathBuf;

/// Credential for the Gemini API.
pub const API_KEY_VAR: &str = "GEMINI_API_KEY";
/// Optional model override.
pub const MODEL_VAR: &str = "GEMINI_MODEL";
/// Optional API base override (proxies, test servers).
pub const BASE_URL_VAR: &str = "GEMINI_BASE_URL";
/// Extra font directories searched before the system ones.
pub const FONT_DIRS_VAR: &str = "IMAGE_MCP_FONT_DIRS";

pub const DEFAULT_MODEL: &str = "gemini-2.5-flash-image";
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Settings for the Gemini-backed server.
///
/// A missing API key is not an error here: the server still starts and the
/// generation tools report the missing credential when they are invoked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeminiConfig {
    pub api_key: Option<String>,
    pub model: String,
    pub base_url: String,
}

impl GeminiConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Build from an arbitrary variable lookup. Blank values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |name: &str| {
            lookup(name).map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
        };
        Self {
            api_key: get(API_KEY_VAR),
            model: get(MODEL_VAR).unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            base_url: get(BASE_URL_VAR)
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
        }
    }
}

/// Font directories for text rendering: `IMAGE_MCP_FONT_DIRS` entries first,
/// then the usual system locations for the current platform.
pub fn font_dirs_from_env() -> Vec<PathBuf> {
    let mut dirs: Vec<PathBuf> = match env::var_os(FONT_DIRS_VAR) {
        Some(value) => env::split_paths(&value).filter(|p| !p.as_os_str().is_empty()).collect(),
        None => Vec::new(),
    };
    dirs.extend(system_font_dirs());
    dirs
}

fn system_font_dirs() -> Vec<PathBuf> {
    let mut dirs = Vec::new();
    if cfg!(target_os = "windows") {
        let root = env::var_os("WINDIR").map(PathBuf::from).unwrap_or_else(|| "C:\\Windows".into());
        dirs.push(root.join("Fonts"));
    } else if cfg!(target_os = "macos") {
        dirs.push(PathBuf::from("/System/Library/Fonts"));
        dirs.push(PathBuf::from("/Library/Fonts"));
        if let Some(home) = env::var_os("HOME") {
            dirs.push(PathBuf::from(home).join("Library/Fonts"));
        }
    } else {
        dirs.push(PathBuf::from("/usr/share/fonts"));
        dirs.push(PathBuf::from("/usr/local/share/fonts"));
        if let Some(home) = env::var_os("HOME") {
            let home = PathBuf::from(home);
            dirs.push(home.join(".local/share/fonts"));
            dirs.push(home.join(".fonts"));
        }
    }
    dirs
}
