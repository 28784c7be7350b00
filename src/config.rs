//! Saved default flags.
//!
//! A global file and a local `.apirefrc` hold CLI flags, one or more per
//! line, `#` starting a comment. Effective flags are global, then local,
//! then the command line: booleans accumulate, valued flags take the last
//! one set.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

const APP_DIR: &str = "apiref";
const LOCAL_FILE: &str = ".apirefrc";

#[derive(clap::ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThemeMode {
    /// Guess from `COLORFGBG`
    Auto,
    Light,
    Dark,
}

impl ThemeMode {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Auto => "auto",
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }

    fn parse(s: &str) -> Option<Self> {
        match s {
            "auto" => Some(Self::Auto),
            "light" => Some(Self::Light),
            "dark" => Some(Self::Dark),
            _ => None,
        }
    }
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ConfigFlags {
    pub debounce_ms: Option<u64>,
    pub theme: Option<ThemeMode>,
    pub log_file: Option<PathBuf>,
    pub perf: bool,
    pub no_nav: bool,
}

impl ConfigFlags {
    pub fn union(&self, other: &Self) -> Self {
        Self {
            debounce_ms: other.debounce_ms.or(self.debounce_ms),
            theme: other.theme.or(self.theme),
            log_file: other.log_file.clone().or_else(|| self.log_file.clone()),
            perf: self.perf || other.perf,
            no_nav: self.no_nav || other.no_nav,
        }
    }

    /// The flags as config-file lines.
    pub fn to_lines(&self) -> Vec<String> {
        let mut lines = Vec::new();
        if let Some(delay) = self.debounce_ms {
            lines.push(format!("--debounce-ms {delay}"));
        }
        if let Some(theme) = self.theme {
            lines.push(format!("--theme {}", theme.as_str()));
        }
        if let Some(path) = &self.log_file {
            lines.push(format!("--log-file {}", path.display()));
        }
        if self.perf {
            lines.push("--perf".to_string());
        }
        if self.no_nav {
            lines.push("--no-nav".to_string());
        }
        lines
    }
}

pub fn global_config_path() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        if let Some(appdata) = std::env::var_os("APPDATA") {
            return PathBuf::from(appdata).join(APP_DIR).join("config");
        }
    }

    #[cfg(target_os = "macos")]
    {
        if let Some(home) = std::env::var_os("HOME") {
            return PathBuf::from(home)
                .join("Library")
                .join("Application Support")
                .join(APP_DIR)
                .join("config");
        }
    }

    #[cfg(not(any(target_os = "windows", target_os = "macos")))]
    {
        if let Some(xdg) = std::env::var_os("XDG_CONFIG_HOME") {
            return PathBuf::from(xdg).join(APP_DIR).join("config");
        }
        if let Some(home) = std::env::var_os("HOME") {
            return PathBuf::from(home)
                .join(".config")
                .join(APP_DIR)
                .join("config");
        }
    }

    PathBuf::from(LOCAL_FILE)
}

pub fn local_override_path() -> PathBuf {
    PathBuf::from(LOCAL_FILE)
}

pub fn load_config_flags(path: &Path) -> Result<ConfigFlags> {
    if !path.exists() {
        return Ok(ConfigFlags::default());
    }
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config {}", path.display()))?;
    let tokens = content
        .lines()
        .map(|line| line.split_once('#').map_or(line, |(flags, _)| flags).trim())
        .filter(|line| !line.is_empty())
        .flat_map(|line| line.split_whitespace().map(ToOwned::to_owned))
        .collect::<Vec<_>>();
    Ok(parse_flag_tokens(&tokens))
}

pub fn save_config_flags(path: &Path, flags: &ConfigFlags) -> Result<()> {
    let mut lines = vec!["# apiref defaults (saved with --save)".to_string()];
    lines.extend(flags.to_lines());
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create config dir {}", parent.display()))?;
    }
    fs::write(path, format!("{}\n", lines.join("\n")))
        .with_context(|| format!("Failed to write config {}", path.display()))
}

pub fn clear_config_flags(path: &Path) -> Result<()> {
    if path.exists() {
        fs::remove_file(path).with_context(|| format!("Failed to remove {}", path.display()))?;
    }
    Ok(())
}

/// Pick the config flags out of a token list, ignoring everything else.
///
/// Unparseable values leave the flag unset.
pub fn parse_flag_tokens(tokens: &[String]) -> ConfigFlags {
    let mut flags = ConfigFlags::default();
    let mut i = 0;
    while i < tokens.len() {
        let token = tokens[i].as_str();
        match token {
            "--perf" => flags.perf = true,
            "--no-nav" => flags.no_nav = true,
            _ => {
                if let Some((name, value, consumed)) = valued_flag(tokens, i) {
                    match name {
                        "--debounce-ms" => flags.debounce_ms = value.parse().ok(),
                        "--theme" => flags.theme = ThemeMode::parse(value),
                        "--log-file" => flags.log_file = Some(PathBuf::from(value)),
                        _ => {}
                    }
                    i += consumed - 1;
                }
            }
        }
        i += 1;
    }
    flags
}

const VALUED_FLAGS: [&str; 3] = ["--debounce-ms", "--theme", "--log-file"];

/// `--name value` or `--name=value` at `tokens[i]`, with the token count used.
fn valued_flag(tokens: &[String], i: usize) -> Option<(&'static str, &str, usize)> {
    let token = tokens[i].as_str();
    VALUED_FLAGS.into_iter().find_map(|name| {
        if token == name {
            tokens.get(i + 1).map(|value| (name, value.as_str(), 2))
        } else {
            token
                .strip_prefix(name)
                .and_then(|rest| rest.strip_prefix('='))
                .map(|value| (name, value, 1))
        }
    })
}
