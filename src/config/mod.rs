use std::env;
use std::path::PathBuf;

use serde::Deserialize;
use serde::Serialize;

/// Persistent dashboard defaults. Every field is optional; anything given on
/// the command line wins.
#[derive(Debug, Default, Deserialize, Serialize, Clone, PartialEq)]
pub struct ConfigFile {
    pub view: Option<String>,
    pub seed: Option<u64>,
    #[serde(alias = "input")]
    pub input_file: Option<String>,
    pub search: Option<String>,
    pub source: Option<String>,
    pub status: Option<String>,
    pub room_type: Option<String>,
    pub from: Option<String>,
    pub to: Option<String>,
    pub period: Option<String>,
    pub sort: Option<String>,
    pub page: Option<usize>,
    pub page_size: Option<usize>,
    pub output: Option<String>,
    pub output_format: Option<String>,
    #[serde(alias = "refresh")]
    pub watch: Option<u64>,
    pub ticks: Option<u64>,
    pub no_color: Option<bool>,
}

fn home_dir() -> Option<PathBuf> {
    env::var_os("HOME")
        .map(PathBuf::from)
        .or_else(|| env::var_os("USERPROFILE").map(PathBuf::from))
        .or_else(|| {
            let drive = env::var_os("HOMEDRIVE")?;
            let path = env::var_os("HOMEPATH")?;
            Some(PathBuf::from(drive).join(path))
        })
}

pub fn default_config_path() -> Option<PathBuf> {
    Some(home_dir()?.join(".bookingdesk").join("config.yml"))
}

pub fn expand_tilde(path: &str) -> PathBuf {
    if let Some(stripped) = path.strip_prefix("~/").or_else(|| path.strip_prefix("~\\")) {
        if let Some(home) = home_dir() {
            return home.join(stripped);
        }
    }
    PathBuf::from(path)
}

pub fn expand_tilde_string(path: &str) -> String {
    expand_tilde(path).to_string_lossy().to_string()
}

pub fn load_config(path: &PathBuf, allow_missing: bool) -> Result<ConfigFile, String> {
    match std::fs::read_to_string(path) {
        Ok(contents) if contents.trim().is_empty() => Ok(ConfigFile::default()),
        Ok(contents) => serde_yaml::from_str::<ConfigFile>(&contents)
            .map_err(|e| format!("failed to parse config '{}': {e}", path.display())),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound && allow_missing => {
            Ok(ConfigFile::default())
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            Err(format!("config file not found '{}'", path.display()))
        }
        Err(e) => Err(format!("failed to read config '{}': {e}", path.display())),
    }
}

pub(crate) fn default_config_yaml() -> String {
    r#"# bookingdesk config
#
# Location (default):
#   ~/.bookingdesk/config.yml

# Dashboard: all | upcoming | guests
view: all

# Data (optional). Without input_file a seeded synthetic data set is used.
# input_file: ./bookings.json
seed: 42

# Filters (optional)
# search: smith
# source: OYO
# status: checked-in
# room_type: Deluxe
# from: 2024-01-01
# to: 2024-01-31
# period: last-30

# Sort & paging
sort: bookingDate-desc
page_size: 50

# Output (optional; format is inferred from the extension)
# output: ./bookings.csv
# output_format: text

# Live refresh in seconds (guests view simulates check-outs)
# watch: 30
# ticks: 10

no_color: false
"#
    .to_string()
}

pub fn ensure_default_config_file(path: &PathBuf) -> Result<(), String> {
    if path.exists() {
        return Ok(());
    }
    let parent = path
        .parent()
        .ok_or_else(|| format!("invalid config path '{}'", path.display()))?;
    std::fs::create_dir_all(parent).map_err(|e| {
        format!(
            "failed to create config directory '{}': {e}",
            parent.display()
        )
    })?;
    std::fs::write(path, default_config_yaml())
        .map_err(|e| format!("failed to write config file '{}': {e}", path.display()))?;
    log::info!("wrote default config to {}", path.display());
    Ok(())
}
