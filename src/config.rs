/// External configuration loader.
///
/// Reads `config.toml` from the executable's directory, the CWD, or
/// `~/.local/share/matrix-handheld`. Falls back to defaults if the file is
/// missing or incomplete; a malformed file is logged and ignored.

use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;
use tracing::{info, warn};

use crate::error::AppError;

const APP_DIR: &str = "matrix-handheld";

// ── Public Config Struct ──

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub timing: TimingConfig,
    pub buying_power_usd: f64,
    pub gamepad: GamepadConfig,
    pub advisory: AdvisoryConfig,
}

#[derive(Clone, Debug)]
pub struct TimingConfig {
    pub tick_rate_ms: u64,
    pub notification_ms: u64,
    pub typewriter_ms: u64,   // per revealed character
    pub rain_ms: u64,
    pub power_on_ms: u64,
}

impl TimingConfig {
    pub fn tick(&self) -> Duration { Duration::from_millis(self.tick_rate_ms) }
    pub fn notification(&self) -> Duration { Duration::from_millis(self.notification_ms) }
    pub fn typewriter(&self) -> Duration { Duration::from_millis(self.typewriter_ms) }
    pub fn rain(&self) -> Duration { Duration::from_millis(self.rain_ms) }
    pub fn power_on(&self) -> Duration { Duration::from_millis(self.power_on_ms) }
}

/// Button-name lists per action, parsed by the gamepad layer.
#[derive(Clone, Debug)]
pub struct GamepadConfig {
    pub confirm: Vec<String>,
    pub cancel: Vec<String>,
    pub secondary: Vec<String>,
    pub shoulder_prev: Vec<String>,
    pub shoulder_next: Vec<String>,
    pub menu: Vec<String>,
}

#[derive(Clone, Debug)]
pub struct AdvisoryConfig {
    pub enabled: bool,
    /// Environment variable holding the API key. Unset means offline.
    pub api_key_env: String,
    pub model: String,
    pub endpoint: String,
    pub timeout_secs: u64,
}

// ── TOML Schema (with serde defaults) ──

#[derive(Deserialize, Debug, Default)]
struct TomlConfig {
    #[serde(default)]
    timing: TomlTiming,
    #[serde(default)]
    account: TomlAccount,
    #[serde(default)]
    gamepad: TomlGamepad,
    #[serde(default)]
    advisory: TomlAdvisory,
}

#[derive(Deserialize, Debug)]
struct TomlTiming {
    #[serde(default = "default_tick_rate")]
    tick_rate_ms: u64,
    #[serde(default = "default_notification")]
    notification_ms: u64,
    #[serde(default = "default_typewriter")]
    typewriter_ms: u64,
    #[serde(default = "default_rain")]
    rain_ms: u64,
    #[serde(default = "default_power_on")]
    power_on_ms: u64,
}

#[derive(Deserialize, Debug)]
struct TomlAccount {
    #[serde(default = "default_buying_power")]
    buying_power_usd: f64,
}

#[derive(Deserialize, Debug)]
struct TomlGamepad {
    #[serde(default = "default_confirm")]
    confirm: Vec<String>,
    #[serde(default = "default_cancel")]
    cancel: Vec<String>,
    #[serde(default = "default_secondary")]
    secondary: Vec<String>,
    #[serde(default = "default_shoulder_prev")]
    shoulder_prev: Vec<String>,
    #[serde(default = "default_shoulder_next")]
    shoulder_next: Vec<String>,
    #[serde(default = "default_menu")]
    menu: Vec<String>,
}

#[derive(Deserialize, Debug)]
struct TomlAdvisory {
    #[serde(default = "default_advisory_enabled")]
    enabled: bool,
    #[serde(default = "default_api_key_env")]
    api_key_env: String,
    #[serde(default = "default_model")]
    model: String,
    #[serde(default = "default_endpoint")]
    endpoint: String,
    #[serde(default = "default_timeout")]
    timeout_secs: u64,
}

// ── Defaults ──

fn default_tick_rate() -> u64 { 16 }
fn default_notification() -> u64 { 2500 }
fn default_typewriter() -> u64 { 30 }
fn default_rain() -> u64 { 600 }
fn default_power_on() -> u64 { 700 }

fn default_buying_power() -> f64 { 10_000.0 }

fn default_confirm() -> Vec<String> { vec!["A".into()] }
fn default_cancel() -> Vec<String> { vec!["B".into()] }
fn default_secondary() -> Vec<String> { vec!["X".into()] }
fn default_shoulder_prev() -> Vec<String> { vec!["L1".into()] }
fn default_shoulder_next() -> Vec<String> { vec!["R1".into()] }
fn default_menu() -> Vec<String> { vec!["Start".into(), "Select".into()] }

fn default_advisory_enabled() -> bool { true }
fn default_api_key_env() -> String { "GEMINI_API_KEY".into() }
fn default_model() -> String { "gemini-3-flash-preview".into() }
fn default_endpoint() -> String { "https://generativelanguage.googleapis.com/v1beta".into() }
fn default_timeout() -> u64 { 10 }

impl Default for TomlTiming {
    fn default() -> Self {
        TomlTiming {
            tick_rate_ms: default_tick_rate(),
            notification_ms: default_notification(),
            typewriter_ms: default_typewriter(),
            rain_ms: default_rain(),
            power_on_ms: default_power_on(),
        }
    }
}

impl Default for TomlAccount {
    fn default() -> Self {
        TomlAccount { buying_power_usd: default_buying_power() }
    }
}

impl Default for TomlGamepad {
    fn default() -> Self {
        TomlGamepad {
            confirm: default_confirm(),
            cancel: default_cancel(),
            secondary: default_secondary(),
            shoulder_prev: default_shoulder_prev(),
            shoulder_next: default_shoulder_next(),
            menu: default_menu(),
        }
    }
}

impl Default for TomlAdvisory {
    fn default() -> Self {
        TomlAdvisory {
            enabled: default_advisory_enabled(),
            api_key_env: default_api_key_env(),
            model: default_model(),
            endpoint: default_endpoint(),
            timeout_secs: default_timeout(),
        }
    }
}

impl From<TomlAdvisory> for AdvisoryConfig {
    fn from(t: TomlAdvisory) -> Self {
        AdvisoryConfig {
            enabled: t.enabled,
            api_key_env: t.api_key_env,
            model: t.model,
            endpoint: t.endpoint,
            timeout_secs: t.timeout_secs.max(1),
        }
    }
}

impl Default for AdvisoryConfig {
    fn default() -> Self {
        TomlAdvisory::default().into()
    }
}

impl From<TomlConfig> for AppConfig {
    fn from(t: TomlConfig) -> Self {
        let buying_power_usd = if t.account.buying_power_usd.is_finite() {
            t.account.buying_power_usd.max(0.0)
        } else {
            default_buying_power()
        };
        AppConfig {
            timing: TimingConfig {
                tick_rate_ms: t.timing.tick_rate_ms.max(1),
                notification_ms: t.timing.notification_ms,
                typewriter_ms: t.timing.typewriter_ms.max(1),
                rain_ms: t.timing.rain_ms,
                power_on_ms: t.timing.power_on_ms,
            },
            buying_power_usd,
            gamepad: GamepadConfig {
                confirm: t.gamepad.confirm,
                cancel: t.gamepad.cancel,
                secondary: t.gamepad.secondary,
                shoulder_prev: t.gamepad.shoulder_prev,
                shoulder_next: t.gamepad.shoulder_next,
                menu: t.gamepad.menu,
            },
            advisory: t.advisory.into(),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        TomlConfig::default().into()
    }
}

// ── Loading ──

impl AppConfig {
    /// Load config from `config.toml`.
    /// Missing file or missing keys gracefully fall back to defaults.
    pub fn load() -> Self {
        load_from(&candidate_dirs())
    }

    pub fn from_toml_str(text: &str) -> Result<Self, AppError> {
        let parsed: TomlConfig = toml::from_str(text)?;
        Ok(parsed.into())
    }
}

/// Candidate directories to search: exe dir + CWD + XDG data dir (deduplicated).
fn candidate_dirs() -> Vec<PathBuf> {
    let mut dirs = vec![];

    if let Ok(exe) = std::env::current_exe() {
        let resolved = exe.canonicalize().unwrap_or(exe);
        if let Some(parent) = resolved.parent() {
            dirs.push(parent.to_path_buf());
        }
    }

    if let Ok(cwd) = std::env::current_dir() {
        if !dirs.iter().any(|d| d == &cwd) {
            dirs.push(cwd);
        }
    }

    if let Ok(home) = std::env::var("HOME") {
        let xdg = PathBuf::from(&home).join(".local/share").join(APP_DIR);
        if xdg.is_dir() && !dirs.iter().any(|d| d == &xdg) {
            dirs.push(xdg);
        }
    }

    if dirs.is_empty() {
        dirs.push(PathBuf::from("."));
    }

    dirs
}

/// First readable config.toml wins.
fn load_from(search_dirs: &[PathBuf]) -> AppConfig {
    for dir in search_dirs {
        let path = dir.join("config.toml");
        if !path.exists() {
            continue;
        }
        match std::fs::read_to_string(&path) {
            Ok(text) => match AppConfig::from_toml_str(&text) {
                Ok(cfg) => {
                    info!(path = %path.display(), "config loaded");
                    return cfg;
                }
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "using default settings");
                    return AppConfig::default();
                }
            },
            Err(e) => warn!(path = %path.display(), error = %e, "could not read config"),
        }
    }
    info!("no config.toml found, using defaults");
    AppConfig::default()
}
