//! User settings, persisted as JSON under a fixed storage key.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Explanation language requested from the analysis backend.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Language {
    #[default]
    #[serde(rename = "en")]
    En,
    #[serde(rename = "pt_br")]
    PtBr,
}

impl Language {
    pub fn as_str(&self) -> &'static str {
        match self {
            Language::En => "en",
            Language::PtBr => "pt_br",
        }
    }
}

/// Preferred rendering theme. `System` defers to the client's OS setting.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemePreference {
    Light,
    Dark,
    #[default]
    System,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    pub language: Language,
    pub theme: ThemePreference,
    pub api_url: String,
    pub auto_save: bool,
}

impl Settings {
    pub fn defaults(api_url: &str) -> Self {
        Self {
            language: Language::default(),
            theme: ThemePreference::default(),
            api_url: api_url.to_string(),
            auto_save: true,
        }
    }
}

/// Partial settings update; absent fields keep their current value.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingsUpdate {
    pub language: Option<Language>,
    pub theme: Option<ThemePreference>,
    pub api_url: Option<String>,
    pub auto_save: Option<bool>,
}

pub trait SettingsStore: Send + Sync {
    fn get(&self) -> Settings;
    fn update(&self, update: SettingsUpdate) -> Result<Settings>;
}

/// File-backed settings store.
pub struct JsonSettingsStore {
    path: PathBuf,
    state: Mutex<Settings>,
}

impl JsonSettingsStore {
    /// Open the store at `path`, falling back to `defaults` when no file
    /// exists yet.
    pub fn open(path: &Path, defaults: Settings) -> Result<Self> {
        let state = if path.exists() {
            let content = fs::read_to_string(path)
                .with_context(|| format!("Failed to read settings store: {:?}", path))?;
            serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse settings store: {:?}", path))?
        } else {
            defaults
        };

        Ok(Self {
            path: path.to_path_buf(),
            state: Mutex::new(state),
        })
    }

    fn persist(&self, settings: &Settings) -> Result<()> {
        let dir = self.path.parent().context("Settings store has no parent dir")?;
        let json = serde_json::to_string_pretty(settings)?;

        let tmp = tempfile::NamedTempFile::new_in(dir)
            .context("Failed to create temp file for settings store")?;
        fs::write(tmp.path(), json).context("Failed to write settings store")?;
        tmp.persist(&self.path)
            .with_context(|| format!("Failed to persist settings store: {:?}", self.path))?;
        Ok(())
    }
}

impl SettingsStore for JsonSettingsStore {
    fn get(&self) -> Settings {
        self.state.lock().unwrap().clone()
    }

    fn update(&self, update: SettingsUpdate) -> Result<Settings> {
        let mut state = self.state.lock().unwrap();
        if let Some(language) = update.language {
            state.language = language;
        }
        if let Some(theme) = update.theme {
            state.theme = theme;
        }
        if let Some(api_url) = update.api_url {
            state.api_url = api_url;
        }
        if let Some(auto_save) = update.auto_save {
            state.auto_save = auto_save;
        }
        self.persist(&state)?;
        Ok(state.clone())
    }
}
