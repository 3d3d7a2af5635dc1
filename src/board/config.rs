use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use lazy_static::lazy_static;
use serde_derive::{Deserialize, Serialize};
use tracing::warn;

lazy_static! {
    /// The built-in board: one C-major row on the left home-row keys.
    static ref DEFAULT_PADS: Vec<PadConfig> = [
        ("C", 'a'),
        ("D", 's'),
        ("E", 'd'),
        ("F", 'f'),
        ("G", 'g'),
        ("A", 'h'),
        ("B", 'j'),
    ]
    .into_iter()
    .map(|(note, key)| PadConfig {
        note: note.to_string(),
        key: Some(key),
        label: None,
    })
    .collect();
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub board: BoardConfig,
    #[serde(default)]
    pub audio: AudioConfig,
    #[serde(default)]
    pub visual: VisualConfig,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            board: BoardConfig::default(),
            audio: AudioConfig::default(),
            visual: VisualConfig::default(),
        }
    }
}

impl Config {
    /// Reads the YAML settings file. A missing file falls back to the
    /// built-in board; a present but malformed file is an error.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            warn!("settings file {} not found, using defaults", path.display());
            return Ok(Config::default());
        }
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        serde_yaml::from_str(&contents)
            .with_context(|| format!("Failed to parse {}", path.display()))
    }
}

/// The set of pads on the board. An empty pad list is allowed and leaves the
/// board inert.
#[derive(Debug, Serialize, Deserialize)]
pub struct BoardConfig {
    #[serde(default = "default_columns")]
    pub columns: usize,
    #[serde(default)]
    pub pads: Vec<PadConfig>,
}

impl Default for BoardConfig {
    fn default() -> Self {
        BoardConfig {
            columns: default_columns(),
            pads: DEFAULT_PADS.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PadConfig {
    /// Names the pad and the sample file it plays.
    pub note: String,
    /// Keyboard character that triggers the pad, matched case-insensitively.
    #[serde(default)]
    pub key: Option<char>,
    #[serde(default)]
    pub label: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AudioConfig {
    #[serde(default = "default_sound_dir")]
    pub sound_dir: PathBuf,
    #[serde(default = "default_extension")]
    pub extension: String,
    #[serde(default = "default_gain")]
    pub gain: f32,
}

impl Default for AudioConfig {
    fn default() -> Self {
        AudioConfig {
            sound_dir: default_sound_dir(),
            extension: default_extension(),
            gain: default_gain(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct VisualConfig {
    /// How long a pad stays lit after a trigger, in milliseconds.
    #[serde(default = "default_flash_ms")]
    pub flash_ms: u64,
}

impl Default for VisualConfig {
    fn default() -> Self {
        VisualConfig {
            flash_ms: default_flash_ms(),
        }
    }
}

impl VisualConfig {
    pub fn flash_duration(&self) -> Duration {
        Duration::from_millis(self.flash_ms)
    }
}

fn default_columns() -> usize {
    7
}

fn default_sound_dir() -> PathBuf {
    PathBuf::from("sound")
}

fn default_extension() -> String {
    "mp3".to_string()
}

fn default_gain() -> f32 {
    1.0
}

fn default_flash_ms() -> u64 {
    180
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_board_is_a_c_major_row() {
        let config = Config::default();
        assert_eq!(config.board.pads.len(), 7);
        assert_eq!(config.board.columns, 7);
        assert_eq!(config.board.pads[0].note, "C");
        assert_eq!(config.board.pads[0].key, Some('a'));
        assert_eq!(config.board.pads[6].note, "B");
        assert_eq!(config.board.pads[6].key, Some('j'));
    }

    #[test]
    fn parses_a_full_settings_file() {
        let yaml = r#"
board:
  columns: 2
  pads:
    - note: C
      key: a
    - note: D
      key: s
      label: Re
audio:
  sound_dir: clips
  extension: wav
  gain: 0.5
visual:
  flash_ms: 90
"#;
        let config: Config = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.board.columns, 2);
        assert_eq!(config.board.pads.len(), 2);
        assert_eq!(config.board.pads[1].label.as_deref(), Some("Re"));
        assert_eq!(config.audio.sound_dir, PathBuf::from("clips"));
        assert_eq!(config.audio.extension, "wav");
        assert_eq!(config.audio.gain, 0.5);
        assert_eq!(config.visual.flash_duration(), Duration::from_millis(90));
    }

    #[test]
    fn missing_sections_fall_back_to_defaults() {
        let yaml = "audio:\n  gain: 0.25\n";
        let config: Config = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.audio.gain, 0.25);
        assert_eq!(config.audio.extension, "mp3");
        assert_eq!(config.board.pads.len(), 7);
        assert_eq!(config.visual.flash_ms, 180);
    }

    #[test]
    fn an_explicitly_empty_pad_list_stays_empty() {
        let yaml = "board:\n  pads: []\n";
        let config: Config = serde_yaml::from_str(yaml).unwrap();
        assert!(config.board.pads.is_empty());
    }

    #[test]
    fn load_falls_back_when_the_file_is_absent() {
        let config = Config::load("no/such/settings.yaml").unwrap();
        assert_eq!(config.board.pads.len(), 7);
    }
}
