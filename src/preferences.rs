use crate::executor::DEFAULT_QUARTER_TURN_STEPS;
use crate::puzzle::cube::Color;
use crate::puzzle::scramble::DEFAULT_SCRAMBLE_LENGTH;
use enum_map::{enum_map, EnumMap};
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const PREFS_PATH: &str = "./preferences.json";

fn hex_default() -> EnumMap<Color, String> {
    enum_map! {
        Color::White => "#FFFFFF".to_string(),
        Color::Yellow => "#FFEB3B".to_string(),
        Color::Red => "#E53935".to_string(),
        Color::Orange => "#FF9800".to_string(),
        Color::Green => "#43A047".to_string(),
        Color::Blue => "#1E88E5".to_string(),
    }
}

fn hidden_default() -> String {
    "#111111".to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColorPreferences {
    #[serde(default = "hex_default")]
    pub hex: EnumMap<Color, String>,
    /// for the inward sides of pieces
    #[serde(default = "hidden_default")]
    pub hidden: String,
}

impl Default for ColorPreferences {
    fn default() -> Self {
        Self {
            hex: hex_default(),
            hidden: hidden_default(),
        }
    }
}

impl ColorPreferences {
    pub fn hex_of(&self, color: Option<Color>) -> &str {
        match color {
            Some(color) => self.hex[color].as_str(),
            None => self.hidden.as_str(),
        }
    }
}

fn quarter_turn_steps_default() -> u32 {
    DEFAULT_QUARTER_TURN_STEPS
}

fn frame_interval_ms_default() -> u64 {
    16
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnimationPreferences {
    /// Steps in a quarter turn; a half turn takes twice as many.
    #[serde(default = "quarter_turn_steps_default")]
    pub quarter_turn_steps: u32,
    /// Only used by drivers that pace frames with a timer.
    #[serde(default = "frame_interval_ms_default")]
    pub frame_interval_ms: u64,
}

impl Default for AnimationPreferences {
    fn default() -> Self {
        Self {
            quarter_turn_steps: quarter_turn_steps_default(),
            frame_interval_ms: frame_interval_ms_default(),
        }
    }
}

fn scramble_length_default() -> usize {
    DEFAULT_SCRAMBLE_LENGTH
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScramblePreferences {
    #[serde(default = "scramble_length_default")]
    pub length: usize,
}

impl Default for ScramblePreferences {
    fn default() -> Self {
        Self {
            length: scramble_length_default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Preferences {
    #[serde(default)]
    pub animation: AnimationPreferences,
    #[serde(default)]
    pub scramble: ScramblePreferences,
    #[serde(default)]
    pub colors: ColorPreferences,
}

impl Preferences {
    pub fn save(&self) -> eyre::Result<()> {
        self.save_to(PREFS_PATH)
    }

    pub fn load() -> eyre::Result<Self> {
        Self::load_from(PREFS_PATH)
    }

    pub fn save_to(&self, path: impl AsRef<Path>) -> eyre::Result<()> {
        std::fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }

    /// Defaults when the file does not exist.
    pub fn load_from(path: impl AsRef<Path>) -> eyre::Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Default::default());
        }
        let file = std::fs::File::open(path)?;
        let reader = std::io::BufReader::new(file);
        Ok(serde_json::from_reader(reader)?)
    }
}
