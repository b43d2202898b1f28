//! Session state structure and the values derived from it

use std::fmt;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;

/// Track selected when nothing else was stored
pub const DEFAULT_SOUND: &str = "rain.mp3";
pub const DEFAULT_VOLUME: f64 = 0.6;
pub const DEFAULT_BRIGHTNESS: u8 = 70;

/// Overlay opacity at 0% brightness
pub const MAX_DIM: f64 = 0.8;

/// Order in which the timer button cycles through presets
pub const TIMER_PRESETS: [TimerPreset; 7] = [
    TimerPreset::Disabled,
    TimerPreset::Minutes(5),
    TimerPreset::Minutes(10),
    TimerPreset::Minutes(15),
    TimerPreset::Minutes(20),
    TimerPreset::Minutes(30),
    TimerPreset::Minutes(60),
];

/// Visual themes the display layer knows how to render
pub const THEMES: [&str; 16] = [
    "candyfloss",
    "ocean-hush",
    "moon-mist",
    "forest-lullaby",
    "aurora",
    "glacier",
    "coral",
    "ember",
    "rainbow",
    "midnight",
    "warmglow",
    "sunsetfade",
    "breathing",
    "candleglow",
    "galaxy",
    "snowfall",
];

/// Sleep timer setting: either off or one of the fixed minute presets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TimerPreset {
    #[default]
    Disabled,
    Minutes(u32),
}

impl TimerPreset {
    /// Look up a preset by its minute count
    pub fn from_minutes(minutes: u32) -> Option<Self> {
        TIMER_PRESETS
            .iter()
            .copied()
            .find(|p| *p == TimerPreset::Minutes(minutes))
    }

    /// Interpret a JSON value: `null` or `"Infinity"` mean disabled, a number
    /// must match a preset exactly.
    pub fn from_json(value: &Value) -> Option<Self> {
        match value {
            Value::Null => Some(TimerPreset::Disabled),
            Value::String(s) if s.eq_ignore_ascii_case("infinity") => Some(TimerPreset::Disabled),
            Value::Number(n) => {
                let minutes = n.as_f64()?;
                if minutes.fract() != 0.0 || minutes <= 0.0 || minutes > u32::MAX as f64 {
                    return None;
                }
                Self::from_minutes(minutes as u32)
            }
            _ => None,
        }
    }

    /// Minutes until auto-stop, or `None` when disabled
    pub fn minutes(&self) -> Option<u32> {
        match self {
            TimerPreset::Disabled => None,
            TimerPreset::Minutes(m) => Some(*m),
        }
    }

    /// Position in [`TIMER_PRESETS`]; unknown values count as the first entry
    pub fn index(&self) -> usize {
        TIMER_PRESETS.iter().position(|p| p == self).unwrap_or(0)
    }

    /// The preset after this one, wrapping back to disabled
    pub fn next(&self) -> Self {
        TIMER_PRESETS[(self.index() + 1) % TIMER_PRESETS.len()]
    }

    /// Button label: the minute count, or `∞` when disabled
    pub fn label(&self) -> String {
        match self {
            TimerPreset::Disabled => "∞".to_string(),
            TimerPreset::Minutes(m) => m.to_string(),
        }
    }
}

// Disabled is written as null, which is what JSON encoding of an infinite
// number produces.
impl Serialize for TimerPreset {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            TimerPreset::Disabled => serializer.serialize_none(),
            TimerPreset::Minutes(m) => serializer.serialize_u32(*m),
        }
    }
}

/// Name of a known visual theme
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Theme(String);

impl Theme {
    /// Validate a theme name against [`THEMES`]
    pub fn parse(name: &str) -> Option<Self> {
        THEMES
            .iter()
            .any(|t| *t == name)
            .then(|| Theme(name.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for Theme {
    fn default() -> Self {
        Theme(THEMES[0].to_string())
    }
}

impl TryFrom<String> for Theme {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Theme::parse(&value).ok_or_else(|| format!("unknown theme: {}", value))
    }
}

impl From<Theme> for String {
    fn from(theme: Theme) -> Self {
        theme.0
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Session state - the selections shared by persistence and the display layer
#[derive(Debug, Clone, PartialEq)]
pub struct SessionState {
    /// Current track identifier
    pub sound: String,
    /// Normalized volume in [0, 1]
    pub volume: f64,
    /// Brightness percentage in [0, 100]
    pub brightness: u8,
    /// Sleep timer preset
    pub timer: TimerPreset,
    /// Whether audio is currently playing; never persisted
    pub is_playing: bool,
    /// Active visual theme; never persisted
    pub theme: Theme,
}

impl SessionState {
    /// Create a SessionState holding the defaults
    pub fn new() -> Self {
        Self {
            sound: DEFAULT_SOUND.to_string(),
            volume: DEFAULT_VOLUME,
            brightness: DEFAULT_BRIGHTNESS,
            timer: TimerPreset::Disabled,
            is_playing: false,
            theme: Theme::default(),
        }
    }

    /// Overlay opacity for the current brightness
    pub fn dim_factor(&self) -> f64 {
        dim_factor(self.brightness)
    }

    /// Glow intensity for the current brightness
    pub fn glow_strength(&self) -> f64 {
        glow_strength(self.brightness)
    }
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new()
    }
}

/// A sound identifier names a file directly inside the sounds directory
pub fn is_valid_sound(file: &str) -> bool {
    !file.is_empty() && file != ".." && !file.contains(['/', '\\', ':'])
}

/// Clamp a slider percentage to [0, 100]; NaN counts as 0
pub fn clamp_percent(percent: f64) -> f64 {
    if percent.is_nan() {
        0.0
    } else {
        percent.clamp(0.0, 100.0)
    }
}

/// Map a volume slider percentage onto [0, 1]
pub fn volume_from_percent(percent: f64) -> f64 {
    clamp_percent(percent) / 100.0
}

/// Map a brightness slider percentage onto an integer in [0, 100]
pub fn brightness_from_percent(percent: f64) -> u8 {
    clamp_percent(percent).round() as u8
}

/// Overlay opacity: 0% brightness is `MAX_DIM`, 100% is fully clear
pub fn dim_factor(brightness: u8) -> f64 {
    let brightness = brightness.min(100) as f64;
    MAX_DIM - (brightness / 100.0) * MAX_DIM
}

pub fn glow_strength(brightness: u8) -> f64 {
    brightness.min(100) as f64 / 100.0
}
