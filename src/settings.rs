use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::error_codes::CodedError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Duration {
    #[serde(rename = "15s")]
    Short15,
    #[serde(rename = "30s")]
    Short30,
    #[serde(rename = "1m")]
    Minute1,
    #[serde(rename = "2m")]
    Minute2,
}

impl Duration {
    pub fn from_keyword(value: &str) -> Result<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "15s" => Ok(Self::Short15),
            "30s" => Ok(Self::Short30),
            "1m" => Ok(Self::Minute1),
            "2m" => Ok(Self::Minute2),
            _ => Err(anyhow!(CodedError::usage(
                "INVALID_DURATION",
                format!("invalid duration '{value}'"),
            )
            .with_details(json!({
                "provided": value,
                "allowed": ["15s", "30s", "1m", "2m"]
            })))),
        }
    }

    pub fn keyword(self) -> &'static str {
        match self {
            Self::Short15 => "15s",
            Self::Short30 => "30s",
            Self::Minute1 => "1m",
            Self::Minute2 => "2m",
        }
    }

    /// Exact number of timeline/dialogue segments requested for this
    /// duration. The response schema pins min and max items to this value.
    pub fn segment_count(self) -> usize {
        match self {
            Self::Short15 => 3,
            Self::Short30 => 5,
            Self::Minute1 => 10,
            Self::Minute2 => 18,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    Indonesian,
    English,
}

impl Language {
    pub fn from_keyword(value: &str) -> Result<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "indonesian" => Ok(Self::Indonesian),
            "english" => Ok(Self::English),
            _ => Err(anyhow!(CodedError::usage(
                "INVALID_LANGUAGE",
                format!("invalid language '{value}'"),
            )
            .with_details(json!({
                "provided": value,
                "allowed": ["indonesian", "english"]
            })))),
        }
    }

    pub fn keyword(self) -> &'static str {
        match self {
            Self::Indonesian => "indonesian",
            Self::English => "english",
        }
    }

    /// Language name as it appears in the instruction sent to the model.
    pub fn instruction_name(self) -> &'static str {
        match self {
            Self::Indonesian => "Indonesia",
            Self::English => "Inggris",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Complexity {
    Simple,
    Detail,
    Complex,
}

impl Complexity {
    pub fn from_keyword(value: &str) -> Result<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "simple" => Ok(Self::Simple),
            "detail" => Ok(Self::Detail),
            "complex" => Ok(Self::Complex),
            _ => Err(anyhow!(CodedError::usage(
                "INVALID_COMPLEXITY",
                format!("invalid complexity '{value}'"),
            )
            .with_details(json!({
                "provided": value,
                "allowed": ["simple", "detail", "complex"]
            })))),
        }
    }

    pub fn keyword(self) -> &'static str {
        match self {
            Self::Simple => "simple",
            Self::Detail => "detail",
            Self::Complex => "complex",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Simple => "Simple",
            Self::Detail => "Detail",
            Self::Complex => "Complex",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MusicTheme {
    Cinematic,
    Electronic,
    Horror,
    Lofi,
}

impl MusicTheme {
    pub fn from_keyword(value: &str) -> Result<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "cinematic" => Ok(Self::Cinematic),
            "electronic" => Ok(Self::Electronic),
            "horror" => Ok(Self::Horror),
            "lofi" | "lo-fi" => Ok(Self::Lofi),
            _ => Err(anyhow!(CodedError::usage(
                "INVALID_MUSIC_THEME",
                format!("invalid music theme '{value}'"),
            )
            .with_details(json!({
                "provided": value,
                "allowed": ["cinematic", "electronic", "horror", "lofi"]
            })))),
        }
    }

    pub fn keyword(self) -> &'static str {
        match self {
            Self::Cinematic => "cinematic",
            Self::Electronic => "electronic",
            Self::Horror => "horror",
            Self::Lofi => "lofi",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Cinematic => "Cinematic",
            Self::Electronic => "Electronic",
            Self::Horror => "Horror",
            Self::Lofi => "Lo-fi",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VisualStyle {
    Default,
    Cinematic,
    Anime,
    Cyberpunk,
    Lego,
    Claymation,
}

impl VisualStyle {
    pub const ALL: [Self; 6] = [
        Self::Default,
        Self::Cinematic,
        Self::Anime,
        Self::Cyberpunk,
        Self::Lego,
        Self::Claymation,
    ];

    pub fn from_keyword(value: &str) -> Result<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "default" => Ok(Self::Default),
            "cinematic" => Ok(Self::Cinematic),
            "anime" => Ok(Self::Anime),
            "cyberpunk" => Ok(Self::Cyberpunk),
            "lego" => Ok(Self::Lego),
            "claymation" => Ok(Self::Claymation),
            _ => Err(anyhow!(CodedError::usage(
                "INVALID_STYLE",
                format!("invalid visual style '{value}'"),
            )
            .with_details(json!({
                "provided": value,
                "allowed": [
                    "default", "cinematic", "anime", "cyberpunk", "lego", "claymation"
                ]
            })))),
        }
    }

    pub fn keyword(self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::Cinematic => "cinematic",
            Self::Anime => "anime",
            Self::Cyberpunk => "cyberpunk",
            Self::Lego => "lego",
            Self::Claymation => "claymation",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Default => "Default",
            Self::Cinematic => "Cinematic",
            Self::Anime => "Anime",
            Self::Cyberpunk => "Cyberpunk",
            Self::Lego => "Lego",
            Self::Claymation => "Claymation",
        }
    }

    /// Style guide embedded in the system instruction. These are the rules
    /// the model is told to enforce for every visual field it produces.
    pub fn style_rules(self) -> &'static str {
        match self {
            Self::Default => "Realistic, photo-real, high-fidelity.",
            Self::Cinematic => "Anamorphic flare, 35mm grain, moody lighting, HDR.",
            Self::Anime => {
                "2D aesthetic, cel-shading, ink outlines, painted backgrounds. NO REALISM."
            }
            Self::Cyberpunk => {
                "Neon glow, futuristic tech, rainy streets, high contrast cyan/magenta."
            }
            Self::Lego => {
                "Everything made of plastic bricks, studs visible, stop-motion animation style."
            }
            Self::Claymation => {
                "Hand-crafted clay, fingerprints visible, tactile organic lighting, stop-motion."
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AspectRatio {
    #[serde(rename = "16:9")]
    Landscape,
    #[serde(rename = "9:16")]
    Portrait,
    #[serde(rename = "1:1")]
    Square,
    #[serde(rename = "21:9")]
    Wide,
    #[serde(rename = "4:3")]
    Classic,
}

impl AspectRatio {
    pub fn from_keyword(value: &str) -> Result<Self> {
        match value.trim() {
            "16:9" => Ok(Self::Landscape),
            "9:16" => Ok(Self::Portrait),
            "1:1" => Ok(Self::Square),
            "21:9" => Ok(Self::Wide),
            "4:3" => Ok(Self::Classic),
            _ => Err(anyhow!(CodedError::usage(
                "INVALID_ASPECT_RATIO",
                format!("invalid aspect ratio '{value}'"),
            )
            .with_details(json!({
                "provided": value,
                "allowed": ["16:9", "9:16", "1:1", "21:9", "4:3"]
            })))),
        }
    }

    pub fn keyword(self) -> &'static str {
        match self {
            Self::Landscape => "16:9",
            Self::Portrait => "9:16",
            Self::Square => "1:1",
            Self::Wide => "21:9",
            Self::Classic => "4:3",
        }
    }
}

/// Flat settings record attached to every generation request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptSettings {
    pub duration: Duration,
    pub language: Language,
    pub complexity: Complexity,
    pub music_theme: MusicTheme,
    pub visual_style: VisualStyle,
    pub aspect_ratio: AspectRatio,
}

impl Default for PromptSettings {
    fn default() -> Self {
        Self {
            duration: Duration::Short15,
            language: Language::Indonesian,
            complexity: Complexity::Detail,
            music_theme: MusicTheme::Cinematic,
            visual_style: VisualStyle::Default,
            aspect_ratio: AspectRatio::Landscape,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error_codes::find_coded_error;

    #[test]
    fn segment_count_matches_duration_table() {
        assert_eq!(Duration::Short15.segment_count(), 3);
        assert_eq!(Duration::Short30.segment_count(), 5);
        assert_eq!(Duration::Minute1.segment_count(), 10);
        assert_eq!(Duration::Minute2.segment_count(), 18);
    }

    #[test]
    fn duration_keywords_round_trip() {
        for keyword in ["15s", "30s", "1m", "2m"] {
            let parsed = Duration::from_keyword(keyword).expect("keyword should parse");
            assert_eq!(parsed.keyword(), keyword);
        }
    }

    #[test]
    fn invalid_duration_is_a_coded_usage_error() {
        let error = Duration::from_keyword("45s").expect_err("45s is not offered");
        let coded = find_coded_error(&error).expect("should carry a coded error");
        assert_eq!(coded.code, "INVALID_DURATION");
    }

    #[test]
    fn music_theme_accepts_both_lofi_spellings() {
        assert_eq!(
            MusicTheme::from_keyword("lo-fi").expect("should parse"),
            MusicTheme::Lofi
        );
        assert_eq!(
            MusicTheme::from_keyword("lofi").expect("should parse"),
            MusicTheme::Lofi
        );
    }

    #[test]
    fn every_style_has_rules() {
        for style in VisualStyle::ALL {
            assert!(!style.style_rules().is_empty());
        }
    }

    #[test]
    fn default_settings_match_the_form_defaults() {
        let settings = PromptSettings::default();
        assert_eq!(settings.duration, Duration::Short15);
        assert_eq!(settings.language, Language::Indonesian);
        assert_eq!(settings.complexity, Complexity::Detail);
        assert_eq!(settings.music_theme, MusicTheme::Cinematic);
        assert_eq!(settings.visual_style, VisualStyle::Default);
        assert_eq!(settings.aspect_ratio, AspectRatio::Landscape);
    }
}
