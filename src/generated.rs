use anyhow::{bail, Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::prompt_templates::PromptMode;
use crate::settings::PromptSettings;

/// Visual metadata block shared by both output shapes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VisualSignature {
    pub detected_palette: Vec<String>,
    pub lighting_type: String,
    pub camera_specs: String,
    pub key_textures: Vec<String>,
    pub environmental_mood: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PromptComponents {
    pub subject_action: String,
    pub environment_context: String,
    pub lighting_atmosphere: String,
    pub camera_technical: String,
    pub texture_details: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AudioDesign {
    pub music_theme: String,
    #[serde(default)]
    pub sound_effects: Vec<String>,
    pub audio_prompt: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TechnicalSpec {
    pub aspect_ratio: String,
    pub camera_movement: String,
    pub lens_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resolution: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fps: Option<f64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SceneVisuals {
    #[serde(default)]
    pub lighting_style: Option<String>,
    #[serde(default)]
    pub color_grading: Option<String>,
    #[serde(default)]
    pub atmosphere: Option<String>,
    #[serde(default)]
    pub style_implementation: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimelineEntry {
    pub timestamp: String,
    pub description: String,
    #[serde(default)]
    pub objects_in_focus: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenePrompt {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visual_signature: Option<VisualSignature>,
    pub technical: TechnicalSpec,
    #[serde(default)]
    pub visuals: SceneVisuals,
    pub audio: AudioDesign,
    pub prompt_components: PromptComponents,
    pub timeline: Vec<TimelineEntry>,
    pub veo_optimized_prompt: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CharacterProfile {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub age_range: Option<String>,
    pub distinctive_features: String,
    pub outfit: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Performance {
    #[serde(default)]
    pub expression: Option<String>,
    #[serde(default)]
    pub body_language: Option<String>,
    #[serde(default)]
    pub eye_contact: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DialogueLine {
    pub speaker: String,
    pub line: String,
    pub emotion: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CharacterPrompt {
    pub character_profile: CharacterProfile,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visual_signature: Option<VisualSignature>,
    #[serde(default)]
    pub performance: Performance,
    pub audio: AudioDesign,
    pub prompt_components: PromptComponents,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dialogue_sequence: Option<Vec<DialogueLine>>,
    pub action_description: String,
    pub veo_optimized_prompt: String,
}

/// One generated result, scene or character.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum GeneratedPrompt {
    Scene(ScenePrompt),
    Character(CharacterPrompt),
}

impl GeneratedPrompt {
    /// Parses model output text. Shape discrimination is by presence of a
    /// top-level `timeline` key: present means scene, absent means
    /// character.
    pub fn from_json_str(text: &str) -> Result<Self> {
        let value: Value =
            serde_json::from_str(text).context("model response is not valid JSON")?;
        Self::from_value(value)
    }

    pub fn from_value(value: Value) -> Result<Self> {
        let Some(object) = value.as_object() else {
            bail!("model response is not a JSON object");
        };
        if object.contains_key("timeline") {
            let scene: ScenePrompt = serde_json::from_value(value)
                .context("model response does not match the scene shape")?;
            Ok(Self::Scene(scene))
        } else {
            let character: CharacterPrompt = serde_json::from_value(value)
                .context("model response does not match the character shape")?;
            Ok(Self::Character(character))
        }
    }

    pub fn mode(&self) -> PromptMode {
        match self {
            Self::Scene(_) => PromptMode::Scene,
            Self::Character(_) => PromptMode::Character,
        }
    }

    pub fn veo_optimized_prompt(&self) -> &str {
        match self {
            Self::Scene(scene) => &scene.veo_optimized_prompt,
            Self::Character(character) => &character.veo_optimized_prompt,
        }
    }

    pub fn visual_signature(&self) -> Option<&VisualSignature> {
        match self {
            Self::Scene(scene) => scene.visual_signature.as_ref(),
            Self::Character(character) => character.visual_signature.as_ref(),
        }
    }

    pub fn to_raw_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).context("failed to serialize generated prompt")
    }
}

/// Record of one generation run, written next to the result.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryRecord {
    pub mode: PromptMode,
    pub final_prompt: String,
    pub settings: PromptSettings,
    pub image_count: usize,
    pub model: String,
    pub created_at: DateTime<Utc>,
}
