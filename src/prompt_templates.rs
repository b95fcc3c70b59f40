use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};

use crate::error_codes::CodedError;
use crate::reference_images::ReferenceImageSet;
use crate::settings::PromptSettings;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PromptMode {
    Scene,
    Character,
}

impl PromptMode {
    pub fn keyword(self) -> &'static str {
        match self {
            Self::Scene => "scene",
            Self::Character => "character",
        }
    }
}

/// Free-form scene idea.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SceneInput {
    pub text: String,
}

/// Structured character fields. All optional when reference images carry the
/// appearance.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CharacterInput {
    pub name: String,
    pub description: String,
    pub starting_scene: String,
}

impl CharacterInput {
    pub fn is_blank(&self) -> bool {
        self.name.trim().is_empty()
            && self.description.trim().is_empty()
            && self.starting_scene.trim().is_empty()
    }
}

#[derive(Debug, Clone)]
pub enum PromptInput {
    Scene(SceneInput),
    Character(CharacterInput),
}

impl PromptInput {
    pub fn mode(&self) -> PromptMode {
        match self {
            Self::Scene(_) => PromptMode::Scene,
            Self::Character(_) => PromptMode::Character,
        }
    }
}

/// Form-validity rule carried over from the input panel: a scene needs text
/// or at least one image; a character needs (name and starting scene) or at
/// least one image.
pub fn validate_input(input: &PromptInput, images: &ReferenceImageSet) -> Result<()> {
    let valid = match input {
        PromptInput::Scene(scene) => !scene.text.trim().is_empty() || !images.is_empty(),
        PromptInput::Character(character) => {
            (!character.name.trim().is_empty() && !character.starting_scene.trim().is_empty())
                || !images.is_empty()
        }
    };
    if valid {
        Ok(())
    } else {
        Err(anyhow!(CodedError::usage(
            "EMPTY_FORM",
            match input.mode() {
                PromptMode::Scene =>
                    "provide scene text or at least one reference image".to_owned(),
                PromptMode::Character =>
                    "provide a character name and starting scene, or at least one reference image"
                        .to_owned(),
            },
        )))
    }
}

/// Derives the user-facing prompt text sent as the first request part.
///
/// With reference images attached the prompt switches to the visual-anchoring
/// template: image content overrides conflicting user text for physical
/// appearance, and user text only governs action and emotion.
pub fn build_final_prompt(input: &PromptInput, images: &ReferenceImageSet) -> String {
    if !images.is_empty() {
        return match input {
            PromptInput::Character(character) => {
                let user_ctx = if character.is_blank() {
                    "NO USER CONTEXT. STRICTLY REVERSE ENGINEER THE IMAGE.".to_owned()
                } else {
                    format!(
                        "User Context (Name: {}, Desc: {}, Scene: {})",
                        character.name, character.description, character.starting_scene
                    )
                };
                format!(
                    "[STRICT VISUAL ANALYSIS MODE]\n\
                     {user_ctx}\n\
                     \n\
                     TASK:\n\
                     1. Ignore any default assumptions.\n\
                     2. Describe the character in the attached image EXACTLY (Face, Hair, Skin Texture, Clothing).\n\
                     3. If the User Context contradicts the image visually (e.g. user says \"blonde\" but image is \"dark hair\"), FOLLOW THE IMAGE.\n\
                     4. Use the User Context ONLY for the acting/emotion/action, NOT for physical appearance."
                )
            }
            PromptInput::Scene(scene) => {
                let user_ctx = if scene.text.trim().is_empty() {
                    "NO USER CONTEXT. REPLICATE IMAGE EXACTLY.".to_owned()
                } else {
                    format!("User Action/Context: \"{}\"", scene.text)
                };
                format!(
                    "[STRICT VISUAL ANALYSIS MODE]\n\
                     {user_ctx}\n\
                     \n\
                     TASK:\n\
                     1. Perform a pixel-perfect breakdown of the attached image.\n\
                     2. Extract: Lighting Setup, Focal Length, Color Palette, and Texture.\n\
                     3. The output Veo 3 prompt must generate a video that looks IDENTICAL to this starting image.\n\
                     4. Only use the \"User Action\" to determine what moves or happens within this existing visual scene."
                )
            }
        };
    }

    match input {
        PromptInput::Scene(scene) => scene.text.clone(),
        PromptInput::Character(character) => format!(
            "Character Name: {}\nCharacter Description: {}\nInitial Scene Context: {}",
            character.name, character.description, character.starting_scene
        ),
    }
}

/// Prompt text fallback for the image-only case where no text survived.
pub fn default_prompt_text(settings: &PromptSettings) -> String {
    format!(
        "Create a {} scene based on the visuals.",
        settings.visual_style.label()
    )
}

/// System instruction embedding the style rules, enforcement constraints and
/// the settings bundle. Identical for both modes; the response schema does
/// the shape selection.
pub fn build_system_instruction(settings: &PromptSettings, has_images: bool) -> String {
    let style = settings.visual_style;
    let segment_count = settings.duration.segment_count();
    let image_note = if has_images {
        "Reference images are provided. TRANSLATE their content into the requested style.\n"
    } else {
        ""
    };
    format!(
        "Role: Senior Video Architect for Veo 3.\n\
         Mandatory Style: {style_upper}\n\
         Style Rules: {rules}\n\
         \n\
         Strict Visual Enforcement:\n\
         1. If style is Anime, Lego, or Claymation: FORBID photographic words.\n\
         2. Instead of \"realistic\", use \"{style_label} consistent rendering\".\n\
         3. The \"veo_optimized_prompt\" MUST start with: \"[STYLE: {style_upper}]\".\n\
         4. Each timeline description must be stylized (e.g., \"The Lego character jumps over brick-built obstacles\").\n\
         \n\
         Configuration:\n\
         - Language: {language}\n\
         - Duration: {duration} (Generate exactly {segment_count} steps)\n\
         - Complexity: {complexity}\n\
         - Aspect Ratio: {aspect}\n\
         - Music Theme: {music}\n\
         {image_note}",
        style_upper = style.label().to_ascii_uppercase(),
        style_label = style.label(),
        rules = style.style_rules(),
        language = settings.language.instruction_name(),
        duration = settings.duration.keyword(),
        complexity = settings.complexity.label(),
        aspect = settings.aspect_ratio.keyword(),
        music = settings.music_theme.label(),
    )
}
