use anyhow::{anyhow, Result};
use serde_json::{json, Value};

use crate::error_codes::CodedError;
use crate::generated::{CharacterPrompt, GeneratedPrompt, ScenePrompt, VisualSignature};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewMode {
    Board,
    Json,
}

impl ViewMode {
    pub fn from_keyword(value: &str) -> Result<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "board" => Ok(Self::Board),
            "json" => Ok(Self::Json),
            _ => Err(anyhow!(CodedError::usage(
                "INVALID_VIEW",
                format!("invalid view '{value}'"),
            )
            .with_details(json!({
                "provided": value,
                "allowed": ["board", "json"]
            })))),
        }
    }
}

/// Renders a generated prompt for the terminal. Pure formatting: the only
/// logic is the scene/character split the parser already decided.
pub fn render(prompt: &GeneratedPrompt, view: ViewMode) -> Result<String> {
    match view {
        ViewMode::Json => prompt.to_raw_json(),
        ViewMode::Board => Ok(match prompt {
            GeneratedPrompt::Scene(scene) => render_scene_board(scene),
            GeneratedPrompt::Character(character) => render_character_board(character),
        }),
    }
}

fn render_scene_board(scene: &ScenePrompt) -> String {
    let mut out = String::new();
    push_section(&mut out, "VEO 3 MASTER PROMPT");
    out.push_str(&scene.veo_optimized_prompt);
    out.push('\n');

    if let Some(signature) = &scene.visual_signature {
        push_visual_dna(&mut out, signature);
    }

    push_section(&mut out, "TECHNICAL");
    out.push_str(&format!(
        "  aspect {} | camera {} | lens {}\n",
        scene.technical.aspect_ratio, scene.technical.camera_movement, scene.technical.lens_type
    ));
    if let Some(resolution) = &scene.technical.resolution {
        out.push_str(&format!("  resolution {resolution}"));
        if let Some(fps) = scene.technical.fps {
            out.push_str(&format!(" @ {fps} fps"));
        }
        out.push('\n');
    }

    push_section(&mut out, "AUDIO");
    out.push_str(&format!(
        "  theme {} | {}\n",
        scene.audio.music_theme, scene.audio.audio_prompt
    ));
    if !scene.audio.sound_effects.is_empty() {
        out.push_str(&format!("  sfx: {}\n", scene.audio.sound_effects.join(", ")));
    }

    push_section(&mut out, "SEQUENCE ARCHITECT");
    for (index, entry) in scene.timeline.iter().enumerate() {
        out.push_str(&format!(
            "  [{}] {}  {}\n",
            index + 1,
            entry.timestamp,
            entry.description
        ));
        if !entry.objects_in_focus.is_empty() {
            out.push_str(&format!("      focus: {}\n", entry.objects_in_focus.join(", ")));
        }
    }
    out
}

fn render_character_board(character: &CharacterPrompt) -> String {
    let mut out = String::new();
    push_section(&mut out, "VEO 3 MASTER PROMPT");
    out.push_str(&character.veo_optimized_prompt);
    out.push('\n');

    push_section(&mut out, "CHARACTER PROFILE");
    out.push_str(&format!("  name: {}\n", character.character_profile.name));
    if let Some(age_range) = &character.character_profile.age_range {
        out.push_str(&format!("  age: {age_range}\n"));
    }
    out.push_str(&format!(
        "  features: {}\n  outfit: {}\n",
        character.character_profile.distinctive_features, character.character_profile.outfit
    ));

    if let Some(signature) = &character.visual_signature {
        push_visual_dna(&mut out, signature);
    }

    push_section(&mut out, "ACTION");
    out.push_str(&character.action_description);
    out.push('\n');

    push_section(&mut out, "AUDIO");
    out.push_str(&format!(
        "  theme {} | {}\n",
        character.audio.music_theme, character.audio.audio_prompt
    ));

    if let Some(dialogue) = &character.dialogue_sequence {
        push_section(&mut out, "PERFORMANCE SEQUENCE");
        for (index, line) in dialogue.iter().enumerate() {
            out.push_str(&format!(
                "  [{}] {}  \"{}\"\n      speaker: {}\n",
                index + 1,
                line.emotion,
                line.line,
                line.speaker
            ));
        }
    }
    out
}

fn push_visual_dna(out: &mut String, signature: &VisualSignature) {
    push_section(out, "VISUAL DNA");
    out.push_str(&format!(
        "  palette: {}\n  lighting: {}\n  camera optic: {}\n  textures: {}\n  atmosphere: {}\n",
        signature.detected_palette.join(", "),
        signature.lighting_type,
        signature.camera_specs,
        signature.key_textures.join(", "),
        signature.environmental_mood
    ));
}

fn push_section(out: &mut String, title: &str) {
    if !out.is_empty() {
        out.push('\n');
    }
    out.push_str(&format!("== {title} ==\n"));
}

/// Dot-path field extraction over the raw JSON value, the CLI analog of the
/// per-field copy buttons. Numeric components index arrays:
/// `timeline.2.description`.
pub fn extract_field(prompt: &GeneratedPrompt, path: &str) -> Result<String> {
    let root = serde_json::to_value(prompt)?;
    let mut current = &root;
    for component in path.split('.') {
        current = match (current, component.parse::<usize>()) {
            (Value::Array(items), Ok(index)) => items.get(index).ok_or_else(|| {
                anyhow!(bad_field_path(path, component))
            })?,
            (Value::Object(map), _) => map
                .get(component)
                .ok_or_else(|| anyhow!(bad_field_path(path, component)))?,
            _ => return Err(anyhow!(bad_field_path(path, component))),
        };
    }
    Ok(match current {
        Value::String(text) => text.clone(),
        other => serde_json::to_string_pretty(other)?,
    })
}

fn bad_field_path(path: &str, component: &str) -> CodedError {
    CodedError::usage(
        "BAD_FIELD_PATH",
        format!("field path '{path}' has no component '{component}'"),
    )
    .with_details(json!({ "path": path, "component": component }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error_codes::find_coded_error;
    use serde_json::json;

    fn sample_scene() -> GeneratedPrompt {
        GeneratedPrompt::from_json_str(
            &json!({
                "title": "Harbor Dawn",
                "visual_signature": {
                    "detected_palette": ["slate blue", "amber"],
                    "lighting_type": "volumetric",
                    "camera_specs": "35mm low angle",
                    "key_textures": ["wet stone"],
                    "environmental_mood": "calm"
                },
                "technical": {
                    "aspect_ratio": "16:9",
                    "camera_movement": "slow dolly",
                    "lens_type": "35mm"
                },
                "audio": { "music_theme": "Cinematic", "audio_prompt": "low strings" },
                "prompt_components": {
                    "subject_action": "a",
                    "environment_context": "b",
                    "lighting_atmosphere": "c",
                    "camera_technical": "d",
                    "texture_details": "e"
                },
                "timeline": [
                    {
                        "timestamp": "00:00",
                        "description": "boats sway",
                        "objects_in_focus": ["boat", "rope"]
                    },
                    { "timestamp": "00:05", "description": "sun breaks" }
                ],
                "veo_optimized_prompt": "[STYLE: CINEMATIC] harbor at dawn"
            })
            .to_string(),
        )
        .expect("sample scene should parse")
    }

    #[test]
    fn board_view_shows_master_prompt_and_sequence() {
        let rendered = render(&sample_scene(), ViewMode::Board).expect("renders");
        assert!(rendered.contains("VEO 3 MASTER PROMPT"));
        assert!(rendered.contains("[STYLE: CINEMATIC] harbor at dawn"));
        assert!(rendered.contains("[1] 00:00  boats sway"));
        assert!(rendered.contains("focus: boat, rope"));
        assert!(rendered.contains("VISUAL DNA"));
    }

    #[test]
    fn json_view_is_parseable_json() {
        let rendered = render(&sample_scene(), ViewMode::Json).expect("renders");
        let value: serde_json::Value = serde_json::from_str(&rendered).expect("valid JSON");
        assert_eq!(value["title"], "Harbor Dawn");
    }

    #[test]
    fn field_extraction_walks_objects_and_arrays() {
        let prompt = sample_scene();
        assert_eq!(
            extract_field(&prompt, "veo_optimized_prompt").expect("field exists"),
            "[STYLE: CINEMATIC] harbor at dawn"
        );
        assert_eq!(
            extract_field(&prompt, "timeline.1.description").expect("field exists"),
            "sun breaks"
        );
        assert_eq!(
            extract_field(&prompt, "visual_signature.detected_palette.0").expect("field exists"),
            "slate blue"
        );
    }

    #[test]
    fn unknown_field_path_is_a_coded_usage_error() {
        let error =
            extract_field(&sample_scene(), "timeline.9.description").expect_err("out of range");
        let coded = find_coded_error(&error).expect("should carry a coded error");
        assert_eq!(coded.code, "BAD_FIELD_PATH");
    }
}
