use serde_json::{json, Value};

use crate::prompt_templates::PromptMode;

/// Builders for the structured-output schema sent with every request.
///
/// The dialect is the Gemini `responseSchema` subset: uppercase `type`
/// names, `properties`/`required`, and `minItems`/`maxItems` on arrays. The
/// timeline and dialogue arrays pin min and max to the exact segment count
/// derived from the duration, so the schema itself enforces the count.
pub fn schema_for(mode: PromptMode, segment_count: usize) -> Value {
    match mode {
        PromptMode::Scene => scene_schema(segment_count),
        PromptMode::Character => character_schema(segment_count),
    }
}

fn visual_signature_schema() -> Value {
    json!({
        "type": "OBJECT",
        "description": "Deep visual metadata extracted for the selected visual style.",
        "properties": {
            "detected_palette": {
                "type": "ARRAY",
                "items": { "type": "STRING" },
                "description": "Color palette that MUST match the style aesthetic (e.g. neon for Cyberpunk)."
            },
            "lighting_type": {
                "type": "STRING",
                "description": "Style-specific lighting technique (e.g. Volumetric, Rim Lighting, Cel-shaded light)."
            },
            "camera_specs": {
                "type": "STRING",
                "description": "Lens and camera angle."
            },
            "key_textures": {
                "type": "ARRAY",
                "items": { "type": "STRING" },
                "description": "Material textures (e.g. clay fingerprints, plastic studs, ink lines)."
            },
            "environmental_mood": {
                "type": "STRING",
                "description": "Atmospheric mood."
            }
        },
        "required": [
            "detected_palette",
            "lighting_type",
            "camera_specs",
            "key_textures",
            "environmental_mood"
        ]
    })
}

fn prompt_components_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "subject_action": { "type": "STRING" },
            "environment_context": { "type": "STRING" },
            "lighting_atmosphere": { "type": "STRING" },
            "camera_technical": { "type": "STRING" },
            "texture_details": { "type": "STRING" }
        },
        "required": [
            "subject_action",
            "environment_context",
            "lighting_atmosphere",
            "camera_technical",
            "texture_details"
        ]
    })
}

fn audio_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "music_theme": { "type": "STRING" },
            "sound_effects": { "type": "ARRAY", "items": { "type": "STRING" } },
            "audio_prompt": { "type": "STRING" }
        },
        "required": ["music_theme", "audio_prompt"]
    })
}

fn scene_schema(segment_count: usize) -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "title": { "type": "STRING" },
            "visual_signature": visual_signature_schema(),
            "technical": {
                "type": "OBJECT",
                "properties": {
                    "aspect_ratio": { "type": "STRING" },
                    "camera_movement": { "type": "STRING" },
                    "lens_type": { "type": "STRING" },
                    "resolution": { "type": "STRING" },
                    "fps": { "type": "NUMBER" }
                },
                "required": ["aspect_ratio", "camera_movement", "lens_type"]
            },
            "visuals": {
                "type": "OBJECT",
                "properties": {
                    "lighting_style": { "type": "STRING" },
                    "color_grading": { "type": "STRING" },
                    "atmosphere": { "type": "STRING" },
                    "style_implementation": { "type": "STRING" }
                }
            },
            "audio": audio_schema(),
            "prompt_components": prompt_components_schema(),
            "timeline": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "timestamp": { "type": "STRING" },
                        "description": { "type": "STRING" },
                        "objects_in_focus": { "type": "ARRAY", "items": { "type": "STRING" } }
                    }
                },
                "minItems": segment_count,
                "maxItems": segment_count
            },
            "veo_optimized_prompt": { "type": "STRING" }
        },
        "required": [
            "title",
            "visual_signature",
            "technical",
            "visuals",
            "audio",
            "prompt_components",
            "timeline",
            "veo_optimized_prompt"
        ]
    })
}

fn character_schema(segment_count: usize) -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "character_profile": {
                "type": "OBJECT",
                "properties": {
                    "name": { "type": "STRING" },
                    "age_range": { "type": "STRING" },
                    "distinctive_features": { "type": "STRING" },
                    "outfit": { "type": "STRING" }
                },
                "required": ["name", "distinctive_features", "outfit"]
            },
            "visual_signature": visual_signature_schema(),
            "performance": {
                "type": "OBJECT",
                "properties": {
                    "expression": { "type": "STRING" },
                    "body_language": { "type": "STRING" },
                    "eye_contact": { "type": "STRING" }
                }
            },
            "audio": audio_schema(),
            "prompt_components": prompt_components_schema(),
            "dialogue_sequence": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "speaker": { "type": "STRING" },
                        "line": { "type": "STRING" },
                        "emotion": { "type": "STRING" }
                    }
                },
                "minItems": segment_count,
                "maxItems": segment_count
            },
            "action_description": { "type": "STRING" },
            "veo_optimized_prompt": { "type": "STRING" }
        },
        "required": [
            "character_profile",
            "visual_signature",
            "performance",
            "audio",
            "prompt_components",
            "action_description",
            "veo_optimized_prompt"
        ]
    })
}
