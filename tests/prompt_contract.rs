use std::fs;
use std::path::{Path, PathBuf};

use tempfile::tempdir;
use veoarch::prompt_templates::{
    build_final_prompt, build_system_instruction, CharacterInput, PromptInput, SceneInput,
};
use veoarch::reference_images::ReferenceImageSet;
use veoarch::settings::{Duration, PromptSettings, VisualStyle};

const TINY_PNG: &[u8] = &[
    0x89, 0x50, 0x4e, 0x47, 0x0d, 0x0a, 0x1a, 0x0a, 0x00, 0x00, 0x00, 0x0d, 0x49, 0x48, 0x44,
    0x52, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x01, 0x08, 0x06, 0x00, 0x00, 0x00, 0x1f,
    0x15, 0xc4, 0x89, 0x00, 0x00, 0x00, 0x0d, 0x49, 0x44, 0x41, 0x54, 0x78, 0x9c, 0x62, 0x00,
    0x01, 0x00, 0x00, 0x05, 0x00, 0x01, 0x0d, 0x0a, 0x2d, 0xb4, 0x00, 0x00, 0x00, 0x00, 0x49,
    0x45, 0x4e, 0x44, 0xae, 0x42, 0x60, 0x82,
];

fn write_png(dir: &Path, name: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, TINY_PNG).expect("png should write");
    path
}

fn one_image() -> (tempfile::TempDir, ReferenceImageSet) {
    let dir = tempdir().expect("tempdir should create");
    let path = write_png(dir.path(), "ref.png");
    let set = ReferenceImageSet::load_paths(&[path]).expect("png should load");
    (dir, set)
}

#[test]
fn image_only_character_gets_the_reverse_engineer_variant() {
    let (_dir, images) = one_image();
    let input = PromptInput::Character(CharacterInput::default());
    let prompt = build_final_prompt(&input, &images);
    assert!(prompt.contains("NO USER CONTEXT. STRICTLY REVERSE ENGINEER THE IMAGE."));
}

#[test]
fn character_text_fields_switch_to_the_context_aware_variant() {
    let (_dir, images) = one_image();
    for input in [
        CharacterInput {
            name: "Kiko".to_owned(),
            ..CharacterInput::default()
        },
        CharacterInput {
            description: "freckled kid".to_owned(),
            ..CharacterInput::default()
        },
        CharacterInput {
            starting_scene: "a meadow".to_owned(),
            ..CharacterInput::default()
        },
    ] {
        let prompt = build_final_prompt(&PromptInput::Character(input), &images);
        assert!(prompt.contains("User Context (Name:"));
        assert!(!prompt.contains("REVERSE ENGINEER"));
    }
}

#[test]
fn visual_anchoring_prioritizes_the_image_over_text() {
    let (_dir, images) = one_image();
    let input = PromptInput::Character(CharacterInput {
        name: "Kiko".to_owned(),
        description: "blonde".to_owned(),
        starting_scene: "a meadow".to_owned(),
    });
    let prompt = build_final_prompt(&input, &images);
    // Image wins for appearance; text only steers acting and emotion.
    assert!(prompt.contains("FOLLOW THE IMAGE"));
    assert!(prompt.contains("ONLY for the acting/emotion/action"));
}

#[test]
fn image_only_scene_replicates_the_image() {
    let (_dir, images) = one_image();
    let input = PromptInput::Scene(SceneInput::default());
    let prompt = build_final_prompt(&input, &images);
    assert!(prompt.contains("NO USER CONTEXT. REPLICATE IMAGE EXACTLY."));
}

#[test]
fn instruction_reports_the_exact_segment_count_per_duration() {
    for (duration, expected) in [
        (Duration::Short15, 3),
        (Duration::Short30, 5),
        (Duration::Minute1, 10),
        (Duration::Minute2, 18),
    ] {
        let settings = PromptSettings {
            duration,
            ..PromptSettings::default()
        };
        let instruction = build_system_instruction(&settings, false);
        assert!(
            instruction.contains(&format!("Generate exactly {expected} steps")),
            "duration {} should demand {expected} steps",
            duration.keyword()
        );
    }
}

#[test]
fn instruction_forbids_realism_outside_the_default_style() {
    let settings = PromptSettings {
        visual_style: VisualStyle::Claymation,
        ..PromptSettings::default()
    };
    let instruction = build_system_instruction(&settings, false);
    assert!(instruction.contains("Mandatory Style: CLAYMATION"));
    assert!(instruction.contains("FORBID photographic words"));
    assert!(instruction.contains("\"[STYLE: CLAYMATION]\""));
    assert!(instruction.contains("fingerprints visible"));
}
