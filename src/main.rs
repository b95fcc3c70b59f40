use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Duration as StdDuration;

use anyhow::{Context, Result};
use chrono::Utc;
use clap::{Args, Parser, Subcommand};
use reqwest::Client;

use veoarch::error_codes::{find_coded_error, CodedErrorKind};
use veoarch::gemini_client::{api_key_from_env, model_from_env, GeminiClient, GenerationRequest};
use veoarch::generated::{GeneratedPrompt, HistoryRecord};
use veoarch::prompt_templates::{
    build_final_prompt, build_system_instruction, validate_input, CharacterInput, PromptInput,
    SceneInput,
};
use veoarch::reference_images::ReferenceImageSet;
use veoarch::render::{extract_field, render, ViewMode};
use veoarch::settings::{
    AspectRatio, Complexity, Duration, Language, MusicTheme, PromptSettings, VisualStyle,
};

const REQUEST_TIMEOUT_SECS: u64 = 60;
const GENERIC_FAILURE_LINE: &str =
    "Failed to generate prompt. Please try again or check your connection.";

#[derive(Debug, Parser)]
#[command(name = "veoarch")]
#[command(about = "Veo 3 JSON prompt architect")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Generate a scene prompt from free text and/or reference images
    Scene {
        /// Video idea, free text
        text: Option<String>,
        #[command(flatten)]
        common: GenerateArgs,
    },
    /// Generate a character prompt from structured fields and/or images
    Character {
        #[arg(long, default_value = "")]
        name: String,
        #[arg(long, default_value = "")]
        description: String,
        #[arg(long = "starting-scene", default_value = "")]
        starting_scene: String,
        #[command(flatten)]
        common: GenerateArgs,
    },
    /// Re-render a saved result.json without calling the API
    Show {
        result: PathBuf,
        #[arg(long, default_value = "board")]
        view: String,
        #[arg(long)]
        field: Option<String>,
    },
    /// List the allowed setting keywords and the duration table
    Options {
        #[arg(long, default_value_t = false)]
        json: bool,
    },
}

#[derive(Debug, Args)]
struct GenerateArgs {
    /// Reference image (repeat up to 4 times)
    #[arg(long = "image")]
    images: Vec<PathBuf>,
    #[arg(long, default_value = "15s")]
    duration: String,
    #[arg(long, default_value = "indonesian")]
    language: String,
    #[arg(long, default_value = "detail")]
    complexity: String,
    #[arg(long = "music", default_value = "cinematic")]
    music_theme: String,
    #[arg(long = "style", default_value = "default")]
    visual_style: String,
    #[arg(long = "aspect", default_value = "16:9")]
    aspect_ratio: String,
    #[arg(long, default_value = "board")]
    view: String,
    /// Print a single field (dot path, e.g. timeline.0.description)
    #[arg(long)]
    field: Option<String>,
    /// Folder for timestamped run outputs
    #[arg(long = "out", default_value = "./exports")]
    out_folder: PathBuf,
    #[arg(long, default_value_t = false)]
    verbose: bool,
}

impl GenerateArgs {
    fn settings(&self) -> Result<PromptSettings> {
        Ok(PromptSettings {
            duration: Duration::from_keyword(&self.duration)?,
            language: Language::from_keyword(&self.language)?,
            complexity: Complexity::from_keyword(&self.complexity)?,
            music_theme: MusicTheme::from_keyword(&self.music_theme)?,
            visual_style: VisualStyle::from_keyword(&self.visual_style)?,
            aspect_ratio: AspectRatio::from_keyword(&self.aspect_ratio)?,
        })
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    let outcome = match cli.command {
        Commands::Scene { text, common } => {
            let input = PromptInput::Scene(SceneInput {
                text: text.unwrap_or_default(),
            });
            run_generate(input, &common).await
        }
        Commands::Character {
            name,
            description,
            starting_scene,
            common,
        } => {
            let input = PromptInput::Character(CharacterInput {
                name,
                description,
                starting_scene,
            });
            run_generate(input, &common).await
        }
        Commands::Show {
            result,
            view,
            field,
        } => run_show(&result, &view, field.as_deref()),
        Commands::Options { json } => run_options(json),
    };

    match outcome {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            report_failure(&error);
            ExitCode::FAILURE
        }
    }
}

async fn run_generate(input: PromptInput, args: &GenerateArgs) -> Result<()> {
    let settings = args.settings()?;
    let view = ViewMode::from_keyword(&args.view)?;
    let images = ReferenceImageSet::load_paths(&args.images)?;
    validate_input(&input, &images)?;

    // Credential first: a missing key must never turn into a network error.
    let api_key = api_key_from_env()?;
    let model = model_from_env();

    let final_prompt = build_final_prompt(&input, &images);
    let system_instruction = build_system_instruction(&settings, !images.is_empty());
    let request = GenerationRequest {
        mode: input.mode(),
        final_prompt: final_prompt.clone(),
        settings,
    };

    if args.verbose {
        eprintln!("[DEBUG] final prompt:\n{final_prompt}");
    }

    let http = Client::builder()
        .timeout(StdDuration::from_secs(REQUEST_TIMEOUT_SECS))
        .build()
        .context("failed to create HTTP client")?;
    let client = GeminiClient::new(http, api_key, model, args.verbose);

    let generated = client
        .generate(&request, &images, &system_instruction)
        .await?;

    let run_folder = write_run_folder(args, &request, &images, client.model(), &generated)?;

    if let Some(path) = &args.field {
        println!("{}", extract_field(&generated, path)?);
    } else {
        println!("{}", render(&generated, view)?);
        eprintln!("Run folder: {}", run_folder.display());
    }
    Ok(())
}

fn write_run_folder(
    args: &GenerateArgs,
    request: &GenerationRequest,
    images: &ReferenceImageSet,
    model: &str,
    generated: &GeneratedPrompt,
) -> Result<PathBuf> {
    fs::create_dir_all(&args.out_folder).with_context(|| {
        format!("failed to create output folder {}", args.out_folder.display())
    })?;
    let run_folder = args
        .out_folder
        .join(format!("veoarch-{}", Utc::now().format("%Y%m%d-%H%M%S")));
    fs::create_dir_all(&run_folder)
        .with_context(|| format!("failed to create run folder {}", run_folder.display()))?;

    let record = HistoryRecord {
        mode: request.mode,
        final_prompt: request.final_prompt.clone(),
        settings: request.settings,
        image_count: images.len(),
        model: model.to_owned(),
        created_at: Utc::now(),
    };
    let request_path = run_folder.join("request.json");
    fs::write(&request_path, serde_json::to_string_pretty(&record)?)
        .with_context(|| format!("failed to write {}", request_path.display()))?;

    let result_path = run_folder.join("result.json");
    fs::write(&result_path, generated.to_raw_json()?)
        .with_context(|| format!("failed to write {}", result_path.display()))?;
    Ok(run_folder)
}

fn run_show(result_path: &Path, view: &str, field: Option<&str>) -> Result<()> {
    let text = fs::read_to_string(result_path)
        .with_context(|| format!("failed to read {}", result_path.display()))?;
    let generated = GeneratedPrompt::from_json_str(&text)?;

    if let Some(path) = field {
        println!("{}", extract_field(&generated, path)?);
    } else {
        let view = ViewMode::from_keyword(view)?;
        println!("{}", render(&generated, view)?);
    }
    Ok(())
}

fn run_options(as_json: bool) -> Result<()> {
    let durations: Vec<(&str, usize)> = [
        Duration::Short15,
        Duration::Short30,
        Duration::Minute1,
        Duration::Minute2,
    ]
    .into_iter()
    .map(|duration| (duration.keyword(), duration.segment_count()))
    .collect();

    if as_json {
        let payload = serde_json::json!({
            "durations": durations
                .iter()
                .map(|(keyword, segments)| serde_json::json!({
                    "keyword": keyword,
                    "segments": segments
                }))
                .collect::<Vec<_>>(),
            "languages": ["indonesian", "english"],
            "complexities": ["simple", "detail", "complex"],
            "music_themes": ["cinematic", "electronic", "horror", "lofi"],
            "styles": VisualStyle::ALL
                .iter()
                .map(|style| style.keyword())
                .collect::<Vec<_>>(),
            "aspect_ratios": ["16:9", "9:16", "1:1", "21:9", "4:3"],
        });
        println!("{}", serde_json::to_string_pretty(&payload)?);
        return Ok(());
    }

    println!("Durations (exact segment count):");
    for (keyword, segments) in durations {
        println!("  {keyword:<4} {segments} segments");
    }
    println!("Languages: indonesian, english");
    println!("Complexity: simple, detail, complex");
    println!("Music themes: cinematic, electronic, horror, lofi");
    print!("Visual styles:");
    for style in VisualStyle::ALL {
        print!(" {}", style.keyword());
    }
    println!();
    println!("Aspect ratios: 16:9, 9:16, 1:1, 21:9, 4:3");
    Ok(())
}

fn report_failure(error: &anyhow::Error) {
    if let Some(coded) = find_coded_error(error) {
        match coded.kind {
            CodedErrorKind::Usage => eprintln!("{coded}"),
            CodedErrorKind::Config => {
                eprintln!("{GENERIC_FAILURE_LINE}");
                eprintln!("{coded}");
            }
        }
        if let Some(details) = &coded.details {
            eprintln!("details: {details}");
        }
        return;
    }
    // Request-side failure: one generic line, diagnostics behind it.
    eprintln!("{GENERIC_FAILURE_LINE}");
    eprintln!("cause: {error:#}");
}
