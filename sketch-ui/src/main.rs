use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use image::ImageFormat;
use sketch_ai::GeminiClient;
use sketch_core::{EncodedImage, RecognitionRecord, SupportedLanguage};
use sketch_store::{FileStore, HistoryStore};
use sketch_ui::editor::DrawingSurface;
use sketch_ui::presentation::speak_translation;
use sketch_ui::speech::TracingSpeech;
use sketch_ui::{logging, replay, AppConfig, ResultPresentation, ViewShell};
use time::format_description::well_known::Rfc3339;
use tracing::{debug, info};

#[derive(Parser, Debug)]
#[command(
    name = "magic-sketch",
    version,
    about = "Draw, snap or type something and learn its name"
)]
struct Cli {
    /// Enable debug logging (RUST_LOG still wins)
    #[arg(short = 'v', long = "verbose", global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Replay a drawing script onto the canvas and identify the sketch
    Sketch {
        /// JSON list of stroke/undo/clear actions
        script: PathBuf,
        /// Logical canvas width (default: MAGIC_SKETCH_CANVAS_SIZE)
        #[arg(long)]
        width: Option<f32>,
        /// Logical canvas height (default: same as width)
        #[arg(long)]
        height: Option<f32>,
        /// Device pixel ratio (default: MAGIC_SKETCH_SCALE)
        #[arg(long)]
        scale: Option<f32>,
        /// Also write the drawing to this PNG file
        #[arg(long)]
        png: Option<PathBuf>,
        /// Pronounce the result
        #[arg(long)]
        speak: bool,
    },
    /// Identify the main object in a PNG, JPEG or WebP photo
    Photo {
        image: PathBuf,
        #[arg(long)]
        speak: bool,
    },
    /// Translate text and/or the text in an image
    Translate {
        /// Target language, by name or code
        #[arg(short = 't', long = "to", default_value = "English")]
        to: SupportedLanguage,
        #[arg(long)]
        text: Option<String>,
        #[arg(long)]
        image: Option<PathBuf>,
        /// Read the translation aloud
        #[arg(long)]
        speak: bool,
    },
    /// List the collection, newest first
    History {
        /// Delete every saved record
        #[arg(long)]
        clear: bool,
    },
    /// Show one saved record
    Show {
        id: String,
        #[arg(long)]
        speak: bool,
        /// Write the original sketch or photo to this file
        #[arg(long = "save-image")]
        save_image: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    logging::init(cli.verbose)?;

    let config = AppConfig::from_env();
    debug!(
        data_dir = %config.data_dir.display(),
        canvas_size = config.canvas_size,
        scale = config.scale,
        "loaded configuration"
    );

    let client = Arc::new(GeminiClient::new(config.ai.clone())?);
    let history = HistoryStore::load(FileStore::new(&config.data_dir))
        .with_context(|| format!("load history from {}", config.data_dir.display()))?;
    let mut shell = ViewShell::new(history, client.clone(), client);
    let mut speech = TracingSpeech;

    match cli.command {
        Command::Sketch {
            script,
            width,
            height,
            scale,
            png,
            speak,
        } => {
            let width = width.unwrap_or(config.canvas_size);
            let height = height.unwrap_or(width);
            let mut surface =
                DrawingSurface::new(width, height, scale.unwrap_or(config.scale));
            replay::replay(&mut surface, &replay::load_actions(&script)?);

            if let Some(path) = png {
                let image = surface.export_image()?;
                fs::write(&path, image.bytes())
                    .with_context(|| format!("write png: {}", path.display()))?;
                info!("Wrote drawing to {}", path.display());
            }

            let record = shell.identify_sketch(&surface).await?;
            present(&record, speak.then_some(&mut speech));
        }
        Command::Photo { image, speak } => {
            let photo = read_photo(&image)?;
            let record = shell.identify_photo(&photo).await?;
            present(&record, speak.then_some(&mut speech));
        }
        Command::Translate {
            to,
            text,
            image,
            speak,
        } => {
            let image = image.as_deref().map(read_photo).transpose()?;
            let text = text.unwrap_or_default();
            let Some(translated) = shell.translate(&text, to, image).await? else {
                bail!("Nothing to translate: pass --text and/or --image");
            };
            println!("{} {}: {}", to.flag(), to.name(), translated);
            if speak {
                speak_translation(&mut speech, &translated, to);
            }
        }
        Command::History { clear } => {
            if clear {
                shell.clear_history()?;
                println!("Collection cleared.");
                return Ok(());
            }
            let records = shell.history();
            if records.is_empty() {
                println!("No items yet. Go draw or snap something!");
            }
            for record in records {
                println!(
                    "{}  {}  {} {} ({})",
                    record.id,
                    recorded_at(record),
                    record.emoji,
                    record.english_name,
                    record.kind.as_str()
                );
            }
        }
        Command::Show {
            id,
            speak,
            save_image,
        } => {
            let Some(record) = shell.select_result(&id).cloned() else {
                bail!("No saved item with id {id}");
            };
            if let Some(path) = save_image {
                let image = EncodedImage::from_data_uri(&record.source_image)?;
                fs::write(&path, image.bytes())
                    .with_context(|| format!("write image: {}", path.display()))?;
                info!("Wrote {} to {}", image.mime(), path.display());
            }
            present(&record, speak.then_some(&mut speech));
            shell.close_result();
        }
    }

    Ok(())
}

fn present(record: &RecognitionRecord, speech: Option<&mut TracingSpeech>) {
    let card = ResultPresentation::new(record.clone());
    println!("{} {}  {}", record.emoji, record.english_name, record.chinese_name);
    println!("   {}", card.phonetic_label());
    if let Some(sentence) = &record.simple_sentence {
        println!("   \"{}\"", sentence);
    }
    let image = card.display_image();
    if image.starts_with("data:") {
        println!("   image: inline {} bytes", image.len());
    } else {
        println!("   image: {}", image);
    }
    println!("   id: {}", record.id);

    if let Some(speech) = speech {
        card.pronounce(speech);
    }
}

fn recorded_at(record: &RecognitionRecord) -> String {
    record
        .recorded_at()
        .ok()
        .and_then(|at| at.format(&Rfc3339).ok())
        .unwrap_or_else(|| record.timestamp.to_string())
}

/// Read an image file, taking its type from the content rather than the extension.
fn read_photo(path: &Path) -> Result<EncodedImage> {
    let bytes = fs::read(path).with_context(|| format!("read image: {}", path.display()))?;
    let format = image::guess_format(&bytes)
        .with_context(|| format!("unrecognized image: {}", path.display()))?;
    match format {
        ImageFormat::Png | ImageFormat::Jpeg | ImageFormat::WebP => {
            Ok(EncodedImage::new(format.to_mime_type(), bytes))
        }
        other => bail!("unsupported image type {:?}: {}", other, path.display()),
    }
}
