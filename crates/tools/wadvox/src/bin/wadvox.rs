use std::path::PathBuf;
use std::process::exit;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;
use wad::WadCollection;
use wadvox::config::Corrections;
use wadvox::pipeline::{self, Target};

#[derive(Parser)]
#[command(
    name = "wadvox",
    about = "Reconstructs voxel models from Doom sprite rotations",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Convert sprite frames into MagicaVoxel models
    Convert {
        /// WAD file to load; repeat to stack patches, later files win
        #[arg(long = "wad")]
        wads: Vec<PathBuf>,

        /// Sprite base name (four characters, e.g. CYBR); repeatable
        #[arg(long = "sprite")]
        sprites: Vec<String>,

        /// Frame letters to convert for each sprite
        #[arg(long, default_value = "ABCDE")]
        frames: String,

        /// Directory the models are written into
        #[arg(long, default_value = ".")]
        out: PathBuf,

        /// Offset corrections file (TOML), extending the built-in table
        #[arg(long)]
        config: Option<PathBuf>,

        /// Also write each composed rotation canvas as a PNG
        #[arg(long)]
        dump_frames: bool,
    },
    /// List every lump of the loaded WADs
    List {
        /// WAD file to load; repeat to stack patches, later files win
        #[arg(long = "wad")]
        wads: Vec<PathBuf>,
    },
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    match cli.command {
        Command::Convert {
            wads,
            sprites,
            frames,
            out,
            config,
            dump_frames,
        } => convert(wads, sprites, frames, out, config, dump_frames),
        Command::List { wads } => list(wads),
    }
}

fn convert(
    wad_paths: Vec<PathBuf>,
    sprites: Vec<String>,
    frames: String,
    out: PathBuf,
    config: Option<PathBuf>,
    dump_frames: bool,
) -> Result<()> {
    let sprites = if sprites.is_empty() {
        vec!["CYBR".to_string(), "SPID".to_string()]
    } else {
        sprites
    };
    for sprite in &sprites {
        if sprite.len() != 4
            || !sprite
                .bytes()
                .all(|b| b.is_ascii_uppercase() || b.is_ascii_digit())
        {
            eprintln!("Error: sprite name '{sprite}' must be four uppercase characters");
            exit(1);
        }
    }
    if frames.is_empty() || !frames.chars().all(|f| f.is_ascii_uppercase()) {
        eprintln!("Error: frames '{frames}' must be uppercase letters, e.g. ABCDE");
        exit(1);
    }

    let wads = load_wads(wad_paths)?;
    let palette = pipeline::load_palette(&wads)?;

    let mut corrections = Corrections::builtin();
    if let Some(path) = config {
        corrections.extend(Corrections::load(&path)?);
    }

    std::fs::create_dir_all(&out)
        .with_context(|| format!("creating output directory {}", out.display()))?;

    let targets: Vec<Target> = sprites
        .iter()
        .flat_map(|sprite| {
            frames.chars().map(move |frame| Target {
                sprite: sprite.clone(),
                frame,
            })
        })
        .collect();

    let written = pipeline::convert_all(&wads, &palette, &corrections, &targets, &out, dump_frames)?;

    println!("Wrote {} models:", written.len());
    for path in &written {
        println!("  {}", path.display());
    }
    Ok(())
}

fn list(wad_paths: Vec<PathBuf>) -> Result<()> {
    let wads = load_wads(wad_paths)?;
    for wad in wads.wads().iter().rev() {
        for (index, lump) in wad.lumps().iter().enumerate() {
            println!(
                "{:<12}\t{:>5}\t{:<8}\t{:x}",
                wad.source().display(),
                index,
                lump.name,
                lump.data.len()
            );
        }
    }
    Ok(())
}

/// Loads the given WADs, or the default stack from `$DOOMWADDIR` when
/// none are named.
fn load_wads(paths: Vec<PathBuf>) -> Result<WadCollection> {
    let paths = if paths.is_empty() {
        default_wads()?
    } else {
        paths
    };
    let mut collection = WadCollection::new();
    for path in &paths {
        collection
            .load(path)
            .with_context(|| format!("loading {}", path.display()))?;
    }
    Ok(collection)
}

/// The stock WAD stack: DOOM2.WAD, plus the sprite fix PWAD when it is
/// present next to it.
fn default_wads() -> Result<Vec<PathBuf>> {
    let dir = std::env::var("DOOMWADDIR")
        .map(PathBuf::from)
        .context("no --wad given and DOOMWADDIR is not set")?;
    let mut paths = vec![dir.join("DOOM2.WAD")];
    let fix = dir.join("D2SPFX20.WAD");
    if fix.exists() {
        paths.push(fix);
    } else {
        tracing::warn!(path = %fix.display(), "sprite fix WAD not found, continuing without it");
    }
    Ok(paths)
}
