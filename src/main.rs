use clap::{Parser, Subcommand};
use pwtimelapse::export::{export_jpegs, ExportOptions};
use pwtimelapse::name::guess_folder_name;
use pwtimelapse::scan::{read_timelapse_files, scan_save_directory};
use pwtimelapse::timelapse::{load_timelapse_with, LoadOptions, RawFileEntry, TimeLapse};
use std::io::Write;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "pwtimelapse", about = "Decode PowerWash Simulator timelapse saves into JPEG frames")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Find timelapse folders below a save directory
    Scan {
        root: PathBuf,
    },
    /// Decode a timelapse folder and show its metadata
    Info {
        dir: PathBuf,
        /// Folder label used for naming (default: the folder's name)
        #[arg(long)]
        label: Option<String>,
        /// Print the summary as JSON
        #[arg(long)]
        json: bool,
        /// List every frame with its size and BLAKE3 prefix
        #[arg(long)]
        frames: bool,
    },
    /// Decode a timelapse folder and write its frames as JPEG files
    Extract {
        dir: PathBuf,
        #[arg(short = 'C', long, default_value = ".")]
        output_dir: PathBuf,
        #[arg(long)]
        label: Option<String>,
        /// Evenly thin the sequence to this many frames
        #[arg(short = 'n', long)]
        frames: Option<usize>,
        /// Decode frames in parallel (requires the `parallel` feature)
        #[arg(short, long)]
        parallel: bool,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    match Cli::parse().command {

        // ── Scan ─────────────────────────────────────────────────────────────
        Commands::Scan { root } => {
            let found = scan_save_directory(&root)?;
            if found.is_empty() {
                println!("No timelapses found below {}", root.display());
            }
            for t in &found {
                println!("{:<48} {:<11} {}",
                    t.display_name,
                    if t.is_complete { "complete" } else { "in-progress" },
                    t.path.display());
            }
        }

        // ── Info ─────────────────────────────────────────────────────────────
        Commands::Info { dir, label, json, frames } => {
            let tl = load_dir(&dir, label, &LoadOptions::default())?;
            if json {
                println!("{}", serde_json::to_string_pretty(&tl.summary())?);
                return Ok(());
            }
            let s = tl.summary();
            println!("── Timelapse ────────────────────────────────────────────");
            println!("  Name           {}", s.name);
            println!("  Raw name       {}", s.raw_name);
            println!("  Layout         {}", if s.is_complete { "complete" } else { "in progress" });
            println!("  Dimensions     {}x{}", s.width, s.height);
            println!("  Frames         {}", s.frame_count);
            println!("  JPEG bytes     {}", s.total_bytes);
            if frames {
                println!("{:>6} {:>10}  BLAKE3", "Frame", "Size");
                for (i, jpeg) in tl.frames.iter().enumerate() {
                    let hash = blake3::hash(jpeg);
                    println!("{:>6} {:>10}  {}", i, jpeg.len(), hex::encode(&hash.as_bytes()[..8]));
                }
            }
        }

        // ── Extract ──────────────────────────────────────────────────────────
        Commands::Extract { dir, output_dir, label, frames, parallel } => {
            let opts = LoadOptions { parallel, ..LoadOptions::default() };
            let tl = load_dir(&dir, label, &opts)?;
            if tl.frames.is_empty() {
                return Err("No frames found in the timelapse".into());
            }
            let written = export_jpegs(&tl, &output_dir, &ExportOptions { frame_count: frames })?;
            println!("Extracted {} of {} frame(s) from \"{}\" → {}",
                written.len(), tl.frame_count(), tl.name, output_dir.display());
        }
    }

    Ok(())
}

// ── helpers ──────────────────────────────────────────────────────────────────

fn load_dir(dir: &Path, label: Option<String>, opts: &LoadOptions) -> Result<TimeLapse, Box<dyn std::error::Error>> {
    let files = read_timelapse_files(dir)?;
    if files.is_empty() {
        return Err(format!("No .sav files found in {}", dir.display()).into());
    }
    let label = label.unwrap_or_else(|| folder_label(dir, &files));

    let mut report = |current: usize, total: usize| {
        if total > 0 {
            eprint!("\rDecompressing frame {current} of {total}...");
        } else {
            eprint!("\rDecompressing frame {current}...");
        }
        let _ = std::io::stderr().flush();
    };
    let tl = load_timelapse_with(&files, &label, opts, Some(&mut report));
    eprintln!();
    Ok(tl?)
}

fn folder_label(dir: &Path, files: &[RawFileEntry]) -> String {
    dir.canonicalize()
        .ok()
        .and_then(|p| p.file_name().map(|n| n.to_string_lossy().into_owned()))
        .unwrap_or_else(|| guess_folder_name(&files[0].name))
}
