use std::{path::PathBuf, sync::Arc, time::Duration};

use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use serde_json::json;

use reloop::{
    ClipInfo, ConvertOptions, FfmpegLogLevel, ProgressCallback, ProgressInfo,
};

const CLI_AFTER_HELP: &str = "Examples:\n  reloop convert clip.mp4 --out clip.gif --progress\n  reloop convert clip.mp4 --width 320 --fps 12 --colors 128\n  reloop probe clip.mp4 --json\n  reloop completions zsh > _reloop";

#[derive(Debug, Parser)]
#[command(
    name = "reloop",
    version,
    about = "Convert short video clips into looping animated GIFs",
    after_help = CLI_AFTER_HELP
)]
struct Cli {
    #[command(flatten)]
    global: GlobalOptions,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Parser, Clone, Default)]
struct GlobalOptions {
    /// Show FFmpeg's verbose output (shorthand for --log-level verbose).
    #[arg(long)]
    verbose: bool,

    /// Show a progress bar during conversion.
    #[arg(long)]
    progress: bool,

    /// Allow overwriting existing output files.
    #[arg(long)]
    overwrite: bool,

    /// FFmpeg log level (quiet, panic, fatal, error, warning, info, verbose, debug, trace).
    #[arg(long)]
    log_level: Option<String>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Convert a clip to a looping GIF.
    #[command(
        about = "Convert a clip to a looping GIF",
        after_help = "Examples:\n  reloop convert clip.mp4 --out clip.gif\n  reloop convert clip.mp4 --width 320 --fps 12 --seek-timeout-ms 500 --progress"
    )]
    Convert {
        /// Input media path or URL.
        input: String,
        /// Output GIF path. Defaults to a timestamped name next to the input.
        #[arg(long)]
        out: Option<PathBuf>,
        /// Output width in pixels (height derives, forced even).
        #[arg(long, default_value_t = reloop::DEFAULT_TARGET_WIDTH)]
        width: u32,
        /// Sampling frame rate in frames per second.
        #[arg(long, default_value_t = reloop::DEFAULT_FRAME_RATE)]
        fps: u32,
        /// Palette size per frame (2..=256).
        #[arg(long, default_value_t = reloop::DEFAULT_PALETTE_SIZE)]
        colors: u16,
        /// Quantizer sampling factor (1 = best quality, 30 = fastest).
        #[arg(long, default_value_t = reloop::DEFAULT_QUANTIZER_SPEED)]
        speed: i32,
        /// Per-frame seek deadline in milliseconds.
        #[arg(long, default_value_t = 1000)]
        seek_timeout_ms: u64,
        /// Repeat count; omit to loop forever.
        #[arg(long)]
        repeat: Option<u16>,
        /// Print a machine-readable conversion summary.
        #[arg(long)]
        json: bool,
    },

    /// Print clip metadata and preflight checks (alias: info).
    #[command(
        about = "Print clip metadata and preflight checks",
        visible_alias = "info",
        after_help = "Examples:\n  reloop probe clip.mp4\n  reloop probe clip.mp4 --json"
    )]
    Probe {
        /// Input media path or URL.
        input: String,
        /// Output metadata as machine-readable JSON.
        #[arg(long)]
        json: bool,
    },

    /// Generate shell completion scripts.
    #[command(about = "Generate shell completions")]
    Completions {
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Progress bridge from the conversion pipeline to an indicatif bar.
struct TerminalProgress {
    bar: ProgressBar,
}

impl TerminalProgress {
    fn new() -> Self {
        let bar = ProgressBar::no_length();
        bar.set_style(
            ProgressStyle::with_template(
                "{bar:30.cyan/blue} {pos}/{len} frames ({msg})",
            )
            .unwrap_or_else(|_| ProgressStyle::default_bar()),
        );
        Self { bar }
    }
}

impl ProgressCallback for TerminalProgress {
    fn on_progress(&self, info: &ProgressInfo) {
        self.bar.set_length(info.total_frames);
        self.bar.set_position(info.frames_done);
        if info.seek_timeouts > 0 {
            self.bar
                .set_message(format!("{} timeouts absorbed", info.seek_timeouts));
        } else {
            self.bar.set_message("sampling");
        }
    }
}

fn apply_global_options(global: &GlobalOptions) -> Result<(), Box<dyn std::error::Error>> {
    if let Some(level) = &global.log_level {
        let parsed: FfmpegLogLevel = level
            .parse()
            .map_err(|_| format!("unsupported --log-level: {level}"))?;
        reloop::set_ffmpeg_log_level(parsed);
    } else if global.verbose {
        reloop::set_ffmpeg_log_level(FfmpegLogLevel::Verbose);
    } else {
        // Keep FFmpeg quiet by default; conversion degradations are
        // reported through the summary instead.
        reloop::set_ffmpeg_log_level(FfmpegLogLevel::Error);
    }
    Ok(())
}

fn ensure_writable_path(
    path: &std::path::Path,
    overwrite: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    if path.exists() {
        if overwrite {
            eprintln!(
                "{} {}",
                "warning:".yellow().bold(),
                format!("overwriting {}", path.display()).yellow()
            );
        } else {
            return Err(format!(
                "output already exists: {} (use --overwrite to replace)",
                path.display()
            )
            .into());
        }
    }
    Ok(())
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    apply_global_options(&cli.global)?;

    match cli.command {
        Commands::Convert {
            input,
            out,
            width,
            fps,
            colors,
            speed,
            seek_timeout_ms,
            repeat,
            json,
        } => {
            let mut options = ConvertOptions::new()
                .with_target_width(width)
                .with_frame_rate(fps)
                .with_palette_size(colors)
                .with_quantizer_speed(speed)
                .with_seek_timeout(Duration::from_millis(seek_timeout_ms))
                .with_repeat(repeat);

            if cli.global.progress {
                options = options.with_progress(Arc::new(TerminalProgress::new()));
            }

            let output = reloop::convert(&input, &options)?;
            let dest = out.unwrap_or_else(|| PathBuf::from(output.suggested_filename("reloop")));
            ensure_writable_path(&dest, cli.global.overwrite)?;
            output.save(&dest)?;

            if json {
                let payload = json!({
                    "output": dest.display().to_string(),
                    "mime_type": output.mime_type(),
                    "width": output.width,
                    "height": output.height,
                    "frame_count": output.frame_count,
                    "seek_timeouts": output.seek_timeouts,
                    "bytes": output.bytes.len(),
                });
                println!("{}", serde_json::to_string_pretty(&payload)?);
            } else {
                println!(
                    "{} {} ({} frames, {}x{}, {} bytes)",
                    "wrote".green().bold(),
                    dest.display(),
                    output.frame_count,
                    output.width,
                    output.height,
                    output.bytes.len(),
                );
                if output.seek_timeouts > 0 {
                    eprintln!(
                        "{} {}",
                        "note:".yellow().bold(),
                        format!(
                            "{} seeks missed their deadline; duplicate frames were substituted",
                            output.seek_timeouts
                        )
                        .yellow()
                    );
                }
            }
        }
        Commands::Probe { input, json } => {
            let clip = ClipInfo::probe(&input)?;
            let report = clip.validate();
            if json {
                let payload = json!({
                    "source": clip.source.display().to_string(),
                    "width": clip.width,
                    "height": clip.height,
                    "fps": clip.frames_per_second,
                    "duration_seconds": clip.duration.as_secs_f64(),
                    "codec": clip.codec,
                    "convertible": report.is_convertible(),
                    "warnings": report.warnings,
                    "errors": report.errors,
                });
                println!("{}", serde_json::to_string_pretty(&payload)?);
            } else {
                println!(
                    "Video: {}x{} @ {:.2} fps [{}]",
                    clip.width, clip.height, clip.frames_per_second, clip.codec,
                );
                println!("Duration: {:.2}s", clip.duration.as_secs_f64());
                print!("{report}");
            }
        }
        Commands::Completions { shell } => {
            let mut command = Cli::command();
            clap_complete::generate(shell, &mut command, "reloop", &mut std::io::stdout());
        }
    }

    Ok(())
}

fn main() {
    if let Err(error) = run() {
        eprintln!("{} {error}", "error:".red().bold());
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::Cli;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }
}
