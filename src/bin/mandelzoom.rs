use std::path::PathBuf;

use clap::{Parser, ValueEnum, error::ErrorKind};

use mandelzoom::{FailureMode, SystemRunner, ZoomOpts, ZoomSchedule};

/// Zoom into the Mandelbrot set and assemble the frames into an animated GIF.
///
/// The fractal rendering is delegated to an external `mandelbrot` executable
/// and the encoding to `ffmpeg`; this tool owns the per-frame zoom schedule
/// and the plumbing between the two.
#[derive(Parser, Debug)]
#[command(name = "mandelzoom", version)]
struct Cli {
    /// Fractal center x, passed through to the renderer unparsed.
    #[arg(allow_negative_numbers = true)]
    x: String,

    /// Fractal center y, passed through to the renderer unparsed.
    #[arg(allow_negative_numbers = true)]
    y: String,

    /// Escape-radius threshold, passed through to the renderer unparsed.
    threshold: String,

    /// Number of frames in the zoom sequence.
    #[arg(long, default_value_t = mandelzoom::DEFAULT_FRAME_COUNT)]
    frames: u32,

    /// Output frame rate.
    #[arg(long, default_value_t = 30)]
    fps: u32,

    /// Output GIF path.
    #[arg(long, default_value = "out.gif")]
    out: PathBuf,

    /// Renderer executable; a relative path resolves against the invoking
    /// directory.
    #[arg(long, default_value = "./mandelbrot")]
    renderer: PathBuf,

    /// What to do when a frame fails to render.
    #[arg(long, value_enum, default_value_t = FailureChoice::Lenient)]
    on_failure: FailureChoice,

    /// Print the frame schedule as JSON on stdout and exit without rendering.
    #[arg(long)]
    dump_schedule: bool,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum FailureChoice {
    /// Log failed frames and keep going.
    Lenient,
    /// Abort at the first failed frame.
    Strict,
}

impl From<FailureChoice> for FailureMode {
    fn from(choice: FailureChoice) -> Self {
        match choice {
            FailureChoice::Lenient => FailureMode::Lenient,
            FailureChoice::Strict => FailureMode::Strict,
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let code = match e.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => 0,
                _ => 1,
            };
            let _ = e.print();
            std::process::exit(code);
        }
    };

    // Logs go to stderr so stdout stays clean for --dump-schedule.
    tracing_subscriber::fmt().with_writer(std::io::stderr).init();

    let schedule = ZoomSchedule::new(cli.frames)?;

    if cli.dump_schedule {
        let params: Vec<_> = schedule.iter().collect();
        serde_json::to_writer_pretty(std::io::stdout().lock(), &params)?;
        println!();
        return Ok(());
    }

    let opts = ZoomOpts {
        center_x: cli.x,
        center_y: cli.y,
        threshold: cli.threshold,
        schedule,
        renderer: cli.renderer,
        fps: cli.fps,
        out_path: cli.out.clone(),
        overwrite: true,
        on_failure: cli.on_failure.into(),
    };

    let mut runner = SystemRunner;
    let stats = mandelzoom::render_zoom(&opts, &mut runner)?;

    if stats.frames_failed > 0 {
        eprintln!(
            "{} of {} frames failed to render",
            stats.frames_failed, stats.frames_total
        );
    }
    eprintln!("wrote {}", cli.out.display());
    Ok(())
}
