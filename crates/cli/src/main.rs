use std::path::{Path, PathBuf};
use std::process;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use clap::{Args, Parser, Subcommand};
use crossbeam_channel::Receiver;

use facelens_core::detection::domain::detection_result::DetectionResult;
use facelens_core::detection::domain::face_analysis_engine::FaceAnalysisEngine;
use facelens_core::detection::infrastructure::latency_engine::LatencyEngine;
use facelens_core::detection::infrastructure::replay_engine::ReplayEngine;
use facelens_core::export::export_session_use_case::ExportSessionUseCase;
use facelens_core::export::infrastructure::file_artifact_writer::FileArtifactWriter;
use facelens_core::input::domain::camera::MediaCapture;
use facelens_core::input::domain::image_decoder::ImageSource;
use facelens_core::input::infrastructure::image_file_decoder::ImageFileDecoder;
use facelens_core::input::infrastructure::image_sequence_capture::ImageSequenceCapture;
use facelens_core::input::infrastructure::unavailable_capture::UnavailableCapture;
use facelens_core::overlay::infrastructure::raster_surface::{composite_over, RasterSurface};
use facelens_core::overlay::overlay_renderer::{age_gender_label, expression_lines};
use facelens_core::session::detection_session::{DetectionSession, SessionParams};
use facelens_core::session::pass_logger::LogPassLogger;
use facelens_core::session::session_event::SessionEvent;
use facelens_core::session::session_settings::SessionSettings;
use facelens_core::shared::clock::SystemClock;
use facelens_core::shared::display_size::DisplaySize;

/// Face analysis on still images and image-sequence cameras.
#[derive(Parser)]
#[command(name = "facelens")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Analyse one still image.
    Image(ImageArgs),
    /// Run the detection loop on a directory of frames as a virtual camera.
    Camera(CameraArgs),
}

#[derive(Args)]
struct CommonArgs {
    /// Model base URI (directory holding detections.json).
    #[arg(long)]
    models: Option<String>,

    /// Draw landmark points on the overlay.
    #[arg(long)]
    landmarks: bool,

    /// Draw expression labels on the overlay.
    #[arg(long)]
    expressions: bool,

    /// Write the overlay composited over the analysed frame to this PNG.
    #[arg(long)]
    overlay: Option<PathBuf>,

    /// Record emotion samples while running.
    #[arg(long)]
    track: bool,

    /// Export the recorded session (JSON + CSV). Without a directory the
    /// configured export directory is used.
    #[arg(long, num_args = 0..=1, value_name = "DIR")]
    export: Option<Option<PathBuf>>,

    /// Store the effective settings as the new defaults.
    #[arg(long)]
    save_settings: bool,
}

#[derive(Args)]
struct ImageArgs {
    /// Input image file.
    input: PathBuf,

    /// Display container as WIDTHxHEIGHT.
    #[arg(long)]
    container: Option<String>,

    #[command(flatten)]
    common: CommonArgs,
}

#[derive(Args)]
struct CameraArgs {
    /// Directory of frames played back in name order.
    #[arg(long)]
    frames: PathBuf,

    /// How long to run, in milliseconds.
    #[arg(long, default_value = "3000")]
    duration_ms: u64,

    /// Detection tick period in milliseconds.
    #[arg(long)]
    tick_ms: Option<u64>,

    /// Artificial delay added to every detection call, in milliseconds.
    #[arg(long, default_value = "0")]
    latency_ms: u64,

    /// Restart the frame sequence when it ends.
    #[arg(long = "loop")]
    cycle: bool,

    #[command(flatten)]
    common: CommonArgs,
}

fn main() {
    env_logger::init();

    if let Err(e) = run() {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    validate(&cli.command)?;

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()?;

    match cli.command {
        Command::Image(args) => runtime.block_on(run_image(args)),
        Command::Camera(args) => runtime.block_on(run_camera(args)),
    }
}

async fn run_image(args: ImageArgs) -> Result<(), Box<dyn std::error::Error>> {
    let mut settings = apply_overrides(SessionSettings::load(), &args.common);
    if let Some(container) = &args.container {
        settings.still_container = parse_size(container)?;
    }
    if args.common.save_settings {
        settings.save();
    }

    let engine: Arc<dyn FaceAnalysisEngine> = Arc::new(ReplayEngine::new());
    let (session, events) = build_session(settings, engine, Arc::new(UnavailableCapture));
    let printer = spawn_event_printer(events);

    if !session.load_models().await {
        return Err(format!(
            "Could not load models from '{}'",
            session.settings().model_uri
        )
        .into());
    }
    if args.common.track {
        session.start_tracking();
    }

    let handle = session
        .load_still_image(ImageSource::Path(args.input.clone()))
        .await
        .ok_or_else(|| format!("Could not load image {}", args.input.display()))?;
    println!(
        "{}: {} at {}",
        args.input.display(),
        handle.frame_size,
        handle.display
    );
    print_results(&session.last_results());

    finish(session, &args.common, printer).await
}

async fn run_camera(args: CameraArgs) -> Result<(), Box<dyn std::error::Error>> {
    let mut settings = apply_overrides(SessionSettings::load(), &args.common);
    if let Some(tick_ms) = args.tick_ms {
        settings.tick_period_ms = tick_ms;
    }
    if args.common.save_settings {
        settings.save();
    }

    let mut engine: Arc<dyn FaceAnalysisEngine> = Arc::new(ReplayEngine::new());
    if args.latency_ms > 0 {
        engine = Arc::new(LatencyEngine::new(
            Box::new(ReplayEngine::new()),
            Duration::from_millis(args.latency_ms),
        ));
    }
    let capture = Arc::new(ImageSequenceCapture::new(
        &args.frames,
        args.cycle,
        Arc::new(ImageFileDecoder),
    ));
    let (session, events) = build_session(settings, engine, capture);
    let printer = spawn_event_printer(events);

    if !session.start().await {
        let status = session.status();
        let reason = if status.camera_denied {
            format!("no usable frames in {}", args.frames.display())
        } else {
            format!("could not load models from '{}'", session.settings().model_uri)
        };
        return Err(reason.into());
    }
    if args.common.track {
        session.start_tracking();
    }

    tokio::time::sleep(Duration::from_millis(args.duration_ms)).await;
    session.stop_tracking();

    let status = session.status();
    println!(
        "Camera run finished: {} face(s) on last frame, {} sample(s) recorded",
        status.face_count, status.sample_count
    );
    print_results(&session.last_results());

    finish(session, &args.common, printer).await
}

/// Overlay, summary and export shared by both modes, then teardown.
async fn finish(
    session: DetectionSession,
    common: &CommonArgs,
    printer: thread::JoinHandle<()>,
) -> Result<(), Box<dyn std::error::Error>> {
    if let Some(path) = &common.overlay {
        write_overlay(&session, path)?;
    }

    if common.track {
        print_summary(&session);
    }

    let export_result = match &common.export {
        Some(_) => {
            let dir = &session.settings().export_dir;
            let exporter = ExportSessionUseCase::new(Box::new(FileArtifactWriter::new(dir)));
            session.export(&exporter).map(|artifacts| {
                println!("Exported {}", artifacts.structured.display());
                println!("Exported {}", artifacts.tabular.display());
            })
        }
        None => Ok(()),
    };

    session.shutdown();
    drop(session);
    // Join off the runtime thread so cancelled passes can still be dropped.
    let _ = tokio::task::spawn_blocking(move || printer.join()).await;
    export_result?;
    Ok(())
}

fn build_session(
    settings: SessionSettings,
    engine: Arc<dyn FaceAnalysisEngine>,
    capture: Arc<dyn MediaCapture>,
) -> (DetectionSession, Receiver<SessionEvent>) {
    DetectionSession::new(SessionParams {
        engine,
        capture,
        decoder: Arc::new(ImageFileDecoder),
        surface: Box::new(RasterSurface::new()),
        clock: Arc::new(SystemClock),
        logger: Box::new(LogPassLogger::default()),
        settings,
    })
}

fn apply_overrides(mut settings: SessionSettings, common: &CommonArgs) -> SessionSettings {
    if let Some(models) = &common.models {
        settings.model_uri = models.clone();
    }
    settings.toggles.show_landmarks |= common.landmarks;
    settings.toggles.show_expressions |= common.expressions;
    if let Some(Some(dir)) = &common.export {
        settings.export_dir = dir.clone();
    }
    settings
}

/// Logs session events until the session is dropped.
fn spawn_event_printer(events: Receiver<SessionEvent>) -> thread::JoinHandle<()> {
    thread::spawn(move || {
        for event in events.iter() {
            match event {
                SessionEvent::DetectionFailed(e) => log::warn!("Pass failed: {e}"),
                SessionEvent::CameraDenied(e) => log::warn!("Camera denied: {e}"),
                SessionEvent::ImageDecodeFailed(e) => log::warn!("Image rejected: {e}"),
                SessionEvent::ModelLoadFailed(e) => log::warn!("Models unavailable: {e}"),
                other => log::debug!("{other:?}"),
            }
        }
    })
}

fn print_results(results: &[DetectionResult]) {
    if results.is_empty() {
        println!("No faces detected");
        return;
    }
    for (i, result) in results.iter().enumerate() {
        let b = result.bounding_box;
        println!(
            "Face {}: box ({:.0}, {:.0}, {:.0}x{:.0})",
            i + 1,
            b.x,
            b.y,
            b.width,
            b.height
        );
        if let Some(age_gender) = &result.age_gender {
            println!("  {}", age_gender_label(age_gender));
        }
        if let Some(expressions) = &result.expressions {
            for line in expression_lines(expressions) {
                println!("  {line}");
            }
        }
    }
}

fn print_summary(session: &DetectionSession) {
    let stats = session.session_stats();
    println!(
        "Session: {} data point(s) over {}s",
        stats.data_points, stats.duration_secs
    );
    for entry in session.summary() {
        println!(
            "  {:10} {:3}  {:5.1}%",
            entry.emotion.title(),
            entry.count,
            entry.percentage
        );
    }
}

fn write_overlay(session: &DetectionSession, path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let overlay = session
        .overlay_snapshot()
        .ok_or("Overlay surface has no pixels")?;
    let composed = match session.current_frame() {
        Some(frame) => composite_over(&frame, &overlay).unwrap_or(overlay),
        None => overlay,
    };
    composed.save(path)?;
    println!("Overlay written to {}", path.display());
    Ok(())
}

fn validate(command: &Command) -> Result<(), Box<dyn std::error::Error>> {
    match command {
        Command::Image(args) => {
            if !args.input.exists() {
                return Err(format!("Input file not found: {}", args.input.display()).into());
            }
            if let Some(container) = &args.container {
                parse_size(container)?;
            }
        }
        Command::Camera(args) => {
            if !args.frames.is_dir() {
                return Err(format!(
                    "Frames directory not found: {}",
                    args.frames.display()
                )
                .into());
            }
            if args.tick_ms == Some(0) {
                return Err("Tick period must be at least 1 ms".into());
            }
        }
    }
    Ok(())
}

fn parse_size(text: &str) -> Result<DisplaySize, String> {
    let (w, h) = text
        .split_once(['x', 'X'])
        .ok_or_else(|| format!("Size must look like WIDTHxHEIGHT, got '{text}'"))?;
    let width: u32 = w
        .trim()
        .parse()
        .map_err(|_| format!("Invalid width in '{text}'"))?;
    let height: u32 = h
        .trim()
        .parse()
        .map_err(|_| format!("Invalid height in '{text}'"))?;
    if width == 0 || height == 0 {
        return Err(format!("Size must be non-zero, got '{text}'"));
    }
    Ok(DisplaySize::new(width, height))
}
