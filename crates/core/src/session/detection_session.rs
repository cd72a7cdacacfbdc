use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use std::time::{Duration, Instant};

use crossbeam_channel::{Receiver, Sender};
use image::RgbaImage;
use tokio::time::MissedTickBehavior;

use crate::detection::domain::detection_result::{resize_results, DetectionResult};
use crate::detection::domain::face_analysis_engine::{DetectOptions, FaceAnalysisEngine};
use crate::detection::domain::model_lifecycle::ModelLifecycle;
use crate::export::domain::export_error::ExportError;
use crate::export::export_session_use_case::{ExportArtifacts, ExportSessionUseCase};
use crate::input::domain::camera::MediaCapture;
use crate::input::domain::image_decoder::{ImageDecoder, ImageSource};
use crate::input::domain::input_error::InputError;
use crate::input::domain::input_mode::InputMode;
use crate::input::input_source_manager::InputSourceManager;
use crate::overlay::domain::display_toggles::DisplayToggles;
use crate::overlay::domain::overlay_surface::OverlaySurface;
use crate::overlay::overlay_renderer::render;
use crate::recording::domain::emotion_sample::EmotionSample;
use crate::recording::domain::session_record::SessionRecord;
use crate::recording::emotion_recorder::EmotionRecorder;
use crate::recording::emotion_summary::{
    distribution, session_stats, summarize, timeline, DistributionSlice, EmotionSummaryEntry,
    SessionStats, TimelinePoint,
};
use crate::session::detection_scheduler::{Cadence, DetectionScheduler, PassOutcome, PassTicket};
use crate::session::pass_logger::{PassLogger, PassReport};
use crate::session::session_event::SessionEvent;
use crate::session::session_settings::SessionSettings;
use crate::session::session_status::SessionStatus;
use crate::shared::clock::Clock;
use crate::shared::display_size::DisplaySize;
use crate::shared::frame::Frame;

/// Collaborators and configuration for a [`DetectionSession`].
pub struct SessionParams {
    pub engine: Arc<dyn FaceAnalysisEngine>,
    pub capture: Arc<dyn MediaCapture>,
    pub decoder: Arc<dyn ImageDecoder>,
    pub surface: Box<dyn OverlaySurface>,
    pub clock: Arc<dyn Clock>,
    pub logger: Box<dyn PassLogger>,
    pub settings: SessionSettings,
}

/// A decoded still image that became the active source.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StillImageHandle {
    pub generation: u64,
    pub frame_size: DisplaySize,
    pub display: DisplaySize,
}

/// The detection-session controller.
///
/// Owns the active input, the detection cadence, the overlay, and the emotion
/// recorder behind one lock that is never held across an `.await`. Cheap to
/// clone; clones share the session. Dropping the last clone stops the timer
/// and releases the camera.
#[derive(Clone)]
pub struct DetectionSession {
    inner: Arc<SessionInner>,
}

struct SessionInner {
    engine: Arc<dyn FaceAnalysisEngine>,
    capture: Arc<dyn MediaCapture>,
    decoder: Arc<dyn ImageDecoder>,
    clock: Arc<dyn Clock>,
    events: Sender<SessionEvent>,
    settings: SessionSettings,
    state: Mutex<SessionState>,
}

struct SessionState {
    models: ModelLifecycle,
    input: InputSourceManager,
    scheduler: DetectionScheduler,
    recorder: EmotionRecorder,
    toggles: DisplayToggles,
    surface: Box<dyn OverlaySurface>,
    logger: Box<dyn PassLogger>,
    /// Results of the last applied pass, in display coordinates.
    last_results: Vec<DetectionResult>,
    last_display: Option<DisplaySize>,
    last_frame: Option<Frame>,
    processing_image: bool,
    image_requests: u64,
}

/// Everything a pass needs once the lock is released.
struct PendingPass {
    ticket: PassTicket,
    frame: Frame,
    display: DisplaySize,
    options: DetectOptions,
}

impl DetectionSession {
    pub fn new(params: SessionParams) -> (Self, Receiver<SessionEvent>) {
        let (tx, rx) = crossbeam_channel::unbounded::<SessionEvent>();
        let state = SessionState {
            models: ModelLifecycle::new(),
            input: InputSourceManager::new(),
            scheduler: DetectionScheduler::new(),
            recorder: EmotionRecorder::new(),
            toggles: params.settings.toggles,
            surface: params.surface,
            logger: params.logger,
            last_results: Vec::new(),
            last_display: None,
            last_frame: None,
            processing_image: false,
            image_requests: 0,
        };
        let inner = SessionInner {
            engine: params.engine,
            capture: params.capture,
            decoder: params.decoder,
            clock: params.clock,
            events: tx,
            settings: params.settings,
            state: Mutex::new(state),
        };
        (
            Self {
                inner: Arc::new(inner),
            },
            rx,
        )
    }

    pub fn settings(&self) -> &SessionSettings {
        &self.inner.settings
    }

    /// Loads models, then acquires the camera if loading succeeded.
    /// Returns true when the camera is streaming.
    pub async fn start(&self) -> bool {
        if !self.load_models().await {
            return false;
        }
        self.acquire_camera().await
    }

    /// Loads the engine's models once. Returns true when they are ready.
    ///
    /// A still image waiting for the engine gets its pass as soon as the
    /// models are in.
    pub async fn load_models(&self) -> bool {
        {
            let mut state = self.inner.lock();
            if !state.models.begin_load() {
                return state.models.is_ready();
            }
        }
        let uri = self.inner.settings.model_uri.clone();
        log::info!("Loading models from {uri}");

        match self.inner.engine.load_models(&uri).await {
            Ok(()) => {
                let pending = {
                    let mut state = self.inner.lock();
                    state.models.mark_ready();
                    state.logger.info("Models loaded");
                    self.inner.emit(SessionEvent::ModelsLoaded);
                    if state.input.mode() == InputMode::StillImage {
                        start_one_shot(&mut state, &self.inner.settings)
                    } else {
                        None
                    }
                };
                if let Some(pending) = pending {
                    self.run_pass(pending).await;
                }
                true
            }
            Err(e) => {
                log::warn!("Model loading failed: {e}");
                self.inner.lock().models.mark_failed(e.to_string());
                self.inner.emit(SessionEvent::ModelLoadFailed(e.to_string()));
                false
            }
        }
    }

    /// Requests the camera and starts the periodic cadence on it.
    ///
    /// A refusal is recorded in the status and reported as `false`; it is
    /// never retried automatically.
    pub async fn acquire_camera(&self) -> bool {
        match self.inner.capture.request_camera().await {
            Ok(stream) => {
                let size = stream.display_size();
                let period = self.inner.settings.tick_period();
                let mut state = self.inner.lock();
                state.scheduler.stop();
                let generation = state.input.activate_camera(stream);
                state.reset_overlay(size);
                state
                    .scheduler
                    .start(generation, Cadence::Periodic(period));
                let timer = spawn_timer(Arc::downgrade(&self.inner), generation, period);
                state.scheduler.attach_timer(timer);
                state
                    .logger
                    .info(&format!("Camera started ({size}, every {period:?})"));
                self.inner.emit(SessionEvent::CameraStarted(size));
                true
            }
            Err(e) => {
                log::warn!("Camera unavailable: {e}");
                self.inner.lock().input.report_camera_denied(e.clone());
                self.inner.emit(SessionEvent::CameraDenied(e.to_string()));
                false
            }
        }
    }

    /// Stops the camera and its cadence. Safe to call at any time.
    pub fn release_camera(&self) {
        let mut state = self.inner.lock();
        self.inner.release_camera_locked(&mut state);
    }

    /// Makes a still image the active source.
    ///
    /// The camera is released before decoding starts. A decode failure
    /// leaves the previous still image (if any) and the history untouched.
    /// When the models are ready the image is analysed once before this
    /// returns. A newer call supersedes one still decoding.
    pub async fn load_still_image(&self, source: ImageSource) -> Option<StillImageHandle> {
        let request = {
            let mut state = self.inner.lock();
            self.inner.release_camera_locked(&mut state);
            state.processing_image = true;
            state.image_requests += 1;
            state.image_requests
        };

        let decoder = self.inner.decoder.clone();
        let described = source.describe();
        let decoded = tokio::task::spawn_blocking(move || decoder.decode(&source))
            .await
            .unwrap_or_else(|e| Err(InputError::ImageDecode(e.to_string())));

        let (handle, pending) = {
            let mut state = self.inner.lock();
            if state.image_requests != request {
                log::debug!("Image {described} superseded before it finished decoding");
                return None;
            }
            state.processing_image = false;

            let frame = match decoded {
                Ok(frame) => frame,
                Err(e) => {
                    log::warn!("Could not load image {described}: {e}");
                    self.inner.emit(SessionEvent::ImageDecodeFailed(e.to_string()));
                    return None;
                }
            };

            let frame_size = frame.size();
            let display = self.inner.settings.still_container;
            state.scheduler.stop();
            let generation = state.input.activate_still_image(frame, display);
            state.reset_overlay(display);
            state
                .logger
                .info(&format!("Still image loaded ({frame_size}, shown at {display})"));
            self.inner.emit(SessionEvent::StillImageLoaded(display));

            let pending = if state.models.is_ready() {
                start_one_shot(&mut state, &self.inner.settings)
            } else {
                None
            };
            let handle = StillImageHandle {
                generation,
                frame_size,
                display,
            };
            (handle, pending)
        };

        if let Some(pending) = pending {
            self.run_pass(pending).await;
        }
        Some(handle)
    }

    pub fn display_toggles(&self) -> DisplayToggles {
        self.inner.lock().toggles
    }

    pub fn set_show_landmarks(&self, show: bool) {
        self.update_toggles(|t| t.show_landmarks = show);
    }

    pub fn set_show_expressions(&self, show: bool) {
        self.update_toggles(|t| t.show_expressions = show);
    }

    pub fn toggle_landmarks(&self) -> bool {
        self.update_toggles(|t| t.show_landmarks = !t.show_landmarks)
            .show_landmarks
    }

    pub fn toggle_expressions(&self) -> bool {
        self.update_toggles(|t| t.show_expressions = !t.show_expressions)
            .show_expressions
    }

    /// Applies a toggle change and repaints from the cached results. Never
    /// runs detection.
    fn update_toggles(&self, change: impl FnOnce(&mut DisplayToggles)) -> DisplayToggles {
        let mut state = self.inner.lock();
        let state = &mut *state;
        change(&mut state.toggles);
        if let Some(display) = state.last_display {
            render(
                state.surface.as_mut(),
                &state.last_results,
                display,
                state.toggles,
            );
            self.inner.emit(SessionEvent::OverlayRendered {
                faces: state.last_results.len(),
            });
        }
        state.toggles
    }

    /// Clears the history and starts recording.
    pub fn start_tracking(&self) {
        self.inner.lock().recorder.start_tracking();
        log::info!("Emotion tracking started");
        self.inner.emit(SessionEvent::TrackingChanged(true));
    }

    /// Stops recording; the history is kept.
    pub fn stop_tracking(&self) {
        let mut state = self.inner.lock();
        if state.recorder.is_tracking() {
            state.recorder.stop_tracking();
            log::info!(
                "Emotion tracking stopped ({} samples)",
                state.recorder.history().len()
            );
            self.inner.emit(SessionEvent::TrackingChanged(false));
        }
    }

    /// Drops the history and stops recording.
    pub fn clear_history(&self) {
        let mut state = self.inner.lock();
        let was_tracking = state.recorder.is_tracking();
        state.recorder.clear();
        self.inner.emit(SessionEvent::HistoryCleared);
        if was_tracking {
            self.inner.emit(SessionEvent::TrackingChanged(false));
        }
    }

    pub fn is_tracking(&self) -> bool {
        self.inner.lock().recorder.is_tracking()
    }

    pub fn history(&self) -> Vec<EmotionSample> {
        self.inner.lock().recorder.history().to_vec()
    }

    pub fn summary(&self) -> Vec<EmotionSummaryEntry> {
        summarize(self.inner.lock().recorder.history())
    }

    pub fn session_stats(&self) -> SessionStats {
        session_stats(self.inner.lock().recorder.history())
    }

    pub fn timeline(&self) -> Vec<TimelinePoint> {
        timeline(self.inner.lock().recorder.history())
    }

    pub fn distribution(&self) -> Vec<DistributionSlice> {
        distribution(self.inner.lock().recorder.history())
    }

    pub fn session_record(&self) -> SessionRecord {
        let now = self.inner.clock.now_millis();
        SessionRecord::from_history(self.inner.lock().recorder.history(), now)
    }

    pub fn export(&self, exporter: &ExportSessionUseCase) -> Result<ExportArtifacts, ExportError> {
        let history = self.history();
        exporter.execute(&history, self.inner.clock.now_millis())
    }

    pub fn status(&self) -> SessionStatus {
        let state = self.inner.lock();
        SessionStatus {
            mode: state.input.mode(),
            models: state.models.state().clone(),
            streaming: state.input.is_streaming(),
            camera_denied: state.input.camera_error().is_some(),
            processing_image: state.processing_image,
            detecting: state.scheduler.is_detecting(),
            tracking: state.recorder.is_tracking(),
            face_count: state.last_results.len(),
            sample_count: state.recorder.history().len(),
        }
    }

    /// Results currently on the overlay, in display coordinates.
    pub fn last_results(&self) -> Vec<DetectionResult> {
        self.inner.lock().last_results.clone()
    }

    /// Frame the current overlay was computed from.
    pub fn current_frame(&self) -> Option<Frame> {
        self.inner.lock().last_frame.clone()
    }

    pub fn overlay_snapshot(&self) -> Option<RgbaImage> {
        self.inner.lock().surface.snapshot()
    }

    async fn run_pass(&self, pending: PendingPass) {
        complete_pass(
            self.inner.engine.clone(),
            Arc::downgrade(&self.inner),
            pending,
        )
        .await;
    }

    /// Stops detection, drops every source and logs the run summary. A pass
    /// still waiting on the engine is cancelled.
    pub fn shutdown(&self) {
        let mut state = self.inner.lock();
        self.inner.release_camera_locked(&mut state);
        state.scheduler.stop();
        state.input.deactivate();
        state.logger.summary();
    }
}

impl SessionInner {
    fn lock(&self) -> MutexGuard<'_, SessionState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn emit(&self, event: SessionEvent) {
        let _ = self.events.send(event);
    }

    fn release_camera_locked(&self, state: &mut SessionState) {
        if state.input.release_camera() {
            state.scheduler.stop();
            state.clear_overlay();
            state.logger.info("Camera released");
            self.emit(SessionEvent::CameraReleased);
        }
    }
}

impl SessionState {
    fn clear_overlay(&mut self) {
        self.surface.clear();
        self.last_results.clear();
        self.last_display = None;
        self.last_frame = None;
    }

    /// Clears the overlay and sizes it for a newly activated source.
    fn reset_overlay(&mut self, display: DisplaySize) {
        if self.surface.size() != display {
            self.surface.resize(display);
        }
        self.clear_overlay();
    }

    /// Reserves a pass for the active source if one may run now.
    fn begin_pass(&mut self, generation: u64, options: DetectOptions) -> Option<PendingPass> {
        if !self.models.is_ready() || self.input.generation() != generation {
            return None;
        }
        let ticket = self.scheduler.try_begin_pass(generation)?;
        match self.input.capture_frame() {
            Some((frame, display)) => Some(PendingPass {
                ticket,
                frame,
                display,
                options,
            }),
            None => {
                self.scheduler.abandon_pass(ticket);
                None
            }
        }
    }
}

fn start_one_shot(state: &mut SessionState, settings: &SessionSettings) -> Option<PendingPass> {
    let generation = state.input.generation();
    state.scheduler.start(generation, Cadence::OneShot);
    state.begin_pass(generation, settings.detect_options)
}

/// Drives the periodic cadence for one camera generation. Holds only a weak
/// reference so a dropped session ends the loop. Each pass runs in its own
/// task, handed to the scheduler so stopping aborts it.
fn spawn_timer(
    session: Weak<SessionInner>,
    generation: u64,
    period: Duration,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
        loop {
            interval.tick().await;
            let Some(inner) = session.upgrade() else {
                break;
            };
            let mut state = inner.lock();
            if let Some(pending) = state.begin_pass(generation, inner.settings.detect_options) {
                let ticket = pending.ticket;
                let pass = tokio::spawn(complete_pass(
                    inner.engine.clone(),
                    session.clone(),
                    pending,
                ));
                state.scheduler.attach_pass(ticket, pass.abort_handle());
            }
        }
    })
}

/// Runs detection for a reserved pass and applies the result if it is
/// still current. The session is only borrowed weakly while the engine
/// works, so a pass never outlives the session that started it.
async fn complete_pass(
    engine: Arc<dyn FaceAnalysisEngine>,
    session: Weak<SessionInner>,
    pending: PendingPass,
) {
    let detect_start = Instant::now();
    let outcome = engine.detect(&pending.frame, pending.options).await;
    let detect_ms = detect_start.elapsed().as_secs_f64() * 1000.0;

    let Some(inner) = session.upgrade() else {
        log::debug!(
            "Session closed while pass {} was detecting",
            pending.ticket.sequence
        );
        return;
    };

    let mut guard = inner.lock();
    let state = &mut *guard;
    let current = state.input.generation();
    if state.scheduler.finish_pass(pending.ticket, current) == PassOutcome::Stale {
        state
            .logger
            .result_discarded(pending.ticket.generation, current);
        return;
    }

    match outcome {
        Err(e) => {
            state.logger.pass_failed(&e.to_string());
            inner.emit(SessionEvent::DetectionFailed(e.to_string()));
        }
        Ok(results) => {
            let resized = resize_results(&results, pending.frame.size(), pending.display);

            let render_start = Instant::now();
            render(
                state.surface.as_mut(),
                &resized,
                pending.display,
                state.toggles,
            );
            let render_ms = render_start.elapsed().as_secs_f64() * 1000.0;

            let sample = state
                .recorder
                .record_pass(&resized, inner.clock.now_millis());
            let faces = resized.len();
            state.last_results = resized;
            state.last_display = Some(pending.display);
            state.last_frame = Some(pending.frame);

            state.logger.pass_completed(&PassReport {
                generation: pending.ticket.generation,
                detect_ms,
                render_ms,
                faces,
                recorded: sample.is_some(),
            });
            inner.emit(SessionEvent::OverlayRendered { faces });
            if let Some(sample) = sample {
                inner.emit(SessionEvent::SampleRecorded(sample));
            }
        }
    }

    let skipped = state.scheduler.take_skipped_ticks();
    if skipped > 0 {
        state.logger.ticks_skipped(skipped);
    }
}
