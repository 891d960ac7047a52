use crate::{
    config::Config,
    crop,
    download::DownloadAction,
    error::{GenerationError, Result},
    form::FormController,
    logger,
    models::{CroppedImage, SessionState},
    pollinations::{load_bitmap, request_url, ImageClient, ImageSource},
    progress::{ProgressSimulator, ProgressSnapshot},
};
use std::path::PathBuf;
use std::time::Duration;
use tokio::sync::watch;

/// Lifecycle manager for one form: owns the inputs, the progress timer and the
/// current result. Dropping the session cancels any running timer.
pub struct GenerationSession<S: ImageSource> {
    form: FormController,
    progress: ProgressSimulator,
    source: S,
    endpoint: String,
    load_timeout: Option<Duration>,
    downloads: DownloadAction,
    state: SessionState,
    cropped: Option<CroppedImage>,
}

impl GenerationSession<ImageClient> {
    pub fn from_config(config: &Config) -> Self {
        let client = ImageClient::new(&config.pollinations);
        Self::new(client, config)
    }
}

impl<S: ImageSource> GenerationSession<S> {
    pub fn new(source: S, config: &Config) -> Self {
        Self {
            form: FormController::new(),
            progress: ProgressSimulator::new(&config.progress),
            source,
            endpoint: config.pollinations.endpoint.clone(),
            load_timeout: config.pollinations.load_timeout(),
            downloads: DownloadAction::new(config.output_dir.clone()),
            state: SessionState::Idle,
            cropped: None,
        }
    }

    pub fn form(&self) -> &FormController {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut FormController {
        &mut self.form
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn cropped(&self) -> Option<&CroppedImage> {
        self.cropped.as_ref()
    }

    pub fn progress(&self) -> ProgressSnapshot {
        self.progress.snapshot()
    }

    pub fn subscribe_progress(&self) -> watch::Receiver<ProgressSnapshot> {
        self.progress.subscribe()
    }

    pub fn active_timers(&self) -> usize {
        self.progress.active_timers()
    }

    /// Run one request: validate, load, crop, publish.
    ///
    /// A failed load leaves the session in [`SessionState::Failed`] with the timer
    /// stopped and the form re-enabled. The same cleanup runs if the returned future
    /// is dropped before it resolves.
    pub async fn submit(&mut self) -> Result<&CroppedImage> {
        let request = self.form.begin_submission()?;
        self.state = SessionState::Submitting;
        let _timer = logger::timer("image generation");

        self.cropped = None;
        self.progress.start();
        let mut pending = PendingSubmission {
            form: &mut self.form,
            progress: &mut self.progress,
            state: &mut self.state,
            armed: true,
        };

        let url = request_url(&self.endpoint, &request);
        log::info!(
            "Generating {} {} image: {}",
            request.style,
            request.aspect,
            request.formatted_prompt()
        );

        *pending.state = SessionState::Loading;
        let outcome = load_and_crop(&self.source, self.load_timeout, &url).await;
        pending.armed = false;
        pending.form.end_submission();

        match outcome {
            Ok(cropped) => {
                pending.progress.finish();
                *pending.state = SessionState::Cropped;
                Ok(&*self.cropped.insert(cropped))
            }
            Err(e) => {
                pending.progress.stop();
                log::error!("Image generation failed: {}", e);
                *pending.state = SessionState::Failed(e.to_string());
                Err(e)
            }
        }
    }

    /// Save the current result, if any.
    pub fn download(&self) -> Result<Option<PathBuf>> {
        self.downloads.download(self.cropped.as_ref())
    }
}

async fn load_and_crop<S: ImageSource>(
    source: &S,
    load_timeout: Option<Duration>,
    url: &str,
) -> Result<CroppedImage> {
    let load = load_bitmap(source, url);
    let rendered = match load_timeout {
        Some(limit) => tokio::time::timeout(limit, load)
            .await
            .map_err(|_| GenerationError::Timeout(limit.as_secs()))??,
        None => load.await?,
    };

    let stretched = crop::crop_and_stretch(&rendered.bitmap)?;
    CroppedImage::from_image(&stretched)
}

/// Restores the form and stops the timer if `submit` is dropped mid-flight.
struct PendingSubmission<'a> {
    form: &'a mut FormController,
    progress: &'a mut ProgressSimulator,
    state: &'a mut SessionState,
    armed: bool,
}

impl Drop for PendingSubmission<'_> {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        log::warn!("Image generation cancelled before the load resolved");
        self.progress.stop();
        self.form.end_submission();
        *self.state = SessionState::Failed("cancelled".to_string());
    }
}
