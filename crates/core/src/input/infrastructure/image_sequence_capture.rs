use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;

use crate::input::domain::camera::{CameraStream, MediaCapture};
use crate::input::domain::image_decoder::{ImageDecoder, ImageSource};
use crate::input::domain::input_error::InputError;
use crate::shared::constants::IMAGE_EXTENSIONS;
use crate::shared::display_size::DisplaySize;
use crate::shared::frame::Frame;

/// A virtual camera that plays back a directory of image files in name order.
pub struct ImageSequenceCapture {
    dir: PathBuf,
    cycle: bool,
    decoder: Arc<dyn ImageDecoder>,
}

impl ImageSequenceCapture {
    pub fn new(dir: impl Into<PathBuf>, cycle: bool, decoder: Arc<dyn ImageDecoder>) -> Self {
        Self {
            dir: dir.into(),
            cycle,
            decoder,
        }
    }
}

fn list_images(dir: &Path) -> Result<Vec<PathBuf>, InputError> {
    let mut paths: Vec<PathBuf> = std::fs::read_dir(dir)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| {
            path.is_file()
                && path
                    .extension()
                    .and_then(|ext| ext.to_str())
                    .is_some_and(|ext| IMAGE_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
        })
        .collect();
    paths.sort();
    Ok(paths)
}

/// Decodes every listed file. Unreadable files are skipped with a warning.
fn decode_all(paths: &[PathBuf], decoder: &dyn ImageDecoder) -> Vec<Frame> {
    paths
        .iter()
        .filter_map(|path| match decoder.decode(&ImageSource::Path(path.clone())) {
            Ok(frame) => Some(frame),
            Err(e) => {
                log::warn!("Skipping unreadable camera frame: {e}");
                None
            }
        })
        .collect()
}

#[async_trait]
impl MediaCapture for ImageSequenceCapture {
    /// Opens the stream with every frame already decoded, so reading a frame
    /// on a detection tick never touches the disk.
    async fn request_camera(&self) -> Result<Box<dyn CameraStream>, InputError> {
        let paths = list_images(&self.dir).map_err(|e| {
            InputError::CameraDenied(format!("{}: {e}", self.dir.display()))
        })?;
        if paths.is_empty() {
            return Err(InputError::CameraDenied(format!(
                "no images in {}",
                self.dir.display()
            )));
        }

        let decoder = self.decoder.clone();
        let frames = tokio::task::spawn_blocking(move || decode_all(&paths, decoder.as_ref()))
            .await
            .map_err(|e| InputError::CameraUnavailable(e.to_string()))?;
        let Some(first) = frames.first() else {
            return Err(InputError::CameraUnavailable(format!(
                "no decodable images in {}",
                self.dir.display()
            )));
        };
        let size = first.size();
        log::info!(
            "Virtual camera opened on {} ({} frames, {size})",
            self.dir.display(),
            frames.len()
        );
        Ok(Box::new(ImageSequenceStream {
            size,
            frames,
            position: 0,
            emitted: 0,
            cycle: self.cycle,
            live: true,
        }))
    }
}

struct ImageSequenceStream {
    frames: Vec<Frame>,
    size: DisplaySize,
    position: usize,
    emitted: usize,
    cycle: bool,
    live: bool,
}

impl CameraStream for ImageSequenceStream {
    fn display_size(&self) -> DisplaySize {
        self.size
    }

    fn read_frame(&mut self) -> Option<Frame> {
        if !self.live {
            return None;
        }
        if self.position >= self.frames.len() {
            if !self.cycle {
                log::info!("Virtual camera reached end of sequence");
                self.live = false;
                return None;
            }
            self.position = 0;
        }
        let frame = self.frames[self.position].clone().with_index(self.emitted);
        self.position += 1;
        self.emitted += 1;
        Some(frame)
    }

    fn is_live(&self) -> bool {
        self.live
    }

    fn stop(&mut self) {
        self.live = false;
    }
}
