use std::path::PathBuf;

use crate::input::domain::input_error::InputError;
use crate::shared::frame::Frame;

/// Raw image input as handed over by a file picker or a caller.
#[derive(Clone, Debug, PartialEq)]
pub enum ImageSource {
    Bytes(Vec<u8>),
    Path(PathBuf),
}

impl ImageSource {
    pub fn describe(&self) -> String {
        match self {
            ImageSource::Bytes(bytes) => format!("{} bytes", bytes.len()),
            ImageSource::Path(path) => path.display().to_string(),
        }
    }
}

pub trait ImageDecoder: Send + Sync {
    fn decode(&self, source: &ImageSource) -> Result<Frame, InputError>;
}
