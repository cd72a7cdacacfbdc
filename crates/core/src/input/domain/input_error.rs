use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum InputError {
    #[error("camera access denied: {0}")]
    CameraDenied(String),
    #[error("camera unavailable: {0}")]
    CameraUnavailable(String),
    #[error("failed to decode image: {0}")]
    ImageDecode(String),
    #[error("I/O error: {0}")]
    Io(String),
}

impl From<std::io::Error> for InputError {
    fn from(err: std::io::Error) -> Self {
        InputError::Io(err.to_string())
    }
}
