use async_trait::async_trait;

use crate::input::domain::camera::{CameraStream, MediaCapture};
use crate::input::domain::input_error::InputError;

/// Capture backend for hosts without a camera. Every request is refused.
#[derive(Debug, Default, Clone, Copy)]
pub struct UnavailableCapture;

#[async_trait]
impl MediaCapture for UnavailableCapture {
    async fn request_camera(&self) -> Result<Box<dyn CameraStream>, InputError> {
        Err(InputError::CameraDenied("no capture device".into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_always_denies() {
        let result = UnavailableCapture.request_camera().await;
        assert!(matches!(result, Err(InputError::CameraDenied(_))));
    }
}
