use crate::input::domain::image_decoder::{ImageDecoder, ImageSource};
use crate::input::domain::input_error::InputError;
use crate::shared::frame::Frame;

/// Decodes any format the `image` crate understands into an RGB frame.
#[derive(Debug, Default, Clone, Copy)]
pub struct ImageFileDecoder;

impl ImageDecoder for ImageFileDecoder {
    fn decode(&self, source: &ImageSource) -> Result<Frame, InputError> {
        let decoded = match source {
            ImageSource::Bytes(bytes) => image::load_from_memory(bytes),
            ImageSource::Path(path) => image::open(path),
        }
        .map_err(|e| InputError::ImageDecode(format!("{}: {e}", source.describe())))?;
        Ok(Frame::from_rgb_image(decoded.to_rgb8(), 0))
    }
}
