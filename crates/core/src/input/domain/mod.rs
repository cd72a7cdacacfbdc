pub mod camera;
pub mod image_decoder;
pub mod input_error;
pub mod input_mode;
