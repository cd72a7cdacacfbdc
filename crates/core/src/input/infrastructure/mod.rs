pub mod image_file_decoder;
pub mod image_sequence_capture;
pub mod unavailable_capture;
