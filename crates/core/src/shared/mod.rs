pub mod clock;
pub mod constants;
pub mod display_size;
pub mod frame;
pub mod model_resolver;
