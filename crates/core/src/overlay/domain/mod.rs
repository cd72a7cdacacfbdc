pub mod display_toggles;
pub mod overlay_surface;
