//! Detection-session controller for face analysis.
//!
//! Feature areas follow the same split: `domain` holds types and the traits
//! other layers plug into, `infrastructure` holds the concrete adapters.
//! [`session::detection_session::DetectionSession`] wires them together.

pub mod detection;
pub mod export;
pub mod input;
pub mod overlay;
pub mod recording;
pub mod session;
pub mod shared;
