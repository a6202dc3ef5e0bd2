//! Common types shared by the diana viewer crates.

pub mod error;
pub mod extent;
pub mod view;

pub use error::{DianaError, DianaResult};
pub use extent::{Extent, ExtentEntry, ExtentField};
pub use view::{Overlay, OverlaySet, PlotStyle, ViewState, MAX_LEVELS};
