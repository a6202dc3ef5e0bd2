//! Diana map viewer.
//!
//! An interactive viewer for weather-forecast and WRF model output. The
//! session keeps a [`ViewState`](diana_common::ViewState) and rebuilds the
//! whole figure from it after every command; the current figure is written
//! to a PNG file that any image viewer can watch.

pub mod animation;
pub mod command;
pub mod config;
pub mod display;
pub mod error;
pub mod redraw;
pub mod viewer;

pub use animation::{animate, encode_gif, render_frames, GifOptions};
pub use command::{parse, AnimationAxis, AnimationRequest, Command, ProfileRequest};
pub use config::ViewerConfig;
pub use display::{FigureSink, MemorySink, PngFileSink};
pub use error::{ViewerError, ViewerResult};
pub use redraw::{redraw, ViewerResources};
pub use viewer::{open_dataset, Outcome, Viewer};
