//! Map projections for the diana viewer.
//!
//! Implements the forward (geographic to projected) transform of every
//! projection in the fixed named set, on a spherical earth, without external
//! dependencies.

pub mod azimuthal;
pub mod conic;
pub mod cylindrical;
pub mod error;
pub mod geodesy;
pub mod geostationary;
pub mod kind;
pub mod pseudocylindrical;
pub mod transform;
pub mod transverse;

pub use error::ProjectionError;
pub use geostationary::Geostationary;
pub use kind::ProjectionKind;
pub use transform::{MapProjection, EARTH_RADIUS};
