//! The fixed enumerated set of named projections.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::azimuthal::Azimuthal;
use crate::conic::Conic;
use crate::cylindrical::{Cylindrical, RotatedPole};
use crate::error::ProjectionError;
use crate::geostationary::Geostationary;
use crate::pseudocylindrical::{InterruptedGoodeHomolosine, PseudoKind, Pseudocylindrical};
use crate::transform::MapProjection;
use crate::transverse::TransverseMercator;

/// Every projection the viewer can draw, by canonical name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProjectionKind {
    AlbersEqualArea,
    AzimuthalEquidistant,
    EckertI,
    EckertII,
    EckertIII,
    EckertIV,
    EckertV,
    EckertVI,
    EqualEarth,
    EquidistantConic,
    EuroPP,
    Geostationary,
    Gnomonic,
    InterruptedGoodeHomolosine,
    LambertAzimuthalEqualArea,
    LambertConformal,
    LambertCylindrical,
    Mercator,
    Miller,
    Mollweide,
    NearsidePerspective,
    NorthPolarStereo,
    #[serde(rename = "OSGB")]
    Osgb,
    #[serde(rename = "OSNI")]
    Osni,
    Orthographic,
    PlateCarree,
    Robinson,
    RotatedGeodetic,
    RotatedPole,
    Sinusoidal,
    SouthPolarStereo,
    Stereographic,
    TransverseMercator,
}

impl ProjectionKind {
    /// All projections in alphabetical order of their names.
    pub const ALL: [ProjectionKind; 33] = [
        Self::AlbersEqualArea,
        Self::AzimuthalEquidistant,
        Self::EckertI,
        Self::EckertII,
        Self::EckertIII,
        Self::EckertIV,
        Self::EckertV,
        Self::EckertVI,
        Self::EqualEarth,
        Self::EquidistantConic,
        Self::EuroPP,
        Self::Geostationary,
        Self::Gnomonic,
        Self::InterruptedGoodeHomolosine,
        Self::LambertAzimuthalEqualArea,
        Self::LambertConformal,
        Self::LambertCylindrical,
        Self::Mercator,
        Self::Miller,
        Self::Mollweide,
        Self::NearsidePerspective,
        Self::NorthPolarStereo,
        Self::Osgb,
        Self::Osni,
        Self::Orthographic,
        Self::PlateCarree,
        Self::Robinson,
        Self::RotatedGeodetic,
        Self::RotatedPole,
        Self::Sinusoidal,
        Self::SouthPolarStereo,
        Self::Stereographic,
        Self::TransverseMercator,
    ];

    /// Canonical name as typed by the user.
    pub fn name(&self) -> &'static str {
        match self {
            Self::AlbersEqualArea => "AlbersEqualArea",
            Self::AzimuthalEquidistant => "AzimuthalEquidistant",
            Self::EckertI => "EckertI",
            Self::EckertII => "EckertII",
            Self::EckertIII => "EckertIII",
            Self::EckertIV => "EckertIV",
            Self::EckertV => "EckertV",
            Self::EckertVI => "EckertVI",
            Self::EqualEarth => "EqualEarth",
            Self::EquidistantConic => "EquidistantConic",
            Self::EuroPP => "EuroPP",
            Self::Geostationary => "Geostationary",
            Self::Gnomonic => "Gnomonic",
            Self::InterruptedGoodeHomolosine => "InterruptedGoodeHomolosine",
            Self::LambertAzimuthalEqualArea => "LambertAzimuthalEqualArea",
            Self::LambertConformal => "LambertConformal",
            Self::LambertCylindrical => "LambertCylindrical",
            Self::Mercator => "Mercator",
            Self::Miller => "Miller",
            Self::Mollweide => "Mollweide",
            Self::NearsidePerspective => "NearsidePerspective",
            Self::NorthPolarStereo => "NorthPolarStereo",
            Self::Osgb => "OSGB",
            Self::Osni => "OSNI",
            Self::Orthographic => "Orthographic",
            Self::PlateCarree => "PlateCarree",
            Self::Robinson => "Robinson",
            Self::RotatedGeodetic => "RotatedGeodetic",
            Self::RotatedPole => "RotatedPole",
            Self::Sinusoidal => "Sinusoidal",
            Self::SouthPolarStereo => "SouthPolarStereo",
            Self::Stereographic => "Stereographic",
            Self::TransverseMercator => "TransverseMercator",
        }
    }

    /// Build the projection with its default parameters.
    pub fn build(&self) -> Box<dyn MapProjection> {
        match self {
            Self::AlbersEqualArea => Box::new(Conic::albers_equal_area()),
            Self::AzimuthalEquidistant => Box::new(Azimuthal::azimuthal_equidistant()),
            Self::EckertI => Box::new(Pseudocylindrical::new(PseudoKind::EckertI)),
            Self::EckertII => Box::new(Pseudocylindrical::new(PseudoKind::EckertII)),
            Self::EckertIII => Box::new(Pseudocylindrical::new(PseudoKind::EckertIII)),
            Self::EckertIV => Box::new(Pseudocylindrical::new(PseudoKind::EckertIV)),
            Self::EckertV => Box::new(Pseudocylindrical::new(PseudoKind::EckertV)),
            Self::EckertVI => Box::new(Pseudocylindrical::new(PseudoKind::EckertVI)),
            Self::EqualEarth => Box::new(Pseudocylindrical::new(PseudoKind::EqualEarth)),
            Self::EquidistantConic => Box::new(Conic::equidistant_conic()),
            Self::EuroPP => Box::new(TransverseMercator::euro_pp()),
            Self::Geostationary => Box::new(Geostationary::default()),
            Self::Gnomonic => Box::new(Azimuthal::gnomonic()),
            Self::InterruptedGoodeHomolosine => Box::new(InterruptedGoodeHomolosine),
            Self::LambertAzimuthalEqualArea => Box::new(Azimuthal::lambert_azimuthal_equal_area()),
            Self::LambertConformal => Box::new(Conic::lambert_conformal()),
            Self::LambertCylindrical => Box::new(Cylindrical::lambert_cylindrical()),
            Self::Mercator => Box::new(Cylindrical::mercator()),
            Self::Miller => Box::new(Cylindrical::miller()),
            Self::Mollweide => Box::new(Pseudocylindrical::new(PseudoKind::Mollweide)),
            Self::NearsidePerspective => Box::new(Azimuthal::nearside_perspective()),
            Self::NorthPolarStereo => Box::new(Azimuthal::north_polar_stereo()),
            Self::Osgb => Box::new(TransverseMercator::osgb()),
            Self::Osni => Box::new(TransverseMercator::osni()),
            Self::Orthographic => Box::new(Azimuthal::orthographic()),
            Self::PlateCarree => Box::new(Cylindrical::plate_carree()),
            Self::Robinson => Box::new(Pseudocylindrical::new(PseudoKind::Robinson)),
            // With the pole left at its default the rotated grid coincides
            // with the geographic one; both names draw the same map.
            Self::RotatedGeodetic | Self::RotatedPole => Box::new(RotatedPole::default()),
            Self::Sinusoidal => Box::new(Pseudocylindrical::new(PseudoKind::Sinusoidal)),
            Self::SouthPolarStereo => Box::new(Azimuthal::south_polar_stereo()),
            Self::Stereographic => Box::new(Azimuthal::stereographic()),
            Self::TransverseMercator => Box::new(TransverseMercator::default()),
        }
    }

    /// Whether the projection shows the whole globe at its default
    /// parameters, so a global extent makes sense for it.
    pub fn is_global(&self) -> bool {
        matches!(
            self,
            Self::EckertI
                | Self::EckertII
                | Self::EckertIII
                | Self::EckertIV
                | Self::EckertV
                | Self::EckertVI
                | Self::EqualEarth
                | Self::InterruptedGoodeHomolosine
                | Self::LambertCylindrical
                | Self::Miller
                | Self::Mollweide
                | Self::PlateCarree
                | Self::Robinson
                | Self::RotatedGeodetic
                | Self::RotatedPole
                | Self::Sinusoidal
        )
    }
}

impl FromStr for ProjectionKind {
    type Err = ProjectionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Self::ALL
            .iter()
            .find(|k| k.name() == s)
            .or_else(|| Self::ALL.iter().find(|k| k.name().eq_ignore_ascii_case(s)))
            .copied()
            .ok_or_else(|| ProjectionError::UnknownProjection(s.to_string()))
    }
}

impl fmt::Display for ProjectionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names_roundtrip() {
        for kind in ProjectionKind::ALL {
            assert_eq!(kind.name().parse::<ProjectionKind>().unwrap(), kind);
        }
    }

    #[test]
    fn test_case_insensitive_fallback() {
        assert_eq!(
            "platecarree".parse::<ProjectionKind>().unwrap(),
            ProjectionKind::PlateCarree
        );
        assert_eq!("osgb".parse::<ProjectionKind>().unwrap(), ProjectionKind::Osgb);
    }

    #[test]
    fn test_unknown_names_rejected() {
        for name in ["Globe", "", "Plate Carree", "WebMercator"] {
            assert!(matches!(
                name.parse::<ProjectionKind>(),
                Err(ProjectionError::UnknownProjection(_))
            ));
        }
    }

    #[test]
    fn test_names_are_unique() {
        let mut names: Vec<_> = ProjectionKind::ALL.iter().map(|k| k.name()).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), ProjectionKind::ALL.len());
    }
}
