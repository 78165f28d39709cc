//! Device location samples as delivered by the location collaborator

use serde::{Deserialize, Serialize};

/// Compass heading of the device, in degrees.
///
/// The wire form is a nullable number; `null`, a missing field and any
/// non-finite value all map to [`Heading::NoHeading`].
#[derive(Debug, Clone, Copy, PartialEq, Default, Deserialize, Serialize)]
#[serde(from = "Option<f64>", into = "Option<f64>")]
pub enum Heading {
    #[default]
    NoHeading,
    Degrees(f64),
}

impl Heading {
    pub fn value(&self) -> Option<f64> {
        match self {
            Heading::NoHeading => None,
            Heading::Degrees(deg) => Some(*deg),
        }
    }

    pub fn is_present(&self) -> bool {
        matches!(self, Heading::Degrees(_))
    }
}

impl From<Option<f64>> for Heading {
    fn from(value: Option<f64>) -> Self {
        match value {
            Some(deg) if deg.is_finite() => Heading::Degrees(deg),
            _ => Heading::NoHeading,
        }
    }
}

impl From<Heading> for Option<f64> {
    fn from(heading: Heading) -> Self {
        heading.value()
    }
}

/// A usable position fix extracted from a [`LocationSample`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Fix {
    pub latitude: f64,
    pub longitude: f64,
}

/// One reading from the location collaborator.
///
/// `heading` is only meaningful while `is_locked` is true. A sample whose
/// latitude or longitude is missing (or not finite) carries no fix.
#[derive(Debug, Clone, Copy, PartialEq, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationSample {
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
    #[serde(default)]
    pub heading: Heading,
    #[serde(default)]
    pub is_locked: bool,
}

impl LocationSample {
    /// Sample with a fix, no heading, unlocked
    pub fn at(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude: Some(latitude),
            longitude: Some(longitude),
            heading: Heading::NoHeading,
            is_locked: false,
        }
    }

    /// Sample without a fix
    pub fn no_fix(is_locked: bool) -> Self {
        Self {
            is_locked,
            ..Self::default()
        }
    }

    pub fn with_heading(mut self, degrees: f64) -> Self {
        self.heading = Heading::from(Some(degrees));
        self
    }

    pub fn with_locked(mut self, is_locked: bool) -> Self {
        self.is_locked = is_locked;
        self
    }

    pub fn fix(&self) -> Option<Fix> {
        match (self.latitude, self.longitude) {
            (Some(latitude), Some(longitude)) if latitude.is_finite() && longitude.is_finite() => {
                Some(Fix {
                    latitude,
                    longitude,
                })
            }
            _ => None,
        }
    }

    pub fn has_fix(&self) -> bool {
        self.fix().is_some()
    }
}
