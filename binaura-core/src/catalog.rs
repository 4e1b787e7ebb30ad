//! Frequency catalog - neurological bands and their discrete beat targets

use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Errors from catalog lookups
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CatalogError {
    #[error("no frequency {index} in band {band}")]
    InvalidIndex { band: Band, index: usize },
    #[error("unknown band: {0}")]
    UnknownBand(String),
}

/// Named beat-frequency band
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Band {
    Delta,
    Theta,
    Alpha,
}

/// One discrete target inside a band
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BandFrequency {
    pub hz: f32,
    pub label: &'static str,
}

/// Immutable catalog entry for a band
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrequencyBand {
    pub band: Band,
    /// Lower edge of the band in Hz
    pub min_hz: f32,
    /// Upper edge of the band in Hz
    pub max_hz: f32,
    pub description: &'static str,
    pub frequencies: [BandFrequency; 3],
}

const DELTA: FrequencyBand = FrequencyBand {
    band: Band::Delta,
    min_hz: 0.5,
    max_hz: 4.0,
    description: "Deep subconscious/sleep",
    frequencies: [
        BandFrequency { hz: 1.5, label: "Restorative sleep" },
        BandFrequency { hz: 2.5, label: "Subconscious access" },
        BandFrequency { hz: 3.5, label: "Healing rest" },
    ],
};

const THETA: FrequencyBand = FrequencyBand {
    band: Band::Theta,
    min_hz: 4.5,
    max_hz: 7.5,
    description: "Deep meditation/reprogramming",
    frequencies: [
        BandFrequency { hz: 4.5, label: "Drowsy reverie" },
        BandFrequency { hz: 6.0, label: "Deep meditation" },
        BandFrequency { hz: 7.5, label: "Creative insight" },
    ],
};

const ALPHA: FrequencyBand = FrequencyBand {
    band: Band::Alpha,
    min_hz: 8.4,
    max_hz: 12.0,
    description: "Light relaxation/conscious awareness",
    frequencies: [
        BandFrequency { hz: 8.5, label: "Calm relaxation" },
        BandFrequency { hz: 10.0, label: "Relaxed focus" },
        BandFrequency { hz: 12.0, label: "Light awareness" },
    ],
};

impl Band {
    /// All bands, slowest first
    pub const ALL: [Band; 3] = [Band::Delta, Band::Theta, Band::Alpha];

    pub fn name(&self) -> &'static str {
        match self {
            Band::Delta => "delta",
            Band::Theta => "theta",
            Band::Alpha => "alpha",
        }
    }

    /// Catalog entry for this band
    pub fn info(&self) -> &'static FrequencyBand {
        match self {
            Band::Delta => &DELTA,
            Band::Theta => &THETA,
            Band::Alpha => &ALPHA,
        }
    }

    /// Discrete target at `index`
    pub fn frequency(&self, index: usize) -> Result<&'static BandFrequency, CatalogError> {
        self.info()
            .frequencies
            .get(index)
            .ok_or(CatalogError::InvalidIndex { band: *self, index })
    }
}

impl fmt::Display for Band {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Band {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "delta" | "d" => Ok(Band::Delta),
            "theta" | "t" => Ok(Band::Theta),
            "alpha" | "a" => Ok(Band::Alpha),
            _ => Err(CatalogError::UnknownBand(s.to_string())),
        }
    }
}

/// Beat frequency in Hz for `band` at `index`
pub fn band_frequency(band: Band, index: usize) -> Result<f32, CatalogError> {
    band.frequency(index).map(|f| f.hz)
}
