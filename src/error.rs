use thiserror::Error;

use crate::alpha5::Alpha5Error;

/// Failure modes of initialization and propagation.
///
/// Each variant maps onto the integer status code used by Vallado's SGP4
/// through [`Sgp4Error::code`].
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum Sgp4Error {
    #[error("mean eccentricity {e} not within range 0.0 <= e < 1.0")]
    MeanEccentricity { e: f64 },
    #[error("mean motion {n} is less than zero")]
    MeanMotion { n: f64 },
    #[error("perturbed eccentricity {e} not within range 0.0 <= e <= 1.0")]
    PerturbedEccentricity { e: f64 },
    #[error("semilatus rectum {p} is not positive")]
    SemiLatusRectum { p: f64 },
    #[error("epoch elements are sub-orbital, perigee height {perigee_km} km")]
    SubOrbital { perigee_km: f64 },
    #[error("mrt {radius} is less than 1.0 indicating the satellite has decayed")]
    Decayed { radius: f64 },
}

impl Sgp4Error {
    pub fn code(&self) -> i32 {
        match self {
            Sgp4Error::MeanEccentricity { .. } => 1,
            Sgp4Error::MeanMotion { .. } => 2,
            Sgp4Error::PerturbedEccentricity { .. } => 3,
            Sgp4Error::SemiLatusRectum { .. } => 4,
            Sgp4Error::SubOrbital { .. } => 5,
            Sgp4Error::Decayed { .. } => 6,
        }
    }

    /// Errors raised by initialization stay on the record for good.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Sgp4Error::SubOrbital { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TleError {
    #[error("TLE lines contain non-ASCII characters:\n{line1}\n{line2}")]
    NonAscii { line1: String, line2: String },
    #[error("TLE format error on line {line}, expected the layout\n{expected}\nbut got\n{given}")]
    Format {
        line: u8,
        expected: &'static str,
        given: String,
    },
    #[error("object numbers in lines 1 and 2 do not match")]
    MismatchedCatalogNumber,
    #[error("failed to parse {field} from line {line}: {value:?}")]
    Field {
        line: u8,
        field: &'static str,
        value: String,
    },
    #[error("TLE line gives its checksum as {given} but in fact tallies to {computed}:\n{line}")]
    Checksum {
        given: u32,
        computed: u32,
        line: String,
    },
    #[error(transparent)]
    CatalogNumber(#[from] Alpha5Error),
}

#[derive(Debug, Error)]
pub enum OmmError {
    #[error("invalid OMM JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid OMM epoch {value:?}: {source}")]
    Epoch {
        value: String,
        source: chrono::ParseError,
    },
    #[error(transparent)]
    CatalogNumber(#[from] Alpha5Error),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("unknown gravity model {0:?} (use wgs72old, wgs72, wgs84)")]
    UnknownGravityModel(String),
    #[error("unknown operation mode {0:?} (use 'a' or 'i')")]
    UnknownOpsMode(char),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_follow_vallado_numbering() {
        let all = [
            Sgp4Error::MeanEccentricity { e: 1.2 },
            Sgp4Error::MeanMotion { n: -0.1 },
            Sgp4Error::PerturbedEccentricity { e: -0.3 },
            Sgp4Error::SemiLatusRectum { p: -1.0 },
            Sgp4Error::SubOrbital { perigee_km: -10.0 },
            Sgp4Error::Decayed { radius: 0.98 },
        ];
        let codes: Vec<i32> = all.iter().map(Sgp4Error::code).collect();
        assert_eq!(codes, vec![1, 2, 3, 4, 5, 6]);
        assert!(all.iter().filter(|e| e.is_fatal()).count() == 1);
    }

    #[test]
    fn messages_carry_the_offending_value() {
        let msg = Sgp4Error::MeanMotion { n: -0.25 }.to_string();
        assert_eq!(msg, "mean motion -0.25 is less than zero");
    }
}
