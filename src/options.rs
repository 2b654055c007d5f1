//! Run-time selection of constants and compatibility mode.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::earth_gravity::GravityModel;
use crate::error::ConfigError;

/// Operation mode of the propagator.
///
/// `Afspc` reproduces the historical Air Force Space Command code: sidereal
/// time from the 1970 polynomial and the legacy wrapping of the node inside the
/// low-inclination periodic terms. `Improved` uses the IAU-82 sidereal time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OpsMode {
    Afspc,
    #[default]
    Improved,
}

impl OpsMode {
    pub fn as_char(self) -> char {
        match self {
            OpsMode::Afspc => 'a',
            OpsMode::Improved => 'i',
        }
    }
}

impl TryFrom<char> for OpsMode {
    type Error = ConfigError;

    fn try_from(c: char) -> Result<Self, Self::Error> {
        match c.to_ascii_lowercase() {
            'a' => Ok(OpsMode::Afspc),
            'i' => Ok(OpsMode::Improved),
            other => Err(ConfigError::UnknownOpsMode(other)),
        }
    }
}

impl fmt::Display for OpsMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

/// Everything besides the elements themselves that changes the result of
/// initialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Sgp4Options {
    pub gravity: GravityModel,
    pub opsmode: OpsMode,
}

impl Sgp4Options {
    pub fn new(gravity: GravityModel, opsmode: OpsMode) -> Self {
        Sgp4Options { gravity, opsmode }
    }

    /// Settings of the original Spacetrack Report #3 code.
    pub fn legacy() -> Self {
        Sgp4Options::new(GravityModel::Wgs72Old, OpsMode::Afspc)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn opsmode_from_char() {
        assert_eq!(OpsMode::try_from('a').unwrap(), OpsMode::Afspc);
        assert_eq!(OpsMode::try_from('I').unwrap(), OpsMode::Improved);
        assert_eq!(
            OpsMode::try_from('x').unwrap_err(),
            ConfigError::UnknownOpsMode('x')
        );
    }

    #[test]
    fn options_default_to_wgs72_improved() {
        let opts = Sgp4Options::default();
        assert_eq!(opts.gravity, GravityModel::Wgs72);
        assert_eq!(opts.opsmode, OpsMode::Improved);
    }

    #[test]
    fn options_deserialize_with_missing_fields() {
        let opts: Sgp4Options = serde_json::from_str(r#"{"gravity": "wgs84"}"#).unwrap();
        assert_eq!(opts, Sgp4Options::new(GravityModel::Wgs84, OpsMode::Improved));

        let opts: Sgp4Options =
            serde_json::from_str(r#"{"gravity": "wgs72old", "opsmode": "afspc"}"#).unwrap();
        assert_eq!(opts, Sgp4Options::legacy());
    }
}
