use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// The three gravity models SGP4 has historically been run with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GravityModel {
    /// WGS-72 with the truncated `xke` of the original Spacetrack Report #3 code.
    Wgs72Old,
    /// WGS-72, the model the element sets are fitted with.
    #[default]
    Wgs72,
    /// WGS-84.
    Wgs84,
}

/// Earth gravity model parameters used by SGP4.
///
/// (tumin, mu, radiusearthkm, xke, j2, j3, j4, j3oj2)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EarthGravity {
    /// Minutes in one canonical time unit.
    pub tumin: f64,
    /// Gravitational parameter, km^3/s^2.
    pub mu: f64,
    /// Equatorial radius, km.
    pub radiusearthkm: f64,
    /// sqrt(mu) in Earth radii^1.5 per minute.
    pub xke: f64,
    pub j2: f64,
    pub j3: f64,
    pub j4: f64,
    pub j3oj2: f64,
}

impl EarthGravity {
    fn new(mu: f64, radiusearthkm: f64, xke: f64, j2: f64, j3: f64, j4: f64) -> Self {
        EarthGravity {
            tumin: 1.0 / xke,
            mu,
            radiusearthkm,
            xke,
            j2,
            j3,
            j4,
            j3oj2: j3 / j2,
        }
    }

    /// Velocity scale from Earth radii per minute to km/s.
    pub fn vkmpersec(&self) -> f64 {
        self.radiusearthkm * self.xke / 60.0
    }
}

impl GravityModel {
    pub const ALL: [GravityModel; 3] = [
        GravityModel::Wgs72Old,
        GravityModel::Wgs72,
        GravityModel::Wgs84,
    ];

    pub fn constants(self) -> EarthGravity {
        match self {
            GravityModel::Wgs72Old => EarthGravity::new(
                398_600.799_64,
                6378.135,
                0.074_366_916_1,
                0.001_082_616,
                -0.000_002_538_81,
                -0.000_001_655_97,
            ),
            GravityModel::Wgs72 => {
                let mu: f64 = 398_600.8;
                let radiusearthkm = 6378.135;
                let xke = 60.0 / (radiusearthkm * radiusearthkm * radiusearthkm / mu).sqrt();
                EarthGravity::new(
                    mu,
                    radiusearthkm,
                    xke,
                    0.001_082_616,
                    -0.000_002_538_81,
                    -0.000_001_655_97,
                )
            }
            GravityModel::Wgs84 => {
                let mu: f64 = 398_600.5;
                let radiusearthkm = 6378.137;
                let xke = 60.0 / (radiusearthkm * radiusearthkm * radiusearthkm / mu).sqrt();
                EarthGravity::new(
                    mu,
                    radiusearthkm,
                    xke,
                    0.001_082_629_989_05,
                    -0.000_002_532_153_06,
                    -0.000_001_610_987_61,
                )
            }
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            GravityModel::Wgs72Old => "wgs72old",
            GravityModel::Wgs72 => "wgs72",
            GravityModel::Wgs84 => "wgs84",
        }
    }
}

impl fmt::Display for GravityModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for GravityModel {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "wgs72old" => Ok(GravityModel::Wgs72Old),
            "wgs72" => Ok(GravityModel::Wgs72),
            "wgs84" => Ok(GravityModel::Wgs84),
            _ => Err(ConfigError::UnknownGravityModel(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn names_round_trip_through_from_str() {
        for model in GravityModel::ALL {
            assert_eq!(model.name().parse::<GravityModel>().unwrap(), model);
        }
        assert_eq!("WGS84".parse::<GravityModel>().unwrap(), GravityModel::Wgs84);
        assert!(matches!(
            "egm96".parse::<GravityModel>(),
            Err(ConfigError::UnknownGravityModel(_))
        ));
    }

    #[test]
    fn wgs72_xke_is_derived_from_mu_and_radius() {
        let old = GravityModel::Wgs72Old.constants();
        let new = GravityModel::Wgs72.constants();
        assert_abs_diff_eq!(new.xke, 0.07436691613317342, epsilon = 1e-15);
        assert_abs_diff_eq!(old.xke, new.xke, epsilon = 1e-10);
        assert_abs_diff_eq!(old.tumin * old.xke, 1.0, epsilon = 1e-15);
        assert_eq!(old.j2, new.j2);
    }

    #[test]
    fn wgs84_uses_its_own_zonal_harmonics() {
        let g = GravityModel::Wgs84.constants();
        assert_eq!(g.radiusearthkm, 6378.137);
        assert_abs_diff_eq!(g.xke, 0.07436685316871385, epsilon = 1e-15);
        assert_abs_diff_eq!(g.j3oj2, -0.000_002_532_153_06 / 0.001_082_629_989_05, epsilon = 1e-18);
    }

    #[test]
    fn serde_uses_lowercase_names() {
        let json = serde_json::to_string(&GravityModel::Wgs72Old).unwrap();
        assert_eq!(json, "\"wgs72old\"");
        let back: GravityModel = serde_json::from_str("\"wgs84\"").unwrap();
        assert_eq!(back, GravityModel::Wgs84);
    }
}
