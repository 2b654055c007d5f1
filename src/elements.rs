use crate::alpha5::{from_alpha5, Alpha5Error};
use crate::constants::JD_1950;

/// Mean orbital elements at epoch, in the units SGP4 consumes.
///
/// Produced by [`crate::tle::parse_tle`] and [`crate::omm::Omm::to_elements`],
/// or filled in by hand.
#[derive(Debug, Clone, PartialEq)]
pub struct Elements {
    /// Catalog number as written in the source (may be Alpha-5).
    pub satnum: String,
    pub classification: char,
    pub intldesg: String,

    /// Four-digit epoch year.
    pub epochyr: i32,
    /// Day of year of the epoch; 1.0 is January 1 00:00 UTC.
    pub epochdays: f64,
    /// Split Julian date of the epoch: whole day (ending in .5) plus fraction.
    pub jdsatepoch: f64,
    pub jdsatepoch_f: f64,

    /// Drag term, inverse Earth radii.
    pub bstar: f64,
    /// First time derivative of mean motion, rad/min^2.
    pub ndot: f64,
    /// Second time derivative of mean motion, rad/min^3.
    pub nddot: f64,
    pub ecco: f64,
    /// Argument of perigee, radians.
    pub argpo: f64,
    /// Inclination, radians.
    pub inclo: f64,
    /// Mean anomaly, radians.
    pub mo: f64,
    /// Kozai mean motion, rad/min.
    pub no_kozai: f64,
    /// Right ascension of the ascending node, radians.
    pub nodeo: f64,

    pub elnum: u32,
    pub revnum: u32,
}

impl Elements {
    /// Days since 1949 December 31 00:00 UT, the epoch argument of initialization.
    pub fn epoch_days_since_1950(&self) -> f64 {
        (self.jdsatepoch - JD_1950) + self.jdsatepoch_f
    }

    pub fn catalog_number(&self) -> Result<u32, Alpha5Error> {
        from_alpha5(&self.satnum)
    }

    /// Orbital period implied by the Kozai mean motion, minutes.
    pub fn period_minutes(&self) -> f64 {
        std::f64::consts::TAU / self.no_kozai
    }
}
