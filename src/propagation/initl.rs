//! Epoch quantities shared by both branches: un-Kozai'd mean motion, the
//! inclination and eccentricity functions, and sidereal time at epoch.

use crate::constants::{JD_1950, TWOPI, X2O3};
use crate::earth_gravity::EarthGravity;
use crate::functions::gstime;
use crate::options::OpsMode;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Initl {
    /// Brouwer mean motion, rad/min.
    pub no_unkozai: f64,
    pub ainv: f64,
    /// Semi-major axis, Earth radii.
    pub ao: f64,
    pub con41: f64,
    pub con42: f64,
    pub cosio: f64,
    pub cosio2: f64,
    pub eccsq: f64,
    pub omeosq: f64,
    pub posq: f64,
    /// Perigee radius, Earth radii.
    pub rp: f64,
    pub rteosq: f64,
    pub sinio: f64,
    /// Greenwich sidereal time at epoch, radians.
    pub gsto: f64,
}

/// `epoch` is in days since 1949 December 31 00:00 UT.
pub fn initl(
    gravity: &EarthGravity,
    opsmode: OpsMode,
    epoch: f64,
    ecco: f64,
    inclo: f64,
    no_kozai: f64,
) -> Initl {
    let eccsq = ecco * ecco;
    let omeosq = 1.0 - eccsq;
    let rteosq = omeosq.sqrt();
    let cosio = inclo.cos();
    let cosio2 = cosio * cosio;

    // Kozai to Brouwer mean motion.
    let ak = (gravity.xke / no_kozai).powf(X2O3);
    let d1 = 0.75 * gravity.j2 * (3.0 * cosio2 - 1.0) / (rteosq * omeosq);
    let mut del = d1 / (ak * ak);
    let adel = ak * (1.0 - del * del - del * (1.0 / 3.0 + 134.0 * del * del / 81.0));
    del = d1 / (adel * adel);
    let no_unkozai = no_kozai / (1.0 + del);

    let ao = (gravity.xke / no_unkozai).powf(X2O3);
    let po = ao * omeosq;
    let con42 = 1.0 - 5.0 * cosio2;

    Initl {
        no_unkozai,
        ainv: 1.0 / ao,
        ao,
        con41: -con42 - cosio2 - cosio2,
        con42,
        cosio,
        cosio2,
        eccsq,
        omeosq,
        posq: po * po,
        rp: ao * (1.0 - ecco),
        rteosq,
        sinio: inclo.sin(),
        gsto: match opsmode {
            OpsMode::Afspc => gstime_1970(epoch),
            OpsMode::Improved => gstime(epoch + JD_1950),
        },
    }
}

/// Sidereal time from the 1970 polynomial of the original AFSPC code.
fn gstime_1970(epoch: f64) -> f64 {
    const C1: f64 = 1.720_279_169_407_036_39e-2;
    const THGR70: f64 = 1.732_134_385_650_937_4;
    const FK5R: f64 = 5.075_514_194_322_694_42e-15;

    let ts70 = epoch - 7305.0;
    let ds70 = (ts70 + 1.0e-8).floor();
    let tfrac = ts70 - ds70;
    let gsto = (THGR70 + C1 * ds70 + (C1 + TWOPI) * tfrac + ts70 * ts70 * FK5R) % TWOPI;
    if gsto < 0.0 {
        gsto + TWOPI
    } else {
        gsto
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::XPDOTP;
    use crate::earth_gravity::GravityModel;
    use approx::assert_abs_diff_eq;

    #[test]
    fn brouwer_mean_motion_is_slower_for_prograde_leo() {
        let g = GravityModel::Wgs72.constants();
        let no_kozai = 15.5 / XPDOTP;
        let out = initl(&g, OpsMode::Improved, 25_000.0, 0.001, 51.6_f64.to_radians(), no_kozai);

        assert!(out.no_unkozai < no_kozai);
        assert!((out.no_unkozai / no_kozai - 1.0).abs() < 1e-3);
        assert_abs_diff_eq!(out.ainv * out.ao, 1.0, epsilon = 1e-15);
        assert_abs_diff_eq!(out.rp, out.ao * 0.999, epsilon = 1e-15);
        assert_abs_diff_eq!(out.con41, 3.0 * out.cosio2 - 1.0, epsilon = 1e-15);
    }

    #[test]
    fn sidereal_time_modes_agree_closely() {
        let g = GravityModel::Wgs72.constants();
        // 2000-06-27 18:50:19.733568 UT
        let epoch = 18_441.784_950_62;
        let afspc = initl(&g, OpsMode::Afspc, epoch, 0.1, 0.5, 0.05);
        let improved = initl(&g, OpsMode::Improved, epoch, 0.1, 0.5, 0.05);

        assert!((0.0..TWOPI).contains(&afspc.gsto));
        assert!((0.0..TWOPI).contains(&improved.gsto));
        assert!((afspc.gsto - improved.gsto).abs() < 1e-6);
    }
}
