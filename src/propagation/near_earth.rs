//! Secular gravity and drag coefficients fixed at epoch.

use log::debug;

use super::initl::Initl;
use crate::constants::{TEMP4, X2O3};
use crate::earth_gravity::EarthGravity;
use crate::elements::Elements;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct NearEarthTerms {
    /// Simplified drag: perigee below 220 km, or any deep-space orbit.
    pub isimp: bool,
    pub aycof: f64,
    pub con41: f64,
    pub cc1: f64,
    pub cc4: f64,
    pub cc5: f64,
    pub d2: f64,
    pub d3: f64,
    pub d4: f64,
    pub delmo: f64,
    pub eta: f64,
    pub argpdot: f64,
    pub omgcof: f64,
    pub sinmao: f64,
    pub t2cof: f64,
    pub t3cof: f64,
    pub t4cof: f64,
    pub t5cof: f64,
    pub x1mth2: f64,
    pub x7thm1: f64,
    pub mdot: f64,
    pub nodedot: f64,
    pub xlcof: f64,
    pub xmcof: f64,
    pub nodecf: f64,
    /// `argpdot + nodedot`, consumed by the deep-space initializer.
    pub xpidot: f64,
}

impl NearEarthTerms {
    pub fn new(el: &Elements, init: &Initl, gravity: &EarthGravity, deep_space: bool) -> Self {
        let re = gravity.radiusearthkm;
        let (j2, j4, j3oj2) = (gravity.j2, gravity.j4, gravity.j3oj2);
        let Initl {
            no_unkozai: no,
            ao,
            con41,
            con42,
            cosio,
            cosio2,
            omeosq,
            posq,
            rp,
            rteosq,
            sinio,
            ..
        } = *init;
        let ecco = el.ecco;

        let isimp = deep_space || rp < 220.0 / re + 1.0;
        debug!("satellite {}: simplified drag {}", el.satnum, isimp);

        // Atmospheric density fit: s parameter and (q0 - s)^4, adjusted for low perigees.
        let mut sfour = 78.0 / re + 1.0;
        let mut qzms24 = ((120.0 - 78.0) / re).powi(4);
        let perige = (rp - 1.0) * re;
        if perige < 156.0 {
            sfour = if perige < 98.0 { 20.0 } else { perige - 78.0 };
            qzms24 = ((120.0 - sfour) / re).powi(4);
            sfour = sfour / re + 1.0;
        }

        let pinvsq = 1.0 / posq;
        let tsi = 1.0 / (ao - sfour);
        let eta = ao * ecco * tsi;
        let etasq = eta * eta;
        let eeta = ecco * eta;
        let psisq = (1.0 - etasq).abs();
        let coef = qzms24 * tsi.powi(4);
        let coef1 = coef / psisq.powf(3.5);
        let cc2 = coef1
            * no
            * (ao * (1.0 + 1.5 * etasq + eeta * (4.0 + etasq))
                + 0.375 * j2 * tsi / psisq * con41 * (8.0 + 3.0 * etasq * (8.0 + etasq)));
        let cc1 = el.bstar * cc2;
        let cc3 = if ecco > 1.0e-4 {
            -2.0 * coef * tsi * j3oj2 * no * sinio / ecco
        } else {
            0.0
        };
        let x1mth2 = 1.0 - cosio2;
        let cc4 = 2.0
            * no
            * coef1
            * ao
            * omeosq
            * (eta * (2.0 + 0.5 * etasq) + ecco * (0.5 + 2.0 * etasq)
                - j2 * tsi / (ao * psisq)
                    * (-3.0 * con41 * (1.0 - 2.0 * eeta + etasq * (1.5 - 0.5 * eeta))
                        + 0.75 * x1mth2 * (2.0 * etasq - eeta * (1.0 + etasq)) * (2.0 * el.argpo).cos()));
        let cc5 = 2.0 * coef1 * ao * omeosq * (1.0 + 2.75 * (etasq + eeta) + eeta * etasq);

        let cosio4 = cosio2 * cosio2;
        let temp1 = 1.5 * j2 * pinvsq * no;
        let temp2 = 0.5 * temp1 * j2 * pinvsq;
        let temp3 = -0.46875 * j4 * pinvsq * pinvsq * no;
        let mdot = no
            + 0.5 * temp1 * rteosq * con41
            + 0.0625 * temp2 * rteosq * (13.0 - 78.0 * cosio2 + 137.0 * cosio4);
        let argpdot = -0.5 * temp1 * con42
            + 0.0625 * temp2 * (7.0 - 114.0 * cosio2 + 395.0 * cosio4)
            + temp3 * (3.0 - 36.0 * cosio2 + 49.0 * cosio4);
        let xhdot1 = -temp1 * cosio;
        let nodedot =
            xhdot1 + (0.5 * temp2 * (4.0 - 19.0 * cosio2) + 2.0 * temp3 * (3.0 - 7.0 * cosio2)) * cosio;

        let delmotemp = 1.0 + eta * el.mo.cos();

        let mut terms = NearEarthTerms {
            isimp,
            aycof: -0.5 * j3oj2 * sinio,
            con41,
            cc1,
            cc4,
            cc5,
            delmo: delmotemp * delmotemp * delmotemp,
            eta,
            argpdot,
            omgcof: el.bstar * cc3 * el.argpo.cos(),
            sinmao: el.mo.sin(),
            t2cof: 1.5 * cc1,
            x1mth2,
            x7thm1: 7.0 * cosio2 - 1.0,
            mdot,
            nodedot,
            xlcof: long_period_xlcof(j3oj2, sinio, cosio),
            xmcof: if ecco > 1.0e-4 {
                -X2O3 * coef * el.bstar / eeta
            } else {
                0.0
            },
            nodecf: 3.5 * omeosq * xhdot1 * cc1,
            xpidot: argpdot + nodedot,
            ..Default::default()
        };

        if !isimp {
            let cc1sq = cc1 * cc1;
            let d2 = 4.0 * ao * tsi * cc1sq;
            let temp = d2 * tsi * cc1 / 3.0;
            let d3 = (17.0 * ao + sfour) * temp;
            let d4 = 0.5 * temp * ao * tsi * (221.0 * ao + 31.0 * sfour) * cc1;
            terms.d2 = d2;
            terms.d3 = d3;
            terms.d4 = d4;
            terms.t3cof = d2 + 2.0 * cc1sq;
            terms.t4cof = 0.25 * (3.0 * d3 + cc1 * (12.0 * d2 + 10.0 * cc1sq));
            terms.t5cof =
                0.2 * (3.0 * d4 + 12.0 * cc1 * d3 + 6.0 * d2 * d2 + 15.0 * cc1sq * (2.0 * d2 + cc1sq));
        }

        terms
    }
}

/// Long-period coefficient of the mean longitude. `1 + cos(i)` is floored for
/// retrograde equatorial orbits.
pub fn long_period_xlcof(j3oj2: f64, sini: f64, cosi: f64) -> f64 {
    let denom = if (cosi + 1.0).abs() > TEMP4 {
        1.0 + cosi
    } else {
        TEMP4
    };
    -0.25 * j3oj2 * sini * (3.0 + 5.0 * cosi) / denom
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::earth_gravity::GravityModel;
    use crate::options::OpsMode;
    use crate::propagation::initl::initl;
    use crate::tle::parse_tle;

    fn terms_for(line1: &str, line2: &str, deep: bool) -> NearEarthTerms {
        let el = parse_tle(line1, line2).unwrap();
        let g = GravityModel::Wgs72.constants();
        let init = initl(&g, OpsMode::Improved, el.epoch_days_since_1950(), el.ecco, el.inclo, el.no_kozai);
        NearEarthTerms::new(&el, &init, &g, deep)
    }

    const L1: &str = "1 00005U 58002B   00179.78495062  .00000023  00000-0  28098-4 0  4753";
    const L2: &str = "2 00005  34.2682 348.7242 1859667 331.7664  19.3264 10.82419157413667";
    // Perigee near 198 km.
    const LOW1: &str = "1 88888U          80275.98708465  .00073094  13844-3  66816-4 0    87";
    const LOW2: &str = "2 88888  72.8435 115.9689 0086731  52.6988 110.5714 16.05824518  1058";

    #[test]
    fn full_drag_terms_above_220_km() {
        let t = terms_for(L1, L2, false);
        assert!(!t.isimp);
        assert!(t.cc1 > 0.0);
        assert!(t.d2 > 0.0 && t.d3 > 0.0 && t.d4 > 0.0);
        assert!(t.t3cof != 0.0 && t.t4cof != 0.0 && t.t5cof != 0.0);
        // Node regresses for a prograde orbit.
        assert!(t.nodedot < 0.0);
        assert_eq!(t.xpidot, t.argpdot + t.nodedot);
    }

    #[test]
    fn low_perigee_uses_simplified_drag() {
        let t = terms_for(LOW1, LOW2, false);
        assert!(t.isimp);
        assert_eq!(t.d2, 0.0);
        assert!(t.cc1 > 0.0 && t.cc4 != 0.0);
    }

    #[test]
    fn deep_space_forces_simplified_drag() {
        let t = terms_for(L1, L2, true);
        assert!(t.isimp);
        assert_eq!((t.d2, t.d3, t.d4), (0.0, 0.0, 0.0));
        assert_eq!((t.t3cof, t.t4cof, t.t5cof), (0.0, 0.0, 0.0));
        assert!(t.cc1 > 0.0);
    }

    #[test]
    fn xlcof_is_finite_for_retrograde_equatorial() {
        let x = long_period_xlcof(-2.345e-3, 0.0, -1.0);
        assert!(x.is_finite());
        assert_eq!(x, 0.0);
        assert!(long_period_xlcof(-2.345e-3, 1e-7, -1.0 + 5e-15).is_finite());
    }
}
