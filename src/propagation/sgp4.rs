//! The propagation step: secular and periodic updates, Kepler's equation and
//! the TEME state vector.

use std::f64::consts::PI;

use serde::{Deserialize, Serialize};

use super::dpper::{dpper, PerturbedElements};
use super::dsinit::MeanState;
use super::dspace::{dspace, IntegratorState};
use super::near_earth::long_period_xlcof;
use super::Model;
use crate::constants::{TWOPI, X2O3};
use crate::error::Sgp4Error;

/// Singly averaged elements reached at the requested time.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MeanElements {
    /// Semi-major axis, Earth radii.
    pub am: f64,
    pub em: f64,
    /// Inclination, radians.
    pub im: f64,
    /// Right ascension of the ascending node, radians.
    pub node: f64,
    /// Argument of perigee, radians.
    pub argp: f64,
    /// Mean anomaly, radians.
    pub mm: f64,
    /// Mean motion, rad/min.
    pub nm: f64,
}

/// TEME state at one instant.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    /// km
    pub position: [f64; 3],
    /// km/s
    pub velocity: [f64; 3],
    pub mean: MeanElements,
}

/// `a (1 - e^2)` of the osculating orbit, which must stay positive.
fn semi_latus_rectum(am: f64, el2: f64) -> Result<f64, Sgp4Error> {
    let pl = am * (1.0 - el2);
    if pl > 0.0 {
        Ok(pl)
    } else {
        Err(Sgp4Error::SemiLatusRectum { p: pl })
    }
}

pub(super) fn sgp4(
    model: &Model,
    integrator: &mut IntegratorState,
    t: f64,
) -> Result<Prediction, Sgp4Error> {
    let el = &model.elements;
    let near = &model.near;
    let g = &model.gravity;
    let no = model.init.no_unkozai;

    // Secular gravity and atmospheric drag.
    let xmdf = el.mo + near.mdot * t;
    let argpdf = el.argpo + near.argpdot * t;
    let nodedf = el.nodeo + near.nodedot * t;
    let mut argpm = argpdf;
    let mut mm = xmdf;
    let t2 = t * t;
    let mut nodem = nodedf + near.nodecf * t2;
    let mut tempa = 1.0 - near.cc1 * t;
    let mut tempe = el.bstar * near.cc4 * t;
    let mut templ = near.t2cof * t2;

    if !near.isimp {
        let delomg = near.omgcof * t;
        let delmtemp = 1.0 + near.eta * xmdf.cos();
        let delm = near.xmcof * (delmtemp * delmtemp * delmtemp - near.delmo);
        let temp = delomg + delm;
        mm = xmdf + temp;
        argpm = argpdf - temp;
        let t3 = t2 * t;
        let t4 = t3 * t;
        tempa -= near.d2 * t2 + near.d3 * t3 + near.d4 * t4;
        tempe += el.bstar * near.cc5 * (mm.sin() - near.sinmao);
        templ += near.t3cof * t3 + t4 * (near.t4cof + t * near.t5cof);
    }

    let mut nm = no;
    let mut em = el.ecco;
    let mut inclm = el.inclo;

    if let Some(deep) = &model.deep {
        let mean = dspace(
            deep.resonance.as_ref(),
            &deep.rates,
            integrator,
            &deep.epoch,
            near.argpdot,
            MeanState {
                em,
                argpm,
                inclm,
                mm,
                nm,
                nodem,
            },
            t,
        );
        em = mean.em;
        argpm = mean.argpm;
        inclm = mean.inclm;
        mm = mean.mm;
        nm = mean.nm;
        nodem = mean.nodem;
    }

    if nm <= 0.0 {
        return Err(Sgp4Error::MeanMotion { n: nm });
    }

    let am = (g.xke / nm).powf(X2O3) * tempa * tempa;
    nm = g.xke / am.powf(1.5);
    em -= tempe;

    if !(-0.001..1.0).contains(&em) {
        return Err(Sgp4Error::MeanEccentricity { e: em });
    }
    if em < 1.0e-6 {
        em = 1.0e-6;
    }

    mm += no * templ;
    let xlm = (mm + argpm + nodem) % TWOPI;
    nodem %= TWOPI;
    argpm %= TWOPI;
    mm = (xlm - argpm - nodem) % TWOPI;

    let mean = MeanElements {
        am,
        em,
        im: inclm,
        node: nodem,
        argp: argpm,
        mm,
        nm,
    };

    // Lunar-solar periodics.
    let mut p = PerturbedElements {
        ep: em,
        inclp: inclm,
        nodep: nodem,
        argpp: argpm,
        mp: mm,
    };
    let (mut aycof, mut xlcof, mut con41, mut x1mth2, mut x7thm1) =
        (near.aycof, near.xlcof, near.con41, near.x1mth2, near.x7thm1);

    if let Some(deep) = &model.deep {
        p = dpper(&deep.periodics, t, model.opsmode, p);
        if p.inclp < 0.0 {
            p.inclp = -p.inclp;
            p.nodep += PI;
            p.argpp -= PI;
        }
        if !(0.0..=1.0).contains(&p.ep) {
            return Err(Sgp4Error::PerturbedEccentricity { e: p.ep });
        }

        // Long-period and short-period coefficients follow the perturbed inclination.
        let sinip = p.inclp.sin();
        let cosip = p.inclp.cos();
        let cosisq = cosip * cosip;
        aycof = -0.5 * g.j3oj2 * sinip;
        xlcof = long_period_xlcof(g.j3oj2, sinip, cosip);
        con41 = 3.0 * cosisq - 1.0;
        x1mth2 = 1.0 - cosisq;
        x7thm1 = 7.0 * cosisq - 1.0;
    }
    let sinip = p.inclp.sin();
    let cosip = p.inclp.cos();

    // Long-period periodics.
    let axnl = p.ep * p.argpp.cos();
    let temp = 1.0 / (am * (1.0 - p.ep * p.ep));
    let aynl = p.ep * p.argpp.sin() + temp * aycof;
    let xl = p.mp + p.argpp + p.nodep + temp * xlcof * axnl;

    // Kepler's equation.
    let u = (xl - p.nodep) % TWOPI;
    let mut eo1 = u;
    let mut tem5: f64 = 9999.9;
    let mut ktr = 1;
    while tem5.abs() >= 1.0e-12 && ktr <= 10 {
        let sineo1 = eo1.sin();
        let coseo1 = eo1.cos();
        tem5 = 1.0 - coseo1 * axnl - sineo1 * aynl;
        tem5 = (u - aynl * coseo1 + axnl * sineo1 - eo1) / tem5;
        if tem5.abs() >= 0.95 {
            tem5 = 0.95_f64.copysign(tem5);
        }
        eo1 += tem5;
        ktr += 1;
    }

    // Short-period periodics.
    let sineo1 = eo1.sin();
    let coseo1 = eo1.cos();
    let ecose = axnl * coseo1 + aynl * sineo1;
    let esine = axnl * sineo1 - aynl * coseo1;
    let el2 = axnl * axnl + aynl * aynl;
    let pl = semi_latus_rectum(am, el2)?;

    let rl = am * (1.0 - ecose);
    let rdotl = am.sqrt() * esine / rl;
    let rvdotl = pl.sqrt() / rl;
    let betal = (1.0 - el2).sqrt();
    let temp = esine / (1.0 + betal);
    let sinu = am / rl * (sineo1 - aynl - axnl * temp);
    let cosu = am / rl * (coseo1 - axnl + aynl * temp);
    let mut su = sinu.atan2(cosu);
    let sin2u = (cosu + cosu) * sinu;
    let cos2u = 1.0 - 2.0 * sinu * sinu;
    let temp = 1.0 / pl;
    let temp1 = 0.5 * g.j2 * temp;
    let temp2 = temp1 * temp;

    let mrt = rl * (1.0 - 1.5 * temp2 * betal * con41) + 0.5 * temp1 * x1mth2 * cos2u;
    su -= 0.25 * temp2 * x7thm1 * sin2u;
    let xnode = p.nodep + 1.5 * temp2 * cosip * sin2u;
    let xinc = p.inclp + 1.5 * temp2 * cosip * sinip * cos2u;
    let mvt = rdotl - nm * temp1 * x1mth2 * sin2u / g.xke;
    let rvdot = rvdotl + nm * temp1 * (x1mth2 * cos2u + 1.5 * con41) / g.xke;

    // Orientation vectors.
    let sinsu = su.sin();
    let cossu = su.cos();
    let snod = xnode.sin();
    let cnod = xnode.cos();
    let sini = xinc.sin();
    let cosi = xinc.cos();
    let xmx = -snod * cosi;
    let xmy = cnod * cosi;
    let ux = xmx * sinsu + cnod * cossu;
    let uy = xmy * sinsu + snod * cossu;
    let uz = sini * sinsu;
    let vx = xmx * cossu - cnod * sinsu;
    let vy = xmy * cossu - snod * sinsu;
    let vz = sini * cossu;

    if mrt < 1.0 {
        return Err(Sgp4Error::Decayed { radius: mrt });
    }

    let mr = mrt * g.radiusearthkm;
    let vkmpersec = g.vkmpersec();
    Ok(Prediction {
        position: [mr * ux, mr * uy, mr * uz],
        velocity: [
            (mvt * ux + rvdot * vx) * vkmpersec,
            (mvt * uy + rvdot * vy) * vkmpersec,
            (mvt * uz + rvdot * vz) * vkmpersec,
        ],
        mean,
    })
}
