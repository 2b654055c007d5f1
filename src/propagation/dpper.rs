//! Lunar-solar long-period periodics of the deep-space branch.

use std::f64::consts::PI;

use super::dscom::LunarSolarPeriodics;
use crate::constants::{TWOPI, ZEL, ZES, ZNL, ZNS};
use crate::options::OpsMode;

/// Osculating-to-be elements the periodics are added to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PerturbedElements {
    pub ep: f64,
    pub inclp: f64,
    pub nodep: f64,
    pub argpp: f64,
    pub mp: f64,
}

/// Add the periodics at `t` minutes from epoch.
///
/// Below 0.2 rad of inclination the node and perigee corrections are applied
/// through the Lyddane modification, in which the Afspc mode keeps the node in
/// `[0, 2π)` before and after recomputing it.
pub fn dpper(
    periodics: &LunarSolarPeriodics,
    t: f64,
    opsmode: OpsMode,
    el: PerturbedElements,
) -> PerturbedElements {
    let solar = periodics.solar.at(periodics.zmos + ZNS * t, ZES);
    let lunar = periodics.lunar.at(periodics.zmol + ZNL * t, ZEL);
    let p = solar + lunar;

    let PerturbedElements {
        mut ep,
        mut inclp,
        mut nodep,
        mut argpp,
        mut mp,
    } = el;

    inclp += p.pinc;
    ep += p.pe;
    let sinip = inclp.sin();
    let cosip = inclp.cos();

    if inclp >= 0.2 {
        let ph = p.ph / sinip;
        argpp += p.pgh - cosip * ph;
        nodep += ph;
        mp += p.pl;
    } else {
        let sinop = nodep.sin();
        let cosop = nodep.cos();
        let alfdp = sinip * sinop + (p.ph * cosop + p.pinc * cosip * sinop);
        let betdp = sinip * cosop + (-p.ph * sinop + p.pinc * cosip * cosop);

        let afspc = opsmode == OpsMode::Afspc;
        nodep %= TWOPI;
        if afspc && nodep < 0.0 {
            nodep += TWOPI;
        }
        let xls = mp + argpp + p.pl + p.pgh + (cosip - p.pinc * sinip) * nodep;
        let xnoh = nodep;
        nodep = alfdp.atan2(betdp);
        if afspc && nodep < 0.0 {
            nodep += TWOPI;
        }
        if (xnoh - nodep).abs() > PI {
            if nodep < xnoh {
                nodep += TWOPI;
            } else {
                nodep -= TWOPI;
            }
        }
        mp += p.pl;
        argpp = xls - mp - cosip * nodep;
    }

    PerturbedElements {
        ep,
        inclp,
        nodep,
        argpp,
        mp,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::propagation::dscom::PeriodicAmplitudes;
    use approx::assert_abs_diff_eq;

    fn periodics() -> LunarSolarPeriodics {
        let amp = PeriodicAmplitudes {
            e2: 1e-5,
            e3: -2e-5,
            i2: 3e-6,
            i3: 1e-6,
            l2: -4e-6,
            l3: 2e-6,
            l4: 5e-6,
            gh2: 1e-6,
            gh3: -1e-6,
            gh4: 2e-6,
            h2: 1e-6,
            h3: 3e-6,
        };
        LunarSolarPeriodics {
            solar: amp,
            lunar: amp,
            zmos: 1.0,
            zmol: 2.0,
        }
    }

    fn elements(inclp: f64, nodep: f64) -> PerturbedElements {
        PerturbedElements {
            ep: 0.1,
            inclp,
            nodep,
            argpp: 1.0,
            mp: 2.0,
        }
    }

    #[test]
    fn zero_amplitudes_change_nothing_above_lyddane_limit() {
        let quiet = LunarSolarPeriodics::default();
        let el = elements(0.9, 3.0);
        assert_eq!(dpper(&quiet, 100.0, OpsMode::Improved, el), el);
    }

    #[test]
    fn lyddane_branch_preserves_longitude_sum() {
        // With no periodics the node is recovered from its own sine and cosine.
        let quiet = LunarSolarPeriodics::default();
        let el = elements(0.1, 1.0);
        let out = dpper(&quiet, 0.0, OpsMode::Improved, el);
        assert_abs_diff_eq!(out.nodep, 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(out.argpp, 1.0, epsilon = 1e-12);
        assert_eq!(out.mp, 2.0);
    }

    #[test]
    fn afspc_keeps_the_node_positive() {
        let el = elements(0.1, -0.5);
        let afspc = dpper(&periodics(), 10.0, OpsMode::Afspc, el);
        let improved = dpper(&periodics(), 10.0, OpsMode::Improved, el);

        assert!(afspc.nodep >= 0.0);
        assert!(improved.nodep < 0.0);
        assert_abs_diff_eq!(afspc.nodep - improved.nodep, TWOPI, epsilon = 1e-9);
        assert_abs_diff_eq!(afspc.ep, improved.ep, epsilon = 1e-15);
    }

    #[test]
    fn periodics_move_elements_when_present() {
        let el = elements(0.9, 3.0);
        let out = dpper(&periodics(), 500.0, OpsMode::Improved, el);
        assert!(out.ep != el.ep);
        assert!(out.inclp != el.inclp);
        assert!((out.ep - el.ep).abs() < 1e-4);
    }
}
