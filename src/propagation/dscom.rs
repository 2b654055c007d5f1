//! Lunar and solar geometry at epoch for the deep-space branch.

use crate::constants::{C1L, C1SS, TWOPI, ZCOSGS, ZCOSIS, ZEL, ZES, ZSINGS, ZSINIS};

/// Coupling of one perturbing body with the orbit.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CouplingTerms {
    pub s1: f64,
    pub s2: f64,
    pub s3: f64,
    pub s4: f64,
    pub s5: f64,
    pub s6: f64,
    pub s7: f64,
    pub z1: f64,
    pub z2: f64,
    pub z3: f64,
    pub z11: f64,
    pub z12: f64,
    pub z13: f64,
    pub z21: f64,
    pub z22: f64,
    pub z23: f64,
    pub z31: f64,
    pub z32: f64,
    pub z33: f64,
}

/// Long-period periodic amplitudes of one body, in eccentricity (`e`),
/// inclination (`i`), mean longitude (`l`), perigee (`gh`) and node (`h`).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PeriodicAmplitudes {
    pub e2: f64,
    pub e3: f64,
    pub i2: f64,
    pub i3: f64,
    pub l2: f64,
    pub l3: f64,
    pub l4: f64,
    pub gh2: f64,
    pub gh3: f64,
    pub gh4: f64,
    pub h2: f64,
    pub h3: f64,
}

/// Periodic perturbations of one body at one instant.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Periodics {
    pub pe: f64,
    pub pinc: f64,
    pub pl: f64,
    pub pgh: f64,
    pub ph: f64,
}

impl std::ops::Add for Periodics {
    type Output = Periodics;

    fn add(self, o: Periodics) -> Periodics {
        Periodics {
            pe: self.pe + o.pe,
            pinc: self.pinc + o.pinc,
            pl: self.pl + o.pl,
            pgh: self.pgh + o.pgh,
            ph: self.ph + o.ph,
        }
    }
}

impl PeriodicAmplitudes {
    /// `eb` is the eccentricity of the body's apparent orbit.
    fn new(c: &CouplingTerms, emsq: f64, eb: f64) -> Self {
        PeriodicAmplitudes {
            e2: 2.0 * c.s1 * c.s6,
            e3: 2.0 * c.s1 * c.s7,
            i2: 2.0 * c.s2 * c.z12,
            i3: 2.0 * c.s2 * (c.z13 - c.z11),
            l2: -2.0 * c.s3 * c.z2,
            l3: -2.0 * c.s3 * (c.z3 - c.z1),
            l4: -2.0 * c.s3 * (-21.0 - 9.0 * emsq) * eb,
            gh2: 2.0 * c.s4 * c.z32,
            gh3: 2.0 * c.s4 * (c.z33 - c.z31),
            gh4: -18.0 * c.s4 * eb,
            h2: -2.0 * c.s2 * c.z22,
            h3: -2.0 * c.s2 * (c.z23 - c.z21),
        }
    }

    /// Evaluate at mean anomaly `zm` of the body.
    pub fn at(&self, zm: f64, eb: f64) -> Periodics {
        let zf = zm + 2.0 * eb * zm.sin();
        let sinzf = zf.sin();
        let f2 = 0.5 * sinzf * sinzf - 0.25;
        let f3 = -0.5 * sinzf * zf.cos();
        Periodics {
            pe: self.e2 * f2 + self.e3 * f3,
            pinc: self.i2 * f2 + self.i3 * f3,
            pl: self.l2 * f2 + self.l3 * f3 + self.l4 * sinzf,
            pgh: self.gh2 * f2 + self.gh3 * f3 + self.gh4 * sinzf,
            ph: self.h2 * f2 + self.h3 * f3,
        }
    }
}

/// The part of the geometry the periodic corrections need at every step.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct LunarSolarPeriodics {
    pub solar: PeriodicAmplitudes,
    pub lunar: PeriodicAmplitudes,
    /// Mean anomalies of the sun and moon at epoch.
    pub zmos: f64,
    pub zmol: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Dscom {
    pub solar: CouplingTerms,
    pub lunar: CouplingTerms,
    pub periodics: LunarSolarPeriodics,
    pub sinim: f64,
    pub cosim: f64,
    pub emsq: f64,
}

/// Orientation of a perturbing body's orbit relative to the satellite's node.
struct BodyGeometry {
    cosg: f64,
    sing: f64,
    cosi: f64,
    sini: f64,
    cosh: f64,
    sinh: f64,
    cc: f64,
}

/// `epoch` in days since 1949 December 31, `tc` in minutes from epoch.
pub fn dscom(epoch: f64, ep: f64, argpp: f64, tc: f64, inclp: f64, nodep: f64, np: f64) -> Dscom {
    let snodm = nodep.sin();
    let cnodm = nodep.cos();
    let sinomm = argpp.sin();
    let cosomm = argpp.cos();
    let sinim = inclp.sin();
    let cosim = inclp.cos();
    let emsq = ep * ep;
    let betasq = 1.0 - emsq;
    let rtemsq = betasq.sqrt();

    // Lunar orbit orientation, days from 1900 January 0.5.
    let day = epoch + 18_261.5 + tc / 1440.0;
    let xnodce = (4.523_602_0 - 9.242_202_9e-4 * day) % TWOPI;
    let stem = xnodce.sin();
    let ctem = xnodce.cos();
    let zcosil = 0.913_751_64 - 0.035_680_96 * ctem;
    let zsinil = (1.0 - zcosil * zcosil).sqrt();
    let zsinhl = 0.089_683_511 * stem / zsinil;
    let zcoshl = (1.0 - zsinhl * zsinhl).sqrt();
    let gam = 5.835_151_4 + 0.001_944_368_0 * day;
    let zx = 0.397_854_16 * stem / zsinil;
    let zy = zcoshl * ctem + 0.917_448_67 * zsinhl * stem;
    let zx = gam + zx.atan2(zy) - xnodce;

    let sun = BodyGeometry {
        cosg: ZCOSGS,
        sing: ZSINGS,
        cosi: ZCOSIS,
        sini: ZSINIS,
        cosh: cnodm,
        sinh: snodm,
        cc: C1SS,
    };
    let moon = BodyGeometry {
        cosg: zx.cos(),
        sing: zx.sin(),
        cosi: zcosil,
        sini: zsinil,
        cosh: zcoshl * cnodm + zsinhl * snodm,
        sinh: snodm * zcoshl - cnodm * zsinhl,
        cc: C1L,
    };

    let xnoi = 1.0 / np;
    let couple = |b: &BodyGeometry| -> CouplingTerms {
        let a1 = b.cosg * b.cosh + b.sing * b.cosi * b.sinh;
        let a3 = -b.sing * b.cosh + b.cosg * b.cosi * b.sinh;
        let a7 = -b.cosg * b.sinh + b.sing * b.cosi * b.cosh;
        let a8 = b.sing * b.sini;
        let a9 = b.sing * b.sinh + b.cosg * b.cosi * b.cosh;
        let a10 = b.cosg * b.sini;
        let a2 = cosim * a7 + sinim * a8;
        let a4 = cosim * a9 + sinim * a10;
        let a5 = -sinim * a7 + cosim * a8;
        let a6 = -sinim * a9 + cosim * a10;

        let x1 = a1 * cosomm + a2 * sinomm;
        let x2 = a3 * cosomm + a4 * sinomm;
        let x3 = -a1 * sinomm + a2 * cosomm;
        let x4 = -a3 * sinomm + a4 * cosomm;
        let x5 = a5 * sinomm;
        let x6 = a6 * sinomm;
        let x7 = a5 * cosomm;
        let x8 = a6 * cosomm;

        let z31 = 12.0 * x1 * x1 - 3.0 * x3 * x3;
        let z32 = 24.0 * x1 * x2 - 6.0 * x3 * x4;
        let z33 = 12.0 * x2 * x2 - 3.0 * x4 * x4;
        let z1 = 3.0 * (a1 * a1 + a2 * a2) + z31 * emsq;
        let z2 = 6.0 * (a1 * a3 + a2 * a4) + z32 * emsq;
        let z3 = 3.0 * (a3 * a3 + a4 * a4) + z33 * emsq;
        let s3 = b.cc * xnoi;
        let s4 = s3 * rtemsq;

        CouplingTerms {
            s1: -15.0 * ep * s4,
            s2: -0.5 * s3 / rtemsq,
            s3,
            s4,
            s5: x1 * x3 + x2 * x4,
            s6: x2 * x3 + x1 * x4,
            s7: x2 * x4 - x1 * x3,
            z1: z1 + z1 + betasq * z31,
            z2: z2 + z2 + betasq * z32,
            z3: z3 + z3 + betasq * z33,
            z11: -6.0 * a1 * a5 + emsq * (-24.0 * x1 * x7 - 6.0 * x3 * x5),
            z12: -6.0 * (a1 * a6 + a3 * a5)
                + emsq * (-24.0 * (x2 * x7 + x1 * x8) - 6.0 * (x3 * x6 + x4 * x5)),
            z13: -6.0 * a3 * a6 + emsq * (-24.0 * x2 * x8 - 6.0 * x4 * x6),
            z21: 6.0 * a2 * a5 + emsq * (24.0 * x1 * x5 - 6.0 * x3 * x7),
            z22: 6.0 * (a4 * a5 + a2 * a6)
                + emsq * (24.0 * (x2 * x5 + x1 * x6) - 6.0 * (x4 * x7 + x3 * x8)),
            z23: 6.0 * a4 * a6 + emsq * (24.0 * x2 * x6 - 6.0 * x4 * x8),
            z31,
            z32,
            z33,
        }
    };

    let solar = couple(&sun);
    let lunar = couple(&moon);

    Dscom {
        periodics: LunarSolarPeriodics {
            solar: PeriodicAmplitudes::new(&solar, emsq, ZES),
            lunar: PeriodicAmplitudes::new(&lunar, emsq, ZEL),
            zmos: (6.256_583_7 + 0.017_201_977 * day) % TWOPI,
            zmol: (4.719_967_2 + 0.229_971_50 * day - gam) % TWOPI,
        },
        solar,
        lunar,
        sinim,
        cosim,
        emsq,
    }
}
