//! Deep-space secular rates and geopotential resonance terms.

use std::f64::consts::PI;

use log::debug;
use serde::{Deserialize, Serialize};

use super::dscom::{CouplingTerms, Dscom};
use crate::constants::{
    INCLINATION_GUARD, Q22, Q31, Q33, ROOT22, ROOT32, ROOT44, ROOT52, ROOT54, RPTIM, TWOPI, X2O3,
    ZNL, ZNS,
};

/// Commensurability of the mean motion with the Earth's rotation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ResonanceKind {
    #[default]
    None,
    /// Geosynchronous, one revolution per day.
    OneDay,
    /// Eccentric twelve-hour orbits such as Molniya.
    HalfDay,
}

impl ResonanceKind {
    /// `nm` in rad/min. The band edges are not symmetric: the one-day band is
    /// open on both ends, the half-day band is closed.
    pub fn classify(nm: f64, em: f64) -> Self {
        if (8.26e-3..=9.24e-3).contains(&nm) && em >= 0.5 {
            ResonanceKind::HalfDay
        } else if nm > 0.0034906585 && nm < 0.0052359877 {
            ResonanceKind::OneDay
        } else {
            ResonanceKind::None
        }
    }

    pub fn code(self) -> i32 {
        match self {
            ResonanceKind::None => 0,
            ResonanceKind::OneDay => 1,
            ResonanceKind::HalfDay => 2,
        }
    }
}

/// Lunar-solar secular rates of the mean elements, per minute.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SecularRates {
    pub dedt: f64,
    pub didt: f64,
    pub dmdt: f64,
    pub dnodt: f64,
    pub domdt: f64,
}

impl SecularRates {
    pub fn new(
        solar: &CouplingTerms,
        lunar: &CouplingTerms,
        emsq: f64,
        sinim: f64,
        cosim: f64,
        inclm: f64,
    ) -> Self {
        let near_equatorial = inclm < INCLINATION_GUARD || inclm > PI - INCLINATION_GUARD;

        let ses = solar.s1 * ZNS * solar.s5;
        let sis = solar.s2 * ZNS * (solar.z11 + solar.z13);
        let sls = -ZNS * solar.s3 * (solar.z1 + solar.z3 - 14.0 - 6.0 * emsq);
        let sghs = solar.s4 * ZNS * (solar.z31 + solar.z33 - 6.0);
        let mut shs = if near_equatorial {
            0.0
        } else {
            -ZNS * solar.s2 * (solar.z21 + solar.z23)
        };
        if sinim != 0.0 {
            shs /= sinim;
        }
        let sgs = sghs - cosim * shs;

        let sghl = lunar.s4 * ZNL * (lunar.z31 + lunar.z33 - 6.0);
        let shll = if near_equatorial {
            0.0
        } else {
            -ZNL * lunar.s2 * (lunar.z21 + lunar.z23)
        };

        let mut domdt = sgs + sghl;
        let mut dnodt = shs;
        if sinim != 0.0 {
            domdt -= cosim / sinim * shll;
            dnodt += shll / sinim;
        }

        SecularRates {
            dedt: ses + lunar.s1 * ZNL * lunar.s5,
            didt: sis + lunar.s2 * ZNL * (lunar.z11 + lunar.z13),
            dmdt: sls - ZNL * lunar.s3 * (lunar.z1 + lunar.z3 - 14.0 - 6.0 * emsq),
            dnodt,
            domdt,
        }
    }
}

/// Coefficients of the synchronous resonance series.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OneDayTerms {
    pub del1: f64,
    pub del2: f64,
    pub del3: f64,
}

/// Coefficients of the twelve-hour resonance series.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HalfDayTerms {
    pub d2201: f64,
    pub d2211: f64,
    pub d3210: f64,
    pub d3222: f64,
    pub d4410: f64,
    pub d4422: f64,
    pub d5220: f64,
    pub d5232: f64,
    pub d5421: f64,
    pub d5433: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ResonanceTerms {
    OneDay(OneDayTerms),
    HalfDay(HalfDayTerms),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Resonance {
    pub terms: ResonanceTerms,
    /// Rate of the resonance angle beyond the mean motion.
    pub xfact: f64,
    /// Resonance angle at epoch.
    pub xlamo: f64,
}

impl Resonance {
    pub fn kind(&self) -> ResonanceKind {
        match self.terms {
            ResonanceTerms::OneDay(_) => ResonanceKind::OneDay,
            ResonanceTerms::HalfDay(_) => ResonanceKind::HalfDay,
        }
    }
}

/// Singly averaged elements carried through the deep-space stages.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeanState {
    pub em: f64,
    pub argpm: f64,
    pub inclm: f64,
    pub mm: f64,
    pub nm: f64,
    pub nodem: f64,
}

impl MeanState {
    /// Linear secular update by `t` minutes.
    pub fn advance(self, rates: &SecularRates, t: f64) -> Self {
        MeanState {
            em: self.em + rates.dedt * t,
            inclm: self.inclm + rates.didt * t,
            argpm: self.argpm + rates.domdt * t,
            nodem: self.nodem + rates.dnodt * t,
            mm: self.mm + rates.dmdt * t,
            nm: self.nm,
        }
    }
}

/// Epoch values of the quantities the resonance terms depend on.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EpochState {
    pub xke: f64,
    pub ecco: f64,
    pub eccsq: f64,
    pub argpo: f64,
    pub mo: f64,
    pub nodeo: f64,
    pub no: f64,
    pub mdot: f64,
    pub nodedot: f64,
    pub xpidot: f64,
    pub gsto: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Dsinit {
    pub rates: SecularRates,
    pub resonance: Option<Resonance>,
}

/// Cubic fit `c0 + c1 e + c2 e^2 + c3 e^3` of a resonance function.
type Fit = [f64; 4];

fn eval(f: &Fit, em: f64, emsq: f64, eoc: f64) -> f64 {
    f[0] + f[1] * em + f[2] * emsq + f[3] * eoc
}

/// Eccentricity functions of the 2-2, 3-2, 4-4 and 5-2 tesseral terms.
struct TesseralFits {
    g211: Fit,
    g310: Fit,
    g322: Fit,
    g410: Fit,
    g422: Fit,
    g520: Fit,
}

/// Selects the fits for `e <= 0.65`, `0.65 < e <= 0.715` and `e > 0.715`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EccentricityBand {
    Low,
    Mid,
    High,
}

impl EccentricityBand {
    fn of(em: f64) -> Self {
        if em <= 0.65 {
            EccentricityBand::Low
        } else if em <= 0.715 {
            EccentricityBand::Mid
        } else {
            EccentricityBand::High
        }
    }

    fn fits(self) -> &'static TesseralFits {
        match self {
            EccentricityBand::Low => &FITS_LOW,
            EccentricityBand::Mid => &FITS_MID,
            EccentricityBand::High => &FITS_HIGH,
        }
    }
}

const FITS_LOW: TesseralFits = TesseralFits {
    g211: [3.616, -13.2470, 16.2900, 0.0],
    g310: [-19.302, 117.3900, -228.4190, 156.5910],
    g322: [-18.9068, 109.7927, -214.6334, 146.5816],
    g410: [-41.122, 242.6940, -471.0940, 313.9530],
    g422: [-146.407, 841.8800, -1629.014, 1083.4350],
    g520: [-532.114, 3017.977, -5740.032, 3708.2760],
};

const FITS_MID: TesseralFits = TesseralFits {
    g211: [-72.099, 331.819, -508.738, 266.724],
    g310: [-346.844, 1582.851, -2415.925, 1246.113],
    g322: [-342.585, 1554.908, -2366.899, 1215.972],
    g410: [-1052.797, 4758.686, -7193.992, 3651.957],
    g422: [-3581.690, 16178.110, -24462.770, 12422.520],
    g520: [1464.74, -4664.75, 3763.64, 0.0],
};

const FITS_HIGH: TesseralFits = TesseralFits {
    g520: [-5149.66, 29936.92, -54087.36, 31324.56],
    ..FITS_MID
};

/// Eccentricity functions of the 5-3, 5-2-1 and 5-3-2 terms, split at `e = 0.7`.
struct SectoralFits {
    g533: Fit,
    g521: Fit,
    g532: Fit,
}

const SECTORAL_LOW: SectoralFits = SectoralFits {
    g533: [-919.22770, 4988.61, -9064.77, 5542.21],
    g521: [-822.71072, 4568.6173, -8491.4146, 5337.524],
    g532: [-853.66600, 4690.25, -8624.77, 5341.4],
};

const SECTORAL_HIGH: SectoralFits = SectoralFits {
    g533: [-37995.78, 161616.52, -229838.2, 109377.94],
    g521: [-51752.104, 218913.95, -309468.16, 146349.42],
    g532: [-40023.88, 170470.89, -242699.48, 115605.82],
};

fn sectoral_fits(em: f64) -> &'static SectoralFits {
    if em < 0.7 {
        &SECTORAL_LOW
    } else {
        &SECTORAL_HIGH
    }
}

fn half_day_terms(ds: &Dscom, epoch: &EpochState, nm: f64, aonv: f64) -> HalfDayTerms {
    let (sinim, cosim) = (ds.sinim, ds.cosim);
    // The eccentricity functions are fitted on the epoch eccentricity.
    let em = epoch.ecco;
    let emsq = epoch.eccsq;
    let eoc = em * emsq;

    let tesseral = EccentricityBand::of(em).fits();
    let sectoral = sectoral_fits(em);
    let g201 = -0.306 - (em - 0.64) * 0.440;
    let g211 = eval(&tesseral.g211, em, emsq, eoc);
    let g310 = eval(&tesseral.g310, em, emsq, eoc);
    let g322 = eval(&tesseral.g322, em, emsq, eoc);
    let g410 = eval(&tesseral.g410, em, emsq, eoc);
    let g422 = eval(&tesseral.g422, em, emsq, eoc);
    let g520 = eval(&tesseral.g520, em, emsq, eoc);
    let g533 = eval(&sectoral.g533, em, emsq, eoc);
    let g521 = eval(&sectoral.g521, em, emsq, eoc);
    let g532 = eval(&sectoral.g532, em, emsq, eoc);

    let cosisq = cosim * cosim;
    let sini2 = sinim * sinim;
    let f220 = 0.75 * (1.0 + 2.0 * cosim + cosisq);
    let f221 = 1.5 * sini2;
    let f321 = 1.875 * sinim * (1.0 - 2.0 * cosim - 3.0 * cosisq);
    let f322 = -1.875 * sinim * (1.0 + 2.0 * cosim - 3.0 * cosisq);
    let f441 = 35.0 * sini2 * f220;
    let f442 = 39.3750 * sini2 * sini2;
    let f522 = 9.84375
        * sinim
        * (sini2 * (1.0 - 2.0 * cosim - 5.0 * cosisq) + 0.33333333 * (-2.0 + 4.0 * cosim + 6.0 * cosisq));
    let f523 = sinim
        * (4.92187512 * sini2 * (-2.0 - 4.0 * cosim + 10.0 * cosisq)
            + 6.56250012 * (1.0 + 2.0 * cosim - 3.0 * cosisq));
    let f542 = 29.53125 * sinim * (2.0 - 8.0 * cosim + cosisq * (-12.0 + 8.0 * cosim + 10.0 * cosisq));
    let f543 = 29.53125 * sinim * (-2.0 - 8.0 * cosim + cosisq * (12.0 + 8.0 * cosim - 10.0 * cosisq));

    let xno2 = nm * nm;
    let ainv2 = aonv * aonv;
    let mut temp1 = 3.0 * xno2 * ainv2;
    let mut temp = temp1 * ROOT22;
    let d2201 = temp * f220 * g201;
    let d2211 = temp * f221 * g211;
    temp1 *= aonv;
    temp = temp1 * ROOT32;
    let d3210 = temp * f321 * g310;
    let d3222 = temp * f322 * g322;
    temp1 *= aonv;
    temp = 2.0 * temp1 * ROOT44;
    let d4410 = temp * f441 * g410;
    let d4422 = temp * f442 * g422;
    temp1 *= aonv;
    temp = temp1 * ROOT52;
    let d5220 = temp * f522 * g520;
    let d5232 = temp * f523 * g532;
    temp = 2.0 * temp1 * ROOT54;

    HalfDayTerms {
        d2201,
        d2211,
        d3210,
        d3222,
        d4410,
        d4422,
        d5220,
        d5232,
        d5421: temp * f542 * g521,
        d5433: temp * f543 * g533,
    }
}

fn one_day_terms(ds: &Dscom, nm: f64, aonv: f64) -> OneDayTerms {
    let (sinim, cosim, emsq) = (ds.sinim, ds.cosim, ds.emsq);
    let g200 = 1.0 + emsq * (-2.5 + 0.8125 * emsq);
    let g310 = 1.0 + 2.0 * emsq;
    let g300 = 1.0 + emsq * (-6.0 + 6.60937 * emsq);
    let f220 = 0.75 * (1.0 + cosim) * (1.0 + cosim);
    let f311 = 0.9375 * sinim * sinim * (1.0 + 3.0 * cosim) - 0.75 * (1.0 + cosim);
    let f330 = 1.0 + cosim;
    let f330 = 1.875 * f330 * f330 * f330;

    let del1 = 3.0 * nm * nm * aonv * aonv;
    OneDayTerms {
        del2: 2.0 * del1 * f220 * g200 * Q22,
        del3: 3.0 * del1 * f330 * g300 * Q33 * aonv,
        del1: del1 * f311 * g310 * Q31 * aonv,
    }
}

/// Secular rates and resonance terms from the epoch mean elements. Only
/// initialization calls this, so sidereal time is taken at epoch.
pub fn dsinit(ds: &Dscom, epoch: &EpochState, mean: MeanState) -> Dsinit {
    let kind = ResonanceKind::classify(mean.nm, mean.em);
    let rates = SecularRates::new(&ds.solar, &ds.lunar, ds.emsq, ds.sinim, ds.cosim, mean.inclm);
    debug!("resonance {:?} for mean motion {} rad/min", kind, mean.nm);

    let theta = epoch.gsto % TWOPI;
    let aonv = (mean.nm / epoch.xke).powf(X2O3);

    let resonance = match kind {
        ResonanceKind::None => None,
        ResonanceKind::HalfDay => Some(Resonance {
            terms: ResonanceTerms::HalfDay(half_day_terms(ds, epoch, mean.nm, aonv)),
            xfact: epoch.mdot + rates.dmdt + 2.0 * (epoch.nodedot + rates.dnodt - RPTIM) - epoch.no,
            xlamo: (epoch.mo + epoch.nodeo + epoch.nodeo - theta - theta) % TWOPI,
        }),
        ResonanceKind::OneDay => Some(Resonance {
            terms: ResonanceTerms::OneDay(one_day_terms(ds, mean.nm, aonv)),
            xfact: epoch.mdot + epoch.xpidot - RPTIM + rates.dmdt + rates.domdt + rates.dnodt
                - epoch.no,
            xlamo: (epoch.mo + epoch.nodeo + epoch.argpo - theta) % TWOPI,
        }),
    };

    Dsinit { rates, resonance }
}
