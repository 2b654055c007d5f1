//! Fixed numeric constants of the SGP4/SDP4 theory.
//!
//! Gravity-model dependent values (`xke`, `j2`, ...) live in
//! [`crate::earth_gravity`]; everything here is model independent.

use std::f64::consts::PI;

pub const DEG2RAD: f64 = PI / 180.0;
pub const TWOPI: f64 = 2.0 * PI;
pub const X2O3: f64 = 2.0 / 3.0;

pub const MINUTES_PER_DAY: f64 = 1440.0;
/// Revolutions/day per radian/minute (229.1831180523293).
pub const XPDOTP: f64 = MINUTES_PER_DAY / TWOPI;

/// Julian date of 1949 December 31 00:00 UT, the origin of SGP4 epochs.
pub const JD_1950: f64 = 2_433_281.5;

/// Orbits with a period at or above this many minutes use the deep-space branch.
pub const DEEP_SPACE_PERIOD_MIN: f64 = 225.0;

/// Guard used where `1 + cos(i)` would vanish for retrograde equatorial orbits.
pub const TEMP4: f64 = 1.5e-12;

// Solar and lunar perturbation constants.
pub const ZNS: f64 = 1.19459e-5;
pub const ZES: f64 = 0.01675;
pub const ZNL: f64 = 1.5835218e-4;
pub const ZEL: f64 = 0.05490;
pub const C1SS: f64 = 2.986_479_7e-6;
pub const C1L: f64 = 4.796_806_5e-7;
pub const ZSINIS: f64 = 0.397_854_16;
pub const ZCOSIS: f64 = 0.917_448_67;
pub const ZCOSGS: f64 = 0.194_590_5;
pub const ZSINGS: f64 = -0.980_884_58;

/// Inclinations closer than this to 0 or π suppress the node perturbation terms.
pub const INCLINATION_GUARD: f64 = 5.2359877e-2;

// Geopotential resonance constants.
pub const Q22: f64 = 1.7891679e-6;
pub const Q31: f64 = 2.1460748e-6;
pub const Q33: f64 = 2.2123015e-7;
pub const ROOT22: f64 = 1.7891679e-6;
pub const ROOT32: f64 = 3.7393792e-7;
pub const ROOT44: f64 = 7.3636953e-9;
pub const ROOT52: f64 = 1.1428639e-7;
pub const ROOT54: f64 = 2.1765803e-9;
/// Earth rotation rate in radians/minute.
#[allow(clippy::excessive_precision)]
pub const RPTIM: f64 = 4.37526908801129966e-3;

pub const FASX2: f64 = 0.13130908;
pub const FASX4: f64 = 2.8843198;
pub const FASX6: f64 = 0.37448087;
pub const G22: f64 = 5.7686396;
pub const G32: f64 = 0.95240898;
pub const G44: f64 = 1.8014998;
pub const G52: f64 = 1.0508330;
pub const G54: f64 = 4.4108898;

// Resonance integrator step sizes (minutes) and half the squared step.
pub const STEPP: f64 = 720.0;
pub const STEPN: f64 = -720.0;
pub const STEP2: f64 = 259_200.0;
