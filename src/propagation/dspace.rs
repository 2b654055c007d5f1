//! Numerical integration of the resonance angle and mean motion.
//!
//! The integrator walks from its last reached time towards the requested one
//! in fixed 720-minute Euler-Maclaurin steps and finishes with a Taylor step.
//! Its state is the only part of a [`super::Satellite`] that changes after
//! initialization.

use log::trace;

use super::dsinit::{EpochState, MeanState, Resonance, ResonanceTerms, SecularRates};
use crate::constants::{
    FASX2, FASX4, FASX6, G22, G32, G44, G52, G54, RPTIM, STEP2, STEPN, STEPP, TWOPI,
};

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct IntegratorState {
    /// Minutes from epoch the state was last advanced to.
    pub atime: f64,
    /// Resonance angle.
    pub xli: f64,
    /// Mean motion, rad/min.
    pub xni: f64,
}

impl IntegratorState {
    pub fn seed(resonance: &Resonance, no: f64) -> Self {
        IntegratorState {
            atime: 0.0,
            xli: resonance.xlamo,
            xni: no,
        }
    }
}

/// Rates of the resonance angle and mean motion: `(xldot, xndt, xnddt)`.
fn derivatives(resonance: &Resonance, state: &IntegratorState, argpo: f64, argpdot: f64) -> (f64, f64, f64) {
    let xli = state.xli;
    let xldot = state.xni + resonance.xfact;

    let (xndt, xnddt) = match &resonance.terms {
        ResonanceTerms::OneDay(d) => {
            let xndt = d.del1 * (xli - FASX2).sin()
                + d.del2 * (2.0 * (xli - FASX4)).sin()
                + d.del3 * (3.0 * (xli - FASX6)).sin();
            let xnddt = d.del1 * (xli - FASX2).cos()
                + 2.0 * d.del2 * (2.0 * (xli - FASX4)).cos()
                + 3.0 * d.del3 * (3.0 * (xli - FASX6)).cos();
            (xndt, xnddt)
        }
        ResonanceTerms::HalfDay(d) => {
            let xomi = argpo + argpdot * state.atime;
            let x2omi = xomi + xomi;
            let x2li = xli + xli;
            let xndt = d.d2201 * (x2omi + xli - G22).sin()
                + d.d2211 * (xli - G22).sin()
                + d.d3210 * (xomi + xli - G32).sin()
                + d.d3222 * (-xomi + xli - G32).sin()
                + d.d4410 * (x2omi + x2li - G44).sin()
                + d.d4422 * (x2li - G44).sin()
                + d.d5220 * (xomi + xli - G52).sin()
                + d.d5232 * (-xomi + xli - G52).sin()
                + d.d5421 * (xomi + x2li - G54).sin()
                + d.d5433 * (-xomi + x2li - G54).sin();
            let xnddt = d.d2201 * (x2omi + xli - G22).cos()
                + d.d2211 * (xli - G22).cos()
                + d.d3210 * (xomi + xli - G32).cos()
                + d.d3222 * (-xomi + xli - G32).cos()
                + d.d5220 * (xomi + xli - G52).cos()
                + d.d5232 * (-xomi + xli - G52).cos()
                + 2.0
                    * (d.d4410 * (x2omi + x2li - G44).cos()
                        + d.d4422 * (x2li - G44).cos()
                        + d.d5421 * (xomi + x2li - G54).cos()
                        + d.d5433 * (-xomi + x2li - G54).cos());
            (xndt, xnddt)
        }
    };

    (xldot, xndt, xnddt * xldot)
}

/// Apply the lunar-solar secular rates and, for resonant orbits, advance the
/// integrator to `t`.
pub fn dspace(
    resonance: Option<&Resonance>,
    rates: &SecularRates,
    state: &mut IntegratorState,
    epoch: &EpochState,
    argpdot: f64,
    mean: MeanState,
    t: f64,
) -> MeanState {
    let mut mean = mean.advance(rates, t);
    let Some(resonance) = resonance else {
        return mean;
    };

    let theta = (epoch.gsto + t * RPTIM) % TWOPI;

    // Restart from epoch when the state lies on the other side of it or
    // beyond the requested time.
    if state.atime == 0.0 || t * state.atime <= 0.0 || t.abs() < state.atime.abs() {
        if state.atime != 0.0 {
            trace!("resonance integrator restarts from epoch, t = {t}, atime = {}", state.atime);
        }
        *state = IntegratorState::seed(resonance, epoch.no);
    }

    let delt = if t > 0.0 { STEPP } else { STEPN };
    let mut steps = 0u32;
    let (xldot, xndt, xnddt) = loop {
        let (xldot, xndt, xnddt) = derivatives(resonance, state, epoch.argpo, argpdot);
        if (t - state.atime).abs() < STEPP {
            break (xldot, xndt, xnddt);
        }
        state.xli += xldot * delt + xndt * STEP2;
        state.xni += xndt * delt + xnddt * STEP2;
        state.atime += delt;
        steps += 1;
    };
    if steps > 0 {
        trace!("resonance integrator took {steps} steps to atime = {}", state.atime);
    }

    let ft = t - state.atime;
    mean.nm = state.xni + xndt * ft + xnddt * ft * ft * 0.5;
    let xl = state.xli + xldot * ft + xndt * ft * ft * 0.5;
    mean.mm = match resonance.terms {
        ResonanceTerms::OneDay(_) => xl - mean.nodem - mean.argpm + theta,
        ResonanceTerms::HalfDay(_) => xl - 2.0 * mean.nodem + 2.0 * theta,
    };

    mean
}
