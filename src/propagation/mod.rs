//! SGP4/SDP4 initialization and propagation.
//!
//! [`Satellite::new`] runs the initializer once and decides between the
//! near-Earth theory and the deep-space one (period of 225 minutes or more).
//! [`Satellite::propagate`] may then be called any number of times, at any
//! time offsets, in any order.
//!
//! A satellite is not meant to be shared between threads that propagate it
//! concurrently: deep-space resonant orbits keep an integrator whose state is
//! advanced by every call. Clone the satellite per timeline instead.

mod dpper;
mod dscom;
mod dsinit;
mod dspace;
mod initl;
mod near_earth;
mod sgp4;

use chrono::{DateTime, Utc};
use log::{debug, warn};

use crate::constants::{DEEP_SPACE_PERIOD_MIN, MINUTES_PER_DAY, TWOPI, X2O3};
use crate::earth_gravity::EarthGravity;
use crate::elements::Elements;
use crate::error::{OmmError, Sgp4Error, TleError};
use crate::functions::{datetime_from_jday, jday_from_datetime};
use crate::omm::Omm;
use crate::options::{OpsMode, Sgp4Options};
use crate::tle::parse_tle;

use dscom::{dscom, LunarSolarPeriodics};
use dsinit::{dsinit, EpochState, MeanState, Resonance, SecularRates};
use dspace::IntegratorState;
use initl::{initl, Initl};
use near_earth::NearEarthTerms;

pub use dsinit::ResonanceKind;
pub use sgp4::{MeanElements, Prediction};

/// Which theory a satellite is propagated with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    NearEarth,
    DeepSpace,
}

impl Method {
    pub fn as_char(self) -> char {
        match self {
            Method::NearEarth => 'n',
            Method::DeepSpace => 'd',
        }
    }
}

#[derive(Debug, Clone)]
struct DeepSpace {
    periodics: LunarSolarPeriodics,
    rates: SecularRates,
    resonance: Option<Resonance>,
    epoch: EpochState,
}

/// Everything fixed at initialization.
#[derive(Debug, Clone)]
struct Model {
    elements: Elements,
    gravity: EarthGravity,
    opsmode: OpsMode,
    init: Initl,
    near: NearEarthTerms,
    deep: Option<DeepSpace>,
}

/// An initialized element set, ready to propagate.
#[derive(Debug, Clone)]
pub struct Satellite {
    model: Model,
    options: Sgp4Options,
    integrator: IntegratorState,
    status: Option<Sgp4Error>,
    a: f64,
    alta: f64,
    altp: f64,
}

impl Satellite {
    /// Initialize SGP4 from mean elements.
    ///
    /// This never fails: elements whose perigee lies below the Earth's
    /// surface give a satellite whose status is [`Sgp4Error::SubOrbital`] and
    /// which refuses to propagate.
    pub fn new(elements: &Elements, options: Sgp4Options) -> Self {
        let gravity = options.gravity.constants();
        let el = elements;
        let epoch = el.epoch_days_since_1950();

        let init = initl(&gravity, options.opsmode, epoch, el.ecco, el.inclo, el.no_kozai);
        let no = init.no_unkozai;
        let a = (no * gravity.tumin).powf(-X2O3);

        let period = TWOPI / no;
        let deep_space = period >= DEEP_SPACE_PERIOD_MIN;
        debug!(
            "satellite {}: period {:.2} min, {} theory",
            el.satnum,
            period,
            if deep_space { "deep-space" } else { "near-Earth" }
        );

        let near = NearEarthTerms::new(el, &init, &gravity, deep_space);

        let deep = deep_space.then(|| {
            let geometry = dscom(epoch, el.ecco, el.argpo, 0.0, el.inclo, el.nodeo, no);
            let epoch_state = EpochState {
                xke: gravity.xke,
                ecco: el.ecco,
                eccsq: init.eccsq,
                argpo: el.argpo,
                mo: el.mo,
                nodeo: el.nodeo,
                no,
                mdot: near.mdot,
                nodedot: near.nodedot,
                xpidot: near.xpidot,
                gsto: init.gsto,
            };
            let mean = MeanState {
                em: el.ecco,
                argpm: 0.0,
                inclm: el.inclo,
                mm: 0.0,
                nm: no,
                nodem: 0.0,
            };
            let out = dsinit(&geometry, &epoch_state, mean);
            DeepSpace {
                periodics: geometry.periodics,
                rates: out.rates,
                resonance: out.resonance,
                epoch: epoch_state,
            }
        });

        let integrator = deep
            .as_ref()
            .and_then(|d| d.resonance.as_ref())
            .map(|r| IntegratorState::seed(r, no))
            .unwrap_or_default();

        let rp = init.rp;
        let mut sat = Satellite {
            model: Model {
                elements: el.clone(),
                gravity,
                opsmode: options.opsmode,
                init,
                near,
                deep,
            },
            options,
            integrator,
            status: None,
            a,
            alta: a * (1.0 + el.ecco) - 1.0,
            altp: a * (1.0 - el.ecco) - 1.0,
        };

        if rp < 1.0 {
            let err = Sgp4Error::SubOrbital {
                perigee_km: (rp - 1.0) * gravity.radiusearthkm,
            };
            warn!("satellite {}: {}", el.satnum, err);
            sat.status = Some(err);
        } else {
            // Seeds `status` from the epoch state.
            let _ = sat.propagate(0.0);
        }
        sat
    }

    pub fn from_tle(line1: &str, line2: &str, options: Sgp4Options) -> Result<Self, TleError> {
        Ok(Satellite::new(&parse_tle(line1, line2)?, options))
    }

    pub fn from_omm(omm: &Omm, options: Sgp4Options) -> Result<Self, OmmError> {
        Ok(Satellite::new(&omm.to_elements()?, options))
    }

    /// Position and velocity `tsince` minutes from epoch (negative before).
    ///
    /// The status is reset by every call unless it holds an initialization
    /// error, in which case that error is returned again.
    pub fn propagate(&mut self, tsince: f64) -> Result<Prediction, Sgp4Error> {
        if let Some(fatal) = self.status.filter(Sgp4Error::is_fatal) {
            return Err(fatal);
        }

        let result = sgp4::sgp4(&self.model, &mut self.integrator, tsince);
        self.status = result.as_ref().err().copied();
        if let Err(err) = &result {
            warn!("satellite {} at {} min: {}", self.model.elements.satnum, tsince, err);
        }
        result
    }

    /// Propagate to a split Julian date (UTC).
    pub fn propagate_jd(&mut self, jd: f64, fr: f64) -> Result<Prediction, Sgp4Error> {
        self.propagate(self.minutes_since_epoch(jd, fr))
    }

    pub fn propagate_datetime(&mut self, t: &DateTime<Utc>) -> Result<Prediction, Sgp4Error> {
        let (jd, fr) = jday_from_datetime(t);
        self.propagate_jd(jd, fr)
    }

    /// Minutes from the element epoch to the split Julian date `(jd, fr)`.
    pub fn minutes_since_epoch(&self, jd: f64, fr: f64) -> f64 {
        let el = &self.model.elements;
        (jd - el.jdsatepoch) * MINUTES_PER_DAY + (fr - el.jdsatepoch_f) * MINUTES_PER_DAY
    }

    pub fn elements(&self) -> &Elements {
        &self.model.elements
    }

    pub fn satnum(&self) -> &str {
        &self.model.elements.satnum
    }

    pub fn options(&self) -> Sgp4Options {
        self.options
    }

    pub fn gravity(&self) -> &EarthGravity {
        &self.model.gravity
    }

    /// Error left by initialization or the most recent propagation.
    pub fn status(&self) -> Option<Sgp4Error> {
        self.status
    }

    /// Integer status code: 0 when the last call succeeded.
    pub fn error_code(&self) -> i32 {
        self.status.map_or(0, |e| e.code())
    }

    pub fn epoch_datetime(&self) -> Option<DateTime<Utc>> {
        let el = &self.model.elements;
        datetime_from_jday(el.jdsatepoch, el.jdsatepoch_f)
    }

    pub fn method(&self) -> Method {
        if self.model.deep.is_some() {
            Method::DeepSpace
        } else {
            Method::NearEarth
        }
    }

    pub fn resonance(&self) -> ResonanceKind {
        self.model
            .deep
            .as_ref()
            .and_then(|d| d.resonance.as_ref())
            .map_or(ResonanceKind::None, Resonance::kind)
    }

    /// Whether the simplified drag model is in use.
    pub fn isimp(&self) -> bool {
        self.model.near.isimp
    }

    /// Semi-major axis, Earth radii.
    pub fn a(&self) -> f64 {
        self.a
    }

    /// Apogee altitude, Earth radii.
    pub fn alta(&self) -> f64 {
        self.alta
    }

    /// Perigee altitude, Earth radii.
    pub fn altp(&self) -> f64 {
        self.altp
    }

    /// Greenwich sidereal time at epoch, radians.
    pub fn gsto(&self) -> f64 {
        self.model.init.gsto
    }

    /// Brouwer mean motion, rad/min.
    pub fn no_unkozai(&self) -> f64 {
        self.model.init.no_unkozai
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::XPDOTP;
    use crate::earth_gravity::GravityModel;
    use approx::assert_abs_diff_eq;

    const LEO1: &str = "1 88888U          80275.98708465  .00073094  13844-3  66816-4 0    87";
    const LEO2: &str = "2 88888  72.8435 115.9689 0086731  52.6988 110.5714 16.05824518  1058";
    const HEO1: &str = "1 11801U          80230.29629788  .01431103  00000-0  14311-1 0    13";
    const HEO2: &str = "2 11801  46.7916 230.4354 7318036  47.4722  10.4117  2.28537848    13";
    // Molniya, twelve-hour resonant.
    const MOL1: &str = "1 09880U 77021A   06176.56157475  .00000421  00000-0  10000-3 0  9814";
    const MOL2: &str = "2 09880  64.5968 349.3786 7069051 270.0229  16.3320  2.00813614112380";
    // Geosynchronous.
    const GEO1: &str = "1 28626U 05008A   06176.46683397 -.00000205  00000-0  10000-3 0  2190";
    const GEO2: &str = "2 28626   0.0019 286.9433 0000335  13.7918  55.6504  1.00271328  1199";

    fn sat(l1: &str, l2: &str) -> Satellite {
        Satellite::from_tle(l1, l2, Sgp4Options::default()).unwrap()
    }

    fn norm(v: [f64; 3]) -> f64 {
        (v[0] * v[0] + v[1] * v[1] + v[2] * v[2]).sqrt()
    }

    #[test]
    fn branch_and_resonance_are_decided_at_init() {
        let leo = sat(LEO1, LEO2);
        assert_eq!(leo.method(), Method::NearEarth);
        assert_eq!(leo.resonance(), ResonanceKind::None);
        // Perigee below 220 km.
        assert!(leo.isimp());

        let heo = sat(HEO1, HEO2);
        assert_eq!(heo.method(), Method::DeepSpace);
        assert_eq!(heo.method().as_char(), 'd');
        assert_eq!(heo.resonance(), ResonanceKind::None);
        assert!(heo.isimp());

        assert_eq!(sat(MOL1, MOL2).resonance(), ResonanceKind::HalfDay);
        assert_eq!(sat(GEO1, GEO2).resonance(), ResonanceKind::OneDay);
    }

    #[test]
    fn epoch_state_lies_between_perigee_and_apogee() {
        for (l1, l2) in [(LEO1, LEO2), (HEO1, HEO2), (MOL1, MOL2), (GEO1, GEO2)] {
            let mut s = sat(l1, l2);
            let re = s.gravity().radiusearthkm;
            let r = norm(s.propagate(0.0).unwrap().position);
            let perigee = (1.0 + s.altp()) * re;
            let apogee = (1.0 + s.alta()) * re;
            assert!(r > perigee - 50.0 && r < apogee + 50.0, "{} at {r} km", s.satnum());
            assert_eq!(s.error_code(), 0);
        }
    }

    #[test]
    fn epoch_mean_elements_are_the_input_elements() {
        let mut s = sat(LEO1, LEO2);
        let mean = s.propagate(0.0).unwrap().mean;
        let el = s.elements().clone();
        assert_abs_diff_eq!(mean.em, el.ecco, epsilon = 1e-12);
        assert_abs_diff_eq!(mean.im, el.inclo, epsilon = 1e-12);
        assert_abs_diff_eq!(mean.node, el.nodeo, epsilon = 1e-12);
        assert_abs_diff_eq!(mean.nm, s.no_unkozai(), epsilon = 1e-12);
    }

    #[test]
    fn near_earth_propagation_is_repeatable() {
        let mut s = sat(LEO1, LEO2);
        let a = s.propagate(720.0).unwrap();
        s.propagate(-100.0).unwrap();
        let b = s.propagate(720.0).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn resonant_propagation_does_not_depend_on_call_order() {
        for (l1, l2) in [(MOL1, MOL2), (GEO1, GEO2)] {
            let fresh = sat(l1, l2);

            let mut direct = fresh.clone();
            let target = direct.propagate(4000.0).unwrap();

            let mut walked = fresh.clone();
            for t in [100.0, 2000.0, 9000.0, -1500.0, -6000.0, 3900.0] {
                walked.propagate(t).unwrap();
            }
            let again = walked.propagate(4000.0).unwrap();

            for i in 0..3 {
                assert_abs_diff_eq!(target.position[i], again.position[i], epsilon = 1e-6);
                assert_abs_diff_eq!(target.velocity[i], again.velocity[i], epsilon = 1e-9);
            }
        }
    }

    #[test]
    fn julian_date_and_datetime_entry_points_agree() {
        let mut s = sat(LEO1, LEO2);
        let el = s.elements().clone();
        let by_minutes = s.propagate(360.0).unwrap();
        let by_jd = s.propagate_jd(el.jdsatepoch, el.jdsatepoch_f + 0.25).unwrap();
        for i in 0..3 {
            assert_abs_diff_eq!(by_minutes.position[i], by_jd.position[i], epsilon = 1e-6);
        }

        let when = s.epoch_datetime().unwrap() + chrono::Duration::minutes(90);
        let by_datetime = s.propagate_datetime(&when).unwrap();
        let by_minutes = s.propagate(90.0).unwrap();
        for i in 0..3 {
            assert_abs_diff_eq!(by_minutes.position[i], by_datetime.position[i], epsilon = 1e-2);
        }
    }

    fn sub_orbital() -> Elements {
        let mut el = parse_tle(LEO1, LEO2).unwrap();
        el.no_kozai = 17.5 / XPDOTP;
        el.ecco = 0.1;
        el
    }

    #[test]
    fn sub_orbital_elements_never_propagate() {
        let mut s = Satellite::new(&sub_orbital(), Sgp4Options::default());
        assert_eq!(s.error_code(), 5);
        assert!(s.altp() < 0.0);

        for t in [0.0, 10.0, -10.0] {
            assert!(matches!(s.propagate(t), Err(Sgp4Error::SubOrbital { .. })));
            assert_eq!(s.error_code(), 5);
        }
    }

    #[test]
    fn collapsing_mean_motion_is_reported_then_cleared() {
        let mut s = sat(GEO1, GEO2);
        s.propagate(1000.0).unwrap();
        assert_eq!(s.integrator.atime, 720.0);

        // Drive the integrated mean motion through zero.
        s.integrator.xni = -1.0e-3;
        let err = s.propagate(1200.0).unwrap_err();
        assert!(matches!(err, Sgp4Error::MeanMotion { n } if n <= 0.0));
        assert_eq!(s.error_code(), 2);
        assert_eq!(s.status(), Some(err));

        // Restarting from epoch recovers.
        s.propagate(0.0).unwrap();
        assert_eq!(s.error_code(), 0);
    }

    // Drag term saturated, decays within a day.
    const DECAY1: &str = "1 29141U 85108AA  06170.26783845  .99999999  00000-0  13519-0 0   729";
    const DECAY2: &str = "2 29141  82.4288 273.4882 0015848 277.2124  83.9133 15.93343074  6828";
    // Mean motion of 1e-5 rev/day.
    const SLOW1: &str = "1 33334U 78066F   06174.85818871  .00000620  00000-0  10000-3 0  6809";
    const SLOW2: &str = "2 33334  68.4714 236.1303 5602877 123.7484 302.5767  0.00001000 67521";

    #[test]
    fn decayed_orbit_returns_no_vector() {
        let mut s = sat(DECAY1, DECAY2);
        assert_eq!(s.error_code(), 0);
        s.propagate(420.0).unwrap();

        let err = s.propagate(440.0).unwrap_err();
        assert!(matches!(err, Sgp4Error::Decayed { radius } if radius < 1.0), "{err}");
        assert_eq!(s.error_code(), 6);

        s.propagate(0.0).unwrap();
        assert_eq!(s.error_code(), 0);
    }

    #[test]
    fn eccentricity_out_of_range_is_reported() {
        let mut s = sat(SLOW1, SLOW2);
        assert_eq!(s.method(), Method::DeepSpace);
        // Perturbed eccentricity already fails at epoch.
        assert_eq!(s.error_code(), 3);
        assert!(matches!(s.propagate(0.0), Err(Sgp4Error::PerturbedEccentricity { e }) if e < 0.0));

        // Not sticky: later calls report their own failure.
        let err = s.propagate(100.0).unwrap_err();
        assert!(matches!(err, Sgp4Error::MeanEccentricity { e } if e < -0.001), "{err}");
        assert_eq!(s.error_code(), 1);
    }

    #[test]
    fn heavy_drag_drives_semi_latus_rectum_negative() {
        let mut el = parse_tle(
            "1 00005U 58002B   00179.78495062  .00000023  00000-0  28098-4 0  4753",
            "2 00005  34.2682 348.7242 1859667 331.7664  19.3264 10.82419157413667",
        )
        .unwrap();
        el.bstar = 100.0;
        let mut s = Satellite::new(&el, Sgp4Options::default());
        assert_eq!(s.method(), Method::NearEarth);
        assert_eq!(s.error_code(), 0);

        let err = s.propagate(2540.0).unwrap_err();
        assert!(matches!(err, Sgp4Error::SemiLatusRectum { p } if p < 0.0), "{err}");
        assert_eq!(s.error_code(), 4);
    }

    #[test]
    fn options_reach_the_model() {
        let legacy = Satellite::from_tle(LEO1, LEO2, Sgp4Options::legacy()).unwrap();
        assert_eq!(legacy.options().gravity, GravityModel::Wgs72Old);
        assert_eq!(legacy.model.opsmode, OpsMode::Afspc);
        let improved = sat(LEO1, LEO2);
        assert!((legacy.gsto() - improved.gsto()).abs() < 1e-5);
        assert!(legacy.gsto() != improved.gsto());
    }
}
