//! NORAD SGP4/SDP4 propagation of mean orbital elements.
//!
//! Elements come from two-line element sets ([`parse_tle`]) or CelesTrak-style
//! OMM JSON ([`parse_omm`]). [`Satellite`] initializes the theory once and
//! then returns TEME position (km) and velocity (km/s) at any offset from
//! epoch, choosing the deep-space lunar-solar and resonance terms for orbits
//! with periods of 225 minutes or more.
//!
//! ```
//! use sgp4_sdp4::{Satellite, Sgp4Options};
//!
//! let mut iss = Satellite::from_tle(
//!     "1 25544U 98067A   19343.69339541  .00001764  00000-0  38792-4 0  9991",
//!     "2 25544  51.6439 211.2001 0007417  17.6667  85.6398 15.50103472202482",
//!     Sgp4Options::default(),
//! )
//! .unwrap();
//! let state = iss.propagate(90.0).unwrap();
//! assert_eq!(iss.error_code(), 0);
//! assert!(state.position.iter().any(|x| x.abs() > 1000.0));
//! ```

pub mod alpha5;
pub mod constants;
pub mod earth_gravity;
pub mod elements;
pub mod error;
pub mod functions;
pub mod omm;
pub mod options;
pub mod propagation;
pub mod tle;

pub use earth_gravity::{EarthGravity, GravityModel};
pub use elements::Elements;
pub use error::{ConfigError, OmmError, Sgp4Error, TleError};
pub use omm::{parse_omm, parse_omm_list, Omm};
pub use options::{OpsMode, Sgp4Options};
pub use propagation::{MeanElements, Method, Prediction, ResonanceKind, Satellite};
pub use tle::parse_tle;
