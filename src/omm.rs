//! Orbit Mean-Elements Messages in the JSON layout served by CelesTrak and
//! Space-Track.
//!
//! Space-Track quotes every value, CelesTrak writes plain numbers; both are
//! accepted.

use chrono::{Datelike, NaiveDateTime, TimeZone, Timelike, Utc};
use serde::{Deserialize, Serialize};

use crate::alpha5::from_alpha5;
use crate::constants::{DEG2RAD, MINUTES_PER_DAY, XPDOTP};
use crate::elements::Elements;
use crate::error::OmmError;
use crate::functions::jday_from_datetime;

const EPOCH_FMT: &str = "%Y-%m-%dT%H:%M:%S%.f";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub struct Omm {
    #[serde(default)]
    pub object_name: Option<String>,
    #[serde(default)]
    pub object_id: Option<String>,
    /// ISO-8601 UTC, without zone designator.
    pub epoch: String,
    /// Revolutions per day.
    #[serde(deserialize_with = "lenient::f64")]
    pub mean_motion: f64,
    #[serde(deserialize_with = "lenient::f64")]
    pub eccentricity: f64,
    /// Degrees.
    #[serde(deserialize_with = "lenient::f64")]
    pub inclination: f64,
    #[serde(deserialize_with = "lenient::f64")]
    pub ra_of_asc_node: f64,
    #[serde(deserialize_with = "lenient::f64")]
    pub arg_of_pericenter: f64,
    #[serde(deserialize_with = "lenient::f64")]
    pub mean_anomaly: f64,
    #[serde(deserialize_with = "lenient::catalog")]
    pub norad_cat_id: String,
    #[serde(default)]
    pub classification_type: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_u32")]
    pub element_set_no: Option<u32>,
    #[serde(default, deserialize_with = "lenient::opt_u32")]
    pub rev_at_epoch: Option<u32>,
    #[serde(deserialize_with = "lenient::f64")]
    pub bstar: f64,
    /// Revolutions per day squared, already halved as in the TLE.
    #[serde(deserialize_with = "lenient::f64")]
    pub mean_motion_dot: f64,
    #[serde(deserialize_with = "lenient::f64")]
    pub mean_motion_ddot: f64,
}

impl Omm {
    /// Convert to the SGP4 input elements. The epoch keeps its full precision.
    pub fn to_elements(&self) -> Result<Elements, OmmError> {
        from_alpha5(&self.norad_cat_id)?;

        let raw = self.epoch.trim().trim_end_matches('Z');
        let naive = NaiveDateTime::parse_from_str(raw, EPOCH_FMT).map_err(|source| OmmError::Epoch {
            value: self.epoch.clone(),
            source,
        })?;
        let epoch = Utc.from_utc_datetime(&naive);
        let (jdsatepoch, jdsatepoch_f) = jday_from_datetime(&epoch);

        let seconds_of_day = f64::from(epoch.num_seconds_from_midnight())
            + f64::from(epoch.nanosecond()) * 1.0e-9;
        let epochdays = f64::from(epoch.ordinal()) + seconds_of_day / 86400.0;

        Ok(Elements {
            satnum: self.norad_cat_id.clone(),
            classification: self
                .classification_type
                .as_deref()
                .and_then(|c| c.chars().next())
                .unwrap_or('U'),
            intldesg: self.intldesg(),
            epochyr: epoch.year(),
            epochdays,
            jdsatepoch,
            jdsatepoch_f,
            bstar: self.bstar,
            ndot: self.mean_motion_dot / (XPDOTP * MINUTES_PER_DAY),
            nddot: self.mean_motion_ddot / (XPDOTP * MINUTES_PER_DAY * MINUTES_PER_DAY),
            ecco: self.eccentricity,
            argpo: self.arg_of_pericenter * DEG2RAD,
            inclo: self.inclination * DEG2RAD,
            mo: self.mean_anomaly * DEG2RAD,
            no_kozai: self.mean_motion / XPDOTP,
            nodeo: self.ra_of_asc_node * DEG2RAD,
            elnum: self.element_set_no.unwrap_or(0),
            revnum: self.rev_at_epoch.unwrap_or(0),
        })
    }

    /// TLE-style designator ("1998-067A" becomes "98067A").
    fn intldesg(&self) -> String {
        match self.object_id.as_deref() {
            Some(id) => match (id.get(2..4), id.get(4..5), id.get(5..)) {
                (Some(year), Some("-"), Some(rest)) if !rest.is_empty() => format!("{year}{rest}"),
                _ => id.to_string(),
            },
            None => String::new(),
        }
    }
}

pub fn parse_omm(json: &str) -> Result<Omm, OmmError> {
    Ok(serde_json::from_str(json)?)
}

/// Parse a JSON array of records, as returned by catalog queries.
pub fn parse_omm_list(json: &str) -> Result<Vec<Omm>, OmmError> {
    Ok(serde_json::from_str(json)?)
}

mod lenient {
    use serde::de::{Deserializer, Error};
    use serde::Deserialize;

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Value {
        Integer(u64),
        Float(f64),
        Text(String),
    }

    pub fn f64<'de, D: Deserializer<'de>>(d: D) -> Result<f64, D::Error> {
        match Value::deserialize(d)? {
            Value::Integer(n) => Ok(n as f64),
            Value::Float(x) => Ok(x),
            Value::Text(s) => s.trim().parse().map_err(D::Error::custom),
        }
    }

    pub fn opt_u32<'de, D: Deserializer<'de>>(d: D) -> Result<Option<u32>, D::Error> {
        match Option::<Value>::deserialize(d)? {
            None => Ok(None),
            Some(Value::Integer(n)) => u32::try_from(n).map(Some).map_err(D::Error::custom),
            Some(Value::Float(x)) => Err(D::Error::custom(format!("expected an integer, got {x}"))),
            Some(Value::Text(s)) if s.trim().is_empty() => Ok(None),
            Some(Value::Text(s)) => s.trim().parse().map(Some).map_err(D::Error::custom),
        }
    }

    pub fn catalog<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
        match Value::deserialize(d)? {
            Value::Integer(n) => Ok(n.to_string()),
            Value::Float(x) => Err(D::Error::custom(format!("expected a catalog number, got {x}"))),
            Value::Text(s) => Ok(s.trim().to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    const ISS_CELESTRAK: &str = r#"{
        "OBJECT_NAME": "ISS (ZARYA)",
        "OBJECT_ID": "1998-067A",
        "EPOCH": "2019-12-09T16:38:29.363424",
        "MEAN_MOTION": 15.50103472,
        "ECCENTRICITY": 0.0007417,
        "INCLINATION": 51.6439,
        "RA_OF_ASC_NODE": 211.2001,
        "ARG_OF_PERICENTER": 17.6667,
        "MEAN_ANOMALY": 85.6398,
        "EPHEMERIS_TYPE": 0,
        "CLASSIFICATION_TYPE": "U",
        "NORAD_CAT_ID": 25544,
        "ELEMENT_SET_NO": 999,
        "REV_AT_EPOCH": 20248,
        "BSTAR": 3.8792e-5,
        "MEAN_MOTION_DOT": 1.764e-5,
        "MEAN_MOTION_DDOT": 0
    }"#;

    #[test]
    fn celestrak_numbers_parse() {
        let omm = parse_omm(ISS_CELESTRAK).unwrap();
        assert_eq!(omm.object_name.as_deref(), Some("ISS (ZARYA)"));
        assert_eq!(omm.norad_cat_id, "25544");
        assert_eq!(omm.element_set_no, Some(999));

        let el = omm.to_elements().unwrap();
        assert_eq!(el.satnum, "25544");
        assert_eq!(el.intldesg, "98067A");
        assert_eq!(el.epochyr, 2019);
        assert_eq!(el.revnum, 20248);
        assert_abs_diff_eq!(el.epochdays, 343.69339541, epsilon = 1e-9);
        assert_abs_diff_eq!(el.jdsatepoch + el.jdsatepoch_f, 2_458_827.19339541, epsilon = 1e-8);
        assert_abs_diff_eq!(el.inclo, 51.6439 * DEG2RAD, epsilon = 1e-15);
        assert_abs_diff_eq!(el.no_kozai, 15.50103472 / XPDOTP, epsilon = 1e-15);
    }

    #[test]
    fn space_track_strings_parse() {
        let quoted = r#"[{
            "OBJECT_ID": "1998-067A",
            "EPOCH": "2019-12-09T16:38:29.363424Z",
            "MEAN_MOTION": "15.50103472",
            "ECCENTRICITY": "0.0007417",
            "INCLINATION": "51.6439",
            "RA_OF_ASC_NODE": "211.2001",
            "ARG_OF_PERICENTER": "17.6667",
            "MEAN_ANOMALY": "85.6398",
            "NORAD_CAT_ID": "25544",
            "ELEMENT_SET_NO": "",
            "BSTAR": "0.000038792",
            "MEAN_MOTION_DOT": "0.00001764",
            "MEAN_MOTION_DDOT": "0"
        }]"#;
        let list = parse_omm_list(quoted).unwrap();
        assert_eq!(list.len(), 1);
        assert_eq!(list[0].element_set_no, None);
        assert_eq!(list[0].rev_at_epoch, None);

        let a = list[0].to_elements().unwrap();
        let b = parse_omm(ISS_CELESTRAK).unwrap().to_elements().unwrap();
        assert_eq!(a.jdsatepoch, b.jdsatepoch);
        assert_abs_diff_eq!(a.jdsatepoch_f, b.jdsatepoch_f, epsilon = 1e-15);
        assert_abs_diff_eq!(a.bstar, b.bstar, epsilon = 1e-18);
        assert_abs_diff_eq!(a.ndot, b.ndot, epsilon = 1e-20);
    }

    #[test]
    fn unusual_object_id_is_kept_verbatim() {
        let odd = ISS_CELESTRAK.replace("1998-067A", "1\u{e9}9-067A");
        let el = parse_omm(&odd).unwrap().to_elements().unwrap();
        assert_eq!(el.intldesg, "1\u{e9}9-067A");

        let short = ISS_CELESTRAK.replace("1998-067A", "1998-");
        assert_eq!(parse_omm(&short).unwrap().to_elements().unwrap().intldesg, "1998-");
    }

    #[test]
    fn bad_epoch_is_reported() {
        let bad = ISS_CELESTRAK.replace("2019-12-09T16:38:29.363424", "2019-13-09T16:38:29");
        let err = parse_omm(&bad).unwrap().to_elements().unwrap_err();
        assert!(matches!(err, OmmError::Epoch { .. }), "{err}");
    }

    #[test]
    fn missing_required_field_is_json_error() {
        let bad = ISS_CELESTRAK.replace("\"BSTAR\": 3.8792e-5,", "");
        assert!(matches!(parse_omm(&bad), Err(OmmError::Json(_))));
    }
}
