//! Two-line element set parsing.

use crate::alpha5::from_alpha5;
use crate::constants::{DEG2RAD, MINUTES_PER_DAY, XPDOTP};
use crate::elements::Elements;
use crate::error::TleError;
use crate::functions::{days2mdhms, jday};

const LINE1_FMT: &str = "1 NNNNNC NNNNNAAA NNNNN.NNNNNNNN +.NNNNNNNN +NNNNN-N +NNNNN-N N NNNNN";
const LINE2_FMT: &str = "2 NNNNN NNN.NNNN NNN.NNNN NNNNNNN NNN.NNNN NNN.NNNN NN.NNNNNNNNNNNNNN";

/// Column positions that must hold a fixed character.
const LINE1_MARKS: [(usize, u8); 10] = [
    (0, b'1'),
    (1, b' '),
    (8, b' '),
    (23, b'.'),
    (32, b' '),
    (34, b'.'),
    (43, b' '),
    (52, b' '),
    (61, b' '),
    (63, b' '),
];
const LINE2_MARKS: [(usize, u8); 12] = [
    (0, b'2'),
    (1, b' '),
    (7, b' '),
    (11, b'.'),
    (16, b' '),
    (20, b'.'),
    (25, b' '),
    (33, b' '),
    (37, b'.'),
    (42, b' '),
    (46, b'.'),
    (51, b' '),
];

fn check_layout(line: &str, number: u8, min_len: usize, marks: &[(usize, u8)]) -> Result<(), TleError> {
    let bytes = line.as_bytes();
    let ok = bytes.len() >= min_len && marks.iter().all(|&(i, c)| bytes.get(i) == Some(&c));
    if ok {
        Ok(())
    } else {
        Err(TleError::Format {
            line: number,
            expected: if number == 1 { LINE1_FMT } else { LINE2_FMT },
            given: line.to_string(),
        })
    }
}

fn field<T: std::str::FromStr>(line: u8, name: &'static str, raw: &str) -> Result<T, TleError> {
    raw.trim().parse().map_err(|_| TleError::Field {
        line,
        field: name,
        value: raw.to_string(),
    })
}

/// Field with an implied leading decimal point and a trailing power of ten,
/// such as ` 13844-3` for 0.13844e-3.
fn implied_decimal(line: u8, name: &'static str, raw: &str) -> Result<f64, TleError> {
    let sign = &raw[0..1];
    let mantissa: f64 = field(line, name, &format!("{}.{}", sign.trim(), &raw[1..6]))?;
    let exponent: i32 = field(line, name, &raw[6..8])?;
    Ok(mantissa * 10f64.powi(exponent))
}

/// Parse the two lines of a TLE into SGP4 elements.
///
/// The checksum column is not verified here; see [`verify_checksum`].
pub fn parse_tle(line1: &str, line2: &str) -> Result<Elements, TleError> {
    let line1 = line1.trim_end_matches(['\r', '\n']);
    let line2 = line2.trim_end_matches(['\r', '\n']);

    if !line1.is_ascii() || !line2.is_ascii() {
        return Err(TleError::NonAscii {
            line1: line1.to_string(),
            line2: line2.to_string(),
        });
    }

    check_layout(line1, 1, 68, &LINE1_MARKS)?;

    let satnum = line1[2..7].trim().to_string();
    from_alpha5(&satnum)?;
    let classification = line1.as_bytes()[7] as char;
    let intldesg = line1[9..17].trim_end().to_string();
    let two_digit_year: i32 = field(1, "epoch year", &line1[18..20])?;
    let epochdays: f64 = field(1, "epoch day", &line1[20..32])?;
    let ndot: f64 = field(1, "ndot", &line1[33..43])?;
    let nddot = implied_decimal(1, "nddot", &line1[44..52])?;
    let bstar = implied_decimal(1, "bstar", &line1[53..61])?;
    let elnum: u32 = match line1[64..68].trim() {
        "" => 0,
        raw => field(1, "element number", raw)?,
    };

    check_layout(line2, 2, 63, &LINE2_MARKS)?;

    if satnum != line2[2..7].trim() {
        return Err(TleError::MismatchedCatalogNumber);
    }

    let inclo_deg: f64 = field(2, "inclination", &line2[8..16])?;
    let nodeo_deg: f64 = field(2, "right ascension", &line2[17..25])?;
    let ecco: f64 = field(2, "eccentricity", &format!("0.{}", line2[26..33].replace(' ', "0")))?;
    let argpo_deg: f64 = field(2, "argument of perigee", &line2[34..42])?;
    let mo_deg: f64 = field(2, "mean anomaly", &line2[43..51])?;
    let no_revs_per_day: f64 = field(2, "mean motion", &line2[52..63])?;
    let revnum: u32 = match line2.get(63..68).map(str::trim) {
        None | Some("") => 0,
        Some(raw) => field(2, "revolution number", raw)?,
    };

    // Two-digit years cover 1957 through 2056.
    let epochyr = if two_digit_year < 57 {
        two_digit_year + 2000
    } else {
        two_digit_year + 1900
    };
    let (mon, day, hr, minute, sec) = days2mdhms(epochyr, epochdays, true);
    let (jdsatepoch, jdsatepoch_f) = jday(epochyr, mon, day, hr, minute, sec);

    Ok(Elements {
        satnum,
        classification,
        intldesg,
        epochyr,
        epochdays,
        jdsatepoch,
        jdsatepoch_f,
        bstar,
        ndot: ndot / (XPDOTP * MINUTES_PER_DAY),
        nddot: nddot / (XPDOTP * MINUTES_PER_DAY * MINUTES_PER_DAY),
        ecco,
        argpo: argpo_deg * DEG2RAD,
        inclo: inclo_deg * DEG2RAD,
        mo: mo_deg * DEG2RAD,
        no_kozai: no_revs_per_day / XPDOTP,
        nodeo: nodeo_deg * DEG2RAD,
        elnum,
        revnum,
    })
}

/// Compute the TLE checksum for the given line (first 68 columns).
pub fn compute_checksum(line: &str) -> u32 {
    line.chars()
        .take(68)
        .map(|c| match c {
            '0'..='9' => c as u32 - '0' as u32,
            '-' => 1,
            _ => 0,
        })
        .sum::<u32>()
        % 10
}

/// Return a copy of `line` with the correct checksum in column 69,
/// replacing any checksum already present.
pub fn fix_checksum(line: &str) -> String {
    let body: String = line.chars().take(68).collect();
    let body = format!("{body:<68}");
    let checksum = compute_checksum(&body);
    format!("{body}{checksum}")
}

/// Verify the checksum column of each line. Lines without a checksum digit
/// are accepted.
pub fn verify_checksum(line1: &str, line2: &str) -> Result<(), TleError> {
    for line in [line1, line2] {
        let Some(given) = line.chars().nth(68).and_then(|c| c.to_digit(10)) else {
            continue;
        };
        let computed = compute_checksum(line);
        if given != computed {
            return Err(TleError::Checksum {
                given,
                computed,
                line: line.to_string(),
            });
        }
    }
    Ok(())
}
