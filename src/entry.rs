use crate::error::ParseErrorKind;
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use std::fmt;
use std::str::FromStr;

/// Format used to print entry and result timestamps. Parsing accepts it as well.
pub const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.f";

/// Which side of a trade a row describes.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Side {
    Buy,
    Sell,
}

impl FromStr for Side {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("buy") {
            Ok(Side::Buy)
        } else if s.eq_ignore_ascii_case("sell") {
            Ok(Side::Sell)
        } else {
            Err(format!("'{}' is not a valid value for Side", s))
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Buy => write!(f, "buy"),
            Side::Sell => write!(f, "sell"),
        }
    }
}

/// Entry
/// trade time, volume traded, unit price, fee for the whole volume
///
/// Sequences of entries handed to the matcher must be ordered by `time`.
#[derive(Debug, PartialEq, Clone, Copy)]
pub struct Entry {
    pub time: DateTime<Utc>,
    pub volume: f64,
    pub price: f64,
    pub fee: f64,
}

impl Entry {
    pub fn new(time: DateTime<Utc>, volume: f64, price: f64, fee: f64) -> Self {
        Entry {
            time,
            volume,
            price,
            fee,
        }
    }

    /// Share of the fee charged for `volume` units of this entry.
    pub fn prorated_fee(&self, volume: f64) -> f64 {
        self.fee * volume / self.volume
    }

    /// Copy of this entry reduced to `volume`, carrying only its share of the fee.
    pub fn prorated(&self, volume: f64) -> Entry {
        Entry {
            time: self.time,
            volume,
            price: self.price,
            fee: self.prorated_fee(volume),
        }
    }

    /// Zero, negative, infinite or NaN volume; such an entry cannot be matched against.
    pub fn is_degenerate(&self) -> bool {
        !(self.volume > 0.0 && self.volume.is_finite())
    }
}

/// "time,volume,price,fee"
impl FromStr for Entry {
    type Err = ParseErrorKind;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let field: Vec<&str> = s.split(',').map(str::trim).collect();
        let get = |index: usize, column: &'static str| {
            field
                .get(index)
                .copied()
                .ok_or(ParseErrorKind::MissingColumn { column, index })
        };
        let time = get(0, "time")?;
        Ok(Entry {
            time: parse_time(time).ok_or_else(|| ParseErrorKind::InvalidTime(time.to_owned()))?,
            volume: parse_number(get(1, "volume")?, "volume")?,
            price: parse_number(get(2, "price")?, "price")?,
            fee: parse_number(get(3, "fee")?, "fee")?,
        })
    }
}

impl fmt::Display for Entry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{},{},{},{}",
            self.time.format(TIME_FORMAT),
            self.volume,
            self.price,
            self.fee
        )
    }
}

/// Accepts `TIME_FORMAT` (taken as UTC), RFC 3339 with any offset, or a bare date.
pub fn parse_time(s: &str) -> Option<DateTime<Utc>> {
    if let Ok(t) = NaiveDateTime::parse_from_str(s, TIME_FORMAT) {
        return Some(t.and_utc());
    }
    if let Ok(t) = DateTime::parse_from_rfc3339(s) {
        return Some(t.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|t| t.and_utc())
}

/// Finite `f64` only: `inf` and `NaN` are rejected like any other bad number.
pub(crate) fn parse_number(s: &str, column: &'static str) -> Result<f64, ParseErrorKind> {
    match s.parse::<f64>() {
        Ok(n) if n.is_finite() => Ok(n),
        _ => Err(ParseErrorKind::InvalidNumber {
            column,
            value: s.to_owned(),
        }),
    }
}
