use chrono::{Duration as ChronoDur, NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use std::fmt::{self, Display};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/* ───────────────────── spreadsheet date-serial utilities ──────────────
1900 date system:
  Serial 1  = 1900-01-01
  Serial 59 = 1900-02-28
  Serial 60 = 1900-02-29  (phantom – doesn't exist, but Excel thinks it does)
  Serial 61 = 1900-03-01
Base date = 1899-12-31 so that serial 1 = base + 1 day = 1900-01-01.

1904 date system:
  Serial 0  = 1904-01-01, no phantom day.

Time is stored as fractional days (no timezone).
------------------------------------------------------------------- */

/// Base date for the 1900 date system. Serial 1 = base + 1 day = 1900-01-01.
const EPOCH_1900: NaiveDate = NaiveDate::from_ymd_opt(1899, 12, 31).unwrap();
/// Base date for the 1904 date system. Serial 0 = 1904-01-01.
const EPOCH_1904: NaiveDate = NaiveDate::from_ymd_opt(1904, 1, 1).unwrap();
/// First real date after the phantom 1900-02-29.
const MARCH_1_1900: NaiveDate = NaiveDate::from_ymd_opt(1900, 3, 1).unwrap();
const PHANTOM_LEAP_DAY: i64 = 60;
const SECS_PER_DAY: i64 = 86_400;

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DateSystem {
    #[default]
    Excel1900,
    Excel1904,
}

impl Display for DateSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DateSystem::Excel1900 => write!(f, "1900"),
            DateSystem::Excel1904 => write!(f, "1904"),
        }
    }
}

impl DateSystem {
    pub fn datetime_to_serial(self, dt: &NaiveDateTime) -> f64 {
        let serial_days = match self {
            DateSystem::Excel1900 => {
                let days = (dt.date() - EPOCH_1900).num_days();
                // Dates on or after 1900-03-01 get +1 to account for phantom Feb 29
                if dt.date() >= MARCH_1_1900 {
                    days + 1
                } else {
                    days
                }
            }
            DateSystem::Excel1904 => (dt.date() - EPOCH_1904).num_days(),
        };
        let secs_in_day = dt.time().num_seconds_from_midnight() as f64;
        serial_days as f64 + secs_in_day / SECS_PER_DAY as f64
    }

    /// Inverse of [`DateSystem::datetime_to_serial`]. Fractions are rounded to
    /// the nearest second, carrying into the next day when needed.
    ///
    /// Returns `None` for negative, non-finite or out-of-range serials.
    pub fn serial_to_datetime(self, serial: f64) -> Option<NaiveDateTime> {
        if !serial.is_finite() || serial < 0.0 {
            return None;
        }
        let total_secs = (serial * SECS_PER_DAY as f64).round();
        if total_secs > i64::MAX as f64 {
            return None;
        }
        let total_secs = total_secs as i64;
        let days = total_secs.div_euclid(SECS_PER_DAY);
        let secs = total_secs.rem_euclid(SECS_PER_DAY) as u32;

        let date = match self {
            // Serial 60 is phantom 1900-02-29; map to 1900-02-28
            DateSystem::Excel1900 if days == PHANTOM_LEAP_DAY => {
                NaiveDate::from_ymd_opt(1900, 2, 28)?
            }
            DateSystem::Excel1900 => {
                let offset = if days < PHANTOM_LEAP_DAY { days } else { days - 1 };
                EPOCH_1900.checked_add_signed(ChronoDur::try_days(offset)?)?
            }
            DateSystem::Excel1904 => EPOCH_1904.checked_add_signed(ChronoDur::try_days(days)?)?,
        };
        let time = NaiveTime::from_num_seconds_from_midnight_opt(secs, 0)?;
        Some(date.and_time(time))
    }

    pub fn date_to_serial(self, date: &NaiveDate) -> f64 {
        self.datetime_to_serial(&date.and_time(NaiveTime::MIN))
    }

    pub fn serial_to_date(self, serial: f64) -> Option<NaiveDate> {
        self.serial_to_datetime(serial).map(|dt| dt.date())
    }
}

/// A value as it crosses the boundary to a spreadsheet cell.
///
/// `List` only exists between a record and the transcoder; writers never see
/// it because encoding flattens lists into comma-joined text.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq, Default)]
pub enum CellValue {
    #[default]
    Empty,
    Int(i64),
    Uint(u64),
    Number(f64),
    Boolean(bool),
    Text(String),
    Date(NaiveDate),
    DateTime(NaiveDateTime),
    List(Vec<CellValue>),
}

impl Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Empty => Ok(()),
            CellValue::Int(i) => write!(f, "{i}"),
            CellValue::Uint(u) => write!(f, "{u}"),
            CellValue::Number(n) => write!(f, "{n}"),
            CellValue::Boolean(b) => write!(f, "{b}"),
            CellValue::Text(s) => f.write_str(s),
            CellValue::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
            CellValue::DateTime(dt) => write!(f, "{}", dt.format("%Y-%m-%d %H:%M:%S")),
            CellValue::List(items) => {
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(",")?;
                    }
                    write!(f, "{item}")?;
                }
                Ok(())
            }
        }
    }
}

impl CellValue {
    pub fn is_empty(&self) -> bool {
        matches!(self, CellValue::Empty)
    }

    /// Serial number for values a spreadsheet stores numerically.
    pub fn as_serial_number(&self, system: DateSystem) -> Option<f64> {
        match self {
            CellValue::Date(d) => Some(system.date_to_serial(d)),
            CellValue::DateTime(dt) => Some(system.datetime_to_serial(dt)),
            CellValue::Int(i) => Some(*i as f64),
            CellValue::Uint(u) => Some(*u as f64),
            CellValue::Number(n) => Some(*n),
            CellValue::Boolean(b) => Some(if *b { 1.0 } else { 0.0 }),
            _ => None,
        }
    }
}

macro_rules! cell_value_from {
    ($variant:ident <- $($ty:ty),+) => {
        $(
            impl From<$ty> for CellValue {
                fn from(value: $ty) -> Self {
                    CellValue::$variant(value.into())
                }
            }
        )+
    };
}

cell_value_from!(Int <- i8, i16, i32, i64);
cell_value_from!(Uint <- u8, u16, u32, u64);
cell_value_from!(Number <- f32, f64);
cell_value_from!(Boolean <- bool);
cell_value_from!(Text <- String, &str);
cell_value_from!(Date <- NaiveDate);
cell_value_from!(DateTime <- NaiveDateTime);
