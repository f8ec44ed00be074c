//! Dose windows and derived schedule entries.

use chrono::{Days, Months, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Unit of a dose offset from the date of birth
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimeUnit {
    Days,
    Weeks,
    Months,
    Years,
}

impl TimeUnit {
    /// Largest accepted amount, roughly one hundred years in every unit
    fn max_amount(self) -> u32 {
        match self {
            TimeUnit::Days => 36_525,
            TimeUnit::Weeks => 5_218,
            TimeUnit::Months => 1_200,
            TimeUnit::Years => 100,
        }
    }

    fn as_str(self) -> &'static str {
        match self {
            TimeUnit::Days => "days",
            TimeUnit::Weeks => "weeks",
            TimeUnit::Months => "months",
            TimeUnit::Years => "years",
        }
    }
}

impl FromStr for TimeUnit {
    type Err = WindowParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "day" | "days" => Ok(TimeUnit::Days),
            "week" | "weeks" => Ok(TimeUnit::Weeks),
            "month" | "months" => Ok(TimeUnit::Months),
            "year" | "years" => Ok(TimeUnit::Years),
            other => Err(WindowParseError(format!("unknown time unit '{}'", other))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct WindowParseError(String);

/// When a dose is due, relative to birth: a single point ("6 weeks") or a
/// range ("15-18 months").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DoseWindow {
    pub from: u32,
    pub to: Option<u32>,
    pub unit: TimeUnit,
}

impl DoseWindow {
    pub fn at(amount: u32, unit: TimeUnit) -> Self {
        Self { from: amount, to: None, unit }
    }

    pub fn between(from: u32, to: u32, unit: TimeUnit) -> Self {
        Self { from, to: Some(to), unit }
    }

    pub fn is_birth(&self) -> bool {
        self.from == 0 && self.to.is_none()
    }

    /// Due date (or window start) for a child born on `dob`
    pub fn start_date(&self, dob: NaiveDate) -> Option<NaiveDate> {
        offset_date(dob, self.from, self.unit)
    }

    /// Window end for ranged doses
    pub fn end_date(&self, dob: NaiveDate) -> Option<NaiveDate> {
        self.to.and_then(|to| offset_date(dob, to, self.unit))
    }
}

/// Calendar arithmetic: months and years land on the same day of month,
/// clamped to the month's last day.
fn offset_date(dob: NaiveDate, amount: u32, unit: TimeUnit) -> Option<NaiveDate> {
    match unit {
        TimeUnit::Days => dob.checked_add_days(Days::new(u64::from(amount))),
        TimeUnit::Weeks => dob.checked_add_days(Days::new(u64::from(amount) * 7)),
        TimeUnit::Months => dob.checked_add_months(Months::new(amount)),
        TimeUnit::Years => dob.checked_add_months(Months::new(amount.checked_mul(12)?)),
    }
}

impl FromStr for DoseWindow {
    type Err = WindowParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let (amount, unit) = trimmed
            .rsplit_once(char::is_whitespace)
            .ok_or_else(|| WindowParseError(format!("expected '<amount> <unit>', got '{}'", trimmed)))?;
        let unit: TimeUnit = unit.parse()?;

        let amount: String = amount.chars().filter(|c| !c.is_whitespace()).collect();
        let parse_amount = |text: &str| -> Result<u32, WindowParseError> {
            let value: u32 = text
                .parse()
                .map_err(|_| WindowParseError(format!("invalid amount '{}' in '{}'", text, trimmed)))?;
            if value > unit.max_amount() {
                return Err(WindowParseError(format!(
                    "amount {} {} is out of range",
                    value,
                    unit.as_str()
                )));
            }
            Ok(value)
        };

        match amount.split_once('-') {
            Some((from, to)) => {
                let (from, to) = (parse_amount(from)?, parse_amount(to)?);
                if from > to {
                    return Err(WindowParseError(format!(
                        "range start is after range end in '{}'",
                        trimmed
                    )));
                }
                Ok(DoseWindow::between(from, to, unit))
            }
            None => Ok(DoseWindow::at(parse_amount(&amount)?, unit)),
        }
    }
}

impl TryFrom<String> for DoseWindow {
    type Error = WindowParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<DoseWindow> for String {
    fn from(window: DoseWindow) -> Self {
        window.to_string()
    }
}

impl fmt::Display for DoseWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.to {
            Some(to) => write!(f, "{}-{} {}", self.from, to, self.unit.as_str()),
            None => write!(f, "{} {}", self.from, self.unit.as_str()),
        }
    }
}

/// One dose of one vaccine, placed on the calendar for a specific child
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduledDose {
    pub vaccine: String,
    pub window: DoseWindow,
    pub start: NaiveDate,
    pub end: Option<NaiveDate>,
}

impl ScheduledDose {
    /// e.g. `"DTaP (15-18 months): 2024-04-15 to 2024-07-15"`
    pub fn label(&self) -> String {
        let window = if self.window.is_birth() {
            "at birth".to_string()
        } else {
            self.window.to_string()
        };

        match self.end {
            Some(end) => format!(
                "{} ({}): {} to {}",
                self.vaccine,
                window,
                self.start.format("%Y-%m-%d"),
                end.format("%Y-%m-%d")
            ),
            None => format!("{} ({}): {}", self.vaccine, window, self.start.format("%Y-%m-%d")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_parse_point_windows() {
        assert_eq!("0 days".parse::<DoseWindow>().unwrap(), DoseWindow::at(0, TimeUnit::Days));
        assert_eq!("6 weeks".parse::<DoseWindow>().unwrap(), DoseWindow::at(6, TimeUnit::Weeks));
        assert_eq!(" 1 Year ".parse::<DoseWindow>().unwrap(), DoseWindow::at(1, TimeUnit::Years));
    }

    #[test]
    fn test_parse_range_windows() {
        assert_eq!(
            "15-18 months".parse::<DoseWindow>().unwrap(),
            DoseWindow::between(15, 18, TimeUnit::Months)
        );
        assert_eq!(
            "4 - 6 years".parse::<DoseWindow>().unwrap(),
            DoseWindow::between(4, 6, TimeUnit::Years)
        );
    }

    #[test]
    fn test_parse_rejects_malformed_windows() {
        assert!("".parse::<DoseWindow>().is_err());
        assert!("weeks".parse::<DoseWindow>().is_err());
        assert!("six weeks".parse::<DoseWindow>().is_err());
        assert!("6 fortnights".parse::<DoseWindow>().is_err());
        assert!("18-15 months".parse::<DoseWindow>().is_err());
        assert!("-3 days".parse::<DoseWindow>().is_err());
        assert!("500 years".parse::<DoseWindow>().is_err());
    }

    #[test]
    fn test_display_is_canonical() {
        let window: DoseWindow = "4 - 6 Years".parse().unwrap();
        assert_eq!(window.to_string(), "4-6 years");
        assert_eq!(DoseWindow::at(1, TimeUnit::Days).to_string(), "1 days");
    }

    #[test]
    fn test_offsets_use_calendar_arithmetic() {
        let dob = date(2023, 1, 15);

        assert_eq!(DoseWindow::at(0, TimeUnit::Days).start_date(dob), Some(dob));
        assert_eq!(DoseWindow::at(6, TimeUnit::Weeks).start_date(dob), Some(date(2023, 2, 26)));
        assert_eq!(DoseWindow::at(12, TimeUnit::Months).start_date(dob), Some(date(2024, 1, 15)));
        assert_eq!(DoseWindow::at(4, TimeUnit::Years).start_date(dob), Some(date(2027, 1, 15)));
    }

    #[test]
    fn test_month_offset_clamps_to_month_end() {
        let dob = date(2023, 1, 31);
        assert_eq!(DoseWindow::at(1, TimeUnit::Months).start_date(dob), Some(date(2023, 2, 28)));

        let leap_day = date(2024, 2, 29);
        assert_eq!(DoseWindow::at(1, TimeUnit::Years).start_date(leap_day), Some(date(2025, 2, 28)));
    }

    #[test]
    fn test_range_has_end_date() {
        let dob = date(2023, 1, 15);
        let window = DoseWindow::between(15, 18, TimeUnit::Months);

        assert_eq!(window.start_date(dob), Some(date(2024, 4, 15)));
        assert_eq!(window.end_date(dob), Some(date(2024, 7, 15)));
        assert_eq!(DoseWindow::at(6, TimeUnit::Weeks).end_date(dob), None);
    }

    #[test]
    fn test_labels() {
        let birth = ScheduledDose {
            vaccine: "BCG".to_string(),
            window: DoseWindow::at(0, TimeUnit::Days),
            start: date(2023, 1, 15),
            end: None,
        };
        assert_eq!(birth.label(), "BCG (at birth): 2023-01-15");

        let ranged = ScheduledDose {
            vaccine: "DTaP".to_string(),
            window: DoseWindow::between(15, 18, TimeUnit::Months),
            start: date(2024, 4, 15),
            end: Some(date(2024, 7, 15)),
        };
        assert_eq!(ranged.label(), "DTaP (15-18 months): 2024-04-15 to 2024-07-15");
    }
}
