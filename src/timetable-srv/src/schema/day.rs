use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// The highest numbered teaching slot in a day.
pub const MAX_PERIOD: u8 = 8;

/// The teaching days. The store keeps these as their english names, which is also how they are
/// serialized.
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
#[serde(try_from = "String", into = "String")]
pub enum Day {
  #[default]
  Monday,
  Tuesday,
  Wednesday,
  Thursday,
  Friday,
  Saturday,
}

impl Day {
  /// Every teaching day, in week order.
  pub const ALL: [Day; 6] = [
    Day::Monday,
    Day::Tuesday,
    Day::Wednesday,
    Day::Thursday,
    Day::Friday,
    Day::Saturday,
  ];

  /// The name used by the store.
  pub fn as_str(&self) -> &'static str {
    match self {
      Day::Monday => "Monday",
      Day::Tuesday => "Tuesday",
      Day::Wednesday => "Wednesday",
      Day::Thursday => "Thursday",
      Day::Friday => "Friday",
      Day::Saturday => "Saturday",
    }
  }

  /// Sundays have no classes.
  pub fn from_weekday(weekday: chrono::Weekday) -> Option<Self> {
    match weekday {
      chrono::Weekday::Mon => Some(Day::Monday),
      chrono::Weekday::Tue => Some(Day::Tuesday),
      chrono::Weekday::Wed => Some(Day::Wednesday),
      chrono::Weekday::Thu => Some(Day::Thursday),
      chrono::Weekday::Fri => Some(Day::Friday),
      chrono::Weekday::Sat => Some(Day::Saturday),
      chrono::Weekday::Sun => None,
    }
  }

  /// The current local weekday, falling back to monday on sundays.
  pub fn today() -> Self {
    Self::from_weekday(chrono::Datelike::weekday(&chrono::Local::now())).unwrap_or_default()
  }
}

impl fmt::Display for Day {
  fn fmt(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
    write!(formatter, "{}", self.as_str())
  }
}

impl FromStr for Day {
  type Err = String;

  fn from_str(input: &str) -> Result<Self, Self::Err> {
    let trimmed = input.trim();
    Day::ALL
      .iter()
      .find(|day| day.as_str().eq_ignore_ascii_case(trimmed) || day.as_str()[..3].eq_ignore_ascii_case(trimmed))
      .copied()
      .ok_or_else(|| format!("'{input}' is not a teaching day"))
  }
}

impl TryFrom<String> for Day {
  type Error = String;

  fn try_from(value: String) -> Result<Self, Self::Error> {
    value.parse()
  }
}

impl From<Day> for String {
  fn from(day: Day) -> Self {
    day.as_str().to_string()
  }
}

/// Which periods of a day a search is interested in. Over the wire this is a single integer where `0`
/// means every period of the day.
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(try_from = "u8", into = "u8")]
pub enum PeriodSelector {
  /// Every period of the day.
  #[default]
  All,
  /// One specific period, `1..=8`.
  Period(u8),
}

impl PeriodSelector {
  /// The specific period requested, if any.
  pub fn period(&self) -> Option<u8> {
    match self {
      PeriodSelector::All => None,
      PeriodSelector::Period(period) => Some(*period),
    }
  }
}

impl TryFrom<u8> for PeriodSelector {
  type Error = String;

  fn try_from(value: u8) -> Result<Self, Self::Error> {
    match value {
      0 => Ok(PeriodSelector::All),
      period if period <= MAX_PERIOD => Ok(PeriodSelector::Period(period)),
      other => Err(format!("period '{other}' is outside of 0..={MAX_PERIOD}")),
    }
  }
}

impl From<PeriodSelector> for u8 {
  fn from(selector: PeriodSelector) -> Self {
    selector.period().unwrap_or(0)
  }
}

impl fmt::Display for PeriodSelector {
  fn fmt(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
    match self {
      PeriodSelector::All => write!(formatter, "All Periods"),
      PeriodSelector::Period(period) => write!(formatter, "Period {period}"),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::{Day, PeriodSelector};

  #[test]
  fn test_day_parse() {
    assert_eq!("monday".parse::<Day>(), Ok(Day::Monday));
    assert_eq!(" Saturday ".parse::<Day>(), Ok(Day::Saturday));
    assert_eq!("thu".parse::<Day>(), Ok(Day::Thursday));
    assert!("Sunday".parse::<Day>().is_err());
  }

  #[test]
  fn test_day_from_weekday() {
    assert_eq!(Day::from_weekday(chrono::Weekday::Fri), Some(Day::Friday));
    assert_eq!(Day::from_weekday(chrono::Weekday::Sun), None);
  }

  #[test]
  fn test_period_selector_bounds() {
    assert_eq!(PeriodSelector::try_from(0), Ok(PeriodSelector::All));
    assert_eq!(PeriodSelector::try_from(8), Ok(PeriodSelector::Period(8)));
    assert!(PeriodSelector::try_from(9).is_err());
    assert_eq!(u8::from(PeriodSelector::Period(3)), 3);
  }

  #[test]
  fn test_period_selector_json() {
    let selector = serde_json::from_str::<PeriodSelector>("2").expect("failed parse");
    assert_eq!(selector.period(), Some(2));
    assert!(serde_json::from_str::<PeriodSelector>("12").is_err());
  }
}
