//! Row model of the weekly case table

use chrono::NaiveDate;
use std::fmt;

use crate::models::columns;

/// Sex selector for the paired male/female columns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Sex {
    Male,
    Female,
}

impl Sex {
    /// Both sexes, in output column order
    pub const ALL: [Self; 2] = [Self::Male, Self::Female];

    /// Name of the cumulative input column
    #[must_use]
    pub const fn cumulative_column(self) -> &'static str {
        match self {
            Self::Male => columns::CUMULATIVE_MALE,
            Self::Female => columns::CUMULATIVE_FEMALE,
        }
    }

    /// Name of the corrected increment column
    #[must_use]
    pub const fn increment_column(self) -> &'static str {
        match self {
            Self::Male => columns::INCREMENT_MALE,
            Self::Female => columns::INCREMENT_FEMALE,
        }
    }

    /// Resolve an increment column name
    #[must_use]
    pub fn from_increment_column(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|sex| sex.increment_column() == name.trim())
    }
}

impl fmt::Display for Sex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.increment_column())
    }
}

/// One region × reporting period, carrying both sexes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeeklyRecord {
    pub year: i32,
    pub week: i32,
    /// `None` when the source row has no region
    pub region: Option<String>,
    pub cumulative_male: i64,
    pub cumulative_female: i64,
    pub date: Option<NaiveDate>,
    pub previous_male: Option<i64>,
    pub previous_female: Option<i64>,
    pub increment_male: i64,
    pub increment_female: i64,
    /// Position of the row in the loaded input, used to carry passthrough columns
    pub source_row: usize,
}

impl WeeklyRecord {
    /// Create a raw record as reported
    #[must_use]
    pub fn new(
        year: i32,
        week: i32,
        region: Option<&str>,
        cumulative_male: i64,
        cumulative_female: i64,
    ) -> Self {
        Self {
            year,
            week,
            region: region.map(str::to_string),
            cumulative_male,
            cumulative_female,
            date: None,
            previous_male: None,
            previous_female: None,
            increment_male: 0,
            increment_female: 0,
            source_row: 0,
        }
    }

    /// Create a record whose increments are already known
    #[must_use]
    pub fn with_increments(mut self, male: i64, female: i64) -> Self {
        self.increment_male = male;
        self.increment_female = female;
        self
    }

    #[must_use]
    pub fn region(&self) -> Option<&str> {
        self.region.as_deref()
    }

    #[must_use]
    pub const fn cumulative(&self, sex: Sex) -> i64 {
        match sex {
            Sex::Male => self.cumulative_male,
            Sex::Female => self.cumulative_female,
        }
    }

    #[must_use]
    pub const fn previous(&self, sex: Sex) -> Option<i64> {
        match sex {
            Sex::Male => self.previous_male,
            Sex::Female => self.previous_female,
        }
    }

    pub fn set_previous(&mut self, sex: Sex, value: Option<i64>) {
        match sex {
            Sex::Male => self.previous_male = value,
            Sex::Female => self.previous_female = value,
        }
    }

    #[must_use]
    pub const fn increment(&self, sex: Sex) -> i64 {
        match sex {
            Sex::Male => self.increment_male,
            Sex::Female => self.increment_female,
        }
    }

    pub fn set_increment(&mut self, sex: Sex, value: i64) {
        match sex {
            Sex::Male => self.increment_male = value,
            Sex::Female => self.increment_female = value,
        }
    }

    /// Same known region and same year.
    ///
    /// A missing region never matches, not even another missing region.
    #[must_use]
    pub fn same_series(&self, other: &Self) -> bool {
        self.year == other.year
            && matches!((self.region(), other.region()), (Some(a), Some(b)) if a == b)
    }

    /// Whether this row is the week immediately after `previous` in the same series
    #[must_use]
    pub fn follows(&self, previous: &Self) -> bool {
        self.same_series(previous) && self.week == previous.week + 1
    }
}
