//! Recurring expenses
//!
//! A recurring expense (rent, a subscription, a weekly class) is due every
//! week or month from its start date. When an occurrence comes due it is
//! turned into an [`ExpenseRecord`] and the due date moves forward.
//!
//! Monthly occurrences keep the start date's day of month, clamped to the
//! last day of shorter months (Jan 31 → Feb 29 → Mar 31).

use std::fs::File;
use std::path::Path;

use chrono::{Datelike, Days, Months, NaiveDate};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};
use crate::load::parse_date;
use crate::models::ExpenseRecord;

/// How often a recurring expense comes due
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Frequency {
    Weekly,
    #[default]
    Monthly,
}

impl Frequency {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
        }
    }
}

impl std::str::FromStr for Frequency {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "weekly" | "week" => Ok(Self::Weekly),
            "monthly" | "month" => Ok(Self::Monthly),
            _ => Err(format!("Unknown frequency: {}", s)),
        }
    }
}

impl std::fmt::Display for Frequency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecurringExpense {
    pub name: String,
    pub category: String,
    pub amount: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub frequency: Frequency,
    pub start_date: NaiveDate,
    pub next_due_date: NaiveDate,
    /// Inactive items are never due and never generate records
    pub is_active: bool,
    /// Generate records automatically once due
    pub auto_generate: bool,
}

impl RecurringExpense {
    /// Create an active item first due on `start_date`
    pub fn new(
        name: impl Into<String>,
        category: impl Into<String>,
        amount: f64,
        frequency: Frequency,
        start_date: NaiveDate,
    ) -> Result<Self> {
        let name = name.into().trim().to_string();
        let category = category.into().trim().to_string();
        if name.is_empty() {
            return Err(Error::InvalidData("Recurring expense needs a name".into()));
        }
        if category.is_empty() {
            return Err(Error::InvalidData(format!(
                "Recurring expense '{}' needs a category",
                name
            )));
        }
        if !amount.is_finite() || amount <= 0.0 {
            return Err(Error::InvalidData(format!(
                "Recurring expense '{}' must have a positive amount, got {}",
                name, amount
            )));
        }

        Ok(Self {
            name,
            category,
            amount,
            description: None,
            frequency,
            start_date,
            next_due_date: start_date,
            is_active: true,
            auto_generate: false,
        })
    }

    /// Description carried by generated records
    pub fn description(&self) -> String {
        self.description
            .clone()
            .unwrap_or_else(|| format!("{} (recurring)", self.name))
    }

    /// The due date after `next_due_date`
    pub fn next_due(&self) -> Result<NaiveDate> {
        let from = self.next_due_date;
        let next = match self.frequency {
            Frequency::Weekly => from.checked_add_days(Days::new(7)),
            Frequency::Monthly if from >= self.start_date => {
                let elapsed = months_between(self.start_date, from);
                u32::try_from(elapsed + 1)
                    .ok()
                    .and_then(|n| self.start_date.checked_add_months(Months::new(n)))
            }
            Frequency::Monthly => from.checked_add_months(Months::new(1)),
        };
        next.ok_or_else(|| {
            Error::InvalidData(format!(
                "Next due date of '{}' after {} is out of range",
                self.name, from
            ))
        })
    }

    pub fn is_due_on(&self, as_of: NaiveDate) -> bool {
        self.is_active && self.next_due_date == as_of
    }

    /// Due between `as_of` and `days` later, both inclusive
    pub fn is_upcoming(&self, as_of: NaiveDate, days: u32) -> bool {
        let until = as_of
            .checked_add_days(Days::new(u64::from(days)))
            .unwrap_or(NaiveDate::MAX);
        self.is_active && self.next_due_date >= as_of && self.next_due_date <= until
    }

    pub fn is_overdue(&self, as_of: NaiveDate) -> bool {
        self.is_active && self.next_due_date < as_of
    }

    /// Record the current occurrence and advance the due date
    pub fn generate_record(&mut self) -> Result<ExpenseRecord> {
        if !self.is_active {
            return Err(Error::InvalidData(format!(
                "Recurring expense '{}' is inactive",
                self.name
            )));
        }

        let next = self.next_due()?;
        let record = ExpenseRecord::new(self.next_due_date, self.amount, self.category.clone());
        debug!(
            name = %self.name,
            date = %record.date,
            next_due = %next,
            "Generated recurring expense record"
        );
        self.next_due_date = next;
        Ok(record)
    }

    /// Generate every occurrence due on or before `as_of`
    pub fn catch_up(&mut self, as_of: NaiveDate) -> Result<Vec<ExpenseRecord>> {
        let mut records = Vec::new();
        while self.is_active && self.next_due_date <= as_of {
            records.push(self.generate_record()?);
        }
        Ok(records)
    }
}

fn months_between(from: NaiveDate, to: NaiveDate) -> i32 {
    (to.year() - from.year()) * 12 + to.month() as i32 - from.month() as i32
}

/// Active items due within `days` of `as_of`, soonest first
pub fn upcoming(items: &[RecurringExpense], as_of: NaiveDate, days: u32) -> Vec<&RecurringExpense> {
    let mut due: Vec<_> = items.iter().filter(|e| e.is_upcoming(as_of, days)).collect();
    due.sort_by_key(|e| e.next_due_date);
    due
}

/// Active items due exactly on `as_of`
pub fn due_on(items: &[RecurringExpense], as_of: NaiveDate) -> Vec<&RecurringExpense> {
    items.iter().filter(|e| e.is_due_on(as_of)).collect()
}

/// Recurring expense as stored in a JSON file
#[derive(Debug, Deserialize)]
struct RawRecurring {
    name: String,
    #[serde(alias = "category_id")]
    category: String,
    amount: f64,
    #[serde(default)]
    description: Option<String>,
    frequency: String,
    start_date: String,
    #[serde(default)]
    next_due_date: Option<String>,
    #[serde(default = "default_active")]
    is_active: bool,
    #[serde(default)]
    auto_generate: bool,
}

fn default_active() -> bool {
    true
}

impl RawRecurring {
    fn into_expense(self) -> Result<RecurringExpense> {
        let frequency: Frequency = self.frequency.parse().map_err(Error::InvalidData)?;
        let start_date = parse_date(&self.start_date)?;

        let mut expense =
            RecurringExpense::new(self.name, self.category, self.amount, frequency, start_date)?;
        if let Some(next) = self.next_due_date {
            expense.next_due_date = parse_date(&next)?;
        }
        expense.description = self.description.filter(|d| !d.trim().is_empty());
        expense.is_active = self.is_active;
        expense.auto_generate = self.auto_generate;
        Ok(expense)
    }
}

/// Load recurring expenses from a JSON array
pub fn load_file(path: &Path) -> Result<Vec<RecurringExpense>> {
    let file = File::open(path)?;
    let raw: Vec<RawRecurring> = serde_json::from_reader(file)?;
    let items = raw
        .into_iter()
        .map(RawRecurring::into_expense)
        .collect::<Result<Vec<_>>>()?;

    debug!(path = %path.display(), count = items.len(), "Loaded recurring expenses");
    Ok(items)
}
