use chrono::{Local, NaiveDateTime, SubsecRound};
use uuid::Uuid;

/// Rendering of every timestamp field: ISO-8601, microseconds, no zone.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.6f";

/// Parsing accepts any fractional precision, including none.
const TIMESTAMP_PARSE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";

/// Identity and timestamp bookkeeping shared by all records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BaseModel {
    /// Random UUID for fresh records, verbatim for rehydrated ones.
    pub id: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl BaseModel {
    /// Fresh identity: new UUID, `created_at == updated_at == now`.
    pub fn new() -> Self {
        let now = now();
        Self {
            id: Uuid::new_v4().to_string(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Moves `updated_at` to the current time, never below `created_at`.
    pub fn touch(&mut self) {
        self.updated_at = now().max(self.created_at);
    }
}

impl Default for BaseModel {
    fn default() -> Self {
        Self::new()
    }
}

/// Local wall-clock time at the precision the file format keeps.
pub fn now() -> NaiveDateTime {
    Local::now().naive_local().trunc_subsecs(6)
}

pub fn format_timestamp(timestamp: &NaiveDateTime) -> String {
    timestamp.format(TIMESTAMP_FORMAT).to_string()
}

pub fn parse_timestamp(value: &str) -> Result<NaiveDateTime, chrono::ParseError> {
    NaiveDateTime::parse_from_str(value, TIMESTAMP_PARSE_FORMAT)
}

/// Declared string fields of a record variant, addressable by name.
pub trait Attributes {
    /// Declared field names, in schema order.
    const FIELDS: &'static [&'static str];

    fn field(&self, name: &str) -> Option<&String>;

    fn field_mut(&mut self, name: &str) -> Option<&mut String>;
}
