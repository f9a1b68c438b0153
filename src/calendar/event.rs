use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::event_type::EventType;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
    #[serde(rename = "type")]
    pub event_type: EventType,
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

pub fn generate_id() -> String {
    Uuid::new_v4().to_string()
}

impl Event {
    // Single day, or inclusive range. None when neither form is populated.
    pub fn span(&self) -> Option<(NaiveDate, NaiveDate)> {
        if let Some(date) = self.date {
            return Some((date, date));
        }
        match (self.start_date, self.end_date) {
            (Some(start), Some(end)) => Some((start, end)),
            _ => None,
        }
    }

    pub fn covers(&self, target: NaiveDate) -> bool {
        self.span()
            .is_some_and(|(start, end)| start <= target && target <= end)
    }

    pub fn effective_date(&self) -> Option<NaiveDate> {
        self.date.or(self.start_date)
    }
}
