use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::calendar::event::{generate_id, Event};
use crate::calendar::event_type::EventType;

pub const DEFAULT_SCHOOL_YEAR: i32 = 2025;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Failed to read events file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse events file: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Event with id {0} not found")]
    NotFound(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventStore {
    pub school_year: i32,
    pub events: Vec<Event>,
    pub last_modified: DateTime<Utc>,
}

#[derive(Debug, Clone, Default)]
pub struct EventDraft {
    pub date: Option<NaiveDate>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub event_type: Option<EventType>,
    pub label: Option<String>,
    pub notes: Option<String>,
}

impl EventStore {
    pub fn empty(school_year: i32) -> Self {
        Self {
            school_year,
            events: Vec::new(),
            last_modified: Utc::now(),
        }
    }

    pub fn default_path() -> PathBuf {
        dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("schoolcal")
            .join("events.json")
    }

    pub fn load(path: &Path) -> Result<Self, StoreError> {
        match std::fs::read_to_string(path) {
            Ok(content) => Ok(serde_json::from_str(&content)?),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                Ok(Self::empty(DEFAULT_SCHOOL_YEAR))
            }
            Err(err) => Err(err.into()),
        }
    }

    pub fn save(&mut self, path: &Path) -> Result<(), StoreError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        self.last_modified = Utc::now();
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;

        Ok(())
    }

    pub fn add_event(&mut self, draft: EventDraft) -> &Event {
        let now = Utc::now();
        self.events.push(Event {
            id: generate_id(),
            date: draft.date,
            start_date: draft.start_date,
            end_date: draft.end_date,
            event_type: draft.event_type.unwrap_or(EventType::PtsaEvent),
            label: draft.label.unwrap_or_default(),
            notes: draft.notes,
            created_at: now,
            updated_at: now,
        });
        self.last_modified = now;
        self.events.last().expect("event was just pushed")
    }

    // Merges only the provided fields. Supplying a single date clears any
    // range, and supplying a range clears the single date.
    pub fn update_event(&mut self, id: &str, patch: EventDraft) -> Result<&Event, StoreError> {
        let index = self
            .events
            .iter()
            .position(|event| event.id == id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        let event = &mut self.events[index];

        if patch.date.is_some() {
            event.date = patch.date;
            event.start_date = None;
            event.end_date = None;
        } else if patch.start_date.is_some() || patch.end_date.is_some() {
            event.start_date = patch.start_date.or(event.start_date);
            event.end_date = patch.end_date.or(event.end_date);
            event.date = None;
        }
        if let Some(event_type) = patch.event_type {
            event.event_type = event_type;
        }
        if let Some(label) = patch.label {
            event.label = label;
        }
        if patch.notes.is_some() {
            event.notes = patch.notes;
        }

        let now = Utc::now();
        event.updated_at = now;
        self.last_modified = now;

        Ok(&self.events[index])
    }

    pub fn delete_event(&mut self, id: &str) {
        self.events.retain(|event| event.id != id);
        self.last_modified = Utc::now();
    }

    pub fn clear(&mut self) {
        *self = Self::empty(DEFAULT_SCHOOL_YEAR);
    }

    pub fn replace_all(&mut self, events: Vec<Event>, school_year: Option<i32>) {
        self.school_year = school_year.unwrap_or(DEFAULT_SCHOOL_YEAR);
        self.events = events;
        self.last_modified = Utc::now();
    }

    pub fn append_events(&mut self, events: Vec<Event>) {
        self.events.extend(events);
        self.last_modified = Utc::now();
    }
}
