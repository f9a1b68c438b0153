use std::collections::HashMap;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    NoSchool,
    HalfDay,
    PtsaEvent,
    FirstDay,
    LastDay,
    EarlyRelease,
    ClosurePossible,
}

impl EventType {
    pub const ALL: [EventType; 7] = [
        EventType::NoSchool,
        EventType::HalfDay,
        EventType::PtsaEvent,
        EventType::FirstDay,
        EventType::LastDay,
        EventType::EarlyRelease,
        EventType::ClosurePossible,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EventType::NoSchool => "no_school",
            EventType::HalfDay => "half_day",
            EventType::PtsaEvent => "ptsa_event",
            EventType::FirstDay => "first_day",
            EventType::LastDay => "last_day",
            EventType::EarlyRelease => "early_release",
            EventType::ClosurePossible => "closure_possible",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            EventType::NoSchool => "No School",
            EventType::HalfDay => "Half Day",
            EventType::PtsaEvent => "PTSA Event",
            EventType::FirstDay => "First Day",
            EventType::LastDay => "Last Day",
            EventType::EarlyRelease => "Early Release",
            EventType::ClosurePossible => "Make-up Day",
        }
    }
}

impl std::fmt::Display for EventType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone)]
pub struct AliasTable {
    aliases: HashMap<String, EventType>,
}

impl AliasTable {
    pub fn new(pairs: impl IntoIterator<Item = (&'static str, EventType)>) -> Self {
        let aliases = pairs
            .into_iter()
            .map(|(alias, event_type)| (alias.to_string(), event_type))
            .collect();
        Self { aliases }
    }

    pub fn normalize(&self, raw: &str) -> Option<EventType> {
        self.aliases.get(&raw.trim().to_lowercase()).copied()
    }
}

impl Default for AliasTable {
    fn default() -> Self {
        let mut pairs: Vec<(&'static str, EventType)> = EventType::ALL
            .iter()
            .map(|event_type| (event_type.as_str(), *event_type))
            .collect();

        pairs.extend([
            ("first_day_1_12", EventType::FirstDay),
            ("first_day_k", EventType::FirstDay),
            ("holiday", EventType::NoSchool),
            ("closure_day", EventType::ClosurePossible),
            ("possible_school_day", EventType::ClosurePossible),
            ("potential_school_day", EventType::ClosurePossible),
            ("kinder_family_conn", EventType::HalfDay),
            ("grades_due", EventType::NoSchool),
        ]);

        Self::new(pairs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonical_names_normalize_to_themselves() {
        let table = AliasTable::default();
        for event_type in EventType::ALL {
            assert_eq!(table.normalize(event_type.as_str()), Some(event_type));
        }
    }

    #[test]
    fn holiday_normalizes_to_no_school() {
        let table = AliasTable::default();
        assert_eq!(table.normalize("holiday"), Some(EventType::NoSchool));
    }

    #[test]
    fn closure_aliases_normalize_to_closure_possible() {
        let table = AliasTable::default();
        assert_eq!(table.normalize("closure_day"), Some(EventType::ClosurePossible));
        assert_eq!(
            table.normalize("possible_school_day"),
            Some(EventType::ClosurePossible)
        );
        assert_eq!(
            table.normalize("potential_school_day"),
            Some(EventType::ClosurePossible)
        );
    }

    #[test]
    fn lookup_is_case_insensitive_and_trims_whitespace() {
        let table = AliasTable::default();
        assert_eq!(table.normalize("  Half_Day "), Some(EventType::HalfDay));
        assert_eq!(table.normalize("HOLIDAY"), Some(EventType::NoSchool));
    }

    #[test]
    fn unknown_type_yields_none() {
        let table = AliasTable::default();
        assert_eq!(table.normalize("picture_day"), None);
        assert_eq!(table.normalize(""), None);
    }

    #[test]
    fn substituted_table_replaces_builtin_aliases() {
        let table = AliasTable::new([("snow_day", EventType::NoSchool)]);
        assert_eq!(table.normalize("snow_day"), Some(EventType::NoSchool));
        assert_eq!(table.normalize("holiday"), None);
    }

    #[test]
    fn serde_uses_snake_case_tags() {
        let json = serde_json::to_string(&EventType::ClosurePossible).unwrap();
        assert_eq!(json, "\"closure_possible\"");

        let parsed: EventType = serde_json::from_str("\"early_release\"").unwrap();
        assert_eq!(parsed, EventType::EarlyRelease);
    }
}
