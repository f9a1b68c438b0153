use chrono::{Datelike, Days, NaiveDate};
use std::collections::BTreeMap;

use super::dates::{days_in_month, month_name, weekday_index};
use super::event::Event;

#[derive(Debug, Clone, PartialEq)]
pub struct EventGroup {
    pub label: String,
    pub events: Vec<Event>,
}

fn overlapping_events(events: &[Event], start: NaiveDate, end: NaiveDate) -> Vec<Event> {
    let mut matched: Vec<Event> = events
        .iter()
        .filter(|event| {
            event
                .span()
                .is_some_and(|(event_start, event_end)| event_start <= end && start <= event_end)
        })
        .cloned()
        .collect();
    matched.sort_by_key(Event::effective_date);
    matched
}

fn push_group(groups: &mut Vec<EventGroup>, label: &str, events: Vec<Event>) {
    if !events.is_empty() {
        groups.push(EventGroup {
            label: label.to_string(),
            events,
        });
    }
}

fn month_end(year: i32, month: u32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month, days_in_month(year, month))
}

fn next_month(year: i32, month: u32) -> (i32, u32) {
    if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    }
}

// "This Week" runs from the reference date to the Saturday closing its
// Sunday-start week; "Next Week" is the following full week.
pub fn upcoming_groups(events: &[Event], reference: NaiveDate) -> Vec<EventGroup> {
    let mut groups = Vec::new();

    let days_left = 6 - weekday_index(reference);
    let Some(week_end) = reference.checked_add_days(Days::new(days_left as u64)) else {
        return groups;
    };
    push_group(
        &mut groups,
        "This Week",
        overlapping_events(events, reference, week_end),
    );

    let Some(next_week_start) = week_end.checked_add_days(Days::new(1)) else {
        return groups;
    };
    let Some(next_week_end) = week_end.checked_add_days(Days::new(7)) else {
        return groups;
    };
    push_group(
        &mut groups,
        "Next Week",
        overlapping_events(events, next_week_start, next_week_end),
    );

    if let (Some(later_start), Some(later_end)) = (
        next_week_end.checked_add_days(Days::new(1)),
        month_end(reference.year(), reference.month()),
    ) && later_start <= later_end
    {
        push_group(
            &mut groups,
            "Later This Month",
            overlapping_events(events, later_start, later_end),
        );
    }

    let (coming_year, coming_month) = next_month(reference.year(), reference.month());
    if let (Some(coming_start), Some(coming_end)) = (
        NaiveDate::from_ymd_opt(coming_year, coming_month, 1),
        month_end(coming_year, coming_month),
    ) {
        push_group(
            &mut groups,
            month_name(coming_month),
            overlapping_events(events, coming_start, coming_end),
        );
    }

    groups
}

// Exhaustive browse view: every well-formed event, keyed by the month of its
// effective start date.
pub fn month_groups(events: &[Event]) -> Vec<EventGroup> {
    let mut buckets: BTreeMap<(i32, u32), Vec<Event>> = BTreeMap::new();

    for event in events {
        let Some(start) = event.effective_date() else {
            continue;
        };
        buckets
            .entry((start.year(), start.month()))
            .or_default()
            .push(event.clone());
    }

    buckets
        .into_iter()
        .map(|((year, month), mut grouped)| {
            grouped.sort_by_key(Event::effective_date);
            EventGroup {
                label: format!("{} {}", month_name(month), year),
                events: grouped,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use crate::calendar::event::generate_id;
    use crate::calendar::event_type::EventType;

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    fn event_on(day: NaiveDate, label: &str) -> Event {
        Event {
            id: generate_id(),
            date: Some(day),
            start_date: None,
            end_date: None,
            event_type: EventType::PtsaEvent,
            label: label.to_string(),
            notes: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn range_event(start: NaiveDate, end: NaiveDate, label: &str) -> Event {
        Event {
            id: generate_id(),
            date: None,
            start_date: Some(start),
            end_date: Some(end),
            event_type: EventType::NoSchool,
            label: label.to_string(),
            notes: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn labels(group: &EventGroup) -> Vec<&str> {
        group.events.iter().map(|e| e.label.as_str()).collect()
    }

    #[test]
    fn monday_reference_week_ends_on_saturday() {
        // Monday Oct 6, 2025. Saturday is 10/11; Sunday 10/12 opens next week.
        let reference = date(2025, 10, 6);
        let events = vec![
            event_on(date(2025, 10, 11), "Saturday event"),
            event_on(date(2025, 10, 12), "Sunday event"),
        ];

        let groups = upcoming_groups(&events, reference);

        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].label, "This Week");
        assert_eq!(labels(&groups[0]), ["Saturday event"]);
        assert_eq!(groups[1].label, "Next Week");
        assert_eq!(labels(&groups[1]), ["Sunday event"]);
    }

    #[test]
    fn event_before_reference_is_excluded() {
        let reference = date(2025, 10, 8);
        let events = vec![event_on(date(2025, 10, 6), "Earlier this week")];

        assert!(upcoming_groups(&events, reference).is_empty());
    }

    #[test]
    fn empty_groups_are_omitted() {
        let reference = date(2025, 10, 6);
        let events = vec![event_on(date(2025, 10, 7), "Only this week")];

        let groups = upcoming_groups(&events, reference);

        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].label, "This Week");
    }

    #[test]
    fn later_this_month_captures_tail_of_month() {
        // From Oct 1 (Wednesday): next week ends 10/11, leaving 10/12-10/31.
        let reference = date(2025, 10, 1);
        let events = vec![event_on(date(2025, 10, 20), "Late October")];

        let groups = upcoming_groups(&events, reference);

        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].label, "Later This Month");
    }

    #[test]
    fn month_tail_swallowed_by_next_week_is_skipped() {
        // From Nov 24, next week ends Dec 6; nothing of November remains.
        let reference = date(2025, 11, 24);
        let events = vec![event_on(date(2025, 11, 29), "End of November")];

        let groups = upcoming_groups(&events, reference);

        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].label, "This Week");
    }

    #[test]
    fn next_month_bucket_is_labeled_with_month_name() {
        let reference = date(2025, 10, 6);
        let events = vec![event_on(date(2025, 11, 27), "Thanksgiving Break")];

        let groups = upcoming_groups(&events, reference);

        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].label, "November");
    }

    #[test]
    fn december_reference_rolls_into_january() {
        let reference = date(2025, 12, 1);
        let events = vec![event_on(date(2026, 1, 19), "MLK Day")];

        let groups = upcoming_groups(&events, reference);

        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].label, "January");
    }

    #[test]
    fn range_overlapping_a_week_counts_as_member() {
        // Break starts the Friday of this week and runs into next week.
        let reference = date(2025, 12, 15);
        let events = vec![range_event(date(2025, 12, 19), date(2025, 12, 31), "Winter Break")];

        let groups = upcoming_groups(&events, reference);

        assert_eq!(groups[0].label, "This Week");
        assert_eq!(labels(&groups[0]), ["Winter Break"]);
        assert_eq!(groups[1].label, "Next Week");
    }

    #[test]
    fn groups_are_sorted_by_effective_date() {
        let reference = date(2025, 10, 6);
        let events = vec![
            event_on(date(2025, 10, 10), "Later"),
            event_on(date(2025, 10, 7), "Sooner"),
        ];

        let groups = upcoming_groups(&events, reference);

        assert_eq!(labels(&groups[0]), ["Sooner", "Later"]);
    }

    #[test]
    fn malformed_event_is_left_out_of_buckets() {
        let mut broken = event_on(date(2025, 10, 7), "Broken");
        broken.date = None;
        let events = vec![broken];

        assert!(upcoming_groups(&events, date(2025, 10, 6)).is_empty());
        assert!(month_groups(&events).is_empty());
    }

    #[test]
    fn month_groups_are_chronological_and_labeled() {
        let events = vec![
            event_on(date(2026, 1, 19), "MLK Day"),
            event_on(date(2025, 9, 2), "First Day"),
            event_on(date(2025, 9, 25), "Curriculum Night"),
            event_on(date(2025, 9, 10), "PTSA Meeting"),
        ];

        let groups = month_groups(&events);

        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].label, "September 2025");
        assert_eq!(
            labels(&groups[0]),
            ["First Day", "PTSA Meeting", "Curriculum Night"]
        );
        assert_eq!(groups[1].label, "January 2026");
    }

    #[test]
    fn month_groups_use_range_start_month() {
        let events = vec![range_event(
            date(2025, 12, 22),
            date(2026, 1, 2),
            "Winter Break",
        )];

        let groups = month_groups(&events);

        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].label, "December 2025");
    }
}
