use chrono::NaiveDate;

use super::dates::is_wednesday;
use super::event::Event;
use super::event_type::EventType;
use crate::storage::config::SchoolYearConfig;

// Ordered set: first-seen order, duplicates suppressed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MarkSet {
    marks: Vec<EventType>,
}

impl MarkSet {
    pub fn insert(&mut self, mark: EventType) -> bool {
        if self.contains(mark) {
            return false;
        }
        self.marks.push(mark);
        true
    }

    pub fn contains(&self, mark: EventType) -> bool {
        self.marks.contains(&mark)
    }

    pub fn len(&self) -> usize {
        self.marks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.marks.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = EventType> + '_ {
        self.marks.iter().copied()
    }

    pub fn as_slice(&self) -> &[EventType] {
        &self.marks
    }
}

impl FromIterator<EventType> for MarkSet {
    fn from_iter<I: IntoIterator<Item = EventType>>(iter: I) -> Self {
        let mut set = MarkSet::default();
        for mark in iter {
            set.insert(mark);
        }
        set
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DayMarks {
    pub marks: MarkSet,
    pub has_diamond: bool,
    pub has_circle: bool,
    pub show_asterisk: bool,
}

pub fn day_marks(events: &[Event], date: NaiveDate, config: &SchoolYearConfig) -> MarkSet {
    let mut marks: MarkSet = events
        .iter()
        .filter(|event| event.covers(date))
        .map(|event| event.event_type)
        .collect();

    // Wednesdays during the school year are early release, unless the day is
    // already a no-school or half day. The inference only adds a mark.
    if is_wednesday(date)
        && config.early_release_start <= date
        && date <= config.school_year_end
        && !marks.contains(EventType::NoSchool)
        && !marks.contains(EventType::HalfDay)
    {
        marks.insert(EventType::EarlyRelease);
    }

    marks
}

pub fn derive_day(events: &[Event], date: NaiveDate, config: &SchoolYearConfig) -> DayMarks {
    let marks = day_marks(events, date, config);
    let has_diamond = config.is_diamond_day(date);
    let has_circle = marks.contains(EventType::PtsaEvent);
    let show_asterisk = show_asterisk(&marks, has_diamond, has_circle);

    DayMarks {
        marks,
        has_diamond,
        has_circle,
        show_asterisk,
    }
}

// Clause order is load-bearing; see the grid legend for what the asterisk means.
pub fn show_asterisk(marks: &MarkSet, has_diamond: bool, has_circle: bool) -> bool {
    if marks.contains(EventType::NoSchool) || marks.contains(EventType::HalfDay) {
        return marks.len() > 1
            && marks.contains(EventType::EarlyRelease)
            && !marks.contains(EventType::PtsaEvent);
    }

    if marks.contains(EventType::EarlyRelease) && marks.len() == 1 {
        return false;
    }

    if marks.contains(EventType::FirstDay) || marks.contains(EventType::LastDay) {
        return has_diamond || has_circle;
    }

    !marks.is_empty() && !marks.contains(EventType::PtsaEvent)
}
