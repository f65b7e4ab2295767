//! Population statistics
//!
//! Thin counters over the linked population, plus the life-span helper used
//! to sanity-check the graph against the event data.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::graph::PersonKey;
use crate::identifier;
use crate::person::{Event, Person, Sex};

/// Headline counters for one linked population.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Statistics {
    pub persons_total: u32,
    pub persons_male: u32,
    pub persons_female: u32,
    /// Number of generation buckets present.
    pub generation_count: u32,
    /// Largest (oldest) generation index present.
    pub oldest_generation: i32,
}

impl Statistics {
    /// Tallies the population once. Sex is derived from the trailing
    /// relation token of each identifier (partners count as neither); ego's
    /// sex comes from `ego_male`. Identifiers are assumed validated by the
    /// bucketing pass.
    pub fn aggregate(
        persons: &[Person],
        generations: &BTreeMap<i32, Vec<PersonKey>>,
        ego_male: bool,
    ) -> Self {
        let mut stats = Statistics {
            persons_total: persons.len() as u32,
            generation_count: generations.len() as u32,
            oldest_generation: generations.keys().next_back().copied().unwrap_or(0),
            ..Default::default()
        };

        for person in persons {
            match identifier::sex_of_identifier(&person.id, ego_male).unwrap_or(None) {
                Some(Sex::Male) => stats.persons_male += 1,
                Some(Sex::Female) => stats.persons_female += 1,
                None => {}
            }
        }

        stats
    }
}

/// Number of days between a person's birth and death events. Both years
/// must be recorded; a missing month defaults to June, a missing day to the
/// 15th of the month.
pub fn life_span_days(person: &Person) -> Option<i64> {
    let birth = event_date(person.birth.as_ref()?)?;
    let death = event_date(person.death.as_ref()?)?;
    Some((death - birth).num_days())
}

/// Whole-year form of [`life_span_days`].
pub fn life_span_years(person: &Person) -> Option<i64> {
    life_span_days(person).map(|days| days / 365)
}

fn event_date(event: &Event) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(event.year?, event.month.unwrap_or(6), event.day.unwrap_or(15))
}
