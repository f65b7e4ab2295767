//! Subtree filter
//!
//! Narrows the population to the ancestors and descendants of an anchor
//! person before any bucketing or linking happens.

use crate::person::Person;

/// Keeps every person whose identifier is related to `anchor` by prefix in
/// either direction: the anchor's line upward (the anchor identifier starts
/// with the person's) and downward (the person's identifier starts with the
/// anchor's), plus the anchor itself. An empty anchor keeps the input
/// unchanged.
pub fn filter_to_anchor(persons: Vec<Person>, anchor: &str) -> Vec<Person> {
    if anchor.is_empty() {
        return persons;
    }

    persons
        .into_iter()
        .filter(|person| person.id.starts_with(anchor) || anchor.starts_with(&person.id))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn population(ids: &[&str]) -> Vec<Person> {
        ids.iter()
            .map(|id| Person {
                id: id.to_string(),
                ..Default::default()
            })
            .collect()
    }

    fn ids(persons: &[Person]) -> Vec<&str> {
        persons.iter().map(|person| person.id.as_str()).collect()
    }

    #[test]
    fn test_filter_keeps_prefix_relatives() {
        let filtered = filter_to_anchor(population(&["", "f", "m", "ff", "s1"]), "f");
        assert_eq!(ids(&filtered), vec!["", "f", "ff"]);
    }

    #[test]
    fn test_empty_anchor_keeps_everyone() {
        let filtered = filter_to_anchor(population(&["", "f", "m", "s1"]), "");
        assert_eq!(ids(&filtered), vec!["", "f", "m", "s1"]);
    }

    #[test]
    fn test_filter_idempotent() {
        let once = filter_to_anchor(population(&["", "f", "m", "ff", "fs", "s1"]), "ff");
        let twice = filter_to_anchor(once.clone(), "ff");
        assert_eq!(ids(&once), ids(&twice));
    }
}
