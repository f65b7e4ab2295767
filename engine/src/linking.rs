//! Relationship linking passes
//!
//! Derives father/mother/children/partner edges purely from identifier
//! structure: bucket the population by generation, walk parent links
//! outward from ego, then match child and partner suffixes against the
//! adjacent buckets.

use std::collections::{BTreeMap, HashMap, HashSet, VecDeque};

use tracing::debug;

use crate::graph::{FamilyLinks, GraphError, PersonKey};
use crate::identifier::{self, Relation};
use crate::person::Person;

/// Population partitioned by generation, each bucket sorted into its
/// display order.
pub(crate) struct Buckets {
    pub by_generation: BTreeMap<i32, Vec<PersonKey>>,
    /// Generation of each person, parallel to the input slice.
    pub person_generation: Vec<i32>,
    pub ego: PersonKey,
}

/// Validates every identifier, partitions the population by generation and
/// sorts each bucket. Fails fast on malformed or ambiguous identifiers so
/// the linking passes below never see bad input.
pub(crate) fn bucket_persons(persons: &[Person]) -> Result<Buckets, GraphError> {
    let mut by_generation: BTreeMap<i32, Vec<PersonKey>> = BTreeMap::new();
    let mut person_generation = Vec::with_capacity(persons.len());
    // Duplicates are detected on the canonical form, so an unindexed `p`
    // collides with an explicit `p1` instead of occupying the same partner
    // slot twice.
    let mut seen: HashMap<String, usize> = HashMap::new();
    let mut ego = None;

    for (index, person) in persons.iter().enumerate() {
        let generation = identifier::generation_of(&person.id)?;
        let canonical = identifier::comparable_id(&person.id);
        if let Some(&existing) = seen.get(&canonical) {
            return Err(GraphError::AmbiguousIdentifier {
                id: person.id.clone(),
                existing: persons[existing].id.clone(),
            });
        }
        seen.insert(canonical, index);

        by_generation
            .entry(generation)
            .or_default()
            .push(PersonKey(index));
        person_generation.push(generation);
        if person.id.is_empty() {
            ego = Some(PersonKey(index));
        }
    }

    for keys in by_generation.values_mut() {
        keys.sort_by(|a, b| identifier::compare_ids(&persons[a.0].id, &persons[b.0].id));
    }

    let ego = ego.ok_or(GraphError::MissingEgo)?;
    debug!(
        persons = persons.len(),
        buckets = by_generation.len(),
        "population bucketed"
    );
    Ok(Buckets {
        by_generation,
        person_generation,
        ego,
    })
}

/// Walks parent links outward from ego with an explicit worklist: for each
/// reached person, the record one generation up whose identifier appends a
/// single `f` (`m`) token becomes the father (mother), and is enqueued to
/// continue the ascent. Persons not reachable from ego simply keep no
/// parent links; that is a valid terminal state, not an error.
pub(crate) fn link_parents(persons: &[Person], buckets: &Buckets, links: &mut [FamilyLinks]) {
    let mut queue = VecDeque::from([buckets.ego]);
    let mut visited: HashSet<usize> = HashSet::new();
    let mut linked = 0usize;

    while let Some(key) = queue.pop_front() {
        if !visited.insert(key.0) {
            continue;
        }

        let parent_generation = buckets.person_generation[key.0] + 1;
        let Some(candidates) = buckets.by_generation.get(&parent_generation) else {
            continue;
        };

        let child_id = &persons[key.0].id;
        let father_id = format!("{child_id}f");
        let mother_id = format!("{child_id}m");
        for &candidate in candidates {
            let candidate_id = &persons[candidate.0].id;
            if *candidate_id == father_id {
                links[key.0].father = Some(candidate);
                linked += 1;
                queue.push_back(candidate);
            } else if *candidate_id == mother_id {
                links[key.0].mother = Some(candidate);
                linked += 1;
                queue.push_back(candidate);
            }
        }
    }

    debug!(parents = linked, "parent links derived");
}

/// Links children and partners for every person in a single pass over the
/// buckets: a child sits one generation down and appends an optional
/// partner token plus exactly one son/daughter token; a partner sits in the
/// same bucket and appends exactly one partner token. Bucket order is
/// preserved in the collected links.
pub(crate) fn link_children_and_partners(
    persons: &[Person],
    buckets: &Buckets,
    links: &mut [FamilyLinks],
) {
    let mut children = 0usize;
    let mut partners = 0usize;

    for keys in buckets.by_generation.values() {
        for &key in keys {
            let person_id = &persons[key.0].id;
            let generation = buckets.person_generation[key.0];

            if let Some(candidates) = buckets.by_generation.get(&(generation - 1)) {
                for &candidate in candidates {
                    if let Some(rest) = persons[candidate.0].id.strip_prefix(person_id.as_str()) {
                        if is_child_suffix(rest) {
                            links[key.0].children.push(candidate);
                            children += 1;
                        }
                    }
                }
            }

            if let Some(candidates) = buckets.by_generation.get(&generation) {
                for &candidate in candidates {
                    if let Some(rest) = persons[candidate.0].id.strip_prefix(person_id.as_str()) {
                        if is_partner_suffix(rest) {
                            links[key.0].partners.push(candidate);
                            partners += 1;
                        }
                    }
                }
            }
        }
    }

    debug!(children, partners, "child and partner links derived");
}

/// Suffix test for a child: an optional partner token, then exactly one
/// son/daughter token. A suffix that does not start on a token boundary
/// (e.g. the `2s` left over from stripping `f` off `f2s`) never matches.
fn is_child_suffix(rest: &str) -> bool {
    let Ok(tokens) = identifier::tokenize(rest) else {
        return false;
    };
    match tokens.as_slice() {
        [child] => matches!(child.relation, Relation::Son | Relation::Daughter),
        [partner, child] => {
            partner.relation == Relation::Partner
                && matches!(child.relation, Relation::Son | Relation::Daughter)
        }
        _ => false,
    }
}

/// Suffix test for a partner: exactly one partner token.
fn is_partner_suffix(rest: &str) -> bool {
    match identifier::tokenize(rest) {
        Ok(tokens) => matches!(tokens.as_slice(), [token] if token.relation == Relation::Partner),
        Err(_) => false,
    }
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

    fn bucket_ids<'a>(persons: &'a [Person], buckets: &Buckets, generation: i32) -> Vec<&'a str> {
        buckets.by_generation[&generation]
            .iter()
            .map(|key| persons[key.0].id.as_str())
            .collect()
    }

    fn find(persons: &[Person], id: &str) -> usize {
        persons.iter().position(|person| person.id == id).unwrap()
    }

    #[test]
    fn test_bucket_partition_and_order() {
        let persons = population(&["", "f", "m", "ff", "fm", "s1", "d1"]);
        let buckets = bucket_persons(&persons).unwrap();

        assert_eq!(buckets.by_generation.len(), 4);
        assert_eq!(bucket_ids(&persons, &buckets, 0), vec![""]);
        assert_eq!(bucket_ids(&persons, &buckets, 1), vec!["f", "m"]);
        assert_eq!(bucket_ids(&persons, &buckets, 2), vec!["ff", "fm"]);
        assert_eq!(bucket_ids(&persons, &buckets, -1), vec!["s1", "d1"]);
        assert_eq!(persons[buckets.ego.0].id, "");
    }

    #[test]
    fn test_bucket_rejects_malformed() {
        let persons = population(&["", "fx"]);
        assert!(matches!(
            bucket_persons(&persons),
            Err(GraphError::Malformed(_))
        ));
    }

    #[test]
    fn test_bucket_rejects_duplicates() {
        let persons = population(&["", "f", "f"]);
        assert!(matches!(
            bucket_persons(&persons),
            Err(GraphError::AmbiguousIdentifier { .. })
        ));

        // An unindexed partner and an explicit `p1` claim the same slot.
        let persons = population(&["", "p", "p1"]);
        assert!(matches!(
            bucket_persons(&persons),
            Err(GraphError::AmbiguousIdentifier { .. })
        ));
    }

    #[test]
    fn test_bucket_requires_ego() {
        let persons = population(&["f", "m"]);
        assert!(matches!(
            bucket_persons(&persons),
            Err(GraphError::MissingEgo)
        ));
    }

    #[test]
    fn test_parent_links_ascend_from_ego() {
        let persons = population(&["", "f", "m", "ff", "fm", "s1", "d1"]);
        let buckets = bucket_persons(&persons).unwrap();
        let mut links = vec![FamilyLinks::default(); persons.len()];
        link_parents(&persons, &buckets, &mut links);

        let ego = find(&persons, "");
        let father = find(&persons, "f");
        assert_eq!(links[ego].father, Some(PersonKey(father)));
        assert_eq!(links[ego].mother, Some(PersonKey(find(&persons, "m"))));
        assert_eq!(links[father].father, Some(PersonKey(find(&persons, "ff"))));
        assert_eq!(links[father].mother, Some(PersonKey(find(&persons, "fm"))));
        // Descendants have no recorded parents in this population.
        assert_eq!(links[find(&persons, "s1")].father, None);
    }

    #[test]
    fn test_parent_links_skip_unreachable_branch() {
        // "fs" is ego's half-sibling; the ascent from ego never reaches it,
        // so its father link stays empty even though "f" is present.
        let persons = population(&["", "f", "fs"]);
        let buckets = bucket_persons(&persons).unwrap();
        let mut links = vec![FamilyLinks::default(); persons.len()];
        link_parents(&persons, &buckets, &mut links);

        assert_eq!(links[find(&persons, "")].father, Some(PersonKey(1)));
        assert_eq!(links[find(&persons, "fs")].father, None);
    }

    #[test]
    fn test_child_links() {
        let persons = population(&["", "f", "m", "ff", "fm", "s1", "d1"]);
        let buckets = bucket_persons(&persons).unwrap();
        let mut links = vec![FamilyLinks::default(); persons.len()];
        link_children_and_partners(&persons, &buckets, &mut links);

        let ego = find(&persons, "");
        let child_ids: Vec<&str> = links[ego]
            .children
            .iter()
            .map(|key| persons[key.0].id.as_str())
            .collect();
        assert_eq!(child_ids, vec!["s1", "d1"]);

        // A child's identifier extends its parent's, so ego (empty id) never
        // appears in "f"'s children; that edge exists as ego's father link.
        let father = find(&persons, "f");
        assert!(links[father].children.is_empty());
    }

    #[test]
    fn test_partner_links() {
        let persons = population(&["", "p"]);
        let buckets = bucket_persons(&persons).unwrap();
        let mut links = vec![FamilyLinks::default(); persons.len()];
        link_children_and_partners(&persons, &buckets, &mut links);

        assert_eq!(links[0].partners, vec![PersonKey(1)]);
        // The partner record itself carries no partner link back.
        assert!(links[1].partners.is_empty());
    }

    #[test]
    fn test_children_through_partner_attach_to_both() {
        // "ps" is a step-child path: child of ego's partner, and a child
        // candidate for ego as well via the optional partner marker.
        let persons = population(&["", "p", "ps"]);
        let buckets = bucket_persons(&persons).unwrap();
        let mut links = vec![FamilyLinks::default(); persons.len()];
        link_children_and_partners(&persons, &buckets, &mut links);

        let step_child = PersonKey(find(&persons, "ps"));
        assert_eq!(links[find(&persons, "")].children, vec![step_child]);
        assert_eq!(links[find(&persons, "p")].children, vec![step_child]);
    }

    #[test]
    fn test_index_misaligned_suffix_is_no_child() {
        // "f12s" is the first child of father #12, not a child of "f1"
        // with a stray digit.
        let persons = population(&["", "f1", "f12s"]);
        let buckets = bucket_persons(&persons).unwrap();
        let mut links = vec![FamilyLinks::default(); persons.len()];
        link_children_and_partners(&persons, &buckets, &mut links);

        assert!(links[find(&persons, "f1")].children.is_empty());
    }
}
