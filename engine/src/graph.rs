//! Genealogy graph - pipeline orchestrator
//!
//! Owns the decorated population produced by one load: the generation
//! buckets, the relationship side table and the statistics record. The
//! graph is immutable once built; running the pipeline twice on the same
//! input yields the same graph.

use std::collections::BTreeMap;

use thiserror::Error;

use crate::filter;
use crate::identifier::MalformedIdentifier;
use crate::linking;
use crate::person::Person;
use crate::statistics::Statistics;

/// Stable handle to a person inside a [`GenealogyGraph`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PersonKey(pub(crate) usize);

/// Derived relationship links for one person. Kept in a side table so the
/// input records themselves stay untouched.
#[derive(Debug, Clone, Default)]
pub struct FamilyLinks {
    pub father: Option<PersonKey>,
    pub mother: Option<PersonKey>,
    /// Children in bucket (display) order.
    pub children: Vec<PersonKey>,
    /// Partners in bucket (display) order.
    pub partners: Vec<PersonKey>,
}

/// Options for one pipeline run.
#[derive(Debug, Clone)]
pub struct BuildOptions {
    /// Restrict the population to the ancestor+descendant closure of this
    /// identifier before linking. `None` or `""` keeps everyone.
    pub filter_anchor: Option<String>,
    /// Sex of ego; the empty identifier carries no relation token.
    pub ego_male: bool,
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self {
            filter_anchor: None,
            ego_male: true,
        }
    }
}

/// Errors that abort a pipeline run. No partial graph escapes.
#[derive(Debug, Error)]
pub enum GraphError {
    #[error(transparent)]
    Malformed(#[from] MalformedIdentifier),
    /// Two records resolve to the same canonical identifier slot.
    #[error("ambiguous identifier: `{id}` collides with `{existing}`")]
    AmbiguousIdentifier { id: String, existing: String },
    /// The population contains no record with the empty (ego) identifier.
    #[error("no ego record (empty identifier) in population")]
    MissingEgo,
}

/// The linked population: persons, their derived relationships and the
/// generation layout, plus headline statistics.
#[derive(Debug)]
pub struct GenealogyGraph {
    persons: Vec<Person>,
    links: Vec<FamilyLinks>,
    generations: BTreeMap<i32, Vec<PersonKey>>,
    ego: PersonKey,
    statistics: Statistics,
}

impl GenealogyGraph {
    /// Runs the whole pipeline: filter, validate + bucket + sort, link
    /// parents from ego outward, link children and partners, aggregate
    /// statistics.
    pub fn build(persons: Vec<Person>, options: &BuildOptions) -> Result<Self, GraphError> {
        let anchor = options.filter_anchor.as_deref().unwrap_or("");
        let persons = filter::filter_to_anchor(persons, anchor);

        let buckets = linking::bucket_persons(&persons)?;
        let mut links = vec![FamilyLinks::default(); persons.len()];
        linking::link_parents(&persons, &buckets, &mut links);
        linking::link_children_and_partners(&persons, &buckets, &mut links);

        let statistics = Statistics::aggregate(&persons, &buckets.by_generation, options.ego_male);

        Ok(Self {
            persons,
            links,
            generations: buckets.by_generation,
            ego: buckets.ego,
            statistics,
        })
    }

    pub fn person(&self, key: PersonKey) -> &Person {
        &self.persons[key.0]
    }

    pub fn links(&self, key: PersonKey) -> &FamilyLinks {
        &self.links[key.0]
    }

    /// The reference individual (empty identifier, generation 0).
    pub fn ego(&self) -> PersonKey {
        self.ego
    }

    pub fn statistics(&self) -> &Statistics {
        &self.statistics
    }

    /// Generations in ascending order, each bucket in display order.
    pub fn generations(&self) -> impl Iterator<Item = (i32, &[PersonKey])> {
        self.generations
            .iter()
            .map(|(generation, keys)| (*generation, keys.as_slice()))
    }

    pub fn generation(&self, generation: i32) -> Option<&[PersonKey]> {
        self.generations.get(&generation).map(Vec::as_slice)
    }

    /// Looks a person up by identifier.
    pub fn find(&self, id: &str) -> Option<PersonKey> {
        self.persons
            .iter()
            .position(|person| person.id == id)
            .map(PersonKey)
    }

    pub fn len(&self) -> usize {
        self.persons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.persons.is_empty()
    }
}
