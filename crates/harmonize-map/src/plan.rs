//! Harmonization plan construction.
//!
//! A plan is the ordered list of `(source, target, mapper)` entries that the
//! materialization engine applies. It is built by merging user overrides
//! with computed matches:
//!
//! - a `(source, target)` pair repeated within one list is an error
//! - across lists the user's entry wins and the computed one is dropped
//!   (or rejected under [`DuplicatePolicy::Reject`])
//! - order is user entries, then surviving computed entries

use std::collections::BTreeSet;

use tracing::debug;

use harmonize_model::{DuplicatePolicy, HarmonizeError, MatchingOptions, Result, ValueMatchingResult};

use crate::input::MappingRecord;
use crate::mapper::ValueMapper;
use crate::resolve::create_mapper;

/// One output column of a plan.
#[derive(Debug, Clone)]
pub struct HarmonizationPlanEntry {
    pub source: String,
    pub target: String,
    pub mapper: ValueMapper,
}

impl HarmonizationPlanEntry {
    pub fn new(source: impl Into<String>, target: impl Into<String>, mapper: ValueMapper) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            mapper,
        }
    }

    pub fn key(&self) -> String {
        harmonize_model::mapping_key(&self.source, &self.target)
    }
}

/// Ordered, duplicate-free plan entries.
#[derive(Debug, Clone, Default)]
pub struct HarmonizationPlan {
    entries: Vec<HarmonizationPlanEntry>,
}

impl HarmonizationPlan {
    pub fn entries(&self) -> &[HarmonizationPlanEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entry(&self, source: &str, target: &str) -> Option<&HarmonizationPlanEntry> {
        self.entries
            .iter()
            .find(|entry| entry.source == source && entry.target == target)
    }

    pub fn iter(&self) -> impl Iterator<Item = &HarmonizationPlanEntry> {
        self.entries.iter()
    }
}

impl<'a> IntoIterator for &'a HarmonizationPlan {
    type Item = &'a HarmonizationPlanEntry;
    type IntoIter = std::slice::Iter<'a, HarmonizationPlanEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

/// Builds a [`HarmonizationPlan`] from computed matches and user overrides.
#[derive(Debug, Clone, Default)]
pub struct PlanBuilder {
    options: MatchingOptions,
    computed: Vec<MappingRecord>,
    user: Vec<MappingRecord>,
}

impl PlanBuilder {
    pub fn new(options: MatchingOptions) -> Self {
        Self {
            options,
            computed: Vec::new(),
            user: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_computed<I>(mut self, records: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<MappingRecord>,
    {
        self.computed.extend(records.into_iter().map(Into::into));
        self
    }

    #[must_use]
    pub fn with_user<I>(mut self, records: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<MappingRecord>,
    {
        self.user.extend(records.into_iter().map(Into::into));
        self
    }

    pub fn build(self) -> Result<HarmonizationPlan> {
        check_duplicates(&self.computed)?;
        check_duplicates(&self.user)?;

        if self.options.duplicate_policy == DuplicatePolicy::Reject {
            let user_keys: BTreeSet<String> = self.user.iter().map(MappingRecord::key).collect();
            if let Some(record) = self.computed.iter().find(|r| user_keys.contains(&r.key())) {
                return Err(HarmonizeError::duplicate(&record.source, &record.target));
            }
        }

        let user_count = self.user.len();
        let mut seen = BTreeSet::new();
        let mut entries = Vec::new();
        for (idx, record) in self.user.into_iter().chain(self.computed).enumerate() {
            if !seen.insert(record.key()) {
                debug!(
                    source = %record.source,
                    target = %record.target,
                    "computed mapping overridden by user mapping"
                );
                continue;
            }
            let source = record.source.clone();
            let target = record.target.clone();
            let mapper = create_mapper(record.into())?;
            debug!(
                source = %source,
                target = %target,
                mapper = mapper.kind(),
                origin = if idx < user_count { "user" } else { "computed" },
                "resolved plan entry"
            );
            entries.push(HarmonizationPlanEntry::new(source, target, mapper));
        }

        Ok(HarmonizationPlan { entries })
    }
}

fn check_duplicates(records: &[MappingRecord]) -> Result<()> {
    let mut keys = BTreeSet::new();
    for record in records {
        if !keys.insert(record.key()) {
            return Err(HarmonizeError::duplicate(&record.source, &record.target));
        }
    }
    Ok(())
}

/// Merges computed value matches with user overrides into a plan.
pub fn update_mappings(
    computed: Vec<ValueMatchingResult>,
    user: Vec<MappingRecord>,
) -> Result<HarmonizationPlan> {
    update_mappings_with(computed, user, &MatchingOptions::default())
}

/// [`update_mappings`] with explicit options.
pub fn update_mappings_with<C>(
    computed: Vec<C>,
    user: Vec<MappingRecord>,
    options: &MatchingOptions,
) -> Result<HarmonizationPlan>
where
    C: Into<MappingRecord>,
{
    PlanBuilder::new(options.clone())
        .with_computed(computed)
        .with_user(user)
        .build()
}
