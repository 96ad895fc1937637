#![deny(unsafe_code)]

//! Column and value matching, value mapper resolution and harmonization
//! plan construction.

pub mod columns;
pub mod domain;
pub mod input;
pub mod mapper;
pub mod plan;
pub mod resolve;
pub mod strategy;
pub mod utils;
pub mod values;

pub use columns::{match_columns, match_columns_with};
pub use domain::{Target, TargetDomains, load_table, preview_domains, resolve_domain};
pub use input::{MapperInput, MappingRecord, MatchEntry, records_from_json, records_from_table};
pub use mapper::{DictionaryMapper, FunctionMapper, ValueFn, ValueMapper};
pub use plan::{
    HarmonizationPlan, HarmonizationPlanEntry, PlanBuilder, update_mappings, update_mappings_with,
};
pub use resolve::create_mapper;
pub use strategy::{
    ColumnMatcher, ColumnMatcherRegistry, ColumnMatchingMethod, Registry, ValueMatcher,
    ValueMatcherRegistry, ValueMatchingMethod,
};
pub use values::{match_values, match_values_in_domains, match_values_with};
