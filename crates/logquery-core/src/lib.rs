//! Query string construction for logquery
//!
//! This crate turns user input into safe, composable fragments of a
//! Lucene-like search syntax: escaping, boolean composition, negation,
//! field predicates and timestamp literals. Every function is pure.

mod compose;
mod escape;
mod timestamp;

pub use compose::{
    add_to_query, add_to_query_with, concat_query_strings, field_query, not, predicate,
};
pub use escape::{escape, is_phrase};
pub use timestamp::{format_timestamp, parse_timestamp};

// Re-export types used in our public API
pub use logquery_types::{
    ConcatOptions, INTERNAL_INDEXER_FORMAT, INVALID_DATE, MATCH_ALL, MISSING_BUCKET_NAME,
    Operator, QueryError, Term,
};
