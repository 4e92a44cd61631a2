/*!
# `jsonmatch` Library

Composable JSON object filters: declarative predicates that decide whether
a JSON document matches a condition, with a canonical JSON wire form for
the conditions themselves.
*/

pub mod commands;
pub mod filter;
pub mod path;
pub mod utils;
