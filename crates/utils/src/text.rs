//! String helpers shared by the field mapping and search code.

use convert_case::{Case, Casing};

/// `iconName` -> `icon_name`
pub fn to_snake_case(input: &str) -> String {
    input.to_case(Case::Snake)
}

/// `createAssetCategory` -> `CreateAssetCategory`
pub fn to_pascal_case(input: &str) -> String {
    input.to_case(Case::Pascal)
}

/// Split a comma separated list, trimming entries and dropping empty ones.
pub fn split_comma_list(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(str::to_string)
        .collect()
}

/// Case-insensitive substring test. `needle_lower` must already be lower-cased.
pub fn contains_lowercase(haystack: &str, needle_lower: &str) -> bool {
    haystack.to_lowercase().contains(needle_lower)
}
