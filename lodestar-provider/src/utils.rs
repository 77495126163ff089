//! Utility functions for region values

use std::sync::LazyLock;

use regex::Regex;

static REGION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-z]{2}(-gov|-iso[a-z]?)?-[a-z]+-\d+$").expect("region pattern is valid")
});

/// Normalize region value (e.g., "aws.Region.ap_northeast_1" -> "ap-northeast-1")
pub fn normalize_region(s: &str) -> String {
    let region_part = if s.contains('.') {
        s.split('.').next_back().unwrap_or(s)
    } else {
        s
    };
    region_part.replace('_', "-")
}

/// Whether `s` is a region name in AWS format
pub fn is_valid_region(s: &str) -> bool {
    REGION.is_match(s)
}
