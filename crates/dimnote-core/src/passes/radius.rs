//! Radius-callout tagging.
//!
//! A fragment whose text contains a capital `R` followed by one or more
//! digits (e.g. "R12") is a radius callout in the drawing styles this was
//! tuned on. The match is case-sensitive and unanchored: "⌀R10" counts.

use once_cell::sync::Lazy;
use regex::Regex;

use super::{AttributeChange, Patch};
use crate::Detection;

static RADIUS_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new("R[0-9]+").expect("static pattern compiles"));

/// Single state-free pass: one patch per detection whose text matches the
/// radius pattern. Idempotent by construction.
pub fn radius_patches(detections: &[Detection]) -> Vec<Patch> {
    detections
        .iter()
        .enumerate()
        .filter(|(_, detection)| RADIUS_PATTERN.is_match(&detection.text))
        .map(|(index, _)| Patch {
            target: index,
            change: AttributeChange::Radius,
        })
        .collect()
}
