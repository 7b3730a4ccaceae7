//! Interval of ordered items
//!
//! Upper and lower limits may be open (unbounded) or closed, included or not included.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Interval<T> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lower: Option<T>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub upper: Option<T>,

    #[serde(default)]
    pub lower_unbounded: bool,

    #[serde(default)]
    pub upper_unbounded: bool,

    #[serde(default)]
    pub lower_included: bool,

    #[serde(default)]
    pub upper_included: bool,
}

impl<T: PartialOrd> Interval<T> {
    /// Whether `value` lies within the interval, honoring inclusion flags.
    ///
    /// A missing limit on a bounded side never matches.
    pub fn contains(&self, value: &T) -> bool {
        let above_lower = match (&self.lower, self.lower_unbounded) {
            (_, true) => true,
            (Some(lower), false) if self.lower_included => value >= lower,
            (Some(lower), false) => value > lower,
            (None, false) => false,
        };
        let below_upper = match (&self.upper, self.upper_unbounded) {
            (_, true) => true,
            (Some(upper), false) if self.upper_included => value <= upper,
            (Some(upper), false) => value < upper,
            (None, false) => false,
        };
        above_lower && below_upper
    }
}
