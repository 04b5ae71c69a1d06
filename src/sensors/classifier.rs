//! Object classification from one sonar + infrared sample.
//!
//! Two predicates, four outcomes:
//!
//! |                  | `ir < thr.ir` | `ir >= thr.ir` |
//! |------------------|---------------|----------------|
//! | `sonar < thr`    | Glass         | Plastic        |
//! | `sonar >= thr`   | Disagreement  | Aluminum       |
//!
//! Equality always falls on the `>=` side.

use serde::{Deserialize, Serialize};

use crate::config::Thresholds;

use super::Distance;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Category {
    Glass,
    Plastic,
    Aluminum,
    /// The sensors contradict each other; not a material.
    Disagreement,
}

/// One classified sample, as reported on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Classification {
    pub category: Category,
    pub distance: Distance,
}

pub fn classify(distance: Distance, thresholds: Thresholds) -> Category {
    let near = distance.sonar < thresholds.sonar;
    let dark = distance.infrared < thresholds.ir;
    match (near, dark) {
        (true, true) => Category::Glass,
        (true, false) => Category::Plastic,
        (false, false) => Category::Aluminum,
        (false, true) => Category::Disagreement,
    }
}
