//! Deterministic planning: slot layout and the colour-grade ramp.

pub(crate) mod grade;
pub(crate) mod plan;
