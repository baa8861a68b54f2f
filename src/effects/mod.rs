//! Pixel compositing and slot transitions.

pub(crate) mod composite;
pub(crate) mod transitions;
