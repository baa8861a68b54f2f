//! Turning an annotated timeline into an encoded video and its cover frame.

pub(crate) mod pipeline;
pub(crate) mod thumbnail;
