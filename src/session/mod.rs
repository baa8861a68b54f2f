//! Run bracketing: directory lifecycle and the end-to-end pipeline.

pub(crate) mod reel_session;
pub(crate) mod workspace;

pub use reel_session::{PlanReport, PlannedReel, ReelSession, RenderedArtifact, ScriptFields, UploadManifest};
pub use workspace::Workspace;
