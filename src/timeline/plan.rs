use crate::assets::VisualAsset;
use crate::assets::pool::VisualPool;
use crate::foundation::error::{ReelError, ReelResult};
use crate::foundation::math::Fnv1a64;

/// Tolerance used when deciding whether `duration / clip` is a whole number of slots.
const SLOT_COUNT_EPS: f64 = 1e-9;

/// One fixed-length segment of the output bound to a single image.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ClipSlot {
    /// Position in the timeline, `0..N`.
    pub index: usize,
    /// Start time in seconds.
    pub start_secs: f64,
    /// On-screen length in seconds, including the tail that plays under the next slot.
    pub duration_secs: f64,
    /// Image shown for this slot.
    pub asset: VisualAsset,
    /// `0` = fully desaturated, `1` = full colour.
    pub grade: f64,
    /// Crossfade length into the next slot; `0` for the final slot.
    pub overlap_secs: f64,
}

impl ClipSlot {
    /// Length of the slot before the next one starts.
    pub fn visible_secs(&self) -> f64 {
        self.duration_secs - self.overlap_secs
    }

    /// End of the visible window (start of the next slot).
    pub fn visible_end_secs(&self) -> f64 {
        self.start_secs + self.visible_secs()
    }
}

/// Ordered clip slots covering the narration.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Timeline {
    /// Narration length the timeline covers.
    pub narration_secs: f64,
    /// Nominal slot length.
    pub clip_duration_secs: f64,
    /// Slots in index order.
    pub slots: Vec<ClipSlot>,
}

impl Timeline {
    /// Number of slots.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// `true` when there are no slots.
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// `sum(duration) - sum(overlap)`: the length of the composited stream.
    pub fn composited_secs(&self) -> f64 {
        self.slots.iter().map(ClipSlot::visible_secs).sum()
    }

    /// End of the last slot's visible window; equals the narration length.
    pub fn visible_end_secs(&self) -> f64 {
        self.slots
            .last()
            .map(ClipSlot::visible_end_secs)
            .unwrap_or(0.0)
    }

    /// Grade values in slot order.
    pub fn grades(&self) -> Vec<f64> {
        self.slots.iter().map(|s| s.grade).collect()
    }

    /// Overlaps in slot order.
    pub fn overlaps(&self) -> Vec<f64> {
        self.slots.iter().map(|s| s.overlap_secs).collect()
    }

    /// Index of the slot whose visible window contains `t_secs`.
    ///
    /// Times before the first slot map to `0`, times past the end map to the last slot.
    pub fn slot_at(&self, t_secs: f64) -> usize {
        let after = self.slots.partition_point(|s| s.start_secs <= t_secs);
        after.saturating_sub(1).min(self.slots.len().saturating_sub(1))
    }

    /// Stable hash of every planned value.
    pub fn fingerprint(&self) -> u64 {
        let mut h = Fnv1a64::new_default();
        h.write_f64(self.narration_secs);
        h.write_f64(self.clip_duration_secs);
        h.write_u64(self.slots.len() as u64);
        for slot in &self.slots {
            h.write_u64(slot.index as u64);
            h.write_f64(slot.start_secs);
            h.write_f64(slot.duration_secs);
            h.write_f64(slot.grade);
            h.write_f64(slot.overlap_secs);
            h.write_bytes(slot.asset.id.as_bytes());
            h.write_u64(0xff);
        }
        h.finish()
    }

    /// Check the invariants the renderer depends on.
    pub fn check(&self) -> ReelResult<()> {
        if self.slots.is_empty() {
            return Err(ReelError::validation("timeline has no slots"));
        }
        let mut prev_grade = f64::NEG_INFINITY;
        for (i, slot) in self.slots.iter().enumerate() {
            if slot.index != i {
                return Err(ReelError::validation(format!(
                    "slot {i} carries index {}",
                    slot.index
                )));
            }
            if !(0.0..=1.0).contains(&slot.grade) {
                return Err(ReelError::validation(format!(
                    "slot {i} grade {} outside [0, 1]",
                    slot.grade
                )));
            }
            if slot.grade < prev_grade {
                return Err(ReelError::validation(format!(
                    "slot {i} grade {} decreases from {prev_grade}",
                    slot.grade
                )));
            }
            prev_grade = slot.grade;
            if slot.overlap_secs < 0.0 || slot.overlap_secs >= slot.duration_secs {
                return Err(ReelError::validation(format!(
                    "slot {i} overlap {} outside [0, {})",
                    slot.overlap_secs, slot.duration_secs
                )));
            }
        }
        Ok(())
    }
}

/// `ceil(narration / clip)`, snapping values within float noise of a whole number.
pub fn slot_count(narration_secs: f64, clip_duration_secs: f64) -> ReelResult<usize> {
    check_durations(narration_secs, clip_duration_secs)?;
    let q = narration_secs / clip_duration_secs;
    let rounded = q.round();
    let n = if (q - rounded).abs() < SLOT_COUNT_EPS {
        rounded
    } else {
        q.ceil()
    };
    Ok((n as usize).max(1))
}

/// Lay out `ceil(narration / clip)` slots and bind one pool asset to each.
///
/// All slots last exactly `clip_duration_secs` except the final one, which ends at
/// `narration_secs`. Grades and overlaps start at zero; the grade scheduler and the transition
/// compositor fill them in.
#[tracing::instrument(skip(pool), fields(pool = pool.len()))]
pub fn build(
    narration_secs: f64,
    clip_duration_secs: f64,
    pool: &VisualPool,
) -> ReelResult<Timeline> {
    let n = slot_count(narration_secs, clip_duration_secs)?;
    let assets = pool.select(n)?;

    let mut slots = Vec::with_capacity(n);
    for (i, asset) in assets.into_iter().enumerate() {
        let start_secs = i as f64 * clip_duration_secs;
        let duration_secs = if i + 1 == n {
            narration_secs - start_secs
        } else {
            clip_duration_secs
        };
        tracing::debug!(slot = i, start_secs, duration_secs, asset = %asset.id, "slot planned");
        slots.push(ClipSlot {
            index: i,
            start_secs,
            duration_secs,
            asset,
            grade: 0.0,
            overlap_secs: 0.0,
        });
    }

    tracing::info!(slots = n, narration_secs, clip_duration_secs, "timeline built");
    Ok(Timeline {
        narration_secs,
        clip_duration_secs,
        slots,
    })
}

fn check_durations(narration_secs: f64, clip_duration_secs: f64) -> ReelResult<()> {
    if !narration_secs.is_finite() || narration_secs <= 0.0 {
        return Err(ReelError::invalid_duration(format!(
            "narration duration must be finite and > 0, got {narration_secs}"
        )));
    }
    if !clip_duration_secs.is_finite() || clip_duration_secs <= 0.0 {
        return Err(ReelError::invalid_duration(format!(
            "clip duration must be finite and > 0, got {clip_duration_secs}"
        )));
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/timeline/plan.rs"]
mod tests;
