use crate::foundation::error::{ReelError, ReelResult};
use crate::timeline::plan::Timeline;

/// What the compositor shows at one instant.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SlotBlend {
    /// One slot, unblended.
    Single(usize),
    /// Linear cross-dissolve from `from` to `to`; `t = 0` is all `from`, `t = 1` is all `to`.
    Crossfade {
        /// Outgoing slot.
        from: usize,
        /// Incoming slot.
        to: usize,
        /// Progress through the overlap window.
        t: f32,
    },
}

/// Assign a crossfade of `overlap_fraction * clip_duration` to every boundary.
///
/// The final slot gets no overlap. Each overlap is capped at the next slot's visible length so a
/// short final slot is never swallowed. An overlapped slot is lengthened by its overlap: its tail
/// plays under the start of the next slot, so start times are unchanged and
/// `sum(duration) - sum(overlap)` stays equal to the narration length. Re-annotating replaces any
/// previous overlaps.
#[tracing::instrument(skip(timeline), fields(slots = timeline.len()))]
pub fn annotate(mut timeline: Timeline, overlap_fraction: f64) -> ReelResult<Timeline> {
    if !overlap_fraction.is_finite() || !(0.0..1.0).contains(&overlap_fraction) {
        return Err(ReelError::invalid_overlap(format!(
            "overlap fraction must be in [0, 1), got {overlap_fraction}"
        )));
    }

    for slot in &mut timeline.slots {
        slot.duration_secs -= slot.overlap_secs;
        slot.overlap_secs = 0.0;
    }

    let nominal = overlap_fraction * timeline.clip_duration_secs;
    let n = timeline.slots.len();
    for i in 0..n.saturating_sub(1) {
        let next_visible = timeline.slots[i + 1].duration_secs;
        let overlap = nominal.min(next_visible).max(0.0);
        let slot = &mut timeline.slots[i];
        slot.overlap_secs = overlap;
        slot.duration_secs += overlap;
        if overlap < nominal {
            tracing::debug!(slot = i, overlap, nominal, "overlap capped by next slot");
        }
    }

    Ok(timeline)
}

/// Resolve which slot(s) are on screen at `t_secs`.
///
/// Inside the overlap window `[start_{i+1}, start_{i+1} + t_i)` the outgoing slot `i` dissolves
/// linearly into slot `i + 1`.
pub fn blend_at(timeline: &Timeline, t_secs: f64) -> SlotBlend {
    let cur = timeline.slot_at(t_secs);
    if cur == 0 {
        return SlotBlend::Single(0);
    }
    let prev = &timeline.slots[cur - 1];
    let window_start = timeline.slots[cur].start_secs;
    let into = t_secs - window_start;
    if prev.overlap_secs > 0.0 && into >= 0.0 && into < prev.overlap_secs {
        return SlotBlend::Crossfade {
            from: cur - 1,
            to: cur,
            t: (into / prev.overlap_secs) as f32,
        };
    }
    SlotBlend::Single(cur)
}

#[cfg(test)]
#[path = "../../tests/unit/effects/transitions.rs"]
mod tests;
