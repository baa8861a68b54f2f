use crate::timeline::plan::Timeline;

/// Grade for slot `index` of `count`: a linear ramp from black-and-white to full colour.
///
/// A single slot has nothing to ramp across and gets full colour.
pub fn grade_for(index: usize, count: usize) -> f64 {
    if count <= 1 {
        return 1.0;
    }
    let last = (count - 1) as f64;
    (index.min(count - 1) as f64 / last).clamp(0.0, 1.0)
}

/// Assign `g_i = i / (N - 1)` to every slot.
///
/// The result is non-decreasing in slot order with `g_0 = 0` and `g_{N-1} = 1` whenever `N > 1`.
#[tracing::instrument(skip(timeline), fields(slots = timeline.len()))]
pub fn annotate(mut timeline: Timeline) -> Timeline {
    let n = timeline.slots.len();
    for slot in &mut timeline.slots {
        slot.grade = grade_for(slot.index, n);
    }
    timeline
}

#[cfg(test)]
#[path = "../../tests/unit/timeline/grade.rs"]
mod tests;
