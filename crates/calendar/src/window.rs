//! Circular fit windows over the group-key ring.

use crate::key::GroupKey;

/// Normalizes a fit window size: 0 means "target key only" (width 1) and
/// even widths are bumped to the next odd value so the window stays
/// symmetric around the target.
pub fn normalize_window(window: usize) -> usize {
    let w = window.max(1);
    if w % 2 == 0 { w + 1 } else { w }
}

/// Keys covered by a window of `window` ring steps centered on `target`,
/// wrapping around the year boundary.
///
/// The result is in ring order starting at the earliest key of the window
/// and never contains duplicates; a window wide enough to cover the whole
/// ring returns every key exactly once.
pub fn window_keys(target: GroupKey, window: usize) -> Vec<GroupKey> {
    let ring = target.frequency().ring_size();
    let half = normalize_window(window) / 2;
    if 2 * half + 1 >= ring {
        return (0..ring)
            .map(|i| GroupKey::new(i as u16, target.frequency()).expect("index within ring"))
            .collect();
    }
    let start = (target.index() as usize + ring - half) % ring;
    (0..=2 * half)
        .map(|o| {
            let idx = ((start + o) % ring) as u16;
            GroupKey::new(idx, target.frequency()).expect("index within ring")
        })
        .collect()
}

/// Positions in `keys` whose key lies within the circular window of
/// `target`.
///
/// `keys` holds the group key of every series position (one entry per
/// observation); the returned indices are sorted ascending. This is the
/// membership query behind per-key fit samples: `window = 0` or `1`
/// selects only exact key matches, `window = 3` at monthly frequency also
/// pulls in the previous and next calendar month, wrapping Dec into Jan.
pub fn window_members(keys: &[GroupKey], target: GroupKey, window: usize) -> Vec<usize> {
    let half = normalize_window(window) / 2;
    keys.iter()
        .enumerate()
        .filter(|(_, k)| k.ring_distance(target) <= half)
        .map(|(i, _)| i)
        .collect()
}
