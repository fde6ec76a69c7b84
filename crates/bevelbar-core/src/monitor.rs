#![forbid(unsafe_code)]

//! Monitor discovery and ordering.
//!
//! The display backend reports candidate outputs through [`OutputSource`];
//! [`MonitorSet::discover`] filters the unusable ones and orders the rest.
//!
//! # Ordering
//!
//! Monitors are ordered by [`monitor_order`], which is *not* a total order:
//! `a < b` iff `a.x < b.x || a.bottom() <= b.y`, and `a > b` iff
//! `a.x > b.x || a.bottom() > b.y`. It approximates "left to right, then top
//! to bottom" and is reproduced as-is because producers address monitors by
//! the resulting index. A comparator like this must never be handed to
//! `slice::sort_by` (which may panic on inconsistent orders), so the set is
//! sorted with a stable insertion sort instead.

use std::cmp::Ordering;

use crate::error::{BarError, BarResult};
use crate::geometry::Rect;

/// One candidate output as reported by the display server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputInfo {
    /// Output name, when the backend knows one.
    pub name: Option<String>,
    /// Position and size in root-window coordinates.
    pub geometry: Rect,
    /// Whether the output currently drives a mode.
    pub has_mode: bool,
    /// Number of connected sinks (physical outputs) behind it.
    pub connected: usize,
}

impl OutputInfo {
    /// An active, connected output with the given geometry.
    #[must_use]
    pub fn active(geometry: Rect) -> Self {
        Self {
            name: None,
            geometry,
            has_mode: true,
            connected: 1,
        }
    }

    /// Attach a name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Whether a bar can be placed on this output.
    #[must_use]
    pub fn is_usable(&self) -> bool {
        self.has_mode && self.connected > 0 && !self.geometry.is_empty()
    }
}

/// Provider of candidate outputs (the display server session).
pub trait OutputSource {
    /// Enumerate every candidate output, usable or not.
    fn outputs(&self) -> BarResult<Vec<OutputInfo>>;
}

impl OutputSource for [OutputInfo] {
    fn outputs(&self) -> BarResult<Vec<OutputInfo>> {
        Ok(self.to_vec())
    }
}

impl OutputSource for Vec<OutputInfo> {
    fn outputs(&self) -> BarResult<Vec<OutputInfo>> {
        Ok(self.clone())
    }
}

/// A discovered monitor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Monitor {
    index: usize,
    geometry: Rect,
    name: Option<String>,
}

impl Monitor {
    /// Index used by the markup stream to address this monitor.
    #[inline]
    #[must_use]
    pub const fn index(&self) -> usize {
        self.index
    }

    /// Screen geometry.
    #[inline]
    #[must_use]
    pub const fn geometry(&self) -> Rect {
        self.geometry
    }

    /// Output name, if known.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }
}

/// Compare two monitor geometries.
///
/// See the module documentation: this is deliberately the historical,
/// non-transitive comparator.
#[must_use]
pub fn monitor_order(a: &Rect, b: &Rect) -> Ordering {
    let a_bottom = a.bottom();
    let b_top = b.y as i64;

    if a.x < b.x || a_bottom <= b_top {
        Ordering::Less
    } else if a.x > b.x || a_bottom > b_top {
        Ordering::Greater
    } else {
        Ordering::Equal
    }
}

/// Stable insertion sort driven by `cmp`; tolerates inconsistent comparators.
fn insertion_sort_by<T>(items: &mut [T], mut cmp: impl FnMut(&T, &T) -> Ordering) {
    for i in 1..items.len() {
        let mut j = i;
        while j > 0 && cmp(&items[j - 1], &items[j]) == Ordering::Greater {
            items.swap(j - 1, j);
            j -= 1;
        }
    }
}

/// The ordered set of monitors a bar is drawn on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonitorSet {
    monitors: Vec<Monitor>,
}

impl MonitorSet {
    /// Discover, filter, and order the outputs of `source`.
    ///
    /// Fails with [`BarError::NoDisplaysFound`] when nothing usable remains.
    pub fn discover<S: OutputSource + ?Sized>(source: &S) -> BarResult<Self> {
        Self::from_outputs(source.outputs()?)
    }

    /// Filter and order an explicit list of candidate outputs.
    pub fn from_outputs(outputs: impl IntoIterator<Item = OutputInfo>) -> BarResult<Self> {
        let mut candidates: Vec<OutputInfo> = Vec::new();
        for output in outputs {
            if output.is_usable() {
                candidates.push(output);
            } else {
                tracing::debug!(
                    name = output.name.as_deref().unwrap_or("?"),
                    has_mode = output.has_mode,
                    connected = output.connected,
                    "skipping unusable output"
                );
            }
        }

        if candidates.is_empty() {
            return Err(BarError::NoDisplaysFound);
        }

        insertion_sort_by(&mut candidates, |a, b| monitor_order(&a.geometry, &b.geometry));

        let monitors: Vec<Monitor> = candidates
            .into_iter()
            .enumerate()
            .map(|(index, output)| Monitor {
                index,
                geometry: output.geometry,
                name: output.name,
            })
            .collect();

        for monitor in &monitors {
            let g = monitor.geometry;
            tracing::info!(
                index = monitor.index,
                name = monitor.name().unwrap_or("?"),
                x = g.x,
                y = g.y,
                width = g.width,
                height = g.height,
                "monitor"
            );
        }

        Ok(Self { monitors })
    }

    /// Number of monitors (always at least one).
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.monitors.len()
    }

    /// Always false for a discovered set; provided for API symmetry.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.monitors.is_empty()
    }

    /// Monitor by index.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Monitor> {
        self.monitors.get(index)
    }

    /// Iterate in index order.
    pub fn iter(&self) -> std::slice::Iter<'_, Monitor> {
        self.monitors.iter()
    }

    /// All monitors as a slice.
    #[must_use]
    pub fn as_slice(&self) -> &[Monitor] {
        &self.monitors
    }
}

impl<'a> IntoIterator for &'a MonitorSet {
    type Item = &'a Monitor;
    type IntoIter = std::slice::Iter<'a, Monitor>;

    fn into_iter(self) -> Self::IntoIter {
        self.monitors.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn geometries(set: &MonitorSet) -> Vec<Rect> {
        set.iter().map(Monitor::geometry).collect()
    }

    #[test]
    fn side_by_side_sorts_left_to_right() {
        let right = Rect::new(1920, 0, 1280, 1024);
        let left = Rect::new(0, 0, 1920, 1080);
        let set =
            MonitorSet::from_outputs([OutputInfo::active(right), OutputInfo::active(left)]).unwrap();
        assert_eq!(geometries(&set), vec![left, right]);
        assert_eq!(set.get(0).map(Monitor::index), Some(0));
        assert_eq!(set.get(1).map(Monitor::index), Some(1));
    }

    #[test]
    fn stacked_sorts_top_to_bottom() {
        let top = Rect::new(0, 0, 1920, 1080);
        let bottom = Rect::new(0, 1080, 1920, 1080);
        let set =
            MonitorSet::from_outputs([OutputInfo::active(bottom), OutputInfo::active(top)]).unwrap();
        assert_eq!(geometries(&set), vec![top, bottom]);
    }

    #[test]
    fn comparator_is_asymmetric_for_diagonal_layouts() {
        // `a` is right of `b` but entirely above it: both directions say Less.
        let a = Rect::new(100, 0, 100, 100);
        let b = Rect::new(0, 200, 100, 100);
        assert_eq!(monitor_order(&a, &b), Ordering::Less);
        assert_eq!(monitor_order(&b, &a), Ordering::Less);
    }

    #[test]
    fn comparator_same_column_overlapping_rows() {
        let a = Rect::new(0, 0, 100, 100);
        let b = Rect::new(0, 50, 100, 100);
        // Same x, a's bottom (100) > b.y (50): Greater, and vice versa.
        assert_eq!(monitor_order(&a, &b), Ordering::Greater);
        assert_eq!(monitor_order(&b, &a), Ordering::Greater);
    }

    #[test]
    fn comparator_is_never_equal_for_positive_heights() {
        // Equality needs a.x == b.x and a.bottom() <= b.y and a.bottom() > b.y.
        let a = Rect::new(0, 0, 10, 10);
        assert_eq!(monitor_order(&a, &a), Ordering::Greater);
        let flat = Rect::new(0, 5, 10, 0);
        assert_eq!(monitor_order(&flat, &flat), Ordering::Less);
    }

    #[test]
    fn unusable_outputs_are_dropped() {
        let good = OutputInfo::active(Rect::new(0, 0, 800, 600)).with_name("DP-1");
        let no_mode = OutputInfo {
            has_mode: false,
            ..OutputInfo::active(Rect::new(800, 0, 800, 600))
        };
        let disconnected = OutputInfo {
            connected: 0,
            ..OutputInfo::active(Rect::new(1600, 0, 800, 600))
        };
        let degenerate = OutputInfo::active(Rect::new(2400, 0, 0, 600));
        let set = MonitorSet::from_outputs([no_mode, disconnected, degenerate, good]).unwrap();
        assert_eq!(set.len(), 1);
        assert_eq!(set.get(0).and_then(Monitor::name), Some("DP-1"));
    }

    #[test]
    fn nothing_usable_is_no_displays_found() {
        let err = MonitorSet::from_outputs(Vec::new()).unwrap_err();
        assert!(matches!(err, BarError::NoDisplaysFound));

        let off = OutputInfo {
            has_mode: false,
            ..OutputInfo::active(Rect::new(0, 0, 10, 10))
        };
        assert!(matches!(
            MonitorSet::discover(&vec![off]),
            Err(BarError::NoDisplaysFound)
        ));
    }

    #[test]
    fn insertion_sort_survives_inconsistent_comparator() {
        let mut items = vec![3, 1, 2, 5, 4];
        insertion_sort_by(&mut items, |_, _| Ordering::Greater);
        assert_eq!(items.len(), 5);
        let mut items = vec![3, 1, 2];
        insertion_sort_by(&mut items, |a, b| a.cmp(b));
        assert_eq!(items, vec![1, 2, 3]);
    }
}
