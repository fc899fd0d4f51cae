//! Per-row reveal state and the auto-collapse timers that drive it.
//!
//! The DOM never holds state here: classes, labels and the detail line are
//! all derived from [`RowState`], and the pending timer of each row is owned
//! by the [`Board`] rather than stashed on an element.

use crate::config::{AnimationConfig, WidgetConfig};
use crate::feed::{Feed, UpdateItem};
use crate::layout::{Measurements, ScrollDecision};
use std::collections::BTreeMap;
use tracing::{debug, info};

/// A scheduled callback that can be cancelled before it fires.
pub trait PendingTimer {
    fn cancel(self);
}

#[derive(Clone, Debug, Default, PartialEq)]
pub enum RowState {
    #[default]
    Collapsed,
    Expanded(Expansion),
}

/// What an expanded row shows in its name cell.
#[derive(Clone, Debug, PartialEq)]
pub struct Expansion {
    pub label: String,
    pub detail: String,
    pub scroll: ScrollDecision,
    /// Identifies this expansion among restarts; stale timer and measurement
    /// callbacks carry an older epoch.
    pub epoch: u64,
}

/// Class attribute values for the three cells of a row.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RowClasses {
    pub row: &'static str,
    pub name: &'static str,
    pub time: &'static str,
}

impl RowState {
    #[cfg(test)]
    fn is_expanded(&self) -> bool {
        matches!(self, RowState::Expanded(_))
    }

    pub fn expansion(&self) -> Option<&Expansion> {
        match self {
            RowState::Collapsed => None,
            RowState::Expanded(expansion) => Some(expansion),
        }
    }

    pub fn classes(&self) -> RowClasses {
        match self {
            RowState::Collapsed => RowClasses {
                row: "updates-row",
                name: "platform-name",
                time: "datetime-cell",
            },
            RowState::Expanded(_) => RowClasses {
                row: "updates-row processed",
                name: "platform-name with-date",
                time: "datetime-cell faded",
            },
        }
    }
}

/// Row index → the single pending auto-collapse timer of that row.
pub struct TimerTable<H: PendingTimer> {
    next_epoch: u64,
    pending: BTreeMap<usize, (u64, Option<H>)>,
}

impl<H: PendingTimer> Default for TimerTable<H> {
    fn default() -> Self {
        Self {
            next_epoch: 1,
            pending: BTreeMap::new(),
        }
    }
}

impl<H: PendingTimer> TimerTable<H> {
    /// Starts a new epoch for `row`, cancelling whatever was pending.
    pub fn begin(&mut self, row: usize) -> u64 {
        let epoch = self.next_epoch;
        self.next_epoch += 1;
        if let Some((_, Some(old))) = self.pending.insert(row, (epoch, None)) {
            old.cancel();
        }
        epoch
    }

    /// Stores the handle for `epoch`. A handle for a superseded epoch is
    /// cancelled immediately.
    pub fn attach(&mut self, row: usize, epoch: u64, handle: H) {
        match self.pending.get_mut(&row) {
            Some((current, slot)) if *current == epoch => {
                if let Some(old) = slot.replace(handle) {
                    old.cancel();
                }
            }
            _ => handle.cancel(),
        }
    }

    /// Consumes the entry if `epoch` is still current for `row`.
    pub fn fire(&mut self, row: usize, epoch: u64) -> bool {
        match self.pending.get(&row) {
            Some((current, _)) if *current == epoch => {
                self.pending.remove(&row);
                true
            }
            _ => false,
        }
    }

    #[cfg(test)]
    fn is_current(&self, row: usize, epoch: u64) -> bool {
        self.pending.get(&row).is_some_and(|(current, _)| *current == epoch)
    }

    #[cfg(test)]
    fn is_pending(&self, row: usize) -> bool {
        self.pending.contains_key(&row)
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Cancels every pending timer.
    pub fn clear(&mut self) {
        for (_, (_, handle)) in std::mem::take(&mut self.pending) {
            if let Some(handle) = handle {
                handle.cancel();
            }
        }
    }
}

/// Stable key of a rendered row; a new render never reuses an old key.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RowKey {
    pub generation: u64,
    pub index: usize,
}

/// The rendered feed plus the state of each of its rows.
pub struct Board<H: PendingTimer> {
    animation: AnimationConfig,
    separator: String,
    generation: u64,
    feed: Feed,
    rows: Vec<RowState>,
    timers: TimerTable<H>,
}

impl<H: PendingTimer> Board<H> {
    pub fn new(config: &WidgetConfig) -> Self {
        Self {
            animation: config.animation,
            separator: config.detail_separator.clone(),
            generation: 0,
            feed: Feed::default(),
            rows: Vec::new(),
            timers: TimerTable::default(),
        }
    }

    pub fn animation(&self) -> &AnimationConfig {
        &self.animation
    }

    /// Replaces every row with the contents of `feed`.
    pub fn render(&mut self, feed: Feed) {
        self.timers.clear();
        self.generation += 1;
        self.rows = vec![RowState::Collapsed; feed.items.len()];
        self.feed = feed;
        info!(
            rows = self.rows.len(),
            generation = self.generation,
            "rendered updates"
        );
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn items(&self) -> &[UpdateItem] {
        &self.feed.items
    }

    pub fn keyed_items(&self) -> Vec<(RowKey, UpdateItem)> {
        self.feed
            .items
            .iter()
            .enumerate()
            .map(|(index, item)| {
                (
                    RowKey {
                        generation: self.generation,
                        index,
                    },
                    item.clone(),
                )
            })
            .collect()
    }

    pub fn row(&self, index: usize) -> Option<&RowState> {
        self.rows.get(index)
    }

    #[cfg(test)]
    fn is_pending(&self, index: usize) -> bool {
        self.timers.is_pending(index)
    }

    /// Handles a click: (re)starts the expansion of `index` and returns the
    /// epoch the caller must tag its timer and measurement with.
    pub fn expand(&mut self, index: usize) -> Option<u64> {
        let item = self.feed.items.get(index)?;
        let label = item.expanded_label();
        let detail = item.detail_text(&self.feed.catalog, &self.separator);
        let epoch = self.timers.begin(index);
        self.rows[index] = RowState::Expanded(Expansion {
            label,
            detail,
            scroll: ScrollDecision::Static,
            epoch,
        });
        Some(epoch)
    }

    pub fn attach_timer(&mut self, index: usize, epoch: u64, handle: H) {
        self.timers.attach(index, epoch, handle);
    }

    /// Records widths read from the expanded DOM and decides whether the
    /// detail text scrolls.
    pub fn apply_measurement(
        &mut self,
        index: usize,
        epoch: u64,
        measurements: Measurements,
    ) -> Option<ScrollDecision> {
        let Some(RowState::Expanded(expansion)) = self.rows.get_mut(index) else {
            return None;
        };
        if expansion.epoch != epoch {
            return None;
        }

        let decision = measurements.plan(&self.animation);
        debug!(
            row = index,
            total_row_width = measurements.row_width,
            platform_name_width = measurements.label_width,
            available_space = measurements.available_width(&self.animation),
            date_text_width = measurements.text_width,
            needs_scroll = decision.is_animated(),
            "width calculations"
        );
        expansion.scroll = decision;
        Some(decision)
    }

    /// Auto-collapse callback, also used to collapse at once when no timer
    /// could be scheduled. Returns whether the row actually collapsed.
    pub fn expire(&mut self, index: usize, epoch: u64) -> bool {
        if !self.timers.fire(index, epoch) {
            return false;
        }
        match self.rows.get_mut(index) {
            Some(state) => {
                *state = RowState::Collapsed;
                true
            }
            None => false,
        }
    }
}
