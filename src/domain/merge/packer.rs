use std::ops::Range;

/// Greedy left-to-right packing of timed items into bounded groups.
///
/// A group is closed only when the next item would push it past `max_ms`; reaching
/// the bound exactly keeps the item in the current group. An item longer than
/// `max_ms` on its own becomes a single-item group.
#[derive(Debug)]
pub struct GreedyPacker<T> {
    max_ms: u64,
    current: Vec<T>,
    current_ms: u64,
}

impl<T> GreedyPacker<T> {
    pub fn new(max_ms: u64) -> Self {
        Self {
            max_ms,
            current: Vec::new(),
            current_ms: 0,
        }
    }

    /// Add the next item; returns the previous group if it had to be closed first.
    pub fn push(&mut self, item: T, duration_ms: u64) -> Option<(Vec<T>, u64)> {
        let flushed = if !self.current.is_empty()
            && self.current_ms.saturating_add(duration_ms) > self.max_ms
        {
            Some(self.take())
        } else {
            None
        };

        self.current.push(item);
        self.current_ms = self.current_ms.saturating_add(duration_ms);
        flushed
    }

    /// Close the trailing group, if any.
    pub fn finish(mut self) -> Option<(Vec<T>, u64)> {
        if self.current.is_empty() {
            None
        } else {
            Some(self.take())
        }
    }

    fn take(&mut self) -> (Vec<T>, u64) {
        let group = std::mem::take(&mut self.current);
        let duration = std::mem::replace(&mut self.current_ms, 0);
        (group, duration)
    }
}

/// Index ranges of the groups `GreedyPacker` forms over `durations`.
pub fn plan_segments(durations: &[u64], max_ms: u64) -> Vec<Range<usize>> {
    let mut packer = GreedyPacker::new(max_ms);
    let mut groups = Vec::new();

    for (index, &duration) in durations.iter().enumerate() {
        if let Some((group, _)) = packer.push(index, duration) {
            groups.push(group);
        }
    }
    groups.extend(packer.finish().map(|(group, _)| group));

    groups
        .into_iter()
        .filter_map(|g| Some(*g.first()?..*g.last()? + 1))
        .collect()
}
