use std::collections::HashSet;

/// One rendered list entry as seen in a single observation.
#[derive(Debug, Clone)]
pub struct ItemHandle<E> {
    /// Render position within the observation it came from.
    pub index: usize,
    pub element: E,
    /// Stable token for this entry, when the renderer exposes one.
    pub identity: Option<String>,
}

/// All handles rendered at one poll, in render order.
#[derive(Debug, Clone)]
pub struct ObservationBatch<E> {
    pub handles: Vec<ItemHandle<E>>,
}

impl<E> ObservationBatch<E> {
    pub fn len(&self) -> usize {
        self.handles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TrackingMode {
    /// Positions below the watermark are consumed. Requires an append-only list.
    #[default]
    Watermark,
    /// Identity tokens already seen are consumed; handles without a token fall
    /// back to the watermark.
    Identity,
}

/// Remembers which list entries have already been handed to the extractor.
#[derive(Debug)]
pub struct SeenTracker {
    mode: TrackingMode,
    watermark: usize,
    seen: HashSet<String>,
}

impl SeenTracker {
    pub fn new(mode: TrackingMode) -> Self {
        Self {
            mode,
            watermark: 0,
            seen: HashSet::new(),
        }
    }

    pub fn mode(&self) -> TrackingMode {
        self.mode
    }

    pub fn watermark(&self) -> usize {
        self.watermark
    }

    fn is_fresh<E>(&self, handle: &ItemHandle<E>) -> bool {
        match (self.mode, &handle.identity) {
            (TrackingMode::Identity, Some(identity)) => !self.seen.contains(identity),
            _ => handle.index >= self.watermark,
        }
    }

    /// Indices into `batch.handles` not yet consumed, in render order. Empty
    /// means the list did not grow since the last observation.
    ///
    /// An identity repeated within the batch is only yielded once.
    pub fn fresh<E>(&self, batch: &ObservationBatch<E>) -> Vec<usize> {
        let mut in_batch = HashSet::new();
        batch
            .handles
            .iter()
            .enumerate()
            .filter(|(_, handle)| self.is_fresh(handle))
            .filter(|(_, handle)| match (self.mode, &handle.identity) {
                (TrackingMode::Identity, Some(identity)) => in_batch.insert(identity.as_str()),
                _ => true,
            })
            .map(|(position, _)| position)
            .collect()
    }

    /// Marks one examined handle, whether or not it produced a record.
    pub fn consume<E>(&mut self, handle: &ItemHandle<E>) {
        self.watermark = self.watermark.max(handle.index + 1);
        if let Some(identity) = &handle.identity {
            self.seen.insert(identity.clone());
        }
    }

    /// Marks a fully processed batch.
    pub fn commit<E>(&mut self, batch: &ObservationBatch<E>) {
        self.watermark = self.watermark.max(batch.len());
        for handle in &batch.handles {
            if let Some(identity) = &handle.identity {
                self.seen.insert(identity.clone());
            }
        }
    }
}
