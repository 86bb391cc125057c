//! Shared outside-press dismissal.
//!
//! The widgets this replaces each hung their own listener off the
//! document and never removed it. Here one process-wide registry owns the
//! routing: a widget subscribes on construction, keeps its on-screen
//! regions (popup plus host field) current, and unsubscribes on destroy.
//! A pointer press is offered to the registry once; every subscriber
//! whose regions all miss the point is told to dismiss.

/// Axis-aligned screen rectangle in cell coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Region {
    pub x: u16,
    pub y: u16,
    pub width: u16,
    pub height: u16,
}

impl Region {
    pub fn new(x: u16, y: u16, width: u16, height: u16) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Whether a point falls inside this region
    pub fn contains(&self, x: u16, y: u16) -> bool {
        x >= self.x
            && y >= self.y
            && x < self.x.saturating_add(self.width)
            && y < self.y.saturating_add(self.height)
    }
}

/// Opaque handle identifying one subscriber
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriberId(u64);

#[derive(Debug)]
struct Subscriber {
    id: SubscriberId,
    regions: Vec<Region>,
}

/// Process-wide dismissal dispatcher
#[derive(Debug, Default)]
pub struct DismissRegistry {
    next_id: u64,
    subscribers: Vec<Subscriber>,
}

impl DismissRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a widget. Until regions are set, every press counts as
    /// outside.
    pub fn subscribe(&mut self) -> SubscriberId {
        let id = SubscriberId(self.next_id);
        self.next_id += 1;
        self.subscribers.push(Subscriber {
            id,
            regions: Vec::new(),
        });
        id
    }

    /// Remove a widget; its handle becomes inert
    pub fn unsubscribe(&mut self, id: SubscriberId) {
        self.subscribers.retain(|s| s.id != id);
    }

    /// Replace a subscriber's interaction regions (host field + popup).
    /// Unknown ids are ignored.
    pub fn set_regions(&mut self, id: SubscriberId, regions: Vec<Region>) {
        if let Some(sub) = self.subscribers.iter_mut().find(|s| s.id == id) {
            sub.regions = regions;
        }
    }

    /// Route a pointer press; returns the subscribers the press landed
    /// outside of, in subscription order.
    pub fn press(&self, x: u16, y: u16) -> Vec<SubscriberId> {
        self.subscribers
            .iter()
            .filter(|s| !s.regions.iter().any(|r| r.contains(x, y)))
            .map(|s| s.id)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.subscribers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.subscribers.is_empty()
    }
}
