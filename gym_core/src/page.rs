use std::time::Instant;

use gym_proto::GymsResponse;
use tracing::{debug, info};

use crate::{
    clock::ServerClock,
    config::WatchConfig,
    feed::EventFeed,
    markers::{MarkerRenderReport, MarkerSet},
    narrator::{DiffNarrator, GymEvent},
    popups::PopupLayer,
    stats::TeamStats,
    store::SnapshotStore,
};

/// Outcome of applying one fetch response.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UpdateReport {
    pub timestamp: i64,
    pub gym_count: usize,
    pub markers: MarkerRenderReport,
    pub events: Vec<GymEvent>,
    pub skipped_unknown: usize,
}

/// Owns every piece of watcher state for the lifetime of the program.
///
/// `last_updated` only feeds the display labels. The `after` cursor for
/// requests belongs to [`crate::Poller`].
#[derive(Debug, Clone)]
pub struct PageController {
    store: SnapshotStore,
    markers: MarkerSet,
    narrator: DiffNarrator,
    feed: EventFeed,
    popups: PopupLayer,
    stats: TeamStats,
    last_updated: i64,
    clock: ServerClock,
}

impl PageController {
    pub fn new(config: &WatchConfig) -> Self {
        Self {
            store: SnapshotStore::new(),
            markers: MarkerSet::new(),
            narrator: DiffNarrator::new(),
            feed: EventFeed::with_capacity(config.feed_capacity),
            popups: PopupLayer::new(),
            stats: TeamStats::default(),
            last_updated: 0,
            clock: ServerClock::with_offset_hours(config.utc_offset_hours),
        }
    }

    /// Apply a fetched batch: timestamp, markers, narration, store merge, stats.
    pub fn apply(&mut self, response: &GymsResponse, now: Instant) -> UpdateReport {
        self.last_updated = response.timestamp;
        info!(
            target: "gym_watch::page",
            "{}: {} gyms",
            response.timestamp,
            response.gyms.len()
        );

        let markers = self.markers.render(&response.gyms);
        let narrated = self.narrator.narrate(&self.store, &response.gyms);

        if let Some(batch) = narrated.batch {
            let stamp = self.clock.time_label(response.timestamp);
            for event in &narrated.events {
                debug!(
                    target: "gym_watch::page",
                    gym = %event.gym_id,
                    category = event.kind.category(),
                    "narrator.event"
                );
                self.feed.prepend(stamp.clone(), event.narrative());
            }
            self.popups.spawn(batch, &narrated.events, now);
        }

        self.store.merge(&response.gyms);
        self.stats = TeamStats::from_store(&self.store);

        UpdateReport {
            timestamp: response.timestamp,
            gym_count: response.gyms.len(),
            markers,
            events: narrated.events,
            skipped_unknown: narrated.skipped_unknown,
        }
    }

    /// Forget popups that finished their animation.
    pub fn tick(&mut self, now: Instant) {
        self.popups.prune(now);
    }

    pub fn last_updated(&self) -> i64 {
        self.last_updated
    }

    pub fn updated_at_label(&self) -> Option<String> {
        (self.last_updated > 0).then(|| self.clock.updated_at_label(self.last_updated))
    }

    pub fn store(&self) -> &SnapshotStore {
        &self.store
    }

    pub fn markers(&self) -> &MarkerSet {
        &self.markers
    }

    pub fn feed(&self) -> &EventFeed {
        &self.feed
    }

    pub fn popups(&self) -> &PopupLayer {
        &self.popups
    }

    pub fn stats(&self) -> &TeamStats {
        &self.stats
    }

    pub fn is_first_load(&self) -> bool {
        self.narrator.is_first_load()
    }
}
