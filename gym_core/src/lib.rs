//! Core of the gym watcher.
//!
//! A [`PageController`] holds everything known about the tracked gyms. Each
//! response fetched by the [`Poller`] is applied with
//! [`PageController::apply`], which refreshes the map markers, narrates what
//! changed since the previous snapshot, merges the batch into the
//! [`SnapshotStore`] and recomputes [`TeamStats`].

pub mod client;
mod clock;
pub mod config;
mod feed;
mod markers;
pub mod narrator;
mod page;
pub mod poller;
pub mod popups;
mod stats;
mod store;

pub use client::{FetchError, GymClient};
pub use clock::ServerClock;
pub use config::{load_watch_config, ConfigError, MapConfig, WatchConfig};
pub use feed::{EventFeed, FeedEntry};
pub use markers::{GymIcon, GymMarker, MarkerPopup, MarkerRenderReport, MarkerSet};
pub use narrator::{classify, DiffNarrator, EventKind, GymEvent, NarratedBatch};
pub use page::{PageController, UpdateReport};
pub use poller::Poller;
pub use popups::{PopupFrame, PopupLayer, TransientPopup};
pub use stats::TeamStats;
pub use store::SnapshotStore;
