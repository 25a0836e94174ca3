//! Floating labels shown over a gym when something happens to it.
//!
//! A label fades in for [`FADE_IN`], then fades out for [`FADE_OUT`] while
//! drifting upward; the drift finishes after [`DRIFT`]. Labels are dropped
//! once [`LIFETIME`] has elapsed.

use std::time::{Duration, Instant};

use crate::narrator::GymEvent;

pub const FADE_IN: Duration = Duration::from_millis(1000);
pub const FADE_OUT: Duration = Duration::from_millis(5000);
pub const DRIFT: Duration = Duration::from_millis(600);
pub const LIFETIME: Duration = Duration::from_millis(6000);

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PopupFrame {
    /// 0.0 (invisible) to 1.0 (opaque).
    pub opacity: f32,
    /// 0.0 at the gym, 1.0 at the top of the drift.
    pub lift: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TransientPopup {
    pub key: String,
    pub text: String,
    pub latitude: f64,
    pub longitude: f64,
    pub spawned_at: Instant,
}

impl TransientPopup {
    pub fn frame_at(&self, now: Instant) -> Option<PopupFrame> {
        frame_for_elapsed(now.saturating_duration_since(self.spawned_at))
    }
}

/// Opacity and lift of a label `elapsed` after it appeared; `None` once expired.
pub fn frame_for_elapsed(elapsed: Duration) -> Option<PopupFrame> {
    if elapsed >= LIFETIME {
        return None;
    }
    if elapsed < FADE_IN {
        return Some(PopupFrame {
            opacity: ratio(elapsed, FADE_IN),
            lift: 0.0,
        });
    }
    let fading = elapsed - FADE_IN;
    Some(PopupFrame {
        opacity: 1.0 - ratio(fading, FADE_OUT),
        lift: ratio(fading, DRIFT).min(1.0),
    })
}

fn ratio(part: Duration, whole: Duration) -> f32 {
    (part.as_secs_f32() / whole.as_secs_f32()).clamp(0.0, 1.0)
}

#[derive(Debug, Clone, Default)]
pub struct PopupLayer {
    popups: Vec<TransientPopup>,
}

impl PopupLayer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Spawn one label per event. Keys are `popup_{batch}_{n}`.
    pub fn spawn(&mut self, batch: u64, events: &[GymEvent], now: Instant) {
        for (index, event) in events.iter().enumerate() {
            self.popups.push(TransientPopup {
                key: format!("popup_{batch}_{index}"),
                text: event.popup_text(),
                latitude: event.latitude,
                longitude: event.longitude,
                spawned_at: now,
            });
        }
    }

    /// Drop expired labels.
    pub fn prune(&mut self, now: Instant) {
        self.popups.retain(|popup| popup.frame_at(now).is_some());
    }

    /// Labels still visible at `now` with their current frame.
    pub fn visible(&self, now: Instant) -> impl Iterator<Item = (&TransientPopup, PopupFrame)> {
        self.popups
            .iter()
            .filter_map(move |popup| popup.frame_at(now).map(|frame| (popup, frame)))
    }

    pub fn len(&self) -> usize {
        self.popups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.popups.is_empty()
    }
}
