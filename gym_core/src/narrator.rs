//! Classifies gym changes between two snapshots into narrated events.

use gym_proto::{GymRecord, TeamId};
use tracing::debug;

use crate::store::SnapshotStore;

/// Point gain produced by a single trainer joining a gym.
pub const TRAINER_POINTS: i64 = 2000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    /// A team took a gym that was neutral.
    Captured { team: TeamId },
    /// A team took a gym from another team.
    Conquest { team: TeamId, previous: TeamId },
    /// The controlling team lost the gym and it became neutral.
    Defeated { previous: TeamId },
    TrainerAdded { team: TeamId, delta: i64 },
    Trained { team: TeamId, delta: i64 },
    UnderAttack { team: TeamId, delta: i64 },
}

impl EventKind {
    pub fn category(&self) -> &'static str {
        match self {
            EventKind::Captured { .. } => "captured",
            EventKind::Conquest { .. } => "conquest",
            EventKind::Defeated { .. } => "defeated",
            EventKind::TrainerAdded { .. } => "trainer_added",
            EventKind::Trained { .. } => "trained",
            EventKind::UnderAttack { .. } => "under_attack",
        }
    }

    /// Short text floated over the gym on the map.
    pub fn popup_text(&self) -> String {
        match self {
            EventKind::Captured { .. } | EventKind::Conquest { .. } => "Conquistado!".to_string(),
            EventKind::Defeated { .. } => "Derrotado!".to_string(),
            EventKind::TrainerAdded { delta, .. } | EventKind::Trained { delta, .. } => {
                format!("+{delta}")
            }
            EventKind::UnderAttack { delta, .. } => delta.to_string(),
        }
    }

    pub fn narrative(&self, gym_name: &str) -> String {
        match self {
            EventKind::Captured { team } => format!("{team} ahora controla {gym_name}"),
            EventKind::Conquest { team, previous } => {
                format!("{team} ha conquistado {gym_name} a {previous}")
            }
            EventKind::Defeated { previous } => {
                format!("{previous} ha sido derrotado en {gym_name}")
            }
            EventKind::TrainerAdded { team, delta } => {
                format!("{team} ha añadido un entrenador a {gym_name} (+{delta})")
            }
            EventKind::Trained { team, delta } => {
                format!("{team} ha entrenado {gym_name} (+{delta})")
            }
            EventKind::UnderAttack { team, delta } => {
                format!("{team} está siendo atacado en {gym_name} ({delta})")
            }
        }
    }
}

/// Compare two records of the same gym. `None` when nothing worth narrating changed.
pub fn classify(old: &GymRecord, new: &GymRecord) -> Option<EventKind> {
    if new.team_id != old.team_id {
        return Some(if new.team_id.is_neutral() {
            EventKind::Defeated {
                previous: old.team_id,
            }
        } else if old.team_id.is_neutral() {
            EventKind::Captured { team: new.team_id }
        } else {
            EventKind::Conquest {
                team: new.team_id,
                previous: old.team_id,
            }
        });
    }

    let team = new.team_id;
    let delta = new.gym_points.saturating_sub(old.gym_points);
    let one_more_member = new.members_count.checked_sub(old.members_count) == Some(1);
    match delta {
        TRAINER_POINTS if one_more_member => Some(EventKind::TrainerAdded { team, delta }),
        d if d > 0 => Some(EventKind::Trained { team, delta }),
        d if d < 0 => Some(EventKind::UnderAttack { team, delta }),
        _ => None,
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct GymEvent {
    pub gym_id: String,
    pub gym_name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub kind: EventKind,
}

impl GymEvent {
    pub fn narrative(&self) -> String {
        self.kind.narrative(&self.gym_name)
    }

    pub fn popup_text(&self) -> String {
        self.kind.popup_text()
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct NarratedBatch {
    /// Batch counter value used for this batch; `None` on the first load.
    pub batch: Option<u64>,
    pub events: Vec<GymEvent>,
    /// Incoming gyms that had no stored record to compare against.
    pub skipped_unknown: usize,
}

/// Tracks whether a baseline exists and numbers narrated batches.
#[derive(Debug, Clone)]
pub struct DiffNarrator {
    first_load: bool,
    batch: u64,
}

impl Default for DiffNarrator {
    fn default() -> Self {
        Self {
            first_load: true,
            batch: 0,
        }
    }
}

impl DiffNarrator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_first_load(&self) -> bool {
        self.first_load
    }

    pub fn batch(&self) -> u64 {
        self.batch
    }

    /// Narrate `gyms` against `store`, which must not yet contain this batch.
    pub fn narrate(&mut self, store: &SnapshotStore, gyms: &[GymRecord]) -> NarratedBatch {
        if self.first_load {
            self.first_load = false;
            return NarratedBatch::default();
        }

        let batch = self.batch;
        let mut narrated = NarratedBatch {
            batch: Some(batch),
            ..NarratedBatch::default()
        };
        for record in gyms {
            let Some(previous) = store.get(&record.id) else {
                debug!(
                    target: "gym_watch::narrator",
                    gym = %record.id,
                    "narrator.skipped_unknown"
                );
                narrated.skipped_unknown += 1;
                continue;
            };
            if let Some(kind) = classify(previous, record) {
                narrated.events.push(GymEvent {
                    gym_id: record.id.clone(),
                    gym_name: record.name.clone(),
                    latitude: record.latitude,
                    longitude: record.longitude,
                    kind,
                });
            }
        }
        self.batch += 1;
        narrated
    }
}
