use std::collections::HashMap;

use gym_proto::{GymRecord, Team, TeamId};

/// Marker artwork. One variant per team; anything unrecognized shows as uncontested.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GymIcon {
    Uncontested,
    Mystic,
    Valor,
    Instinct,
}

impl GymIcon {
    pub fn for_team(team_id: TeamId) -> Self {
        match team_id.team() {
            Some(Team::Mystic) => GymIcon::Mystic,
            Some(Team::Valor) => GymIcon::Valor,
            Some(Team::Instinct) => GymIcon::Instinct,
            Some(Team::Neutral) | None => GymIcon::Uncontested,
        }
    }

    pub fn asset_path(self) -> &'static str {
        match self {
            GymIcon::Uncontested => "static/gyms/Uncontested.png",
            GymIcon::Mystic => "static/gyms/Mystic.png",
            GymIcon::Valor => "static/gyms/Valor.png",
            GymIcon::Instinct => "static/gyms/Instinct.png",
        }
    }

    pub fn team(self) -> Team {
        match self {
            GymIcon::Uncontested => Team::Neutral,
            GymIcon::Mystic => Team::Mystic,
            GymIcon::Valor => Team::Valor,
            GymIcon::Instinct => Team::Instinct,
        }
    }
}

/// Content of the popup bound to a marker.
#[derive(Debug, Clone, PartialEq)]
pub struct MarkerPopup {
    pub name: String,
    pub icon: GymIcon,
    pub level: u32,
    pub points: i64,
    pub members: i64,
}

impl MarkerPopup {
    fn from_record(record: &GymRecord, icon: GymIcon) -> Self {
        Self {
            name: record.name.clone(),
            icon,
            level: record.effective_level(),
            points: record.gym_points,
            members: record.members_count,
        }
    }

    pub fn lines(&self) -> [String; 3] {
        [
            format!("nivel {}", self.level),
            format!("{} puntos", self.points),
            format!("{} entrenadores", self.members),
        ]
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct GymMarker {
    pub gym_id: String,
    pub latitude: f64,
    pub longitude: f64,
    pub icon: GymIcon,
    pub popup: MarkerPopup,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MarkerRenderReport {
    pub created: usize,
    pub updated: usize,
}

/// Every marker placed on the map, keyed by gym id. Markers are never removed.
#[derive(Debug, Default, Clone)]
pub struct MarkerSet {
    markers: HashMap<String, GymMarker>,
}

impl MarkerSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create markers for new gyms and refresh icon and popup of known ones.
    ///
    /// A marker keeps the position it was created at.
    pub fn render(&mut self, gyms: &[GymRecord]) -> MarkerRenderReport {
        let mut report = MarkerRenderReport::default();
        for record in gyms {
            let icon = GymIcon::for_team(record.team_id);
            let popup = MarkerPopup::from_record(record, icon);
            match self.markers.get_mut(&record.id) {
                Some(marker) => {
                    marker.icon = icon;
                    marker.popup = popup;
                    report.updated += 1;
                }
                None => {
                    self.markers.insert(
                        record.id.clone(),
                        GymMarker {
                            gym_id: record.id.clone(),
                            latitude: record.latitude,
                            longitude: record.longitude,
                            icon,
                            popup,
                        },
                    );
                    report.created += 1;
                }
            }
        }
        report
    }

    pub fn get(&self, id: &str) -> Option<&GymMarker> {
        self.markers.get(id)
    }

    pub fn len(&self) -> usize {
        self.markers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.markers.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &GymMarker> {
        self.markers.values()
    }

    /// Markers ordered by gym name, then id, for stable cycling in the UI.
    pub fn sorted(&self) -> Vec<&GymMarker> {
        let mut markers: Vec<&GymMarker> = self.markers.values().collect();
        markers.sort_by(|a, b| {
            a.popup
                .name
                .cmp(&b.popup.name)
                .then_with(|| a.gym_id.cmp(&b.gym_id))
        });
        markers
    }
}
