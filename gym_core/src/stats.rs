use std::fmt::Write as _;

use gym_proto::Team;

use crate::store::SnapshotStore;

/// Gym counts per team across the whole snapshot store.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TeamStats {
    counts: [usize; 4],
    /// Every stored gym, including those with unrecognized team ids.
    pub total: usize,
}

impl TeamStats {
    pub fn from_store(store: &SnapshotStore) -> Self {
        let mut stats = Self::default();
        for record in store.iter() {
            stats.total += 1;
            if let Some(team) = record.team_id.team() {
                stats.counts[slot(team)] += 1;
            }
        }
        stats
    }

    pub fn count(&self, team: Team) -> usize {
        self.counts[slot(team)]
    }

    /// Share of all stored gyms held by `team`, in percent. Zero for an empty store.
    pub fn percentage(&self, team: Team) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        self.count(team) as f64 / self.total as f64 * 100.0
    }

    /// Text for the display slot of `team`. The neutral slot carries no percentage.
    pub fn slot_text(&self, team: Team) -> String {
        match team {
            Team::Neutral => format!("{} gyms", self.count(team)),
            Team::Mystic | Team::Valor | Team::Instinct => format!(
                "{} gyms ({:.2} %)",
                self.count(team),
                self.percentage(team)
            ),
        }
    }

    /// Plain-text summary: total, then teams by descending count.
    pub fn summary_report(&self) -> String {
        let mut teams: Vec<(Team, usize)> = Team::ALL
            .iter()
            .map(|team| (*team, self.count(*team)))
            .filter(|(_, count)| *count > 0)
            .collect();
        teams.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));

        let mut report = String::new();
        report.push_str("Gimnasios por equipos\n");
        report.push_str(&"-".repeat(30));
        report.push('\n');
        let _ = writeln!(report, "Número de gimnasios: {}", self.total);
        for (team, count) in teams {
            let _ = writeln!(
                report,
                "{:10} {:5}  ({:.1}%)",
                team.name(),
                count,
                self.percentage(team)
            );
        }
        report
    }
}

fn slot(team: Team) -> usize {
    match team {
        Team::Neutral => 0,
        Team::Mystic => 1,
        Team::Valor => 2,
        Team::Instinct => 3,
    }
}
