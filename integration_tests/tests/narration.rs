mod common;

use std::time::{Duration, Instant};

use common::fixture;
use gym_core::{EventKind, GymIcon, PageController, WatchConfig};
use gym_proto::{GymRecord, GymsResponse, Team, TeamId};

fn loaded_page() -> (PageController, Instant) {
    let mut page = PageController::new(&WatchConfig::default());
    let now = Instant::now();
    page.apply(&fixture("initial_gyms.json"), now);
    (page, now)
}

#[test]
fn update_batch_covers_every_category() {
    let (mut page, now) = loaded_page();
    let report = page.apply(&fixture("update_gyms.json"), now);

    let summary: Vec<(&str, &str, String)> = report
        .events
        .iter()
        .map(|event| (event.gym_id.as_str(), event.kind.category(), event.popup_text()))
        .collect();
    assert_eq!(
        summary,
        vec![
            ("obradoiro", "captured", "Conquistado!".to_string()),
            ("alameda", "conquest", "Conquistado!".to_string()),
            ("quintana", "defeated", "Derrotado!".to_string()),
            ("bonaval", "trainer_added", "+2000".to_string()),
            ("galeras", "trained", "+500".to_string()),
            ("praterias", "under_attack", "-800".to_string()),
        ]
    );
    assert_eq!(
        report.events[1].kind,
        EventKind::Conquest {
            team: TeamId(2),
            previous: TeamId(1)
        }
    );
}

#[test]
fn feed_is_stamped_and_newest_first() {
    let (mut page, now) = loaded_page();
    page.apply(&fixture("update_gyms.json"), now);

    let lines: Vec<String> = page
        .feed()
        .iter()
        .map(|entry| format!("{} {}", entry.stamp, entry.text))
        .collect();
    assert_eq!(
        lines,
        vec![
            "12:00:05 Valor está siendo atacado en Praterías (-800)",
            "12:00:05 Mystic ha entrenado Galeras (+500)",
            "12:00:05 Instinct ha añadido un entrenador a Parque de Bonaval (+2000)",
            "12:00:05 Valor ha sido derrotado en Praza da Quintana",
            "12:00:05 Valor ha conquistado Alameda a Mystic",
            "12:00:05 Valor ahora controla Praza do Obradoiro",
        ]
    );
}

#[test]
fn same_response_twice_is_silent() {
    let (mut page, now) = loaded_page();
    let update = fixture("update_gyms.json");
    page.apply(&update, now);
    let feed_len = page.feed().len();

    let report = page.apply(&update, now);
    assert!(report.events.is_empty());
    assert_eq!(page.feed().len(), feed_len);
}

#[test]
fn popups_follow_events_and_expire() {
    let (mut page, now) = loaded_page();
    page.apply(&fixture("update_gyms.json"), now);

    let keys: Vec<String> = page
        .popups()
        .visible(now)
        .map(|(popup, _)| popup.key.clone())
        .collect();
    assert_eq!(keys.len(), 6);
    assert!(keys.iter().all(|key| key.starts_with("popup_0_")));

    page.tick(now + Duration::from_secs(3));
    assert_eq!(page.popups().len(), 6);
    page.tick(now + Duration::from_secs(6));
    assert!(page.popups().is_empty());
}

#[test]
fn markers_track_current_owner() {
    let (mut page, now) = loaded_page();
    assert_eq!(
        page.markers().get("quintana").map(|m| m.icon),
        Some(GymIcon::Valor)
    );
    page.apply(&fixture("update_gyms.json"), now);
    let marker = page.markers().get("quintana").expect("marker kept");
    assert_eq!(marker.icon, GymIcon::Uncontested);
    assert_eq!(marker.popup.points, 0);
    assert_eq!(page.markers().len(), 6);
}

#[test]
fn stats_cover_the_whole_store() {
    let (mut page, now) = loaded_page();
    assert_eq!(page.stats().count(Team::Mystic), 2);

    // A partial batch only touches one gym; stats still count all six.
    let partial = GymsResponse {
        timestamp: 1_469_872_900,
        gyms: vec![GymRecord {
            id: "galeras".to_string(),
            name: "Galeras".to_string(),
            team_id: TeamId(3),
            level: None,
            gym_points: 2000,
            members_count: 1,
            latitude: 42.8812,
            longitude: -8.5511,
        }],
    };
    page.apply(&partial, now);

    let stats = page.stats();
    assert_eq!(stats.total, 6);
    assert_eq!(stats.count(Team::Mystic), 1);
    assert_eq!(stats.count(Team::Instinct), 2);
    assert_eq!(stats.slot_text(Team::Instinct), "2 gyms (33.33 %)");
}

#[test]
fn ten_gym_split_adds_up() {
    let gyms = [1, 1, 1, 1, 2, 2, 2, 3, 3, 0]
        .iter()
        .enumerate()
        .map(|(index, team)| GymRecord {
            id: format!("g{index}"),
            name: format!("Gym {index}"),
            team_id: TeamId(*team),
            level: None,
            gym_points: 0,
            members_count: 0,
            latitude: 42.88,
            longitude: -8.54,
        })
        .collect();
    let mut page = PageController::new(&WatchConfig::default());
    page.apply(&GymsResponse { timestamp: 1, gyms }, Instant::now());

    let stats = page.stats();
    let shown: f64 = [Team::Mystic, Team::Valor, Team::Instinct]
        .iter()
        .map(|team| stats.percentage(*team))
        .sum();
    let total = shown + stats.percentage(Team::Neutral);
    assert_eq!(format!("{total:.2}"), "100.00");
    assert_eq!(stats.slot_text(Team::Neutral), "1 gyms");
}
