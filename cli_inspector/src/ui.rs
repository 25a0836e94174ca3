use std::collections::VecDeque;
use std::time::Instant;

use gym_core::{GymIcon, GymMarker, MapConfig, MarkerSet, PageController, PopupFrame};
use gym_proto::Team;
use ratatui::layout::{Constraint, Direction, Layout, Margin};
use ratatui::prelude::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::symbols::Marker;
use ratatui::text::{Line, Span};
use ratatui::widgets::canvas::{Canvas, Points};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use ratatui::Frame;

use crate::viewport::Viewport;

/// Share of the map height a popup rises over its drift.
const POPUP_DRIFT: f64 = 0.08;

pub struct UiState {
    pub viewport: Viewport,
    home: Viewport,
    pub selected: Option<String>,
    pub logs: VecDeque<String>,
    pub max_logs: usize,
}

impl UiState {
    pub fn new(map: &MapConfig) -> Self {
        let viewport = Viewport::from(map);
        Self {
            viewport,
            home: viewport,
            selected: None,
            logs: VecDeque::new(),
            max_logs: 6,
        }
    }

    pub fn push_log<S: Into<String>>(&mut self, line: S) {
        let mut text: String = line.into();
        while text.ends_with('\n') || text.ends_with('\r') {
            text.pop();
        }
        if text.is_empty() {
            return;
        }
        self.logs.push_front(text);
        while self.logs.len() > self.max_logs {
            self.logs.pop_back();
        }
    }

    pub fn recenter(&mut self) {
        self.viewport = self.home;
    }

    /// Move the selection `step` markers forward (negative goes back), wrapping around.
    pub fn select_step(&mut self, markers: &MarkerSet, step: isize) {
        let sorted = markers.sorted();
        if sorted.is_empty() {
            self.selected = None;
            return;
        }
        let len = sorted.len() as isize;
        let current = self
            .selected
            .as_deref()
            .and_then(|id| sorted.iter().position(|marker| marker.gym_id == id));
        let next = match current {
            Some(index) => (index as isize + step).rem_euclid(len),
            None if step < 0 => len - 1,
            None => 0,
        };
        self.selected = Some(sorted[next as usize].gym_id.clone());
    }
}

pub fn team_color(team: Team) -> Color {
    match team {
        Team::Neutral => Color::Gray,
        Team::Mystic => Color::Blue,
        Team::Valor => Color::Red,
        Team::Instinct => Color::Yellow,
    }
}

fn popup_style(frame: PopupFrame) -> Style {
    if frame.opacity < 0.35 {
        Style::default().fg(Color::DarkGray)
    } else if frame.opacity < 0.7 {
        Style::default().fg(Color::Gray)
    } else {
        Style::default()
            .fg(Color::White)
            .add_modifier(Modifier::BOLD)
    }
}

pub fn draw_ui(frame: &mut Frame, page: &PageController, state: &UiState, now: Instant) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(10),
            Constraint::Length(8),
        ])
        .split(frame.size());

    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(62), Constraint::Percentage(38)])
        .split(rows[1]);

    let sidebar = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(6),
            Constraint::Length(7),
            Constraint::Min(4),
        ])
        .split(body[1]);

    draw_header(frame, rows[0], page);
    draw_map(frame, body[0], page, state, now);
    draw_stats(frame, sidebar[0], page);
    draw_selected(frame, sidebar[1], page, state);
    draw_feed(frame, sidebar[2], page);
    draw_logs(frame, rows[2], state);
}

fn draw_header(frame: &mut Frame, area: Rect, page: &PageController) {
    let block = Block::default().borders(Borders::ALL).title("Gym Watch");
    let status = match page.updated_at_label() {
        Some(label) => Span::styled(
            format!("Actualizado {label}"),
            Style::default().fg(Color::Green),
        ),
        None => Span::styled("Esperando datos", Style::default().fg(Color::Yellow)),
    };
    let line = Line::from(vec![
        status,
        Span::raw(format!(" | {} gimnasios", page.store().len())),
        Span::raw(" | flechas mover, +/- zoom, c centrar, tab gimnasio, q salir"),
    ]);
    let text = Paragraph::new(line).wrap(Wrap { trim: true });
    frame.render_widget(block, area);
    frame.render_widget(
        text,
        area.inner(&Margin {
            vertical: 1,
            horizontal: 1,
        }),
    );
}

fn draw_map(frame: &mut Frame, area: Rect, page: &PageController, state: &UiState, now: Instant) {
    let block = Block::default().borders(Borders::ALL).title("Mapa");
    let inner = block.inner(area);
    let bounds = state.viewport.bounds(inner.width, inner.height);

    let mut by_icon: [Vec<(f64, f64)>; 4] = Default::default();
    for marker in page.markers().iter() {
        let slot = match marker.icon {
            GymIcon::Uncontested => 0,
            GymIcon::Mystic => 1,
            GymIcon::Valor => 2,
            GymIcon::Instinct => 3,
        };
        by_icon[slot].push((marker.longitude, marker.latitude));
    }

    let selected = state
        .selected
        .as_deref()
        .and_then(|id| page.markers().get(id));
    let popups: Vec<(f64, f64, String, Style)> = page
        .popups()
        .visible(now)
        .map(|(popup, popup_frame)| {
            let lift = f64::from(popup_frame.lift) * POPUP_DRIFT * bounds.height();
            (
                popup.longitude,
                popup.latitude + lift,
                popup.text.clone(),
                popup_style(popup_frame),
            )
        })
        .collect();

    let canvas = Canvas::default()
        .block(block)
        .marker(Marker::Braille)
        .x_bounds(bounds.x)
        .y_bounds(bounds.y)
        .paint(|ctx| {
            for (icon, coords) in [
                GymIcon::Uncontested,
                GymIcon::Mystic,
                GymIcon::Valor,
                GymIcon::Instinct,
            ]
            .iter()
            .zip(by_icon.iter())
            {
                ctx.draw(&Points {
                    coords,
                    color: team_color(icon.team()),
                });
            }
            ctx.layer();
            if let Some(marker) = selected {
                ctx.print(
                    marker.longitude,
                    marker.latitude,
                    Span::styled(
                        "◎",
                        Style::default()
                            .fg(team_color(marker.icon.team()))
                            .add_modifier(Modifier::BOLD),
                    ),
                );
            }
            for (x, y, text, style) in &popups {
                ctx.print(*x, *y, Span::styled(text.clone(), *style));
            }
        });
    frame.render_widget(canvas, area);
}

fn draw_stats(frame: &mut Frame, area: Rect, page: &PageController) {
    let block = Block::default().borders(Borders::ALL).title("Equipos");
    let stats = page.stats();
    let lines: Vec<Line> = [Team::Mystic, Team::Valor, Team::Instinct, Team::Neutral]
        .iter()
        .map(|team| {
            Line::from(vec![
                Span::styled(
                    format!("{:9}", team.name()),
                    Style::default().fg(team_color(*team)),
                ),
                Span::raw(stats.slot_text(*team)),
            ])
        })
        .collect();
    let paragraph = Paragraph::new(lines).wrap(Wrap { trim: false });
    frame.render_widget(block, area);
    frame.render_widget(
        paragraph,
        area.inner(&Margin {
            vertical: 1,
            horizontal: 1,
        }),
    );
}

fn draw_selected(frame: &mut Frame, area: Rect, page: &PageController, state: &UiState) {
    let block = Block::default().borders(Borders::ALL).title("Gimnasio");
    let marker: Option<&GymMarker> = state
        .selected
        .as_deref()
        .and_then(|id| page.markers().get(id));
    let lines: Vec<Line> = match marker {
        Some(marker) => {
            let popup = &marker.popup;
            let mut lines = vec![
                Line::from(Span::styled(
                    popup.name.clone(),
                    Style::default()
                        .fg(team_color(popup.icon.team()))
                        .add_modifier(Modifier::BOLD),
                )),
                Line::from(Span::styled(
                    popup.icon.asset_path(),
                    Style::default().fg(Color::DarkGray),
                )),
            ];
            lines.extend(popup.lines().into_iter().map(|text| Line::from(format!("- {text}"))));
            lines
        }
        None => vec![Line::from(Span::styled(
            "tab para elegir un gimnasio",
            Style::default().fg(Color::DarkGray),
        ))],
    };
    let paragraph = Paragraph::new(lines).wrap(Wrap { trim: false });
    frame.render_widget(block, area);
    frame.render_widget(
        paragraph,
        area.inner(&Margin {
            vertical: 1,
            horizontal: 1,
        }),
    );
}

fn draw_feed(frame: &mut Frame, area: Rect, page: &PageController) {
    let block = Block::default().borders(Borders::ALL).title("Cambios");
    let lines: Vec<Line> = page
        .feed()
        .iter()
        .map(|entry| {
            Line::from(vec![
                Span::styled(entry.stamp.clone(), Style::default().fg(Color::DarkGray)),
                Span::raw(" "),
                Span::raw(entry.text.clone()),
            ])
        })
        .collect();
    let paragraph = Paragraph::new(lines).wrap(Wrap { trim: false });
    frame.render_widget(block, area);
    frame.render_widget(
        paragraph,
        area.inner(&Margin {
            vertical: 1,
            horizontal: 1,
        }),
    );
}

fn draw_logs(frame: &mut Frame, area: Rect, state: &UiState) {
    let block = Block::default().borders(Borders::ALL).title("Logs");
    let lines: Vec<Line> = state
        .logs
        .iter()
        .map(|entry| Line::from(Span::raw(entry)))
        .collect();
    let paragraph = Paragraph::new(lines).wrap(Wrap { trim: false });
    frame.render_widget(block, area);
    frame.render_widget(
        paragraph,
        area.inner(&Margin {
            vertical: 1,
            horizontal: 1,
        }),
    );
}
