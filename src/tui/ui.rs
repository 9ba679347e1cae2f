use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, Paragraph, Wrap},
    Frame,
};

use crate::models::{ClassBucket, WORLDS};
use crate::report;
use crate::roster::describe_range;
use crate::session::{DetailView, NoticeKind, Phase};
use crate::tui::app::{App, InputMode};

pub fn draw(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Min(8),
            Constraint::Length(3),
        ])
        .split(frame.size());

    let title = Paragraph::new("⚔ Party Finder")
        .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(title, chunks[0]);

    draw_controls(frame, app, chunks[1]);
    draw_status(frame, app, chunks[2]);
    draw_columns(frame, app, chunks[3]);
    draw_help(frame, app, chunks[4]);

    if app.input_mode == InputMode::PickingWorld {
        draw_world_picker(frame, app);
    }

    if app.session.phase == Phase::Loading {
        draw_loading(frame, "Loading world data...");
    }

    if app.session.detail != DetailView::Hidden {
        draw_detail(frame, &app.session.detail);
    }

    if let Some((notice, _)) = &app.notice {
        draw_notice(frame, &notice.message, notice.kind);
    }
}

fn draw_controls(frame: &mut Frame, app: &App, area: Rect) {
    let world = app
        .session
        .selected_world
        .as_deref()
        .and_then(crate::models::find_world)
        .unwrap_or("-");

    let level_style = if app.input_mode == InputMode::EditingLevel {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default()
    };

    let line = Line::from(vec![
        Span::raw("World: "),
        Span::styled(world, Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)),
        Span::raw("   Level: "),
        Span::styled(
            if app.level_input.is_empty() { "-".to_string() } else { app.level_input.clone() },
            level_style,
        ),
        Span::raw("   Range: "),
        Span::styled(
            describe_range(app.reference_level()),
            Style::default().fg(Color::Green),
        ),
    ]);

    let controls = Paragraph::new(line).block(Block::default().borders(Borders::ALL).title("Filters"));
    frame.render_widget(controls, area);

    if app.input_mode == InputMode::EditingLevel {
        let offset = "World: ".len() + world.chars().count() + "   Level: ".len() + app.level_input.len();
        frame.set_cursor(area.x + 1 + offset as u16, area.y + 1);
    }
}

fn draw_status(frame: &mut Frame, app: &App, area: Rect) {
    let line = if let Some(error) = &app.error_message {
        Line::from(vec![
            Span::styled("Error: ", Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)),
            Span::styled(error.as_str(), Style::default().fg(Color::Red)),
        ])
    } else {
        match &app.session.phase {
            Phase::Failed(message) => Line::from(Span::styled(
                message.as_str(),
                Style::default().fg(Color::Red),
            )),
            _ => match &app.session.view {
                Some(view) => Line::from(Span::raw(report::summary_line(view))),
                None => Line::from(Span::styled(
                    "Pick a world with 'w' to see who is online",
                    Style::default().fg(Color::DarkGray),
                )),
            },
        }
    };

    let refreshing = if app.session.is_refreshing { " (refreshing...)" } else { "" };
    let status = Paragraph::new(line)
        .block(Block::default().borders(Borders::ALL).title(format!("Status{}", refreshing)));
    frame.render_widget(status, area);
}

fn draw_columns(frame: &mut Frame, app: &App, area: Rect) {
    // Results stay hidden while a roster fetch fails.
    let view = match (&app.session.phase, &app.session.view) {
        (Phase::Failed(_), _) | (_, None) => {
            let empty = Block::default().borders(Borders::ALL).title("Players");
            frame.render_widget(empty, area);
            return;
        }
        (_, Some(view)) => view,
    };

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Ratio(1, 5); 5])
        .split(area);

    for (i, class) in ClassBucket::DISPLAY_ORDER.iter().enumerate() {
        let players = view.bucket(*class);
        let is_selected_column = i == app.selected_column;

        let mut items: Vec<ListItem> = players
            .iter()
            .enumerate()
            .map(|(row, player)| {
                let style = if is_selected_column && row == app.selected_row {
                    Style::default().bg(Color::DarkGray).add_modifier(Modifier::BOLD)
                } else {
                    Style::default()
                };
                ListItem::new(vec![
                    Line::from(Span::styled(player.name.as_str(), Style::default().fg(Color::White))),
                    Line::from(vec![
                        Span::styled(player.vocation.as_str(), Style::default().fg(Color::DarkGray)),
                        Span::raw(" "),
                        Span::styled(format!("Lv {}", player.level), Style::default().fg(Color::Yellow)),
                    ]),
                ])
                .style(style)
            })
            .collect();

        if players.is_empty() && view.is_filtered() {
            items.push(ListItem::new("No players in range").style(Style::default().fg(Color::DarkGray)));
        }

        let border_style = if is_selected_column {
            Style::default().fg(Color::Cyan)
        } else {
            Style::default()
        };

        let list = List::new(items).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(border_style)
                .title(report::bucket_title(view, *class)),
        );
        frame.render_widget(list, columns[i]);
    }
}

fn draw_help(frame: &mut Frame, app: &App, area: Rect) {
    let key = |k: &'static str| Span::styled(k, Style::default().fg(Color::Green).add_modifier(Modifier::BOLD));

    let line = match app.input_mode {
        InputMode::Normal => Line::from(vec![
            key("w"), Span::raw(" world | "),
            key("l"), Span::raw(" level | "),
            key("Enter"), Span::raw(" search | "),
            key("r"), Span::raw(" refresh | "),
            key("c"), Span::raw(" clear | "),
            key("i"), Span::raw(" info | "),
            key("y"), Span::raw(" copy name | "),
            Span::styled("q", Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)),
            Span::raw(" quit"),
        ]),
        InputMode::PickingWorld => Line::from(vec![
            key("↑/↓"), Span::raw(" choose | "),
            key("Enter"), Span::raw(" load | "),
            key("Esc"), Span::raw(" cancel"),
        ]),
        InputMode::EditingLevel => Line::from(vec![
            Span::raw("Type your level | "),
            key("Enter/Esc"), Span::raw(" done"),
        ]),
    };

    frame.render_widget(Paragraph::new(line).block(Block::default().borders(Borders::ALL)), area);
}

fn draw_world_picker(frame: &mut Frame, app: &App) {
    let area = centered_rect(30, 60, frame.size());
    let visible = area.height.saturating_sub(2) as usize;
    let start = app.world_index.saturating_sub(visible / 2).min(WORLDS.len().saturating_sub(visible));

    let items: Vec<ListItem> = WORLDS
        .iter()
        .enumerate()
        .skip(start)
        .take(visible)
        .map(|(i, world)| {
            let style = if i == app.world_index {
                Style::default().bg(Color::DarkGray).add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };
            ListItem::new(*world).style(style)
        })
        .collect();

    let list = List::new(items).block(Block::default().borders(Borders::ALL).title("Select world"));
    frame.render_widget(Clear, area);
    frame.render_widget(list, area);
}

fn draw_loading(frame: &mut Frame, message: &str) {
    let area = centered_rect(40, 15, frame.size());
    let loading = Paragraph::new(message)
        .style(Style::default().fg(Color::Cyan))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL).title("⏳ Loading"));

    frame.render_widget(Clear, area);
    frame.render_widget(loading, area);
}

fn draw_detail(frame: &mut Frame, detail: &DetailView) {
    let area = centered_rect(60, 80, frame.size());

    let (title, lines) = match detail {
        DetailView::Hidden => return,
        DetailView::Loading { name } => (
            name.clone(),
            vec![Line::from(format!("Loading information for {}...", name))],
        ),
        DetailView::Failed { name, message } => (
            name.clone(),
            vec![
                Line::from(Span::styled(
                    format!("Could not load character \"{}\"", name),
                    Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
                )),
                Line::from(format!("Details: {}", message)),
                Line::from(""),
                Line::from(Span::styled(
                    "Check the name is spelled correctly and that the character exists.",
                    Style::default().fg(Color::DarkGray),
                )),
            ],
        ),
        DetailView::Ready(sheet) => {
            let mut lines = Vec::new();
            for section in report::character_sections(sheet) {
                lines.push(Line::from(Span::styled(
                    section.title,
                    Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
                )));
                for (label, value) in section.rows {
                    lines.push(Line::from(vec![
                        Span::styled(format!("  {}: ", label), Style::default().fg(Color::White)),
                        Span::styled(value, Style::default().fg(Color::Yellow)),
                    ]));
                }
                lines.push(Line::from(""));
            }
            (sheet.name.clone(), lines)
        }
    };

    let popup = Paragraph::new(lines)
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::ALL).title(format!("{} (Esc to close)", title)));

    frame.render_widget(Clear, area);
    frame.render_widget(popup, area);
}

fn draw_notice(frame: &mut Frame, message: &str, kind: NoticeKind) {
    let size = frame.size();
    let width = (message.chars().count() as u16 + 4).min(size.width);
    let area = Rect {
        x: size.width.saturating_sub(width + 1),
        y: size.height.saturating_sub(4),
        width,
        height: 3.min(size.height),
    };

    let color = match kind {
        NoticeKind::Success => Color::Green,
        NoticeKind::Error => Color::Red,
    };

    let toast = Paragraph::new(message)
        .style(Style::default().fg(color))
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(Clear, area);
    frame.render_widget(toast, area);
}

fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
