use std::io::stdout;
use std::time::Duration;

use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use questlog_core::views::{format_duration, format_period};
use questlog_protocol::ThemeToken;
use ratatui::{
    Frame, Terminal,
    backend::CrosstermBackend,
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap},
};

use crate::app::App;
use crate::banner::Banner;

const FRAME_INTERVAL: Duration = Duration::from_millis(80);

fn theme_to_color(token: ThemeToken) -> Color {
    match token {
        ThemeToken::QuestMain => Color::Rgb(137, 180, 250),
        ThemeToken::QuestSide => Color::Rgb(166, 227, 161),
        ThemeToken::QuestOther => Color::Rgb(250, 179, 135),
        ThemeToken::QuestOngoing => Color::Rgb(249, 226, 175),
        ThemeToken::SelectionHighlight | ThemeToken::NavActive => Color::Rgb(203, 166, 247),
        ThemeToken::TextSecondary | ThemeToken::Axis | ThemeToken::Connector => Color::Gray,
        ThemeToken::TextMuted | ThemeToken::EmptyState | ThemeToken::AxisMarker => Color::DarkGray,
        ThemeToken::Splash => Color::Magenta,
        _ => Color::White,
    }
}

/// Run the viewer until the user quits.
pub fn run_tui(app: &mut App, banner: &mut Banner) -> Result<()> {
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = event_loop(&mut terminal, app, banner);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    result
}

fn event_loop(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    app: &mut App,
    banner: &mut Banner,
) -> Result<()> {
    while !app.should_quit() {
        let banner_lines = banner.frame_lines();
        terminal.draw(|frame| draw(frame, app, &banner_lines))?;

        if event::poll(FRAME_INTERVAL)?
            && let Event::Key(key) = event::read()?
            && key.kind == KeyEventKind::Press
        {
            app.handle_key(key.code);
        }
    }
    Ok(())
}

fn draw(frame: &mut Frame<'_>, app: &App, banner_lines: &[String]) {
    let [banner_area, header_area, list_area, footer_area] = Layout::vertical([
        Constraint::Length(banner_lines.len() as u16 + 1),
        Constraint::Length(1),
        Constraint::Min(3),
        Constraint::Length(1),
    ])
    .areas(frame.area());

    let banner_style = Style::default().fg(theme_to_color(ThemeToken::SelectionHighlight));
    let banner = Paragraph::new(
        banner_lines
            .iter()
            .map(|l| Line::styled(l.as_str(), banner_style))
            .collect::<Vec<_>>(),
    );
    frame.render_widget(banner, banner_area);

    let header = Line::from(vec![
        Span::styled(
            format!(" {} ", app.view().as_str()),
            Style::default().add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!("| category: {} ", app.category().unwrap_or("all")),
            Style::default().fg(theme_to_color(ThemeToken::TextSecondary)),
        ),
    ]);
    frame.render_widget(Paragraph::new(header), header_area);

    draw_list(frame, app, list_area);

    let footer = Paragraph::new(" ↑/↓ move | Enter details | Esc close | c category | v view | q quit ")
        .style(Style::default().fg(theme_to_color(ThemeToken::TextMuted)));
    frame.render_widget(footer, footer_area);

    if app.details().is_some() {
        draw_details(frame, app, list_area);
    }
}

fn draw_list(frame: &mut Frame<'_>, app: &App, area: Rect) {
    let block = Block::default().borders(Borders::ALL).title(" Experience ");

    if let Some(message) = app.empty_message() {
        let empty = Paragraph::new(message)
            .style(Style::default().fg(theme_to_color(ThemeToken::EmptyState)))
            .block(block);
        frame.render_widget(empty, area);
        return;
    }

    let items: Vec<ListItem<'_>> = app
        .rows()
        .iter()
        .map(|row| {
            let indent = "  ".repeat(row.depth as usize);
            let color = theme_to_color(ThemeToken::for_category(row.category.as_deref()));
            ListItem::new(Line::from(vec![
                Span::raw(indent),
                Span::styled("■ ", Style::default().fg(color)),
                Span::raw(row.title.clone()),
                Span::styled(
                    format!("  {}", row.period),
                    Style::default().fg(theme_to_color(ThemeToken::TextSecondary)),
                ),
            ]))
        })
        .collect();

    let list = List::new(items)
        .block(block)
        .highlight_style(
            Style::default()
                .fg(theme_to_color(ThemeToken::SelectionHighlight))
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("▶ ");
    let mut state = ListState::default().with_selected(Some(app.cursor()));
    frame.render_stateful_widget(list, area, &mut state);
}

fn draw_details(frame: &mut Frame<'_>, app: &App, area: Rect) {
    let Some(entry) = app.details() else {
        return;
    };
    let popup = centered(area, 70, 70);
    let muted = Style::default().fg(theme_to_color(ThemeToken::TextSecondary));

    let mut lines = vec![
        Line::from(format!(
            "{}  ({})",
            format_period(entry.start, entry.end, "present"),
            format_duration(entry.elapsed_days(app.today()))
        ))
        .style(muted),
        Line::raw(""),
    ];
    lines.extend(entry.description.lines().map(|l| Line::raw(l.to_string())));
    if !entry.skills.is_empty() {
        lines.push(Line::raw(""));
        lines.push(Line::styled(format!("Skills: {}", entry.skills.join(", ")), muted));
    }
    if let Some(url) = &entry.url {
        lines.push(Line::styled(format!("Visit: {url}"), muted));
    }

    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!(" {} ", entry.title.as_str()))
        .title_bottom(" Esc close ");
    frame.render_widget(Clear, popup);
    frame.render_widget(
        Paragraph::new(lines).block(block).wrap(Wrap { trim: false }),
        popup,
    );
}

/// `percent_x` × `percent_y` rectangle centred in `area`.
fn centered(area: Rect, percent_x: u16, percent_y: u16) -> Rect {
    let width = area.width * percent_x / 100;
    let height = area.height * percent_y / 100;
    Rect::new(
        area.x + (area.width - width) / 2,
        area.y + (area.height - height) / 2,
        width,
        height,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn popup_is_centred_inside_its_area() {
        let area = Rect::new(0, 10, 100, 40);
        let popup = centered(area, 70, 50);
        assert_eq!(popup, Rect::new(15, 20, 70, 20));
    }

    #[test]
    fn categories_get_distinct_colors() {
        let main = theme_to_color(ThemeToken::for_category(Some("main")));
        let side = theme_to_color(ThemeToken::for_category(Some("side")));
        let other = theme_to_color(ThemeToken::for_category(None));
        assert_ne!(main, side);
        assert_ne!(side, other);
    }
}
