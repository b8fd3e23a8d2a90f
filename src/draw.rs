use tui::backend::Backend;
use tui::layout::{Alignment, Constraint, Layout, Rect};
use tui::style::{Color, Modifier, Style};
use tui::text::{Line, Span};
use tui::widgets::{Block, BorderType, Borders, Cell, Paragraph, Row, Table, TableState, Tabs};
use tui::{Frame, Terminal};
use tui_logger::TuiLoggerWidget;

use crate::app::{App, MenuItem};
use crate::components::stats_table::StatsTableView;
use crate::state::app_state::{CascadingFilter, LoadStatus, MatchesState};
use crate::state::network::{ERROR_CHAR, LoadingState};
use crate::ui::layout::LayoutAreas;
use league_api::{Match, MatchTopPlayer, WinLoss, placement_label};

static TABS: &[&str; 4] = &["Season Rankings", "National Rankings", "Player Stats", "Team Matches"];

const GOLD: Color = Color::Rgb(255, 215, 0);
const SILVER: Color = Color::Rgb(192, 192, 192);
const BRONZE: Color = Color::Rgb(205, 127, 50);

pub fn draw<B>(terminal: &mut Terminal<B>, app: &mut App, loading: LoadingState)
where
    B: Backend,
{
    let current_size = terminal.size().unwrap_or_default();
    if current_size.width <= 10 || current_size.height <= 10 {
        return;
    }

    let mut layout = LayoutAreas::new(current_size);

    let result = terminal.draw(|f| {
        layout.update(f.area(), app.settings.full_screen, app.state.show_logs);

        if !app.settings.full_screen {
            draw_tabs(f, layout.tab_bar, app);
        }

        match app.state.active_tab {
            MenuItem::SeasonRankings => draw_season_rankings(f, layout.main, app),
            MenuItem::NationalRankings => draw_nationals(f, layout.main, app),
            MenuItem::PlayerStats => draw_player_stats(f, layout.main, app),
            MenuItem::TeamMatches => draw_team_matches(f, layout.main, app),
            MenuItem::Help => draw_help(f, layout.main),
        }

        if let Some(logs) = layout.logs {
            draw_logs(f, logs);
        }

        draw_loading_spinner(f, f.area(), app, loading);
    });
    if let Err(e) = result {
        log::error!("draw failed: {e}");
    }
}

pub fn default_border<'a>(color: Color) -> Block<'a> {
    Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(color))
}

fn draw_tabs(f: &mut Frame, tab_bar: [Rect; 2], app: &App) {
    let style = Style::default().fg(Color::White);
    let border_type = BorderType::Rounded;

    let tab_for_index = match app.state.active_tab {
        MenuItem::Help => app.state.previous_tab,
        other => other,
    };
    let tab_index = match tab_for_index {
        MenuItem::SeasonRankings | MenuItem::Help => 0,
        MenuItem::NationalRankings => 1,
        MenuItem::PlayerStats => 2,
        MenuItem::TeamMatches => 3,
    };

    let titles: Vec<Line> = TABS.iter().map(|t| Line::from(*t)).collect();
    let tabs = Tabs::new(titles)
        .block(
            Block::default()
                .borders(Borders::LEFT | Borders::BOTTOM | Borders::TOP)
                .border_type(border_type),
        )
        .highlight_style(Style::default().add_modifier(Modifier::UNDERLINED))
        .select(tab_index)
        .style(style);
    f.render_widget(tabs, tab_bar[0]);

    let help = Paragraph::new("Help: ? ")
        .alignment(Alignment::Right)
        .block(
            Block::default()
                .borders(Borders::RIGHT | Borders::BOTTOM | Borders::TOP)
                .border_type(border_type),
        )
        .style(style);
    f.render_widget(help, tab_bar[1]);
}

/// Draws a message in place of the view's content unless it has loaded.
/// Returns true when the caller should draw nothing else.
fn draw_status(f: &mut Frame, area: Rect, status: &LoadStatus, what: &str, is_empty: bool) -> bool {
    let (msg, color) = match status {
        LoadStatus::Idle => (format!("No {what} requested yet"), Color::DarkGray),
        LoadStatus::Loading => (format!("Loading {what}..."), Color::DarkGray),
        LoadStatus::Failed(_) => (format!("Failed to load {what}"), Color::Red),
        LoadStatus::Loaded if is_empty => (format!("No {what} found"), Color::DarkGray),
        LoadStatus::Loaded => return false,
    };
    f.render_widget(
        Paragraph::new(msg)
            .style(Style::default().fg(color))
            .alignment(Alignment::Center),
        area,
    );
    true
}

fn header_and_legend(f: &mut Frame, area: Rect, header: String, legend: &str) -> Rect {
    let [header_area, legend_area, content] =
        Layout::vertical([Constraint::Length(1), Constraint::Length(1), Constraint::Fill(1)]).areas(area);
    f.render_widget(Paragraph::new(header), header_area);
    f.render_widget(
        Paragraph::new(legend.to_string()).style(Style::default().fg(Color::DarkGray)),
        legend_area,
    );
    content
}

fn updated_suffix(loaded_at: Option<&str>) -> String {
    loaded_at.map(|t| format!(" | updated {t}")).unwrap_or_default()
}

fn division_label(division: u32) -> String {
    if division == 0 { "All".to_string() } else { division.to_string() }
}

fn record_label(record: &WinLoss) -> String {
    format!("{}-{}", record.won, record.lost)
}

fn signed(value: i64) -> String {
    if value > 0 { format!("+{value}") } else { value.to_string() }
}

fn draw_season_rankings(f: &mut Frame, area: Rect, app: &App) {
    let block = default_border(Color::White).title(" Season Rankings ");
    let inner = block.inner(area);
    f.render_widget(block, area);

    let season = &app.state.season;
    let groups = if season.groups.is_empty() {
        String::new()
    } else {
        format!("/{}", season.groups.len())
    };
    let header = format!(
        "Division {} | Group {}{groups} | top {} advance{}",
        season.division,
        season.group,
        season.playoff_spots(),
        updated_suffix(season.loaded_at.as_deref())
    );
    let content = header_and_legend(
        f,
        inner,
        header,
        "Keys: d/D=division  g/G=group  j/k=move  Enter=matches  r=reload",
    );
    if draw_status(f, content, &season.status, "season rankings", season.rankings.is_empty()) {
        return;
    }

    let cut = season.playoff_spots();
    let rows: Vec<Row> = season
        .rankings
        .iter()
        .enumerate()
        .map(|(i, team)| {
            let record = &team.record;
            let style = if i < cut {
                Style::default().fg(Color::Green)
            } else {
                Style::default()
            };
            // Underline the last team above the playoff line.
            let style = if i + 1 == cut {
                style.add_modifier(Modifier::UNDERLINED)
            } else {
                style
            };
            Row::new(vec![
                Cell::from((i + 1).to_string()),
                Cell::from(team.name.clone()),
                Cell::from(record_label(&record.matches)),
                Cell::from(record.matches.win_rate()),
                Cell::from(record_label(&record.maps)),
                Cell::from(signed(record.maps.differential())),
                Cell::from(record_label(&record.rounds)),
                Cell::from(signed(record.rounds.differential())),
            ])
            .style(style)
        })
        .collect();

    let header = Row::new(vec!["#", "Team", "Matches", "Win %", "Maps", "+/-", "Rounds", "+/-"])
        .style(Style::default().fg(Color::White).add_modifier(Modifier::BOLD));
    let widths = [
        Constraint::Length(3),
        Constraint::Min(18),
        Constraint::Length(8),
        Constraint::Length(7),
        Constraint::Length(7),
        Constraint::Length(5),
        Constraint::Length(8),
        Constraint::Length(6),
    ];
    let table = Table::new(rows, widths)
        .header(header)
        .row_highlight_style(Style::default().bg(Color::DarkGray))
        .highlight_symbol("> ");
    let mut state = TableState::default().with_selected(Some(season.selected));
    f.render_stateful_widget(table, content, &mut state);
}

fn draw_nationals(f: &mut Frame, area: Rect, app: &App) {
    let block = default_border(Color::White).title(" National Rankings ");
    let inner = block.inner(area);
    f.render_widget(block, area);

    let nationals = &app.state.nationals;
    let header = format!(
        "Division {} | qualified teams {}{}",
        division_label(nationals.division),
        if nationals.hide_qualified { "hidden" } else { "shown" },
        updated_suffix(nationals.loaded_at.as_deref())
    );
    let content = header_and_legend(
        f,
        inner,
        header,
        "Keys: i=hide qualified  d/D=division  j/k=move  Enter=matches  r=reload",
    );
    if draw_status(f, content, &nationals.status, "national rankings", nationals.rankings.is_empty()) {
        return;
    }

    let rows: Vec<Row> = nationals
        .rankings
        .iter()
        .enumerate()
        .map(|(i, ranking)| {
            let qualified = ranking.auto_qualified();
            let style = if qualified {
                Style::default().fg(Color::Green)
            } else {
                Style::default()
            };
            Row::new(vec![
                Cell::from((i + 1).to_string()),
                Cell::from(ranking.team.name.clone()),
                Cell::from(format!("{:.1}", ranking.national_points)),
                Cell::from(placement_label(ranking.fall_season_placement)),
                Cell::from(placement_label(ranking.fall_playoff_placement)),
                Cell::from(placement_label(ranking.spring_season_placement)),
                Cell::from(placement_label(ranking.spring_playoff_placement)),
                Cell::from(if qualified { "auto" } else { "" }),
            ])
            .style(style)
        })
        .collect();

    let header = Row::new(vec![
        "#",
        "Team",
        "Points",
        "Fall",
        "Fall PO",
        "Spring",
        "Spring PO",
        "Qualified",
    ])
    .style(Style::default().fg(Color::White).add_modifier(Modifier::BOLD));
    let widths = [
        Constraint::Length(4),
        Constraint::Min(18),
        Constraint::Length(7),
        Constraint::Length(5),
        Constraint::Length(8),
        Constraint::Length(7),
        Constraint::Length(10),
        Constraint::Length(9),
    ];
    let table = Table::new(rows, widths)
        .header(header)
        .row_highlight_style(Style::default().bg(Color::DarkGray))
        .highlight_symbol("> ");
    let mut state = TableState::default().with_selected(Some(nationals.selected));
    f.render_stateful_widget(table, content, &mut state);
}

fn group_label(filter: &CascadingFilter) -> String {
    let spec = filter.spec();
    if spec.is_unconstrained() {
        "-".to_string()
    } else if filter.groups.is_empty() {
        format!("{} (loading groups)", division_label(spec.group))
    } else {
        format!("{}/{}", division_label(spec.group), filter.groups.len())
    }
}

fn draw_player_stats(f: &mut Frame, area: Rect, app: &App) {
    let block = default_border(Color::White).title(" Player Stats ");
    let inner = block.inner(area);
    f.render_widget(block, area);

    let stats = &app.state.stats;
    let filter = stats.filter.spec();
    let group = group_label(&stats.filter);
    let sort_label = stats
        .columns()
        .iter()
        .find(|c| c.key == stats.sort.key)
        .map(|c| c.label)
        .unwrap_or("?");
    let header = format!(
        "Division {} | Group {group} | sorted by {sort_label} {} | {} players{}",
        division_label(filter.division),
        stats.sort.direction.arrow(),
        stats.rows().len(),
        updated_suffix(stats.loaded_at.as_deref())
    );
    let legend = if stats.show_extended {
        "Keys: h/l=column  s=sort  x=basic stats  d/D=division  g/G=group  t=team  r=reload"
    } else {
        "Keys: h/l=column  s=sort  x=all stats  d/D=division  g/G=group  t=team  r=reload"
    };
    let content = header_and_legend(f, inner, header, legend);
    if draw_status(f, content, &stats.status, "player stats", stats.rows().is_empty()) {
        return;
    }

    f.render_widget(StatsTableView { state: stats, block: Block::default() }, content);
}

fn draw_team_matches(f: &mut Frame, area: Rect, app: &App) {
    let matches = &app.state.matches;
    let title = match (&matches.team_name, &matches.team_id) {
        (Some(name), _) => format!(" Matches: {name} "),
        (None, Some(id)) => format!(" Matches: {id} "),
        (None, None) => " Team Matches ".to_string(),
    };
    let block = default_border(Color::White).title(title);
    let inner = block.inner(area);
    f.render_widget(block, area);

    if matches.team_id.is_none() {
        f.render_widget(
            Paragraph::new("Select a team on a rankings tab and press Enter")
                .style(Style::default().fg(Color::DarkGray))
                .alignment(Alignment::Center),
            inner,
        );
        return;
    }

    let content = header_and_legend(
        f,
        inner,
        format!("{} matches{}", matches.matches.len(), updated_suffix(matches.loaded_at.as_deref())),
        "Keys: j/k=move  Enter=top players  m=next map  Esc=back  r=reload",
    );
    if draw_status(f, content, &matches.status, "matches", matches.matches.is_empty()) {
        return;
    }

    let [list_area, detail_area] =
        Layout::horizontal([Constraint::Percentage(50), Constraint::Percentage(50)]).areas(content);
    draw_match_list(f, list_area, matches);

    let Some(selected) = matches.selected_match() else {
        return;
    };
    if matches.top_players.is_open() {
        let [details, top] =
            Layout::vertical([Constraint::Fill(1), Constraint::Length(9)]).areas(detail_area);
        draw_match_details(f, details, matches, selected);
        draw_top_players(f, top, matches);
    } else {
        draw_match_details(f, detail_area, matches, selected);
    }
}

fn match_summary(m: &Match, team_id: Option<&str>) -> (String, Style) {
    let view = m.perspective(team_id);
    let result = if view.won { "W" } else { "L" };
    let score = if view.forfeit {
        "FF".to_string()
    } else if m.maps.len() == 1 {
        let (ours, theirs) = m.maps[0].score(view.as_team1);
        format!("{ours}-{theirs}")
    } else {
        let won = m.maps.iter().filter(|map| map.winner == view.this.team_id).count();
        format!("{won}-{}", m.maps.len() - won)
    };
    let color = if view.won { Color::Green } else { Color::Red };
    (
        format!("{result} {score:>5}  vs {}  {}", view.opponent.name, m.date_label()),
        Style::default().fg(color),
    )
}

fn draw_match_list(f: &mut Frame, area: Rect, matches: &MatchesState) {
    let team_id = matches.team_id.as_deref();
    let mut lines = Vec::new();
    let mut selected_line = 0usize;
    let mut index = 0usize;
    for bucket in league_api::matches::group_by_week(&matches.matches) {
        lines.push(Line::from(Span::styled(
            format!("Week {}", bucket.week),
            Style::default().fg(Color::Gray).add_modifier(Modifier::BOLD),
        )));
        for m in bucket.matches {
            let (text, style) = match_summary(m, team_id);
            let marker = if index == matches.selected {
                selected_line = lines.len();
                "> "
            } else {
                "  "
            };
            let style = if index == matches.selected {
                style.add_modifier(Modifier::REVERSED)
            } else {
                style
            };
            lines.push(Line::from(vec![Span::raw(marker), Span::styled(text, style)]));
            index += 1;
        }
    }

    let height = area.height as usize;
    let scroll = selected_line.saturating_sub(height.saturating_sub(1));
    f.render_widget(Paragraph::new(lines).scroll((scroll as u16, 0)), area);
}

fn draw_match_details(f: &mut Frame, area: Rect, matches: &MatchesState, m: &Match) {
    let block = default_border(Color::DarkGray).title(format!(" Week {} ", m.week));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let view = m.perspective(matches.team_id.as_deref());
    let mut lines = vec![
        Line::from(format!("{} vs {}", view.this.name, view.opponent.name)),
        Line::from(Span::styled(
            m.date_label(),
            Style::default().fg(Color::Gray),
        )),
        Line::from(""),
    ];

    if let Some(loser) = view.forfeited_by() {
        lines.push(Line::from(Span::styled(
            format!("Forfeit by {loser}"),
            Style::default().fg(Color::Yellow),
        )));
    }

    for map in &m.maps {
        let (ours, theirs) = map.score(view.as_team1);
        let (h1_ours, h1_theirs) = map.first_half(view.as_team1);
        let (h2_ours, h2_theirs) = map.second_half(view.as_team1);
        let mut halves = format!("({h1_ours}-{h1_theirs}, {h2_ours}-{h2_theirs}");
        if let Some((ot_ours, ot_theirs)) = map.overtime(view.as_team1) {
            halves.push_str(&format!(", OT {ot_ours}-{ot_theirs}"));
        }
        halves.push(')');
        let color = if map.winner == view.this.team_id { Color::Green } else { Color::Red };
        lines.push(Line::from(vec![
            Span::styled(format!("{:<12}", map.map), Style::default().fg(color)),
            Span::raw(format!("{ours:>2}-{theirs:<2} ")),
            Span::styled(halves, Style::default().fg(Color::Gray)),
        ]));
    }

    if !m.url.is_empty() {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            m.details_url(),
            Style::default().fg(Color::DarkGray),
        )));
    }

    f.render_widget(Paragraph::new(lines), inner);
}

fn rank_color(index: usize) -> Color {
    match index {
        0 => GOLD,
        1 => SILVER,
        2 => BRONZE,
        _ => Color::White,
    }
}

fn top_player_row(index: usize, player: &MatchTopPlayer) -> Row<'static> {
    Row::new(vec![
        Cell::from(Span::styled(
            (index + 1).to_string(),
            Style::default().fg(rank_color(index)).add_modifier(Modifier::BOLD),
        )),
        Cell::from(player.nickname.clone()),
        Cell::from(player.team_name.clone()),
        Cell::from(format!("{:.2}", player.rating)),
        Cell::from(format!("{:.2}", player.kd_ratio)),
        Cell::from(format!("{}/{}/{}", player.kills, player.deaths, player.assists)),
        Cell::from(format!("{:.1}", player.adr)),
        Cell::from(player.headshot_label()),
        Cell::from(player.mvps.to_string()),
    ])
}

fn draw_top_players(f: &mut Frame, area: Rect, matches: &MatchesState) {
    let top = &matches.top_players;
    let title = match top.map {
        None => " Top Players: match ".to_string(),
        Some(n) => format!(" Top Players: map {n} "),
    };
    let block = default_border(Color::Yellow).title(title);
    let inner = block.inner(area);
    f.render_widget(block, area);

    if draw_status(f, inner, &top.status, "player data", top.players.is_empty()) {
        return;
    }

    let rows: Vec<Row> = top
        .players
        .iter()
        .enumerate()
        .map(|(i, p)| top_player_row(i, p))
        .collect();
    let header = Row::new(vec!["#", "Player", "Team", "Rating", "K/D", "K/D/A", "ADR", "HS%", "MVPs"])
        .style(Style::default().fg(Color::White).add_modifier(Modifier::BOLD));
    let widths = [
        Constraint::Length(2),
        Constraint::Min(12),
        Constraint::Min(10),
        Constraint::Length(6),
        Constraint::Length(5),
        Constraint::Length(9),
        Constraint::Length(6),
        Constraint::Length(4),
        Constraint::Length(4),
    ];
    f.render_widget(Table::new(rows, widths).header(header), inner);
}

fn draw_help(f: &mut Frame, area: Rect) {
    let block = default_border(Color::DarkGray).title(" Help ");
    let inner = block.inner(area);
    f.render_widget(block, area);

    let entries: &[(&str, &str)] = &[
        ("1 2 3 4", "Season rankings, national rankings, player stats, team matches"),
        ("j / k", "Move selection"),
        ("d / D", "Next / previous division"),
        ("g / G", "Next / previous group"),
        ("Enter", "Open team matches, or top players on the matches tab"),
        ("h / l", "Move column cursor (player stats)"),
        ("s", "Sort by column under cursor, again to flip direction"),
        ("x", "Toggle extended stat columns"),
        ("t", "Open matches for the selected player's team"),
        ("i", "Hide or show auto-qualified teams (nationals)"),
        ("m", "Cycle top players through maps"),
        ("r", "Reload current tab"),
        ("f", "Toggle full screen"),
        ("\"", "Toggle log pane"),
        ("Esc", "Back"),
        ("q", "Quit"),
    ];
    let lines: Vec<Line> = entries
        .iter()
        .map(|(key, what)| {
            Line::from(vec![
                Span::styled(format!("{key:>9}  "), Style::default().fg(Color::Yellow)),
                Span::raw(*what),
            ])
        })
        .collect();
    f.render_widget(Paragraph::new(lines), inner);
}

fn draw_logs(f: &mut Frame, area: Rect) {
    let logs = TuiLoggerWidget::default()
        .block(default_border(Color::DarkGray).title(" Logs "))
        .style_error(Style::default().fg(Color::Red))
        .style_warn(Style::default().fg(Color::Yellow))
        .style_info(Style::default().fg(Color::White))
        .style_debug(Style::default().fg(Color::Gray));
    f.render_widget(logs, area);
}

fn draw_loading_spinner(f: &mut Frame, area: Rect, app: &App, loading: LoadingState) {
    if !loading.is_loading && loading.spinner_char != ERROR_CHAR {
        return;
    }
    let style = match loading.spinner_char {
        ERROR_CHAR => Style::default().fg(Color::Red),
        _ => Style::default().fg(Color::White),
    };
    let spinner = Paragraph::new(loading.spinner_char.to_string())
        .alignment(Alignment::Right)
        .style(style);
    let area = if app.settings.full_screen {
        Rect::new(area.width.saturating_sub(3), area.height.saturating_sub(2), 1, 1)
    } else {
        Rect::new(area.width.saturating_sub(11), 1, 1, 1)
    };
    f.render_widget(spinner, area);
}
