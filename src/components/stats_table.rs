use tui::buffer::Buffer;
use tui::layout::{Constraint, Rect};
use tui::style::{Color, Modifier, Style};
use tui::text::Span;
use tui::widgets::{Block, Cell, Row, StatefulWidget, Table, TableState, Widget};

use crate::state::app_state::StatsTableState;
use crate::state::stat_columns::{StatColumn, StatFormat, format_stat};

/// Player, Team and Div stay on screen while the stat columns scroll.
pub const PINNED_COLUMNS: usize = 3;

const RANK_WIDTH: u16 = 4;
const TEXT_WIDTH: u16 = 16;
const MIN_STAT_WIDTH: u16 = 6;
const COLUMN_SPACING: u16 = 1;

pub fn column_width(column: &StatColumn) -> u16 {
    match column.format {
        StatFormat::Text => TEXT_WIDTH,
        // Room for the label plus a sort arrow.
        _ => (column.label.chars().count() as u16 + 2).max(MIN_STAT_WIDTH),
    }
}

/// First scrollable column to draw so that `cursor` is visible within
/// `budget` cells. Widths already include spacing.
pub fn scroll_start(widths: &[u16], pinned: usize, cursor: usize, budget: u16) -> usize {
    if cursor < pinned || cursor >= widths.len() {
        return pinned.min(widths.len());
    }
    let from_pinned: u16 = widths[pinned..=cursor].iter().sum();
    if from_pinned <= budget {
        return pinned;
    }
    let mut start = cursor;
    let mut used = widths[cursor];
    while start > pinned && used + widths[start - 1] <= budget {
        start -= 1;
        used += widths[start];
    }
    start
}

/// Indices of the columns to draw: pinned ones first, then as many
/// scrollable ones from `start` as fit.
fn visible_indices(widths: &[u16], pinned: usize, start: usize, budget: u16) -> Vec<usize> {
    let mut indices: Vec<usize> = (0..pinned.min(widths.len())).collect();
    let mut used = 0;
    for (i, width) in widths.iter().enumerate().skip(start) {
        if used + width > budget && i != start {
            break;
        }
        used += width;
        indices.push(i);
    }
    indices
}

pub struct StatsTableView<'a> {
    pub state: &'a StatsTableState,
    pub block: Block<'a>,
}

impl Widget for StatsTableView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let inner = self.block.inner(area);
        self.block.render(area, buf);
        if inner.width == 0 || inner.height == 0 {
            return;
        }

        let state = self.state;
        let columns = state.columns();
        let widths: Vec<u16> = columns.iter().map(|c| column_width(c) + COLUMN_SPACING).collect();
        let pinned_width: u16 = widths.iter().take(PINNED_COLUMNS).sum();
        // The highlight symbol takes two cells.
        let budget = inner
            .width
            .saturating_sub(RANK_WIDTH + COLUMN_SPACING + 2)
            .saturating_sub(pinned_width);
        let start = scroll_start(&widths, PINNED_COLUMNS, state.column_cursor, budget);
        let shown = visible_indices(&widths, PINNED_COLUMNS, start, budget);

        let mut header_cells = vec![Cell::from("#")];
        for &i in &shown {
            let column = &columns[i];
            let mut label = column.label.to_string();
            if column.key == state.sort.key {
                label.push_str(state.sort.direction.arrow());
            }
            let mut style = Style::default().add_modifier(Modifier::BOLD);
            if i == state.column_cursor {
                style = style.fg(Color::Black).bg(Color::Yellow);
            }
            header_cells.push(Cell::from(Span::styled(label, style)));
        }
        let header = Row::new(header_cells).style(Style::default().fg(Color::White));

        let rows: Vec<Row> = state
            .rows()
            .iter()
            .enumerate()
            .map(|(rank, record)| {
                let mut cells = vec![Cell::from((rank + 1).to_string())];
                cells.extend(shown.iter().map(|&i| Cell::from(format_stat(record, &columns[i]))));
                Row::new(cells)
            })
            .collect();

        let mut constraints = vec![Constraint::Length(RANK_WIDTH)];
        constraints.extend(shown.iter().map(|&i| Constraint::Length(column_width(&columns[i]))));

        let table = Table::new(rows, constraints)
            .header(header)
            .column_spacing(COLUMN_SPACING)
            .row_highlight_style(Style::default().bg(Color::DarkGray))
            .highlight_symbol("> ");

        let mut table_state = TableState::default().with_selected(Some(state.selected_row));
        StatefulWidget::render(table, inner, buf, &mut table_state);
    }
}
