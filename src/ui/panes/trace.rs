//! Execution trace pane

use crate::snapshot::Snapshot;
use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Padding, Paragraph},
    Frame,
};

/// Render the statements performed so far, newest at the bottom.
///
/// `scroll_offset` of `usize::MAX` sticks to the bottom.
pub fn render_trace_pane(
    frame: &mut Frame,
    area: Rect,
    history: &[Snapshot],
    is_focused: bool,
    scroll_offset: &mut usize,
) {
    let border_style = if is_focused {
        Style::default()
            .fg(DEFAULT_THEME.border_focused)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(DEFAULT_THEME.border_normal)
    };

    let block = Block::default()
        .title(" Trace ")
        .borders(Borders::ALL)
        .border_style(border_style);

    if history.is_empty() {
        let paragraph = Paragraph::new("(nothing executed)")
            .block(block)
            .style(Style::default().fg(DEFAULT_THEME.comment));
        frame.render_widget(paragraph, area);
        return;
    }

    let block = block.padding(Padding::new(1, 0, 0, 0));
    let total_items = history.len();
    let visible_height = area.height.saturating_sub(2).max(1) as usize;

    if total_items > visible_height {
        *scroll_offset = (*scroll_offset).min(total_items - visible_height);
    } else {
        *scroll_offset = 0;
    }

    let last = total_items - 1;
    let items: Vec<ListItem> = history
        .iter()
        .enumerate()
        .skip(*scroll_offset)
        .take(visible_height)
        .map(|(idx, snapshot)| {
            let text_style = if idx == last {
                Style::default()
                    .fg(DEFAULT_THEME.fg)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(DEFAULT_THEME.comment)
            };
            ListItem::new(Line::from(vec![
                Span::styled(
                    format!("{:>5} ", snapshot.step + 1),
                    Style::default().fg(DEFAULT_THEME.comment),
                ),
                Span::styled(
                    format!("[{}] ", snapshot.label),
                    Style::default().fg(DEFAULT_THEME.label),
                ),
                Span::styled(snapshot.statement.to_string(), text_style),
            ]))
        })
        .collect();

    let list = List::new(items).block(block);
    frame.render_widget(list, area);
}
