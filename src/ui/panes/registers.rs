//! Register bank pane

use crate::memory::RegisterBank;
use crate::parser::ast::RegisterIndex;
use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Padding, Paragraph},
    Frame,
};

/// Render the register pane.
///
/// `target` is the register the pending statement reads or writes; it is
/// listed even when it has never been set, since INC/DEB treat it as zero.
pub fn render_registers_pane(
    frame: &mut Frame,
    area: Rect,
    registers: &RegisterBank,
    target: Option<RegisterIndex>,
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
        .title(" Registers ")
        .borders(Borders::ALL)
        .border_style(border_style);

    let mut rows: Vec<(RegisterIndex, u64)> = registers.iter().collect();
    if let Some(target) = target {
        if !rows.iter().any(|&(index, _)| index == target) {
            rows.push((target, 0));
            rows.sort_unstable_by_key(|&(index, _)| index);
        }
    }

    if rows.is_empty() {
        let paragraph = Paragraph::new("[ all registers empty ]")
            .block(block)
            .style(Style::default().fg(DEFAULT_THEME.comment));
        frame.render_widget(paragraph, area);
        return;
    }

    let block = block.padding(Padding::new(1, 0, 0, 0));
    let index_width = rows
        .iter()
        .map(|(index, _)| index.to_string().len())
        .max()
        .unwrap_or(1);

    let visible_height = area.height.saturating_sub(2).max(1) as usize;
    if rows.len() > visible_height {
        *scroll_offset = (*scroll_offset).min(rows.len() - visible_height);
    } else {
        *scroll_offset = 0;
    }

    let items: Vec<ListItem> = rows
        .iter()
        .skip(*scroll_offset)
        .take(visible_height)
        .map(|&(index, value)| {
            let is_target = Some(index) == target;
            let value_style = if is_target {
                Style::default()
                    .fg(DEFAULT_THEME.changed_value)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(DEFAULT_THEME.number)
            };
            let marker = if is_target { "▶ " } else { "  " };

            ListItem::new(Line::from(vec![
                Span::styled(marker, Style::default().fg(DEFAULT_THEME.secondary)),
                Span::styled(
                    format!("r{:<width$}", index, width = index_width),
                    Style::default().fg(DEFAULT_THEME.primary),
                ),
                Span::styled(" = ", Style::default().fg(DEFAULT_THEME.comment)),
                Span::styled(value.to_string(), value_style),
            ]))
        })
        .collect();

    let list = List::new(items).block(block);
    frame.render_widget(list, area);
}
