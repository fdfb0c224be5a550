//! Overlay body shared by the live modal and the PDF snapshot.

use ratatui::{
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Bar, BarChart, BarGroup, Block, Borders, Paragraph, Row, Table},
    Frame,
};

use super::format_name;
use crate::sprite::SpriteData;
use crate::state::{DetailRecord, StatRow, StatTable, STAT_AXIS_MAX};
use crate::theme::{ACCENT_GOLD, ACCENT_TEAL, BG_OVERLAY, TEXT_DIM, TEXT_MAIN};

pub struct OverlayContent<'a> {
    pub record: &'a DetailRecord,
    pub sprite: Option<&'a SpriteData>,
    pub sprite_loading: bool,
    pub table: &'a StatTable,
}

pub fn render_overlay_content(frame: &mut Frame, area: Rect, content: &OverlayContent<'_>) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(format_name(&content.record.name))
        .title_style(Style::default().fg(ACCENT_GOLD).add_modifier(Modifier::BOLD))
        .style(Style::default().bg(BG_OVERLAY).fg(TEXT_MAIN))
        .border_style(Style::default().fg(TEXT_DIM));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let [top, chart] =
        Layout::vertical([Constraint::Length(12), Constraint::Min(6)]).areas(inner);
    let [sprite, table] =
        Layout::horizontal([Constraint::Percentage(45), Constraint::Percentage(55)]).areas(top);

    render_sprite(frame, sprite, content.sprite, content.sprite_loading);
    render_stat_table(frame, table, &content.record.stats, content.table);
    render_stat_chart(frame, chart, &content.record.stats);
}

pub fn render_sprite(frame: &mut Frame, area: Rect, sprite: Option<&SpriteData>, loading: bool) {
    let mut placeholder = |text: &'static str| {
        let inner = Rect {
            y: area.y + area.height / 2,
            height: area.height.min(1),
            ..area
        };
        frame.render_widget(
            Paragraph::new(text)
                .alignment(Alignment::Center)
                .style(Style::default().fg(TEXT_DIM)),
            inner,
        );
    };

    let Some(sprite) = sprite else {
        placeholder(if loading { "[loading image]" } else { "[no image]" });
        return;
    };
    let lines = match sprite.half_block_lines(area.width, area.height, BG_OVERLAY) {
        Ok(lines) if !lines.is_empty() => lines,
        _ => {
            placeholder("[no image]");
            return;
        }
    };

    let rows = lines.len() as u16;
    let offset_y = area.height.saturating_sub(rows) / 2;
    let target = Rect {
        y: area.y + offset_y,
        height: rows.min(area.height),
        ..area
    };
    frame.render_widget(Paragraph::new(lines).alignment(Alignment::Center), target);
}

pub fn render_stat_table(frame: &mut Frame, area: Rect, stats: &[StatRow], table: &StatTable) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title("STATS")
        .border_style(Style::default().fg(TEXT_DIM));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let [body, pager] = Layout::vertical([Constraint::Min(2), Constraint::Length(1)]).areas(inner);

    let header = Row::new(vec![
        Line::from("Name"),
        Line::from(format!("Base Stat {}", table.order.indicator())),
    ])
    .style(Style::default().fg(ACCENT_TEAL).add_modifier(Modifier::BOLD));
    let rows: Vec<Row> = table
        .page_rows(stats)
        .into_iter()
        .map(|row| {
            Row::new(vec![
                Line::from(row.stat_name.clone()),
                Line::from(row.base_value.to_string()).alignment(Alignment::Right),
            ])
        })
        .collect();
    let widget = Table::new(rows, [Constraint::Percentage(60), Constraint::Percentage(40)])
        .header(header)
        .style(Style::default().fg(TEXT_MAIN));
    frame.render_widget(widget, body);

    let pages = table.page_count(stats.len());
    let pager_line = Line::from(vec![
        Span::styled("‹ ", Style::default().fg(TEXT_DIM)),
        Span::styled(
            format!("{} / {}", table.page + 1, pages),
            Style::default().fg(ACCENT_GOLD),
        ),
        Span::styled(" ›", Style::default().fg(TEXT_DIM)),
    ]);
    frame.render_widget(
        Paragraph::new(pager_line).alignment(Alignment::Right),
        pager,
    );
}

/// Bars keep server order. Values above the fixed axis ceiling are clipped.
pub fn render_stat_chart(frame: &mut Frame, area: Rect, stats: &[StatRow]) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title("POKEMON STATUS")
        .border_style(Style::default().fg(TEXT_DIM));
    if stats.is_empty() {
        frame.render_widget(
            Paragraph::new("No stats")
                .alignment(Alignment::Center)
                .style(Style::default().fg(TEXT_DIM))
                .block(block),
            area,
        );
        return;
    }

    let count = stats.len() as u16;
    let inner_width = area.width.saturating_sub(2);
    let bar_gap = 1;
    let bar_width = (inner_width.saturating_sub(bar_gap * count.saturating_sub(1)) / count).max(1);

    let bars: Vec<Bar> = stats
        .iter()
        .map(|row| {
            Bar::default()
                .value(clip_to_axis(row.base_value) as u64)
                .text_value(row.base_value.to_string())
                .label(Line::from(shorten_stat(&row.stat_name)))
                .style(Style::default().fg(ACCENT_TEAL))
                .value_style(Style::default().fg(BG_OVERLAY).bg(ACCENT_TEAL))
        })
        .collect();

    let chart = BarChart::default()
        .block(block)
        .data(BarGroup::default().bars(&bars))
        .bar_width(bar_width)
        .bar_gap(bar_gap)
        .max(STAT_AXIS_MAX as u64)
        .label_style(Style::default().fg(TEXT_DIM));
    frame.render_widget(chart, area);
}

pub fn clip_to_axis(value: u32) -> u32 {
    value.min(STAT_AXIS_MAX)
}

pub fn shorten_stat(name: &str) -> String {
    match name {
        "hp" => "HP".to_string(),
        "attack" => "ATK".to_string(),
        "defense" => "DEF".to_string(),
        "special-attack" => "SAT".to_string(),
        "special-defense" => "SDF".to_string(),
        "speed" => "SPD".to_string(),
        _ => name.to_ascii_uppercase(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tui_dispatch::testing::RenderHarness;

    fn record() -> DetailRecord {
        let values = [("hp", 45), ("attack", 49), ("defense", 49), ("speed", 45)];
        DetailRecord {
            name: "bulbasaur".into(),
            image_url: None,
            stats: values
                .iter()
                .enumerate()
                .map(|(key, (name, value))| StatRow {
                    key,
                    stat_name: name.to_string(),
                    base_value: *value,
                })
                .collect(),
        }
    }

    #[test]
    fn values_above_axis_are_clipped() {
        assert_eq!(clip_to_axis(STAT_AXIS_MAX + 40), STAT_AXIS_MAX);
        assert_eq!(clip_to_axis(12), 12);
    }

    #[test]
    fn table_shows_first_page_descending() {
        let record = record();
        let table = StatTable::default();
        let mut render = RenderHarness::new(60, 34);
        let output = render.render_to_string_plain(|frame| {
            let content = OverlayContent {
                record: &record,
                sprite: None,
                sprite_loading: true,
                table: &table,
            };
            let area = frame.area();
            render_overlay_content(frame, area, &content);
        });

        assert!(output.contains("Bulbasaur"));
        assert!(output.contains("[loading image]"));
        assert!(output.contains("Base Stat ▼"));
        assert!(output.contains("1 / 2"));
        assert!(output.contains("POKEMON STATUS"));
        assert!(output.contains("attack"));
        assert!(output.contains("defense"));
        assert!(!output.contains("speed"));
    }
}
