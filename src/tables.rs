use chrono::TimeDelta;
use chrono_tz::Tz;
use comfy_table::{Attribute, Cell, CellAlignment, Color, Table, modifiers, presets};

use crate::{core::engine::Cycle, quantity::rate::KilowattHourRate};

pub fn build_window_table(cycle: &Cycle, timezone: Tz) -> Table {
    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL_CONDENSED).apply_modifier(modifiers::UTF8_ROUND_CORNERS);
    table.enforce_styling();
    table.set_header(vec!["Date", "Start", "End", "Spot", "Final"]);
    for step in &cycle.window {
        let start = step.timestamp.with_timezone(&timezone);
        let end = start + TimeDelta::hours(1);
        table.add_row(vec![
            Cell::new(start.format("%b %d")).add_attribute(Attribute::Dim),
            Cell::new(start.format("%H:%M")),
            Cell::new(end.format("%H:%M")).add_attribute(Attribute::Dim),
            Cell::new(step.raw_price)
                .set_alignment(CellAlignment::Right)
                .add_attribute(Attribute::Dim),
            Cell::new(step.final_price)
                .set_alignment(CellAlignment::Right)
                .fg(price_color(step.final_price, cycle.desired_price)),
        ]);
    }
    table
}

fn price_color(price: KilowattHourRate, desired_price: KilowattHourRate) -> Color {
    if price <= desired_price { Color::Green } else { Color::Red }
}
