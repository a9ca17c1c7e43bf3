//! SVG rendering of a laid-out Gantt chart.

use super::{GanttChart, GanttConfig};

const BACKGROUND: &str = "#0f172a";
const TRACK_FILL: &str = "#0b1220";
const TRACK_STROKE: &str = "#1f2937";
const GRID: &str = "#334155";
const TICK_TEXT: &str = "#94a3b8";
const TITLE_TEXT: &str = "#e2e8f0";
const ROW_LABEL: &str = "#93c5fd";

/// Render `chart` as a standalone SVG document.
pub fn render(chart: &GanttChart, config: &GanttConfig) -> String {
    let mut svg = String::new();
    let top = config.top_margin;
    let h = config.row_height;

    svg.push_str(&format!(
        "<svg width='{}' height='{}' xmlns='http://www.w3.org/2000/svg'>",
        chart.width, chart.height
    ));
    svg.push_str(&format!("<rect width='100%' height='100%' fill='{BACKGROUND}'/>"));
    svg.push_str(&format!(
        "<text x='20' y='24' fill='{TITLE_TEXT}' font-size='16'>Gantt, last {} min</text>",
        config.window_minutes()
    ));

    for tick in &chart.ticks {
        svg.push_str(&format!(
            "<line x1='{x}' y1='{}' x2='{x}' y2='{}' stroke='{GRID}'/>",
            top - 5,
            chart.height - 20,
            x = tick.x
        ));
        svg.push_str(&format!(
            "<text x='{}' y='{}' fill='{TICK_TEXT}' font-size='11'>{}</text>",
            tick.x - 18,
            top - 10,
            tick.label
        ));
    }

    let mut y = top;
    for row in &chart.rows {
        svg.push_str(&format!(
            "<text x='10' y='{}' fill='{ROW_LABEL}' font-size='12'>{}</text>",
            y + h - 6,
            escape(&row.name)
        ));
        svg.push_str(&format!(
            "<rect x='{}' y='{y}' width='{}' height='{h}' fill='{TRACK_FILL}' stroke='{TRACK_STROKE}'/>",
            config.left_margin,
            config.usable()
        ));
        for b in &row.boxes {
            svg.push_str(&format!(
                "<rect x='{}' y='{}' width='{}' height='{}' rx='3' ry='3' fill='{}'><title>{}</title></rect>",
                b.x,
                y + 2,
                b.width,
                h - 4,
                escape(&b.color),
                escape(&b.station)
            ));
        }
        y += h + config.row_gap;
    }

    svg.push_str("</svg>");
    svg
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '\'' => out.push_str("&apos;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}
