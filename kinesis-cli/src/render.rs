//! Generate an HTML/SVG visualization of a board's keymap layers.
//!
//! Every physical row of the layout is split in two halves around a
//! central gap, so the thumb clusters end up next to each other in the
//! middle like on the real keyboard.

use kinesis_layout::{keycode, Board, BoardConfig};

/// Physical key position and size for SVG rendering.
struct Key {
    x: f64,
    y: f64,
    w: f64,
    h: f64,
    row: usize,
    col: usize,
}

/// Key unit size in SVG pixels.
const U: f64 = 54.0;
/// Gap between keys.
const GAP: f64 = 4.0;
/// Step: key + gap.
const S: f64 = U + GAP;
/// Key corner radius.
const R: f64 = 4.0;
/// Spacing between left and right halves.
const HALF_GAP: f64 = 60.0;
/// Margin around the SVG content.
const MARGIN: f64 = 20.0;
/// Extra space below the function key row.
const FN_ROW_GAP: f64 = 0.5 * S;

/// Build all physical key positions.
fn build_keys(config: &BoardConfig) -> Vec<Key> {
    let widest = config
        .layout
        .iter()
        .map(|cells| cells.len().div_ceil(2))
        .max()
        .unwrap_or(0);
    let center = widest as f64 * S;

    let mut keys = Vec::new();
    for (i, cells) in config.layout.iter().enumerate() {
        let y = i as f64 * S + if i > 0 { FN_ROW_GAP } else { 0.0 };
        let left = cells.len().div_ceil(2);

        for (j, cell) in cells.iter().enumerate() {
            let x = if j < left {
                center - (left - j) as f64 * S
            } else {
                center + HALF_GAP + (j - left) as f64 * S
            };
            keys.push(Key {
                x,
                y,
                w: U,
                h: U,
                row: cell.0,
                col: cell.1,
            });
        }
    }
    keys
}

/// Compute the bounding box of all keys: (max_x + w, max_y + h).
fn bbox(keys: &[Key]) -> (f64, f64) {
    let mut max_x: f64 = 0.0;
    let mut max_y: f64 = 0.0;
    for k in keys {
        max_x = max_x.max(k.x + k.w);
        max_y = max_y.max(k.y + k.h);
    }
    (max_x, max_y)
}

fn key_class(code: u8) -> &'static str {
    match code {
        0x00 => "key unused",
        0xE0..=0xE7 => "key modifier",
        0xE8..=0xEF => "key layer",
        _ => "key",
    }
}

/// Render a single layer as an SVG group.
fn render_layer(keys: &[Key], board: &Board, layer_idx: usize, y_offset: f64) -> String {
    let layer = &board.layers[layer_idx];
    let mut svg = String::new();

    svg.push_str(&format!(
        r#"<g transform="translate({MARGIN}, {y_offset})">"#
    ));
    svg.push_str(&format!(
        r#"<text x="0" y="-10" class="layer-title">Layer {layer_idx}: {}</text>"#,
        html_escape(&layer.name)
    ));

    for key in keys {
        let code = layer.keys[key.row][key.col];
        let label = keycode::label(code);

        svg.push_str(&format!(
            r#"<rect x="{}" y="{}" width="{}" height="{}" rx="{R}" class="{}"><title>[{}, {}]</title></rect>"#,
            key.x,
            key.y,
            key.w,
            key.h,
            key_class(code),
            key.row,
            key.col,
        ));

        if !label.is_empty() {
            let font_class = if label.chars().count() > 3 { " small" } else { "" };
            svg.push_str(&format!(
                r#"<text x="{}" y="{}" class="label{font_class}">{}</text>"#,
                key.x + key.w / 2.0,
                key.y + key.h / 2.0 + 1.0,
                html_escape(&label),
            ));
        }
    }

    svg.push_str("</g>");
    svg
}

fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// Generate the complete HTML document with inline SVG.
pub fn generate_html(config: &BoardConfig, board: &Board) -> String {
    let keys = build_keys(config);
    let (content_w, content_h) = bbox(&keys);
    let layer_height = content_h + 60.0;
    let total_width = content_w + 2.0 * MARGIN;
    let total_height = board.layers.len() as f64 * layer_height + 2.0 * MARGIN;
    let title = html_escape(&board.name);

    let mut html = format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>{title} layout</title>
<style>
  body {{
    background: #1a1a2e;
    color: #eee;
    font-family: system-ui, -apple-system, sans-serif;
    display: flex;
    justify-content: center;
    padding: 2em;
  }}
  svg {{
    filter: drop-shadow(0 2px 8px rgba(0,0,0,0.3));
  }}
  .key {{
    fill: #16213e;
    stroke: #0f3460;
    stroke-width: 1.5;
  }}
  .key:hover {{
    fill: #1a1a5e;
    stroke: #e94560;
  }}
  .key.unused {{
    fill: #0d1117;
    stroke: #21262d;
    stroke-dasharray: 3 3;
  }}
  .key.layer {{
    fill: #2d1b4e;
    stroke: #e94560;
    stroke-width: 2;
  }}
  .key.modifier {{
    fill: #1b2e4e;
    stroke: #53a8b6;
    stroke-width: 1.5;
  }}
  .label {{
    fill: #eee;
    font-family: "JetBrains Mono", "Fira Code", monospace;
    font-size: 13px;
    text-anchor: middle;
    dominant-baseline: middle;
    pointer-events: none;
  }}
  .label.small {{
    font-size: 10px;
  }}
  .layer-title {{
    fill: #e94560;
    font-family: system-ui, -apple-system, sans-serif;
    font-size: 16px;
    font-weight: bold;
  }}
</style>
</head>
<body>
<svg width="{total_width}" height="{total_height}" xmlns="http://www.w3.org/2000/svg">
"#
    );

    for layer_idx in 0..board.layers.len() {
        let y_offset = MARGIN + layer_idx as f64 * layer_height + 30.0;
        html.push_str(&render_layer(&keys, board, layer_idx, y_offset));
        html.push('\n');
    }

    html.push_str("</svg>\n</body>\n</html>\n");
    html
}

#[cfg(test)]
mod tests {
    use super::*;

    fn btkinesis() -> (BoardConfig, Board) {
        let config: BoardConfig =
            serde_json::from_str(include_str!("../../kinesis-matrix/layouts/btkinesis.json"))
                .unwrap();
        let board = config.validate().unwrap();
        (config, board)
    }

    #[test]
    fn test_keys_split_around_gap() {
        let (config, _) = btkinesis();
        let keys = build_keys(&config);
        let count: usize = config.layout.iter().map(Vec::len).sum();
        assert_eq!(keys.len(), count);

        // Function row: nine keys on each side of the gap.
        let center = 9.0 * S;
        assert_eq!(keys.iter().take(18).filter(|k| k.x < center).count(), 9);
        assert!(keys.iter().all(|k| k.x >= 0.0));
    }

    #[test]
    fn test_generate_html() {
        let (config, board) = btkinesis();
        let html = generate_html(&config, &board);
        let keys: usize = config.layout.iter().map(Vec::len).sum();

        assert!(html.starts_with("<!DOCTYPE html>"));
        assert_eq!(html.matches("<rect").count(), keys * board.layers.len());
        assert!(html.contains("Layer 0: Dvorak"));
        assert!(html.contains(">Esc</text>"));
        assert!(html.contains("class=\"key layer\""));
    }

    #[test]
    fn test_html_escape() {
        assert_eq!(html_escape("<>&"), "&lt;&gt;&amp;");
    }
}
