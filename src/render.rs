const MAX_WIDTH: f64 = 80.0;

/// Formats a length in mm without trailing zeros (`1995`, `1250.5`).
pub fn format_mm(value: f64) -> String {
    let s = format!("{:.2}", value);
    let s = s.trim_end_matches('0').trim_end_matches('.');
    if s == "-0" { "0".to_string() } else { s.to_string() }
}

/// Human-readable summary line for the `number`-th bar (1-based).
pub fn bar_label(number: usize, cuts: &[f64], waste: f64) -> String {
    let cuts: Vec<String> = cuts.iter().map(|&c| format_mm(c)).collect();
    format!(
        "Bar {}: cuts → {} | waste: {} mm",
        number,
        cuts.join(", "),
        format_mm(waste)
    )
}

/// Draws one bar to scale: each cut is a labelled `|===|` segment, the
/// unused tail is dotted.
pub fn render_bar(stock_length: f64, cuts: &[f64], blade_kerf: f64) -> String {
    if !stock_length.is_finite() || stock_length <= 0.0 {
        return String::new();
    }

    let scale = MAX_WIDTH / stock_length;
    let grid_w = (stock_length * scale).round() as usize;
    let mut row = vec!['.'; grid_w + 1];
    row[0] = '|';
    row[grid_w] = '|';

    let mut offset = 0.0;
    for (i, &cut) in cuts.iter().enumerate() {
        if i > 0 {
            offset += blade_kerf;
        }
        let sx = (offset * scale).round() as usize;
        let ex = ((offset + cut) * scale).round() as usize;
        offset += cut;

        if ex <= sx {
            continue;
        }
        draw_segment(&mut row, sx, ex, &format_mm(cut));
    }

    let mut result: String = row.iter().collect();
    result.truncate(result.trim_end().len());
    result.push('\n');
    result
}

fn draw_segment(row: &mut [char], sx: usize, ex: usize, label: &str) {
    let cols = row.len();
    let ex = ex.min(cols - 1);
    if sx >= ex {
        return;
    }

    for (x, cell) in row.iter_mut().enumerate().take(ex + 1).skip(sx) {
        *cell = if x == sx || x == ex { '|' } else { '=' };
    }

    // Label only when it fits strictly between the edges
    let label_chars: Vec<char> = label.chars().collect();
    let inner = ex - sx - 1;
    if label_chars.len() <= inner {
        let start = sx + 1 + (inner - label_chars.len()) / 2;
        for (i, &ch) in label_chars.iter().enumerate() {
            row[start + i] = ch;
        }
    }
}
