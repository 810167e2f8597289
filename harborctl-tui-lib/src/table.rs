use crate::ansi::{ansi_len, lpad_ansi};

/// Align tab-separated rows into space-padded columns. Column widths
/// are taken from the widest visible cell, ignoring ANSI styling.
pub fn format_table(lines: &[String]) -> Vec<String> {
    let split_lines: Vec<Vec<&str>> = lines
        .iter()
        .map(|line| line.split('\t').collect())
        .collect();

    let num_cols = split_lines
        .iter()
        .map(|cols| cols.len())
        .max()
        .unwrap_or(0);

    let mut col_widths = vec![0; num_cols];
    for cols in &split_lines {
        for (i, col) in cols.iter().enumerate() {
            let visible_len = ansi_len(col);
            if visible_len > col_widths[i] {
                col_widths[i] = visible_len;
            }
        }
    }

    split_lines
        .into_iter()
        .map(|cols| {
            let mut out = String::new();
            for (i, col) in cols.iter().enumerate() {
                if i < cols.len() - 1 {
                    out.push_str(&lpad_ansi(col, col_widths[i]));
                    out.push_str("  ");
                } else {
                    out.push_str(col);
                }
            }
            out
        })
        .collect()
}

pub fn print_table(lines: Vec<String>) {
    for line in format_table(&lines) {
        println!("{}", line);
    }
}
