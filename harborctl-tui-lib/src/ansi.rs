use console::strip_ansi_codes;

pub fn ansi_len(ansi_str: &str) -> usize {
    strip_ansi_codes(ansi_str)
        .chars()
        .count()
}

pub fn lpad_ansi(ansi_str: &str, len: usize) -> String {
    let stripped_len = ansi_len(ansi_str);
    let mut padded = ansi_str.to_string();
    padded.push_str(&" ".repeat(len.saturating_sub(stripped_len)));
    padded
}

/// Shorten to at most `len` visible characters. Styled strings are
/// returned unchanged, since cutting inside an escape sequence would
/// corrupt the output.
pub fn shorten_ansi(ansi_str: &str, len: usize) -> String {
    let stripped_len = ansi_len(ansi_str);

    if stripped_len <= len || stripped_len != ansi_str.chars().count() {
        return ansi_str.to_string();
    }

    let mut shortened: String = ansi_str
        .chars()
        .take(len.saturating_sub(1))
        .collect();
    shortened.push('…');
    shortened
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::style::Stylize;

    #[test]
    fn visible_length_ignores_styling() {
        let styled = "healthy".green().to_string();
        assert_eq!(ansi_len(&styled), "healthy".len());
    }

    #[test]
    fn padding_counts_visible_chars_only() {
        let styled = "ok".cyan().to_string();
        let padded = lpad_ansi(&styled, 5);
        assert_eq!(ansi_len(&padded), 5);
    }

    #[test]
    fn shorten_cuts_plain_strings_only() {
        assert_eq!(shorten_ansi("registry", 4), "reg…");
        assert_eq!(shorten_ansi("gc", 4), "gc");

        let styled = "registry".cyan().to_string();
        assert_eq!(shorten_ansi(&styled, 4), styled);
    }
}
