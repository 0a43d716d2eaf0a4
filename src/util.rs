/// Campaign keys use underscores for spaces.
pub fn display_name(name: &str) -> String {
    name.replace('_', " ")
}

/// Shortens `text` to at most `max_chars` characters, marking the cut.
pub fn truncate_label(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_owned();
    }

    let mut shortened = text
        .chars()
        .take(max_chars.saturating_sub(1))
        .collect::<String>();
    shortened.push('…');
    shortened
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn underscores_become_spaces() {
        assert_eq!(display_name("boycott_brand_x"), "boycott brand x");
        assert_eq!(display_name("plain"), "plain");
    }

    #[test]
    fn long_labels_are_cut_on_char_boundaries() {
        assert_eq!(truncate_label("short", 10), "short");
        assert_eq!(truncate_label("abcdefgh", 4), "abc…");
        assert_eq!(truncate_label("ääääää", 3), "ää…");
    }
}
