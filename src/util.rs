pub fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{value:.2}")
    }
}

pub fn truncate_label(label: &str, max_chars: usize) -> String {
    if label.chars().count() <= max_chars {
        return label.to_owned();
    }

    let kept = label
        .chars()
        .take(max_chars.saturating_sub(1))
        .collect::<String>();
    format!("{kept}…")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integers_render_without_decimals() {
        assert_eq!(format_number(130.0), "130");
        assert_eq!(format_number(0.5), "0.50");
    }

    #[test]
    fn long_labels_are_truncated_with_ellipsis() {
        assert_eq!(truncate_label("abc", 10), "abc");
        assert_eq!(truncate_label("abcdefghij", 5), "abcd…");
    }
}
