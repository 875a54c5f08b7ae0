/// Cuts `value` to at most `max_bytes` without splitting a UTF-8 sequence.
pub fn truncate_utf8_prefix(value: &str, max_bytes: usize) -> String {
    if value.len() <= max_bytes {
        return value.to_string();
    }
    let mut end = max_bytes;
    while end > 0 && !value.is_char_boundary(end) {
        end -= 1;
    }
    value[..end].to_string()
}

#[cfg(test)]
mod tests {
    use super::truncate_utf8_prefix;

    #[test]
    fn keeps_short_values() {
        assert_eq!(truncate_utf8_prefix("queue", 10), "queue");
        assert_eq!(truncate_utf8_prefix("queue", 0), "");
    }

    #[test]
    fn backs_off_to_char_boundary() {
        assert_eq!(truncate_utf8_prefix("aé", 2), "a");
        assert_eq!(truncate_utf8_prefix("aéb", 3), "aé");
    }
}
