/// Strips control characters and `< > : " / \ | ? *` so the result can be used
/// as a single path segment.
pub fn sanitize_filename(name: &str) -> String {
    name.chars()
        .filter(|c| !is_forbidden(*c))
        .collect()
}

fn is_forbidden(c: char) -> bool {
    (c as u32) < 32 || matches!(c, '<' | '>' | ':' | '"' | '/' | '\\' | '|' | '?' | '*')
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn test_strips_reserved_characters() {
        let sanitized = sanitize_filename("My:Mix/2024?");
        assert_eq!(sanitized, "MyMix2024");
        assert_eq!(Path::new(&sanitized).components().count(), 1);
    }

    #[test]
    fn test_strips_control_characters() {
        assert_eq!(sanitize_filename("Tab\there\nnew\u{1f}line"), "Tabherenewline");
    }

    #[test]
    fn test_keeps_regular_text() {
        let title = "Weekly Jams for rob, week of 2024-06-03 Mon";
        assert_eq!(sanitize_filename(title), title);
        assert_eq!(sanitize_filename("Sigur Rós – Ágætis byrjun"), "Sigur Rós – Ágætis byrjun");
    }

    #[test]
    fn test_all_forbidden_is_empty() {
        assert_eq!(sanitize_filename("<>:\"/\\|?*"), "");
    }
}
