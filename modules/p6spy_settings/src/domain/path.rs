//! Log file path normalization
//!
//! Normalizes, never validates: an unusable target only surfaces once the
//! file logger tries to open it.

const SEPARATOR: char = '/';
const CURRENT: &str = ".";
const PARENT: &str = "..";

/// Convert a path to forward-slash form and resolve `.` and `..` segments
///
/// A scheme or drive prefix (`file:`, `C:`) and a leading slash are kept.
/// `..` segments that cannot be resolved are retained at the front.
pub fn clean_path(path: &str) -> String {
    let normalized = path.replace('\\', "/");
    if !normalized.contains('.') {
        return normalized;
    }

    let (mut prefix, mut rest) = match normalized.find(':') {
        Some(idx) if !normalized[..idx].contains(SEPARATOR) => {
            (normalized[..=idx].to_string(), &normalized[idx + 1..])
        }
        _ => (String::new(), normalized.as_str()),
    };
    if let Some(stripped) = rest.strip_prefix(SEPARATOR) {
        prefix.push(SEPARATOR);
        rest = stripped;
    }

    let mut kept: Vec<&str> = Vec::new();
    let mut pending_parents = 0usize;
    for segment in rest.split(SEPARATOR).rev() {
        match segment {
            CURRENT => {}
            PARENT => pending_parents += 1,
            _ if pending_parents > 0 => pending_parents -= 1,
            _ => kept.push(segment),
        }
    }
    kept.extend(std::iter::repeat(PARENT).take(pending_parents));
    kept.reverse();

    let mut cleaned = prefix;
    cleaned.push_str(&kept.join("/"));
    cleaned
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parent_segment_resolved() {
        assert_eq!(clean_path("a/b/../c.log"), "a/c.log");
    }

    #[test]
    fn test_current_segments_dropped() {
        assert_eq!(clean_path("./logs/./spy.log"), "logs/spy.log");
    }

    #[test]
    fn test_backslashes_converted() {
        assert_eq!(clean_path("logs\\p6spy\\spy.log"), "logs/p6spy/spy.log");
        assert_eq!(clean_path("C:\\logs\\tmp\\..\\spy.log"), "C:/logs/spy.log");
    }

    #[test]
    fn test_absolute_path_keeps_root() {
        assert_eq!(clean_path("/var/log/./p6spy/../spy.log"), "/var/log/spy.log");
    }

    #[test]
    fn test_scheme_prefix_kept() {
        assert_eq!(clean_path("file:/opt/app/../spy.log"), "file:/opt/spy.log");
    }

    #[test]
    fn test_unresolvable_parents_retained() {
        assert_eq!(clean_path("../spy.log"), "../spy.log");
        assert_eq!(clean_path("a/../../spy.log"), "../spy.log");
    }

    #[test]
    fn test_plain_path_untouched() {
        assert_eq!(clean_path("spy.log"), "spy.log");
        assert_eq!(clean_path("logs/spy"), "logs/spy");
    }
}
