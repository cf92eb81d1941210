//! Timestamp formatting for generated names.

use chrono::Local;

/// Formats the current local time with a fixed `strftime` pattern.
///
/// Stored in the derived hub as `timestamp_fn`; callers use it to build
/// file names like `export_2024-05-01_120000`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Timestamper {
    format: String,
}

impl Timestamper {
    /// Creates a timestamper for the given pattern.
    #[must_use]
    pub fn new(format: impl Into<String>) -> Self {
        Self {
            format: format.into(),
        }
    }

    /// The pattern in use.
    #[must_use]
    pub fn format(&self) -> &str {
        &self.format
    }

    /// Formats the current local time.
    #[must_use]
    pub fn now(&self) -> String {
        Local::now().format(&self.format).to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_pattern_shape() {
        let stamp = Timestamper::new("%Y-%m-%d_%H%M%S").now();

        assert_eq!(stamp.len(), 17);
        assert_eq!(&stamp[10..11], "_");
        assert!(stamp[11..].chars().all(|c| c.is_ascii_digit()));
    }
}
