//! Shared helper functions for CLI commands
//!
//! Input validation lives here: the engine accepts any number, the command
//! line only accepts sensible ones.

/// Truncate a string to max_len, adding "..." if truncated
///
/// Useful for table columns that need fixed-width output.
pub fn truncate_str(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

/// clap value parser: a diagnostic coverage between 0 and 100
pub fn parse_coverage(s: &str) -> Result<f64, String> {
    let value: f64 = s
        .trim()
        .trim_end_matches('%')
        .parse()
        .map_err(|_| format!("'{}' is not a number", s))?;
    if (0.0..=100.0).contains(&value) {
        Ok(value)
    } else {
        Err(format!("coverage must be between 0 and 100, got {}", value))
    }
}

/// clap value parser: a failure rate in FIT (>= 0)
pub fn parse_rate(s: &str) -> Result<f64, String> {
    let value: f64 = s
        .trim()
        .parse()
        .map_err(|_| format!("'{}' is not a number", s))?;
    if value.is_finite() && value >= 0.0 {
        Ok(value)
    } else {
        Err(format!("failure rate must be a non-negative number, got {}", s))
    }
}

/// clap value parser: a lifetime in hours (> 0)
pub fn parse_lifetime(s: &str) -> Result<f64, String> {
    let value: f64 = s
        .trim()
        .parse()
        .map_err(|_| format!("'{}' is not a number", s))?;
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(format!("lifetime must be a positive number of hours, got {}", s))
    }
}

/// Split a comma-separated argument list, trimming entries
pub fn split_list(s: &str) -> Vec<String> {
    s.split(',')
        .map(|part| part.trim().to_string())
        .filter(|part| !part.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_str() {
        assert_eq!(truncate_str("hello", 10), "hello");
        assert_eq!(truncate_str("hello world", 8), "hello...");
        assert_eq!(truncate_str("hi", 2), "hi");
    }

    #[test]
    fn test_parse_coverage() {
        assert_eq!(parse_coverage("90").unwrap(), 90.0);
        assert_eq!(parse_coverage("99.5%").unwrap(), 99.5);
        assert!(parse_coverage("101").is_err());
        assert!(parse_coverage("-1").is_err());
        assert!(parse_coverage("high").is_err());
    }

    #[test]
    fn test_parse_rate() {
        assert_eq!(parse_rate("0").unwrap(), 0.0);
        assert_eq!(parse_rate("12.5").unwrap(), 12.5);
        assert!(parse_rate("-3").is_err());
        assert!(parse_rate("inf").is_err());
    }

    #[test]
    fn test_parse_lifetime() {
        assert_eq!(parse_lifetime("100000").unwrap(), 100000.0);
        assert!(parse_lifetime("0").is_err());
        assert!(parse_lifetime("ten years").is_err());
    }

    #[test]
    fn test_split_list() {
        assert_eq!(split_list("SF1, SF2,,"), vec!["SF1", "SF2"]);
        assert!(split_list("").is_empty());
    }
}
