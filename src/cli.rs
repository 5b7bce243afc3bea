// Small argument helpers shared by the train/generate/play binaries.
//
// Argument convention: an optional leading positional argument, then
// `--flag value` pairs (and bare `--flag` switches). No parsing library;
// flags that fail to parse are treated as absent and fall back to defaults.

use std::str::FromStr;

/// Value of `--flag value`, parsed, or None if absent/unparsable.
pub fn parse_flag<T: FromStr>(args: &[String], flag: &str) -> Option<T> {
    args.iter()
        .position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .and_then(|v| v.parse().ok())
}

/// True if a bare `--flag` switch is present.
pub fn has_flag(args: &[String], flag: &str) -> bool {
    args.iter().any(|a| a == flag)
}

/// The leading positional argument, if the first argument is not a flag.
pub fn positional(args: &[String]) -> Option<&str> {
    args.get(1)
        .filter(|s| !s.starts_with("--"))
        .map(|s| s.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_parse_flag() {
        let a = args(&["prog", "out", "--length", "200", "--seed", "5"]);
        assert_eq!(parse_flag::<usize>(&a, "--length"), Some(200));
        assert_eq!(parse_flag::<u64>(&a, "--seed"), Some(5));
        assert_eq!(parse_flag::<u64>(&a, "--missing"), None);
        // Unparsable value falls back to None.
        assert_eq!(parse_flag::<u64>(&args(&["p", "--seed", "xyz"]), "--seed"), None);
    }

    #[test]
    fn test_positional_and_switches() {
        let a = args(&["prog", "out_dir", "--no-render"]);
        assert_eq!(positional(&a), Some("out_dir"));
        assert!(has_flag(&a, "--no-render"));

        let a = args(&["prog", "--no-render"]);
        assert_eq!(positional(&a), None);
    }
}
