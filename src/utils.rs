//! # Utility Functions Module
//!
//! This module provides utility functions that improve code readability
//! and reduce boilerplate across the application.

/// Converts a vector of string-like items to Vec<String>.
///
/// This utility function accepts any iterable of items that can be converted
/// to String, eliminating repetitive `.to_string()` calls throughout the codebase.
///
/// # Generic Parameters
/// - `T`: Any type that implements `ToString`
/// - `I`: Any type that can be converted to an iterator over `T`
///
/// # Arguments
/// - `items`: An iterable of string-like items to convert
///
/// # Returns
/// - `Vec<String>`: A vector of owned strings
///
/// # Example
/// ```rust
/// use teenypng::utils::to_string_vec;
///
/// let args = to_string_vec(["--force", "--skip-if-larger"]);
/// assert_eq!(args.len(), 2);
/// ```
pub fn to_string_vec<T, I>(items: I) -> Vec<String>
where
    T: ToString,
    I: IntoIterator<Item = T>,
{
    items.into_iter().map(|item| item.to_string()).collect()
}

/// Macro for even more convenient argument building.
///
/// Unlike [`to_string_vec`], each item is stringified individually, so
/// numbers and strings can be mixed freely in one invocation.
///
/// # Example
/// ```rust
/// use teenypng::args;
///
/// let iterations = 15;
/// let args = args![format!("--iterations={}", iterations), "input.png"];
/// assert_eq!(args[1], "input.png");
/// ```
#[macro_export]
macro_rules! args {
    [$($item:expr),* $(,)?] => {
        vec![$($item.to_string()),*]
    };
}

/// Splits the process argument list at the first `--` marker.
///
/// Everything before (and including) the marker belongs to the host that
/// launched us and is discarded; everything after it is ours to parse.
/// Returns `None` when no marker is present, which callers treat as a
/// fatal usage error rather than guessing at argument ownership.
///
/// # Example
/// ```rust
/// use teenypng::utils::split_host_args;
///
/// let argv = ["host", "--flag", "--", "photos/", "--quality", "70"];
/// let ours = split_host_args(argv.iter().map(|s| s.to_string())).unwrap();
/// assert_eq!(ours, vec!["photos/", "--quality", "70"]);
/// ```
pub fn split_host_args<I>(argv: I) -> Option<Vec<String>>
where
    I: IntoIterator<Item = String>,
{
    let mut iter = argv.into_iter();
    iter.find(|arg| arg.as_str() == "--")?;
    Some(iter.collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_string_vec_string_literals() {
        let result = to_string_vec(["hello", "world"]);
        assert_eq!(result, vec!["hello".to_string(), "world".to_string()]);
    }

    #[test]
    fn test_to_string_vec_mixed_types() {
        let num = 42;
        let result = to_string_vec(["--quality", &num.to_string(), "--force"]);
        assert_eq!(result, vec!["--quality".to_string(), "42".to_string(), "--force".to_string()]);
    }

    #[test]
    fn test_to_string_vec_empty() {
        let result: Vec<String> = to_string_vec(Vec::<&str>::new());
        assert_eq!(result, Vec::<String>::new());
    }

    #[test]
    fn test_args_macro_mixes_types() {
        let iterations = 15;
        let result = args![format!("--iterations={}", iterations), "a.png", "b.png"];
        assert_eq!(
            result,
            vec!["--iterations=15".to_string(), "a.png".to_string(), "b.png".to_string()]
        );
    }

    #[test]
    fn test_split_host_args_takes_tail() {
        let argv = to_string_vec(["host", "-b", "--script", "x.cfg", "--", "dir/", "--recursive"]);
        let ours = split_host_args(argv).unwrap();
        assert_eq!(ours, vec!["dir/".to_string(), "--recursive".to_string()]);
    }

    #[test]
    fn test_split_host_args_missing_marker() {
        let argv = to_string_vec(["host", "-b", "dir/"]);
        assert!(split_host_args(argv).is_none());
    }

    #[test]
    fn test_split_host_args_marker_last() {
        let argv = to_string_vec(["host", "--"]);
        assert_eq!(split_host_args(argv), Some(Vec::new()));
    }

    #[test]
    fn test_split_host_args_only_first_marker_counts() {
        let argv = to_string_vec(["host", "--", "input", "--", "tail"]);
        let ours = split_host_args(argv).unwrap();
        assert_eq!(ours, vec!["input".to_string(), "--".to_string(), "tail".to_string()]);
    }
}
