use once_cell::sync::Lazy;
use regex::Regex;

// Comma separator with any surrounding whitespace
static TOKEN_SEPARATOR: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s*,\s*").unwrap());

/// Splits a comma separated parameter value into its tokens.
///
/// Whitespace around the separators and at both ends is ignored, empty tokens
/// are dropped and repeated tokens are only kept once (first occurrence wins).
/// An absent value yields no tokens.
///
/// # Arguments
///
/// * `input` - The raw parameter value (if any)
///
/// # Returns
///
/// The list of tokens in order of appearance
///
/// # Examples
///
/// ```
/// use transform_filter::string_utils::split_tokens;
///
/// assert_eq!(split_tokens(Some(" a, b ,c")), vec!["a", "b", "c"]);
/// assert_eq!(split_tokens(Some("a,,b,")), vec!["a", "b"]);
/// assert!(split_tokens(None).is_empty());
/// ```
pub fn split_tokens(input: Option<&str>) -> Vec<String> {
    let Some(input) = input else {
        return Vec::new();
    };

    TOKEN_SEPARATOR
        .split(input.trim())
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .fold(Vec::new(), |mut tokens, token| {
            if !tokens.iter().any(|t: &String| t == token) {
                tokens.push(token.to_string());
            }
            tokens
        })
}
