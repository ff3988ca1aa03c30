//! String helpers shared by option parsing and the X11 backend

use std::str::FromStr;

/// How `split` treats the tokens it produces
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SplitMode {
    /// Plain split on the delimiter, no trimming or escaping
    #[default]
    Normal,
}

/// Split `src` on `delim`.
///
/// Follows line-reader semantics: an empty input yields no tokens and a
/// single trailing empty token is dropped (`"a,"` gives `["a"]`), while
/// interior empty tokens are kept (`"a,,b"` gives `["a", "", "b"]`).
pub fn split(src: &str, delim: char, mode: SplitMode) -> Vec<String> {
    match mode {
        SplitMode::Normal => {
            let mut tokens: Vec<String> = src.split(delim).map(String::from).collect();
            if tokens.last().is_some_and(|t| t.is_empty()) {
                tokens.pop();
            }
            tokens
        }
    }
}

/// Parse a value the way stream extraction does.
///
/// Leading and trailing whitespace is ignored and the longest parsable
/// prefix wins, so `"10px"` reads as `10`. Anything unparsable gives
/// `T::default()`.
pub fn from_string<T>(s: &str) -> T
where
    T: FromStr + Default,
{
    let s = s.trim();
    let mut end = s.len();
    while end > 0 {
        if let Ok(value) = s[..end].parse() {
            return value;
        }
        end = s[..end]
            .char_indices()
            .next_back()
            .map(|(i, _)| i)
            .unwrap_or(0);
    }
    T::default()
}

/// Parse an `"x,y"` position.
///
/// Fewer than two comma separated tokens yields `(0, 0)`.
pub fn parse_pos(s: &str) -> (i32, i32) {
    let tokens = split(s, ',', SplitMode::Normal);
    if tokens.len() > 1 {
        (from_string(&tokens[0]), from_string(&tokens[1]))
    } else {
        (0, 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_normal() {
        assert_eq!(split("a,b,c", ',', SplitMode::Normal), vec!["a", "b", "c"]);
        assert_eq!(split("a,,b", ',', SplitMode::Normal), vec!["a", "", "b"]);
        assert_eq!(split("a,", ',', SplitMode::Normal), vec!["a"]);
        assert_eq!(split(" a , b", ',', SplitMode::Normal), vec![" a ", " b"]);
        assert!(split("", ',', SplitMode::Normal).is_empty());
    }

    #[test]
    fn test_from_string() {
        assert_eq!(from_string::<i32>("42"), 42);
        assert_eq!(from_string::<i32>(" -7 "), -7);
        assert_eq!(from_string::<i32>("10px"), 10);
        assert_eq!(from_string::<i32>("abc"), 0);
        assert_eq!(from_string::<i32>(""), 0);
        assert_eq!(from_string::<u32>("0x21"), 0);
    }

    #[test]
    fn test_parse_pos() {
        assert_eq!(parse_pos("10,20"), (10, 20));
        assert_eq!(parse_pos("-5,300"), (-5, 300));
        assert_eq!(parse_pos("10"), (0, 0));
        assert_eq!(parse_pos(""), (0, 0));
        assert_eq!(parse_pos("x,20"), (0, 20));
        assert_eq!(parse_pos("1,2,3"), (1, 2));
    }
}
