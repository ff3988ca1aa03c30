//! Options registry
//!
//! Holds the window-system specific options (`--winsys-options`) and the help
//! text the active native backend contributes for them.

use tracing::{debug, warn};

use crate::util::{split, SplitMode};

/// A single `name=value` window-system option
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WinsysOption {
    pub name: String,
    pub value: String,
}

impl WinsysOption {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// Options shared between the harness and the native backend
#[derive(Debug, Clone, Default)]
pub struct Options {
    /// Window-system options in the order they were given
    pub winsys_options: Vec<WinsysOption>,
    /// Help text describing the options the backend understands
    pub winsys_options_help: String,
}

impl Options {
    /// Parse a `name1=value1:name2=value2` list and append its entries.
    ///
    /// An entry without `=` is recorded with an empty value.
    pub fn parse_winsys_options(&mut self, list: &str) {
        for entry in split(list, ':', SplitMode::Normal) {
            let (name, value) = match entry.split_once('=') {
                Some((name, value)) => (name, value),
                None => (entry.as_str(), ""),
            };

            if name.is_empty() {
                warn!("Ignoring winsys option without a name: '{}'", entry);
                continue;
            }

            debug!("Winsys option: {}='{}'", name, value);
            self.winsys_options.push(WinsysOption::new(name, value));
        }
    }

    /// Value of the winsys option `name`; the last occurrence wins.
    pub fn winsys_option(&self, name: &str) -> Option<&str> {
        self.winsys_options
            .iter()
            .rev()
            .find(|opt| opt.name == name)
            .map(|opt| opt.value.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_winsys_options() {
        let mut options = Options::default();
        options.parse_winsys_options("position=10,20:flag:other=a=b");

        assert_eq!(
            options.winsys_options,
            vec![
                WinsysOption::new("position", "10,20"),
                WinsysOption::new("flag", ""),
                WinsysOption::new("other", "a=b"),
            ]
        );
    }

    #[test]
    fn test_skips_unnamed_entries() {
        let mut options = Options::default();
        options.parse_winsys_options("=5::position=1,2");

        assert_eq!(options.winsys_options.len(), 1);
        assert_eq!(options.winsys_option("position"), Some("1,2"));
    }

    #[test]
    fn test_last_occurrence_wins() {
        let mut options = Options::default();
        options.parse_winsys_options("position=1,1");
        options.parse_winsys_options("position=3,4");

        assert_eq!(options.winsys_option("position"), Some("3,4"));
        assert_eq!(options.winsys_option("missing"), None);
    }
}
