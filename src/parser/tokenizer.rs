use std::collections::HashMap;
use std::fmt;

use crate::ParseError;

/// A marker identifying which field the following text belongs to
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Prefix(&'static str);

impl Prefix {
    pub const fn new(prefix: &'static str) -> Self {
        Self(prefix)
    }

    pub fn as_str(self) -> &'static str {
        self.0
    }
}

impl fmt::Display for Prefix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

pub const PREFIX_NAME: Prefix = Prefix::new("n/");
pub const PREFIX_PHONE: Prefix = Prefix::new("p/");
pub const PREFIX_EMAIL: Prefix = Prefix::new("e/");
pub const PREFIX_ADDRESS: Prefix = Prefix::new("a/");
pub const PREFIX_YEAR_JOINED: Prefix = Prefix::new("yj/");
pub const PREFIX_TAG: Prefix = Prefix::new("t/");
pub const PREFIX_AMOUNT: Prefix = Prefix::new("amt/");
pub const PREFIX_DESCRIPTION: Prefix = Prefix::new("d/");
pub const PREFIX_TIMESTAMP: Prefix = Prefix::new("on/");

/// The arguments of a command, split by prefix
///
/// A prefix can occur more than once, in which case all of its values are
/// kept in the order they appeared in.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ArgumentMultimap {
    preamble: String,
    values: HashMap<Prefix, Vec<String>>,
}

impl ArgumentMultimap {
    /// The text in front of the first prefix
    pub fn preamble(&self) -> &str {
        &self.preamble
    }

    /// The last value given for `prefix`
    pub fn value(&self, prefix: Prefix) -> Option<&str> {
        self.values
            .get(&prefix)
            .and_then(|values| values.last())
            .map(String::as_str)
    }

    /// All values given for `prefix`
    pub fn all_values(&self, prefix: Prefix) -> &[String] {
        self.values
            .get(&prefix)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Whether every prefix has at least one value
    pub fn are_prefixes_present(&self, prefixes: &[Prefix]) -> bool {
        prefixes.iter().all(|prefix| self.values.contains_key(prefix))
    }

    /// Fails if one of `prefixes` was given more than once
    pub fn verify_no_duplicate_prefixes_for(&self, prefixes: &[Prefix]) -> Result<(), ParseError> {
        let duplicates = prefixes
            .iter()
            .filter(|prefix| self.all_values(**prefix).len() > 1)
            .map(|prefix| prefix.as_str())
            .collect::<Vec<_>>();

        match duplicates.is_empty() {
            true => Ok(()),
            false => Err(ParseError::DuplicatePrefix(duplicates.join(" "))),
        }
    }
}

/// Splits `args` into a preamble and the values of the given prefixes
///
/// A prefix is only recognized at the start of `args` or after whitespace.
/// Everything up to the next recognized prefix belongs to the value, including
/// text that looks like an unknown prefix. Values are trimmed.
pub fn tokenize(args: &str, prefixes: &[Prefix]) -> ArgumentMultimap {
    let mut positions = find_prefix_positions(args, prefixes);
    positions.sort_by_key(|(position, _)| *position);

    let preamble_end = positions.first().map_or(args.len(), |(position, _)| *position);
    let mut multimap = ArgumentMultimap {
        preamble: args[..preamble_end].trim().to_owned(),
        values: HashMap::new(),
    };

    for (i, (position, prefix)) in positions.iter().enumerate() {
        let start = position + prefix.as_str().len();
        let end = positions.get(i + 1).map_or(args.len(), |(next, _)| *next);
        multimap.values
            .entry(*prefix)
            .or_default()
            .push(args[start..end].trim().to_owned());
    }

    multimap
}

/// Whether `args` contains at least one of `prefixes`
pub fn contains_any_prefix(args: &str, prefixes: &[Prefix]) -> bool {
    !find_prefix_positions(args, prefixes).is_empty()
}

fn find_prefix_positions(args: &str, prefixes: &[Prefix]) -> Vec<(usize, Prefix)> {
    prefixes
        .iter()
        .flat_map(|prefix| {
            args.match_indices(prefix.as_str())
                .filter(move |(position, _)| is_token_start(args, *position))
                .map(move |(position, _)| (position, *prefix))
        })
        .collect()
}

fn is_token_start(args: &str, position: usize) -> bool {
    args[..position]
        .chars()
        .next_back()
        .map_or(true, char::is_whitespace)
}

#[cfg(test)]
mod tests {
    use super::*;

    const PREFIXES: &[Prefix] = &[PREFIX_NAME, PREFIX_PHONE, PREFIX_TAG, PREFIX_AMOUNT];

    #[test]
    fn empty_args() {
        let multimap = tokenize("  ", PREFIXES);
        assert_eq!(multimap.preamble(), "");
        assert_eq!(multimap.value(PREFIX_NAME), None);
        assert!(multimap.all_values(PREFIX_TAG).is_empty());
    }

    #[test]
    fn no_prefixes() {
        let multimap = tokenize(" some random  string ", PREFIXES);
        assert_eq!(multimap.preamble(), "some random  string");
    }

    #[test]
    fn preamble_and_values() {
        let multimap = tokenize(" 20230001 n/John Doe p/ 98765432 ", PREFIXES);
        assert_eq!(multimap.preamble(), "20230001");
        assert_eq!(multimap.value(PREFIX_NAME), Some("John Doe"));
        assert_eq!(multimap.value(PREFIX_PHONE), Some("98765432"));
    }

    #[test]
    fn repeated_prefix_keeps_order() {
        let multimap = tokenize(" n/John t/vip t/gold t/", PREFIXES);
        assert_eq!(multimap.all_values(PREFIX_TAG), &["vip", "gold", ""]);
        assert_eq!(multimap.value(PREFIX_TAG), Some(""));
    }

    #[test]
    fn unknown_prefixes_stay_in_value() {
        let multimap = tokenize(" n/John x/unknown p/123", PREFIXES);
        assert_eq!(multimap.value(PREFIX_NAME), Some("John x/unknown"));
        assert_eq!(multimap.value(PREFIX_PHONE), Some("123"));
    }

    #[test]
    fn prefix_must_follow_whitespace() {
        let multimap = tokenize(" n/Johnp/123 amt/5", PREFIXES);
        assert_eq!(multimap.value(PREFIX_NAME), Some("Johnp/123"));
        assert_eq!(multimap.value(PREFIX_PHONE), None);
        // `t/` inside `amt/` is not a tag
        assert_eq!(multimap.value(PREFIX_AMOUNT), Some("5"));
        assert!(multimap.all_values(PREFIX_TAG).is_empty());
    }

    #[test]
    fn prefix_at_start() {
        let multimap = tokenize("n/John", PREFIXES);
        assert_eq!(multimap.preamble(), "");
        assert_eq!(multimap.value(PREFIX_NAME), Some("John"));
    }

    #[test]
    fn duplicate_prefixes() {
        let multimap = tokenize(" n/John n/Jane p/1 p/2 t/a t/b", PREFIXES);
        assert_eq!(
            multimap.verify_no_duplicate_prefixes_for(&[PREFIX_NAME, PREFIX_PHONE]),
            Err(ParseError::DuplicatePrefix("n/ p/".to_owned())),
        );
        assert!(tokenize(" n/John t/a t/b", PREFIXES)
            .verify_no_duplicate_prefixes_for(&[PREFIX_NAME, PREFIX_PHONE])
            .is_ok());
    }
}
