use std::collections::HashSet;

use chrono::{NaiveDate, NaiveDateTime};

use crate::command::{self, Command};
use crate::{FieldError, Tag};

pub use self::tokenizer::{
    tokenize, ArgumentMultimap, Prefix, PREFIX_ADDRESS, PREFIX_AMOUNT, PREFIX_DESCRIPTION,
    PREFIX_EMAIL, PREFIX_NAME, PREFIX_PHONE, PREFIX_TAG, PREFIX_TIMESTAMP, PREFIX_YEAR_JOINED,
};

mod commands;
mod tokenizer;

/// The least number of fields the compact form of a command has
pub const COMPACT_FORM_MIN_FIELDS: usize = 5;

/// Possible errors to occur while parsing user input
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("Invalid command format!\n{0}")]
    InvalidCommandFormat(&'static str),
    #[error("Unknown command: {0}")]
    UnknownCommand(String),
    #[error(transparent)]
    InvalidFormat(#[from] FieldError),
    #[error("Multiple values specified for the following single-valued field(s): {0}")]
    DuplicatePrefix(String),
    #[error("The tag [{0}] was given more than once, duplicate tags are not allowed")]
    DuplicateTag(Tag),
    #[error("At least one field to edit must be provided")]
    NoFieldEdited,
}

/// Parses one line of user input into an executable command
///
/// The first word selects the command, the rest are its arguments.
pub fn parse_command(input: &str) -> Result<Command, ParseError> {
    let input = input.trim();
    if input.is_empty() {
        return Err(ParseError::InvalidCommandFormat(command::HELP_USAGE));
    }
    let (word, args) = input
        .find(char::is_whitespace)
        .map_or((input, ""), |split| input.split_at(split));

    match word {
        command::ADD_WORD => commands::parse_add(args),
        command::EDIT_WORD => commands::parse_edit(args),
        command::DELETE_WORD => commands::parse_delete(args),
        command::FIND_WORD => commands::parse_find(args),
        command::LIST_WORD => Ok(Command::List),
        command::CLEAR_WORD => Ok(Command::Clear),
        command::ADD_TRANSACTION_WORD => commands::parse_add_transaction(args),
        command::DELETE_TRANSACTION_WORD => commands::parse_delete_transaction(args),
        command::LIST_TRANSACTIONS_WORD => commands::parse_list_transactions(args),
        command::HELP_WORD => Ok(Command::Help),
        command::EXIT_WORD => Ok(Command::Exit),
        _ => Err(ParseError::UnknownCommand(word.to_owned())),
    }
}

/// Parses a list of tags, keeping their order
///
/// Fails on the first tag that was already given. Tags are compared
/// case-sensitively.
pub fn parse_tags<S: AsRef<str>>(values: &[S]) -> Result<Vec<Tag>, ParseError> {
    let mut seen = HashSet::new();
    let mut tags = Vec::with_capacity(values.len());
    for value in values {
        let tag = value.as_ref().parse::<Tag>()?;
        if !seen.insert(tag.clone()) {
            return Err(ParseError::DuplicateTag(tag));
        }
        tags.push(tag);
    }

    Ok(tags)
}

/// Parses a one-based index into a list
pub fn parse_index(value: &str) -> Result<usize, ParseError> {
    match value.trim().parse::<usize>() {
        Ok(index) if index > 0 => Ok(index),
        _ => Err(FieldError::Index.into()),
    }
}

/// Parses `YYYY-MM-DD HH:MM`, or `YYYY-MM-DD` meaning midnight
pub fn parse_timestamp(value: &str) -> Result<NaiveDateTime, ParseError> {
    let value = value.trim();
    NaiveDateTime::parse_from_str(value, crate::TIMESTAMP_FORMAT)
        .ok()
        .or_else(|| {
            NaiveDate::parse_from_str(value, "%Y-%m-%d")
                .ok()
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })
        .ok_or(ParseError::InvalidFormat(FieldError::Timestamp))
}

/// Whether `args` is the semicolon separated shorthand of a command
///
/// The shorthand has at least [`COMPACT_FORM_MIN_FIELDS`] non-blank fields
/// and none of the command's prefixes. A trailing `;` is allowed.
pub fn is_compact_form(args: &str, prefixes: &[Prefix]) -> bool {
    let fields = compact_fields(args);

    fields.len() >= COMPACT_FORM_MIN_FIELDS
        && fields.iter().all(|field| !field.trim().is_empty())
        && !tokenizer::contains_any_prefix(args, prefixes)
}

/// Rewrites the semicolon separated shorthand into prefixed form
///
/// The n-th field gets the n-th prefix. Once the prefixes run out, the last
/// one is repeated for the remaining fields.
pub fn append_prefixes(args: &str, prefixes: &[Prefix]) -> String {
    let mut prefixed = String::with_capacity(args.len() + 4 * prefixes.len());
    for (i, field) in compact_fields(args).into_iter().enumerate() {
        let prefix = match prefixes.get(i).or_else(|| prefixes.last()) {
            Some(prefix) => prefix,
            None => break,
        };
        prefixed.push(' ');
        prefixed.push_str(prefix.as_str());
        prefixed.push_str(field.trim());
    }

    prefixed
}

fn compact_fields(args: &str) -> Vec<&str> {
    let mut fields = args.split(';').collect::<Vec<_>>();
    if fields.len() > 1 && fields.last().map_or(false, |last| last.trim().is_empty()) {
        fields.pop();
    }

    fields
}
