use std::borrow::Cow;

use crate::command::{self, Command};
use crate::parser::{
    append_prefixes, is_compact_form, parse_index, parse_tags, parse_timestamp, tokenize,
    ArgumentMultimap, ParseError, Prefix, PREFIX_ADDRESS, PREFIX_AMOUNT, PREFIX_DESCRIPTION,
    PREFIX_EMAIL, PREFIX_NAME, PREFIX_PHONE, PREFIX_TAG, PREFIX_TIMESTAMP, PREFIX_YEAR_JOINED,
};
use crate::{NewPerson, PersonEdit, PersonId, Tag};

const ADD_PREFIXES: &[Prefix] = &[
    PREFIX_NAME,
    PREFIX_PHONE,
    PREFIX_EMAIL,
    PREFIX_ADDRESS,
    PREFIX_YEAR_JOINED,
    PREFIX_TAG,
];
const ADD_REQUIRED: &[Prefix] = &[
    PREFIX_NAME,
    PREFIX_PHONE,
    PREFIX_EMAIL,
    PREFIX_ADDRESS,
    PREFIX_YEAR_JOINED,
];
const EDIT_PREFIXES: &[Prefix] = &[PREFIX_NAME, PREFIX_PHONE, PREFIX_EMAIL, PREFIX_ADDRESS, PREFIX_TAG];
const EDIT_SINGULAR: &[Prefix] = &[PREFIX_NAME, PREFIX_PHONE, PREFIX_EMAIL, PREFIX_ADDRESS];
const TRANSACTION_PREFIXES: &[Prefix] = &[PREFIX_AMOUNT, PREFIX_DESCRIPTION, PREFIX_TIMESTAMP];

/// `add n/NAME p/PHONE e/EMAIL a/ADDRESS yj/YEAR [t/TAG]...`
///
/// Also accepts `add NAME; PHONE; EMAIL; ADDRESS; YEAR[; TAG]...`.
pub(super) fn parse_add(args: &str) -> Result<Command, ParseError> {
    let args = match is_compact_form(args, ADD_PREFIXES) {
        true => Cow::Owned(append_prefixes(args, ADD_PREFIXES)),
        false => Cow::Borrowed(args),
    };
    let multimap = tokenize(&args, ADD_PREFIXES);

    if !multimap.are_prefixes_present(ADD_REQUIRED) || !multimap.preamble().is_empty() {
        return Err(ParseError::InvalidCommandFormat(command::ADD_USAGE));
    }
    multimap.verify_no_duplicate_prefixes_for(ADD_REQUIRED)?;

    Ok(Command::Add(NewPerson {
        name: required(&multimap, PREFIX_NAME)?.parse()?,
        phone: required(&multimap, PREFIX_PHONE)?.parse()?,
        email: required(&multimap, PREFIX_EMAIL)?.parse()?,
        address: required(&multimap, PREFIX_ADDRESS)?.parse()?,
        year_joined: required(&multimap, PREFIX_YEAR_JOINED)?.parse()?,
        tags: parse_tags(multimap.all_values(PREFIX_TAG))?,
    }))
}

/// `edit ID [n/NAME] [p/PHONE] [e/EMAIL] [a/ADDRESS] [t/TAG]...`
///
/// A single empty `t/` removes all tags.
pub(super) fn parse_edit(args: &str) -> Result<Command, ParseError> {
    let multimap = tokenize(args, EDIT_PREFIXES);
    if multimap.preamble().is_empty() {
        return Err(ParseError::InvalidCommandFormat(command::EDIT_USAGE));
    }
    let id = multimap.preamble().parse::<PersonId>()?;
    multimap.verify_no_duplicate_prefixes_for(EDIT_SINGULAR)?;

    let edit = PersonEdit {
        name: multimap.value(PREFIX_NAME).map(str::parse).transpose()?,
        phone: multimap.value(PREFIX_PHONE).map(str::parse).transpose()?,
        email: multimap.value(PREFIX_EMAIL).map(str::parse).transpose()?,
        address: multimap.value(PREFIX_ADDRESS).map(str::parse).transpose()?,
        tags: parse_tags_for_edit(multimap.all_values(PREFIX_TAG))?,
    };
    if !edit.is_any_field_edited() {
        return Err(ParseError::NoFieldEdited);
    }

    Ok(Command::Edit { id, edit })
}

/// `delete ID`
pub(super) fn parse_delete(args: &str) -> Result<Command, ParseError> {
    let args = args.trim();
    if args.is_empty() {
        return Err(ParseError::InvalidCommandFormat(command::DELETE_USAGE));
    }

    Ok(Command::Delete(args.parse()?))
}

/// `find KEYWORD [MORE_KEYWORDS]...`
pub(super) fn parse_find(args: &str) -> Result<Command, ParseError> {
    let keywords = args
        .split_whitespace()
        .map(str::to_owned)
        .collect::<Vec<_>>();

    match keywords.is_empty() {
        true => Err(ParseError::InvalidCommandFormat(command::FIND_USAGE)),
        false => Ok(Command::Find(keywords)),
    }
}

/// `addtransaction [ID] amt/AMOUNT [d/DESCRIPTION] [on/TIMESTAMP]`
pub(super) fn parse_add_transaction(args: &str) -> Result<Command, ParseError> {
    let multimap = tokenize(args, TRANSACTION_PREFIXES);
    let amount = match multimap.value(PREFIX_AMOUNT) {
        Some(amount) => amount,
        None => return Err(ParseError::InvalidCommandFormat(command::ADD_TRANSACTION_USAGE)),
    };
    multimap.verify_no_duplicate_prefixes_for(TRANSACTION_PREFIXES)?;

    let person = match multimap.preamble() {
        "" => None,
        id => Some(id.parse()?),
    };

    Ok(Command::AddTransaction {
        person,
        amount: amount.parse()?,
        description: multimap.value(PREFIX_DESCRIPTION).map(str::parse).transpose()?,
        timestamp: multimap.value(PREFIX_TIMESTAMP).map(parse_timestamp).transpose()?,
    })
}

/// `deletetransaction INDEX`
pub(super) fn parse_delete_transaction(args: &str) -> Result<Command, ParseError> {
    let args = args.trim();
    if args.is_empty() {
        return Err(ParseError::InvalidCommandFormat(command::DELETE_TRANSACTION_USAGE));
    }

    Ok(Command::DeleteTransaction(parse_index(args)?))
}

/// `listtransactions [ID]`
pub(super) fn parse_list_transactions(args: &str) -> Result<Command, ParseError> {
    match args.trim() {
        "" => Ok(Command::ListTransactions(None)),
        id => Ok(Command::ListTransactions(Some(id.parse()?))),
    }
}

fn required(multimap: &ArgumentMultimap, prefix: Prefix) -> Result<&str, ParseError> {
    multimap
        .value(prefix)
        .ok_or(ParseError::InvalidCommandFormat(command::ADD_USAGE))
}

fn parse_tags_for_edit(values: &[String]) -> Result<Option<Vec<Tag>>, ParseError> {
    match values {
        [] => Ok(None),
        [only] if only.is_empty() => Ok(Some(Vec::new())),
        values => parse_tags(values).map(Some),
    }
}
