use std::fmt;
use std::str::FromStr;

use crate::{Address, Email, FieldError, Name, Phone, Tag, YearJoined};

/// The highest sequence number a single year can hand out
pub const MAX_SEQUENCE: u16 = 9999;

/// The unique identifier of a person
///
/// An id is the year the person joined followed by a sequence number that is
/// counted per year, e.g. `20230001` for the first person joining in 2023.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PersonId {
    year: YearJoined,
    sequence: u16,
}

impl PersonId {
    /// Creates an id, or `None` if the sequence is out of range
    pub fn new(year: YearJoined, sequence: u16) -> Option<Self> {
        match (1..=MAX_SEQUENCE).contains(&sequence) {
            true => Some(Self { year, sequence }),
            false => None,
        }
    }

    /// The year the person joined
    pub fn year(self) -> YearJoined {
        self.year
    }

    /// The position of the person within its year
    pub fn sequence(self) -> u16 {
        self.sequence
    }
}

impl FromStr for PersonId {
    type Err = FieldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.len() != 8 || !s.bytes().all(|b| b.is_ascii_digit()) {
            return Err(FieldError::Id);
        }
        let (year, sequence) = s.split_at(4);
        let year = year.parse::<YearJoined>().map_err(|_| FieldError::Id)?;
        let sequence = sequence.parse::<u16>().map_err(|_| FieldError::Id)?;

        Self::new(year, sequence).ok_or(FieldError::Id)
    }
}

impl TryFrom<String> for PersonId {
    type Error = FieldError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<PersonId> for String {
    fn from(id: PersonId) -> Self {
        id.to_string()
    }
}

impl fmt::Display for PersonId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{:04}", self.year, self.sequence)
    }
}

/// A person that was parsed from user input but has no id yet
///
/// The id depends on the persons already in the store, so it is only assigned
/// when the person is actually added.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewPerson {
    pub name: Name,
    pub phone: Phone,
    pub email: Email,
    pub address: Address,
    pub year_joined: YearJoined,
    pub tags: Vec<Tag>,
}

impl NewPerson {
    /// Turns this into a person with the given sequence number in its year
    pub fn with_sequence(self, sequence: u16) -> Option<Person> {
        let id = PersonId::new(self.year_joined, sequence)?;

        Some(Person {
            id,
            name: self.name,
            phone: self.phone,
            email: self.email,
            address: self.address,
            tags: self.tags,
        })
    }
}

/// A contact tracked by the application
///
/// Two kinds of equality exist for persons:
/// 1. Identity:
///    Two persons are the same entity if they have the same [`PersonId`].
/// 2. Business key:
///    Two persons are duplicates if name, phone and email match, see
///    [`Person::is_duplicate_of`]. This is independent of the id.
///
/// `PartialEq` compares every field.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Person {
    id: PersonId,
    name: Name,
    phone: Phone,
    email: Email,
    address: Address,
    #[serde(default)]
    tags: Vec<Tag>,
}

impl Person {
    pub fn new(
        id: PersonId,
        name: Name,
        phone: Phone,
        email: Email,
        address: Address,
        tags: Vec<Tag>,
    ) -> Self {
        Self { id, name, phone, email, address, tags }
    }

    pub fn id(&self) -> PersonId {
        self.id
    }

    pub fn name(&self) -> &Name {
        &self.name
    }

    pub fn phone(&self) -> &Phone {
        &self.phone
    }

    pub fn email(&self) -> &Email {
        &self.email
    }

    pub fn address(&self) -> &Address {
        &self.address
    }

    /// The year joined is always the year of the id
    pub fn year_joined(&self) -> YearJoined {
        self.id.year()
    }

    /// The tags in insertion order
    pub fn tags(&self) -> &[Tag] {
        &self.tags
    }

    /// Whether both persons share name, phone and email
    pub fn is_duplicate_of(&self, other: &Person) -> bool {
        self.name == other.name && self.phone == other.phone && self.email == other.email
    }

    /// Returns a copy with the given fields replaced, keeping the id
    pub fn edited(&self, edit: &PersonEdit) -> Person {
        Person {
            id: self.id,
            name: edit.name.clone().unwrap_or_else(|| self.name.clone()),
            phone: edit.phone.clone().unwrap_or_else(|| self.phone.clone()),
            email: edit.email.clone().unwrap_or_else(|| self.email.clone()),
            address: edit.address.clone().unwrap_or_else(|| self.address.clone()),
            tags: edit.tags.clone().unwrap_or_else(|| self.tags.clone()),
        }
    }
}

impl fmt::Display for Person {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}; Name: {}; Phone: {}; Email: {}; Address: {}; Year joined: {}; Tags: ",
            self.id, self.name, self.phone, self.email, self.address, self.year_joined(),
        )?;
        for tag in &self.tags {
            write!(f, "[{}]", tag)?;
        }

        Ok(())
    }
}

/// The fields to replace when editing a person
///
/// `None` keeps the current value. `Some(vec![])` for tags clears them.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PersonEdit {
    pub name: Option<Name>,
    pub phone: Option<Phone>,
    pub email: Option<Email>,
    pub address: Option<Address>,
    pub tags: Option<Vec<Tag>>,
}

impl PersonEdit {
    /// Whether at least one field is replaced
    pub fn is_any_field_edited(&self) -> bool {
        self.name.is_some()
            || self.phone.is_some()
            || self.email.is_some()
            || self.address.is_some()
            || self.tags.is_some()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Builds a person from raw values, panicking on invalid input
    pub(crate) fn person(id: &str, name: &str, phone: &str, email: &str) -> Person {
        Person::new(
            id.parse().unwrap(),
            name.parse().unwrap(),
            phone.parse().unwrap(),
            email.parse().unwrap(),
            "311 Clementi".parse().unwrap(),
            vec![],
        )
    }

    #[test]
    fn id_display_and_parse() {
        let id: PersonId = "20230001".parse().unwrap();
        assert_eq!(id.year().value(), 2023);
        assert_eq!(id.sequence(), 1);
        assert_eq!(id.to_string(), "20230001");
    }

    #[test]
    fn invalid_ids() {
        for id in ["", "2023001", "202300001", "20230000", "18990001", "2023abcd"] {
            assert_eq!(id.parse::<PersonId>(), Err(FieldError::Id), "{:?}", id);
        }
    }

    #[test]
    fn sequence_bounds() {
        let year: YearJoined = "2023".parse().unwrap();
        assert!(PersonId::new(year, 0).is_none());
        assert!(PersonId::new(year, MAX_SEQUENCE).is_some());
        assert!(PersonId::new(year, MAX_SEQUENCE + 1).is_none());
    }

    #[test]
    fn duplicates_ignore_id_and_address() {
        let alice = person("20230001", "Alice", "94351253", "alice@example.com");
        let mut copy = person("20230002", "Alice", "94351253", "alice@example.com");
        copy.address = "Somewhere else".parse().unwrap();
        assert!(alice.is_duplicate_of(&copy));
        assert_ne!(alice, copy);

        let other_phone = person("20230001", "Alice", "94351254", "alice@example.com");
        assert!(!alice.is_duplicate_of(&other_phone));
    }

    #[test]
    fn editing_keeps_id() {
        let alice = person("20230001", "Alice", "94351253", "alice@example.com");
        let edit = PersonEdit {
            name: Some("Alicia".parse().unwrap()),
            tags: Some(vec!["vip".parse().unwrap()]),
            ..Default::default()
        };
        let edited = alice.edited(&edit);

        assert_eq!(edited.id(), alice.id());
        assert_eq!(edited.name().as_str(), "Alicia");
        assert_eq!(edited.phone(), alice.phone());
        assert_eq!(edited.tags().len(), 1);
    }
}
