use std::fmt;
use std::str::FromStr;

use chrono::Datelike;
use rust_decimal::Decimal;

/// The earliest year a person can have joined
pub const MIN_YEAR_JOINED: u16 = 1900;

/// Possible errors to occur while validating a single field
///
/// Every message describes the constraint the value has to satisfy, so it
/// can be shown to the user as is.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum FieldError {
    #[error("Names should only contain alphanumeric characters and spaces, and it should not be blank")]
    Name,
    #[error("Phone numbers should only contain digits, and it should be between 3 and 15 digits long")]
    Phone,
    #[error(
        "Emails should be of the format local-part@domain. The local-part should only contain \
         alphanumeric characters and the special characters +_.-, and may not start or end with a \
         special character. The domain is made up of labels separated by periods; each label \
         consists of alphanumeric characters, possibly separated by hyphens, and the last label \
         is at least 2 characters long"
    )]
    Email,
    #[error("Addresses can take any values, and it should not be blank")]
    Address,
    #[error("Year joined should be a 4 digit year between 1900 and the current year")]
    YearJoined,
    #[error("Tags names should be alphanumeric")]
    Tag,
    #[error("Descriptions can take any values, and it should not be blank")]
    Description,
    #[error("Amounts should be a non-zero decimal number, e.g. 12.50 or -3")]
    Amount,
    #[error("Timestamps should be of the format YYYY-MM-DD or YYYY-MM-DD HH:MM")]
    Timestamp,
    #[error("Ids should be of the format YYYYNNNN, the year joined followed by a 4 digit number")]
    Id,
    #[error("The index provided is invalid")]
    Index,
}

/// Generates a validated, string backed value object
///
/// The input is trimmed before validation. Deserialization goes through the
/// same validation, so a stored value can never bypass it.
macro_rules! text_field {
    (
        $(#[$meta:meta])*
        $name:ident, $error:ident, $is_valid:path
    ) => {
        $(#[$meta])*
        #[derive(Clone, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
        #[serde(try_from = "String", into = "String")]
        pub struct $name(String);

        impl $name {
            /// The validated value
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl FromStr for $name {
            type Err = FieldError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let s = s.trim();
                match $is_valid(s) {
                    true => Ok(Self(s.to_owned())),
                    false => Err(FieldError::$error),
                }
            }
        }

        impl TryFrom<String> for $name {
            type Error = FieldError;

            fn try_from(s: String) -> Result<Self, Self::Error> {
                s.parse()
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> Self {
                value.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

text_field!(
    /// The full name of a person
    Name, Name, is_valid_name
);
text_field!(
    /// A phone number consisting of digits only
    Phone, Phone, is_valid_phone
);
text_field!(
    /// An email address of the form `local@domain`
    Email, Email, is_valid_email
);
text_field!(
    /// A free form postal address
    Address, Address, is_non_blank
);
text_field!(
    /// A single word label attached to a person
    ///
    /// Tags are compared case-sensitively.
    Tag, Tag, is_valid_tag
);
text_field!(
    /// What a transaction was for
    Description, Description, is_non_blank
);

impl Default for Description {
    fn default() -> Self {
        Self("-".to_owned())
    }
}

impl Name {
    /// Whether one of the words of the name equals `word`, ignoring case
    pub fn contains_word_ignore_case(&self, word: &str) -> bool {
        self.0
            .split_whitespace()
            .any(|part| part.eq_ignore_ascii_case(word))
    }
}

/// The year a person joined
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "u16", into = "u16")]
pub struct YearJoined(u16);

impl YearJoined {
    /// The year as a number
    pub fn value(self) -> u16 {
        self.0
    }

    fn is_plausible(year: u16) -> bool {
        let current = chrono::Local::now().year();
        year >= MIN_YEAR_JOINED && i32::from(year) <= current
    }
}

impl FromStr for YearJoined {
    type Err = FieldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.len() != 4 || !s.bytes().all(|b| b.is_ascii_digit()) {
            return Err(FieldError::YearJoined);
        }
        let year = s.parse::<u16>().map_err(|_| FieldError::YearJoined)?;
        Self::try_from(year)
    }
}

impl TryFrom<u16> for YearJoined {
    type Error = FieldError;

    fn try_from(year: u16) -> Result<Self, Self::Error> {
        match Self::is_plausible(year) {
            true => Ok(Self(year)),
            false => Err(FieldError::YearJoined),
        }
    }
}

impl From<YearJoined> for u16 {
    fn from(year: YearJoined) -> Self {
        year.0
    }
}

impl fmt::Display for YearJoined {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}", self.0)
    }
}

/// A non-zero amount of money
///
/// Positive amounts are owed to the user by the person, negative amounts are
/// owed to the person by the user. The value is kept normalized, so `12.50`
/// and `12.5` are the same amount.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "Decimal", into = "Decimal")]
pub struct Amount(Decimal);

impl Amount {
    /// The decimal value
    pub fn value(self) -> Decimal {
        self.0
    }
}

impl FromStr for Amount {
    type Err = FieldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value = s.trim()
            .parse::<Decimal>()
            .map_err(|_| FieldError::Amount)?;
        Self::try_from(value)
    }
}

impl TryFrom<Decimal> for Amount {
    type Error = FieldError;

    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        match value.is_zero() {
            false => Ok(Self(value.normalize())),
            true => Err(FieldError::Amount),
        }
    }
}

impl From<Amount> for Decimal {
    fn from(amount: Amount) -> Self {
        amount.0
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

fn is_non_blank(s: &str) -> bool {
    s.chars().next().map_or(false, |c| !c.is_whitespace())
}

fn is_valid_name(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphanumeric() => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == ' ')
        }
        _ => false,
    }
}

fn is_valid_phone(s: &str) -> bool {
    (3..=15).contains(&s.len()) && s.bytes().all(|b| b.is_ascii_digit())
}

fn is_valid_tag(s: &str) -> bool {
    !s.is_empty() && s.chars().all(|c| c.is_ascii_alphanumeric())
}

fn is_valid_email(s: &str) -> bool {
    match s.split_once('@') {
        Some((local, domain)) => is_valid_email_local(local) && is_valid_email_domain(domain),
        None => false,
    }
}

fn is_alphanumeric_run(s: &str) -> bool {
    !s.is_empty() && s.chars().all(|c| c.is_ascii_alphanumeric())
}

// alphanumeric runs joined by single special characters
fn is_valid_email_local(local: &str) -> bool {
    local
        .split(|c| matches!(c, '+' | '_' | '.' | '-'))
        .all(is_alphanumeric_run)
}

fn is_valid_email_domain(domain: &str) -> bool {
    let labels = domain.split('.').collect::<Vec<_>>();
    let last_is_long_enough = labels.last().map_or(false, |last| last.len() >= 2);

    last_is_long_enough && labels.iter().all(|label| label.split('-').all(is_alphanumeric_run))
}
