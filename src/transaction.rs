use std::fmt;

use chrono::NaiveDateTime;

use crate::{Amount, Description, PersonId};

/// The format timestamps are displayed and exported in
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M";

/// A transaction
///
/// Transactions record money owed between the user and a person. They are
/// immutable once created, replacing one means deleting it and adding a new one.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Transaction {
    person: PersonId,
    amount: Amount,
    description: Description,
    timestamp: NaiveDateTime,
}

impl Transaction {
    /// Starts building a transaction of `amount` for `person`
    pub fn builder(person: PersonId, amount: Amount) -> TransactionBuilder {
        TransactionBuilder {
            person,
            amount,
            description: None,
            timestamp: None,
        }
    }

    /// The person this transaction is for
    pub fn person(&self) -> PersonId {
        self.person
    }

    /// The amount
    /// Positive if the person owes the user
    pub fn amount(&self) -> Amount {
        self.amount
    }

    pub fn description(&self) -> &Description {
        &self.description
    }

    pub fn timestamp(&self) -> NaiveDateTime {
        self.timestamp
    }

    /// A copy of this transaction for another person
    pub(crate) fn reassigned(&self, person: PersonId) -> Transaction {
        Transaction {
            person,
            ..self.clone()
        }
    }
}

impl fmt::Display for Transaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}; Amount: {}; Description: {}; On: {}",
            self.person,
            self.amount,
            self.description,
            self.timestamp.format(TIMESTAMP_FORMAT),
        )
    }
}

/// Builds a [`Transaction`]
///
/// The description defaults to `-` and the timestamp to the current local time.
#[derive(Debug)]
pub struct TransactionBuilder {
    person: PersonId,
    amount: Amount,
    description: Option<Description>,
    timestamp: Option<NaiveDateTime>,
}

impl TransactionBuilder {
    pub fn description(mut self, description: Description) -> Self {
        self.description = Some(description);
        self
    }

    pub fn timestamp(mut self, timestamp: NaiveDateTime) -> Self {
        self.timestamp = Some(timestamp);
        self
    }

    pub fn build(self) -> Transaction {
        Transaction {
            person: self.person,
            amount: self.amount,
            description: self.description.unwrap_or_default(),
            timestamp: self.timestamp.unwrap_or_else(now),
        }
    }
}

fn now() -> NaiveDateTime {
    chrono::Local::now().naive_local()
}
