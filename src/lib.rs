pub use self::{
    command::{Command, CommandError, CommandResult, View},
    fields::{Address, Amount, Description, Email, FieldError, Name, Phone, Tag, YearJoined},
    logic::{Logic, LogicError},
    model::{ModelManager, Predicate, Session},
    parser::{parse_command, ParseError},
    pay_back::{PayBack, ReadOnlyPayBack, StoreError},
    person::{NewPerson, Person, PersonEdit, PersonId},
    prefs::{GuiSettings, ReadOnlyUserPrefs, UserPrefs},
    storage::{export_transactions, JsonStorage, Storage, StorageError},
    transaction::{Transaction, TransactionBuilder, TIMESTAMP_FORMAT},
};

pub mod command;
pub mod model;
pub mod parser;
pub mod storage;

mod fields;
mod logic;
mod pay_back;
mod person;
mod prefs;
mod transaction;
