use chrono::NaiveDateTime;
use rust_decimal::Decimal;

use crate::model::{show_all, ModelManager, Session};
use crate::{Amount, Description, NewPerson, Person, PersonEdit, PersonId, StoreError, Transaction, YearJoined};

pub const ADD_WORD: &str = "add";
pub const EDIT_WORD: &str = "edit";
pub const DELETE_WORD: &str = "delete";
pub const FIND_WORD: &str = "find";
pub const LIST_WORD: &str = "list";
pub const CLEAR_WORD: &str = "clear";
pub const ADD_TRANSACTION_WORD: &str = "addtransaction";
pub const DELETE_TRANSACTION_WORD: &str = "deletetransaction";
pub const LIST_TRANSACTIONS_WORD: &str = "listtransactions";
pub const HELP_WORD: &str = "help";
pub const EXIT_WORD: &str = "exit";

pub const ADD_USAGE: &str = "add: Adds a person. \
    Parameters: n/NAME p/PHONE e/EMAIL a/ADDRESS yj/YEAR_JOINED [t/TAG]...\n\
    Example: add n/John Doe p/98765432 e/johnd@example.com a/311, Clementi Ave 2, #02-25 yj/2023 t/friends\n\
    Shorthand: add John Doe; 98765432; johnd@example.com; 311, Clementi Ave 2, #02-25; 2023; friends";
pub const EDIT_USAGE: &str = "edit: Edits the person with the given id. \
    Parameters: ID [n/NAME] [p/PHONE] [e/EMAIL] [a/ADDRESS] [t/TAG]...\n\
    Example: edit 20230001 p/91234567 e/johndoe@example.com";
pub const DELETE_USAGE: &str = "delete: Deletes the person with the given id and their transactions. \
    Parameters: ID\n\
    Example: delete 20230001";
pub const FIND_USAGE: &str = "find: Finds all persons whose names contain any of the given keywords (case-insensitive). \
    Parameters: KEYWORD [MORE_KEYWORDS]...\n\
    Example: find alice bob charlie";
pub const ADD_TRANSACTION_USAGE: &str = "addtransaction: Adds a transaction for a person, \
    or for the last mentioned person if no id is given. \
    Parameters: [ID] amt/AMOUNT [d/DESCRIPTION] [on/YYYY-MM-DD [HH:MM]]\n\
    Example: addtransaction 20230001 amt/12.50 d/Lunch on/2023-05-01 12:30";
pub const DELETE_TRANSACTION_USAGE: &str = "deletetransaction: Deletes the transaction at the given position \
    of the displayed transaction list. \
    Parameters: INDEX (must be a positive integer)\n\
    Example: deletetransaction 1";
pub const HELP_USAGE: &str = "Commands: add, edit, delete, find, list, clear, addtransaction, \
    deletetransaction, listtransactions, help, exit";

/// Possible errors to occur while executing a command
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum CommandError {
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("This person already exists: {0}")]
    DuplicatePerson(String),
    #[error("No more ids are available for the year {0}")]
    IdsExhausted(YearJoined),
    #[error("No person was mentioned before, please specify an id")]
    NoPersonInContext,
    #[error("The transaction index provided is invalid")]
    InvalidTransactionIndex,
}

/// Which list view a command wants displayed
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum View {
    Persons,
    Transactions,
}

/// The outcome of a successfully executed command
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CommandResult {
    /// The message to show the user
    pub feedback: String,
    /// The list the user should see now
    pub view: Option<View>,
    pub show_help: bool,
    pub exit: bool,
}

impl CommandResult {
    fn new(feedback: impl Into<String>) -> Self {
        Self {
            feedback: feedback.into(),
            view: None,
            show_help: false,
            exit: false,
        }
    }

    fn showing(mut self, view: View) -> Self {
        self.view = Some(view);
        self
    }
}

/// A single user request
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    /// Adds a person under the next free id of its year
    Add(NewPerson),
    /// Replaces some fields of a person
    Edit { id: PersonId, edit: PersonEdit },
    /// Removes a person together with its transactions
    Delete(PersonId),
    /// Shows the persons with a name containing one of the keywords
    Find(Vec<String>),
    /// Shows all persons
    List,
    /// Removes all persons and transactions
    Clear,
    /// Adds a transaction
    /// The last mentioned person is used if `person` is `None`
    AddTransaction {
        person: Option<PersonId>,
        amount: Amount,
        description: Option<Description>,
        timestamp: Option<NaiveDateTime>,
    },
    /// Removes a transaction by its one-based index in the transaction view
    DeleteTransaction(usize),
    /// Shows the transactions of one person, or all
    ListTransactions(Option<PersonId>),
    Help,
    Exit,
}

impl Command {
    /// Whether executing the command changes the store
    pub fn is_mutating(&self) -> bool {
        matches!(
            self,
            Command::Add(_)
                | Command::Edit { .. }
                | Command::Delete(_)
                | Command::Clear
                | Command::AddTransaction { .. }
                | Command::DeleteTransaction(_)
        )
    }

    /// Runs the command against the model
    ///
    /// A failed command leaves model and session untouched.
    pub fn execute(self, model: &mut ModelManager, session: &mut Session) -> Result<CommandResult, CommandError> {
        match self {
            Command::Add(new_person) => {
                let year = new_person.year_joined;
                let person = model.get_last_id_on_year(year)
                    .checked_add(1)
                    .and_then(|sequence| new_person.with_sequence(sequence))
                    .ok_or(CommandError::IdsExhausted(year))?;
                check_duplicates(model, &person)?;

                let id = person.id();
                let feedback = format!("New person added: {}", person);
                model.add_person(person)?;
                session.set_last_mentioned_person(id);

                Ok(CommandResult::new(feedback).showing(View::Persons))
            }
            Command::Edit { id, edit } => {
                let edited = model.person(id)
                    .ok_or(StoreError::PersonNotFound(id))?
                    .edited(&edit);
                check_duplicates(model, &edited)?;

                let feedback = format!("Edited person: {}", edited);
                model.set_person(id, edited)?;
                session.set_last_mentioned_person(id);

                Ok(CommandResult::new(feedback).showing(View::Persons))
            }
            Command::Delete(id) => {
                let person = model.delete_person(id)?;
                session.forget(id);

                Ok(CommandResult::new(format!("Deleted person: {}", person)).showing(View::Persons))
            }
            Command::Find(keywords) => {
                model.update_filtered_person_list(Box::new(move |person: &Person| {
                    keywords
                        .iter()
                        .any(|keyword| person.name().contains_word_ignore_case(keyword))
                }));
                let count = model.filtered_person_list().len();

                Ok(CommandResult::new(format!("{} persons listed!", count)).showing(View::Persons))
            }
            Command::List => {
                model.update_filtered_person_list(show_all());

                Ok(CommandResult::new("Listed all persons").showing(View::Persons))
            }
            Command::Clear => {
                model.clear();
                session.clear();

                Ok(CommandResult::new("PayBack has been cleared!").showing(View::Persons))
            }
            Command::AddTransaction { person, amount, description, timestamp } => {
                let person = person
                    .or_else(|| session.last_mentioned_person())
                    .ok_or(CommandError::NoPersonInContext)?;
                if !model.has_person_id(person) {
                    return Err(StoreError::PersonNotFound(person).into());
                }

                let mut builder = Transaction::builder(person, amount);
                if let Some(description) = description {
                    builder = builder.description(description);
                }
                if let Some(timestamp) = timestamp {
                    builder = builder.timestamp(timestamp);
                }
                let transaction = builder.build();
                let feedback = format!("New transaction added: {}", transaction);
                model.add_transaction(transaction)?;
                session.set_last_mentioned_person(person);

                Ok(CommandResult::new(feedback).showing(View::Transactions))
            }
            Command::DeleteTransaction(index) => {
                let target = index.checked_sub(1)
                    .and_then(|i| model.filtered_transaction_list().get(i).map(|t| (*t).clone()))
                    .ok_or(CommandError::InvalidTransactionIndex)?;
                let transaction = model.delete_transaction(&target)?;

                Ok(CommandResult::new(format!("Deleted transaction: {}", transaction))
                    .showing(View::Transactions))
            }
            Command::ListTransactions(None) => {
                model.update_filtered_transaction_list(show_all());

                Ok(CommandResult::new("Listed all transactions").showing(View::Transactions))
            }
            Command::ListTransactions(Some(id)) => {
                let name = model.person(id)
                    .ok_or(StoreError::PersonNotFound(id))?
                    .name()
                    .clone();
                model.update_filtered_transaction_list(Box::new(move |transaction: &Transaction| {
                    transaction.person() == id
                }));
                let transactions = model.filtered_transaction_list();
                let balance = transactions
                    .iter()
                    .fold(Decimal::ZERO, |sum, t| sum.saturating_add(t.amount().value()))
                    .normalize();
                let feedback = format!(
                    "{} transactions listed for {} ({}), balance: {}",
                    transactions.len(),
                    name,
                    id,
                    balance,
                );
                session.set_last_mentioned_person(id);

                Ok(CommandResult::new(feedback).showing(View::Transactions))
            }
            Command::Help => Ok(CommandResult {
                show_help: true,
                ..CommandResult::new(format!(
                    "{}\n\n{}\n\n{}\n\n{}\n\n{}\n\n{}\n\n{}",
                    HELP_USAGE,
                    ADD_USAGE,
                    EDIT_USAGE,
                    DELETE_USAGE,
                    FIND_USAGE,
                    ADD_TRANSACTION_USAGE,
                    DELETE_TRANSACTION_USAGE,
                ))
            }),
            Command::Exit => Ok(CommandResult {
                exit: true,
                ..CommandResult::new("Exiting PayBack as requested ...")
            }),
        }
    }
}

fn check_duplicates(model: &ModelManager, person: &Person) -> Result<(), CommandError> {
    let duplicates = model.get_duplicate_persons(person);
    match duplicates.is_empty() {
        true => Ok(()),
        false => Err(CommandError::DuplicatePerson(
            duplicates
                .iter()
                .map(|p| p.id().to_string())
                .collect::<Vec<_>>()
                .join(", "),
        )),
    }
}
