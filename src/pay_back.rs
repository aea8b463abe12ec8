use std::collections::HashMap;

use log::debug;

use crate::{Person, PersonId, Transaction, YearJoined};

/// Possible errors to occur while mutating the [`PayBack`] store
///
/// A failed operation leaves the store unchanged.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    #[error("The person {0} was not found")]
    PersonNotFound(PersonId),
    #[error("The transaction was not found")]
    TransactionNotFound,
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

/// Read only access to the persons and transactions of a store
///
/// This is the snapshot interface used to copy, reset and persist a store.
pub trait ReadOnlyPayBack {
    /// All persons in insertion order
    fn persons(&self) -> &[Person];

    /// All transactions in insertion order
    fn transactions(&self) -> &[Transaction];
}

/// The central entity store owning all persons and transactions
#[derive(Clone, Debug, Default)]
pub struct PayBack {
    persons: Vec<Person>,
    transactions: Vec<Transaction>,
    /// The highest sequence ever issued per year during this session
    last_ids: HashMap<YearJoined, u16>,
}

impl PayBack {
    /// Creates a new, empty store
    pub fn new() -> Self {
        Self {
            persons: Vec::new(),
            transactions: Vec::new(),
            last_ids: HashMap::new(),
        }
    }

    /// Creates a store holding a copy of the data in `data`
    pub fn from_read_only(data: &dyn ReadOnlyPayBack) -> Result<Self, StoreError> {
        let mut pay_back = Self::new();
        pay_back.reset_data(data)?;

        Ok(pay_back)
    }

    /// Replaces the contents of this store with a copy of `data`
    ///
    /// The data is validated first; on failure the store keeps its contents.
    pub fn reset_data(&mut self, data: &dyn ReadOnlyPayBack) -> Result<(), StoreError> {
        let mut replacement = Self::new();
        for person in data.persons() {
            replacement.add_person(person.clone())?;
        }
        for transaction in data.transactions() {
            replacement.add_transaction(transaction.clone())?;
        }
        debug!(
            "resetting store to {} persons and {} transactions",
            replacement.persons.len(),
            replacement.transactions.len(),
        );
        *self = replacement;

        Ok(())
    }

    /// Whether a person with the same name, phone and email exists
    pub fn has_person(&self, person: &Person) -> bool {
        self.persons.iter().any(|p| p.is_duplicate_of(person))
    }

    /// All other persons sharing name, phone and email with `person`
    ///
    /// The entry with the same id as `person` itself is never included.
    pub fn get_duplicate_persons(&self, person: &Person) -> Vec<&Person> {
        self.persons
            .iter()
            .filter(|p| p.id() != person.id() && p.is_duplicate_of(person))
            .collect()
    }

    /// Whether a person with the given id exists
    pub fn has_person_id(&self, id: PersonId) -> bool {
        self.person(id).is_some()
    }

    /// The person with the given id
    pub fn person(&self, id: PersonId) -> Option<&Person> {
        self.persons.iter().find(|p| p.id() == id)
    }

    /// Appends a person to the store
    ///
    /// Fails if the id is already taken.
    pub fn add_person(&mut self, person: Person) -> Result<(), StoreError> {
        if self.has_person_id(person.id()) {
            return Err(StoreError::InvalidArgument(format!(
                "a person with id {} already exists",
                person.id(),
            )));
        }

        let id = person.id();
        let last = self.last_ids.entry(id.year()).or_insert(0);
        *last = (*last).max(id.sequence());
        self.persons.push(person);

        Ok(())
    }

    /// Replaces the person with id `target` by `edited`, keeping its position
    ///
    /// Fails if `target` is unknown, or if `edited` carries the id of another
    /// stored person.
    pub fn set_person(&mut self, target: PersonId, edited: Person) -> Result<(), StoreError> {
        let position = self.persons
            .iter()
            .position(|p| p.id() == target)
            .ok_or(StoreError::PersonNotFound(target))?;
        if edited.id() != target && self.has_person_id(edited.id()) {
            return Err(StoreError::InvalidArgument(format!(
                "a person with id {} already exists",
                edited.id(),
            )));
        }

        let id = edited.id();
        let last = self.last_ids.entry(id.year()).or_insert(0);
        *last = (*last).max(id.sequence());
        if id != target {
            for transaction in self.transactions.iter_mut().filter(|t| t.person() == target) {
                *transaction = transaction.reassigned(id);
            }
        }
        self.persons[position] = edited;

        Ok(())
    }

    /// Removes the person with the given id together with its transactions
    pub fn remove_person(&mut self, id: PersonId) -> Result<Person, StoreError> {
        let position = self.persons
            .iter()
            .position(|p| p.id() == id)
            .ok_or(StoreError::PersonNotFound(id))?;
        self.transactions.retain(|t| t.person() != id);

        Ok(self.persons.remove(position))
    }

    /// The highest sequence number issued for `year` in this session
    ///
    /// Returns `0` if no person joined in that year yet. The value never
    /// decreases, not even when persons are removed.
    pub fn get_last_id_on_year(&self, year: YearJoined) -> u16 {
        self.last_ids.get(&year).copied().unwrap_or(0)
    }

    /// Whether an equal transaction exists
    pub fn has_transaction(&self, transaction: &Transaction) -> bool {
        self.transactions.contains(transaction)
    }

    /// Appends a transaction to the store
    ///
    /// Fails if the referenced person is not in the store.
    pub fn add_transaction(&mut self, transaction: Transaction) -> Result<(), StoreError> {
        if !self.has_person_id(transaction.person()) {
            return Err(StoreError::InvalidArgument(format!(
                "the transaction references the unknown person {}",
                transaction.person(),
            )));
        }
        self.transactions.push(transaction);

        Ok(())
    }

    /// Removes the first transaction equal to `transaction`
    pub fn remove_transaction(&mut self, transaction: &Transaction) -> Result<Transaction, StoreError> {
        let position = self.transactions
            .iter()
            .position(|t| t == transaction)
            .ok_or(StoreError::TransactionNotFound)?;

        Ok(self.transactions.remove(position))
    }

    /// Removes all persons and transactions
    ///
    /// The issued ids stay reserved for the rest of the session.
    pub fn clear(&mut self) {
        self.persons.clear();
        self.transactions.clear();
    }
}

impl ReadOnlyPayBack for PayBack {
    fn persons(&self) -> &[Person] {
        &self.persons
    }

    fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }
}

impl PartialEq for PayBack {
    fn eq(&self, other: &Self) -> bool {
        self.persons == other.persons && self.transactions == other.transactions
    }
}

impl Eq for PayBack {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::person::tests::person;

    fn alice() -> Person {
        person("20230001", "Alice Pauline", "94351253", "alice@example.com")
    }

    fn benson() -> Person {
        person("20230002", "Benson Meier", "98765432", "johnd@example.com")
    }

    fn carl() -> Person {
        person("20220001", "Carl Kurz", "95352563", "heinz@example.com")
    }

    fn transaction(person: &Person, amount: &str) -> Transaction {
        Transaction::builder(person.id(), amount.parse().unwrap())
            .description("Dinner".parse().unwrap())
            .build()
    }

    fn year(year: &str) -> YearJoined {
        year.parse().unwrap()
    }

    #[test]
    fn new_store_is_empty() {
        let pay_back = PayBack::new();
        assert!(pay_back.persons().is_empty());
        assert!(pay_back.transactions().is_empty());
        assert_eq!(pay_back.get_last_id_on_year(year("2023")), 0);
    }

    #[test]
    fn has_person() {
        let mut pay_back = PayBack::new();
        assert!(!pay_back.has_person(&alice()));

        pay_back.add_person(alice()).unwrap();
        assert!(pay_back.has_person(&alice()));

        // same business key under a different id
        let copy = person("20230003", "Alice Pauline", "94351253", "alice@example.com");
        assert!(pay_back.has_person(&copy));
        assert!(!pay_back.has_person(&benson()));
    }

    #[test]
    fn duplicate_persons_exclude_same_id() {
        let mut pay_back = PayBack::new();
        pay_back.add_person(alice()).unwrap();
        pay_back.add_person(benson()).unwrap();
        let copy = person("20230003", "Alice Pauline", "94351253", "alice@example.com");
        pay_back.add_person(copy.clone()).unwrap();

        assert_eq!(pay_back.get_duplicate_persons(&alice()), vec![&copy]);
        assert_eq!(pay_back.get_duplicate_persons(&copy), vec![&alice()]);
        assert!(pay_back.get_duplicate_persons(&benson()).is_empty());

        let new = person("20230004", "Alice Pauline", "94351253", "alice@example.com");
        assert_eq!(pay_back.get_duplicate_persons(&new).len(), 2);
    }

    #[test]
    fn duplicate_id_is_rejected() {
        let mut pay_back = PayBack::new();
        pay_back.add_person(alice()).unwrap();
        let clash = person("20230001", "Someone Else", "91234567", "else@example.com");

        assert!(matches!(pay_back.add_person(clash), Err(StoreError::InvalidArgument(_))));
        assert_eq!(pay_back.persons(), &[alice()]);
    }

    #[test]
    fn last_id_on_year_is_monotonic() {
        let mut pay_back = PayBack::new();
        pay_back.add_person(alice()).unwrap();
        assert_eq!(pay_back.get_last_id_on_year(year("2023")), 1);

        pay_back.add_person(benson()).unwrap();
        assert_eq!(pay_back.get_last_id_on_year(year("2023")), 2);

        // other years are unaffected
        pay_back.add_person(carl()).unwrap();
        assert_eq!(pay_back.get_last_id_on_year(year("2023")), 2);
        assert_eq!(pay_back.get_last_id_on_year(year("2022")), 1);

        // ids are never reused after deletion
        pay_back.remove_person(benson().id()).unwrap();
        assert_eq!(pay_back.get_last_id_on_year(year("2023")), 2);
        pay_back.clear();
        assert_eq!(pay_back.get_last_id_on_year(year("2023")), 2);
    }

    #[test]
    fn set_person_keeps_position() {
        let mut pay_back = PayBack::new();
        pay_back.add_person(alice()).unwrap();
        pay_back.add_person(benson()).unwrap();

        let edited = person("20230001", "Alicia", "94351253", "alice@example.com");
        pay_back.set_person(alice().id(), edited.clone()).unwrap();
        assert_eq!(pay_back.persons(), &[edited, benson()]);
    }

    #[test]
    fn set_person_failures() {
        let mut pay_back = PayBack::new();
        pay_back.add_person(alice()).unwrap();
        pay_back.add_person(benson()).unwrap();

        assert_eq!(
            pay_back.set_person(carl().id(), carl()),
            Err(StoreError::PersonNotFound(carl().id())),
        );
        assert!(matches!(
            pay_back.set_person(alice().id(), benson()),
            Err(StoreError::InvalidArgument(_)),
        ));
        assert_eq!(pay_back.persons(), &[alice(), benson()]);
    }

    #[test]
    fn set_person_moves_transactions_to_new_id() {
        let mut pay_back = PayBack::new();
        pay_back.add_person(alice()).unwrap();
        pay_back.add_person(benson()).unwrap();
        pay_back.add_transaction(transaction(&alice(), "10")).unwrap();
        pay_back.add_transaction(transaction(&benson(), "20")).unwrap();

        let moved = person("20230005", "Alice Pauline", "94351253", "alice@example.com");
        pay_back.set_person(alice().id(), moved.clone()).unwrap();

        assert_eq!(pay_back.persons(), &[moved.clone(), benson()]);
        let owners = pay_back.transactions()
            .iter()
            .map(|t| (t.person(), t.amount().to_string()))
            .collect::<Vec<_>>();
        assert_eq!(owners, vec![(moved.id(), "10".to_owned()), (benson().id(), "20".to_owned())]);
        assert!(!pay_back.has_person_id(alice().id()));
        assert_eq!(pay_back.get_last_id_on_year(year("2023")), 5);
    }

    #[test]
    fn remove_person_removes_transactions() {
        let mut pay_back = PayBack::new();
        pay_back.add_person(alice()).unwrap();
        pay_back.add_person(benson()).unwrap();
        pay_back.add_transaction(transaction(&alice(), "10")).unwrap();
        pay_back.add_transaction(transaction(&benson(), "20")).unwrap();

        assert_eq!(pay_back.remove_person(alice().id()), Ok(alice()));
        assert_eq!(pay_back.transactions(), &[transaction(&benson(), "20")]);
        assert_eq!(
            pay_back.remove_person(alice().id()),
            Err(StoreError::PersonNotFound(alice().id())),
        );
    }

    #[test]
    fn transactions() {
        let mut pay_back = PayBack::new();
        pay_back.add_person(alice()).unwrap();
        let lunch = transaction(&alice(), "12.5");

        assert!(!pay_back.has_transaction(&lunch));
        pay_back.add_transaction(lunch.clone()).unwrap();
        assert!(pay_back.has_transaction(&lunch));
        assert_eq!(pay_back.remove_transaction(&lunch), Ok(lunch.clone()));
        assert!(!pay_back.has_transaction(&lunch));
    }

    #[test]
    fn transaction_for_unknown_person_is_rejected() {
        let mut pay_back = PayBack::new();
        let result = pay_back.add_transaction(transaction(&alice(), "12.5"));

        assert!(matches!(result, Err(StoreError::InvalidArgument(_))));
        assert!(pay_back.transactions().is_empty());
    }

    #[test]
    fn removing_unknown_transaction_leaves_store_unchanged() {
        let mut pay_back = PayBack::new();
        pay_back.add_person(alice()).unwrap();
        pay_back.add_transaction(transaction(&alice(), "10")).unwrap();
        let before = pay_back.clone();

        assert_eq!(
            pay_back.remove_transaction(&transaction(&alice(), "11")),
            Err(StoreError::TransactionNotFound),
        );
        assert_eq!(pay_back, before);
    }

    #[test]
    fn reset_data_validates_before_replacing() {
        struct Snapshot(Vec<Person>, Vec<Transaction>);

        impl ReadOnlyPayBack for Snapshot {
            fn persons(&self) -> &[Person] {
                &self.0
            }

            fn transactions(&self) -> &[Transaction] {
                &self.1
            }
        }

        let mut pay_back = PayBack::new();
        pay_back.add_person(carl()).unwrap();

        let invalid = Snapshot(vec![alice(), alice()], vec![]);
        assert!(pay_back.reset_data(&invalid).is_err());
        assert_eq!(pay_back.persons(), &[carl()]);

        let valid = Snapshot(vec![alice(), benson()], vec![transaction(&benson(), "5")]);
        pay_back.reset_data(&valid).unwrap();
        assert_eq!(pay_back.persons(), &[alice(), benson()]);
        assert_eq!(pay_back.transactions().len(), 1);
        assert_eq!(pay_back.get_last_id_on_year(year("2023")), 2);
        assert_eq!(PayBack::from_read_only(&valid).unwrap(), pay_back);
    }
}
