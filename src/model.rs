use std::fmt;
use std::path::{Path, PathBuf};

use log::{debug, info};

use crate::{
    GuiSettings, PayBack, Person, PersonId, ReadOnlyPayBack, ReadOnlyUserPrefs, StoreError,
    Transaction, UserPrefs, YearJoined,
};

/// A filter over the entities of a list view
pub type Predicate<T> = Box<dyn Fn(&T) -> bool>;

/// A predicate accepting everything
pub fn show_all<T: 'static>() -> Predicate<T> {
    Box::new(|_: &T| true)
}

/// Conversational state carried from one command to the next
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Session {
    last_mentioned_person: Option<PersonId>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// The person the previous commands referred to, if any
    pub fn last_mentioned_person(&self) -> Option<PersonId> {
        self.last_mentioned_person
    }

    pub fn set_last_mentioned_person(&mut self, person: PersonId) {
        self.last_mentioned_person = Some(person);
    }

    /// Forgets `person` if it is the last mentioned one
    pub fn forget(&mut self, person: PersonId) {
        if self.last_mentioned_person == Some(person) {
            self.last_mentioned_person = None;
        }
    }

    pub fn clear(&mut self) {
        self.last_mentioned_person = None;
    }
}

/// The in-memory model of the application
///
/// The model owns the [`PayBack`] store and the [`UserPrefs`], and keeps one
/// filter for each of the two list views. The views are evaluated whenever
/// they are requested, so they always reflect the current store contents.
pub struct ModelManager {
    pay_back: PayBack,
    user_prefs: UserPrefs,
    person_filter: Predicate<Person>,
    transaction_filter: Predicate<Transaction>,
}

impl ModelManager {
    /// Creates a model holding copies of `pay_back` and `user_prefs`
    pub fn new(
        pay_back: &dyn ReadOnlyPayBack,
        user_prefs: &dyn ReadOnlyUserPrefs,
    ) -> Result<Self, StoreError> {
        debug!(
            "initializing model with {} persons, {} transactions and data file {}",
            pay_back.persons().len(),
            pay_back.transactions().len(),
            user_prefs.pay_back_file_path().display(),
        );

        Ok(Self {
            pay_back: PayBack::from_read_only(pay_back)?,
            user_prefs: UserPrefs::from_read_only(user_prefs),
            person_filter: show_all(),
            transaction_filter: show_all(),
        })
    }

    // user prefs

    pub fn user_prefs(&self) -> &UserPrefs {
        &self.user_prefs
    }

    pub fn set_user_prefs(&mut self, user_prefs: &dyn ReadOnlyUserPrefs) {
        self.user_prefs.reset_data(user_prefs);
    }

    pub fn gui_settings(&self) -> &GuiSettings {
        self.user_prefs.gui_settings()
    }

    pub fn set_gui_settings(&mut self, gui_settings: GuiSettings) {
        self.user_prefs.set_gui_settings(gui_settings);
    }

    pub fn pay_back_file_path(&self) -> &Path {
        self.user_prefs.pay_back_file_path()
    }

    pub fn set_pay_back_file_path(&mut self, path: PathBuf) {
        self.user_prefs.set_pay_back_file_path(path);
    }

    // store

    /// Replaces the store contents by a copy of `pay_back`
    pub fn set_pay_back(&mut self, pay_back: &dyn ReadOnlyPayBack) -> Result<(), StoreError> {
        self.pay_back.reset_data(pay_back)
    }

    pub fn pay_back(&self) -> &PayBack {
        &self.pay_back
    }

    /// Removes every person and transaction
    pub fn clear(&mut self) {
        info!("clearing all persons and transactions");
        self.pay_back.clear();
    }

    // persons

    pub fn has_person(&self, person: &Person) -> bool {
        self.pay_back.has_person(person)
    }

    pub fn get_duplicate_persons(&self, person: &Person) -> Vec<&Person> {
        self.pay_back.get_duplicate_persons(person)
    }

    pub fn has_person_id(&self, id: PersonId) -> bool {
        self.pay_back.has_person_id(id)
    }

    pub fn person(&self, id: PersonId) -> Option<&Person> {
        self.pay_back.person(id)
    }

    /// Removes a person and its transactions
    pub fn delete_person(&mut self, id: PersonId) -> Result<Person, StoreError> {
        let person = self.pay_back.remove_person(id)?;
        info!("deleted person {}", id);

        Ok(person)
    }

    /// Adds a person and resets the person view to show everyone
    pub fn add_person(&mut self, person: Person) -> Result<(), StoreError> {
        let id = person.id();
        self.pay_back.add_person(person)?;
        self.update_filtered_person_list(show_all());
        info!("added person {}", id);

        Ok(())
    }

    pub fn set_person(&mut self, target: PersonId, edited: Person) -> Result<(), StoreError> {
        self.pay_back.set_person(target, edited)?;
        info!("edited person {}", target);

        Ok(())
    }

    pub fn get_last_id_on_year(&self, year: YearJoined) -> u16 {
        self.pay_back.get_last_id_on_year(year)
    }

    /// The persons accepted by the current person filter
    pub fn filtered_person_list(&self) -> Vec<&Person> {
        self.pay_back
            .persons()
            .iter()
            .filter(|p| (self.person_filter)(*p))
            .collect()
    }

    pub fn update_filtered_person_list(&mut self, predicate: Predicate<Person>) {
        self.person_filter = predicate;
    }

    // transactions

    pub fn has_transaction(&self, transaction: &Transaction) -> bool {
        self.pay_back.has_transaction(transaction)
    }

    pub fn add_transaction(&mut self, transaction: Transaction) -> Result<(), StoreError> {
        let person = transaction.person();
        self.pay_back.add_transaction(transaction)?;
        info!("added transaction for person {}", person);

        Ok(())
    }

    pub fn delete_transaction(&mut self, transaction: &Transaction) -> Result<Transaction, StoreError> {
        let transaction = self.pay_back.remove_transaction(transaction)?;
        info!("deleted transaction for person {}", transaction.person());

        Ok(transaction)
    }

    /// The transactions accepted by the current transaction filter
    pub fn filtered_transaction_list(&self) -> Vec<&Transaction> {
        self.pay_back
            .transactions()
            .iter()
            .filter(|t| (self.transaction_filter)(*t))
            .collect()
    }

    pub fn update_filtered_transaction_list(&mut self, predicate: Predicate<Transaction>) {
        self.transaction_filter = predicate;
    }
}

impl Default for ModelManager {
    fn default() -> Self {
        Self {
            pay_back: PayBack::new(),
            user_prefs: UserPrefs::default(),
            person_filter: show_all(),
            transaction_filter: show_all(),
        }
    }
}

impl fmt::Debug for ModelManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModelManager")
            .field("pay_back", &self.pay_back)
            .field("user_prefs", &self.user_prefs)
            .finish_non_exhaustive()
    }
}

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

    fn transaction(person: &Person) -> Transaction {
        Transaction::builder(person.id(), "12".parse().unwrap()).build()
    }

    #[test]
    fn default_model() {
        let model = ModelManager::default();
        assert_eq!(model.user_prefs(), &UserPrefs::default());
        assert_eq!(model.gui_settings(), &GuiSettings::default());
        assert_eq!(model.pay_back(), &PayBack::new());
    }

    #[test]
    fn user_prefs_are_copied() {
        let mut prefs = UserPrefs::default();
        prefs.set_pay_back_file_path(PathBuf::from("address/book/file/path"));
        let mut model = ModelManager::default();
        model.set_user_prefs(&prefs);
        assert_eq!(model.user_prefs(), &prefs);

        prefs.set_pay_back_file_path(PathBuf::from("new/address/book/file/path"));
        assert_eq!(model.pay_back_file_path(), Path::new("address/book/file/path"));
    }

    #[test]
    fn gui_settings_and_path() {
        let mut model = ModelManager::default();
        let settings = GuiSettings {
            window_width: 1,
            window_height: 2,
            window_x: Some(3),
            window_y: Some(4),
        };
        model.set_gui_settings(settings.clone());
        model.set_pay_back_file_path(PathBuf::from("some/path.json"));

        assert_eq!(model.gui_settings(), &settings);
        assert_eq!(model.pay_back_file_path(), Path::new("some/path.json"));
    }

    #[test]
    fn persons() {
        let mut model = ModelManager::default();
        assert!(!model.has_person(&alice()));

        model.add_person(alice()).unwrap();
        assert!(model.has_person(&alice()));
        assert!(model.has_person_id(alice().id()));
        assert_eq!(model.get_last_id_on_year(alice().year_joined()), 1);

        assert_eq!(model.delete_person(alice().id()), Ok(alice()));
        assert!(!model.has_person(&alice()));
    }

    #[test]
    fn filtered_person_list_is_live() {
        let mut model = ModelManager::default();
        model.add_person(alice()).unwrap();
        model.update_filtered_person_list(Box::new(|p: &Person| {
            p.name().contains_word_ignore_case("benson")
        }));
        assert!(model.filtered_person_list().is_empty());

        // set_person does not reset the filter
        let renamed = person("20230001", "Benson Pauline", "94351253", "alice@example.com");
        model.set_person(alice().id(), renamed.clone()).unwrap();
        assert_eq!(model.filtered_person_list(), vec![&renamed]);
    }

    #[test]
    fn adding_a_person_shows_everyone() {
        let mut model = ModelManager::default();
        model.add_person(alice()).unwrap();
        model.update_filtered_person_list(Box::new(|_: &Person| false));
        model.add_person(benson()).unwrap();

        assert_eq!(model.filtered_person_list(), vec![&alice(), &benson()]);
    }

    #[test]
    fn transactions() {
        let mut model = ModelManager::default();
        model.add_person(alice()).unwrap();
        let lunch = transaction(&alice());
        assert!(!model.has_transaction(&lunch));

        model.add_transaction(lunch.clone()).unwrap();
        assert!(model.has_transaction(&lunch));
        assert_eq!(model.filtered_transaction_list(), model.pay_back().transactions().iter().collect::<Vec<_>>());

        model.delete_transaction(&lunch).unwrap();
        assert_eq!(model.pay_back(), &{
            let mut expected = PayBack::new();
            expected.add_person(alice()).unwrap();
            expected
        });
        assert_eq!(model.delete_transaction(&lunch), Err(StoreError::TransactionNotFound));
    }

    #[test]
    fn filtered_transaction_list() {
        let mut model = ModelManager::default();
        model.add_person(alice()).unwrap();
        model.add_person(benson()).unwrap();
        let benson_id = benson().id();
        model.update_filtered_transaction_list(Box::new(move |t: &Transaction| t.person() == benson_id));

        model.add_transaction(transaction(&alice())).unwrap();
        assert!(model.filtered_transaction_list().is_empty());
        model.add_transaction(transaction(&benson())).unwrap();
        assert_eq!(model.filtered_transaction_list(), vec![&transaction(&benson())]);
    }

    #[test]
    fn new_copies_the_store() {
        let mut pay_back = PayBack::new();
        pay_back.add_person(alice()).unwrap();
        let mut model = ModelManager::new(&pay_back, &UserPrefs::default()).unwrap();
        model.add_person(benson()).unwrap();

        assert_eq!(pay_back.persons().len(), 1);
        assert_eq!(model.pay_back().persons().len(), 2);

        model.set_pay_back(&pay_back).unwrap();
        assert_eq!(model.pay_back(), &pay_back);
    }

    #[test]
    fn session_forgets_deleted_person() {
        let mut session = Session::new();
        session.set_last_mentioned_person(alice().id());
        session.forget(benson().id());
        assert_eq!(session.last_mentioned_person(), Some(alice().id()));
        session.forget(alice().id());
        assert_eq!(session.last_mentioned_person(), None);
    }
}
