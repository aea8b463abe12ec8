use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use log::{debug, info};

use crate::{
    Amount, PayBack, Person, PersonId, ReadOnlyPayBack, ReadOnlyUserPrefs, StoreError,
    Transaction, UserPrefs, TIMESTAMP_FORMAT,
};

/// Possible errors to occur while reading or writing files
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("Could not access {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("The file {} is not valid JSON data: {source}", .path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("The data in {} is inconsistent: {source}", .path.display())]
    IllegalValues {
        path: PathBuf,
        #[source]
        source: StoreError,
    },
    #[error(transparent)]
    Csv(#[from] csv::Error),
}

/// Persistence of the store and the user preferences
pub trait Storage {
    /// Reads the store, or `None` if there is no data file yet
    fn read_pay_back(&self) -> Result<Option<PayBack>, StorageError>;

    fn save_pay_back(&self, pay_back: &dyn ReadOnlyPayBack) -> Result<(), StorageError>;

    /// Reads the preferences, or `None` if there is no preferences file yet
    fn read_user_prefs(&self) -> Result<Option<UserPrefs>, StorageError>;

    fn save_user_prefs(&self, user_prefs: &dyn ReadOnlyUserPrefs) -> Result<(), StorageError>;
}

/// Stores everything as pretty printed JSON files
#[derive(Clone, Debug)]
pub struct JsonStorage {
    user_prefs_path: PathBuf,
    pay_back_path: PathBuf,
}

impl JsonStorage {
    /// Creates a storage reading the preferences from `user_prefs_path`
    ///
    /// The data file defaults to the one of [`UserPrefs::default`].
    pub fn new(user_prefs_path: PathBuf) -> Self {
        Self {
            user_prefs_path,
            pay_back_path: UserPrefs::default().pay_back_file_path().to_path_buf(),
        }
    }

    /// Creates a storage and reads the preferences from `user_prefs_path`
    ///
    /// The data file is `data_file` if given, otherwise the one named in the
    /// preferences. The returned preferences are the ones read from disk, so
    /// saving them back does not persist `data_file`.
    pub fn open(user_prefs_path: PathBuf, data_file: Option<PathBuf>) -> Result<(Self, UserPrefs), StorageError> {
        let mut storage = Self::new(user_prefs_path);
        let user_prefs = storage.read_user_prefs()?.unwrap_or_default();
        let pay_back_path = data_file.unwrap_or_else(|| user_prefs.pay_back_file_path().to_path_buf());
        storage.set_pay_back_file_path(pay_back_path);

        Ok((storage, user_prefs))
    }

    pub fn pay_back_file_path(&self) -> &Path {
        &self.pay_back_path
    }

    pub fn set_pay_back_file_path(&mut self, path: PathBuf) {
        self.pay_back_path = path;
    }

    /// Copies the data file next to itself with a `.bak` extension appended
    ///
    /// Used before an unreadable data file gets overwritten.
    pub fn back_up_pay_back_file(&self) -> Result<PathBuf, StorageError> {
        let mut backup = self.pay_back_path.clone().into_os_string();
        backup.push(".bak");
        let backup = PathBuf::from(backup);
        fs::copy(&self.pay_back_path, &backup)
            .map_err(|source| StorageError::Io { path: self.pay_back_path.clone(), source })?;
        info!("backed up {} to {}", self.pay_back_path.display(), backup.display());

        Ok(backup)
    }
}

impl Storage for JsonStorage {
    fn read_pay_back(&self) -> Result<Option<PayBack>, StorageError> {
        let snapshot = match read_json::<Snapshot>(&self.pay_back_path)? {
            Some(snapshot) => snapshot,
            None => return Ok(None),
        };
        let pay_back = PayBack::from_read_only(&snapshot)
            .map_err(|source| StorageError::IllegalValues {
                path: self.pay_back_path.clone(),
                source,
            })?;
        info!(
            "loaded {} persons and {} transactions from {}",
            pay_back.persons().len(),
            pay_back.transactions().len(),
            self.pay_back_path.display(),
        );

        Ok(Some(pay_back))
    }

    fn save_pay_back(&self, pay_back: &dyn ReadOnlyPayBack) -> Result<(), StorageError> {
        let snapshot = SnapshotRef {
            persons: pay_back.persons(),
            transactions: pay_back.transactions(),
        };
        write_json(&self.pay_back_path, &snapshot)
    }

    fn read_user_prefs(&self) -> Result<Option<UserPrefs>, StorageError> {
        read_json(&self.user_prefs_path)
    }

    fn save_user_prefs(&self, user_prefs: &dyn ReadOnlyUserPrefs) -> Result<(), StorageError> {
        write_json(&self.user_prefs_path, &UserPrefs::from_read_only(user_prefs))
    }
}

/// The on-disk layout of the store
#[derive(Debug, serde::Deserialize)]
struct Snapshot {
    #[serde(default)]
    persons: Vec<Person>,
    #[serde(default)]
    transactions: Vec<Transaction>,
}

impl ReadOnlyPayBack for Snapshot {
    fn persons(&self) -> &[Person] {
        &self.persons
    }

    fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }
}

#[derive(serde::Serialize)]
struct SnapshotRef<'a> {
    persons: &'a [Person],
    transactions: &'a [Transaction],
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<Option<T>, StorageError> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            debug!("{} does not exist yet", path.display());
            return Ok(None);
        }
        Err(source) => return Err(StorageError::Io { path: path.to_path_buf(), source }),
    };

    serde_json::from_str(&content)
        .map(Some)
        .map_err(|source| StorageError::Json { path: path.to_path_buf(), source })
}

fn write_json<T: serde::Serialize>(path: &Path, value: &T) -> Result<(), StorageError> {
    let io_error = |source| StorageError::Io { path: path.to_path_buf(), source };
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(io_error)?;
    }
    let content = serde_json::to_string_pretty(value)
        .map_err(|source| StorageError::Json { path: path.to_path_buf(), source })?;
    fs::write(path, content).map_err(io_error)?;
    debug!("wrote {}", path.display());

    Ok(())
}

#[derive(serde::Serialize)]
struct ExportRow<'a> {
    person: PersonId,
    name: &'a str,
    amount: Amount,
    description: &'a str,
    timestamp: String,
}

/// Writes every transaction as one CSV row, including the person's name
pub fn export_transactions<W: io::Write>(pay_back: &dyn ReadOnlyPayBack, writer: W) -> Result<(), StorageError> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(true)
        .from_writer(writer);

    for transaction in pay_back.transactions() {
        let name = pay_back.persons()
            .iter()
            .find(|p| p.id() == transaction.person())
            .map_or("", |p| p.name().as_str());
        writer.serialize(ExportRow {
            person: transaction.person(),
            name,
            amount: transaction.amount(),
            description: transaction.description().as_str(),
            timestamp: transaction.timestamp().format(TIMESTAMP_FORMAT).to_string(),
        })?;
    }
    writer.flush().map_err(csv::Error::from)?;

    Ok(())
}
