use log::{info, warn};

use crate::command::{CommandError, CommandResult};
use crate::model::{ModelManager, Session};
use crate::parser::{parse_command, ParseError};
use crate::storage::{Storage, StorageError};

/// Possible errors to occur while handling one line of user input
#[derive(Debug, thiserror::Error)]
pub enum LogicError {
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error(transparent)]
    Command(#[from] CommandError),
    #[error("Could not save data to file: {0}")]
    Storage(#[from] StorageError),
}

/// Drives parsing, execution and persistence of user commands
///
/// Commands are handled one at a time; each one runs to completion before the
/// next is accepted.
#[derive(Debug)]
pub struct Logic<S> {
    model: ModelManager,
    session: Session,
    storage: S,
}

impl<S: Storage> Logic<S> {
    pub fn new(model: ModelManager, storage: S) -> Self {
        Self {
            model,
            session: Session::new(),
            storage,
        }
    }

    /// Parses and executes `input`, saving the store if the command changed it
    pub fn execute(&mut self, input: &str) -> Result<CommandResult, LogicError> {
        info!("user command: {}", input.trim());
        let command = parse_command(input).map_err(|err| {
            warn!("could not parse `{}`: {}", input.trim(), err);
            err
        })?;

        let mutating = command.is_mutating();
        let result = command.execute(&mut self.model, &mut self.session)?;
        if mutating {
            self.storage.save_pay_back(self.model.pay_back())?;
        }

        Ok(result)
    }

    pub fn model(&self) -> &ModelManager {
        &self.model
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }
}
