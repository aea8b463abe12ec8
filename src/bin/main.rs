use std::io::{BufRead, Write};
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use log::{info, warn};

use payback::{export_transactions, JsonStorage, Logic, ModelManager, PayBack, Storage, View};

/// A command line tracker for contacts and the money owed between you and them
#[derive(Debug, Parser)]
#[clap(version)]
struct Args {
    /// The path to the user preferences file
    #[clap(long, default_value = "preferences.json")]
    prefs: PathBuf,
    /// The path to the data file, overriding the one in the preferences
    #[clap(long)]
    data: Option<PathBuf>,
    #[clap(subcommand)]
    action: Option<Action>,
}

#[derive(Debug, Subcommand)]
enum Action {
    /// Writes all transactions as CSV to stdout
    Export,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let (storage, prefs) = JsonStorage::open(args.prefs, args.data)?;

    let pay_back = match storage.read_pay_back() {
        Ok(Some(pay_back)) => pay_back,
        Ok(None) => {
            info!("data file not found, starting with an empty PayBack");
            PayBack::new()
        }
        Err(err) => {
            warn!("{}, starting with an empty PayBack", err);
            // the next save replaces the unreadable file
            storage.back_up_pay_back_file()?;
            PayBack::new()
        }
    };
    let model = ModelManager::new(&pay_back, &prefs)?;

    if let Some(Action::Export) = args.action {
        export_transactions(model.pay_back(), std::io::stdout())?;
        return Ok(());
    }

    let mut logic = Logic::new(model, storage);
    let stdin = std::io::stdin();
    let mut stdout = std::io::stdout();
    let mut lines = stdin.lock().lines();

    loop {
        write!(stdout, "> ")?;
        stdout.flush()?;
        let line = match lines.next() {
            Some(line) => line?,
            None => break,
        };

        match logic.execute(&line) {
            Ok(result) => {
                writeln!(stdout, "{}", result.feedback)?;
                match result.view {
                    Some(View::Persons) => {
                        for (i, person) in logic.model().filtered_person_list().iter().enumerate() {
                            writeln!(stdout, "{}. {}", i + 1, person)?;
                        }
                    }
                    Some(View::Transactions) => {
                        for (i, transaction) in logic.model().filtered_transaction_list().iter().enumerate() {
                            writeln!(stdout, "{}. {}", i + 1, transaction)?;
                        }
                    }
                    None => {}
                }
                if result.exit {
                    break;
                }
            }
            // failed commands are reported and the session goes on
            Err(err) => writeln!(stdout, "{}", err)?,
        }
    }

    logic.storage().save_user_prefs(logic.model().user_prefs())?;

    Ok(())
}
