//! Interactive menu.
//!
//! A numbered loop over the core operations that prompts for free-text
//! arguments. Errors are printed and the loop continues; option 6 or end of
//! input exits.

use std::io::{self, BufRead, Write};
use std::path::Path;

use svcs_core::{CommitEngine, RepositoryStore};

use crate::commands::{self, CliError};

const TITLE: &str = "Simple Version Control System (SVCS)";
const OPTIONS: [&str; 6] = [
    "1. Initialize Repository",
    "2. Add File to Repository",
    "3. Commit Changes",
    "4. View Commit Logs",
    "5. Check Repository Status",
    "6. Exit",
];

/// Interactive menu bound to a store, an input and an output stream.
pub struct Menu<'a, R, W> {
    store: &'a RepositoryStore,
    input: R,
    out: W,
}

impl<'a, R: BufRead, W: Write> Menu<'a, R, W> {
    pub fn new(store: &'a RepositoryStore, input: R, out: W) -> Self {
        Self { store, input, out }
    }

    /// Run until the user exits or input ends.
    pub fn run(mut self) -> io::Result<()> {
        loop {
            writeln!(self.out)?;
            writeln!(self.out, "{}", TITLE)?;
            for option in OPTIONS {
                writeln!(self.out, "{}", option)?;
            }

            let Some(choice) = self.prompt("Select an option: ")? else {
                writeln!(self.out)?;
                return Ok(());
            };

            let done = match choice.trim() {
                "1" => self.init()?,
                "2" => self.add()?,
                "3" => self.commit()?,
                "4" => self.log()?,
                "5" => self.status()?,
                "6" => {
                    writeln!(self.out, "Exiting SVCS. Goodbye!")?;
                    return Ok(());
                }
                _ => {
                    writeln!(self.out, "Invalid option. Please try again.")?;
                    false
                }
            };
            if done {
                return Ok(());
            }
        }
    }

    /// Print `label` and read one line. `None` at end of input.
    fn prompt(&mut self, label: &str) -> io::Result<Option<String>> {
        write!(self.out, "{}", label)?;
        self.out.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
    }

    /// Print the lines of a successful operation, or the error message.
    fn report(&mut self, result: commands::Result<Vec<String>>) -> io::Result<()> {
        match result {
            Ok(lines) => {
                for line in lines {
                    writeln!(self.out, "{}", line)?;
                }
            }
            Err(CliError::Svcs(e)) => writeln!(self.out, "{}", e)?,
            Err(e) => writeln!(self.out, "error: {}", e)?,
        }
        Ok(())
    }

    // Each action returns `true` when input ended while prompting.

    fn init(&mut self) -> io::Result<bool> {
        let Some(name) = self.prompt("Enter repository name: ")? else {
            return Ok(true);
        };
        let result = self
            .store
            .initialize(&name)
            .map(|_| vec![commands::init::initialized(&name)])
            .map_err(CliError::from);
        self.report(result)?;
        Ok(false)
    }

    fn add(&mut self) -> io::Result<bool> {
        let Some(name) = self.prompt("Enter repository name: ")? else {
            return Ok(true);
        };
        let Some(path) = self.prompt("Enter file path to add: ")? else {
            return Ok(true);
        };
        let path = Path::new(path.trim());
        let result = commands::add::add_one(self.store, &name, path)
            .map(|_| vec![commands::add::added(path, &name)]);
        self.report(result)?;
        Ok(false)
    }

    fn commit(&mut self) -> io::Result<bool> {
        let Some(name) = self.prompt("Enter repository name: ")? else {
            return Ok(true);
        };
        let Some(message) = self.prompt("Enter commit message: ")? else {
            return Ok(true);
        };
        let result = CommitEngine::new(self.store)
            .commit(&name, &message)
            .map(|info| vec![commands::commit::created(&info)])
            .map_err(CliError::from);
        self.report(result)?;
        Ok(false)
    }

    fn log(&mut self) -> io::Result<bool> {
        let Some(name) = self.prompt("Enter repository name: ")? else {
            return Ok(true);
        };
        let result = CommitEngine::new(self.store)
            .log(&name)
            .map(|commits| commands::log::render(&name, &commits))
            .map_err(CliError::from);
        self.report(result)?;
        Ok(false)
    }

    fn status(&mut self) -> io::Result<bool> {
        let Some(name) = self.prompt("Enter repository name: ")? else {
            return Ok(true);
        };
        let result = CommitEngine::new(self.store)
            .status(&name)
            .map(|files| commands::status::render(&name, &files))
            .map_err(CliError::from);
        self.report(result)?;
        Ok(false)
    }
}
