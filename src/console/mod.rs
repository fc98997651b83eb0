//! Line-oriented command shell over a [`FileStorage`].
//!
//! Each line names a command followed by positional arguments:
//!
//! ```text
//! create <Type>
//! show <Type> <id>
//! destroy <Type> <id>
//! all [Type]
//! update <Type> <id> <attribute> <value>
//! count <Type>
//! help [command]
//! quit
//! ```
//!
//! Lookup problems (missing or unknown type, unknown id, missing attribute
//! or value) are reported on the output as `** ... **` messages and the
//! session continues. Storage failures end the session with an error.

mod tokenize;

pub use tokenize::{tokenize, TokenizeError};

use std::io::{self, BufRead, Write};

use thiserror::Error;

use hbnb_core::models::{composite_key, ModelKind};
use hbnb_core::storage::FileStorage;
use hbnb_core::{ModelError, StorageError};

pub const PROMPT: &str = "(hbnb) ";

pub const CLASS_NAME_MISSING: &str = "** class name missing **";
pub const CLASS_DOESNT_EXIST: &str = "** class doesn't exist **";
pub const INSTANCE_ID_MISSING: &str = "** instance id missing **";
pub const NO_INSTANCE_FOUND: &str = "** no instance found **";
pub const ATTRIBUTE_NAME_MISSING: &str = "** attribute name missing **";
pub const VALUE_MISSING: &str = "** value missing **";
pub const ATTRIBUTE_READ_ONLY: &str = "** attribute can't be updated **";

const COMMANDS: &[(&str, &str)] = &[
    ("create", "create <Type>: create an instance, save it and print its id"),
    ("show", "show <Type> <id>: print an instance"),
    ("destroy", "destroy <Type> <id>: delete an instance and save"),
    ("all", "all [Type]: print all instances, optionally of one type"),
    (
        "update",
        "update <Type> <id> <attribute> <value>: set a string attribute and save",
    ),
    ("count", "count <Type>: print the number of instances of a type"),
    ("help", "help [command]: list commands or describe one"),
    ("quit", "quit: exit the shell (end of input works too)"),
];

#[derive(Debug, Error)]
pub enum ConsoleError {
    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error("console I/O failed: {0}")]
    Io(#[from] io::Error),
}

/// Whether the session continues after a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

pub struct Console<'a, W: Write> {
    storage: &'a mut FileStorage,
    out: W,
    prompt: bool,
}

impl<'a, W: Write> Console<'a, W> {
    pub fn new(storage: &'a mut FileStorage, out: W) -> Self {
        Self {
            storage,
            out,
            prompt: false,
        }
    }

    /// Print [`PROMPT`] before reading each line.
    pub fn with_prompt(mut self, prompt: bool) -> Self {
        self.prompt = prompt;
        self
    }

    /// Executes lines from `input` until `quit` or end of input.
    pub fn run<R: BufRead>(&mut self, input: R) -> Result<(), ConsoleError> {
        let mut lines = input.split(b'\n');
        loop {
            if self.prompt {
                write!(self.out, "{PROMPT}")?;
                self.out.flush()?;
            }

            let Some(line) = lines.next() else {
                if self.prompt {
                    writeln!(self.out)?;
                }
                return Ok(());
            };

            let mut bytes = line?;
            if bytes.last() == Some(&b'\r') {
                bytes.pop();
            }
            let Ok(line) = String::from_utf8(bytes) else {
                writeln!(self.out, "*** Invalid UTF-8 in input line")?;
                continue;
            };

            if self.execute(&line)? == Flow::Quit {
                return Ok(());
            }
        }
    }

    /// Executes a single command line.
    pub fn execute(&mut self, line: &str) -> Result<Flow, ConsoleError> {
        let args = match tokenize(line) {
            Ok(args) => args,
            Err(err) => {
                writeln!(self.out, "*** {err}: {line}")?;
                return Ok(Flow::Continue);
            }
        };
        let Some((command, rest)) = args.split_first() else {
            return Ok(Flow::Continue);
        };

        tracing::debug!(command = %command, args = rest.len(), "executing command");
        match command.as_str() {
            "quit" | "EOF" => return Ok(Flow::Quit),
            "create" => self.do_create(rest)?,
            "show" => self.do_show(rest)?,
            "destroy" => self.do_destroy(rest)?,
            "all" => self.do_all(rest)?,
            "update" => self.do_update(rest)?,
            "count" => self.do_count(rest)?,
            "help" => self.do_help(rest)?,
            _ => writeln!(self.out, "*** Unknown syntax: {line}")?,
        }
        Ok(Flow::Continue)
    }

    fn do_create(&mut self, args: &[String]) -> Result<(), ConsoleError> {
        let Some(kind) = self.require_kind(args)? else {
            return Ok(());
        };

        let key = self.storage.create(kind);
        self.storage.save()?;
        if let Some(record) = self.storage.get(&key) {
            writeln!(self.out, "{}", record.id())?;
        }
        Ok(())
    }

    fn do_show(&mut self, args: &[String]) -> Result<(), ConsoleError> {
        let Some(key) = self.require_instance(args)? else {
            return Ok(());
        };

        if let Some(record) = self.storage.get(&key) {
            writeln!(self.out, "{record}")?;
        }
        Ok(())
    }

    fn do_destroy(&mut self, args: &[String]) -> Result<(), ConsoleError> {
        let Some(key) = self.require_instance(args)? else {
            return Ok(());
        };

        self.storage.delete(&key);
        self.storage.save()?;
        Ok(())
    }

    fn do_all(&mut self, args: &[String]) -> Result<(), ConsoleError> {
        match args.first() {
            Some(name) => {
                let Some(kind) = ModelKind::from_str(name) else {
                    writeln!(self.out, "{CLASS_DOESNT_EXIST}")?;
                    return Ok(());
                };
                for (_, record) in self.storage.all_of(kind) {
                    writeln!(self.out, "{record}")?;
                }
            }
            None => {
                for record in self.storage.all().values() {
                    writeln!(self.out, "{record}")?;
                }
            }
        }
        Ok(())
    }

    fn do_update(&mut self, args: &[String]) -> Result<(), ConsoleError> {
        let Some(key) = self.require_instance(args)? else {
            return Ok(());
        };
        let Some(name) = args.get(2) else {
            writeln!(self.out, "{ATTRIBUTE_NAME_MISSING}")?;
            return Ok(());
        };
        let Some(value) = args.get(3) else {
            writeln!(self.out, "{VALUE_MISSING}")?;
            return Ok(());
        };

        let Some(record) = self.storage.get_mut(&key) else {
            writeln!(self.out, "{NO_INSTANCE_FOUND}")?;
            return Ok(());
        };
        match record.set_attribute(name, value.as_str()) {
            Ok(()) => self.storage.touch(&key)?,
            Err(ModelError::ReadOnlyAttribute(_)) => writeln!(self.out, "{ATTRIBUTE_READ_ONLY}")?,
            Err(err) => writeln!(self.out, "*** {err}")?,
        }
        Ok(())
    }

    fn do_count(&mut self, args: &[String]) -> Result<(), ConsoleError> {
        let Some(kind) = self.require_kind(args)? else {
            return Ok(());
        };

        writeln!(self.out, "{}", self.storage.count(Some(kind)))?;
        Ok(())
    }

    fn do_help(&mut self, args: &[String]) -> Result<(), ConsoleError> {
        match args.first() {
            Some(topic) => match COMMANDS.iter().find(|(name, _)| name == topic) {
                Some((_, usage)) => writeln!(self.out, "{usage}")?,
                None => writeln!(self.out, "*** No help on {topic}")?,
            },
            None => {
                writeln!(self.out, "Documented commands:")?;
                for (name, _) in COMMANDS {
                    writeln!(self.out, "  {name}")?;
                }
            }
        }
        Ok(())
    }

    /// Resolves `args[0]` to a type, printing the sentinel when it can't.
    fn require_kind(&mut self, args: &[String]) -> Result<Option<ModelKind>, ConsoleError> {
        let Some(name) = args.first() else {
            writeln!(self.out, "{CLASS_NAME_MISSING}")?;
            return Ok(None);
        };
        let Some(kind) = ModelKind::from_str(name) else {
            writeln!(self.out, "{CLASS_DOESNT_EXIST}")?;
            return Ok(None);
        };
        Ok(Some(kind))
    }

    /// Resolves `args[0..2]` to the key of a live instance.
    fn require_instance(&mut self, args: &[String]) -> Result<Option<String>, ConsoleError> {
        let Some(kind) = self.require_kind(args)? else {
            return Ok(None);
        };
        let Some(id) = args.get(1) else {
            writeln!(self.out, "{INSTANCE_ID_MISSING}")?;
            return Ok(None);
        };

        let key = composite_key(kind, id);
        if !self.storage.contains(&key) {
            writeln!(self.out, "{NO_INSTANCE_FOUND}")?;
            return Ok(None);
        }
        Ok(Some(key))
    }
}
