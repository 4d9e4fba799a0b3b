//! CLI argument definitions using clap

use std::ffi::OsString;
use std::path::PathBuf;

use clap::{
    ArgAction, ArgMatches, Args, CommandFactory, FromArgMatches, Parser, Subcommand, ValueHint,
};

use crate::application::services::Toggle;
use crate::domain::Selection;

/// Browse a directory tree and keep a tri-state selection consistent across every level
#[derive(Parser, Debug)]
#[command(name = "seltree")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Debug output: -d info, -dd debug, -ddd trace
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub debug: u8,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show the directory as a tri-state tree
    Tree {
        #[command(flatten)]
        selection: SelectionArgs,
    },

    /// Print the paths of all selected files
    Selected {
        #[command(flatten)]
        selection: SelectionArgs,
    },

    /// Print the flattened entry sequence
    Flat {
        /// Directory to browse (default: configured root_dir, then cwd)
        #[arg(value_hint = ValueHint::DirPath)]
        dir: Option<PathBuf>,
    },

    /// Manage settings
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Generate shell completions
    Completion {
        /// Shell type
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

/// Directory plus the toggles to apply.
#[derive(Args, Debug, Clone, Default)]
pub struct SelectionArgs {
    /// Directory to browse (default: configured root_dir, then cwd)
    #[arg(value_hint = ValueHint::DirPath)]
    pub dir: Option<PathBuf>,

    /// Check a path relative to the directory (repeatable)
    #[arg(short, long, value_name = "PATH")]
    pub check: Vec<String>,

    /// Uncheck a path relative to the directory (repeatable)
    #[arg(short, long, value_name = "PATH")]
    pub uncheck: Vec<String>,

    /// `check` and `uncheck` interleaved as typed; filled by [`Cli::parse_ordered`]
    #[arg(skip)]
    pub typed: Vec<Toggle>,
}

impl SelectionArgs {
    /// Toggles in command-line order. Without recorded positions, checks come first.
    pub fn toggles(&self) -> Vec<Toggle> {
        if !self.typed.is_empty() {
            return self.typed.clone();
        }
        self.check
            .iter()
            .map(Toggle::check)
            .chain(self.uncheck.iter().map(Toggle::uncheck))
            .collect()
    }
}

/// Merge `--check` and `--uncheck` values by their position on the command line.
fn typed_toggles(matches: &ArgMatches) -> Vec<Toggle> {
    let mut positioned: Vec<(usize, Toggle)> = Vec::new();
    for (id, selection) in [("check", Selection::Checked), ("uncheck", Selection::Unchecked)] {
        if let (Some(values), Some(indices)) =
            (matches.get_many::<String>(id), matches.indices_of(id))
        {
            positioned.extend(indices.zip(values).map(|(pos, path)| {
                (
                    pos,
                    Toggle {
                        path: path.clone(),
                        selection,
                    },
                )
            }));
        }
    }
    positioned.sort_by_key(|(pos, _)| *pos);
    positioned.into_iter().map(|(_, toggle)| toggle).collect()
}

impl Cli {
    /// Like [`Parser::parse`], but keeps the typed order of `--check`/`--uncheck`.
    pub fn parse_ordered() -> Self {
        let matches = Self::command().get_matches();
        match Self::from_arg_matches(&matches) {
            Ok(cli) => cli.with_typed_order(&matches),
            Err(e) => e.exit(),
        }
    }

    /// Like [`Parser::try_parse_from`], but keeps the typed order of toggles.
    pub fn try_parse_ordered_from<I, T>(args: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        let matches = Self::command().try_get_matches_from(args)?;
        Ok(Self::from_arg_matches(&matches)?.with_typed_order(&matches))
    }

    fn with_typed_order(mut self, matches: &ArgMatches) -> Self {
        if let (
            Some(Commands::Tree { selection } | Commands::Selected { selection }),
            Some((_, sub)),
        ) = (self.command.as_mut(), matches.subcommand())
        {
            selection.typed = typed_toggles(sub);
        }
        self
    }
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show the effective configuration
    Show {
        /// Directory whose local config applies
        #[arg(value_hint = ValueHint::DirPath)]
        dir: Option<PathBuf>,
    },
    /// Show config file locations
    Path,
    /// Print a template config file
    Template,
}
