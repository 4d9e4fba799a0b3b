//! Command dispatch

use std::io;
use std::path::{Path, PathBuf};

use clap::CommandFactory;
use clap_complete::generate;
use tracing::{debug, instrument};

use crate::application::services::{SelectionService, TracingObserver};
use crate::cli::args::{Cli, Commands, ConfigCommands, SelectionArgs};
use crate::cli::output;
use crate::cli::{CliError, CliResult};
use crate::config::{global_config_path, local_config_path, Settings};
use crate::domain::SelectionTree;
use crate::tree_traits::TreeNodeConvert;

pub fn execute_command(cli: &Cli) -> CliResult<()> {
    match &cli.command {
        Some(Commands::Tree { selection }) => _tree(selection),
        Some(Commands::Selected { selection }) => _selected(selection),
        Some(Commands::Flat { dir }) => _flat(dir.as_deref()),
        Some(Commands::Config { command }) => _config(command),
        Some(Commands::Completion { shell }) => {
            let mut cmd = Cli::command();
            let name = cmd.get_name().to_string();
            generate(*shell, &mut cmd, name, &mut io::stdout());
            Ok(())
        }
        None => Err(CliError::InvalidArgs(
            "no command given, see --help".to_string(),
        )),
    }
}

/// Explicit directory, else configured `root_dir`, else the current directory.
fn resolve_dir(dir: Option<&Path>) -> CliResult<PathBuf> {
    if let Some(dir) = dir {
        return Ok(dir.to_path_buf());
    }
    match Settings::load(None)?.root_dir {
        Some(root) => Ok(root),
        None => Ok(std::env::current_dir()?),
    }
}

/// Settings with the browsed directory's local config applied.
fn service_for(dir: &Path) -> CliResult<SelectionService> {
    let service = SelectionService::new(Settings::load(Some(dir))?);
    debug!(settings = ?service.settings(), "effective settings");
    Ok(service)
}

fn build_and_toggle(args: &SelectionArgs) -> CliResult<(PathBuf, SelectionTree)> {
    let dir = resolve_dir(args.dir.as_deref())?;
    let service = service_for(&dir)?;
    let mut tree = service.build_directory(&dir)?;
    service.apply_toggles(&mut tree, &args.toggles(), &mut TracingObserver)?;
    Ok((dir, tree))
}

#[instrument]
fn _tree(args: &SelectionArgs) -> CliResult<()> {
    let (_, tree) = build_and_toggle(args)?;
    let rendered = tree.to_tree_string().to_string();
    for line in rendered.lines() {
        output::tree_line(line);
    }
    Ok(())
}

#[instrument]
fn _selected(args: &SelectionArgs) -> CliResult<()> {
    let (dir, tree) = build_and_toggle(args)?;
    for path in tree.selected_leaves() {
        output::info(&dir.join(path).display());
    }
    Ok(())
}

#[instrument]
fn _flat(dir: Option<&Path>) -> CliResult<()> {
    let dir = resolve_dir(dir)?;
    let service = service_for(&dir)?;
    let entries = service.flatten(&service.directory_source(), dir)?;

    output::header("id\tdepth\tindex\tparent\tname");
    for entry in entries {
        let parent = entry
            .parent_id
            .map(|p| p.to_string())
            .unwrap_or_else(|| "-".to_string());
        output::info(&format!(
            "{}\t{}\t{}\t{}\t{}",
            entry.id, entry.depth, entry.parent_index, parent, entry
        ));
    }
    Ok(())
}

#[instrument]
fn _config(command: &ConfigCommands) -> CliResult<()> {
    match command {
        ConfigCommands::Show { dir } => {
            let settings = Settings::load(dir.as_deref())?;
            output::info(&settings.to_toml()?);
        }
        ConfigCommands::Path => {
            output::header("Config files (lowest to highest precedence):");
            match global_config_path() {
                Some(path) => output::detail(&format!("global: {}", path.display())),
                None => output::detail("global: <no config directory on this platform>"),
            }
            output::detail(&format!(
                "local:  {}",
                local_config_path(Path::new("<dir>")).display()
            ));
            output::detail("env:    SELTREE_* (nested keys use __)");
        }
        ConfigCommands::Template => output::info(&Settings::template()),
    }
    Ok(())
}
