//! Selection service: builds trees from a source and applies user toggles.

use std::path::Path;

use generational_arena::Index;
use tracing::{debug, info, instrument};

use crate::application::preselect::Preselection;
use crate::application::{ApplicationError, ApplicationResult};
use crate::config::Settings;
use crate::domain::{
    assemble, DomainResult, FlatEntry, HierarchySource, Selection, SelectionObserver,
    SelectionTree, StateChange, TreeBuilder, TriState,
};
use crate::infrastructure::DirectorySource;

/// Observer that reports every change to the tracing sink.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingObserver;

impl SelectionObserver for TracingObserver {
    fn on_state_changed(&mut self, node: Index, caption: &str, state: TriState) {
        debug!(?node, caption, %state, "state changed");
    }

    fn on_caption_changed(&mut self, node: Index, caption: &str) {
        debug!(?node, caption, "caption changed");
    }
}

/// One toggle requested by the user, addressed by tree path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toggle {
    pub path: String,
    pub selection: Selection,
}

impl Toggle {
    pub fn check(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            selection: Selection::Checked,
        }
    }

    pub fn uncheck(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            selection: Selection::Unchecked,
        }
    }
}

/// Coordinates flattening, assembly and toggling for one configuration.
pub struct SelectionService {
    settings: Settings,
    preselection: Preselection,
}

impl SelectionService {
    pub fn new(settings: Settings) -> Self {
        let preselection = Preselection::from(&settings.preselect);
        Self {
            settings,
            preselection,
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Filesystem source configured from the settings.
    pub fn directory_source(&self) -> DirectorySource {
        DirectorySource::new(self.settings.follow_links, self.settings.include_hidden)
    }

    /// Flat entry sequence for `root`; all or nothing.
    #[instrument(level = "debug", skip(self, source))]
    pub fn flatten<S>(&self, source: &S, root: S::Node) -> ApplicationResult<Vec<FlatEntry>>
    where
        S: HierarchySource,
    {
        let entries = TreeBuilder::flatten(source, root).collect::<DomainResult<Vec<_>>>()?;
        Ok(entries)
    }

    /// Walks `root` and assembles the preselected tree.
    #[instrument(level = "debug", skip(self, source))]
    pub fn build<S>(&self, source: &S, root: S::Node) -> ApplicationResult<SelectionTree>
    where
        S: HierarchySource,
    {
        let entries = self.flatten(source, root)?;
        let tree = assemble(entries, |name| self.preselection.is_preselected(name))?;
        info!(
            nodes = tree.len(),
            selected = tree.selected_leaves().len(),
            "tree built"
        );
        Ok(tree)
    }

    /// [`SelectionService::build`] over a directory on disk.
    pub fn build_directory(&self, dir: &Path) -> ApplicationResult<SelectionTree> {
        self.build(&self.directory_source(), dir.to_path_buf())
    }

    /// Applies toggles in order, notifying `observer` for each changed node.
    #[instrument(level = "debug", skip(self, tree, observer))]
    pub fn apply_toggles<O>(
        &self,
        tree: &mut SelectionTree,
        toggles: &[Toggle],
        observer: &mut O,
    ) -> ApplicationResult<Vec<StateChange>>
    where
        O: SelectionObserver + ?Sized,
    {
        let mut all_changes = Vec::new();
        for toggle in toggles {
            let idx = tree
                .find(&toggle.path)
                .ok_or_else(|| ApplicationError::NodeNotFound(toggle.path.clone()))?;
            let changes = tree.apply(idx, toggle.selection, observer)?;
            debug!(path = %toggle.path, changed = changes.len(), "toggle applied");
            all_changes.extend(changes);
        }
        Ok(all_changes)
    }
}
