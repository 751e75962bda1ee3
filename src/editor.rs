//! Optional `PKGBUILD` editing before a build.

use crate::error::{BuilderError, Result};
use crate::exec::{CommandExecutor, Invocation, StdioMode, run_checked};
use crate::prompt::Confirm;
use camino::Utf8Path;
use tracing::{debug, error};

/// Environment variable selecting the editor.
pub const EDITOR_VAR: &str = "EDITOR";

/// Editor used when `$EDITOR` is unset or empty.
pub const DEFAULT_EDITOR: &str = "vi";

/// File name of the build recipe inside a working copy.
pub const RECIPE_FILE: &str = "PKGBUILD";

/// Question asked before opening the editor.
pub const EDIT_QUESTION: &str = "Would you like to edit the PKGBUILD? [y/N]";

/// Result of offering an edit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditOutcome {
    /// The editor ran and exited successfully.
    Edited,
    /// The user declined, or no answer could be read.
    Skipped,
}

/// Offers to open a working copy's `PKGBUILD` in the user's editor.
pub struct RecipeEditor<'a> {
    executor: &'a dyn CommandExecutor,
    editor: String,
}

impl<'a> RecipeEditor<'a> {
    /// Creates an editor that runs `$EDITOR`, falling back to `vi`.
    #[must_use]
    pub fn from_env(executor: &'a dyn CommandExecutor) -> Self {
        let editor = resolve_editor(std::env::var(EDITOR_VAR).ok().as_deref());
        debug!(subcommand = "build", default_editor = %editor, "Default editor");
        Self::with_editor(executor, editor)
    }

    /// Creates an editor that runs `editor`.
    #[must_use]
    pub fn with_editor(executor: &'a dyn CommandExecutor, editor: impl Into<String>) -> Self {
        Self {
            executor,
            editor: editor.into(),
        }
    }

    /// The editor command that will be run.
    #[must_use]
    pub fn editor(&self) -> &str {
        &self.editor
    }

    /// Asks whether to edit and, if so, runs the editor on the `PKGBUILD`.
    ///
    /// The question defaults to "no". A prompt that cannot be read is logged
    /// and treated as a refusal.
    ///
    /// # Errors
    ///
    /// Returns [`BuilderError::Editor`] when the editor cannot be started or
    /// exits unsuccessfully.
    pub fn maybe_edit(
        &self,
        working_copy: &Utf8Path,
        prompt: &mut dyn Confirm,
    ) -> Result<EditOutcome> {
        let wants_edit = prompt.ask(EDIT_QUESTION, false).unwrap_or_else(|err| {
            error!(subcommand = "build", error = %err, "Error while reading response");
            err.default_answer()
        });

        if !wants_edit {
            return Ok(EditOutcome::Skipped);
        }

        let recipe = working_copy.join(RECIPE_FILE);
        let invocation = Invocation::new(self.editor.as_str())
            .args([recipe.as_str()])
            .stdio(StdioMode::Inherit);

        run_checked(self.executor, &invocation, |message| BuilderError::Editor {
            editor: self.editor.clone(),
            recipe: recipe.clone(),
            message,
        })?;
        Ok(EditOutcome::Edited)
    }
}

/// Picks the editor from an `$EDITOR` value.
///
/// # Examples
///
/// ```
/// use aur_builder::editor::resolve_editor;
///
/// assert_eq!(resolve_editor(Some("nano")), "nano");
/// assert_eq!(resolve_editor(Some("")), "vi");
/// assert_eq!(resolve_editor(None), "vi");
/// ```
#[must_use]
pub fn resolve_editor(value: Option<&str>) -> String {
    value
        .filter(|editor| !editor.is_empty())
        .unwrap_or(DEFAULT_EDITOR)
        .to_owned()
}
