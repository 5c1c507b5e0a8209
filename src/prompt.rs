//! Terminal selection prompt

use dialoguer::Select;
use dialoguer::theme::ColorfulTheme;

use crate::version::entry::MappedEntry;
use crate::version::error::PromptError;
use crate::version::resolver::SelectionPrompt;

/// Asks the user to pick a candidate on the terminal
///
/// Known negative hits are not offered.
#[derive(Debug, Clone, Copy, Default)]
pub struct TerminalPrompt;

/// Canonical version strings of the candidates that can be picked
fn selectable(candidates: &[MappedEntry]) -> Vec<String> {
    candidates
        .iter()
        .filter(|entry| !entry.is_disabled())
        .map(|entry| entry.version().to_string())
        .collect()
}

#[async_trait::async_trait]
impl SelectionPrompt for TerminalPrompt {
    async fn select(
        &self,
        candidates: &[MappedEntry],
        hint: &str,
    ) -> Result<Option<String>, PromptError> {
        let items = selectable(candidates);
        if items.is_empty() {
            return Ok(None);
        }

        let hint = hint.to_string();
        tokio::task::spawn_blocking(move || {
            let chosen = Select::with_theme(&ColorfulTheme::default())
                .with_prompt(hint)
                .items(&items)
                .default(0)
                .interact_opt()
                .map_err(|e| PromptError::Terminal(e.to_string()))?;
            Ok(chosen.map(|index| items[index].clone()))
        })
        .await
        .map_err(|e| PromptError::Task(e.to_string()))?
    }
}
