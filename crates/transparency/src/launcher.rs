//! Host glue: resolves the target set, drives one session from an event
//! stream, and persists the confirmed value.

use anyhow::{Context, Result};
use settings::ToolSettings;
use tracing::info;

use crate::{
    session::{CommitResult, SessionEvent, SessionState, TransparencySession},
    Target,
};

pub const TOOL_TITLE: &str = "Set Layer Transparency";

/// Source of layer handles, mirroring the host's project tree and its
/// current selection.
pub trait LayerStack {
    type Layer: Target;

    fn all_layers(&self) -> Vec<Self::Layer>;
    fn selected_layers(&self) -> Vec<Self::Layer>;
}

/// Host surface for user-facing outcome messages.
pub trait MessageBar {
    fn warn(&mut self, title: &str, message: &str);
    fn success(&mut self, title: &str, message: &str);
}

/// Durable storage for [`ToolSettings`] between sessions.
pub trait SettingsStore {
    fn load(&self) -> Result<ToolSettings>;
    fn store(&mut self, settings: &ToolSettings) -> Result<()>;
}

#[derive(Debug, Clone, PartialEq)]
pub enum ToolOutcome {
    /// The project has no layers at all; no session was opened.
    NoLayers,
    Cancelled,
    Committed(CommitResult),
}

/// Explicit selection wins; an empty selection targets every layer.
pub fn resolve_targets<S: LayerStack>(stack: &S) -> Vec<S::Layer> {
    let selected = stack.selected_layers();
    if selected.is_empty() {
        stack.all_layers()
    } else {
        selected
    }
}

/// Runs one full tool invocation: load the last-used settings, open a
/// session over the resolved targets, play the surface events, and on
/// confirmation persist the new value and report the summary.
pub fn run_tool<S, P, B>(
    stack: &S,
    store: &mut P,
    bar: &mut B,
    events: impl IntoIterator<Item = SessionEvent>,
) -> Result<ToolOutcome>
where
    S: LayerStack,
    P: SettingsStore,
    B: MessageBar,
{
    let saved = store.load().context("failed to load tool settings")?;

    if stack.all_layers().is_empty() {
        bar.warn(TOOL_TITLE, "No layers found in project.");
        return Ok(ToolOutcome::NoLayers);
    }

    let targets = resolve_targets(stack);
    info!(
        layer_count = targets.len(),
        initial_value = saved.transparency.percent(),
        preview = saved.preview_enabled,
        "opening transparency session"
    );

    let mut session =
        TransparencySession::start(targets, saved.transparency, saved.preview_enabled)?;

    for event in events {
        if let Some(result) = session.apply_event(event)? {
            store
                .store(&ToolSettings {
                    transparency: result.final_value,
                    preview_enabled: result.preview_enabled,
                })
                .context("failed to persist tool settings")?;
            bar.success(TOOL_TITLE, &success_message(&result));
            return Ok(ToolOutcome::Committed(result));
        }

        if session.state() == SessionState::Cancelled {
            return Ok(ToolOutcome::Cancelled);
        }
    }

    // The surface went away without an explicit accept; treat it like a
    // rejected dialog.
    session.cancel()?;
    Ok(ToolOutcome::Cancelled)
}

fn success_message(result: &CommitResult) -> String {
    format!(
        "{} layer(s) set to {}% transparency (opacity {:.2}, preview {}).",
        result.target_count,
        result.final_value.percent(),
        result.applied_opacity,
        if result.preview_enabled { "on" } else { "off" }
    )
}
