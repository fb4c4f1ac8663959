use std::collections::HashMap;

use shared::domain::{TargetId, TransparencyValue};
use tracing::warn;

use crate::{
    error::{SessionError, TargetError},
    Target,
};

/// Holds the pre-edit opacities for one interaction and applies or reverts
/// the transform against the live targets.
///
/// At any moment each target's opacity is either its captured value or the
/// opacity derived from the most recently applied transparency value.
pub struct PreviewController<T: Target> {
    targets: Vec<T>,
    original: HashMap<TargetId, f64>,
    preview_enabled: bool,
}

impl<T: Target> PreviewController<T> {
    /// Reads every target's opacity before anything is mutated. A target
    /// that cannot be read aborts the whole capture; nothing has been
    /// touched at that point.
    pub fn capture(targets: Vec<T>, preview_enabled: bool) -> Result<Self, SessionError> {
        let mut original = HashMap::with_capacity(targets.len());
        for target in &targets {
            let opacity = target
                .opacity()
                .map_err(|source| SessionError::TargetUnavailable {
                    name: target.name().to_string(),
                    source,
                })?;
            original.insert(target.id(), opacity);
        }

        Ok(Self {
            targets,
            original,
            preview_enabled,
        })
    }

    /// Applies the intermediate value to every target. No-op when live
    /// preview is off.
    pub fn preview(&mut self, value: TransparencyValue) {
        if !self.preview_enabled {
            return;
        }

        broadcast_opacity(&mut self.targets, value.opacity(), "preview");
    }

    /// Restores every target to its captured opacity. No-op when live
    /// preview is off, since nothing was ever changed. Safe to call more
    /// than once.
    pub fn rollback(&mut self) {
        if !self.preview_enabled {
            return;
        }

        for target in &mut self.targets {
            let Some(original) = self.original.get(&target.id()).copied() else {
                continue;
            };
            if let Err(err) = target.set_opacity(original) {
                warn!(
                    id = target.id().0,
                    layer = target.name(),
                    error = %err,
                    "failed to restore layer opacity"
                );
                continue;
            }
            target.trigger_repaint();
        }
    }

    /// Permanently applies the confirmed value, regardless of the preview
    /// flag. Returns the opacity that was broadcast.
    pub fn commit(&mut self, value: TransparencyValue) -> f64 {
        let opacity = value.opacity();
        broadcast_opacity(&mut self.targets, opacity, "commit");
        opacity
    }

    pub fn target_count(&self) -> usize {
        self.targets.len()
    }
}

/// Best-effort broadcast: a target that rejects the change is logged and
/// skipped, the remaining targets are still processed.
fn broadcast_opacity<T: Target>(targets: &mut [T], opacity: f64, operation: &'static str) {
    for target in targets {
        if let Err(err) = target.set_opacity(opacity) {
            warn!(
                id = target.id().0,
                layer = target.name(),
                operation,
                error = %err,
                "failed to set layer opacity"
            );
            continue;
        }
        target.trigger_repaint();
    }
}
