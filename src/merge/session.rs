//! Merge sessions and per-conflict resolution.

use super::options::{MergeOptions, Strategy};
use crate::apply::{apply, can_apply, ApplyMode, SkippedOp};
use crate::conflict::{Conflict, ConflictRule, Conflicts, Detection, Detector};
use crate::diff::diff;
use crate::error::{Error, Result};
use crate::patch::PatchSet;
use crate::value::Value;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, warn};

/// ConflictId identifies a conflict within its session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConflictId(pub usize);

impl fmt::Display for ConflictId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Choice is how a conflict gets settled.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Choice {
    /// Apply the left side's operations.
    TakeA,
    /// Apply the right side's operations.
    TakeB,
    /// Leave the target as it is.
    Skip,
    /// Apply a caller-supplied patch set instead.
    Custom(PatchSet),
}

/// ConflictState tracks a conflict from detection to being applied.
#[derive(Debug, Clone, PartialEq)]
pub enum ConflictState {
    Unresolved,
    Resolved(Choice),
    Applied(Choice),
}

impl ConflictState {
    pub fn is_applied(&self) -> bool {
        matches!(self, ConflictState::Applied(_))
    }
}

impl fmt::Display for ConflictState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConflictState::Unresolved => f.write_str("unresolved"),
            ConflictState::Resolved(_) => f.write_str("resolved"),
            ConflictState::Applied(_) => f.write_str("applied"),
        }
    }
}

/// MergeSessionBuilder is a builder for creating a MergeSession.
#[derive(Debug, Default)]
pub struct MergeSessionBuilder {
    options: MergeOptions,
}

impl MergeSessionBuilder {
    /// Creates a new MergeSessionBuilder.
    pub fn new() -> Self {
        MergeSessionBuilder::default()
    }

    /// Sets the conflict rule.
    pub fn rule(mut self, rule: ConflictRule) -> Self {
        self.options.rule = rule;
        self
    }

    /// Sets the strategy used by [`MergeSession::auto_resolve`].
    pub fn strategy(mut self, strategy: Strategy) -> Self {
        self.options.strategy = Some(strategy);
        self
    }

    /// Replaces all options at once.
    pub fn options(mut self, options: MergeOptions) -> Self {
        self.options = options;
        self
    }

    /// Builds the session for the given documents.
    pub fn build(self, ancestor: Value, left: Value, right: Value) -> MergeSession {
        MergeSession::with_options(self.options, ancestor, left, right)
    }
}

/// MergeSession is an in-progress three-way merge.
///
/// Both sides are diffed against the ancestor, colliding edits are set aside as
/// conflicts, and everything else is applied up front to form the target. Each
/// conflict then moves `Unresolved → Resolved(choice) → Applied(choice)`.
///
/// The session owns its target; every mutation goes through `&mut self`, so a
/// host sharing a session across threads wraps it in a single lock.
#[derive(Debug, Clone)]
pub struct MergeSession {
    options: MergeOptions,
    ancestor: Value,
    left: Value,
    right: Value,
    left_patches: PatchSet,
    right_patches: PatchSet,
    detection: Detection,
    auto_skipped: Vec<SkippedOp>,
    states: Vec<ConflictState>,
    target: Value,
}

impl MergeSession {
    /// Creates a session with default options.
    pub fn new(ancestor: Value, left: Value, right: Value) -> Self {
        MergeSession::with_options(MergeOptions::default(), ancestor, left, right)
    }

    /// Creates a new MergeSessionBuilder.
    pub fn builder() -> MergeSessionBuilder {
        MergeSessionBuilder::new()
    }

    /// Creates a session with the given options.
    pub fn with_options(options: MergeOptions, ancestor: Value, left: Value, right: Value) -> Self {
        let left_patches = diff(&ancestor, &left);
        let right_patches = diff(&ancestor, &right);
        let detection = Detector::new(options.rule).detect(&left_patches, &right_patches);

        let (target, auto_skipped) = match apply(&ancestor, &detection.non_conflicting, ApplyMode::BestEffort) {
            Ok(applied) => (applied.value, applied.skipped),
            Err(err) => (ancestor.clone(), vec![err]),
        };

        debug!(
            left = left_patches.len(),
            right = right_patches.len(),
            auto = detection.non_conflicting.len(),
            skipped = auto_skipped.len(),
            conflicts = detection.conflicts.len(),
            "started merge session"
        );

        let states = vec![ConflictState::Unresolved; detection.conflicts.len()];
        MergeSession {
            options,
            ancestor,
            left,
            right,
            left_patches,
            right_patches,
            detection,
            auto_skipped,
            states,
            target,
        }
    }

    /// Discards all progress and starts over with new documents.
    pub fn reset(&mut self, ancestor: Value, left: Value, right: Value) {
        *self = MergeSession::with_options(self.options.clone(), ancestor, left, right);
    }

    pub fn options(&self) -> &MergeOptions {
        &self.options
    }

    pub fn ancestor(&self) -> &Value {
        &self.ancestor
    }

    pub fn left(&self) -> &Value {
        &self.left
    }

    pub fn right(&self) -> &Value {
        &self.right
    }

    /// Edits that turn the ancestor into the left document.
    pub fn left_patches(&self) -> &PatchSet {
        &self.left_patches
    }

    /// Edits that turn the ancestor into the right document.
    pub fn right_patches(&self) -> &PatchSet {
        &self.right_patches
    }

    /// Edits applied automatically when the session was created.
    pub fn non_conflicting(&self) -> &PatchSet {
        &self.detection.non_conflicting
    }

    /// Automatic edits that did not apply cleanly to the ancestor.
    pub fn auto_skipped(&self) -> &[SkippedOp] {
        &self.auto_skipped
    }

    pub fn conflicts(&self) -> &Conflicts {
        &self.detection.conflicts
    }

    pub fn conflict(&self, id: ConflictId) -> Result<&Conflict> {
        self.detection.conflicts.get(id.0).ok_or(Error::UnknownConflict(id))
    }

    /// Returns the ids of all conflicts, in detection order.
    pub fn ids(&self) -> impl Iterator<Item = ConflictId> {
        (0..self.states.len()).map(ConflictId)
    }

    pub fn state(&self, id: ConflictId) -> Result<&ConflictState> {
        self.states.get(id.0).ok_or(Error::UnknownConflict(id))
    }

    /// Returns the conflicts that are not applied yet.
    pub fn pending(&self) -> Vec<ConflictId> {
        self.ids().filter(|id| !self.states[id.0].is_applied()).collect()
    }

    /// Returns true once every conflict is applied.
    pub fn is_fully_resolved(&self) -> bool {
        self.states.iter().all(ConflictState::is_applied)
    }

    /// The merge result so far.
    pub fn target(&self) -> &Value {
        &self.target
    }

    pub fn into_target(self) -> Value {
        self.target
    }

    /// Returns the patch set a choice stands for on the given conflict.
    pub fn chosen_patches(&self, id: ConflictId, choice: &Choice) -> Result<PatchSet> {
        let conflict = self.conflict(id)?;
        Ok(match choice {
            Choice::TakeA => conflict.ops_a.clone(),
            Choice::TakeB => conflict.ops_b.clone(),
            Choice::Skip => PatchSet::new(),
            Choice::Custom(patches) => patches.clone(),
        })
    }

    /// Reports whether committing `choice` for `id` would apply every operation to
    /// the current target. Nothing is modified.
    pub fn can_take(&self, id: ConflictId, choice: &Choice) -> Result<bool> {
        let patches = self.chosen_patches(id, choice)?;
        Ok(can_apply(&self.target, &patches))
    }

    /// Reports whether [`commit`](Self::commit) would succeed right now.
    pub fn can_commit(&self, id: ConflictId) -> Result<bool> {
        match self.state(id)? {
            ConflictState::Resolved(choice) => self.can_take(id, choice),
            _ => Ok(false),
        }
    }

    /// Records a choice for a conflict without touching the target.
    ///
    /// A dismissed conflict may be resolved again; one whose edits were applied may not.
    pub fn resolve(&mut self, id: ConflictId, choice: Choice) -> Result<()> {
        let state = self.state(id)?;
        match state {
            ConflictState::Unresolved | ConflictState::Resolved(_) | ConflictState::Applied(Choice::Skip) => {}
            ConflictState::Applied(_) => {
                return Err(Error::InvalidState {
                    id,
                    state: state.clone(),
                    action: "resolve",
                })
            }
        }
        debug!(%id, ?choice, "resolved conflict");
        self.states[id.0] = ConflictState::Resolved(choice);
        Ok(())
    }

    /// Applies the chosen edits of a resolved conflict to the target.
    ///
    /// The edits are applied best-effort, since the target may already differ from
    /// the ancestor they were computed against. If any of them cannot be applied the
    /// target is left untouched, the conflict stays resolved, and the skipped
    /// operations are returned in [`Error::CommitFailed`].
    pub fn commit(&mut self, id: ConflictId) -> Result<()> {
        let choice = match self.state(id)? {
            ConflictState::Resolved(choice) => choice.clone(),
            other => {
                return Err(Error::InvalidState {
                    id,
                    state: other.clone(),
                    action: "commit",
                })
            }
        };
        let patches = self.chosen_patches(id, &choice)?;
        let applied = apply(&self.target, &patches, ApplyMode::BestEffort)?;
        if !applied.is_complete() {
            warn!(%id, skipped = applied.skipped.len(), "commit left operations unapplied");
            return Err(Error::CommitFailed {
                id,
                skipped: applied.skipped,
            });
        }
        debug!(%id, ops = patches.len(), "committed conflict");
        self.target = applied.value;
        self.states[id.0] = ConflictState::Applied(choice);
        Ok(())
    }

    /// Settles a conflict by leaving the target as it is.
    pub fn dismiss(&mut self, id: ConflictId) -> Result<()> {
        self.resolve(id, Choice::Skip)?;
        self.commit(id)
    }

    /// Resolves and commits every pending conflict with `strategy`.
    ///
    /// Conflicts already resolved keep their choice. Stops at the first failure.
    pub fn resolve_all(&mut self, strategy: Strategy) -> Result<()> {
        for id in self.pending() {
            if matches!(self.states[id.0], ConflictState::Unresolved) {
                self.resolve(id, strategy.choice())?;
            }
            self.commit(id)?;
        }
        Ok(())
    }

    /// Runs [`resolve_all`](Self::resolve_all) with the configured strategy, if any.
    pub fn auto_resolve(&mut self) -> Result<()> {
        match self.options.strategy {
            Some(strategy) => self.resolve_all(strategy),
            None => Ok(()),
        }
    }
}

/// MergeResult is the outcome of a one-shot merge.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MergeResult {
    /// The ancestor with every non-conflicting edit applied.
    pub result: Value,
    pub conflicts: Conflicts,
}

/// Merges `left` and `right` against `ancestor`, applying only non-conflicting edits.
pub fn three_way_merge(ancestor: &Value, left: &Value, right: &Value) -> MergeResult {
    let session = MergeSession::new(ancestor.clone(), left.clone(), right.clone());
    MergeResult {
        conflicts: session.conflicts().clone(),
        result: session.into_target(),
    }
}
