//! In-memory doubles for driving the batch engine in unit tests.

use std::cell::{Cell, RefCell};
use std::collections::{HashMap, VecDeque};
use std::rc::Rc;

use super::report::{BatchEvent, BatchReporter};
use super::state::AppliedVia;
use super::strategy::{
    Conflict, ManualChoice, OperatorPrompt, Resolution, ResolutionStrategy, StrategyKind,
};
use crate::core::types::Commit;
use crate::git::{CherryPickResult, GitBackend, GitError};

#[derive(Debug, Clone)]
struct FakeObject {
    message: String,
    conflicts: bool,
}

#[derive(Debug, Default)]
struct FakeState {
    next_id: u64,
    /// Target branch, oldest first
    history: Vec<(String, String)>,
    /// Objects present locally
    objects: HashMap<String, FakeObject>,
    /// (remote, branch) -> commits that a fetch brings in
    remote_branches: HashMap<(String, String), Vec<(String, FakeObject)>>,
    /// Fetched remote-tracking refs, `remote/branch` -> (hash, message)
    fetched: HashMap<String, Vec<(String, String)>>,
    in_progress: Option<String>,
    fail_next_continue: bool,
    merge_tool_fails: bool,
    fetch_fails: bool,
    staged_all: bool,
    merge_tool_runs: usize,
    picks: Vec<String>,
    fetches: Vec<(String, String)>,
    resets: Vec<String>,
}

impl FakeState {
    fn new_hash(&mut self) -> String {
        self.next_id += 1;
        format!("{:040x}", self.next_id)
    }

    fn commit_on_target(&mut self, message: &str) -> String {
        let hash = self.new_hash();
        self.history.push((hash.clone(), message.to_string()));
        hash
    }
}

/// A scripted repository: a linear target branch plus known objects
#[derive(Debug)]
pub struct FakeGit {
    state: RefCell<FakeState>,
}

impl FakeGit {
    /// A repository whose target branch holds one "initial" commit
    pub fn new() -> Self {
        let git = Self {
            state: RefCell::new(FakeState::default()),
        };
        git.state.borrow_mut().commit_on_target("initial");
        git
    }

    /// Commit directly on the target branch
    pub fn add_target_commit(&self, message: &str) -> String {
        self.state.borrow_mut().commit_on_target(message)
    }

    /// A commit available locally that may be picked
    pub fn add_source_commit(&self, message: &str, conflicts: bool) -> Commit {
        let mut state = self.state.borrow_mut();
        let hash = state.new_hash();
        state.objects.insert(
            hash.clone(),
            FakeObject {
                message: message.to_string(),
                conflicts,
            },
        );
        Commit::new(hash, message)
    }

    /// A commit whose object is not present locally
    pub fn add_missing_commit(&self, message: &str) -> Commit {
        let hash = self.state.borrow_mut().new_hash();
        Commit::new(hash, message)
    }

    /// A commit that appears once `remote/branch` is fetched
    pub fn add_remote_commit(
        &self,
        remote: &str,
        branch: &str,
        message: &str,
        conflicts: bool,
    ) -> String {
        let mut state = self.state.borrow_mut();
        let hash = state.new_hash();
        state
            .remote_branches
            .entry((remote.to_string(), branch.to_string()))
            .or_default()
            .push((
                hash.clone(),
                FakeObject {
                    message: message.to_string(),
                    conflicts,
                },
            ));
        hash
    }

    pub fn fail_next_continue(&self) {
        self.state.borrow_mut().fail_next_continue = true;
    }

    pub fn fail_merge_tool(&self) {
        self.state.borrow_mut().merge_tool_fails = true;
    }

    pub fn fail_fetch(&self) {
        self.state.borrow_mut().fetch_fails = true;
    }

    pub fn staged_all(&self) -> bool {
        self.state.borrow().staged_all
    }

    pub fn merge_tool_runs(&self) -> usize {
        self.state.borrow().merge_tool_runs
    }

    /// Hashes passed to `cherry_pick`, in order
    pub fn picks(&self) -> Vec<String> {
        self.state.borrow().picks.clone()
    }

    pub fn fetches(&self) -> Vec<(String, String)> {
        self.state.borrow().fetches.clone()
    }

    pub fn resets(&self) -> Vec<String> {
        self.state.borrow().resets.clone()
    }

    /// Messages on the target branch, oldest first
    pub fn target_messages(&self) -> Vec<String> {
        self.state
            .borrow()
            .history
            .iter()
            .map(|(_, m)| m.clone())
            .collect()
    }
}

impl GitBackend for FakeGit {
    fn head(&self) -> Result<String, GitError> {
        self.state
            .borrow()
            .history
            .last()
            .map(|(h, _)| h.clone())
            .ok_or_else(|| GitError::Reference("HEAD has no target".to_string()))
    }

    fn find_commit_by_message(
        &self,
        rev: Option<&str>,
        message: &str,
    ) -> Result<Option<String>, GitError> {
        if message.is_empty() {
            return Ok(None);
        }
        let state = self.state.borrow();
        let commits = match rev {
            None => &state.history,
            Some(rev) => state
                .fetched
                .get(rev)
                .ok_or_else(|| GitError::Reference(format!("unknown revision {}", rev)))?,
        };
        Ok(commits
            .iter()
            .rev()
            .find(|(_, m)| m.contains(message))
            .map(|(h, _)| h.clone()))
    }

    fn cherry_pick(&self, sha: &str) -> CherryPickResult {
        let mut state = self.state.borrow_mut();
        state.picks.push(sha.to_string());
        if state.in_progress.is_some() {
            return CherryPickResult::Failed(
                "error: cherry-pick is already in progress".to_string(),
            );
        }
        let object = match state.objects.get(sha) {
            Some(o) => o.clone(),
            None => return CherryPickResult::Failed(format!("fatal: bad object {}", sha)),
        };
        if object.conflicts {
            state.in_progress = Some(sha.to_string());
            return CherryPickResult::Failed(format!(
                "error: could not apply {}... {}\nCONFLICT (content): Merge conflict in shared.txt",
                &sha[..7],
                object.message
            ));
        }
        CherryPickResult::Applied(state.commit_on_target(&object.message))
    }

    fn stage_all(&self) -> Result<(), GitError> {
        self.state.borrow_mut().staged_all = true;
        Ok(())
    }

    fn cherry_pick_continue(&self) -> Result<(), GitError> {
        let mut state = self.state.borrow_mut();
        let sha = state
            .in_progress
            .clone()
            .ok_or_else(|| GitError::OperationFailed("no cherry-pick in progress".to_string()))?;
        if state.fail_next_continue {
            state.fail_next_continue = false;
            return Err(GitError::OperationFailed(
                "you must edit all merge conflicts".to_string(),
            ));
        }
        let message = state
            .objects
            .get(&sha)
            .map(|o| o.message.clone())
            .unwrap_or_default();
        state.commit_on_target(&message);
        state.in_progress = None;
        Ok(())
    }

    fn cherry_pick_skip(&self) -> Result<(), GitError> {
        self.cherry_pick_abort()
    }

    fn cherry_pick_abort(&self) -> Result<(), GitError> {
        let mut state = self.state.borrow_mut();
        if state.in_progress.take().is_none() {
            return Err(GitError::OperationFailed(
                "no cherry-pick in progress".to_string(),
            ));
        }
        Ok(())
    }

    fn cherry_pick_in_progress(&self) -> bool {
        self.state.borrow().in_progress.is_some()
    }

    fn fetch_branch(&self, remote: &str, branch: &str) -> Result<(), GitError> {
        let mut state = self.state.borrow_mut();
        state.fetches.push((remote.to_string(), branch.to_string()));
        if state.fetch_fails {
            return Err(GitError::OperationFailed(
                "couldn't find remote ref".to_string(),
            ));
        }
        let commits = state
            .remote_branches
            .get(&(remote.to_string(), branch.to_string()))
            .cloned()
            .unwrap_or_default();
        let mut tracking = Vec::new();
        for (hash, object) in commits {
            tracking.push((hash.clone(), object.message.clone()));
            state.objects.insert(hash, object);
        }
        state.fetched.insert(format!("{}/{}", remote, branch), tracking);
        Ok(())
    }

    fn run_merge_tool(&self) -> Result<(), GitError> {
        let mut state = self.state.borrow_mut();
        state.merge_tool_runs += 1;
        if state.merge_tool_fails {
            return Err(GitError::OperationFailed(
                "git mergetool exited with exit status: 1".to_string(),
            ));
        }
        Ok(())
    }

    fn reset_hard(&self, sha: &str) -> Result<(), GitError> {
        let mut state = self.state.borrow_mut();
        state.resets.push(sha.to_string());
        let position = state
            .history
            .iter()
            .position(|(h, _)| h == sha)
            .ok_or_else(|| GitError::Reference(format!("unknown revision {}", sha)))?;
        state.history.truncate(position + 1);
        state.in_progress = None;
        Ok(())
    }
}

/// Collects every event
#[derive(Debug, Default)]
pub struct RecordingReporter {
    pub events: Vec<BatchEvent>,
}

impl BatchReporter for RecordingReporter {
    fn report(&mut self, event: &BatchEvent) {
        self.events.push(event.clone());
    }
}

/// Answers the manual prompt from a script; an exhausted script answers ""
#[derive(Debug)]
pub struct ScriptedPrompt {
    answers: VecDeque<String>,
    asked: Rc<Cell<usize>>,
}

impl ScriptedPrompt {
    pub fn new<I, S>(answers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            answers: answers.into_iter().map(Into::into).collect(),
            asked: Rc::new(Cell::new(0)),
        }
    }

    /// Shared counter of how many times the prompt was shown
    pub fn asked(&self) -> Rc<Cell<usize>> {
        Rc::clone(&self.asked)
    }
}

impl OperatorPrompt for ScriptedPrompt {
    fn ask(&mut self, _conflict: &Conflict<'_>) -> std::io::Result<String> {
        self.asked.set(self.asked.get() + 1);
        Ok(self.answers.pop_front().unwrap_or_default())
    }
}

/// A prompt whose every read fails with the given error kind
#[derive(Debug)]
pub struct FailingPrompt {
    kind: std::io::ErrorKind,
}

impl FailingPrompt {
    pub fn new(kind: std::io::ErrorKind) -> Self {
        Self { kind }
    }
}

impl OperatorPrompt for FailingPrompt {
    fn ask(&mut self, _conflict: &Conflict<'_>) -> std::io::Result<String> {
        Err(std::io::Error::new(self.kind, "read interrupted"))
    }
}

/// A strategy that replays fixed decisions, one per conflict
#[derive(Debug)]
pub struct ScriptedStrategy {
    choices: VecDeque<ManualChoice>,
    pub conflicts_seen: Rc<RefCell<Vec<String>>>,
}

impl ScriptedStrategy {
    pub fn new(choices: impl IntoIterator<Item = ManualChoice>) -> Self {
        Self {
            choices: choices.into_iter().collect(),
            conflicts_seen: Rc::new(RefCell::new(Vec::new())),
        }
    }
}

impl ResolutionStrategy for ScriptedStrategy {
    fn kind(&self) -> StrategyKind {
        StrategyKind::Manual
    }

    fn resolve(
        &mut self,
        git: &dyn GitBackend,
        conflict: &Conflict<'_>,
        _reporter: &mut dyn BatchReporter,
    ) -> Resolution {
        self.conflicts_seen
            .borrow_mut()
            .push(conflict.picked_hash.to_string());
        match self.choices.pop_front().unwrap_or(ManualChoice::Abort) {
            ManualChoice::Continue => {
                let finished = git
                    .stage_all()
                    .and_then(|()| git.cherry_pick_continue())
                    .and_then(|()| git.head());
                match finished {
                    Ok(new_hash) => Resolution::Resolved {
                        new_hash,
                        via: AppliedVia::Manual,
                    },
                    Err(_) => Resolution::Aborted,
                }
            }
            ManualChoice::Skip => {
                let _ = git.cherry_pick_skip();
                Resolution::Skipped
            }
            ManualChoice::Abort => {
                let _ = git.cherry_pick_abort();
                Resolution::Aborted
            }
        }
    }
}
