//! Publish orchestration.
//!
//! A run is a strict two-stage sequence:
//!
//! ```text
//! generate ──ok──▶ deploy        (trigger branch)
//!    │
//!    ├──ok──▶ done               (any other branch: deploy skipped)
//!    └──err─▶ GenerationFailed   (deploy skipped, never invoked)
//! ```
//!
//! `deploy` has exactly one predecessor and runs only when `generate`
//! succeeded and the build's branch equals `publish.trigger_branch`. There is
//! no retry and no resume: the first failure ends the run, and recovering is a
//! matter of re-running the whole pipeline. Both stages are idempotent, so
//! that is always safe.
//!
//! The orchestrator owns the [`PipelineRun`] record and is its only writer.
//! Collaborators are reached through the [`Generator`] and [`Deployer`] traits.

pub mod collaborator;
pub mod command;
pub mod manifest;

pub use collaborator::{
    CollaboratorError, CommitIdentity, DeployTarget, Deployer, Generator, Secret,
};
pub use command::{CommandDeployer, CommandGenerator};

use crate::collect::SourceDocument;
use crate::config::SiteConfig;
use crate::digest;
use std::fmt;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Environment variables consulted for the build branch, in order.
pub const BRANCH_ENV_VARS: &[&str] = &["DOCPUB_BRANCH", "GITHUB_REF_NAME"];

#[derive(Error, Debug)]
pub enum PublishError {
    #[error("generate stage failed: {0}")]
    GenerationFailed(CollaboratorError),
    #[error("deploy stage failed: {0}")]
    DeploymentFailed(CollaboratorError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Generate,
    Deploy,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Stage::Generate => "generate",
            Stage::Deploy => "deploy",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StageOutcome {
    Pending,
    Succeeded,
    Failed(String),
    Skipped(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageRecord {
    pub stage: Stage,
    pub outcome: StageOutcome,
}

/// Progress notifications for an observer, in the order they happen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StageEvent {
    Started(Stage),
    Finished(Stage, StageOutcome),
}

/// The runtime condition gating the deploy stage.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TriggerContext {
    pub branch: Option<String>,
}

impl TriggerContext {
    pub fn new(branch: impl Into<String>) -> Self {
        Self {
            branch: Some(branch.into()),
        }
    }

    /// Use `explicit` if given, otherwise the first of [`BRANCH_ENV_VARS`]
    /// that `lookup` finds non-empty.
    pub fn resolve(explicit: Option<String>, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let branch = explicit.filter(|b| !b.is_empty()).or_else(|| {
            BRANCH_ENV_VARS
                .iter()
                .find_map(|var| lookup(var).filter(|b| !b.is_empty()))
        });
        Self { branch }
    }

    pub fn matches(&self, trigger_branch: &str) -> bool {
        self.branch.as_deref() == Some(trigger_branch)
    }
}

/// Overall result of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    /// Generated and deployed.
    Published,
    /// Generated; deploy filtered out by the trigger.
    GeneratedOnly,
    GenerationFailed,
    DeploymentFailed,
}

impl RunOutcome {
    pub fn is_success(self) -> bool {
        matches!(self, RunOutcome::Published | RunOutcome::GeneratedOnly)
    }
}

/// Ephemeral record of one pipeline execution.
#[derive(Debug)]
pub struct PipelineRun {
    trigger: TriggerContext,
    stages: Vec<StageRecord>,
    current: Option<Stage>,
    artifacts: Option<PathBuf>,
    artifact_digest: Option<String>,
    error: Option<PublishError>,
}

impl PipelineRun {
    fn new(trigger: TriggerContext) -> Self {
        Self {
            trigger,
            stages: [Stage::Generate, Stage::Deploy]
                .into_iter()
                .map(|stage| StageRecord {
                    stage,
                    outcome: StageOutcome::Pending,
                })
                .collect(),
            current: None,
            artifacts: None,
            artifact_digest: None,
            error: None,
        }
    }

    pub fn trigger(&self) -> &TriggerContext {
        &self.trigger
    }

    /// Stage records in execution order.
    pub fn stages(&self) -> &[StageRecord] {
        &self.stages
    }

    pub fn outcome_of(&self, stage: Stage) -> &StageOutcome {
        // Both stages are recorded from construction.
        &self.stages[stage as usize].outcome
    }

    /// Stage in progress; `None` before start and after completion.
    pub fn current(&self) -> Option<Stage> {
        self.current
    }

    pub fn artifacts(&self) -> Option<&Path> {
        self.artifacts.as_deref()
    }

    pub fn artifact_digest(&self) -> Option<&str> {
        self.artifact_digest.as_deref()
    }

    pub fn error(&self) -> Option<&PublishError> {
        self.error.as_ref()
    }

    pub fn outcome(&self) -> RunOutcome {
        match &self.error {
            Some(PublishError::GenerationFailed(_)) => RunOutcome::GenerationFailed,
            Some(PublishError::DeploymentFailed(_)) => RunOutcome::DeploymentFailed,
            None if *self.outcome_of(Stage::Deploy) == StageOutcome::Succeeded => {
                RunOutcome::Published
            }
            None => RunOutcome::GeneratedOnly,
        }
    }

    /// The run itself on success, the first failure otherwise.
    pub fn into_result(mut self) -> Result<Self, PublishError> {
        match self.error.take() {
            Some(err) => Err(err),
            None => Ok(self),
        }
    }
}

type Observer<'a> = &'a dyn Fn(&StageEvent);

/// Sequences the generate and deploy stages.
pub struct Orchestrator<'a> {
    generator: &'a dyn Generator,
    deployer: &'a dyn Deployer,
    observer: Option<Observer<'a>>,
}

impl<'a> Orchestrator<'a> {
    pub fn new(generator: &'a dyn Generator, deployer: &'a dyn Deployer) -> Self {
        Self {
            generator,
            deployer,
            observer: None,
        }
    }

    pub fn with_observer(mut self, observer: Observer<'a>) -> Self {
        self.observer = Some(observer);
        self
    }

    pub fn run(
        &self,
        documents: &[SourceDocument],
        config: &SiteConfig,
        trigger: TriggerContext,
    ) -> PipelineRun {
        let mut run = PipelineRun::new(trigger);

        self.start(&mut run, Stage::Generate);
        let generated = {
            let _span = tracing::info_span!("stage", stage = %Stage::Generate).entered();
            self.generator
                .generate(documents, config)
                .and_then(|dir| inspect_artifacts(&dir).map(|digest| (dir, digest)))
        };
        match generated {
            Ok((dir, digest)) => {
                tracing::info!(artifacts = %dir.display(), digest = %digest::short(&digest), "generated");
                run.artifacts = Some(dir);
                run.artifact_digest = Some(digest);
                self.finish(&mut run, Stage::Generate, StageOutcome::Succeeded);
            }
            Err(err) => {
                tracing::debug!(error = %err, "generate failed");
                self.finish(&mut run, Stage::Generate, StageOutcome::Failed(err.to_string()));
                run.error = Some(PublishError::GenerationFailed(err));
                self.finish(
                    &mut run,
                    Stage::Deploy,
                    StageOutcome::Skipped("generate did not complete".into()),
                );
                return run;
            }
        }

        let trigger_branch = &config.publish.trigger_branch;
        if !run.trigger.matches(trigger_branch) {
            let reason = match &run.trigger.branch {
                Some(branch) => format!("branch `{branch}` does not publish (trigger is `{trigger_branch}`)"),
                None => format!("no build branch known (trigger is `{trigger_branch}`)"),
            };
            tracing::info!(%reason, "deploy filtered");
            self.finish(&mut run, Stage::Deploy, StageOutcome::Skipped(reason));
            return run;
        }

        self.start(&mut run, Stage::Deploy);
        let deployed = {
            let _span = tracing::info_span!("stage", stage = %Stage::Deploy).entered();
            let artifacts = run.artifacts.clone().unwrap_or_default();
            self.deployer
                .deploy(&artifacts, &DeployTarget::from_config(&config.publish))
        };
        match deployed {
            Ok(()) => self.finish(&mut run, Stage::Deploy, StageOutcome::Succeeded),
            Err(err) => {
                tracing::debug!(error = %err, "deploy failed");
                self.finish(&mut run, Stage::Deploy, StageOutcome::Failed(err.to_string()));
                run.error = Some(PublishError::DeploymentFailed(err));
            }
        }
        run
    }

    fn start(&self, run: &mut PipelineRun, stage: Stage) {
        run.current = Some(stage);
        self.notify(&StageEvent::Started(stage));
    }

    fn finish(&self, run: &mut PipelineRun, stage: Stage, outcome: StageOutcome) {
        run.stages[stage as usize].outcome = outcome.clone();
        run.current = None;
        self.notify(&StageEvent::Finished(stage, outcome));
    }

    fn notify(&self, event: &StageEvent) {
        if let Some(observer) = self.observer {
            observer(event);
        }
    }
}

/// A generator that reports success must have left an artifact directory.
fn inspect_artifacts(dir: &Path) -> Result<String, CollaboratorError> {
    if !dir.is_dir() {
        return Err(CollaboratorError::Failed(format!(
            "generator reported success but produced no artifacts at {}",
            dir.display()
        )));
    }
    Ok(digest::digest_tree(dir)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::*;
    use std::cell::RefCell;
    use tempfile::TempDir;

    fn minimal_config() -> SiteConfig {
        crate::config::parse_config(
            r#"
name = "devblog"

[sources]
patterns = ["*.md"]

[publish]
trigger_branch = "main"
"#,
        )
        .unwrap()
    }

    #[test]
    fn trigger_branch_runs_both_stages() {
        let tmp = TempDir::new().unwrap();
        let generator = RecordingGenerator::succeeding(tmp.path());
        let deployer = RecordingDeployer::succeeding();
        let docs = sample_documents();

        let run = Orchestrator::new(&generator, &deployer).run(
            &docs,
            &minimal_config(),
            TriggerContext::new("main"),
        );

        assert_eq!(run.outcome(), RunOutcome::Published);
        assert_eq!(generator.calls(), 1);
        assert_eq!(generator.last_document_count(), Some(docs.len()));
        assert_eq!(deployer.calls(), 1);
        assert_eq!(deployer.last_artifacts(), Some(tmp.path().join("html")));
        assert_eq!(deployer.last_target().unwrap().branch, "gh-pages");
        assert_eq!(*run.outcome_of(Stage::Generate), StageOutcome::Succeeded);
        assert_eq!(*run.outcome_of(Stage::Deploy), StageOutcome::Succeeded);
        assert_eq!(run.current(), None);
        assert!(run.artifact_digest().is_some());
        assert!(run.into_result().is_ok());
    }

    #[test]
    fn other_branch_generates_only() {
        let tmp = TempDir::new().unwrap();
        let generator = RecordingGenerator::succeeding(tmp.path());
        let deployer = RecordingDeployer::succeeding();

        let run = Orchestrator::new(&generator, &deployer).run(
            &sample_documents(),
            &minimal_config(),
            TriggerContext::new("feature-branch"),
        );

        assert_eq!(run.outcome(), RunOutcome::GeneratedOnly);
        assert!(run.outcome().is_success());
        assert_eq!(generator.calls(), 1);
        assert_eq!(deployer.calls(), 0);
        match run.outcome_of(Stage::Deploy) {
            StageOutcome::Skipped(reason) => assert!(reason.contains("feature-branch")),
            other => panic!("expected skipped deploy, got {other:?}"),
        }
        assert!(run.into_result().is_ok());
    }

    #[test]
    fn unknown_branch_generates_only() {
        let tmp = TempDir::new().unwrap();
        let generator = RecordingGenerator::succeeding(tmp.path());
        let deployer = RecordingDeployer::succeeding();

        let run = Orchestrator::new(&generator, &deployer).run(
            &[],
            &minimal_config(),
            TriggerContext::default(),
        );

        assert_eq!(run.outcome(), RunOutcome::GeneratedOnly);
        assert_eq!(deployer.calls(), 0);
    }

    #[test]
    fn generation_failure_never_deploys() {
        let generator = RecordingGenerator::failing("poxy exploded");
        let deployer = RecordingDeployer::succeeding();

        let run = Orchestrator::new(&generator, &deployer).run(
            &sample_documents(),
            &minimal_config(),
            TriggerContext::new("main"),
        );

        assert_eq!(run.outcome(), RunOutcome::GenerationFailed);
        assert!(!run.outcome().is_success());
        assert_eq!(deployer.calls(), 0);
        assert!(matches!(
            run.outcome_of(Stage::Deploy),
            StageOutcome::Skipped(_)
        ));
        assert!(run.artifacts().is_none());

        let err = run.into_result().unwrap_err();
        assert!(matches!(err, PublishError::GenerationFailed(_)));
        assert_eq!(err.to_string(), "generate stage failed: poxy exploded");
    }

    #[test]
    fn success_without_artifacts_is_generation_failure() {
        let tmp = TempDir::new().unwrap();
        let generator = RecordingGenerator::succeeding_without_output(tmp.path());
        let deployer = RecordingDeployer::succeeding();

        let run = Orchestrator::new(&generator, &deployer).run(
            &[],
            &minimal_config(),
            TriggerContext::new("main"),
        );

        assert_eq!(run.outcome(), RunOutcome::GenerationFailed);
        assert_eq!(deployer.calls(), 0);
    }

    #[test]
    fn deployment_failure_is_reported() {
        let tmp = TempDir::new().unwrap();
        let generator = RecordingGenerator::succeeding(tmp.path());
        let deployer = RecordingDeployer::failing("push rejected");

        let run = Orchestrator::new(&generator, &deployer).run(
            &[],
            &minimal_config(),
            TriggerContext::new("main"),
        );

        assert_eq!(run.outcome(), RunOutcome::DeploymentFailed);
        assert_eq!(*run.outcome_of(Stage::Generate), StageOutcome::Succeeded);
        assert_eq!(
            *run.outcome_of(Stage::Deploy),
            StageOutcome::Failed("push rejected".into())
        );
        let err = run.into_result().unwrap_err();
        assert_eq!(err.to_string(), "deploy stage failed: push rejected");
    }

    #[test]
    fn rerun_with_unchanged_inputs_has_same_digest() {
        let tmp = TempDir::new().unwrap();
        let generator = RecordingGenerator::succeeding(tmp.path());
        let deployer = RecordingDeployer::succeeding();
        let orchestrator = Orchestrator::new(&generator, &deployer);
        let config = minimal_config();
        let docs = sample_documents();

        let first = orchestrator.run(&docs, &config, TriggerContext::new("main"));
        let second = orchestrator.run(&docs, &config, TriggerContext::new("main"));

        assert_eq!(first.artifact_digest(), second.artifact_digest());
        assert_eq!(deployer.calls(), 2);
    }

    #[test]
    fn observer_sees_events_in_order() {
        let tmp = TempDir::new().unwrap();
        let generator = RecordingGenerator::succeeding(tmp.path());
        let deployer = RecordingDeployer::succeeding();
        let events = RefCell::new(Vec::new());
        let observer = |e: &StageEvent| events.borrow_mut().push(e.clone());

        Orchestrator::new(&generator, &deployer)
            .with_observer(&observer)
            .run(&[], &minimal_config(), TriggerContext::new("dev"));

        let events = events.into_inner();
        assert_eq!(events.len(), 3);
        assert_eq!(events[0], StageEvent::Started(Stage::Generate));
        assert_eq!(
            events[1],
            StageEvent::Finished(Stage::Generate, StageOutcome::Succeeded)
        );
        assert!(matches!(
            events[2],
            StageEvent::Finished(Stage::Deploy, StageOutcome::Skipped(_))
        ));
    }

    #[test]
    fn stages_are_listed_in_order() {
        let run = PipelineRun::new(TriggerContext::default());
        let stages: Vec<Stage> = run.stages().iter().map(|r| r.stage).collect();
        assert_eq!(stages, vec![Stage::Generate, Stage::Deploy]);
        assert!(run
            .stages()
            .iter()
            .all(|r| r.outcome == StageOutcome::Pending));
    }

    // =========================================================================
    // TriggerContext
    // =========================================================================

    #[test]
    fn resolve_prefers_explicit_branch() {
        let ctx = TriggerContext::resolve(Some("release".into()), |_| Some("main".into()));
        assert_eq!(ctx.branch.as_deref(), Some("release"));
    }

    #[test]
    fn resolve_falls_back_through_env_vars() {
        let ctx = TriggerContext::resolve(None, |var| {
            (var == "GITHUB_REF_NAME").then(|| "main".to_string())
        });
        assert!(ctx.matches("main"));

        let ctx = TriggerContext::resolve(None, |var| match var {
            "DOCPUB_BRANCH" => Some("docs".into()),
            _ => Some("main".into()),
        });
        assert_eq!(ctx.branch.as_deref(), Some("docs"));
    }

    #[test]
    fn resolve_ignores_empty_values() {
        let ctx = TriggerContext::resolve(Some(String::new()), |_| Some(String::new()));
        assert_eq!(ctx.branch, None);
        assert!(!ctx.matches(""));
    }
}
