//! Collaborators backed by external programs.
//!
//! Both stages shell out to a program named in `docpub.toml` and block until
//! it exits. Arguments may contain `{placeholder}`s which are substituted
//! before the program starts:
//!
//! | Stage | Placeholders | Extra environment |
//! |---|---|---|
//! | generate | `{manifest}` `{output}` `{root}` | `DOCPUB_MANIFEST`, `DOCPUB_OUTPUT_DIR` |
//! | deploy | `{artifacts}` `{target}` `{name}` `{email}` | `GIT_AUTHOR_*`, `GIT_COMMITTER_*`, the credential |
//!
//! A non-zero exit fails the stage. So does termination by a signal, which is
//! how an external interrupt reaches the pipeline: the stage is reported as
//! interrupted and the run stops.

use super::collaborator::{CollaboratorError, DeployTarget, Deployer, Generator, Secret};
use super::manifest::{GeneratorManifest, MANIFEST_FILENAME};
use crate::collect::SourceDocument;
use crate::config::{PublishConfig, SiteConfig};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Hidden directory under the root holding intermediate files.
pub const WORK_DIR: &str = ".docpub";

/// Runs the configured documentation generator.
#[derive(Debug, Clone)]
pub struct CommandGenerator {
    root: PathBuf,
    work_dir: PathBuf,
}

impl CommandGenerator {
    pub fn new(root: &Path) -> Self {
        Self {
            root: root.to_path_buf(),
            work_dir: root.join(WORK_DIR),
        }
    }
}

impl Generator for CommandGenerator {
    fn generate(
        &self,
        documents: &[SourceDocument],
        config: &SiteConfig,
    ) -> Result<PathBuf, CollaboratorError> {
        let output = config.artifact_dir(&self.root);

        // Start from an empty artifact directory so stale files never survive.
        if output.exists() {
            tracing::debug!(path = %output.display(), "removing previous artifacts");
            fs::remove_dir_all(&output)?;
        }

        fs::create_dir_all(&self.work_dir)?;
        let manifest_path = self.work_dir.join(MANIFEST_FILENAME);
        let manifest = GeneratorManifest::new(config, documents, &output);
        fs::write(&manifest_path, manifest.to_json()?)?;
        tracing::debug!(
            path = %manifest_path.display(),
            documents = documents.len(),
            "wrote generator manifest"
        );

        let generator = &config.generator;
        let args = substitute(
            &generator.args,
            &[
                ("manifest", manifest_path.display().to_string()),
                ("output", output.display().to_string()),
                ("root", self.root.display().to_string()),
            ],
        );
        let mut cmd = Command::new(&generator.command);
        cmd.args(&args)
            .current_dir(&self.root)
            .env("DOCPUB_MANIFEST", &manifest_path)
            .env("DOCPUB_OUTPUT_DIR", &output);
        run_command(cmd, &generator.command)?;

        Ok(output)
    }
}

/// Runs the configured publish tool.
#[derive(Debug, Clone)]
pub struct CommandDeployer {
    root: PathBuf,
    publish: PublishConfig,
    credential: Option<Secret>,
}

impl CommandDeployer {
    pub fn new(publish: &PublishConfig, root: &Path) -> Self {
        Self {
            root: root.to_path_buf(),
            publish: publish.clone(),
            credential: None,
        }
    }

    /// Read the credential named by `publish.token_env` through `lookup`.
    pub fn from_env(
        publish: &PublishConfig,
        root: &Path,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Self {
        let credential = publish
            .token_env
            .as_deref()
            .and_then(lookup)
            .filter(|v| !v.is_empty())
            .map(Secret::new);
        Self::new(publish, root).with_credential(credential)
    }

    pub fn with_credential(mut self, credential: Option<Secret>) -> Self {
        self.credential = credential;
        self
    }
}

impl Deployer for CommandDeployer {
    fn deploy(&self, artifacts: &Path, target: &DeployTarget) -> Result<(), CollaboratorError> {
        let publish = &self.publish;
        let mut cmd = Command::new(&publish.command);

        if let Some(var) = &publish.token_env {
            let Some(secret) = &self.credential else {
                return Err(CollaboratorError::Failed(format!(
                    "deploy credential ${var} is not set"
                )));
            };
            cmd.env(var, secret.expose());
        }

        let identity = &target.identity;
        let args = substitute(
            &publish.args,
            &[
                ("artifacts", artifacts.display().to_string()),
                ("target", target.branch.clone()),
                ("name", identity.name.clone()),
                ("email", identity.email.clone()),
            ],
        );
        cmd.args(&args)
            .current_dir(&self.root)
            .env("GIT_AUTHOR_NAME", &identity.name)
            .env("GIT_AUTHOR_EMAIL", &identity.email)
            .env("GIT_COMMITTER_NAME", &identity.name)
            .env("GIT_COMMITTER_EMAIL", &identity.email);

        run_command(cmd, &publish.command)
    }
}

/// Replace every `{key}` in each argument with its value.
fn substitute(args: &[String], vars: &[(&str, String)]) -> Vec<String> {
    args.iter()
        .map(|arg| {
            vars.iter().fold(arg.clone(), |acc, (key, value)| {
                acc.replace(&format!("{{{key}}}"), value)
            })
        })
        .collect()
}

/// Run to completion, mapping failure to a [`CollaboratorError`].
fn run_command(mut cmd: Command, name: &str) -> Result<(), CollaboratorError> {
    tracing::debug!(command = name, "running collaborator");
    let status = cmd.status().map_err(|source| CollaboratorError::Spawn {
        command: name.to_string(),
        source,
    })?;

    if status.success() {
        return Ok(());
    }
    match status.code() {
        Some(code) => Err(CollaboratorError::ExitStatus {
            command: name.to_string(),
            code,
        }),
        None => Err(CollaboratorError::Interrupted {
            command: name.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::parse_config;
    use crate::test_helpers::*;
    use tempfile::TempDir;

    #[test]
    fn substitute_replaces_all_placeholders() {
        let args = vec![
            "--branch".to_string(),
            "{target}".to_string(),
            "{artifacts}/{target}".to_string(),
            "{unknown}".to_string(),
        ];
        let out = substitute(
            &args,
            &[
                ("target", "gh-pages".to_string()),
                ("artifacts", "/repo/html".to_string()),
            ],
        );
        assert_eq!(
            out,
            vec!["--branch", "gh-pages", "/repo/html/gh-pages", "{unknown}"]
        );
    }

    #[test]
    fn from_env_reads_named_variable_only() {
        let publish = PublishConfig {
            token_env: Some("DEPLOY_TOKEN".into()),
            ..PublishConfig::default()
        };
        let deployer = CommandDeployer::from_env(&publish, Path::new("."), |k| {
            (k == "DEPLOY_TOKEN").then(|| "s3cr3t".to_string())
        });
        assert_eq!(deployer.credential, Some(Secret::new("s3cr3t")));
        assert!(!format!("{deployer:?}").contains("s3cr3t"));

        let without = CommandDeployer::from_env(&PublishConfig::default(), Path::new("."), |_| {
            Some("ignored".to_string())
        });
        assert_eq!(without.credential, None);
    }

    #[test]
    fn missing_credential_fails_without_running() {
        let tmp = TempDir::new().unwrap();
        let publish = PublishConfig {
            command: "definitely-not-a-real-deploy-tool".into(),
            token_env: Some("DEPLOY_TOKEN".into()),
            ..PublishConfig::default()
        };
        let deployer = CommandDeployer::from_env(&publish, tmp.path(), |_| None);

        let err = deployer
            .deploy(tmp.path(), &DeployTarget::from_config(&publish))
            .unwrap_err();
        assert!(matches!(err, CollaboratorError::Failed(_)));
        assert!(err.to_string().contains("$DEPLOY_TOKEN"));
    }

    #[test]
    fn missing_program_is_spawn_error() {
        let tmp = TempDir::new().unwrap();
        let config = parse_config(
            r#"
name = "t"

[sources]
patterns = ["*.md"]

[generator]
command = "definitely-not-a-real-generator"
"#,
        )
        .unwrap();

        let err = CommandGenerator::new(tmp.path())
            .generate(&[], &config)
            .unwrap_err();
        assert!(matches!(err, CollaboratorError::Spawn { .. }));
    }

    #[cfg(unix)]
    mod unix {
        use super::*;
        use crate::digest::digest_tree;

        fn shell_config(generate: &str, deploy: &str) -> SiteConfig {
            parse_config(&format!(
                r#"
name = "t"

[sources]
patterns = ["*.md"]

[generator]
command = "sh"
args = ["-c", '{generate}']

[publish]
command = "sh"
args = ["-c", '{deploy}', "deploy", "{{artifacts}}", "{{target}}"]
"#
            ))
            .unwrap()
        }

        #[test]
        fn generator_receives_manifest_and_output_dir() {
            let tmp = TempDir::new().unwrap();
            let config = shell_config(
                r#"mkdir -p "$DOCPUB_OUTPUT_DIR" && cp "$DOCPUB_MANIFEST" "$DOCPUB_OUTPUT_DIR/manifest.json""#,
                "true",
            );

            let out = CommandGenerator::new(tmp.path())
                .generate(&[], &config)
                .unwrap();

            assert_eq!(out, tmp.path().join("html"));
            let copied = fs::read_to_string(out.join("manifest.json")).unwrap();
            let value: serde_json::Value = serde_json::from_str(&copied).unwrap();
            assert_eq!(value["site"]["name"], "t");
            assert!(tmp.path().join(WORK_DIR).join(MANIFEST_FILENAME).exists());
        }

        #[test]
        fn generator_clears_stale_artifacts() {
            let tmp = TempDir::new().unwrap();
            write_tree(tmp.path(), &[("html/stale.html", "old")]);
            let config = shell_config(r#"mkdir -p html && echo new > html/index.html"#, "true");

            let generator = CommandGenerator::new(tmp.path());
            let out = generator.generate(&[], &config).unwrap();
            assert!(!out.join("stale.html").exists());
            assert!(out.join("index.html").exists());
        }

        #[test]
        fn repeated_generation_is_idempotent() {
            let tmp = TempDir::new().unwrap();
            let config = shell_config(
                r#"mkdir -p html && wc -c < "$DOCPUB_MANIFEST" > html/size.txt"#,
                "true",
            );
            let generator = CommandGenerator::new(tmp.path());

            let first = digest_tree(&generator.generate(&[], &config).unwrap()).unwrap();
            let second = digest_tree(&generator.generate(&[], &config).unwrap()).unwrap();
            assert_eq!(first, second);
        }

        #[test]
        fn generator_non_zero_exit_is_error() {
            let tmp = TempDir::new().unwrap();
            let config = shell_config("exit 3", "true");

            let err = CommandGenerator::new(tmp.path())
                .generate(&[], &config)
                .unwrap_err();
            assert!(matches!(err, CollaboratorError::ExitStatus { code: 3, .. }));
        }

        #[test]
        fn generator_killed_by_signal_is_interrupted() {
            let tmp = TempDir::new().unwrap();
            let config = shell_config("kill -TERM $$", "true");

            let err = CommandGenerator::new(tmp.path())
                .generate(&[], &config)
                .unwrap_err();
            assert!(matches!(err, CollaboratorError::Interrupted { .. }));
        }

        #[test]
        fn deployer_receives_artifacts_target_and_identity() {
            let tmp = TempDir::new().unwrap();
            write_tree(tmp.path(), &[("html/index.html", "")]);
            let config = shell_config(
                "true",
                r#"echo "$1 $2 $GIT_AUTHOR_NAME <$GIT_COMMITTER_EMAIL>" > deployed.txt"#,
            );
            let deployer = CommandDeployer::new(&config.publish, tmp.path());

            deployer
                .deploy(
                    &tmp.path().join("html"),
                    &DeployTarget::from_config(&config.publish),
                )
                .unwrap();

            let log = fs::read_to_string(tmp.path().join("deployed.txt")).unwrap();
            assert_eq!(
                log.trim(),
                format!(
                    "{} gh-pages docpub <docpub@users.noreply.github.com>",
                    tmp.path().join("html").display()
                )
            );
        }

        #[test]
        fn deployer_passes_credential_to_child() {
            let tmp = TempDir::new().unwrap();
            let mut config = shell_config("true", r#"test "$DEPLOY_TOKEN" = s3cr3t"#);
            config.publish.token_env = Some("DEPLOY_TOKEN".into());
            let deployer = CommandDeployer::new(&config.publish, tmp.path())
                .with_credential(Some(Secret::new("s3cr3t")));

            deployer
                .deploy(tmp.path(), &DeployTarget::from_config(&config.publish))
                .unwrap();
        }
    }
}
