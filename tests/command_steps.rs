// tests/command_steps.rs
#![cfg(unix)]

use std::error::Error;
use std::fs;
use std::path::Path;
use std::sync::Arc;

use buildwatch::errors::BuildwatchError;
use buildwatch::exec::{BuildSteps, CommandSteps, SharedSteps};
use buildwatch::pipeline::run_build;
use buildwatch::types::BuildStep;
use buildwatch_test_utils::{init_tracing, with_timeout};

type TestResult = Result<(), Box<dyn Error>>;

fn write_project(dir: &Path, body: &str) -> std::path::PathBuf {
    let path = dir.join("Buildwatch.toml");
    fs::write(&path, body).unwrap();
    path
}

#[tokio::test]
async fn full_build_runs_configured_commands_in_project_root() -> TestResult {
    with_timeout(async {
        init_tracing();
        let dir = tempfile::tempdir()?;
        let config_path = write_project(
            dir.path(),
            r#"
[transpiler]
source = "src/**/*.ts"
cmd = "echo ts > transpiled.txt"

[markup_processor]
source = "src/**/*.html"
cmd = "echo html > markup.txt"

[css_processor]
source = "src/**/*.css"

[copy_files]
cmd = "echo copy > copied.txt"

[bundle]
cmd = "cat transpiled.txt markup.txt copied.txt > bundle.txt"
"#,
        );

        let steps: SharedSteps = Arc::new(CommandSteps::new(&config_path, dir.path()));
        run_build(steps).await?;

        let bundle = fs::read_to_string(dir.path().join("bundle.txt"))?;
        assert_eq!(bundle, "ts\nhtml\ncopy\n");
        Ok::<(), Box<dyn Error>>(())
    })
    .await
}

#[tokio::test]
async fn non_zero_exit_fails_the_step_and_skips_bundle() -> TestResult {
    with_timeout(async {
        let dir = tempfile::tempdir()?;
        let config_path = write_project(
            dir.path(),
            r#"
[transpiler]
source = "src/**/*.ts"
cmd = "echo 'type error' >&2; exit 3"

[markup_processor]
source = "src/**/*.html"

[css_processor]
source = "src/**/*.css"

[bundle]
cmd = "touch bundle.txt"
"#,
        );

        let steps: SharedSteps = Arc::new(CommandSteps::new(&config_path, dir.path()));
        let result = run_build(steps).await;

        match result {
            Err(BuildwatchError::StepFailed { step, reason }) => {
                assert_eq!(step, BuildStep::Transpile);
                assert!(reason.contains('3'), "got: {reason}");
            }
            other => panic!("expected StepFailed, got {other:?}"),
        }
        assert!(!dir.path().join("bundle.txt").exists());
        Ok::<(), Box<dyn Error>>(())
    })
    .await
}

#[tokio::test]
async fn configuration_is_reread_every_cycle() -> TestResult {
    with_timeout(async {
        let dir = tempfile::tempdir()?;
        let body = |cmd: &str| {
            format!(
                r#"
[transpiler]
source = "src/**/*.ts"
cmd = "{cmd}"

[markup_processor]
source = "src/**/*.html"

[css_processor]
source = "src/**/*.css"
"#
            )
        };
        let config_path = write_project(dir.path(), &body("echo first"));
        let steps = CommandSteps::new(&config_path, dir.path());

        let cfg = steps.read_configuration().await?;
        assert_eq!(cfg.command_for(BuildStep::Transpile), Some("echo first"));

        write_project(dir.path(), &body("echo second"));
        let cfg = steps.read_configuration().await?;
        assert_eq!(cfg.command_for(BuildStep::Transpile), Some("echo second"));
        Ok::<(), Box<dyn Error>>(())
    })
    .await
}

#[tokio::test]
async fn invalid_project_file_fails_configuration_read() -> TestResult {
    with_timeout(async {
        let dir = tempfile::tempdir()?;
        let config_path = write_project(dir.path(), "[transpiler]\nsource = \"src/**/*.ts\"\n");

        let steps: SharedSteps = Arc::new(CommandSteps::new(&config_path, dir.path()));
        let result = run_build(steps).await;

        assert!(matches!(result, Err(BuildwatchError::TomlError(_))));
        Ok::<(), Box<dyn Error>>(())
    })
    .await
}
