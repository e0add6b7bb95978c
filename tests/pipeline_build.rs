// tests/pipeline_build.rs

use std::error::Error;
use std::sync::Arc;
use std::time::Duration;

use buildwatch::errors::BuildwatchError;
use buildwatch::exec::SharedSteps;
use buildwatch::pipeline::{run_build, run_plan, BuildPlan};
use buildwatch::types::BuildStep;
use buildwatch_test_utils::builders::ProjectConfigBuilder;
use buildwatch_test_utils::fake_steps::{FakeSteps, StepCall};
use buildwatch_test_utils::{init_tracing, with_timeout};

type TestResult = Result<(), Box<dyn Error>>;

fn fake() -> FakeSteps {
    FakeSteps::new(ProjectConfigBuilder::new().build())
}

fn position(calls: &[StepCall], call: &StepCall) -> usize {
    calls
        .iter()
        .position(|c| c == call)
        .unwrap_or_else(|| panic!("missing call {call:?} in {calls:?}"))
}

#[tokio::test]
async fn full_build_reads_config_runs_all_steps_then_writes_bundles() -> TestResult {
    with_timeout(async {
        init_tracing();

        let fake = Arc::new(fake());
        let steps: SharedSteps = fake.clone();

        run_build(steps).await?;

        let calls = fake.calls();
        assert_eq!(calls.first(), Some(&StepCall::ReadConfig));
        assert_eq!(calls.last(), Some(&StepCall::WriteBundles));

        let mut started = fake.started_steps();
        started.sort();
        assert_eq!(started, BuildStep::ALL.to_vec());
        assert_eq!(fake.bundle_writes(), 1);
        Ok::<(), Box<dyn Error>>(())
    })
    .await
}

#[tokio::test]
async fn bundle_write_waits_for_the_slowest_step() -> TestResult {
    with_timeout(async {
        init_tracing();

        let fake = Arc::new(
            fake()
                .with_delay(BuildStep::Transpile, Duration::from_millis(150))
                .with_delay(BuildStep::ProcessCss, Duration::from_millis(50))
                .with_delay(BuildStep::CopyFiles, Duration::from_millis(100)),
        );
        let steps: SharedSteps = fake.clone();

        run_build(steps).await?;

        let calls = fake.calls();
        let bundle = position(&calls, &StepCall::WriteBundles);
        for step in BuildStep::ALL {
            assert!(position(&calls, &StepCall::StepFinished(step)) < bundle);
            assert!(position(&calls, &StepCall::StepStarted(step)) > position(&calls, &StepCall::ReadConfig));
        }
        Ok::<(), Box<dyn Error>>(())
    })
    .await
}

#[tokio::test]
async fn steps_run_concurrently() -> TestResult {
    with_timeout(async {
        let mut fake = fake();
        for step in BuildStep::ALL {
            fake = fake.with_delay(step, Duration::from_millis(200));
        }
        let fake = Arc::new(fake);
        let steps: SharedSteps = fake.clone();

        let started = tokio::time::Instant::now();
        run_build(steps).await?;

        // Sequential execution would take at least 800ms.
        assert!(started.elapsed() < Duration::from_millis(700));
        Ok::<(), Box<dyn Error>>(())
    })
    .await
}

#[tokio::test]
async fn failing_step_prevents_bundle_write() -> TestResult {
    with_timeout(async {
        init_tracing();

        let fake = Arc::new(fake().with_failing(BuildStep::ProcessMarkup));
        let steps: SharedSteps = fake.clone();

        let result = run_build(steps).await;

        match result {
            Err(BuildwatchError::StepFailed { step, .. }) => {
                assert_eq!(step, BuildStep::ProcessMarkup)
            }
            other => panic!("expected StepFailed, got {other:?}"),
        }
        assert_eq!(fake.bundle_writes(), 0);
        Ok::<(), Box<dyn Error>>(())
    })
    .await
}

#[tokio::test]
async fn siblings_of_a_failed_step_still_run_to_completion() -> TestResult {
    with_timeout(async {
        let fake = Arc::new(
            fake()
                .with_failing(BuildStep::Transpile)
                .with_delay(BuildStep::CopyFiles, Duration::from_millis(100)),
        );
        let steps: SharedSteps = fake.clone();

        assert!(run_build(steps).await.is_err());

        let calls = fake.calls();
        assert!(calls.contains(&StepCall::StepFinished(BuildStep::CopyFiles)));
        assert!(!calls.contains(&StepCall::WriteBundles));
        Ok::<(), Box<dyn Error>>(())
    })
    .await
}

#[tokio::test]
async fn panicking_step_is_reported_as_step_failure() -> TestResult {
    with_timeout(async {
        let fake = Arc::new(fake().with_panicking(BuildStep::ProcessCss));
        let steps: SharedSteps = fake.clone();

        let result = run_build(steps).await;

        match result {
            Err(BuildwatchError::StepFailed { step, .. }) => assert_eq!(step, BuildStep::ProcessCss),
            other => panic!("expected StepFailed, got {other:?}"),
        }
        assert_eq!(fake.bundle_writes(), 0);
        Ok::<(), Box<dyn Error>>(())
    })
    .await
}

#[tokio::test]
async fn panic_is_attributed_to_its_own_step_while_siblings_finish() -> TestResult {
    with_timeout(async {
        let fake = Arc::new(
            fake()
                .with_panicking(BuildStep::ProcessMarkup)
                .with_delay(BuildStep::CopyFiles, Duration::from_millis(50))
                .with_delay(BuildStep::Transpile, Duration::from_millis(20)),
        );
        let steps: SharedSteps = fake.clone();

        match run_build(steps).await {
            Err(BuildwatchError::StepFailed { step, reason }) => {
                assert_eq!(step, BuildStep::ProcessMarkup);
                assert!(reason.contains("panicked"), "got: {reason}");
            }
            other => panic!("expected StepFailed, got {other:?}"),
        }

        let calls = fake.calls();
        assert!(calls.contains(&StepCall::StepFinished(BuildStep::CopyFiles)));
        assert!(calls.contains(&StepCall::StepFinished(BuildStep::Transpile)));
        assert!(!calls.contains(&StepCall::StepFinished(BuildStep::ProcessMarkup)));
        Ok::<(), Box<dyn Error>>(())
    })
    .await
}

#[tokio::test]
async fn configuration_failure_aborts_before_any_step() -> TestResult {
    with_timeout(async {
        let fake = Arc::new(fake().with_failing_config());
        let steps: SharedSteps = fake.clone();

        let result = run_build(steps).await;

        assert!(matches!(result, Err(BuildwatchError::ConfigError(_))));
        assert_eq!(fake.calls(), vec![StepCall::ReadConfig]);
        Ok::<(), Box<dyn Error>>(())
    })
    .await
}

#[tokio::test]
async fn bundle_failure_is_surfaced() -> TestResult {
    with_timeout(async {
        let fake = Arc::new(fake().with_failing_bundle());
        let steps: SharedSteps = fake.clone();

        let result = run_build(steps).await;

        assert!(matches!(result, Err(BuildwatchError::BundleFailed(_))));
        Ok::<(), Box<dyn Error>>(())
    })
    .await
}

#[tokio::test]
async fn scoped_plan_runs_only_selected_steps() -> TestResult {
    with_timeout(async {
        let fake = Arc::new(fake());
        let steps: SharedSteps = fake.clone();

        let plan = BuildPlan::scoped([BuildStep::ProcessCss].into_iter().collect());
        run_plan(steps, &plan).await?;

        assert_eq!(
            fake.calls(),
            vec![
                StepCall::ReadConfig,
                StepCall::StepStarted(BuildStep::ProcessCss),
                StepCall::StepFinished(BuildStep::ProcessCss),
                StepCall::WriteBundles,
            ]
        );
        Ok::<(), Box<dyn Error>>(())
    })
    .await
}

#[test]
fn full_plan_contains_every_step() {
    let plan = BuildPlan::full();
    assert_eq!(plan.len(), 4);
    for step in BuildStep::ALL {
        assert!(plan.contains(step));
    }
    assert_eq!(
        plan.to_string(),
        "[transpile, process-markup, process-css, copy-files]"
    );
}
