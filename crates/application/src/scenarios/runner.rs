//! Sequential suite runner.
//!
//! Runs scenarios one at a time in catalog order, threading a `RunContext`
//! through them so that dependent scenarios see what `create_user` captured.

use std::sync::Arc;
use std::time::Instant;

use chrono::Utc;
use reqres_domain::{RunContext, RunReport, ScenarioId, ScenarioOutcome, ScenarioResult};
use tracing::Instrument;
use uuid::Uuid;

use crate::diagnostics::render_exchange;
use crate::ports::{DiagnosticsSink, HttpClient};
use crate::scenarios::{ScenarioCatalog, ScenarioPlan};
use crate::testing::AssertionRunner;
use crate::ApplicationResult;

/// What to do after a scenario fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RunMode {
    /// Stop the run at the first failed scenario.
    #[default]
    FailFast,
    /// Run every selected scenario and report each one.
    ContinueOnFailure,
}

/// Executes scenarios against an HTTP client.
///
/// # Example
///
/// ```ignore
/// let config = RunnerConfig::default();
/// let client = Arc::new(ReqwestHttpClient::new(&config)?);
/// let runner = SuiteRunner::new(client, StdoutDiagnostics::stdout(), config.catalog()?);
///
/// let report = runner.run().await?;
/// assert!(report.succeeded());
/// ```
pub struct SuiteRunner<C: HttpClient, D: DiagnosticsSink> {
    client: Arc<C>,
    diagnostics: D,
    catalog: ScenarioCatalog,
    assertions: AssertionRunner,
    mode: RunMode,
}

impl<C: HttpClient, D: DiagnosticsSink> SuiteRunner<C, D> {
    /// Creates a fail-fast runner.
    pub const fn new(client: Arc<C>, diagnostics: D, catalog: ScenarioCatalog) -> Self {
        Self {
            client,
            diagnostics,
            catalog,
            assertions: AssertionRunner::new(),
            mode: RunMode::FailFast,
        }
    }

    /// Sets the run mode.
    #[must_use]
    pub const fn with_mode(mut self, mode: RunMode) -> Self {
        self.mode = mode;
        self
    }

    /// The catalog plans are built from.
    pub const fn catalog(&self) -> &ScenarioCatalog {
        &self.catalog
    }

    /// Runs every scenario in catalog order.
    ///
    /// # Errors
    ///
    /// Returns an error on the first transport failure; assertion failures
    /// are part of the report.
    pub async fn run(&self) -> ApplicationResult<RunReport> {
        self.run_selected(&ScenarioId::ALL).await
    }

    /// Runs the selected scenarios in catalog order, whatever order
    /// `selection` lists them in.
    ///
    /// # Errors
    ///
    /// Returns an error on the first transport failure.
    pub async fn run_selected(&self, selection: &[ScenarioId]) -> ApplicationResult<RunReport> {
        let run_id = Uuid::now_v7();
        let started_at = Utc::now();
        let span = tracing::info_span!("run", %run_id);

        let results = async {
            let mut ctx = RunContext::new();
            let mut results = Vec::with_capacity(selection.len());

            for scenario in ScenarioId::ALL
                .into_iter()
                .filter(|id| selection.contains(id))
            {
                let result = self.run_scenario(scenario, &mut ctx).await?;
                let failed = result.outcome.is_failed();
                results.push(result);

                if failed && self.mode == RunMode::FailFast {
                    tracing::warn!(%scenario, "stopping run after first failure");
                    break;
                }
            }

            ApplicationResult::Ok(results)
        }
        .instrument(span)
        .await?;

        Ok(RunReport::new(run_id, started_at, Utc::now(), results))
    }

    /// Runs one scenario against `ctx`, skipping it if its requirement is
    /// unmet.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails at the transport level.
    pub async fn run_scenario(
        &self,
        scenario: ScenarioId,
        ctx: &mut RunContext,
    ) -> ApplicationResult<ScenarioResult> {
        let start = Instant::now();

        let plan = match self.catalog.plan(scenario, ctx) {
            Ok(plan) => plan,
            Err(requirement) => {
                let reason = requirement.unmet_reason();
                tracing::info!(%scenario, reason, "scenario skipped");
                return Ok(ScenarioResult::new(
                    scenario,
                    ScenarioOutcome::skipped(reason),
                    0,
                ));
            }
        };

        let outcome = self.execute(&plan, ctx).await?;
        let duration_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);

        match &outcome {
            ScenarioOutcome::Failed { failure } => {
                tracing::error!(%scenario, %failure, "scenario failed");
            }
            _ => tracing::info!(%scenario, duration_ms, "scenario passed"),
        }

        Ok(ScenarioResult::new(scenario, outcome, duration_ms))
    }

    /// Sends the plan's request, records diagnostics, then evaluates the
    /// assertions. Context is only updated when every assertion holds.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails at the transport level.
    pub async fn execute(
        &self,
        plan: &ScenarioPlan,
        ctx: &mut RunContext,
    ) -> ApplicationResult<ScenarioOutcome> {
        tracing::debug!(
            scenario = %plan.scenario,
            method = %plan.request.method,
            url = %plan.request.display_url(),
            "sending request"
        );

        let response = self.client.execute(&plan.request).await?;
        self.diagnostics
            .record(&render_exchange(&plan.request, &response));

        let result = self.assertions.run(&plan.assertions, &response);
        if result.is_ok() {
            plan.capture(&response, ctx);
        }

        Ok(result.into())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::significant_drop_tightening)]
mod tests {
    use super::*;
    use std::future::Future;
    use std::sync::Mutex;

    use pretty_assertions::assert_eq;
    use reqres_domain::AssertionFailure;
    use reqres_domain::request::{HttpMethod, RequestSpec};
    use reqres_domain::response::ResponseSpec;
    use serde_json::{Value, json};

    use crate::ApplicationError;
    use crate::ports::HttpClientError;

    const BASE: &str = "https://reqres.in/api";

    /// In-memory stand-in for the demo service.
    #[derive(Default)]
    struct FakeReqres {
        requests: Mutex<Vec<RequestSpec>>,
        create_status: Option<u16>,
        create_without_id: bool,
        list_is_empty: bool,
        unreachable_path: Option<&'static str>,
    }

    impl FakeReqres {
        fn sent(&self) -> Vec<RequestSpec> {
            self.requests.lock().unwrap().clone()
        }

        fn respond(&self, request: &RequestSpec) -> Result<ResponseSpec, HttpClientError> {
            let path = request.url.strip_prefix(BASE).unwrap_or(&request.url);
            if self.unreachable_path == Some(path) {
                return Err(HttpClientError::ConnectionRefused {
                    host: "reqres.in".to_string(),
                    port: 443,
                });
            }

            let body = request.body.clone().unwrap_or_else(|| json!({}));
            let segments: Vec<&str> = path.trim_matches('/').split('/').collect();

            let response = match (request.method, segments.as_slice()) {
                (HttpMethod::Get, ["users"]) => self.users_page(request),
                (HttpMethod::Get, ["users", "2"]) => ResponseSpec::json(
                    200,
                    &json!({"data": {"id": 2, "email": "janet.weaver@reqres.in", "first_name": "Janet", "last_name": "Weaver"}}),
                ),
                (HttpMethod::Get, ["users", _]) => ResponseSpec::json(404, &json!({})),
                (HttpMethod::Post, ["users"]) => {
                    let mut created = body;
                    if !self.create_without_id {
                        created["id"] = json!("614");
                    }
                    created["createdAt"] = json!("2026-10-19T10:00:00.000Z");
                    ResponseSpec::json(self.create_status.unwrap_or(201), &created)
                }
                (HttpMethod::Put | HttpMethod::Patch, ["users", _]) => {
                    let mut updated = body;
                    updated["updatedAt"] = json!("2026-10-19T10:00:01.000Z");
                    ResponseSpec::json(200, &updated)
                }
                (HttpMethod::Delete, ["users", _]) => ResponseSpec::empty(204),
                (HttpMethod::Post, ["register"]) => match body.get("password") {
                    Some(_) => ResponseSpec::json(200, &json!({"id": 4, "token": "QpwL5tke4Pnpja7X4"})),
                    None => ResponseSpec::json(400, &json!({"error": "Missing password"})),
                },
                (HttpMethod::Post, ["login"]) => {
                    ResponseSpec::json(200, &json!({"token": "QpwL5tke4Pnpja7X4"}))
                }
                _ => ResponseSpec::json(404, &json!({})),
            };
            Ok(response)
        }

        fn users_page(&self, request: &RequestSpec) -> ResponseSpec {
            let param = |key: &str, default: u64| {
                request
                    .query
                    .iter()
                    .find(|p| p.key == key)
                    .and_then(|p| p.value.parse().ok())
                    .unwrap_or(default)
            };
            let page = param("page", 1);
            let per_page = param("per_page", 6);

            let data: Vec<Value> = if self.list_is_empty {
                Vec::new()
            } else {
                (1..=per_page)
                    .map(|i| {
                        let id = (page - 1) * per_page + i;
                        json!({"id": id, "email": format!("user{id}@reqres.in"), "first_name": "First", "last_name": "Last"})
                    })
                    .collect()
            };

            ResponseSpec::json(200, &json!({"page": page, "per_page": per_page, "data": data}))
        }
    }

    impl HttpClient for FakeReqres {
        fn execute(
            &self,
            request: &RequestSpec,
        ) -> impl Future<Output = Result<ResponseSpec, HttpClientError>> + Send {
            self.requests.lock().unwrap().push(request.clone());
            let result = self.respond(request);
            async move { result }
        }
    }

    #[derive(Default)]
    struct RecordingDiagnostics {
        blocks: Mutex<Vec<String>>,
    }

    impl DiagnosticsSink for RecordingDiagnostics {
        fn record(&self, block: &str) {
            self.blocks.lock().unwrap().push(block.to_string());
        }
    }

    fn runner(fake: FakeReqres) -> (SuiteRunner<FakeReqres, Arc<RecordingDiagnostics>>, Arc<FakeReqres>, Arc<RecordingDiagnostics>) {
        let client = Arc::new(fake);
        let diagnostics = Arc::new(RecordingDiagnostics::default());
        let catalog = ScenarioCatalog::new(BASE).unwrap();
        (
            SuiteRunner::new(Arc::clone(&client), Arc::clone(&diagnostics), catalog),
            client,
            diagnostics,
        )
    }

    #[tokio::test]
    async fn test_full_suite_passes_against_conforming_service() {
        let (runner, client, diagnostics) = runner(FakeReqres::default());

        let report = runner.run().await.unwrap();

        assert!(report.succeeded(), "{:?}", report.results);
        assert_eq!(report.passed, 12);
        assert_eq!(report.skipped, 0);
        let order: Vec<_> = report.results.iter().map(|r| r.scenario).collect();
        assert_eq!(order, ScenarioId::ALL.to_vec());

        assert_eq!(client.sent().len(), 12);
        assert_eq!(diagnostics.blocks.lock().unwrap().len(), 12);
    }

    #[tokio::test]
    async fn test_created_id_is_reused_by_dependents() {
        let (runner, client, _) = runner(FakeReqres::default());

        runner.run().await.unwrap();

        let dependent_urls: Vec<_> = client
            .sent()
            .into_iter()
            .filter(|r| matches!(r.method, HttpMethod::Put | HttpMethod::Patch | HttpMethod::Delete))
            .map(|r| r.url)
            .collect();
        assert_eq!(
            dependent_urls,
            vec![
                format!("{BASE}/users/614"),
                format!("{BASE}/users/614"),
                format!("{BASE}/users/614"),
            ]
        );
    }

    #[tokio::test]
    async fn test_dependents_skip_when_create_fails() {
        let fake = FakeReqres {
            create_status: Some(500),
            ..Default::default()
        };
        let (runner, client, _) = runner(fake);
        let runner = runner.with_mode(RunMode::ContinueOnFailure);

        let report = runner.run().await.unwrap();

        // Both POST /users scenarios hit the failing endpoint.
        assert_eq!(report.failed, 2);
        assert_eq!(report.skipped, 3);
        assert_eq!(report.passed, 7);
        let server_error = ScenarioOutcome::Failed {
            failure: AssertionFailure::StatusMismatch {
                expected: 201,
                actual: 500,
            },
        };
        let failed: Vec<_> = report
            .results
            .iter()
            .filter(|r| r.outcome.is_failed())
            .map(|r| (r.scenario, r.outcome.clone()))
            .collect();
        assert_eq!(
            failed,
            vec![
                (ScenarioId::CreateUser, server_error.clone()),
                (ScenarioId::CreateUserEmptyBody, server_error),
            ]
        );
        for id in [ScenarioId::UpdateUserPut, ScenarioId::UpdateUserPatch, ScenarioId::DeleteUser] {
            assert!(report.result_for(id).unwrap().outcome.is_skipped(), "{id}");
        }
        assert_eq!(client.sent().len(), 9);
    }

    #[tokio::test]
    async fn test_create_without_id_fails() {
        let fake = FakeReqres {
            create_without_id: true,
            ..Default::default()
        };
        let (runner, _, _) = runner(fake);

        let report = runner.run().await.unwrap();

        assert_eq!(
            report.result_for(ScenarioId::CreateUser).unwrap().outcome,
            ScenarioOutcome::Failed {
                failure: AssertionFailure::MissingFields {
                    path: "$".to_string(),
                    fields: vec!["id".to_string()],
                }
            }
        );
    }

    #[tokio::test]
    async fn test_fail_fast_stops_at_first_failure() {
        let fake = FakeReqres {
            list_is_empty: true,
            ..Default::default()
        };
        let (runner, client, _) = runner(fake);

        let report = runner.run().await.unwrap();

        assert_eq!(report.total(), 1);
        assert!(!report.succeeded());
        assert_eq!(
            report.results[0].outcome,
            ScenarioOutcome::Failed {
                failure: AssertionFailure::EmptyCollection {
                    path: "$.data".to_string()
                }
            }
        );
        assert_eq!(client.sent().len(), 1);
    }

    #[tokio::test]
    async fn test_selection_without_create_skips_dependents() {
        let (runner, client, _) = runner(FakeReqres::default());

        let report = runner
            .run_selected(&[ScenarioId::DeleteUser, ScenarioId::GetSingleUser])
            .await
            .unwrap();

        let order: Vec<_> = report.results.iter().map(|r| r.scenario).collect();
        assert_eq!(order, vec![ScenarioId::GetSingleUser, ScenarioId::DeleteUser]);
        assert!(report.results[1].outcome.is_skipped());
        assert!(report.succeeded());
        assert_eq!(client.sent().len(), 1);
    }

    #[tokio::test]
    async fn test_transport_error_aborts_run() {
        let fake = FakeReqres {
            unreachable_path: Some("/register"),
            ..Default::default()
        };
        let (runner, client, _) = runner(fake);

        let result = runner.run().await;

        assert!(matches!(
            result,
            Err(ApplicationError::Http(HttpClientError::ConnectionRefused { .. }))
        ));
        // Nothing after the failing request was attempted.
        assert_eq!(
            client.sent().last().map(|r| r.url.clone()),
            Some(format!("{BASE}/register"))
        );
        assert_eq!(client.sent().len(), 9);
    }

    #[tokio::test]
    async fn test_diagnostics_recorded_before_assertions() {
        let fake = FakeReqres {
            create_status: Some(400),
            ..Default::default()
        };
        let (runner, _, diagnostics) = runner(fake);
        let mut ctx = RunContext::new();

        let result = runner
            .run_scenario(ScenarioId::CreateUser, &mut ctx)
            .await
            .unwrap();

        assert!(result.outcome.is_failed());
        assert!(ctx.created_user().is_none());
        let blocks = diagnostics.blocks.lock().unwrap();
        assert_eq!(blocks.len(), 1);
        assert!(blocks[0].starts_with("=== POST Request to https://reqres.in/api/users ==="));
        assert!(blocks[0].contains("Status code: 400"));
    }

    #[tokio::test]
    async fn test_skip_sends_nothing() {
        let (runner, client, diagnostics) = runner(FakeReqres::default());
        let mut ctx = RunContext::new();

        let result = runner
            .run_scenario(ScenarioId::UpdateUserPatch, &mut ctx)
            .await
            .unwrap();

        assert_eq!(
            result.outcome,
            ScenarioOutcome::skipped("no user id was captured by create_user")
        );
        assert!(client.sent().is_empty());
        assert!(diagnostics.blocks.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_reference_exchanges() {
        let (runner, _, _) = runner(FakeReqres::default());
        let mut ctx = RunContext::new();

        for id in [
            ScenarioId::GetSingleUser,
            ScenarioId::RegisterSuccessful,
            ScenarioId::RegisterUnsuccessful,
            ScenarioId::ListUsersPaginated,
        ] {
            let result = runner.run_scenario(id, &mut ctx).await.unwrap();
            assert_eq!(result.outcome, ScenarioOutcome::Passed, "{id}");
        }
    }
}
