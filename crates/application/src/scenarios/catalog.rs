//! Scenario definitions: what each scenario sends and what it expects back.

use reqres_domain::request::RequestSpec;
use reqres_domain::response::ResponseSpec;
use reqres_domain::testing::Assertion;
use reqres_domain::{CreatedUser, DomainError, DomainResult, Requirement, RunContext, ScenarioId};
use serde_json::{Value, json};

use crate::naming::{DEFAULT_RANDOM_LENGTH, random_string};

/// User fetched by `get_single_user`.
pub const EXISTING_USER_ID: u64 = 2;
/// User fetched by `get_missing_user`.
pub const MISSING_USER_ID: u64 = 999;
/// Page requested by `list_users_paginated`.
pub const PAGE: u64 = 2;
/// Page size requested by `list_users_paginated`.
pub const PER_PAGE: usize = 3;

const REGISTERED_EMAIL: &str = "eve.holt@reqres.in";
const REGISTER_PASSWORD: &str = "pistol";
const LOGIN_PASSWORD: &str = "cityslicka";
const UNREGISTERED_EMAIL: &str = "sydney@fife";

const CREATED_JOB: &str = "QA Engineer";
const UPDATED_JOB: &str = "Senior QA Engineer";
const PATCHED_JOB: &str = "Lead QA Engineer";

const USER_FIELDS: [&str; 4] = ["id", "email", "first_name", "last_name"];

/// One scenario ready to execute: the request to send and the checks to run.
#[derive(Debug, Clone, PartialEq)]
pub struct ScenarioPlan {
    /// Which scenario this is.
    pub scenario: ScenarioId,
    /// Request to send.
    pub request: RequestSpec,
    /// Checks, evaluated in order.
    pub assertions: Vec<Assertion>,
}

impl ScenarioPlan {
    fn new(scenario: ScenarioId, request: RequestSpec, assertions: Vec<Assertion>) -> Self {
        Self {
            scenario,
            request,
            assertions,
        }
    }

    /// Records what a passed scenario hands to later ones.
    ///
    /// `create_user` stores the new user; the update scenarios refresh the
    /// stored name and job. Returns true if the context changed.
    pub fn capture(&self, response: &ResponseSpec, ctx: &mut RunContext) -> bool {
        match self.scenario {
            ScenarioId::CreateUser => match self.created_user(response) {
                Ok(user) => {
                    tracing::debug!(id = %user.id, "captured created user");
                    ctx.set_created_user(user);
                    true
                }
                Err(e) => {
                    tracing::warn!(error = %e, "create_user passed but no id was captured");
                    false
                }
            },
            ScenarioId::UpdateUserPut | ScenarioId::UpdateUserPatch => {
                let Some(user) = ctx.created_user_mut() else {
                    return false;
                };
                if let Some(name) = self.sent_str("name") {
                    user.name = name.to_string();
                }
                if let Some(job) = self.sent_str("job") {
                    user.job = job.to_string();
                }
                true
            }
            _ => false,
        }
    }

    fn created_user(&self, response: &ResponseSpec) -> DomainResult<CreatedUser> {
        let id = response
            .body_as_json()
            .ok()
            .as_ref()
            .and_then(|json| json.get("id"))
            .and_then(id_as_string)
            .ok_or_else(|| DomainError::InvalidIdentifier("response has no usable id".to_string()))?;

        CreatedUser::new(
            id,
            self.sent_str("name").unwrap_or_default(),
            self.sent_str("job").unwrap_or_default(),
        )
    }

    fn sent_str(&self, field: &str) -> Option<&str> {
        self.request.body.as_ref()?.get(field)?.as_str()
    }
}

fn id_as_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Builds scenario plans against one base URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScenarioCatalog {
    base_url: String,
    name_length: usize,
}

impl ScenarioCatalog {
    /// Creates a catalog for the given base URL (e.g. `https://reqres.in/api`).
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidUrl` if the base URL does not parse or is
    /// not http(s).
    pub fn new(base_url: impl Into<String>) -> DomainResult<Self> {
        let base_url = base_url.into().trim().trim_end_matches('/').to_string();
        let parsed = RequestSpec::get(base_url.as_str()).full_url()?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(DomainError::InvalidUrl(format!(
                "URL must start with http:// or https://: {base_url}"
            )));
        }

        Ok(Self {
            base_url,
            name_length: DEFAULT_RANDOM_LENGTH,
        })
    }

    /// Sets the length of the random suffix in generated user names.
    #[must_use]
    pub const fn with_name_length(mut self, name_length: usize) -> Self {
        self.name_length = name_length;
        self
    }

    /// The base URL without trailing slash.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// Builds the plan for `scenario`.
    ///
    /// # Errors
    ///
    /// Returns the unmet requirement when the scenario depends on state the
    /// context does not hold.
    pub fn plan(&self, scenario: ScenarioId, ctx: &RunContext) -> Result<ScenarioPlan, Requirement> {
        let created = || ctx.created_user().ok_or(Requirement::CreatedUser);

        Ok(match scenario {
            ScenarioId::ListUsers => self.list_users(),
            ScenarioId::GetSingleUser => self.get_single_user(),
            ScenarioId::CreateUser => self.create_user(),
            ScenarioId::UpdateUserPut => self.update_user_put(created()?),
            ScenarioId::UpdateUserPatch => self.update_user_patch(created()?),
            ScenarioId::DeleteUser => self.delete_user(created()?),
            ScenarioId::GetMissingUser => self.get_missing_user(),
            ScenarioId::CreateUserEmptyBody => self.create_user_empty_body(),
            ScenarioId::RegisterSuccessful => self.register_successful(),
            ScenarioId::RegisterUnsuccessful => self.register_unsuccessful(),
            ScenarioId::ListUsersPaginated => self.list_users_paginated(),
            ScenarioId::LoginSuccessful => self.login_successful(),
        })
    }

    /// GET /users: a non-empty page whose users all carry the basic fields.
    #[must_use]
    pub fn list_users(&self) -> ScenarioPlan {
        ScenarioPlan::new(
            ScenarioId::ListUsers,
            RequestSpec::get(self.url("/users")),
            vec![
                Assertion::status(200),
                Assertion::fields("$", &["data", "page"]),
                Assertion::not_empty("$.data"),
                Assertion::each_has_fields("$.data", &USER_FIELDS),
            ],
        )
    }

    /// GET /users/2.
    #[must_use]
    pub fn get_single_user(&self) -> ScenarioPlan {
        ScenarioPlan::new(
            ScenarioId::GetSingleUser,
            RequestSpec::get(self.url(&format!("/users/{EXISTING_USER_ID}"))),
            vec![
                Assertion::status(200),
                Assertion::fields("$", &["data"]),
                Assertion::equals("$.data.id", EXISTING_USER_ID),
                Assertion::fields("$.data", &["email", "first_name", "last_name"]),
                Assertion::contains("$.data.email", "@"),
            ],
        )
    }

    /// POST /users with a random name.
    #[must_use]
    pub fn create_user(&self) -> ScenarioPlan {
        let name = format!("Test User {}", random_string(self.name_length));
        ScenarioPlan::new(
            ScenarioId::CreateUser,
            RequestSpec::post(self.url("/users"), json!({"name": name, "job": CREATED_JOB})),
            vec![
                Assertion::status(201),
                Assertion::fields("$", &["id", "name"]),
                Assertion::equals("$.name", name),
            ],
        )
    }

    /// PUT /users/{id} replacing name and job.
    #[must_use]
    pub fn update_user_put(&self, user: &CreatedUser) -> ScenarioPlan {
        let name = format!("Updated User {}", random_string(self.name_length));
        ScenarioPlan::new(
            ScenarioId::UpdateUserPut,
            RequestSpec::put(
                self.url(&format!("/users/{}", user.id)),
                json!({"name": name, "job": UPDATED_JOB}),
            ),
            vec![
                Assertion::status(200),
                Assertion::fields("$", &["name"]),
                Assertion::equals("$.name", name),
            ],
        )
    }

    /// PATCH /users/{id} changing the job only.
    #[must_use]
    pub fn update_user_patch(&self, user: &CreatedUser) -> ScenarioPlan {
        ScenarioPlan::new(
            ScenarioId::UpdateUserPatch,
            RequestSpec::patch(
                self.url(&format!("/users/{}", user.id)),
                json!({"job": PATCHED_JOB}),
            ),
            vec![
                Assertion::status(200),
                Assertion::fields("$", &["job"]),
                Assertion::equals("$.job", PATCHED_JOB),
            ],
        )
    }

    /// DELETE /users/{id}; the service answers 204 with no body.
    #[must_use]
    pub fn delete_user(&self, user: &CreatedUser) -> ScenarioPlan {
        ScenarioPlan::new(
            ScenarioId::DeleteUser,
            RequestSpec::delete(self.url(&format!("/users/{}", user.id))),
            vec![Assertion::status(204), Assertion::EmptyBody],
        )
    }

    /// GET /users/999.
    #[must_use]
    pub fn get_missing_user(&self) -> ScenarioPlan {
        ScenarioPlan::new(
            ScenarioId::GetMissingUser,
            RequestSpec::get(self.url(&format!("/users/{MISSING_USER_ID}"))),
            vec![Assertion::status(404)],
        )
    }

    /// POST /users with `{}`.
    ///
    /// The demo service accepts an empty body, so this pins that behavior
    /// rather than a general API contract.
    #[must_use]
    pub fn create_user_empty_body(&self) -> ScenarioPlan {
        ScenarioPlan::new(
            ScenarioId::CreateUserEmptyBody,
            RequestSpec::post(self.url("/users"), json!({})),
            vec![Assertion::status(201)],
        )
    }

    /// POST /register with a known email and password.
    #[must_use]
    pub fn register_successful(&self) -> ScenarioPlan {
        ScenarioPlan::new(
            ScenarioId::RegisterSuccessful,
            RequestSpec::post(
                self.url("/register"),
                json!({"email": REGISTERED_EMAIL, "password": REGISTER_PASSWORD}),
            ),
            vec![Assertion::status(200), Assertion::fields("$", &["token", "id"])],
        )
    }

    /// POST /register without a password.
    #[must_use]
    pub fn register_unsuccessful(&self) -> ScenarioPlan {
        ScenarioPlan::new(
            ScenarioId::RegisterUnsuccessful,
            RequestSpec::post(self.url("/register"), json!({"email": UNREGISTERED_EMAIL})),
            vec![Assertion::status(400), Assertion::fields("$", &["error"])],
        )
    }

    /// GET /users?page=2&per_page=3.
    #[must_use]
    pub fn list_users_paginated(&self) -> ScenarioPlan {
        ScenarioPlan::new(
            ScenarioId::ListUsersPaginated,
            RequestSpec::get(self.url("/users"))
                .with_query("page", PAGE)
                .with_query("per_page", PER_PAGE),
            vec![
                Assertion::status(200),
                Assertion::fields("$", &["page"]),
                Assertion::equals("$.page", PAGE),
                Assertion::fields("$", &["data"]),
                Assertion::max_items("$.data", PER_PAGE),
            ],
        )
    }

    /// POST /login with valid credentials.
    #[must_use]
    pub fn login_successful(&self) -> ScenarioPlan {
        ScenarioPlan::new(
            ScenarioId::LoginSuccessful,
            RequestSpec::post(
                self.url("/login"),
                json!({"email": REGISTERED_EMAIL, "password": LOGIN_PASSWORD}),
            ),
            vec![Assertion::status(200), Assertion::fields("$", &["token"])],
        )
    }
}
