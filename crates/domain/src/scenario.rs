//! Scenario identifiers and the state shared between scenarios.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult};
use crate::request::HttpMethod;

/// The named scenarios, in catalog order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScenarioId {
    /// GET /users
    ListUsers,
    /// GET /users/2
    GetSingleUser,
    /// POST /users
    CreateUser,
    /// PUT /users/{id}
    UpdateUserPut,
    /// PATCH /users/{id}
    UpdateUserPatch,
    /// DELETE /users/{id}
    DeleteUser,
    /// GET /users/999
    GetMissingUser,
    /// POST /users with `{}`
    CreateUserEmptyBody,
    /// POST /register with email and password
    RegisterSuccessful,
    /// POST /register without password
    RegisterUnsuccessful,
    /// GET /users?page=2&per_page=3
    ListUsersPaginated,
    /// POST /login
    LoginSuccessful,
}

impl ScenarioId {
    /// Every scenario in execution order.
    pub const ALL: [Self; 12] = [
        Self::ListUsers,
        Self::GetSingleUser,
        Self::CreateUser,
        Self::UpdateUserPut,
        Self::UpdateUserPatch,
        Self::DeleteUser,
        Self::GetMissingUser,
        Self::CreateUserEmptyBody,
        Self::RegisterSuccessful,
        Self::RegisterUnsuccessful,
        Self::ListUsersPaginated,
        Self::LoginSuccessful,
    ];

    /// Stable snake_case name used on the command line and in reports.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::ListUsers => "list_users",
            Self::GetSingleUser => "get_single_user",
            Self::CreateUser => "create_user",
            Self::UpdateUserPut => "update_user_put",
            Self::UpdateUserPatch => "update_user_patch",
            Self::DeleteUser => "delete_user",
            Self::GetMissingUser => "get_missing_user",
            Self::CreateUserEmptyBody => "create_user_empty_body",
            Self::RegisterSuccessful => "register_successful",
            Self::RegisterUnsuccessful => "register_unsuccessful",
            Self::ListUsersPaginated => "list_users_paginated",
            Self::LoginSuccessful => "login_successful",
        }
    }

    /// One-line summary of what the scenario checks.
    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::ListUsers => "List users and check every entry's fields",
            Self::GetSingleUser => "Fetch user 2 and check its data",
            Self::CreateUser => "Create a user and capture its id",
            Self::UpdateUserPut => "Replace the created user",
            Self::UpdateUserPatch => "Partially update the created user",
            Self::DeleteUser => "Delete the created user",
            Self::GetMissingUser => "Fetch a user that does not exist",
            Self::CreateUserEmptyBody => "Create a user with an empty body",
            Self::RegisterSuccessful => "Register with email and password",
            Self::RegisterUnsuccessful => "Register without a password",
            Self::ListUsersPaginated => "List users page 2 with 3 per page",
            Self::LoginSuccessful => "Log in with valid credentials",
        }
    }

    /// HTTP method the scenario issues.
    #[must_use]
    pub const fn method(self) -> HttpMethod {
        match self {
            Self::ListUsers | Self::GetSingleUser | Self::GetMissingUser | Self::ListUsersPaginated => {
                HttpMethod::Get
            }
            Self::CreateUser
            | Self::CreateUserEmptyBody
            | Self::RegisterSuccessful
            | Self::RegisterUnsuccessful
            | Self::LoginSuccessful => HttpMethod::Post,
            Self::UpdateUserPut => HttpMethod::Put,
            Self::UpdateUserPatch => HttpMethod::Patch,
            Self::DeleteUser => HttpMethod::Delete,
        }
    }

    /// What the scenario needs from earlier scenarios, if anything.
    #[must_use]
    pub const fn requirement(self) -> Option<Requirement> {
        match self {
            Self::UpdateUserPut | Self::UpdateUserPatch | Self::DeleteUser => {
                Some(Requirement::CreatedUser)
            }
            _ => None,
        }
    }
}

impl fmt::Display for ScenarioId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ScenarioId {
    type Err = DomainError;

    fn from_str(s: &str) -> DomainResult<Self> {
        let wanted = s.trim().replace('-', "_").to_lowercase();
        Self::ALL
            .into_iter()
            .find(|id| id.name() == wanted)
            .ok_or_else(|| DomainError::UnknownScenario(s.to_string()))
    }
}

/// A precondition a scenario declares on the run context.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Requirement {
    /// A user created earlier in the run.
    CreatedUser,
}

impl Requirement {
    /// Reason reported when the requirement is unmet.
    #[must_use]
    pub const fn unmet_reason(self) -> &'static str {
        match self {
            Self::CreatedUser => "no user id was captured by create_user",
        }
    }
}

/// A user created during the run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatedUser {
    /// Server-assigned identifier.
    pub id: String,
    /// Last name sent for this user.
    pub name: String,
    /// Last job sent for this user.
    pub job: String,
}

impl CreatedUser {
    /// Creates a record for a freshly created user.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidIdentifier` if `id` is blank.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        job: impl Into<String>,
    ) -> DomainResult<Self> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err(DomainError::InvalidIdentifier(
                "created user id is empty".to_string(),
            ));
        }
        Ok(Self {
            id,
            name: name.into(),
            job: job.into(),
        })
    }
}

/// State handed from one scenario to the next.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunContext {
    created_user: Option<CreatedUser>,
}

impl RunContext {
    /// Creates an empty context.
    #[must_use]
    pub const fn new() -> Self {
        Self { created_user: None }
    }

    /// The user captured by `create_user`, if any.
    #[must_use]
    pub const fn created_user(&self) -> Option<&CreatedUser> {
        self.created_user.as_ref()
    }

    /// Mutable access to the captured user.
    pub const fn created_user_mut(&mut self) -> Option<&mut CreatedUser> {
        self.created_user.as_mut()
    }

    /// Stores the created user, replacing any earlier one.
    pub fn set_created_user(&mut self, user: CreatedUser) {
        self.created_user = Some(user);
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_catalog_order() {
        assert_eq!(ScenarioId::ALL.first(), Some(&ScenarioId::ListUsers));
        assert_eq!(ScenarioId::ALL.last(), Some(&ScenarioId::LoginSuccessful));

        let create = ScenarioId::ALL
            .iter()
            .position(|id| *id == ScenarioId::CreateUser)
            .unwrap();
        for dependent in ScenarioId::ALL.iter().filter(|id| id.requirement().is_some()) {
            let pos = ScenarioId::ALL.iter().position(|id| id == dependent).unwrap();
            assert!(pos > create, "{dependent} must come after create_user");
        }
    }

    #[test]
    fn test_scenario_name_round_trip() {
        for id in ScenarioId::ALL {
            assert_eq!(id.name().parse::<ScenarioId>().unwrap(), id);
        }
        assert_eq!(
            "Delete-User".parse::<ScenarioId>().unwrap(),
            ScenarioId::DeleteUser
        );
    }

    #[test]
    fn test_unknown_scenario() {
        assert_eq!(
            "drop_database".parse::<ScenarioId>(),
            Err(DomainError::UnknownScenario("drop_database".to_string()))
        );
    }

    #[test]
    fn test_dependent_scenarios() {
        let dependents: Vec<_> = ScenarioId::ALL
            .into_iter()
            .filter(|id| id.requirement() == Some(Requirement::CreatedUser))
            .collect();
        assert_eq!(
            dependents,
            vec![
                ScenarioId::UpdateUserPut,
                ScenarioId::UpdateUserPatch,
                ScenarioId::DeleteUser
            ]
        );
    }

    #[test]
    fn test_created_user_rejects_blank_id() {
        assert!(CreatedUser::new("  ", "Ann", "QA").is_err());
        assert!(CreatedUser::new("42", "Ann", "QA").is_ok());
    }

    #[test]
    fn test_run_context_lifecycle() {
        let mut ctx = RunContext::new();
        assert!(ctx.created_user().is_none());

        ctx.set_created_user(CreatedUser::new("42", "Ann", "QA").unwrap());
        assert_eq!(ctx.created_user().map(|u| u.id.as_str()), Some("42"));

        if let Some(user) = ctx.created_user_mut() {
            user.job = "Lead".to_string();
        }
        assert_eq!(ctx.created_user().map(|u| u.job.as_str()), Some("Lead"));
    }
}
