use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::sync::Arc;
use thiserror::Error;

use crate::matches::MatchService;
use crate::roster::{PlayerRoster, RosterError};
use crate::scoring::{ConfigError, SnapshotError};
use crate::stats::{StatsError, StatsService};

/// Shared application state containing all dependencies
#[derive(Clone)]
pub struct AppState {
    pub roster: Arc<dyn PlayerRoster>,
    pub match_service: Arc<MatchService>,
    pub stats_service: Arc<StatsService>,
}

impl AppState {
    pub fn new(
        roster: Arc<dyn PlayerRoster>,
        match_service: Arc<MatchService>,
        stats_service: Arc<StatsService>,
    ) -> Self {
        Self {
            roster,
            match_service,
            stats_service,
        }
    }
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Internal server error")]
    Internal,
}

impl From<ConfigError> for AppError {
    fn from(err: ConfigError) -> Self {
        AppError::BadRequest(err.to_string())
    }
}

impl From<SnapshotError> for AppError {
    fn from(err: SnapshotError) -> Self {
        tracing::error!(error = %err, "Stored snapshot could not be restored");
        AppError::Internal
    }
}

impl From<StatsError> for AppError {
    fn from(err: StatsError) -> Self {
        match err {
            StatsError::Validation(msg) => AppError::BadRequest(msg),
        }
    }
}

impl From<RosterError> for AppError {
    fn from(err: RosterError) -> Self {
        match err {
            RosterError::AlreadyRegistered { .. } => AppError::Conflict(err.to_string()),
            RosterError::InvalidId { .. } | RosterError::EmptyName => {
                AppError::BadRequest(err.to_string())
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, msg),
            AppError::Internal => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".to_string(),
            ),
        };

        let body = Json(json!({
            "error": error_message
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
pub mod test_utils {
    use super::*;
    use crate::matches::{InMemorySnapshotStore, SnapshotStore};
    use crate::roster::InMemoryPlayerRoster;
    use crate::stats::InMemoryStatsRepository;

    /// Builder for creating AppState with overrides for testing
    pub struct AppStateBuilder {
        roster: Option<Arc<dyn PlayerRoster>>,
        stats_service: Option<Arc<StatsService>>,
        snapshots: Option<Arc<dyn SnapshotStore>>,
    }

    impl AppStateBuilder {
        pub fn new() -> Self {
            Self {
                roster: None,
                stats_service: None,
                snapshots: None,
            }
        }

        pub fn with_roster(mut self, roster: Arc<dyn PlayerRoster>) -> Self {
            self.roster = Some(roster);
            self
        }

        pub fn with_stats_service(mut self, stats_service: Arc<StatsService>) -> Self {
            self.stats_service = Some(stats_service);
            self
        }

        pub fn with_snapshot_store(mut self, snapshots: Arc<dyn SnapshotStore>) -> Self {
            self.snapshots = Some(snapshots);
            self
        }

        pub fn build(self) -> AppState {
            let roster = self
                .roster
                .unwrap_or_else(|| Arc::new(InMemoryPlayerRoster::new()));
            let stats_service = self.stats_service.unwrap_or_else(|| {
                Arc::new(StatsService::new(Arc::new(InMemoryStatsRepository::new())))
            });
            let snapshots = self
                .snapshots
                .unwrap_or_else(|| Arc::new(InMemorySnapshotStore::new()));
            let match_service = Arc::new(MatchService::new(
                Arc::clone(&roster),
                Arc::clone(&stats_service),
                snapshots,
            ));

            AppState::new(roster, match_service, stats_service)
        }
    }

    impl Default for AppStateBuilder {
        fn default() -> Self {
            Self::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(AppError::BadRequest("nope".to_string()), StatusCode::BAD_REQUEST)]
    #[case(AppError::NotFound("gone".to_string()), StatusCode::NOT_FOUND)]
    #[case(AppError::Conflict("taken".to_string()), StatusCode::CONFLICT)]
    #[case(AppError::Internal, StatusCode::INTERNAL_SERVER_ERROR)]
    fn maps_errors_to_status_codes(#[case] error: AppError, #[case] expected: StatusCode) {
        assert_eq!(error.into_response().status(), expected);
    }

    #[test]
    fn roster_conflicts_become_409() {
        let err = RosterError::AlreadyRegistered {
            id: "p1".to_string(),
            existing_name: "Alice".to_string(),
        };

        assert!(matches!(AppError::from(err), AppError::Conflict(_)));
    }

    #[test]
    fn invalid_configuration_is_a_bad_request() {
        assert!(matches!(
            AppError::from(ConfigError::ZeroTarget),
            AppError::BadRequest(_)
        ));
    }
}
