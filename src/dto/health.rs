use serde::Serialize;
use utoipa::ToSchema;

/// DTO reporting whether the todo store is reachable
#[derive(Serialize, ToSchema)]
#[cfg_attr(test, derive(serde::Deserialize, Debug))]
pub struct HealthStatus {
    #[schema(example = "ok")]
    pub status: String,
}

impl HealthStatus {
    pub fn ok() -> Self {
        HealthStatus {
            status: "ok".to_owned(),
        }
    }

    pub fn unavailable() -> Self {
        HealthStatus {
            status: "unavailable".to_owned(),
        }
    }
}
