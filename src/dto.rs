use utoipa::OpenApi;

mod health;
mod todo;

pub use health::*;
pub use todo::*;

/// Collects the DTO schemas so they can be merged into the API documentation
#[derive(OpenApi)]
#[openapi(components(
    schemas(
        TodoItem,
        NewTodo,
        UpdateTodo,
        DeletedTodo,
        HealthStatus,
        crate::routing_utils::BasicErrorResponse
    ),
    responses(err_resps::BasicError400, err_resps::BasicError404, err_resps::BasicError500)
))]
pub struct OpenApiSchemas;

/// Canned error responses for the OpenAPI documentation
pub mod err_resps {
    use crate::routing_utils::BasicErrorResponse;
    use utoipa::ToResponse;

    #[derive(ToResponse)]
    #[response(
        description = "The request was malformed or failed validation",
        example = json!({ "message": "The passed request body contained malformed or unreadable JSON. Failed to deserialize the JSON body into the target type: pinned: invalid type: string \"yes\", expected a boolean at line 1 column 16" })
    )]
    pub struct BasicError400(BasicErrorResponse);

    #[derive(ToResponse)]
    #[response(
        description = "The requested todo does not exist",
        example = json!({ "message": "todo 665f1c2e9b1d8e3a4c7f0a12 does not exist" })
    )]
    pub struct BasicError404(BasicErrorResponse);

    #[derive(ToResponse)]
    #[response(
        description = "The todo store could not be reached",
        example = json!({ "message": "Could not access data to complete your request" })
    )]
    pub struct BasicError500(BasicErrorResponse);
}
