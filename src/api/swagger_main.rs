use crate::dto;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[derive(OpenApi)]
#[openapi(info(
    title = "Todo REST API",
    description = "Create, list, update and delete todos kept in MongoDB"
))]
struct ServiceApi;

/// Constructs the route on the API that renders the swagger UI and returns the OpenAPI schema.
/// Pulls in the DTO schemas from [dto] and the paths declared by each [api][crate::api] submodule.
pub fn build_documentation() -> SwaggerUi {
    let mut api_docs = ServiceApi::openapi();
    api_docs.merge(dto::OpenApiSchemas::openapi());
    api_docs.merge(super::root::RootApi::openapi());
    api_docs.merge(super::todo::TodoApi::openapi());

    SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", api_docs)
}
