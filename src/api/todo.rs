use crate::domain::pagination::PageRequest;
use crate::domain::todo::driving_ports::TodoPort;
use crate::external_connections::ExternalConnectivity;
use crate::persistence::db_todo_driven_ports::{DbTodoReader, DbTodoWriter};
use crate::routing_utils::{
    ClientErrorResponse, DomainErrorResponse, Json, Query, ValidationErrorResponse,
};
use crate::{AppState, SharedData, domain, dto};
use axum::Router;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::ErrorResponse;
use axum::routing::{get, post, put};
use std::sync::Arc;
use tracing::{error, info};
use utoipa::OpenApi;
use validator::Validate;

pub const TODO_API_GROUP: &str = "Todos";

#[derive(OpenApi)]
#[openapi(paths(list_todos, create_todo, create_todos, update_todo, delete_todo))]
/// Defines the OpenAPI documentation for the todo API
pub struct TodoApi;

/// Adds routes under "/todos" to the application router
pub fn todo_routes() -> Router<Arc<SharedData>> {
    Router::new()
        .route(
            "/todos",
            get(
                |State(app_state): AppState, Query(pairs): Query<Vec<(String, String)>>| async move {
                    let mut ext_cxn = app_state.ext_cxn.clone();
                    let todo_service = domain::todo::TodoService;
                    let query = dto::ListTodosQuery::from_pairs(pairs);

                    list_todos(query, &mut ext_cxn, &todo_service).await
                },
            )
            .post(
                |State(app_state): AppState, Json(new_todo): Json<dto::NewTodo>| async move {
                    let mut ext_cxn = app_state.ext_cxn.clone();
                    let todo_service = domain::todo::TodoService;

                    create_todo(new_todo, &mut ext_cxn, &todo_service).await
                },
            ),
        )
        .route(
            "/todos/bulk",
            post(
                |State(app_state): AppState, Json(new_todos): Json<Vec<dto::NewTodo>>| async move {
                    let mut ext_cxn = app_state.ext_cxn.clone();
                    let todo_service = domain::todo::TodoService;

                    create_todos(new_todos, &mut ext_cxn, &todo_service).await
                },
            ),
        )
        .route(
            "/todos/:todo_id",
            put(
                |State(app_state): AppState,
                 Path(todo_id): Path<String>,
                 Json(update): Json<dto::UpdateTodo>| async move {
                    let mut ext_cxn = app_state.ext_cxn.clone();
                    let todo_service = domain::todo::TodoService;

                    update_todo(todo_id, update, &mut ext_cxn, &todo_service).await
                },
            )
            .delete(
                |State(app_state): AppState, Path(todo_id): Path<String>| async move {
                    let mut ext_cxn = app_state.ext_cxn.clone();
                    let todo_service = domain::todo::TodoService;

                    delete_todo(todo_id, &mut ext_cxn, &todo_service).await
                },
            ),
        )
}

/// Store failures log at error level, missing todos and bad ids at info
fn log_domain_error(action: &str, err: &domain::Error) {
    match err {
        domain::Error::PortFailure { .. } => error!("Failed to {action}: {err}"),
        _ => info!("Could not {action}: {err}"),
    }
}

/// Lists one page of todos in insertion order
#[utoipa::path(
    get,
    path = "/todos",
    tag = TODO_API_GROUP,
    params(dto::ListTodosQuery),
    responses(
        (status = 200, description = "A page of todos", body = Vec<dto::TodoItem>),
        (status = 500, response = dto::err_resps::BasicError500),
    ),
)]
async fn list_todos(
    query: dto::ListTodosQuery,
    ext_cxn: &mut impl ExternalConnectivity,
    todo_service: &impl TodoPort,
) -> Result<Json<Vec<dto::TodoItem>>, ErrorResponse> {
    let page = PageRequest::from(query);
    info!("Listing todos, {page}");
    let todo_reader = DbTodoReader;

    let todos = todo_service
        .list_todos(&page, &mut *ext_cxn, &todo_reader)
        .await
        .map_err(|err| {
            log_domain_error("list todos", &err);
            DomainErrorResponse(err)
        })?;

    Ok(Json(todos.into_iter().map(dto::TodoItem::from).collect()))
}

/// Creates a single todo
#[utoipa::path(
    post,
    path = "/todos",
    tag = TODO_API_GROUP,
    request_body = dto::NewTodo,
    responses(
        (status = 201, description = "The todo was created", body = dto::TodoItem),
        (status = 400, response = dto::err_resps::BasicError400),
        (status = 500, response = dto::err_resps::BasicError500),
    ),
)]
async fn create_todo(
    new_todo: dto::NewTodo,
    ext_cxn: &mut impl ExternalConnectivity,
    todo_service: &impl TodoPort,
) -> Result<(StatusCode, Json<dto::TodoItem>), ErrorResponse> {
    info!("Creating a todo");
    new_todo.validate().map_err(ValidationErrorResponse::from)?;

    let domain_todo = domain::todo::NewTodo::from(new_todo);
    let todo_writer = DbTodoWriter;

    let created = todo_service
        .create_todo(&domain_todo, &mut *ext_cxn, &todo_writer)
        .await
        .map_err(|err| {
            log_domain_error("create todo", &err);
            DomainErrorResponse(err)
        })?;

    Ok((StatusCode::CREATED, Json(dto::TodoItem::from(created))))
}

/// Creates a batch of todos. Either every todo in the batch is created or none are.
#[utoipa::path(
    post,
    path = "/todos/bulk",
    tag = TODO_API_GROUP,
    request_body = Vec<dto::NewTodo>,
    responses(
        (status = 201, description = "Every todo in the batch was created", body = Vec<dto::TodoItem>),
        (status = 400, response = dto::err_resps::BasicError400),
        (status = 500, response = dto::err_resps::BasicError500),
    ),
)]
async fn create_todos(
    new_todos: Vec<dto::NewTodo>,
    ext_cxn: &mut impl ExternalConnectivity,
    todo_service: &impl TodoPort,
) -> Result<(StatusCode, Json<Vec<dto::TodoItem>>), ErrorResponse> {
    info!("Creating a batch of {} todos", new_todos.len());
    if new_todos.len() > dto::MAX_BULK_TODOS {
        return Err(ClientErrorResponse(format!(
            "A batch may contain at most {} todos, received {}",
            dto::MAX_BULK_TODOS,
            new_todos.len()
        ))
        .into());
    }

    for (idx, new_todo) in new_todos.iter().enumerate() {
        new_todo
            .validate()
            .map_err(|errors| ValidationErrorResponse::for_batch_item(idx, errors))?;
    }

    let domain_todos: Vec<domain::todo::NewTodo> = new_todos
        .into_iter()
        .map(domain::todo::NewTodo::from)
        .collect();
    let todo_writer = DbTodoWriter;

    let created = todo_service
        .create_todos(&domain_todos, &mut *ext_cxn, &todo_writer)
        .await
        .map_err(|err| {
            log_domain_error("create todo batch", &err);
            DomainErrorResponse(err)
        })?;

    Ok((
        StatusCode::CREATED,
        Json(created.into_iter().map(dto::TodoItem::from).collect()),
    ))
}

/// Updates the provided fields of a todo and returns the todo as it is now stored
#[utoipa::path(
    put,
    path = "/todos/{todo_id}",
    tag = TODO_API_GROUP,
    params(("todo_id" = String, Path, description = "Id of the todo to update")),
    request_body = dto::UpdateTodo,
    responses(
        (status = 200, description = "The updated todo", body = dto::TodoItem),
        (status = 400, response = dto::err_resps::BasicError400),
        (status = 404, response = dto::err_resps::BasicError404),
        (status = 500, response = dto::err_resps::BasicError500),
    ),
)]
async fn update_todo(
    todo_id: String,
    update: dto::UpdateTodo,
    ext_cxn: &mut impl ExternalConnectivity,
    todo_service: &impl TodoPort,
) -> Result<Json<dto::TodoItem>, ErrorResponse> {
    info!("Updating todo {todo_id}");
    update.validate().map_err(ValidationErrorResponse::from)?;

    let domain_update = domain::todo::UpdateTodo::from(update);
    let todo_writer = DbTodoWriter;

    let updated = todo_service
        .update_todo(&todo_id, &domain_update, &mut *ext_cxn, &todo_writer)
        .await
        .map_err(|err| {
            log_domain_error("update todo", &err);
            DomainErrorResponse(err)
        })?;

    Ok(Json(dto::TodoItem::from(updated)))
}

/// Deletes a todo. Deleting a todo that doesn't exist still succeeds.
#[utoipa::path(
    delete,
    path = "/todos/{todo_id}",
    tag = TODO_API_GROUP,
    params(("todo_id" = String, Path, description = "Id of the todo to delete")),
    responses(
        (status = 200, description = "The todo is gone", body = dto::DeletedTodo),
        (status = 400, response = dto::err_resps::BasicError400),
        (status = 500, response = dto::err_resps::BasicError500),
    ),
)]
async fn delete_todo(
    todo_id: String,
    ext_cxn: &mut impl ExternalConnectivity,
    todo_service: &impl TodoPort,
) -> Result<Json<dto::DeletedTodo>, ErrorResponse> {
    info!("Deleting todo {todo_id}");
    let todo_writer = DbTodoWriter;

    todo_service
        .delete_todo(&todo_id, &mut *ext_cxn, &todo_writer)
        .await
        .map_err(|err| {
            log_domain_error("delete todo", &err);
            DomainErrorResponse(err)
        })?;

    Ok(Json(dto::DeletedTodo::confirmation()))
}
