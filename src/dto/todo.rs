use crate::domain;
use crate::domain::pagination::PageRequest;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

/// Most todos a single bulk request may create
pub const MAX_BULK_TODOS: usize = 1_000;

/// DTO for a todo returned by the API
#[derive(Serialize, ToSchema)]
#[cfg_attr(test, derive(Deserialize, PartialEq, Eq, Debug))]
pub struct TodoItem {
    #[serde(rename = "_id")]
    #[schema(example = "665f1c2e9b1d8e3a4c7f0a12")]
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(example = "Pick up groceries")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(example = "2024-06-04")]
    pub date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(example = "errands")]
    pub label: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(example = false)]
    pub pinned: Option<bool>,
}

impl From<domain::todo::TodoItem> for TodoItem {
    fn from(value: domain::todo::TodoItem) -> Self {
        TodoItem {
            id: value.id,
            text: value.text,
            date: value.date,
            label: value.label,
            pinned: value.pinned,
        }
    }
}

/// DTO for creating a todo via the API. Every field is optional.
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[cfg_attr(test, derive(Serialize, Default))]
pub struct NewTodo {
    #[validate(length(max = 10000))]
    #[schema(example = "Pick up groceries")]
    pub text: Option<String>,
    #[validate(length(max = 64))]
    #[schema(example = "2024-06-04")]
    pub date: Option<String>,
    #[validate(length(max = 100))]
    #[schema(example = "errands")]
    pub label: Option<String>,
    #[schema(example = false)]
    pub pinned: Option<bool>,
}

impl From<NewTodo> for domain::todo::NewTodo {
    fn from(value: NewTodo) -> Self {
        domain::todo::NewTodo {
            text: value.text,
            date: value.date,
            label: value.label,
            pinned: value.pinned,
        }
    }
}

/// DTO for updating a todo via the API. Omitted (or null) fields keep their current value.
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[cfg_attr(test, derive(Serialize, Default))]
pub struct UpdateTodo {
    #[validate(length(max = 10000))]
    pub text: Option<String>,
    #[validate(length(max = 64))]
    pub date: Option<String>,
    #[validate(length(max = 100))]
    pub label: Option<String>,
    #[schema(example = true)]
    pub pinned: Option<bool>,
}

impl From<UpdateTodo> for domain::todo::UpdateTodo {
    fn from(value: UpdateTodo) -> Self {
        domain::todo::UpdateTodo {
            text: value.text,
            date: value.date,
            label: value.label,
            pinned: value.pinned,
        }
    }
}

/// Query parameters for paging through todos. Values that don't start with a positive integer
/// fall back to the defaults (page 1, 20 per page) and the page size is capped at 100.
#[derive(Debug, Default, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListTodosQuery {
    /// 1-based page number
    #[param(example = "1")]
    pub page: Option<String>,
    /// Number of todos per page
    #[param(example = "20")]
    pub limit: Option<String>,
}

impl ListTodosQuery {
    /// Picks the paging parameters out of raw query pairs. When a key repeats, the first
    /// value wins.
    pub fn from_pairs(pairs: Vec<(String, String)>) -> Self {
        let mut query = ListTodosQuery::default();
        for (key, value) in pairs {
            let slot = match key.as_str() {
                "page" => &mut query.page,
                "limit" => &mut query.limit,
                _ => continue,
            };
            if slot.is_none() {
                *slot = Some(value);
            }
        }

        query
    }
}

/// Reads the run of digits at the start of a parameter ("25items" is 25, "10.5" is 10).
/// Anything without leading digits is treated as absent; oversized numbers saturate.
fn leading_number(raw: &Option<String>) -> Option<u64> {
    let trimmed = raw.as_deref()?.trim_start();
    let unsigned = trimmed.strip_prefix('+').unwrap_or(trimmed);
    let digit_count = unsigned
        .bytes()
        .take_while(|byte| byte.is_ascii_digit())
        .count();
    if digit_count == 0 {
        return None;
    }

    Some(unsigned[..digit_count].parse().unwrap_or(u64::MAX))
}

impl From<ListTodosQuery> for PageRequest {
    fn from(value: ListTodosQuery) -> Self {
        PageRequest::new(leading_number(&value.page), leading_number(&value.limit))
    }
}

/// DTO confirming a todo was removed
#[derive(Serialize, ToSchema)]
#[cfg_attr(test, derive(Deserialize, Debug))]
pub struct DeletedTodo {
    #[schema(example = "Todo deleted")]
    pub message: String,
}

impl DeletedTodo {
    pub fn confirmation() -> Self {
        DeletedTodo {
            message: "Todo deleted".to_owned(),
        }
    }
}
