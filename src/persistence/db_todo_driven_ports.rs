use crate::domain;
use crate::domain::pagination::PageRequest;
use crate::domain::todo::{NewTodo, TodoItem, UpdateTodo};
use crate::domain::DrivenPortError;
use crate::external_connections::{ConnectionHandle, ExternalConnectivity};
use anyhow::Context;
use futures::TryStreamExt;
use mongodb::bson::oid::ObjectId;
use mongodb::bson::{doc, Document};
use mongodb::options::{FindOneAndUpdateOptions, FindOptions, ReturnDocument};
use mongodb::Collection;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Collection the todos live in
pub const TODO_COLLECTION: &str = "todos";

/// Shape of a todo as stored in MongoDB
#[derive(Debug, Serialize, Deserialize)]
struct TodoDocument {
    #[serde(rename = "_id")]
    id: ObjectId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pinned: Option<bool>,
}

impl TodoDocument {
    fn from_new(new_todo: &NewTodo) -> Self {
        TodoDocument {
            id: ObjectId::new(),
            text: new_todo.text.clone(),
            date: new_todo.date.clone(),
            label: new_todo.label.clone(),
            pinned: new_todo.pinned,
        }
    }
}

impl From<TodoDocument> for domain::todo::TodoItem {
    fn from(value: TodoDocument) -> Self {
        TodoItem {
            id: value.id.to_hex(),
            text: value.text,
            date: value.date,
            label: value.label,
            pinned: value.pinned,
        }
    }
}

fn todo_collection(cxn: &impl ConnectionHandle) -> Collection<TodoDocument> {
    cxn.database().collection(TODO_COLLECTION)
}

fn parse_todo_id(todo_id: &str) -> Result<ObjectId, DrivenPortError> {
    ObjectId::parse_str(todo_id).map_err(|_| DrivenPortError::MalformedId(todo_id.to_owned()))
}

/// Builds the `$set` body for a partial update, skipping fields the caller left out
fn set_document(update: &UpdateTodo) -> Document {
    let mut fields = Document::new();
    if let Some(text) = &update.text {
        fields.insert("text", text.as_str());
    }
    if let Some(date) = &update.date {
        fields.insert("date", date.as_str());
    }
    if let Some(label) = &update.label {
        fields.insert("label", label.as_str());
    }
    if let Some(pinned) = update.pinned {
        fields.insert("pinned", pinned);
    }

    fields
}

pub struct DbTodoReader;

impl domain::todo::driven_ports::TodoReader for DbTodoReader {
    async fn list_todos(
        &self,
        page: &PageRequest,
        ext_cxn: &mut impl ExternalConnectivity,
    ) -> Result<Vec<TodoItem>, anyhow::Error> {
        let cxn = ext_cxn.database_cxn().await?;

        // The server stores skip as a signed 64-bit value
        let options = FindOptions::builder()
            .sort(doc! { "_id": 1 })
            .skip(page.skip().min(i64::MAX as u64))
            .limit(page.limit() as i64)
            .build();

        let todos: Vec<TodoItem> = todo_collection(&cxn)
            .find(None, options)
            .await
            .context("trying to query a page of todos")?
            .try_collect::<Vec<TodoDocument>>()
            .await
            .context("trying to read a page of todos")?
            .into_iter()
            .map(TodoItem::from)
            .collect();

        Ok(todos)
    }
}

pub struct DbTodoWriter;

impl domain::todo::driven_ports::TodoWriter for DbTodoWriter {
    async fn create_todo(
        &self,
        new_todo: &NewTodo,
        ext_cxn: &mut impl ExternalConnectivity,
    ) -> Result<TodoItem, anyhow::Error> {
        let cxn = ext_cxn.database_cxn().await?;
        let document = TodoDocument::from_new(new_todo);

        todo_collection(&cxn)
            .insert_one(&document, None)
            .await
            .context("trying to insert a new todo into the database")?;

        Ok(TodoItem::from(document))
    }

    async fn create_todos(
        &self,
        new_todos: &[NewTodo],
        ext_cxn: &mut impl ExternalConnectivity,
    ) -> Result<Vec<TodoItem>, anyhow::Error> {
        if new_todos.is_empty() {
            return Ok(Vec::new());
        }

        let cxn = ext_cxn.database_cxn().await?;
        let collection = todo_collection(&cxn);
        let documents: Vec<TodoDocument> = new_todos.iter().map(TodoDocument::from_new).collect();

        if let Err(insert_err) = collection.insert_many(&documents, None).await {
            // Ids are generated here, so whatever made it in before the failure can be undone
            let batch_ids: Vec<ObjectId> = documents.iter().map(|document| document.id).collect();
            match collection
                .delete_many(doc! { "_id": { "$in": batch_ids } }, None)
                .await
            {
                Ok(rollback) => debug!(
                    "Rolled back {} todos from a failed batch insert",
                    rollback.deleted_count
                ),
                Err(rollback_err) => warn!(
                    "Could not roll back a partially inserted todo batch: {rollback_err}"
                ),
            }

            return Err(anyhow::Error::new(insert_err)
                .context("trying to insert a batch of todos into the database"));
        }

        Ok(documents.into_iter().map(TodoItem::from).collect())
    }

    async fn update_todo(
        &self,
        todo_id: &str,
        update: &UpdateTodo,
        ext_cxn: &mut impl ExternalConnectivity,
    ) -> Result<TodoItem, DrivenPortError> {
        let object_id = parse_todo_id(todo_id)?;
        let cxn = ext_cxn.database_cxn().await?;
        let collection = todo_collection(&cxn);
        let filter = doc! { "_id": object_id };

        let updated = if update.is_empty() {
            collection
                .find_one(filter, None)
                .await
                .context("trying to fetch a todo by ID")?
        } else {
            let options = FindOneAndUpdateOptions::builder()
                .return_document(ReturnDocument::After)
                .build();

            collection
                .find_one_and_update(filter, doc! { "$set": set_document(update) }, options)
                .await
                .context("trying to update a todo in the database")?
        };

        updated
            .map(TodoItem::from)
            .ok_or(DrivenPortError::DoesNotExist)
    }

    async fn delete_todo(
        &self,
        todo_id: &str,
        ext_cxn: &mut impl ExternalConnectivity,
    ) -> Result<(), DrivenPortError> {
        let object_id = parse_todo_id(todo_id)?;
        let cxn = ext_cxn.database_cxn().await?;

        let delete_result = todo_collection(&cxn)
            .delete_one(doc! { "_id": object_id }, None)
            .await
            .context("trying to remove a todo from the database")?;
        if delete_result.deleted_count == 0 {
            debug!("Todo {todo_id} was already gone");
        }

        Ok(())
    }
}
