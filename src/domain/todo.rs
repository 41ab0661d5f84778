use crate::domain::pagination::PageRequest;
use crate::domain::todo::driven_ports::{TodoReader, TodoWriter};
use crate::domain::Error;
use crate::external_connections::ExternalConnectivity;
use tracing::{debug, info};

/// A persisted todo item. Every field other than the identifier is optional.
#[derive(PartialEq, Eq, Debug)]
#[cfg_attr(test, derive(Clone))]
pub struct TodoItem {
    pub id: String,
    pub text: Option<String>,
    pub date: Option<String>,
    pub label: Option<String>,
    pub pinned: Option<bool>,
}

#[derive(PartialEq, Eq, Debug, Default)]
#[cfg_attr(test, derive(Clone))]
pub struct NewTodo {
    pub text: Option<String>,
    pub date: Option<String>,
    pub label: Option<String>,
    pub pinned: Option<bool>,
}

/// The fields to overwrite on an existing todo. [None] means "leave this field alone".
#[derive(PartialEq, Eq, Debug, Default)]
#[cfg_attr(test, derive(Clone))]
pub struct UpdateTodo {
    pub text: Option<String>,
    pub date: Option<String>,
    pub label: Option<String>,
    pub pinned: Option<bool>,
}

impl UpdateTodo {
    /// True when the update would not change any field
    pub fn is_empty(&self) -> bool {
        self.text.is_none() && self.date.is_none() && self.label.is_none() && self.pinned.is_none()
    }
}

pub mod driven_ports {
    use super::*;
    use crate::domain::DrivenPortError;

    pub trait TodoReader {
        /// Fetches one page of todos in creation order
        async fn list_todos(
            &self,
            page: &PageRequest,
            ext_cxn: &mut impl ExternalConnectivity,
        ) -> Result<Vec<TodoItem>, anyhow::Error>;
    }

    pub trait TodoWriter {
        async fn create_todo(
            &self,
            new_todo: &NewTodo,
            ext_cxn: &mut impl ExternalConnectivity,
        ) -> Result<TodoItem, anyhow::Error>;

        /// Inserts every todo or none of them
        async fn create_todos(
            &self,
            new_todos: &[NewTodo],
            ext_cxn: &mut impl ExternalConnectivity,
        ) -> Result<Vec<TodoItem>, anyhow::Error>;

        /// Merges the provided fields into an existing todo and returns its new state
        async fn update_todo(
            &self,
            todo_id: &str,
            update: &UpdateTodo,
            ext_cxn: &mut impl ExternalConnectivity,
        ) -> Result<TodoItem, DrivenPortError>;

        /// Removes a todo. Removing a todo that doesn't exist is not an error.
        async fn delete_todo(
            &self,
            todo_id: &str,
            ext_cxn: &mut impl ExternalConnectivity,
        ) -> Result<(), DrivenPortError>;
    }
}

pub mod driving_ports {
    use super::*;

    pub trait TodoPort {
        async fn list_todos(
            &self,
            page: &PageRequest,
            ext_cxn: &mut impl ExternalConnectivity,
            todo_read: &impl driven_ports::TodoReader,
        ) -> Result<Vec<TodoItem>, Error>;
        async fn create_todo(
            &self,
            new_todo: &NewTodo,
            ext_cxn: &mut impl ExternalConnectivity,
            todo_write: &impl driven_ports::TodoWriter,
        ) -> Result<TodoItem, Error>;
        async fn create_todos(
            &self,
            new_todos: &[NewTodo],
            ext_cxn: &mut impl ExternalConnectivity,
            todo_write: &impl driven_ports::TodoWriter,
        ) -> Result<Vec<TodoItem>, Error>;
        async fn update_todo(
            &self,
            todo_id: &str,
            update: &UpdateTodo,
            ext_cxn: &mut impl ExternalConnectivity,
            todo_write: &impl driven_ports::TodoWriter,
        ) -> Result<TodoItem, Error>;
        async fn delete_todo(
            &self,
            todo_id: &str,
            ext_cxn: &mut impl ExternalConnectivity,
            todo_write: &impl driven_ports::TodoWriter,
        ) -> Result<(), Error>;
    }
}

pub struct TodoService;

impl driving_ports::TodoPort for TodoService {
    async fn list_todos(
        &self,
        page: &PageRequest,
        ext_cxn: &mut impl ExternalConnectivity,
        todo_read: &impl TodoReader,
    ) -> Result<Vec<TodoItem>, Error> {
        let todos = todo_read
            .list_todos(page, &mut *ext_cxn)
            .await
            .map_err(|err| Error::port_failure("list todos", err))?;
        debug!("Found {} todos on {page}", todos.len());

        Ok(todos)
    }

    async fn create_todo(
        &self,
        new_todo: &NewTodo,
        ext_cxn: &mut impl ExternalConnectivity,
        todo_write: &impl TodoWriter,
    ) -> Result<TodoItem, Error> {
        let created = todo_write
            .create_todo(new_todo, &mut *ext_cxn)
            .await
            .map_err(|err| Error::port_failure("create a todo", err))?;
        info!("Todo {} saved", created.id);

        Ok(created)
    }

    async fn create_todos(
        &self,
        new_todos: &[NewTodo],
        ext_cxn: &mut impl ExternalConnectivity,
        todo_write: &impl TodoWriter,
    ) -> Result<Vec<TodoItem>, Error> {
        if new_todos.is_empty() {
            return Ok(Vec::new());
        }

        let created = todo_write
            .create_todos(new_todos, &mut *ext_cxn)
            .await
            .map_err(|err| Error::port_failure("create a batch of todos", err))?;
        info!("{} todos saved", created.len());

        Ok(created)
    }

    async fn update_todo(
        &self,
        todo_id: &str,
        update: &UpdateTodo,
        ext_cxn: &mut impl ExternalConnectivity,
        todo_write: &impl TodoWriter,
    ) -> Result<TodoItem, Error> {
        todo_write
            .update_todo(todo_id, update, &mut *ext_cxn)
            .await
            .map_err(|err| err.into_error_trying_to("update a todo", todo_id))
    }

    async fn delete_todo(
        &self,
        todo_id: &str,
        ext_cxn: &mut impl ExternalConnectivity,
        todo_write: &impl TodoWriter,
    ) -> Result<(), Error> {
        todo_write
            .delete_todo(todo_id, &mut *ext_cxn)
            .await
            .map_err(|err| err.into_error_trying_to("delete a todo", todo_id))
    }
}
