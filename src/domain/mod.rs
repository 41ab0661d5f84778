use thiserror::Error;

pub mod pagination;
pub mod todo;

#[cfg(test)]
pub mod test_util;

/// Errors the driving ports hand back to the API layer
#[derive(Error, Debug)]
pub enum Error {
    #[error("todo {0} does not exist")]
    DoesNotExist(String),
    #[error("\"{0}\" is not a valid todo identifier")]
    MalformedId(String),
    #[error("failed to {action} due to a communication failure: {cause}")]
    PortFailure {
        action: String,
        #[source]
        cause: anyhow::Error,
    },
}

#[cfg(test)]
impl Clone for Error {
    fn clone(&self) -> Self {
        match self {
            Self::DoesNotExist(id) => Self::DoesNotExist(id.clone()),
            Self::MalformedId(id) => Self::MalformedId(id.clone()),
            Self::PortFailure { action, cause } => Self::PortFailure {
                action: action.clone(),
                cause: anyhow::anyhow!(format!("{cause}")),
            },
        }
    }
}

/// Failures reported by driven port implementations (store adapters)
#[derive(Error, Debug)]
pub enum DrivenPortError {
    #[error("a communication failure occurred: {0}")]
    CommsFailure(#[from] anyhow::Error),
    #[error("the requested data does not exist")]
    DoesNotExist,
    #[error("\"{0}\" is not a valid identifier for this store")]
    MalformedId(String),
}

impl DrivenPortError {
    /// Converts this DrivenPortError to a domain error with some extra info on the [action]
    /// being taken on the record identified by [id]
    fn into_error_trying_to(self, action: &str, id: &str) -> Error {
        match self {
            Self::DoesNotExist => Error::DoesNotExist(id.to_owned()),
            Self::MalformedId(bad_id) => Error::MalformedId(bad_id),
            Self::CommsFailure(err) => Error::PortFailure {
                action: action.into(),
                cause: err,
            },
        }
    }
}

impl Error {
    /// Wraps a raw port failure which isn't tied to a specific record
    fn port_failure(action: &str, cause: anyhow::Error) -> Self {
        Self::PortFailure {
            action: action.into(),
            cause,
        }
    }
}
