//! Message listing and creation.
//!
//! Creation is a single branch: validate, then either commit exactly one row
//! or reject with the accumulated [`FieldErrors`] and write nothing.

use tracing::{debug, info};

use crate::entities::{MessageRecord, MessageStore, NewMessage};
use crate::error::ServerError;
use crate::schemas::message::CreateMessageRequest;
use crate::validation::{self, FieldErrors, NAME_TAKEN};

/// All messages, newest first.
pub async fn list_messages<S: MessageStore>(store: &S) -> Result<Vec<MessageRecord>, ServerError> {
    Ok(store.list_ordered_by_created_desc().await?)
}

/// Validate `req` and store it.
///
/// Field rules run in declared order (required, not blank, length, then
/// uniqueness for `name`); the uniqueness lookup is skipped when `name`
/// already failed.
pub async fn create_message<S: MessageStore>(
    store: &S,
    req: CreateMessageRequest,
) -> Result<MessageRecord, ServerError> {
    let mut errors = validation::check(&req);

    if let Some(name) = req.name.as_deref() {
        if !errors.contains("name") && store.exists_by_name(name).await? {
            errors.add("name", NAME_TAKEN);
        }
    }

    if let Err(errors) = errors.into_result() {
        debug!(fields = ?errors.fields().collect::<Vec<_>>(), "message rejected");
        return Err(errors.into());
    }

    // Both fields are present once validation has passed.
    let (Some(name), Some(text)) = (req.name, req.text) else {
        return Err(ServerError::Internal("validated request is missing fields".into()));
    };

    let record = store
        .insert(NewMessage::now(name, text))
        .await
        .map_err(name_conflict_or_database)?;
    info!(id = record.id, name = %record.name, "message created");
    Ok(record)
}

/// A concurrent insert can win the race between `exists_by_name` and
/// `insert`; the unique index then rejects ours.
fn name_conflict_or_database(err: sqlx::Error) -> ServerError {
    match &err {
        sqlx::Error::Database(db) if db.is_unique_violation() => {
            let mut errors = FieldErrors::new();
            errors.add("name", NAME_TAKEN);
            ServerError::Validation(errors)
        }
        _ => ServerError::Database(err),
    }
}
