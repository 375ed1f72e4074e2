//! Single-writer actor: all mutations run serially on one dedicated
//! connection, inside an immediate transaction. SQLite allows many
//! readers but one writer; funneling writes through one task avoids
//! SQLITE_BUSY under concurrent use.

use std::any::Any;

use diesel::{Connection, SqliteConnection};
use log::error;
use tokio::sync::{mpsc, oneshot};

use fiscus_core::errors::{Error, Result};

use super::DbPool;
use crate::errors::StorageError;

type Job<T> = Box<dyn FnOnce(&mut SqliteConnection) -> Result<T> + Send + 'static>;
type ErasedJob = Job<Box<dyn Any + Send + 'static>>;
type Reply = oneshot::Sender<Result<Box<dyn Any + Send + 'static>>>;

/// Cloneable handle for submitting write jobs to the actor.
#[derive(Clone)]
pub struct WriteHandle {
    tx: mpsc::Sender<(ErasedJob, Reply)>,
}

impl WriteHandle {
    /// Runs `job` on the writer's connection inside an immediate
    /// transaction and returns its result.
    pub async fn exec<F, T>(&self, job: F) -> Result<T>
    where
        F: FnOnce(&mut SqliteConnection) -> Result<T> + Send + 'static,
        T: Send + 'static + Any,
    {
        let (reply_tx, reply_rx) = oneshot::channel();

        // Erase the job's return type so one channel serves every caller.
        self.tx
            .send((
                Box::new(move |c| job(c).map(|v| Box::new(v) as Box<dyn Any + Send>)),
                reply_tx,
            ))
            .await
            .map_err(|_| Error::Unexpected("database writer task is gone".to_string()))?;

        let boxed = reply_rx
            .await
            .map_err(|_| Error::Unexpected("database writer dropped the reply".to_string()))??;
        boxed
            .downcast::<T>()
            .map(|v| *v)
            .map_err(|_| Error::Unexpected("writer result had an unexpected type".to_string()))
    }
}

/// Spawns the writer task. The task owns one pooled connection for its
/// whole lifetime and ends when every `WriteHandle` is dropped.
pub fn spawn_writer(pool: DbPool) -> Result<WriteHandle> {
    let mut conn = super::get_connection(&pool)?;
    let (tx, mut rx) = mpsc::channel::<(ErasedJob, Reply)>(1024);

    tokio::spawn(async move {
        while let Some((job, reply_tx)) = rx.recv().await {
            let result = conn
                .immediate_transaction::<_, StorageError, _>(|c| job(c).map_err(StorageError::from))
                .map_err(Error::from);
            if let Err(err) = &result {
                error!("write job failed: {err}");
            }
            // The caller may have gone away; nothing to do then.
            let _ = reply_tx.send(result);
        }
    });

    Ok(WriteHandle { tx })
}
