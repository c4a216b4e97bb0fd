//! Bounded pool of SQLite connections for request-time reads.
//!
//! Connections open lazily on first checkout and return to the idle list
//! when the [`PooledConnection`] guard drops. A connection that hit a
//! connectivity failure is marked broken and closed instead, so the next
//! checkout opens a fresh one.

use std::ops::Deref;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use rusqlite::{Connection, OpenFlags};
use tokio::sync::{OwnedSemaphorePermit, Semaphore};

use crate::error::{Error, Result};

use super::functions::register_functions;

const BUSY_TIMEOUT: Duration = Duration::from_secs(2);

/// A cloneable handle to a bounded connection pool.
#[derive(Debug, Clone)]
pub struct Pool {
    inner: Arc<PoolInner>,
}

#[derive(Debug)]
struct PoolInner {
    path: PathBuf,
    size: usize,
    idle: Mutex<Vec<Connection>>,
    permits: Arc<Semaphore>,
}

/// Snapshot of pool occupancy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolStatus {
    pub size: usize,
    pub idle: usize,
    pub available: usize,
}

impl Pool {
    /// Create a pool of at most `size` read-only connections to the
    /// database at `path`. No connection is opened until the first
    /// checkout.
    pub fn new(path: impl Into<PathBuf>, size: usize) -> Self {
        let size = size.max(1);
        Self {
            inner: Arc::new(PoolInner {
                path: path.into(),
                size,
                idle: Mutex::new(Vec::with_capacity(size)),
                permits: Arc::new(Semaphore::new(size)),
            }),
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.inner.path
    }

    /// Check out a connection, waiting while all of them are in use.
    pub async fn get(&self) -> Result<PooledConnection> {
        let permit = Arc::clone(&self.inner.permits)
            .acquire_owned()
            .await
            .map_err(|_| Error::PoolClosed)?;

        let idle = self.inner.idle_list().pop();
        let conn = match idle {
            Some(conn) => conn,
            None => self.inner.open()?,
        };

        Ok(PooledConnection {
            conn: Some(conn),
            pool: Arc::clone(&self.inner),
            broken: false,
            _permit: permit,
        })
    }

    /// Stop handing out connections and close the idle ones. Checkouts
    /// already in flight finish normally.
    pub fn close(&self) {
        self.inner.permits.close();
        self.inner.idle_list().clear();
    }

    #[must_use]
    pub fn status(&self) -> PoolStatus {
        PoolStatus {
            size: self.inner.size,
            idle: self.inner.idle_list().len(),
            available: self.inner.permits.available_permits(),
        }
    }
}

impl PoolInner {
    fn idle_list(&self) -> std::sync::MutexGuard<'_, Vec<Connection>> {
        // A panic while holding the lock cannot leave the list half-updated.
        self.idle.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn open(&self) -> Result<Connection> {
        log::debug!("Opening pooled connection to {}", self.path.display());
        let conn = Connection::open_with_flags(
            &self.path,
            OpenFlags::SQLITE_OPEN_READ_ONLY
                | OpenFlags::SQLITE_OPEN_URI
                | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )?;
        conn.busy_timeout(BUSY_TIMEOUT)?;
        register_functions(&conn)?;
        Ok(conn)
    }

    fn check_in(&self, conn: Connection) {
        if self.permits.is_closed() {
            return;
        }
        self.idle_list().push(conn);
    }
}

/// A connection checked out of a [`Pool`].
#[derive(Debug)]
pub struct PooledConnection {
    conn: Option<Connection>,
    pool: Arc<PoolInner>,
    broken: bool,
    _permit: OwnedSemaphorePermit,
}

impl PooledConnection {
    /// Close this connection on drop instead of returning it to the pool.
    pub fn mark_broken(&mut self) {
        self.broken = true;
    }
}

impl Deref for PooledConnection {
    type Target = Connection;

    fn deref(&self) -> &Connection {
        // Only `Drop` takes the connection out.
        self.conn.as_ref().unwrap_or_else(|| unreachable!())
    }
}

impl Drop for PooledConnection {
    fn drop(&mut self) {
        if let Some(conn) = self.conn.take() {
            if self.broken {
                log::debug!("Discarding broken pooled connection");
            } else {
                self.pool.check_in(conn);
            }
        }
    }
}
