//! Optional background task collaborator
//!
//! Hosts that run a task queue hand it to the export tool as a
//! [`TaskBackend`]. Submission is fire-and-forget: the caller gets a
//! [`TaskId`] back and never awaits the job.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Mutex;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;

/// A job handed to a task backend
pub type Job = Pin<Box<dyn Future<Output = ()> + Send + 'static>>;

/// Unique identifier of a submitted job
///
/// # Examples
///
/// ```
/// use reinhardt_export_mail::TaskId;
///
/// assert_ne!(TaskId::new(), TaskId::new());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TaskId(pub uuid::Uuid);

impl TaskId {
	pub fn new() -> Self {
		Self(uuid::Uuid::new_v4())
	}
}

impl Default for TaskId {
	fn default() -> Self {
		Self::new()
	}
}

impl fmt::Display for TaskId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}", self.0)
	}
}

/// Runs jobs outside the submitting request
pub trait TaskBackend: Send + Sync {
	/// Queue `job` under `name` and return immediately
	fn submit(&self, name: &str, job: Job) -> TaskId;
}

/// [`TaskBackend`] spawning jobs on a Tokio runtime
pub struct TokioTaskBackend {
	handle: Handle,
	running: Mutex<Vec<JoinHandle<()>>>,
}

impl TokioTaskBackend {
	pub fn new(handle: Handle) -> Self {
		Self {
			handle,
			running: Mutex::new(Vec::new()),
		}
	}

	/// Backend on the runtime of the calling context, if any
	pub fn try_current() -> Option<Self> {
		Handle::try_current().ok().map(Self::new)
	}

	/// Wait for every job submitted so far
	pub async fn join_all(&self) {
		let handles: Vec<JoinHandle<()>> = match self.running.lock() {
			Ok(mut running) => running.drain(..).collect(),
			Err(_) => return,
		};
		for handle in handles {
			if let Err(e) = handle.await {
				tracing::error!(error = %e, "background task panicked");
			}
		}
	}
}

impl TaskBackend for TokioTaskBackend {
	fn submit(&self, name: &str, job: Job) -> TaskId {
		let id = TaskId::new();
		tracing::info!(task_id = %id, task = name, "submitted background task");
		let handle = self.handle.spawn(job);
		if let Ok(mut running) = self.running.lock() {
			running.retain(|h| !h.is_finished());
			running.push(handle);
		}
		id
	}
}
