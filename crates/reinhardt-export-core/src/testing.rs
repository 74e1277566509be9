//! Test helpers shared by the export crates

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing_subscriber::layer::{Context, SubscriberExt as _};
use tracing_subscriber::util::SubscriberInitExt as _;

/// A tracing layer that records events as `[LEVEL] message` lines
#[derive(Clone, Default)]
pub struct LogCapture {
	logs: Arc<Mutex<Vec<String>>>,
}

impl LogCapture {
	pub fn new() -> Self {
		Self::default()
	}

	/// Install the layer for the current thread until the guard drops
	pub fn install(&self) -> tracing::subscriber::DefaultGuard {
		tracing_subscriber::registry()
			.with(self.clone())
			.set_default()
	}

	/// Lines captured so far
	pub fn lines(&self) -> MutexGuard<'_, Vec<String>> {
		self.logs.lock().unwrap_or_else(PoisonError::into_inner)
	}

	/// Whether a line at `level` contains `needle`
	pub fn contains(&self, level: tracing::Level, needle: &str) -> bool {
		let prefix = format!("[{}]", level);
		self.lines()
			.iter()
			.any(|line| line.starts_with(&prefix) && line.contains(needle))
	}
}

impl<S: tracing::Subscriber> tracing_subscriber::Layer<S> for LogCapture {
	fn on_event(&self, event: &tracing::Event<'_>, _ctx: Context<'_, S>) {
		struct MessageVisitor {
			message: String,
		}

		impl tracing::field::Visit for MessageVisitor {
			fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
				if field.name() == "message" {
					self.message = format!("{:?}", value);
				}
			}
		}

		let mut visitor = MessageVisitor {
			message: String::new(),
		};
		event.record(&mut visitor);
		self.lines()
			.push(format!("[{}] {}", event.metadata().level(), visitor.message));
	}
}
