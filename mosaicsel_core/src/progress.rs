//! Lightweight terminal progress reporting for batch stages (C2 tile
//! ingestion, C4 mosaic area computation), adapted from the teacher's
//! dependency-free progress bar.

use std::io::{self, Write};
use std::time::Instant;

/// Interface for progress indicators. Implementations of this trait can be
/// used to report progress for long-running batch stages.
pub trait ProgressTrait: Send {
	/// Sets the absolute position.
	fn set_position(&mut self, value: u64);

	/// Advances the position by `value`.
	fn inc(&mut self, value: u64);

	/// Marks the progress as done and removes the bar from the terminal.
	fn finish(&mut self);
}

/// Terminal progress bar: message, position/len, percentage, items/sec.
pub struct ProgressBar {
	message: String,
	len: u64,
	pos: u64,
	start: Instant,
	finished: bool,
}

impl ProgressBar {
	#[must_use]
	pub fn new(message: &str, len: u64) -> Self {
		let bar = ProgressBar { message: message.to_string(), len, pos: 0, start: Instant::now(), finished: false };
		bar.redraw();
		bar
	}

	fn redraw(&self) {
		let len = self.len.max(1);
		let pos = self.pos.min(len);
		let pct = (pos as f64 / len as f64) * 100.0;
		let elapsed = self.start.elapsed().as_secs_f64().max(1e-9);
		let rate = pos as f64 / elapsed;
		eprint!("\r{}: {pos}/{len} ({pct:.1}%, {rate:.1}/s)    ", self.message);
		let _ = io::stderr().flush();
	}
}

impl ProgressTrait for ProgressBar {
	fn set_position(&mut self, value: u64) {
		self.pos = value;
		if !self.finished {
			self.redraw();
		}
	}

	fn inc(&mut self, value: u64) {
		self.set_position(self.pos + value);
	}

	fn finish(&mut self) {
		if !self.finished {
			self.finished = true;
			self.pos = self.len;
			self.redraw();
			eprintln!();
		}
	}
}

/// No-op progress indicator used under `#[cfg(test)]` and by library callers
/// that don't want terminal output.
pub struct ProgressDummy;

impl ProgressDummy {
	#[must_use]
	pub fn new() -> Self {
		ProgressDummy
	}
}

impl Default for ProgressDummy {
	fn default() -> Self {
		Self::new()
	}
}

impl ProgressTrait for ProgressDummy {
	fn set_position(&mut self, _value: u64) {}
	fn inc(&mut self, _value: u64) {}
	fn finish(&mut self) {}
}

/// Factory: a terminal bar outside of tests, a no-op drain under `cfg(test)`.
#[must_use]
pub fn get_progress_bar(message: &str, len: u64) -> Box<dyn ProgressTrait> {
	#[cfg(not(test))]
	{
		Box::new(ProgressBar::new(message, len))
	}
	#[cfg(test)]
	{
		let _ = (message, len);
		Box::new(ProgressDummy::new())
	}
}
