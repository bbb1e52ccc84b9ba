//! Observable holder for an orchestrator's transaction state.

use crowdfund_types::TransactionState;
use tokio::sync::watch;

/// Publishes [`TransactionState`] changes to any number of subscribers.
///
/// Updates never fail: the latest state is kept even when nobody is
/// subscribed, and late subscribers see it immediately.
#[derive(Debug)]
pub struct StateHolder {
	sender: watch::Sender<TransactionState>,
}

impl StateHolder {
	pub fn new() -> Self {
		let (sender, _) = watch::channel(TransactionState::idle());
		Self { sender }
	}

	/// Replaces the current state and notifies subscribers.
	///
	/// Terminal states always notify, so a repeated outcome is still seen as
	/// a new attempt. Other states notify only when they change.
	pub fn publish(&self, state: TransactionState) {
		self.sender.send_if_modified(|current| {
			if *current == state && !state.status().is_terminal() {
				return false;
			}
			*current = state;
			true
		});
	}

	pub fn current(&self) -> TransactionState {
		self.sender.borrow().clone()
	}

	pub fn subscribe(&self) -> watch::Receiver<TransactionState> {
		self.sender.subscribe()
	}
}

impl Default for StateHolder {
	fn default() -> Self {
		Self::new()
	}
}
