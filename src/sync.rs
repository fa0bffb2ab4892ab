//! Re-entrancy flags for handlers that trigger each other through widget events.

use std::{cell::Cell, rc::Rc};

/// A shared boolean raised for the lifetime of a [`FlagGuard`].
#[derive(Clone, Debug, Default)]
pub struct ReentrancyFlag {
	flag: Rc<Cell<bool>>,
}

impl ReentrancyFlag {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn is_set(&self) -> bool {
		self.flag.get()
	}

	#[must_use]
	pub fn hold(&self) -> FlagGuard {
		FlagGuard::set(Rc::clone(&self.flag), true)
	}
}

pub struct FlagGuard {
	flag: Rc<Cell<bool>>,
	previous: bool,
}

impl FlagGuard {
	fn set(flag: Rc<Cell<bool>>, value: bool) -> Self {
		let previous = flag.replace(value);
		Self { flag, previous }
	}
}

impl Drop for FlagGuard {
	fn drop(&mut self) {
		self.flag.set(self.previous);
	}
}

/// Releases one tree-driven suspension of [`NavigationSync`] on drop.
pub struct SuspendGuard {
	suspended: Rc<Cell<usize>>,
}

impl Drop for SuspendGuard {
	fn drop(&mut self) {
		self.suspended.set(self.suspended.get().saturating_sub(1));
	}
}

/// Keeps the contents tree and the HTML pane from feeding back into each other.
///
/// A tree selection loads a page with `sync` off so the page load does not
/// reselect the tree. A page load that reselects the tree does so while
/// `caller` is set, so the selection handler does not load the page again.
/// Suspensions are counted, so `sync` only comes back once every overlapping
/// tree-driven load has been released.
#[derive(Clone, Debug, Default)]
pub struct NavigationSync {
	suspended: Rc<Cell<usize>>,
	caller: ReentrancyFlag,
}

impl NavigationSync {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn is_sync(&self) -> bool {
		self.suspended.get() == 0
	}

	pub fn is_caller(&self) -> bool {
		self.caller.is_set()
	}

	#[must_use]
	pub fn suspend(&self) -> SuspendGuard {
		self.suspended.set(self.suspended.get() + 1);
		SuspendGuard { suspended: Rc::clone(&self.suspended) }
	}

	#[must_use]
	pub fn calling(&self) -> FlagGuard {
		self.caller.hold()
	}
}

#[cfg(test)]
mod tests {
	use std::cell::RefCell;

	use super::*;

	#[test]
	fn hold_raises_and_restores_flag() {
		let flag = ReentrancyFlag::new();
		{
			let _guard = flag.hold();
			assert!(flag.is_set());
		}
		assert!(!flag.is_set());
	}

	#[test]
	fn nested_holds_restore_outer_state() {
		let flag = ReentrancyFlag::new();
		let outer = flag.hold();
		{
			let _inner = flag.hold();
		}
		assert!(flag.is_set());
		drop(outer);
		assert!(!flag.is_set());
	}

	#[test]
	fn clones_share_state() {
		let sync = NavigationSync::new();
		let other = sync.clone();
		let _guard = sync.calling();
		assert!(other.is_caller());
	}

	#[test]
	fn suspend_turns_sync_off_until_dropped() {
		let sync = NavigationSync::new();
		assert!(sync.is_sync());
		{
			let _guard = sync.suspend();
			assert!(!sync.is_sync());
		}
		assert!(sync.is_sync());
	}

	#[test]
	fn overlapping_suspensions_release_in_any_order() {
		let sync = NavigationSync::new();
		let pending = RefCell::new(None);
		// Two tree selections before the first page has loaded.
		for _ in 0..2 {
			*pending.borrow_mut() = Some(sync.suspend());
			assert!(!sync.is_sync());
		}
		drop(pending.borrow_mut().take());
		assert!(sync.is_sync());
	}

	#[test]
	fn sync_stays_off_while_any_suspension_is_held() {
		let sync = NavigationSync::new();
		let first = sync.suspend();
		let second = sync.suspend();
		drop(first);
		assert!(!sync.is_sync());
		drop(second);
		assert!(sync.is_sync());
	}
}
