//! Depth Guard
//!
//! Counts nested mapping calls along one call chain. Entering past the
//! maximum is refused; the caller then yields a zero value instead of
//! recursing. The counter is a plain `Cell` because a guard never leaves the
//! call chain that created it.

use std::cell::Cell;

/// Per-call-chain nesting counter
#[derive(Debug)]
pub struct DepthGuard {
    depth: Cell<usize>,
    max: usize,
}

impl DepthGuard {
    /// Guard starting at depth 0
    pub fn new(max: usize) -> Self {
        DepthGuard {
            depth: Cell::new(0),
            max,
        }
    }

    /// Try to go one level deeper; `false` when the maximum is reached
    pub fn enter(&self) -> bool {
        let depth = self.depth.get();
        if depth >= self.max {
            return false;
        }
        self.depth.set(depth + 1);
        true
    }

    /// Leave one level
    pub fn exit(&self) {
        let depth = self.depth.get();
        debug_assert!(depth > 0, "exit without matching enter");
        self.depth.set(depth.saturating_sub(1));
    }

    /// Current depth
    pub fn depth(&self) -> usize {
        self.depth.get()
    }

    /// Configured maximum
    pub fn max(&self) -> usize {
        self.max
    }

    /// Enter for the lifetime of the returned scope
    pub fn scope(&self) -> Option<DepthScope<'_>> {
        if self.enter() {
            Some(DepthScope { guard: self })
        } else {
            None
        }
    }
}

/// Leaves its level when dropped, including on early return or unwinding
#[derive(Debug)]
pub struct DepthScope<'g> {
    guard: &'g DepthGuard,
}

impl Drop for DepthScope<'_> {
    fn drop(&mut self) {
        self.guard.exit();
    }
}
