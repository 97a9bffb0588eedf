//! Function-pointer finite state machine engine.
//!
//! Classic embedded FSM pattern ported to Rust:
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │  StateTable                                                    │
//! │  ┌────────────┬─────────────┬─────────────┬──────────────────┐ │
//! │  │ StateId    │ on_enter    │ on_exit     │ on_update        │ │
//! │  ├────────────┼─────────────┼─────────────┼──────────────────┤ │
//! │  │ Idle       │ fn(ctx, nc) │ -           │ fn(ctx, nc)->Opt │ │
//! │  │ Baselining │ fn(ctx, nc) │ -           │ fn(ctx, nc)->Opt │ │
//! │  │ Searching  │ fn(ctx, nc) │ -           │ fn(ctx, nc)->Opt │ │
//! │  │ Delivered  │ fn(ctx, nc) │ -           │ fn(ctx, nc)->Opt │ │
//! │  │ Stopped    │ fn(ctx, nc) │ -           │ fn(ctx, nc)->Opt │ │
//! │  │ TimedOut   │ fn(ctx, nc) │ -           │ fn(ctx, nc)->Opt │ │
//! │  └────────────┴─────────────┴─────────────┴──────────────────┘ │
//! └────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Each tick the engine calls `on_update` for the **current** state.
//! If it returns `Some(next_id)`, the engine runs `on_exit` for the
//! current state, then `on_enter` for the next, and updates the
//! current pointer.  Handlers receive the [`FsmContext`] blackboard and
//! the Notecard port; they never block except inside a Notecard call.

pub mod context;
pub mod states;

use context::FsmContext;
use log::info;

use crate::app::ports::NotecardPort;

// ---------------------------------------------------------------------------
// State identity
// ---------------------------------------------------------------------------

/// Enumeration of all acquisition states.
/// Must stay in sync with the state table built in [`states::build_state_table`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum StateId {
    Idle = 0,
    Baselining = 1,
    Searching = 2,
    Delivered = 3,
    Stopped = 4,
    TimedOut = 5,
}

impl StateId {
    /// Total number of states, used to size the table array.
    pub const COUNT: usize = 6;
}

// ---------------------------------------------------------------------------
// Function-pointer type aliases
// ---------------------------------------------------------------------------

/// Signature for `on_enter` and `on_exit` actions.
/// These run exactly once on each state transition.
pub type StateActionFn = fn(&mut FsmContext, &mut dyn NotecardPort);

/// Signature for the per-tick update handler.
/// Returns `Some(next)` to trigger a transition, or `None` to stay.
pub type StateUpdateFn = fn(&mut FsmContext, &mut dyn NotecardPort) -> Option<StateId>;

// ---------------------------------------------------------------------------
// State descriptor (one row in the table)
// ---------------------------------------------------------------------------

/// Static descriptor for a single FSM state.
/// Stored in a fixed-size array, no heap.
pub struct StateDescriptor {
    pub id: StateId,
    pub name: &'static str,
    pub on_enter: Option<StateActionFn>,
    pub on_exit: Option<StateActionFn>,
    pub on_update: StateUpdateFn,
}

// ---------------------------------------------------------------------------
// FSM engine
// ---------------------------------------------------------------------------

/// The finite state machine engine.
pub struct Fsm {
    /// Fixed-size table indexed by `StateId as usize`.
    table: [StateDescriptor; StateId::COUNT],
    /// Index of the currently active state.
    current: usize,
}

impl Fsm {
    /// Construct a new FSM with the given state table, starting in `initial`.
    pub fn new(table: [StateDescriptor; StateId::COUNT], initial: StateId) -> Self {
        Self {
            table,
            current: initial as usize,
        }
    }

    /// Run the initial `on_enter` for the starting state.
    /// Call once after construction, before the first `tick()`.
    pub fn start(&mut self, ctx: &mut FsmContext, notecard: &mut dyn NotecardPort) {
        info!("FSM starting in state: {}", self.table[self.current].name);
        if let Some(enter) = self.table[self.current].on_enter {
            enter(ctx, notecard);
        }
    }

    /// Advance the FSM by one tick.
    ///
    /// 1. Call `on_update` for the current state.
    /// 2. If it returns `Some(next)`, execute the transition:
    ///    `on_exit(current)` → update pointer → `on_enter(next)`.
    pub fn tick(&mut self, ctx: &mut FsmContext, notecard: &mut dyn NotecardPort) {
        let next = (self.table[self.current].on_update)(ctx, notecard);

        if let Some(next_id) = next {
            self.transition(next_id, ctx, notecard);
        }
    }

    /// Force an immediate transition (debug / tests).
    pub fn force_transition(
        &mut self,
        next: StateId,
        ctx: &mut FsmContext,
        notecard: &mut dyn NotecardPort,
    ) {
        if next as usize != self.current {
            self.transition(next, ctx, notecard);
        }
    }

    /// The current state's identity.
    pub fn current_state(&self) -> StateId {
        self.table[self.current].id
    }

    // -----------------------------------------------------------------------
    // Internal
    // -----------------------------------------------------------------------

    fn transition(&mut self, next_id: StateId, ctx: &mut FsmContext, notecard: &mut dyn NotecardPort) {
        let next_idx = next_id as usize;

        info!(
            "FSM transition: {} -> {}",
            self.table[self.current].name, self.table[next_idx].name
        );

        if let Some(exit) = self.table[self.current].on_exit {
            exit(ctx, notecard);
        }

        self.current = next_idx;

        if let Some(enter) = self.table[self.current].on_enter {
            enter(ctx, notecard);
        }
    }
}
