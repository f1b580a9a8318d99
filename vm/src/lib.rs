mod execution;
mod gas;
mod state;

pub use {
  execution::{
    balance,
    execute,
    execute_with,
    load,
    BlockContext,
    Error,
    Outcome,
    Receipt,
  },
  gas::Schedule,
  state::{InMemoryStateStore, State, StateDiff},
};
