//! UI-agnostic state runtime: background tasks, generation-tagged handles and the keyed
//! query cache the views render from.

mod error;
mod query;
mod runtime;
mod task;
mod time;

pub use error::{Error, Result};
pub use query::{
    BoxFuture, Notify, QueryClient, QueryFn, QueryOptions, QueryStatus, Settled, SettledOf,
};
pub use runtime::StateRuntime;
pub use task::{TaskHandle, TaskId};
pub use time::Time;
