use usuarios_business::{BusinessConfig, UsersTable};
use usuarios_states::Time;

/// The main application state.
#[derive(Debug)]
pub struct State {
    /// Users table view model: pagination plus the page cache.
    pub table: UsersTable,
    /// Clock read once per frame.
    pub time: Time,
}

impl State {
    /// Must be called inside the async runtime the fetches will run on.
    pub fn new(config: &BusinessConfig) -> usuarios_states::Result<Self> {
        Ok(Self {
            table: UsersTable::from_config(config)?,
            time: Time::default(),
        })
    }

    pub fn test(base_url: String) -> usuarios_states::Result<Self> {
        Self::new(&BusinessConfig::new(base_url))
    }
}
