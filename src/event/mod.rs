mod bus;
mod events;

pub use bus::{EventBus, StoreEventHandler};
pub use events::StoreEvent;
