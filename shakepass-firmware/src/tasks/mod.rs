//! Embassy async tasks
//!
//! Each task runs independently and communicates via channels/atomics.

pub mod buttons;
pub mod engine;
pub mod link_rx;
pub mod link_tx;
pub mod sensors;

pub use buttons::buttons_task;
pub use engine::engine_task;
pub use link_rx::link_rx_task;
pub use link_tx::link_tx_task;
pub use sensors::{sensors_task, Microphone};
