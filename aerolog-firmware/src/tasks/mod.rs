//! Embassy async tasks
//!
//! Each task runs independently and communicates via channels.

pub mod button;
pub mod debounce;
pub mod encoder;
pub mod monitor;

pub use button::button_task;
pub use debounce::debounce_task;
pub use encoder::encoder_task;
pub use monitor::monitor_task;
