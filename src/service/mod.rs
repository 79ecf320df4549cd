//! Tower Service implementations

pub mod core;
pub mod lifecycle;

pub use self::core::A2AServerService;
pub use self::lifecycle::TaskManager;
