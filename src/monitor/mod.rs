pub mod core;
pub mod hash;
pub mod polling;

pub use self::core::{CheckPolicy, IntegrityMonitor};
pub use self::polling::run_with_interrupt;
