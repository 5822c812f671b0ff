//! The watch session: refresh clock, signal flags, and the main loop.

pub mod clock;
pub mod loop_main;
pub mod signals;

pub use clock::RefreshClock;
pub use loop_main::run;
pub use signals::SignalFlags;
