//! Background tasks.

mod sweeper;

pub use sweeper::spawn_window_sweeper;
