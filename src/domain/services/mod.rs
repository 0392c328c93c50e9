pub mod availability;
pub mod booking_window;
pub mod defaults;
