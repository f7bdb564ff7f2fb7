//! Port definitions implemented by adapter crates.

mod image_task;

pub use image_task::{ImageTaskPort, TaskPortError};
