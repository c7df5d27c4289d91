pub mod detect;
pub mod formats;
pub mod read;
pub mod show;
pub mod write;
