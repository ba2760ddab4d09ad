//! Reading analysis inputs and writing reports to disk

pub mod file_io;

pub use file_io::{load_input, read_required, write_atomic, InputFormat};
