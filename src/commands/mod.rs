pub mod memory;

pub use memory::handle_memory_command;
