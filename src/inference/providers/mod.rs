pub mod builtin;
pub mod command;

pub use command::CommandProvider;
