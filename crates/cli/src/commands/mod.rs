pub mod generate;
pub mod inputs;
pub mod resolve;

pub use generate::generate_command;
pub use inputs::load_inputs;
pub use resolve::resolve_command;
