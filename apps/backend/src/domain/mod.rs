//! Pure game-template logic. Nothing in this module touches the database or
//! the network; templates are deterministic state machines that the arbiter
//! and the session store drive.

pub mod chess;
pub mod chess_oracle;
pub mod registry;
pub mod rps;
pub mod state;
pub mod template;

pub use registry::TemplateRegistry;
pub use state::SessionState;
pub use template::{Template, TurnStyle};

#[cfg(test)]
mod tests_props;
