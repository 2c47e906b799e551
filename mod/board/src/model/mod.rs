mod board;
mod invitation;
mod list;
mod membership;
mod task;

pub use board::*;
pub use invitation::*;
pub use list::*;
pub use membership::*;
pub use task::*;
