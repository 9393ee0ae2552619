pub mod input;
pub mod menu;
pub mod render;

pub use input::{InputProvider, StdinInput};
pub use menu::{MenuController, MenuSelection};
