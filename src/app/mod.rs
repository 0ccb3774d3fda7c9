// Console shells around the core: the menu loop and table rendering.

pub mod menu;
pub mod render;
