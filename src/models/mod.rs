mod entity;
mod identity;

pub use entity::*;
pub use identity::*;
