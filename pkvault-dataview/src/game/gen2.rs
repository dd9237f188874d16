pub mod pk2;
pub mod save;
