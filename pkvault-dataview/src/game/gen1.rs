pub mod pk1;
pub mod save;
