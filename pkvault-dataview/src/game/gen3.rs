pub mod pk3;
