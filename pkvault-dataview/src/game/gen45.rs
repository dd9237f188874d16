pub mod pk45;
