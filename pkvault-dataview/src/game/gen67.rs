pub mod pk67;
