pub mod checksum;
pub mod convert;
pub mod data;
pub mod fields;
pub mod game;
pub mod ids;
pub mod pkm;
pub mod pouch;
pub mod save;
pub mod text;

#[cfg(test)]
mod testing;

#[cfg(target_endian = "big")]
compile_error!("Big endian architectures are not currently supported");
