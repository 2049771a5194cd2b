pub mod optimize;
pub mod simulate;
