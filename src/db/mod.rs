pub mod conn;
pub mod runs;
pub mod seed;
