pub mod colors;
pub mod date;
pub mod formatting;
pub mod fs_utils;
