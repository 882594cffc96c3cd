pub mod test_utils;

pub mod application;
pub mod contacts;
pub mod distances;
pub mod parsers;
