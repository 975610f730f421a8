pub mod doctor;
pub mod parse;
