pub mod chars;
pub mod text;
