pub mod letter;
pub mod notice;
