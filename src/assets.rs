pub mod decode;
pub mod font;
pub(crate) mod text;
