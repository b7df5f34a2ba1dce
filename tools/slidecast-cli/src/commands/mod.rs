pub mod check;
pub mod convert;
pub mod edit_text;
pub mod log;
pub mod save;
pub mod settings;
pub mod transcript;
