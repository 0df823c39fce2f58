pub mod code;
pub mod inspect;
pub mod simulate;
