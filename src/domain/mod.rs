pub mod reference;
pub mod sanitize;
pub mod track;
