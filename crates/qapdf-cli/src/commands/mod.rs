pub mod extract;
pub mod inspect;
pub mod rules;
pub mod scan;
