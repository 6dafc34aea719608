pub mod inspect;
pub mod probe;
pub mod version;
