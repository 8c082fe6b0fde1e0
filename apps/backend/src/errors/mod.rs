pub mod domain;

pub use domain::{DomainError, NotFoundKind};
