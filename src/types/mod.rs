mod error;
mod location;
mod run;

pub use error::RepositoryError;
pub use location::{Location, UnknownLocation};
pub use run::Run;
