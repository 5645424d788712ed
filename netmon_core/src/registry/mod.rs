pub use self::registry::{AddressRegistry, Observation};

#[allow(clippy::module_inception)]
mod registry;
