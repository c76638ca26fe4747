//! Command implementations.
//!
//! Each command returns the rendered output; `main` prints it.

pub mod compat;
pub mod guide;
pub mod resolve;
pub mod seed;
pub mod sources;

pub use self::compat::execute_compat;
pub use self::guide::execute_guide;
pub use self::resolve::execute_resolve;
pub use self::seed::execute_seed;
pub use self::sources::execute_sources;
