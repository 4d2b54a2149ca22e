//! Statement-level primitives shared by the metamodel and the result
//! builders.

mod fetch_timing;
pub use fetch_timing::FetchTiming;

mod lock_mode;
pub use lock_mode::LockMode;

mod navigable_path;
pub use navigable_path::NavigablePath;

mod ty;
pub use ty::Type;

mod value;
pub use value::Value;
