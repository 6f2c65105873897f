pub mod context;
pub mod modules;
pub mod shared;

pub use context::AppContext;
