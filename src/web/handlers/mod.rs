pub mod export_handlers;
pub mod search_handlers;
pub mod system_handlers;

pub use export_handlers::*;
pub use search_handlers::*;
pub use system_handlers::*;
