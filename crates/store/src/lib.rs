pub mod expr;
pub mod grammar;
pub mod memory;
pub mod query;
pub mod repository;

pub use expr::{CmpOp, Expr, Value};
pub use memory::MemoryStore;
pub use query::advanced_query;
pub use repository::{PoolRepository, RepositoryError, StoredPool};
