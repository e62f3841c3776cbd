pub mod annotations;
pub mod config;
pub mod config_loader;
pub mod criteria;
pub mod encoding;
pub mod pool;
pub mod store;

pub use annotations::AnnotationSet;
pub use config::{AppConfig, FeedConfig, IngestConfig, StoreConfig};
pub use config_loader::ConfigLoader;
pub use criteria::{PoolQueryCriteria, VolumePeriod};
pub use encoding::{decode_rate, decode_usd, encode_rate, encode_usd};
pub use pool::{PoolPatch, PoolRecord};
pub use store::{EntityCreate, EntityKey, PoolStore, QueryHit, StoreError, POOL_ENTITY_TYPE};
