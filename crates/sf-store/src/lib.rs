pub mod bridge;
pub mod cache;
pub mod error;
pub mod publish;
pub mod remote;
pub mod session;
pub mod sync;

pub use bridge::{DEBOUNCE, PersistenceBridge, StoreNotification};
pub use cache::{FileCache, LocalCache, MemoryCache};
pub use error::StoreError;
pub use publish::{publish_site, validate_subdomain};
pub use remote::{MemoryStore, PublishRequest, PublishedSite, RemoteStore};
pub use session::{Session, SessionProvider, StaticSessionProvider};
pub use sync::{SyncPlan, plan_sync};
