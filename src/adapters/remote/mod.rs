//! Remote sync: object storage plus the shared campaign table
//!
//! - [`traits`] - [`ObjectStorage`] and [`CampaignStore`]
//! - [`supabase`] - hosted backend over the Supabase HTTP APIs
//! - [`memory`] - in-process backend for dry runs and tests
//! - [`publisher`] - upload-then-record workflow

pub mod factory;
pub mod memory;
pub mod publisher;
pub mod supabase;
pub mod traits;

pub use factory::{create_remote, RemoteBackend};
pub use memory::InMemoryRemote;
pub use publisher::CampaignPublisher;
pub use supabase::SupabaseClient;
pub use traits::{CampaignStore, ObjectStorage};
