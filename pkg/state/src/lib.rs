//! Persistence seam for environment-variable secrets.
//!
//! Callers depend on [`SecretStore`] only; [`KubeSecretStore`] talks to a
//! real cluster and [`MemorySecretStore`] keeps everything in-process.

pub mod kubernetes;
pub mod memory;
pub mod store;

pub use self::kubernetes::KubeSecretStore;
pub use self::memory::MemorySecretStore;
pub use self::store::{SecretStore, StoreError};
