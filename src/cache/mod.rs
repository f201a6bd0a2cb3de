// Cache module.
// Versioned response cache and the controller that intercepts outbound requests.

#![allow(dead_code, unused_imports)]

pub mod controller;
pub mod disk;
pub mod memory;
pub mod network;
pub mod paths;
pub mod request;
pub mod storage;

pub use controller::{CacheController, Event, EventOutcome, Interception, Lifecycle, Strategy};
pub use disk::DiskStorage;
pub use memory::MemoryStorage;
pub use network::{HttpNetwork, Network};
pub use request::{CachedResponse, FetchResponse, Request, RequestKey, ResponseSource};
pub use storage::{CacheStorage, Generation};
