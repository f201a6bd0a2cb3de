// Data module.
// Organization and repository views plus the normalizer producing them.

#![allow(dead_code, unused_imports)]

pub mod model;
pub mod normalize;

pub use model::{Organization, Repository, RepositoryList};
pub use normalize::{MAX_REPOS, normalize_org, normalize_repos};
