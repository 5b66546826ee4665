pub mod profile_cache;
pub mod profile_service;

pub use profile_cache::ProfileCache;
pub use profile_service::ProfileService;
