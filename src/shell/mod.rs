// Composition root: configuration, repository selection, verifier discovery
// and the HTTP router.

pub mod config;
pub mod http;
pub mod state;
