// Module layout (Clean Architecture style)
// - bootstrap: configuration and startup wiring
// - infrastructure: Postgres, filesystem and notification adapters
// - presentation: HTTP handlers and routing
// - application: ports, forms, services and use cases
// - domain: core models

pub mod application;
pub mod bootstrap;
pub mod domain;
pub mod infrastructure;
pub mod presentation;
