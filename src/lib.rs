// Atelier - AI content-creation orchestrator
//
// Library surface: the template dispatcher core under `studio`, plus the
// configuration and capability layers the binary wires together.

pub mod capabilities;
pub mod config;
pub mod studio;
