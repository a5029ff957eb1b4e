//! # Sistema de Métricas
//! src/metrics/mod.rs
//!
//! Este módulo implementa la recolección de métricas del servidor:
//! - Contadores de requests y códigos de estado
//! - Comandos CGI ejecutados
//! - Threads de conexión activos

pub mod collector;

pub use collector::MetricsCollector;
