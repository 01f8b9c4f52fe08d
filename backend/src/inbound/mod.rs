//! Inbound adapters translating transport traffic into domain ports.

pub mod http;
