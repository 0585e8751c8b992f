// crates/replier-server/src/config/mod.rs
// Configuration for the Replier server

mod env;

pub use env::{
    ANTHROPIC_API_KEY_VAR, ANTHROPIC_BASE_URL_VAR, Config, DEFAULT_BASE_URL, DEFAULT_HOST,
    DEFAULT_PORT, HOST_VAR, PORT_VAR,
};
