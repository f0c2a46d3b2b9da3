pub mod config;
pub mod constants;
pub mod error;
pub mod export;
pub mod extract;
pub mod html;
pub mod logging;
pub mod normalize;
pub mod pipeline;
pub mod record;
pub mod schema;
pub mod source;
pub mod types;
