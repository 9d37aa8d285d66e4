pub mod pages;
pub mod server;

pub use server::WebServer;
