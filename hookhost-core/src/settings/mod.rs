pub mod config;


pub use config::HostConfig;
