//! 命令定义和实现

pub mod config;
pub mod devices;
pub mod markers;
pub mod run;

pub use config::ConfigCommand;
pub use devices::DevicesCommand;
pub use markers::MarkersCommand;
pub use run::RunCommand;
