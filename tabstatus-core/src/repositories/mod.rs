// src/repositories/mod.rs

pub mod yaml;
pub mod memory;

pub use tabstatus_common::traits::repository_traits::StatusRepository;
pub use yaml::YamlStatusRepository;
pub use memory::MemoryStatusRepository;
