pub mod dto;
pub mod error;
pub mod models;
pub mod repository;

pub use repository::{
    TeamRepository,
    memory::InMemoryTeamRepository,
    team::{FileTeamRepository, JuryPartitions},
};
