pub mod maps;
pub mod recommender;
pub mod role_stats;
pub mod roles;
