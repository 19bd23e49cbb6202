pub mod host_virus;
pub mod params;
pub mod solver;
pub mod trajectory;
