pub mod manga;
pub mod novel;
