pub mod analytics;
pub mod dao;

pub use dao::BaseDao;
