pub mod downloads;
pub mod handlers;
pub mod routes;
pub mod workshop;

pub use routes::create_router;
