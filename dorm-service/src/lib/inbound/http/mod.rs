pub mod cookie;
pub mod handlers;
pub mod middleware;
pub mod router;
