pub mod auth;
pub mod blogs;
pub mod cookies;
pub mod credentials;
pub mod error;
pub mod form;
pub mod middleware;
pub mod routes;
pub mod rows;
pub mod sanitize;
pub mod session;
pub mod state;
pub mod view;
