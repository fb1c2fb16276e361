pub mod app;
pub mod auth;
pub mod link;
pub mod payment;
pub mod request;
pub mod response;
pub mod token;
pub mod wallet;
