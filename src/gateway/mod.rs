pub mod client;
pub mod worker;

pub use client::{HttpGateway, QuizGateway};
pub use worker::{GatewayHandle, dispatch, spawn_gateway_worker};
