//! Request and response values exchanged with the gateway.

mod request;
mod response;

pub use request::GatewayRequest;
pub use response::GatewayResponse;
