mod gateway_error;

pub use self::gateway_error::{ErrorResponse, GatewayError};
