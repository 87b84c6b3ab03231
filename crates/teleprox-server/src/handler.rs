//! Request dispatch: one [`Request`] in, one [`Response`] out.

use tracing::{debug, warn};

use teleprox_protocol::{ErrorObject, Request, Response};

use crate::registry::ObjectRegistry;

/// Produces the response for one request, always echoing its id.
///
/// A request with an unsupported version tag fails the exchange itself
/// (error without `data`); a member that raises surfaces as an
/// application error carrying its kind and message.
pub fn handle_request(registry: &mut ObjectRegistry, request: &Request) -> Response {
    if !request.is_compatible() {
        warn!(version = %request.jsonrpc, "unsupported protocol version");
        return Response::failure(
            &request.id,
            ErrorObject::protocol(format!(
                "unsupported protocol version '{}'",
                request.jsonrpc
            )),
        );
    }

    debug!(method = %request.method, id = %request.id, "dispatching");

    match registry.dispatch(&request.method, &request.params) {
        Ok(result) => Response::success(&request.id, result),
        Err(fault) => {
            debug!(method = %request.method, %fault, "member raised");
            Response::failure(&request.id, ErrorObject::application(fault.kind, fault.message))
        }
    }
}
