// Serverless hosting
// Pulls gateway events from the runtime API and hands them to the handler

use lambda_runtime::{service_fn, Error, LambdaEvent};

use crate::event::{GatewayEvent, GatewayResponse};
use crate::handler::SolutionsHandler;
use crate::storage::ObjectStore;

/// Run the runtime loop until the runtime shuts the process down
///
/// The handler (and the store client inside it) is built once and reused by
/// every invocation.
pub async fn run<S: ObjectStore>(handler: SolutionsHandler<S>) -> Result<(), Error> {
    let handler = &handler;
    lambda_runtime::run(service_fn(move |event: LambdaEvent<GatewayEvent>| async move {
        let response =
            handle_invocation(handler, &event.payload, &event.context.request_id).await;
        Ok::<GatewayResponse, Error>(response)
    }))
    .await
}

/// One runtime invocation
pub async fn handle_invocation<S: ObjectStore>(
    handler: &SolutionsHandler<S>,
    payload: &GatewayEvent,
    request_id: &str,
) -> GatewayResponse {
    handler.invoke(&format!("lambda:{request_id}"), payload).await
}
