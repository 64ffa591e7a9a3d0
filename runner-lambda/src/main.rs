use greeter_core::config::load_config;
use greeter_core::greeter::{self, Event, Response};
use greeter_core::telemetry::init_tracing;
use lambda_runtime::{Error, LambdaEvent, service_fn};
use tracing::debug;

/// Payloads that are not JSON objects never get here: `lambda_runtime` fails
/// to deserialize them into `Event` and reports that to the Lambda service.
pub async fn lambda_handler(event: LambdaEvent<Event>) -> Result<Response, Error> {
    let (payload, context) = event.into_parts();
    debug!(request_id = %context.request_id, "greeting");

    Ok(greeter::handle(&payload))
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    let config = load_config(None)?;
    init_tracing(&config.telemetry);

    lambda_runtime::run(service_fn(lambda_handler)).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use lambda_runtime::Context;
    use serde_json::json;

    fn lambda_event(payload: serde_json::Value) -> LambdaEvent<Event> {
        let event: Event = serde_json::from_value(payload).unwrap();
        LambdaEvent::new(event, Context::default())
    }

    #[tokio::test]
    async fn test_handler_greets_name() {
        let response = lambda_handler(lambda_event(json!({"name": "Ada"})))
            .await
            .unwrap();
        assert_eq!(response.message, "Hello, Ada!");
    }

    #[tokio::test]
    async fn test_handler_defaults_without_name() {
        let response = lambda_handler(lambda_event(json!({"other": 1})))
            .await
            .unwrap();
        assert_eq!(
            serde_json::to_value(response).unwrap(),
            json!({"message": "Hello, World!"})
        );
    }

    #[test]
    fn test_non_object_payload_does_not_deserialize() {
        assert!(serde_json::from_value::<Event>(json!(["Ada"])).is_err());
    }
}
