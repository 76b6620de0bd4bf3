//! JavaScript execution operations for CDP page session.

use serde_json::{Value, json};

use crate::cdp::error::CdpError;
use crate::cdp::protocol::{ExceptionDetails, PropertyDescriptor, RemoteObject};

use super::core::PageSession;

/// Turn `exceptionDetails` in a Runtime result into an error.
fn check_exception(result: &Value) -> Result<(), CdpError> {
    match result.get("exceptionDetails") {
        Some(details) => {
            let message = serde_json::from_value::<ExceptionDetails>(details.clone())
                .map(|d| d.message())
                .unwrap_or_else(|_| "Unknown error".to_string());
            Err(CdpError::JavaScript(message))
        }
        None => Ok(()),
    }
}

/// By-value result, with `undefined` reported as null.
fn returned_value(result: &Value) -> Value {
    result["result"].get("value").cloned().unwrap_or(Value::Null)
}

impl PageSession {
    /// Evaluate an expression, awaiting promises, and return its JSON value.
    pub async fn evaluate(&self, expression: &str) -> Result<Value, CdpError> {
        let result = self
            .call(
                "Runtime.evaluate",
                Some(json!({
                    "expression": expression,
                    "returnByValue": true,
                    "awaitPromise": true,
                    "userGesture": true,
                })),
            )
            .await?;

        check_exception(&result)?;
        Ok(returned_value(&result))
    }

    /// Evaluate JavaScript and return remote object.
    pub async fn evaluate_handle(&self, expression: &str) -> Result<RemoteObject, CdpError> {
        let result = self
            .call(
                "Runtime.evaluate",
                Some(json!({
                    "expression": expression,
                    "returnByValue": false,
                })),
            )
            .await?;

        check_exception(&result)?;
        let remote_obj: RemoteObject = serde_json::from_value(result["result"].clone())?;
        Ok(remote_obj)
    }

    /// Call a function with `this` bound to a remote object, returning by value.
    pub async fn call_function_on(
        &self,
        object_id: &str,
        function: &str,
        args: Vec<Value>,
    ) -> Result<Value, CdpError> {
        let result = self
            .call(
                "Runtime.callFunctionOn",
                Some(Self::call_params(object_id, function, args, true)),
            )
            .await?;

        check_exception(&result)?;
        Ok(returned_value(&result))
    }

    /// Call a function with `this` bound to a remote object, returning a handle.
    pub async fn call_function_on_handle(
        &self,
        object_id: &str,
        function: &str,
        args: Vec<Value>,
    ) -> Result<RemoteObject, CdpError> {
        let result = self
            .call(
                "Runtime.callFunctionOn",
                Some(Self::call_params(object_id, function, args, false)),
            )
            .await?;

        check_exception(&result)?;
        let remote_obj: RemoteObject = serde_json::from_value(result["result"].clone())?;
        Ok(remote_obj)
    }

    fn call_params(object_id: &str, function: &str, args: Vec<Value>, by_value: bool) -> Value {
        json!({
            "objectId": object_id,
            "functionDeclaration": function,
            "arguments": args.into_iter().map(|v| json!({"value": v})).collect::<Vec<_>>(),
            "returnByValue": by_value,
            "awaitPromise": true,
            "userGesture": true,
        })
    }

    /// Own properties of a remote object.
    pub async fn get_properties(&self, object_id: &str) -> Result<Vec<PropertyDescriptor>, CdpError> {
        let result = self
            .call(
                "Runtime.getProperties",
                Some(json!({
                    "objectId": object_id,
                    "ownProperties": true,
                })),
            )
            .await?;

        let props: Vec<PropertyDescriptor> = serde_json::from_value(result["result"].clone())?;
        Ok(props)
    }

    /// Release a remote object. Failures are ignored, the object may already be gone.
    pub async fn release_object(&self, object_id: &str) {
        let _ = self
            .call(
                "Runtime.releaseObject",
                Some(json!({"objectId": object_id})),
            )
            .await;
    }
}
