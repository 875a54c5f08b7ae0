//! Artemis MBean object names in the form Jolokia accepts inside a URL path.
//!
//! Jolokia cannot take a raw `"` in a path segment, so every quote is written
//! as `!%22`. Nothing else is rewritten. Jolokia uses `!` as its own escape
//! character and there is no defined escape for a literal `!` in a value.
//! `/` splits Jolokia path segments, and `?` and `#` end the URL path. Values
//! carrying any of these are rejected instead of producing a name that points
//! at a different MBean.

use crate::constants::broker::{ARTEMIS_DOMAIN, QUEUE_SUBCOMPONENT};
use crate::constants::jolokia::QUOTE_ESCAPE;
use crate::errors::ToolError;

/// Coordinates of a queue below its address.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueueComponent<'a> {
    pub address: &'a str,
    pub subcomponent: &'a str,
    pub queue: &'a str,
    pub routing_type: &'a str,
}

impl<'a> QueueComponent<'a> {
    /// Artemis auto-created queues share their address name.
    pub fn for_queue(queue: &'a str, routing_type: &'a str) -> Self {
        Self {
            address: queue,
            subcomponent: QUEUE_SUBCOMPONENT,
            queue,
            routing_type,
        }
    }
}

pub fn escape_quotes(value: &str) -> String {
    value.replace('"', QUOTE_ESCAPE)
}

const RESERVED: [char; 4] = ['!', '/', '?', '#'];

fn quoted(value: &str, label: &str) -> Result<String, ToolError> {
    if let Some(ch) = value.chars().find(|ch| RESERVED.contains(ch)) {
        return Err(ToolError::invalid_params(format!(
            "{} must not contain '{}': it cannot be carried in a Jolokia path",
            label, ch
        ))
        .with_details(serde_json::json!({ "field": label, "value": value })));
    }
    Ok(format!(
        "{q}{}{q}",
        escape_quotes(value),
        q = QUOTE_ESCAPE
    ))
}

pub fn encode_object_name(
    broker_name: &str,
    queue: Option<&QueueComponent<'_>>,
) -> Result<String, ToolError> {
    let mut name = format!(
        "{}:broker={}",
        ARTEMIS_DOMAIN,
        quoted(broker_name, "broker_name")?
    );
    if let Some(queue) = queue {
        if queue.subcomponent.contains(RESERVED) {
            return Err(ToolError::invalid_params(
                "subcomponent must not contain Jolokia path characters",
            ));
        }
        let queue_value = quoted(queue.queue, "queue_name")?;
        // A derived address is reported under the name the caller supplied.
        let address_label = if queue.address == queue.queue {
            "queue_name"
        } else {
            "address"
        };
        let address_value = quoted(queue.address, address_label)?;
        let routing_value = quoted(queue.routing_type, "routing_type")?;
        name.push_str(&format!(
            ",component=addresses,address={},subcomponent={},routing-type={},queue={}",
            address_value,
            escape_quotes(queue.subcomponent),
            routing_value,
            queue_value,
        ));
    }
    Ok(name)
}

pub fn broker_object_name(broker_name: &str) -> Result<String, ToolError> {
    encode_object_name(broker_name, None)
}

pub fn queue_object_name(
    broker_name: &str,
    queue_name: &str,
    routing_type: &str,
) -> Result<String, ToolError> {
    encode_object_name(
        broker_name,
        Some(&QueueComponent::for_queue(queue_name, routing_type)),
    )
}
