//! Inbound webhook payload model.
//!
//! Mirrors the wire schema of LINE webhook deliveries closely enough to pull
//! out the two event kinds the relay acts on. Everything else deserializes
//! into catch-all variants and is dropped by [`inbound_events`].

use {
    serde::Deserialize,
    tracing::{debug, warn},
};

/// Top-level body of a webhook delivery.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebhookPayload {
    /// Bot user ID the delivery was addressed to.
    #[serde(default)]
    pub destination: Option<String>,

    /// Zero or more events. LINE's webhook URL verification probe sends an
    /// empty array.
    #[serde(default)]
    pub events: Vec<WebhookEvent>,
}

/// One webhook event, tagged by `type`. Only `message` events are handled;
/// follows, joins, postbacks and the rest fall through to `Other`.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum WebhookEvent {
    Message(MessageEvent),
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageEvent {
    /// One-shot token for replying to this event.
    pub reply_token: String,

    pub source: EventSource,

    pub message: MessageContent,
}

/// Sender of an event. Group and room sources may omit the user ID.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventSource {
    #[serde(default)]
    pub user_id: Option<String>,
}

/// Message body, tagged by `type`. Stickers, video and the other kinds the
/// relay does not handle fall through to `Other`.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum MessageContent {
    Text { text: String },
    Image { id: String },
    #[serde(other)]
    Other,
}

/// A webhook event distilled to what the relay acts on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InboundEvent {
    /// A text message; answered with the usage prompt.
    Text { reply_token: String, text: String },

    /// An image upload; acknowledged, analyzed, and answered by push.
    Image {
        reply_token: String,
        user_id: String,
        message_id: String,
    },
}

/// Flatten a webhook payload into the events the relay handles.
///
/// Image messages without a sender `userId` are dropped: there is no push
/// target for the analysis result.
pub fn inbound_events(payload: WebhookPayload) -> Vec<InboundEvent> {
    let mut out = Vec::new();
    for event in payload.events {
        let WebhookEvent::Message(event) = event else {
            debug!("ignoring non-message webhook event");
            continue;
        };
        match event.message {
            MessageContent::Text { text } => out.push(InboundEvent::Text {
                reply_token: event.reply_token,
                text,
            }),
            MessageContent::Image { id } => match event.source.user_id {
                Some(user_id) => out.push(InboundEvent::Image {
                    reply_token: event.reply_token,
                    user_id,
                    message_id: id,
                }),
                None => warn!(message_id = %id, "image event without sender id, skipping"),
            },
            MessageContent::Other => debug!("ignoring unsupported message kind"),
        }
    }
    out
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> Vec<InboundEvent> {
        inbound_events(serde_json::from_str(json).unwrap())
    }

    #[test]
    fn text_message_event() {
        let events = parse(
            r#"{
                "destination": "Ubot",
                "events": [{
                    "type": "message",
                    "timestamp": 1462629479859,
                    "replyToken": "rt-1",
                    "source": {"type": "user", "userId": "U1"},
                    "message": {"type": "text", "id": "m1", "text": "hello"}
                }]
            }"#,
        );
        assert_eq!(events, vec![InboundEvent::Text {
            reply_token: "rt-1".into(),
            text: "hello".into(),
        }]);
    }

    #[test]
    fn image_message_event() {
        let events = parse(
            r#"{
                "events": [{
                    "type": "message",
                    "replyToken": "rt-2",
                    "source": {"type": "user", "userId": "U2"},
                    "message": {"type": "image", "id": "m2", "contentProvider": {"type": "line"}}
                }]
            }"#,
        );
        assert_eq!(events, vec![InboundEvent::Image {
            reply_token: "rt-2".into(),
            user_id: "U2".into(),
            message_id: "m2".into(),
        }]);
    }

    #[test]
    fn image_without_user_id_is_dropped() {
        let events = parse(
            r#"{
                "events": [{
                    "type": "message",
                    "replyToken": "rt-3",
                    "source": {"type": "group", "groupId": "G1"},
                    "message": {"type": "image", "id": "m3"}
                }]
            }"#,
        );
        assert!(events.is_empty());
    }

    #[test]
    fn unsupported_kinds_are_dropped() {
        let events = parse(
            r#"{
                "events": [
                    {"type": "follow", "replyToken": "rt-4",
                     "source": {"type": "user", "userId": "U4"}},
                    {"type": "message", "replyToken": "rt-5",
                     "source": {"type": "user", "userId": "U5"},
                     "message": {"type": "sticker", "id": "m5", "packageId": "1"}},
                    {"type": "message", "replyToken": "rt-6",
                     "source": {"type": "user", "userId": "U6"},
                     "message": {"type": "text", "id": "m6", "text": "still here"}}
                ]
            }"#,
        );
        assert_eq!(events.len(), 1);
        assert!(matches!(&events[0], InboundEvent::Text { text, .. } if text == "still here"));
    }

    #[test]
    fn verification_probe_has_no_events() {
        let events = parse(r#"{"destination": "Ubot", "events": []}"#);
        assert!(events.is_empty());
    }
}
