//! WebSocket push of re-rendered previews.

use livepane_adapters::FrameworkKind;
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

/// Messages sent to connected host pages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum HmrMessage {
    /// Full page reload
    Reload,

    /// Replace the preview iframe's document
    UpdatePreview {
        /// Framework the snippet was classified as
        kind: FrameworkKind,
        /// Complete HTML document
        html: String,
    },

    /// Connection established
    Connected,
}

/// Hub for broadcasting HMR messages to all connected clients.
#[derive(Debug, Clone)]
pub struct HmrHub {
    sender: broadcast::Sender<HmrMessage>,
}

impl HmrHub {
    /// Create a new HMR hub.
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(100);
        Self { sender }
    }

    /// Send a message to all connected clients.
    pub fn send(&self, msg: HmrMessage) {
        // No receivers just means no page is open
        let _ = self.sender.send(msg);
    }

    /// Subscribe to HMR messages.
    pub fn subscribe(&self) -> broadcast::Receiver<HmrMessage> {
        self.sender.subscribe()
    }

    /// Get the number of active subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for HmrHub {
    fn default() -> Self {
        Self::new()
    }
}

/// Generate the host page's HMR client.
///
/// The socket URL is derived from `location`, so the script works behind any
/// host and port. Preview updates swap the iframe's `srcdoc`; the iframe
/// keeps its sandbox attribute.
pub fn hmr_client_script(ws_path: &str) -> String {
    format!(
        r#"
(function() {{
  'use strict';

  const url = (location.protocol === 'https:' ? 'wss://' : 'ws://') + location.host + '{ws_path}';
  const ws = new WebSocket(url);
  let reconnectAttempts = 0;
  const maxReconnectAttempts = 10;

  ws.onopen = function() {{
    console.log('[livepane] Connected');
    reconnectAttempts = 0;
  }};

  ws.onmessage = function(event) {{
    const msg = JSON.parse(event.data);

    switch (msg.type) {{
      case 'reload':
        location.reload();
        break;

      case 'update_preview':
        const frame = document.getElementById('preview');
        const kind = document.getElementById('kind');
        if (!frame) {{
          location.reload();
          break;
        }}
        frame.srcdoc = msg.html;
        if (kind) {{
          kind.textContent = msg.kind;
        }}
        break;

      case 'connected':
        console.log('[livepane] Server acknowledged connection');
        break;
    }}
  }};

  ws.onclose = function() {{
    console.log('[livepane] Disconnected');
    if (reconnectAttempts < maxReconnectAttempts) {{
      reconnectAttempts++;
      setTimeout(function() {{
        location.reload();
      }}, 1000 * reconnectAttempts);
    }}
  }};

  ws.onerror = function(e) {{
    console.error('[livepane] WebSocket error:', e);
  }};
}})();
"#
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn hub_broadcasts_messages() {
        let hub = HmrHub::new();
        let mut rx = hub.subscribe();

        hub.send(HmrMessage::Reload);

        assert_eq!(rx.try_recv().unwrap(), HmrMessage::Reload);
        assert_eq!(hub.subscriber_count(), 1);
    }

    #[test]
    fn send_without_subscribers_is_harmless() {
        let hub = HmrHub::new();
        hub.send(HmrMessage::Connected);

        assert_eq!(hub.subscriber_count(), 0);
    }

    #[test]
    fn serializes_preview_updates() {
        let msg = HmrMessage::UpdatePreview {
            kind: FrameworkKind::Vue,
            html: "<!DOCTYPE html>".to_string(),
        };

        let json: serde_json::Value = serde_json::to_value(&msg).unwrap();

        assert_eq!(json["type"], "update_preview");
        assert_eq!(json["kind"], "vue");
        assert_eq!(json["html"], "<!DOCTYPE html>");
    }

    #[test]
    fn client_swaps_srcdoc() {
        let script = hmr_client_script("/__hmr");

        assert!(script.contains("location.host + '/__hmr'"));
        assert!(script.contains("frame.srcdoc = msg.html;"));
    }
}
