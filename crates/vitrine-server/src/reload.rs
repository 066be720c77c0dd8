//! WebSocket live reload for dev mode.

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

/// Messages pushed to connected browsers.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ReloadMessage {
    /// Full page reload after a rebuild.
    Reload,

    /// Connection established.
    Connected,
}

/// Hub broadcasting reload messages to every connected client.
#[derive(Debug, Clone)]
pub struct ReloadHub {
    sender: broadcast::Sender<ReloadMessage>,
}

impl ReloadHub {
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(16);
        Self { sender }
    }

    /// Send to all connected clients. No receivers is not an error.
    pub fn send(&self, msg: ReloadMessage) {
        let _ = self.sender.send(msg);
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ReloadMessage> {
        self.sender.subscribe()
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for ReloadHub {
    fn default() -> Self {
        Self::new()
    }
}

/// Client script served at `/__reload.js` in dev mode only.
pub fn reload_client_script(ws_url: &str) -> String {
    format!(
        r#"
(function() {{
  'use strict';

  var ws = new WebSocket('{}');

  ws.onmessage = function(event) {{
    var msg = JSON.parse(event.data);
    if (msg.type === 'reload') {{
      location.reload();
    }}
  }};

  ws.onclose = function() {{
    setTimeout(function() {{ location.reload(); }}, 1000);
  }};
}})();
"#,
        ws_url
    )
}
