use std::sync::{Arc, Mutex};

use axum::async_trait;

use crate::keeper::ChatNotifier;

/// Chat notifier which stores every message it is asked to send.
pub struct MockNotifier {
    messages: Arc<Mutex<Vec<String>>>,
}

impl MockNotifier {
    pub fn new() -> (Self, Arc<Mutex<Vec<String>>>) {
        let messages = Arc::new(Mutex::new(vec![]));
        (
            Self {
                messages: Arc::clone(&messages),
            },
            messages,
        )
    }
}

#[async_trait]
impl ChatNotifier for MockNotifier {
    async fn notify(&self, message: &str) -> anyhow::Result<()> {
        self.messages.lock().unwrap().push(message.to_string());
        Ok(())
    }
}
