use crate::detail::{Confirmation, Notifier};
use flume::{Receiver, Sender};
use std::time::Duration;
use tokio::sync::oneshot;

/// Messages the panel wants shown to the user
#[derive(Debug)]
pub enum Notice {
    Info {
        message: String,
        auto_close: Option<Duration>,
    },
    Error {
        message: String,
    },
    Confirm {
        message: String,
        reply: oneshot::Sender<bool>,
    },
}

/// Notifier that queues notices for the app's main loop.
///
/// Confirmations are answered later through the `reply` sender carried by
/// [`Notice::Confirm`]; if the app drops it the question counts as declined.
#[derive(Debug, Clone)]
pub struct StatusNotifier {
    sender: Sender<Notice>,
}

impl StatusNotifier {
    pub fn channel() -> (Self, Receiver<Notice>) {
        let (sender, receiver) = flume::unbounded();
        (Self { sender }, receiver)
    }

    fn send(&self, notice: Notice) {
        if self.sender.send(notice).is_err() {
            tracing::warn!("notice dropped, nobody is listening");
        }
    }
}

impl Notifier for StatusNotifier {
    fn info(&self, message: &str, auto_close: Option<Duration>) {
        self.send(Notice::Info {
            message: message.to_string(),
            auto_close,
        });
    }

    fn error(&self, message: &str) {
        self.send(Notice::Error {
            message: message.to_string(),
        });
    }

    fn confirm(&self, message: &str) -> Confirmation {
        let (reply, answer) = oneshot::channel();
        self.send(Notice::Confirm {
            message: message.to_string(),
            reply,
        });
        Confirmation::from_reply(answer)
    }
}
