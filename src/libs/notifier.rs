use crate::libs::messages::Message;
use crate::{msg_error, msg_success};

/// Fire-and-forget user notices about operation outcomes.
///
/// Nothing waits on a notice and nothing downstream depends on it being shown.
pub trait Notifier {
    fn success(&self, message: Message);
    fn error(&self, message: Message);
}

impl<T: Notifier + ?Sized> Notifier for &T {
    fn success(&self, message: Message) {
        (**self).success(message)
    }

    fn error(&self, message: Message) {
        (**self).error(message)
    }
}

/// Prints notices through the message macros.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn success(&self, message: Message) {
        msg_success!(message);
    }

    fn error(&self, message: Message) {
        msg_error!(message);
    }
}
