use crate::app::{App, Message, Model, update};
use crate::debounce::Debouncer;

impl App {
    /// Timers driven by messages: typing (re)arms the search debounce,
    /// Enter consumes it early and Escape drops it.
    pub(super) fn handle_message_side_effects(
        search_debouncer: &mut Debouncer<()>,
        msg: &Message,
        now_ms: u64,
    ) {
        match msg {
            msg if msg.edits_search() => search_debouncer.schedule((), now_ms),
            Message::SearchCommit => {
                search_debouncer.flush();
            }
            Message::Escape => search_debouncer.cancel(),
            _ => {}
        }
    }

    /// Run the debounced search once its quiet period has elapsed.
    pub(super) fn fire_ready_search(
        model: &mut Model,
        search_debouncer: &mut Debouncer<()>,
        now_ms: u64,
    ) -> bool {
        if search_debouncer.take_ready(now_ms).is_none() {
            return false;
        }
        tracing::trace!(query = model.page.search_value(), "debounced search fired");
        *model = update(std::mem::take(model), Message::SearchCommit);
        true
    }

    /// Apply one message and its side effects.
    pub(super) fn dispatch(
        model: &mut Model,
        search_debouncer: &mut Debouncer<()>,
        msg: Message,
        now_ms: u64,
    ) {
        tracing::trace!(?msg, "message");
        let side_msg = msg.clone();
        *model = update(std::mem::take(model), msg);
        Self::handle_message_side_effects(search_debouncer, &side_msg, now_ms);
    }
}
