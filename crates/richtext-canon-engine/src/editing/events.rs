//! Observer registration.
//!
//! A flat registry of named handlers: `bind` appends, `unbind` removes
//! every handler for a name, `trigger` fires matching handlers in
//! registration order. Handlers bound to `"all"` receive every event with
//! its real name. Delivery is at-least-once per trigger; there is no
//! ordering guarantee across distinct handlers beyond registration order.

pub type Handler = Box<dyn FnMut(&str)>;

#[derive(Default)]
pub struct EventBus {
    handlers: Vec<(String, Handler)>,
}

impl EventBus {
    pub fn new() -> EventBus {
        EventBus::default()
    }

    pub fn bind(&mut self, event: &str, handler: impl FnMut(&str) + 'static) {
        self.handlers.push((event.to_string(), Box::new(handler)));
    }

    /// Remove every handler bound to `event`.
    pub fn unbind(&mut self, event: &str) {
        self.handlers.retain(|(name, _)| name != event);
    }

    pub fn trigger(&mut self, event: &str) {
        for (name, handler) in &mut self.handlers {
            if name == event || name == "all" {
                handler(event);
            }
        }
    }
}
