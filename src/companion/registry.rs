//! Handler registries for variable changes and button interactions

use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use super::matcher::Matcher;
use super::protocol::{ButtonEvent, ButtonEventKind, ButtonLocation, VariableChange};

pub type HandlerFuture = Pin<Box<dyn Future<Output = anyhow::Result<()>> + Send>>;
pub type ChangeHandler = Arc<dyn Fn(VariableChange) -> HandlerFuture + Send + Sync>;
pub type ButtonHandler = Arc<dyn Fn(ButtonEvent) -> HandlerFuture + Send + Sync>;

struct ChangeRegistration {
    connection: String,
    matcher: Matcher,
    handler: ChangeHandler,
}

#[derive(Default)]
pub struct HandlerRegistry {
    changes: Vec<ChangeRegistration>,
    buttons: HashMap<(ButtonLocation, ButtonEventKind), Vec<ButtonHandler>>,
}

impl HandlerRegistry {
    pub fn add_change(&mut self, connection: String, matcher: Matcher, handler: ChangeHandler) {
        self.changes.push(ChangeRegistration {
            connection,
            matcher,
            handler,
        });
    }

    pub fn add_button(&mut self, location: ButtonLocation, kind: ButtonEventKind, handler: ButtonHandler) {
        self.buttons.entry((location, kind)).or_default().push(handler);
    }

    /// Handlers for `variable` on `connection`, in registration order.
    pub fn change_handlers(&self, connection: &str, variable: &str) -> Vec<ChangeHandler> {
        self.changes
            .iter()
            .filter(|r| r.connection == connection && r.matcher.matches(variable))
            .map(|r| Arc::clone(&r.handler))
            .collect()
    }

    pub fn button_handlers(&self, location: &ButtonLocation, kind: ButtonEventKind) -> Vec<ButtonHandler> {
        self.buttons
            .get(&(location.clone(), kind))
            .cloned()
            .unwrap_or_default()
    }
}
