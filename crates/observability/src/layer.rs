use super::config::ServiceContext;
use super::notifier::{NotificationEvent, Notifier};
use chrono::Utc;
use std::collections::BTreeMap;
use tracing::field::{Field, Visit};
use tracing::{Event, Subscriber};
use tracing_subscriber::Layer;
use tracing_subscriber::layer::Context;
use tracing_subscriber::registry::LookupSpan;

/// Forwards matching events to the notifier. Level filtering happens in the
/// `with_filter` wrapper installed by `init_observability`.
pub(crate) struct ErrorNotifyLayer {
    notifier: Notifier,
    service_context: ServiceContext,
}

impl ErrorNotifyLayer {
    pub(crate) fn new(notifier: Notifier, service_context: ServiceContext) -> Self {
        Self {
            notifier,
            service_context,
        }
    }
}

#[derive(Default)]
struct FieldMapVisitor {
    values: BTreeMap<String, String>,
}

impl FieldMapVisitor {
    fn insert(&mut self, field: &Field, value: String) {
        self.values
            .insert(field.name().to_string(), redact(field.name(), value));
    }
}

impl Visit for FieldMapVisitor {
    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        self.insert(field, format!("{value:?}"));
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        self.insert(field, value.to_string());
    }

    fn record_i64(&mut self, field: &Field, value: i64) {
        self.insert(field, value.to_string());
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        self.insert(field, value.to_string());
    }

    fn record_bool(&mut self, field: &Field, value: bool) {
        self.insert(field, value.to_string());
    }
}

impl<S> Layer<S> for ErrorNotifyLayer
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let mut visitor = FieldMapVisitor::default();
        event.record(&mut visitor);

        let message = visitor
            .values
            .remove("message")
            .map(|raw| unquote_debug_string(&raw));

        self.notifier.try_notify(NotificationEvent {
            level: *event.metadata().level(),
            timestamp: Utc::now(),
            service_name: self.service_context.service_name.clone(),
            environment: self.service_context.environment.clone(),
            component: self.service_context.component.clone(),
            target: event.metadata().target().to_string(),
            message,
            fields: visitor.values,
        });
    }
}

fn unquote_debug_string(input: &str) -> String {
    let trimmed = input.trim();
    if trimmed.starts_with('"') && trimmed.ends_with('"') && trimmed.len() >= 2 {
        return trimmed[1..trimmed.len() - 1].to_string();
    }
    trimmed.to_string()
}

fn redact(field_name: &str, value: String) -> String {
    let field = field_name.to_ascii_lowercase();
    let sensitive = field.contains("secret")
        || field.contains("password")
        || field.contains("token")
        || field.contains("webhook")
        || field.contains("authorization");

    if sensitive {
        return "[REDACTED]".to_string();
    }
    value
}
