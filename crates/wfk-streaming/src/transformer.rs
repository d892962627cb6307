//! Transformer chain applied to every event before it reaches a subscriber
//! (§4.7).

use async_trait::async_trait;
use wfk_kernel::event::Event;

/// One named step in the transformer chain. `filter` runs first and, if it
/// returns `false`, the event is dropped before `transform` is ever called.
/// A `transform` failure must not abort the pipeline — §7 requires the
/// original event be forwarded unchanged, with the failure only logged.
#[async_trait]
pub trait Transformer: Send + Sync {
    fn name(&self) -> &str;

    fn filter(&self, _event: &Event) -> bool {
        true
    }

    async fn transform(&self, event: Event) -> Result<Event, String>;
}

/// A transformer built from plain closures, for callers that don't need a
/// dedicated type.
pub struct FnTransformer<F> {
    name: String,
    filter: Option<Box<dyn Fn(&Event) -> bool + Send + Sync>>,
    transform: F,
}

impl<F> FnTransformer<F>
where
    F: Fn(Event) -> Result<Event, String> + Send + Sync,
{
    pub fn new(name: impl Into<String>, transform: F) -> Self {
        Self { name: name.into(), filter: None, transform }
    }

    pub fn with_filter(mut self, filter: impl Fn(&Event) -> bool + Send + Sync + 'static) -> Self {
        self.filter = Some(Box::new(filter));
        self
    }
}

#[async_trait]
impl<F> Transformer for FnTransformer<F>
where
    F: Fn(Event) -> Result<Event, String> + Send + Sync,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn filter(&self, event: &Event) -> bool {
        self.filter.as_ref().map(|f| f(event)).unwrap_or(true)
    }

    async fn transform(&self, event: Event) -> Result<Event, String> {
        (self.transform)(event)
    }
}
