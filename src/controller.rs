use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use crate::error::LookupError;
use crate::host::{HostEvent, HostRuntime};
use crate::proxy::{LookupBackend, LookupResponse, AGENT_CODE_KEY, AGENT_NAME_KEY};
use crate::resolve;
use crate::surface::{Binding, FormSurface, Indicator};

/// Events on the source field that trigger a lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceEvent {
    Blur,
    /// Enter pressed while the field has focus. The embedder must suppress
    /// the default form submission when `on_source_event` says so.
    EnterKey,
}

#[derive(Default)]
struct BufferedValues {
    agent_code: String,
    agent_name: String,
}

/// Drives the lookup-and-populate flow: field events in, proxy call out,
/// destination field mutation as the result. One instance per embedded
/// widget; the composing page owns it and forwards host callbacks to it.
pub struct LookupController {
    backend: Arc<dyn LookupBackend>,
    surface: Arc<dyn FormSurface>,
    host: Option<Arc<dyn HostRuntime>>,
    source_field: String,
    binding: Binding,
    in_flight: AtomicBool,
    state: Mutex<BufferedValues>,
}

impl LookupController {
    pub fn new(
        backend: Arc<dyn LookupBackend>,
        surface: Arc<dyn FormSurface>,
        source_field: impl Into<String>,
        binding: Binding,
    ) -> Self {
        Self {
            backend,
            surface,
            host: None,
            source_field: source_field.into(),
            binding,
            in_flight: AtomicBool::new(false),
            state: Mutex::new(BufferedValues::default()),
        }
    }

    pub fn with_host(mut self, host: Arc<dyn HostRuntime>) -> Self {
        self.host = Some(host);
        self
    }

    /// Gate event forwarding on surface readiness. Resolves once `ready`
    /// does and hands the controller back for binding; a surface that is
    /// already ready resolves immediately, so both load orders end up with
    /// exactly one binding.
    pub async fn bind_when_ready<F>(self: Arc<Self>, ready: F) -> Arc<Self>
    where
        F: std::future::Future<Output = ()>,
    {
        ready.await;
        log::debug!("surface ready, binding source field {}", self.source_field);
        self
    }

    /// Handle a source-field event. Returns `true` when the embedder should
    /// suppress the event's default action (Enter submitting the form).
    pub async fn on_source_event(&self, event: SourceEvent) -> bool {
        let suppress_default = matches!(event, SourceEvent::EnterKey);

        if self.in_flight.load(Ordering::SeqCst) {
            log::debug!("lookup in flight, dropping {event:?} trigger");
            return suppress_default;
        }

        let code = self.surface.value(&self.source_field).unwrap_or_default();
        self.lookup(&code).await;

        suppress_default
    }

    /// Run one lookup. Fire-and-forget from the caller's perspective: every
    /// failure is absorbed here and reported through the error indicator.
    pub async fn lookup(&self, code: &str) {
        if code.trim().is_empty() {
            log::debug!("empty agent code, clearing destination");
            self.clear_values();
            return;
        }

        // No queuing: a trigger that lands while a call is outstanding is
        // dropped, the in-flight call proceeds untouched.
        if self
            .in_flight
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            log::debug!("lookup in flight, dropping request for code {code}");
            return;
        }

        self.surface.set_indicator(Indicator::Loading, true);
        self.surface.set_indicator(Indicator::Error, false);
        self.surface.set_indicator(Indicator::Success, false);

        log::info!("looking up agent code {code}");

        match self.run_lookup(code).await {
            Ok(name) => {
                {
                    let mut state = self.state.lock().unwrap();
                    state.agent_code = code.to_string();
                    state.agent_name = name.clone();
                }
                self.populate_destination(&name);
                self.surface.set_indicator(Indicator::Success, true);
            }
            Err(err) => {
                log::warn!("agent lookup for code {code} failed: {err}");
                self.clear_values();
                self.surface.set_indicator(Indicator::Error, true);
            }
        }

        self.in_flight.store(false, Ordering::SeqCst);
        self.surface.set_indicator(Indicator::Loading, false);
    }

    async fn run_lookup(&self, code: &str) -> Result<String, LookupError> {
        let response = self.backend.lookup(code).await?;

        let data = match response {
            LookupResponse {
                success: true,
                data: Some(data),
            } if !data.is_null() => data,
            _ => return Err(LookupError::NoMatch),
        };

        resolve::agent_name(&data).ok_or(LookupError::NoMatch)
    }

    /// Forward a host lifecycle event. `Submit` delivers the buffered values
    /// synchronously; the host does not await, so no async work may happen
    /// on that path.
    pub fn on_host_event(&self, event: HostEvent) {
        match event {
            HostEvent::Ready => log::info!("host widget ready"),
            HostEvent::Submit => self.submit(),
            HostEvent::Reset => self.reset(),
        }
    }

    fn submit(&self) {
        let Some(host) = &self.host else {
            log::debug!("no host runtime attached, skipping submit");
            return;
        };

        let state = self.state.lock().unwrap();
        let mut payload = BTreeMap::new();
        payload.insert(AGENT_CODE_KEY.to_string(), state.agent_code.clone());
        payload.insert(AGENT_NAME_KEY.to_string(), state.agent_name.clone());
        drop(state);

        host.send_submit(payload);
    }

    /// Clear buffered values, source and destination fields, and all
    /// indicators. An in-flight lookup is not aborted; if one settles after
    /// the reset, its outcome is applied over the cleared state.
    pub fn reset(&self) {
        self.clear_values();
        self.surface.clear_field(&self.source_field);

        for indicator in [Indicator::Loading, Indicator::Error, Indicator::Success] {
            self.surface.set_indicator(indicator, false);
        }
    }

    pub fn agent_name(&self) -> String {
        self.state.lock().unwrap().agent_name.clone()
    }

    fn clear_values(&self) {
        {
            let mut state = self.state.lock().unwrap();
            state.agent_code.clear();
            state.agent_name.clear();
        }
        for id in self.destination_ids(true) {
            self.surface.clear_field(&id);
        }
    }

    fn populate_destination(&self, name: &str) {
        let ids = self.destination_ids(false);
        if ids.is_empty() {
            log::warn!("no destination field found for agent name");
            return;
        }
        for id in ids {
            self.surface.set_value(&id, name);
        }
    }

    /// Resolve destination field handles. Population targets the single
    /// best match; clearing wipes every candidate.
    fn destination_ids(&self, clearing: bool) -> Vec<String> {
        match &self.binding {
            Binding::Explicit { destination } => vec![destination.clone()],
            Binding::ByNamePattern { patterns } => {
                let fields = self.surface.fields();
                let names: Vec<&str> = fields.iter().map(|f| f.name.as_str()).collect();
                let patterns: Vec<&str> = patterns.iter().map(String::as_str).collect();

                if clearing {
                    resolve::fields_matching(&names, &patterns)
                        .into_iter()
                        .map(|i| fields[i].id.clone())
                        .collect()
                } else {
                    resolve::field_by_name_pattern(&names, &patterns)
                        .map(|i| vec![fields[i].id.clone()])
                        .unwrap_or_default()
                }
            }
        }
    }
}
