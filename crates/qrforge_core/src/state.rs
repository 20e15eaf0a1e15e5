use crate::view_model::{AppViewModel, TierNote};
use crate::{
    select_payload, ContactField, ContactRecord, Generation, InputKind, RenderConfig,
    RenderResult, RenderTier,
};

/// Where the recompute cycle currently stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Idle,
    Computing,
    Rendered,
    Failed,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppState {
    kind: InputKind,
    url_input: String,
    text_input: String,
    contact: ContactRecord,
    config: RenderConfig,
    payload: String,
    generation: Generation,
    phase: Phase,
    result: RenderResult,
    tier_notes: Vec<TierNote>,
    copied: bool,
    copy_seq: u64,
    last_download: Option<String>,
    dirty: bool,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn view(&self) -> AppViewModel {
        AppViewModel {
            kind: self.kind,
            url_input: self.url_input.clone(),
            text_input: self.text_input.clone(),
            contact: self.contact.clone(),
            config: self.config,
            payload: self.payload.clone(),
            generation: self.generation,
            phase: self.phase,
            rendered_by: self.result.tier(),
            tier_notes: self.tier_notes.clone(),
            copied: self.copied,
            last_download: self.last_download.clone(),
        }
    }

    /// Returns whether anything changed since the last call, and clears the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub fn kind(&self) -> InputKind {
        self.kind
    }

    pub fn payload(&self) -> &str {
        &self.payload
    }

    pub fn generation(&self) -> Generation {
        self.generation
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn result(&self) -> &RenderResult {
        &self.result
    }

    pub fn config(&self) -> RenderConfig {
        self.config
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub(crate) fn set_kind(&mut self, kind: InputKind) {
        self.kind = kind;
    }

    pub(crate) fn set_url_input(&mut self, value: String) {
        self.url_input = value;
    }

    pub(crate) fn set_text_input(&mut self, value: String) {
        self.text_input = value;
    }

    pub(crate) fn set_contact_field(&mut self, field: ContactField, value: String) {
        self.contact.set(field, value);
    }

    pub(crate) fn set_config(&mut self, config: RenderConfig) {
        self.config = config;
    }

    /// Starts a new generation, recomputes the payload and discards the
    /// current result. Returns the new generation.
    pub(crate) fn begin_recompute(&mut self) -> Generation {
        self.generation += 1;
        self.payload = select_payload(self.kind, &self.url_input, &self.text_input, &self.contact);
        self.result = RenderResult::Empty;
        self.tier_notes.clear();
        self.dirty = true;
        self.generation
    }

    pub(crate) fn enter_phase(&mut self, phase: Phase) {
        self.phase = phase;
    }

    pub(crate) fn record_tier_failure(&mut self, tier: RenderTier, reason: String) {
        self.tier_notes.push(TierNote { tier, reason });
        self.dirty = true;
    }

    pub(crate) fn settle(&mut self, result: RenderResult) {
        self.phase = if result.is_rendered() {
            Phase::Rendered
        } else {
            Phase::Failed
        };
        self.result = result;
        self.dirty = true;
    }

    pub(crate) fn mark_copied(&mut self) -> u64 {
        self.copy_seq += 1;
        self.copied = true;
        self.dirty = true;
        self.copy_seq
    }

    pub(crate) fn expire_copied(&mut self, seq: u64) {
        if seq == self.copy_seq && self.copied {
            self.copied = false;
            self.dirty = true;
        }
    }

    pub(crate) fn set_last_download(&mut self, path: String) {
        self.last_download = Some(path);
        self.dirty = true;
    }

    /// Back to empty inputs and no result. The generation and copy sequence
    /// keep counting so that late replies for earlier work stay stale.
    pub(crate) fn reset(&mut self) -> Generation {
        let generation = self.generation + 1;
        let copy_seq = self.copy_seq;
        let config = self.config;
        let kind = self.kind;
        *self = Self {
            kind,
            config,
            generation,
            copy_seq,
            dirty: true,
            ..Self::default()
        };
        generation
    }
}
