// Transformation pipeline: ingestion, processing, and output

pub mod ingestion;
pub mod output;
pub mod processing;

use serde::Serialize;
use std::collections::BTreeMap;
use std::time::Instant;
use tracing::{debug, info, instrument, warn};

use crate::config::SelfPartyConfig;
use crate::domain::EntityDocument;
use crate::error::Result;
use crate::metrics::{IngestMetrics, TransformMetrics};
use crate::types::{MessageSource, SmsMessage};
use processing::{build_transaction, classify, Ledger, MessageKind, Registry};

/// Result of a complete pipeline run
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PipelineResult {
    pub source_id: String,
    pub total_messages: usize,
    pub classified: BTreeMap<MessageKind, usize>,
    pub skipped_messages: usize,
    pub customers: usize,
    pub agents: usize,
    pub sender_logs: usize,
    pub receiver_logs: usize,
    pub transactions: usize,
}

impl PipelineResult {
    pub fn classified_count(&self, kind: MessageKind) -> usize {
        self.classified.get(&kind).copied().unwrap_or(0)
    }
}

/// Owns all state of one run: the identity registry and the transaction ledger.
///
/// Messages must be fed in source order; later messages resolve parties created
/// by earlier ones. State is dropped with the pipeline and never shared between runs.
pub struct Pipeline {
    registry: Registry,
    ledger: Ledger,
    result: PipelineResult,
}

impl Pipeline {
    pub fn new(self_party: SelfPartyConfig) -> Self {
        Self {
            registry: Registry::new(self_party),
            ledger: Ledger::new(),
            result: PipelineResult::default(),
        }
    }

    /// Classify one message and build its transaction.
    /// Returns the kind, or `None` when the message was skipped.
    pub fn process(&mut self, message: &SmsMessage) -> Option<MessageKind> {
        self.result.total_messages += 1;
        TransformMetrics::record_message_seen();

        let Some(kind) = classify(&message.body) else {
            debug!("Skipping unrecognized message dated {}", message.readable_date);
            self.result.skipped_messages += 1;
            TransformMetrics::record_skipped();
            return None;
        };

        let id = build_transaction(kind, message, &mut self.registry, &mut self.ledger);
        debug!("Message classified as {} -> {}", kind, id);
        *self.result.classified.entry(kind).or_insert(0) += 1;
        TransformMetrics::record_classified(kind);
        Some(kind)
    }

    /// Consume the pipeline and assemble the output document
    pub fn finish(self) -> (EntityDocument, PipelineResult) {
        let Pipeline {
            registry,
            ledger,
            mut result,
        } = self;

        let document = EntityDocument {
            customers: registry.customers.into_rows(),
            agents: registry.agents.into_rows(),
            deposits: ledger.deposits,
            withdrawals: ledger.withdrawals,
            sender_logs: registry.sender_logs.into_rows(),
            receiver_logs: registry.receiver_logs.into_rows(),
            transfers: ledger.transfers,
            payments: ledger.payments,
        };

        result.customers = document.customers.len();
        result.agents = document.agents.len();
        result.sender_logs = document.sender_logs.len();
        result.receiver_logs = document.receiver_logs.len();
        result.transactions = document.transaction_count();
        (document, result)
    }

    /// Transform an in-memory message stream
    pub fn transform<'a, I>(
        messages: I,
        self_party: SelfPartyConfig,
    ) -> (EntityDocument, PipelineResult)
    where
        I: IntoIterator<Item = &'a SmsMessage>,
    {
        let mut pipeline = Pipeline::new(self_party);
        for message in messages {
            pipeline.process(message);
        }
        pipeline.finish()
    }

    /// Run the complete pipeline over a message source.
    ///
    /// A source failure aborts the run before any entity is built.
    #[instrument(skip(source, self_party), fields(source_id = %source.source_id()))]
    pub fn run(
        source: &dyn MessageSource,
        self_party: SelfPartyConfig,
    ) -> Result<(EntityDocument, PipelineResult)> {
        let source_id = source.source_id();
        info!("🚀 Starting transform for {}", source_id);
        let started = Instant::now();

        let messages = source.messages().inspect_err(|e| {
            warn!("Message source failed: {}", e);
            IngestMetrics::record_read_error();
        })?;
        IngestMetrics::record_read(messages.len());
        info!("✅ Read {} messages", messages.len());

        let (document, mut result) = Self::transform(&messages, self_party);
        result.source_id = source_id;

        TransformMetrics::record_run(document.entity_count(), started.elapsed().as_secs_f64());
        info!(
            "✅ Transformed {} messages ({} skipped): {} customers, {} agents, {} transactions",
            result.total_messages,
            result.skipped_messages,
            result.customers,
            result.agents,
            result.transactions
        );

        Ok((document, result))
    }
}
