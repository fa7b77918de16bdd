//! Context assembly: turn extracted mentions into the rule context handed to
//! the generation step.
//!
//! Each mention is resolved and, when its node has outgoing laws, produces
//! one applied-law record. Records are not deduplicated: a concept mentioned
//! twice contributes its laws twice.

use tracing::debug;

use crate::resolver::resolve_mention;
use crate::store::GraphStore;

/// Rule context built for one translation request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssembledContext {
    /// Human-readable records, one per contributing mention, in input order.
    pub applied_laws: Vec<String>,
    /// Every record followed by a newline, concatenated.
    pub context_text: String,
}

impl AssembledContext {
    /// Whether no mention contributed any law.
    pub const fn is_empty(&self) -> bool {
        self.applied_laws.is_empty()
    }
}

/// Assemble the rule context for `text` from its extracted `mentions`.
///
/// Mentions that resolve to no node, or to a node without outgoing laws,
/// are skipped silently.
pub fn assemble_context<S: AsRef<str>>(
    store: &GraphStore,
    text: &str,
    mentions: &[S],
) -> AssembledContext {
    let mut assembled = AssembledContext::default();

    for mention in mentions {
        let mention = mention.as_ref();
        let Some(node_id) = resolve_mention(store, mention) else {
            debug!(mention, "mention matched no concept");
            continue;
        };
        let laws = store.outgoing_context(node_id);
        if laws.is_empty() {
            debug!(mention, node_id, "concept has no outgoing laws");
            continue;
        }

        let record = format!("Concept '{mention}' maps to '{node_id}' with laws:\n{laws}");
        assembled.context_text.push_str(&record);
        assembled.context_text.push('\n');
        assembled.applied_laws.push(record);
    }

    debug!(
        text_len = text.len(),
        mentions = mentions.len(),
        applied = assembled.applied_laws.len(),
        "rule context assembled"
    );
    assembled
}
