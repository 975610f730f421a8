//! Placeholder registry: the claim list shared by all pipeline stages.
//!
//! The normalized sentence is never edited. Each stage that recognizes a
//! phrase *claims* its byte span, which issues a token and stores the binding.
//! Later stages work on a [`View`]: the sentence rendered with every claimed
//! span replaced by its token, plus the mapping back to sentence offsets.
//! Matches on the view that reach into a token are rejected by
//! [`View::to_original`], so nothing is extracted twice.

use std::ops::Range;

use tracing::warn;

use super::types::{BindingExtra, VariableBinding, VariableType, VariableValue};
use crate::ids::TokenGenerator;

/// A binding anchored to a span of the normalized sentence.
#[derive(Debug, Clone)]
pub struct Claim {
    pub span: Range<usize>,
    pub binding: VariableBinding,
}

/// Claims made on one sentence during one preprocessing call.
pub struct Registry {
    text: String,
    claims: Vec<Claim>,
    tokens: TokenGenerator,
}

impl Registry {
    pub fn new(text: impl Into<String>, tokens: TokenGenerator) -> Self {
        Self { text: text.into(), claims: Vec::new(), tokens }
    }

    /// The normalized sentence.
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn claims(&self) -> &[Claim] {
        &self.claims
    }

    /// Issue a fresh placeholder token.
    pub fn new_token(&mut self) -> String {
        self.tokens.next_token()
    }

    /// Store a binding over `span`, keyed by its id.
    ///
    /// Returns `false` (and stores nothing) when the span is empty, out of
    /// bounds, not on a character boundary or overlaps an earlier claim.
    pub fn register(&mut self, span: Range<usize>, binding: VariableBinding) -> bool {
        if span.start >= span.end
            || span.end > self.text.len()
            || !self.text.is_char_boundary(span.start)
            || !self.text.is_char_boundary(span.end)
        {
            warn!(?span, "refusing claim outside the sentence");
            return false;
        }
        if self.claims.iter().any(|c| c.span.start < span.end && span.start < c.span.end) {
            warn!(?span, id = %binding.id, "refusing overlapping claim");
            return false;
        }

        let pos = self.claims.partition_point(|c| c.span.start < span.start);
        self.claims.insert(pos, Claim { span, binding });
        true
    }

    /// Issue a token and claim `span` with a binding holding `value`.
    ///
    /// Returns the token on success.
    pub fn claim(
        &mut self,
        span: Range<usize>,
        value: VariableValue,
        extra: Option<BindingExtra>,
    ) -> Option<String> {
        let original_text = self.text.get(span.clone())?.trim().to_string();
        let id = self.new_token();
        let binding = VariableBinding {
            id: id.clone(),
            kind: value.variable_type(),
            value,
            original_text,
            extra,
        };
        self.register(span, binding).then_some(id)
    }

    /// The kind of the binding behind `token`, if it was issued here.
    pub fn kind_of(&self, token: &str) -> Option<VariableType> {
        self.claims.iter().find(|c| c.binding.id == token).map(|c| c.binding.kind)
    }

    /// First claimed binding of `kind`, in sentence order.
    pub fn first_of(&self, kind: VariableType) -> Option<&VariableBinding> {
        self.claims.iter().map(|c| &c.binding).find(|b| b.kind == kind)
    }

    /// Render the sentence with claimed spans replaced by their tokens.
    pub fn view(&self) -> View {
        let mut text = String::with_capacity(self.text.len());
        let mut segments = Vec::new();
        let mut cursor = 0;

        for (idx, claim) in self.claims.iter().enumerate() {
            if claim.span.start > cursor {
                let start = text.len();
                text.push_str(&self.text[cursor..claim.span.start]);
                segments.push(Segment {
                    range: start..text.len(),
                    kind: SegmentKind::Text { origin: cursor },
                });
            }
            let start = text.len();
            text.push_str(&claim.binding.id);
            segments.push(Segment { range: start..text.len(), kind: SegmentKind::Token(idx) });
            cursor = claim.span.end;
        }

        if cursor < self.text.len() {
            let start = text.len();
            text.push_str(&self.text[cursor..]);
            segments.push(Segment { range: start..text.len(), kind: SegmentKind::Text { origin: cursor } });
        }

        View { text, segments }
    }

    /// Consume the registry, returning the rendered text and the bindings in
    /// sentence order.
    pub fn into_parts(self) -> (String, Vec<VariableBinding>) {
        let processed = self.view().text;
        let bindings = self.claims.into_iter().map(|c| c.binding).collect();
        (processed, bindings)
    }
}

#[derive(Debug, Clone)]
enum SegmentKind {
    Text { origin: usize },
    Token(usize),
}

#[derive(Debug, Clone)]
struct Segment {
    range: Range<usize>,
    kind: SegmentKind,
}

/// The working text as later stages see it.
#[derive(Debug, Clone)]
pub struct View {
    text: String,
    segments: Vec<Segment>,
}

impl View {
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Map a range of the view back onto the sentence.
    ///
    /// Only ranges lying entirely inside unclaimed text map back; anything
    /// touching a token yields `None`.
    pub fn to_original(&self, range: Range<usize>) -> Option<Range<usize>> {
        if range.start >= range.end {
            return None;
        }
        let segment = self
            .segments
            .iter()
            .find(|s| s.range.start <= range.start && range.end <= s.range.end)?;
        match segment.kind {
            SegmentKind::Text { origin } => {
                let offset = origin + (range.start - segment.range.start);
                Some(offset..offset + (range.end - range.start))
            }
            SegmentKind::Token(_) => None,
        }
    }

    /// Whether nothing but tokens remains to be parsed.
    pub fn is_exhausted(&self) -> bool {
        crate::ids::is_only_tokens(&self.text)
    }
}
