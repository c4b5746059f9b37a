//! Record extraction from listing pages.
//!
//! Each page carries zero or more "organization cards". The first four
//! spans of a card hold name, address, city and state in that order —
//! a positional contract inherited from the upstream markup, not a
//! labeled one. Optional fields are fished out of the card's remaining
//! free text with anchored patterns.
//!
//! Extraction is a pure function of the page text: re-running on the
//! same input yields identical records.

use std::collections::HashSet;

use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use tracing::debug;

use crate::cfemail::decode_cfemail;
use crate::models::ExtractedFields;

/// Result of extracting one document.
#[derive(Debug, Default)]
pub struct ExtractReport {
    pub records: Vec<ExtractedFields>,
    /// Cards discarded for having fewer than four spans.
    pub malformed: usize,
}

pub struct CardExtractor {
    sel_card: Selector,
    sel_span: Selector,
    sel_cfemail: Selector,
    sel_anchor: Selector,
    /// 6-digit token after a "Pincode" marker.
    re_pincode: Regex,
    /// Number run after "Phone:"; the class stops at the next word
    /// marker so it never bleeds into a following "Mobile:" field.
    re_phone: Regex,
    re_mobile: Regex,
    re_website: Regex,
    /// Plain `local@domain` token, used only when no obfuscated-email
    /// marker is present.
    re_email: Regex,
}

impl Default for CardExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl CardExtractor {
    pub fn new() -> Self {
        Self {
            sel_card: Selector::parse("div.lay-1.donor-menories-bg").unwrap(),
            sel_span: Selector::parse("span").unwrap(),
            sel_cfemail: Selector::parse("[data-cfemail]").unwrap(),
            sel_anchor: Selector::parse("a[href]").unwrap(),
            re_pincode: Regex::new(r"(?i)pincode\D*(\d{6})").unwrap(),
            re_phone: Regex::new(r"(?i)phone\s*:?\s*([0-9+\-/(),.\s]+)").unwrap(),
            re_mobile: Regex::new(r"(?i)mobile\s*:?\s*([0-9+\-/(),.\s]+)").unwrap(),
            re_website: Regex::new(r"(?i)website\s*:?\s*(\S+)").unwrap(),
            re_email: Regex::new(r"[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}").unwrap(),
        }
    }

    /// Extract all organization cards from one page.
    ///
    /// A page with no matching cards yields an empty report, not an
    /// error. Malformed cards are counted and skipped; their siblings
    /// are unaffected.
    pub fn extract(&self, html: &str) -> ExtractReport {
        let doc = Html::parse_document(html);
        let mut report = ExtractReport::default();

        for card in doc.select(&self.sel_card) {
            let spans: Vec<ElementRef> = card.select(&self.sel_span).collect();
            if spans.len() < 4 {
                debug!(spans = spans.len(), "Card has too few spans, discarded");
                report.malformed += 1;
                continue;
            }
            report.records.push(self.extract_card(card, &spans));
        }

        report
    }

    fn extract_card(&self, card: ElementRef, spans: &[ElementRef]) -> ExtractedFields {
        let blob = details_blob(card, spans);

        ExtractedFields {
            name: non_empty(span_text(spans[0])),
            address: non_empty(span_text(spans[1])),
            city: non_empty(span_text(spans[2])),
            state: non_empty(span_text(spans[3])),
            pincode: self
                .re_pincode
                .captures(&blob)
                .map(|c| c[1].to_string()),
            phone: self.capture_number(&self.re_phone, &blob),
            mobile: self.capture_number(&self.re_mobile, &blob),
            email: self.extract_email(card, &blob),
            website: self.extract_website(card, &blob),
        }
    }

    fn capture_number(&self, re: &Regex, blob: &str) -> Option<String> {
        re.captures(blob)
            .map(|c| {
                c[1].trim()
                    .trim_end_matches(|ch: char| ch == '/' || ch.is_whitespace())
                    .to_string()
            })
            .filter(|s| !s.is_empty())
    }

    fn extract_website(&self, card: ElementRef, blob: &str) -> Option<String> {
        if let Some(caps) = self.re_website.captures(blob) {
            return Some(caps[1].to_string());
        }
        // Fall back to the first link that points off-site.
        for anchor in card.select(&self.sel_anchor) {
            if let Some(href) = anchor.value().attr("href") {
                if href.starts_with("http://")
                    || href.starts_with("https://")
                    || href.contains("www.")
                {
                    return Some(href.to_string());
                }
            }
        }
        None
    }

    fn extract_email(&self, card: ElementRef, blob: &str) -> Option<String> {
        if let Some(el) = card.select(&self.sel_cfemail).next() {
            // Marker present: the decoded value wins over any
            // plain-text address; a bad payload leaves the field unset.
            let payload = el.value().attr("data-cfemail").unwrap_or("");
            return match decode_cfemail(payload) {
                Ok(addr) => Some(addr),
                Err(e) => {
                    debug!(error = %e, "Obfuscated email failed to decode");
                    None
                }
            };
        }
        self.re_email.find(blob).map(|m| m.as_str().to_string())
    }
}

/// Visible text of one span, whitespace-normalised.
fn span_text(span: ElementRef) -> String {
    span.text()
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

fn non_empty(s: String) -> Option<String> {
    if s.is_empty() {
        None
    } else {
        Some(s)
    }
}

/// Free text of a card after its first four spans, in document order,
/// joined with single spaces. Text inside the positional spans is
/// already consumed and excluded.
fn details_blob(card: ElementRef, spans: &[ElementRef]) -> String {
    let mut consumed = HashSet::new();
    for span in &spans[..4] {
        for node in span.descendants() {
            consumed.insert(node.id());
        }
    }

    let fourth = spans[3].id();
    let mut past_positional = false;
    let mut parts: Vec<&str> = Vec::new();

    for node in card.descendants() {
        if node.id() == fourth {
            past_positional = true;
        }
        if !past_positional || consumed.contains(&node.id()) {
            continue;
        }
        if let Some(text) = node.value().as_text() {
            let t = text.trim();
            if !t.is_empty() {
                parts.push(t);
            }
        }
    }

    parts.join(" ")
}
