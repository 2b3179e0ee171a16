//! Extraction of labelled values from a Tunebat track page
//!
//! A track page shows its figures as small cards: a value heading next to a
//! caption naming it.
//!
//! ```html
//! <div class="card"><h3 class="ant-typography">F# Minor</h3><span>Key</span></div>
//! ```
//!
//! Values are looked up by caption, so reordering the cards on the page does
//! not change the result.

use crate::error::{Error, Result};
use scraper::{ElementRef, Html, Selector};
use std::collections::BTreeMap;
use stswatcher::TrackStats;

pub const KEY_LABEL: &str = "key";
pub const BPM_LABEL: &str = "bpm";

fn element_text(element: &ElementRef) -> String {
    element
        .text()
        .collect::<Vec<_>>()
        .join(" ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Collects every `caption -> value` pair of the page
///
/// Captions are lower-cased. When a caption appears twice the first card wins.
pub fn parse_labelled_values(html: &str) -> Result<BTreeMap<String, String>> {
    let document = Html::parse_document(html);
    let heading = Selector::parse("h3")
        .map_err(|e| Error::scraping_error(format!("Invalid selector: {}", e)))?;

    let mut values = BTreeMap::new();

    for value_el in document.select(&heading) {
        let value = element_text(&value_el);
        if value.is_empty() {
            continue;
        }

        let Some(card) = value_el.parent().and_then(ElementRef::wrap) else {
            continue;
        };
        // Une carte ne porte qu'une seule valeur
        if card.select(&heading).count() != 1 {
            continue;
        }

        let caption = card
            .children()
            .filter_map(ElementRef::wrap)
            .filter(|child| child.id() != value_el.id())
            .map(|child| element_text(&child))
            .find(|text| !text.is_empty());

        if let Some(caption) = caption {
            values.entry(caption.to_lowercase()).or_insert(value);
        }
    }

    Ok(values)
}

/// Reads key and BPM from a track page
pub fn parse_track_stats(html: &str) -> Result<TrackStats> {
    let values = parse_labelled_values(html)?;

    let key = values
        .get(KEY_LABEL)
        .ok_or_else(|| Error::MissingLabel(KEY_LABEL.to_string()))?;
    let bpm = values
        .get(BPM_LABEL)
        .ok_or_else(|| Error::MissingLabel(BPM_LABEL.to_string()))?;

    Ok(TrackStats::new(key.clone(), bpm.clone()))
}
