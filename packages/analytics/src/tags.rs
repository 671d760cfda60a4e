//! Exploded tag counts and the band × tag cross-tabulation.

use std::collections::BTreeMap;

use soccorso_map_analytics_models::{BandTagCount, TagCount};
use soccorso_map_intervention_models::Band;

/// Explodes multi-valued tag fields and counts every occurrence.
///
/// A record with k tags contributes k counts (duplicates included); a
/// record with no tags contributes nothing. Sorted by count
/// descending, then tag name.
pub fn tag_counts<'a>(tag_lists: impl IntoIterator<Item = &'a [String]>) -> Vec<TagCount> {
    let mut counts: BTreeMap<&str, u64> = BTreeMap::new();
    for tags in tag_lists {
        for tag in tags {
            *counts.entry(tag.as_str()).or_insert(0) += 1;
        }
    }

    let mut result: Vec<TagCount> = counts
        .into_iter()
        .map(|(tag, count)| TagCount {
            tag: tag.to_string(),
            count,
        })
        .collect();

    result.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.tag.cmp(&b.tag)));
    result
}

/// Cross-tabulates tags against a secondary band key, then keeps only
/// the top `top_n` tags by total count across all bands.
///
/// Output is ordered band-major in the band's canonical sequence, with
/// tags inside each band ordered by their overall total (the same
/// order the chart legend uses). Cells with zero count are omitted.
pub fn tags_by_band<'a, B: Band>(
    records: impl IntoIterator<Item = (B, &'a [String])>,
    top_n: usize,
) -> Vec<BandTagCount> {
    let mut cells: BTreeMap<(B, &str), u64> = BTreeMap::new();
    let mut totals: BTreeMap<&str, u64> = BTreeMap::new();
    for (band, tags) in records {
        for tag in tags {
            *cells.entry((band, tag.as_str())).or_insert(0) += 1;
            *totals.entry(tag.as_str()).or_insert(0) += 1;
        }
    }

    let mut ranked: Vec<(&str, u64)> = totals.into_iter().collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
    let top: Vec<&str> = ranked.into_iter().take(top_n).map(|(tag, _)| tag).collect();

    let mut result = Vec::new();
    for band in B::all() {
        for tag in &top {
            if let Some(count) = cells.get(&(*band, *tag)) {
                result.push(BandTagCount {
                    band: band.label().to_string(),
                    tag: (*tag).to_string(),
                    count: *count,
                });
            }
        }
    }
    result
}
