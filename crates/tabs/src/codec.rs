//! Persistence Codec - tab collection <-> session record
//!
//! Layout, per display slot `i` (dense, 0-based):
//!
//! ```text
//! CONTENT_STATE_{i}  State(blob)   regular tab
//!                    Marker(url)   reserved internal page
//! TAB_URL_{i}        Text          regular tabs only, shown while frozen
//! TAB_TITLE_{i}      Text          regular tabs only
//! TAB_FAVICON_{i}    Bytes         regular tabs with a favicon only
//! RECENT_TAB_INDICES Indices       slot positions, least recent first
//! ```

use image::codecs::jpeg::JpegEncoder;

use crate::initializer::TabInitializer;
use crate::storage::{RecordValue, SessionRecord};
use crate::tab::{Favicon, Tab};
use crate::urls::{is_special_url, InternalPage};

pub const CONTENT_STATE_KEY: &str = "CONTENT_STATE_";
pub const TAB_URL_KEY: &str = "TAB_URL_";
pub const TAB_TITLE_KEY: &str = "TAB_TITLE_";
pub const TAB_FAVICON_KEY: &str = "TAB_FAVICON_";
pub const RECENT_TAB_INDICES_KEY: &str = "RECENT_TAB_INDICES";

/// Image encoding for persisted favicons. Lossy is fine; a failed decode
/// just means no favicon.
pub trait FaviconCodec: Send + Sync {
    fn encode(&self, favicon: &Favicon, quality: u8) -> Option<Vec<u8>>;

    fn decode(&self, bytes: &[u8]) -> Option<Favicon>;
}

/// Lossy JPEG favicons. Alpha is flattened away; quality is clamped to 1-100.
#[derive(Debug, Clone, Copy, Default)]
pub struct JpegFaviconCodec;

impl FaviconCodec for JpegFaviconCodec {
    fn encode(&self, favicon: &Favicon, quality: u8) -> Option<Vec<u8>> {
        let rgba =
            image::RgbaImage::from_raw(favicon.width, favicon.height, favicon.pixels.clone())?;
        let rgb = image::DynamicImage::ImageRgba8(rgba).to_rgb8();

        let mut bytes = Vec::new();
        {
            let mut encoder = JpegEncoder::new_with_quality(&mut bytes, quality.clamp(1, 100));
            if let Err(e) = encoder.encode_image(&rgb) {
                tracing::warn!("[Codec] Favicon encode failed: {}", e);
                return None;
            }
        }
        Some(bytes)
    }

    fn decode(&self, bytes: &[u8]) -> Option<Favicon> {
        let rgba = image::load_from_memory(bytes).ok()?.to_rgba8();
        let (width, height) = rgba.dimensions();
        Some(Favicon {
            width,
            height,
            pixels: rgba.into_raw(),
        })
    }
}

/// What a session record restores to
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DecodedSession {
    /// One initializer per slot, in slot order
    pub initializers: Vec<TabInitializer>,
    /// Persisted recency, as slot positions
    pub recency_indices: Vec<usize>,
}

/// Serialize the tab collection. `recency_indices` are positions into
/// `tabs`, least recent first.
pub fn encode_session(
    tabs: &[Tab],
    recency_indices: &[usize],
    favicons: &dyn FaviconCodec,
    favicon_quality: u8,
) -> SessionRecord {
    let mut record = SessionRecord::new();

    for (index, tab) in tabs.iter().enumerate() {
        if is_special_url(tab.url()) {
            record.put(
                format!("{}{}", CONTENT_STATE_KEY, index),
                RecordValue::Marker(tab.url().to_string()),
            );
            continue;
        }

        record.put(
            format!("{}{}", CONTENT_STATE_KEY, index),
            RecordValue::State(tab.save_state()),
        );
        if !tab.url().is_empty() {
            record.put(
                format!("{}{}", TAB_URL_KEY, index),
                RecordValue::Text(tab.url().to_string()),
            );
        }
        record.put(
            format!("{}{}", TAB_TITLE_KEY, index),
            RecordValue::Text(tab.title().to_string()),
        );
        if let Some(bytes) = tab
            .favicon()
            .and_then(|favicon| favicons.encode(favicon, favicon_quality))
        {
            record.put(format!("{}{}", TAB_FAVICON_KEY, index), RecordValue::Bytes(bytes));
        }
    }

    record.put(
        RECENT_TAB_INDICES_KEY,
        RecordValue::Indices(recency_indices.to_vec()),
    );
    record
}

/// Turn a record back into initializers. Slots are found by key prefix and
/// ordered by their numeric suffix; keys whose suffix is not a number, or
/// whose value has the wrong type, are skipped.
pub fn decode_session(
    record: &SessionRecord,
    favicons: &dyn FaviconCodec,
    untitled_title: &str,
) -> DecodedSession {
    let recency_indices = record
        .get_indices(RECENT_TAB_INDICES_KEY)
        .map(<[usize]>::to_vec)
        .unwrap_or_default();

    let mut slots: Vec<(usize, &RecordValue)> = record
        .keys()
        .filter_map(|key| {
            let index = key.strip_prefix(CONTENT_STATE_KEY)?.parse::<usize>().ok()?;
            Some((index, record.get(key)?))
        })
        .collect();
    slots.sort_by_key(|(index, _)| *index);

    let initializers = slots
        .into_iter()
        .filter_map(|(index, value)| match value {
            RecordValue::Marker(url) => Some(
                InternalPage::from_url(url)
                    .map(TabInitializer::for_page)
                    .unwrap_or(TabInitializer::Home),
            ),
            RecordValue::State(state) => Some(TabInitializer::Restore {
                state: state.clone(),
                url: record
                    .get_text(&format!("{}{}", TAB_URL_KEY, index))
                    .map(str::to_string),
                title: record
                    .get_text(&format!("{}{}", TAB_TITLE_KEY, index))
                    .unwrap_or(untitled_title)
                    .to_string(),
                favicon: decode_favicon(record, favicons, index),
            }),
            _ => {
                tracing::warn!("[Codec] Slot {} holds neither state nor marker", index);
                None
            }
        })
        .collect();

    DecodedSession {
        initializers,
        recency_indices,
    }
}

fn decode_favicon(
    record: &SessionRecord,
    favicons: &dyn FaviconCodec,
    index: usize,
) -> Option<Favicon> {
    let bytes = record.get_bytes(&format!("{}{}", TAB_FAVICON_KEY, index))?;
    let favicon = favicons.decode(bytes);
    if favicon.is_none() {
        tracing::warn!("[Codec] Could not decode favicon for slot {}", index);
    }
    favicon
}
