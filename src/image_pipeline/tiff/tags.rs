//! Capture metadata carried as TIFF directory tags.
//!
//! Frames are stored with the baseline description/make/model/datetime tags,
//! the EXIF exposure and aperture ids, and two private ids for the sensor
//! readout offset.

use std::collections::BTreeMap;
use std::fmt;
use std::io::{Read, Seek};

use tiff::decoder::{Decoder, ifd::Value};
use tiff::tags::Tag;
use tracing::warn;

use crate::image_pipeline::raw::types::CaptureMetadata;

pub const IMAGE_WIDTH: u16 = 256;
pub const IMAGE_LENGTH: u16 = 257;
pub const BITS_PER_SAMPLE: u16 = 258;
pub const IMAGE_DESCRIPTION: u16 = 270;
pub const MAKE: u16 = 271;
pub const MODEL: u16 = 272;
pub const DATE_TIME: u16 = 306;
pub const EXPOSURE_TIME: u16 = 33434;
pub const F_NUMBER: u16 = 33437;
pub const OFFSET_X: u16 = 1000;
pub const OFFSET_Y: u16 = 1001;

/// Ids read back from stored frames, in the order they are looked up.
const KNOWN_TAGS: [u16; 11] = [
    IMAGE_WIDTH,
    IMAGE_LENGTH,
    BITS_PER_SAMPLE,
    IMAGE_DESCRIPTION,
    MAKE,
    MODEL,
    DATE_TIME,
    EXPOSURE_TIME,
    F_NUMBER,
    OFFSET_X,
    OFFSET_Y,
];

/// Summary keys and the tag each one is taken from.
const SELECTED: [(&str, u16); 11] = [
    ("camera", MAKE),
    ("pixel_format", MODEL),
    ("description", IMAGE_DESCRIPTION),
    ("bits", BITS_PER_SAMPLE),
    ("datetime", DATE_TIME),
    ("fnumber", F_NUMBER),
    ("exposure", EXPOSURE_TIME),
    ("nx", IMAGE_WIDTH),
    ("ny", IMAGE_LENGTH),
    ("offset_x", OFFSET_X),
    ("offset_y", OFFSET_Y),
];

/// Exposure denominators from finest to coarsest; the first one whose
/// numerator fits in 32 bits is used.
const EXPOSURE_DENOMINATORS: [u32; 4] = [1_000_000_000, 1_000_000, 1_000, 1];
const FNUMBER_DENOMINATOR: u32 = 100;

fn exposure_rational(seconds: f64) -> TagValue {
    let seconds = seconds.max(0.0);
    EXPOSURE_DENOMINATORS
        .iter()
        .find_map(|&d| {
            let n = (seconds * d as f64).round();
            (n <= u32::MAX as f64).then(|| TagValue::Rational(n as u32, d))
        })
        .unwrap_or(TagValue::Rational(u32::MAX, 1))
}

/// TIFF ASCII fields are 7-bit and NUL terminated: other characters become
/// `?` and NULs are dropped.
fn ascii_text(text: &str) -> String {
    text.chars()
        .filter(|&c| c != '\0')
        .map(|c| if c.is_ascii() { c } else { '?' })
        .collect()
}

/// Name of a tag id, falling back to the number itself.
pub fn tag_name(id: u16) -> String {
    match id {
        IMAGE_WIDTH => "ImageWidth".to_string(),
        IMAGE_LENGTH => "ImageLength".to_string(),
        BITS_PER_SAMPLE => "BitsPerSample".to_string(),
        IMAGE_DESCRIPTION => "ImageDescription".to_string(),
        MAKE => "Make".to_string(),
        MODEL => "Model".to_string(),
        DATE_TIME => "DateTime".to_string(),
        EXPOSURE_TIME => "ExposureTime".to_string(),
        F_NUMBER => "FNumber".to_string(),
        OFFSET_X => "offset_x".to_string(),
        OFFSET_Y => "offset_y".to_string(),
        other => other.to_string(),
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum TagValue {
    Ascii(String),
    Short(u16),
    Long(u32),
    Rational(u32, u32),
}

impl TagValue {
    fn from_tiff(value: Value) -> Option<Self> {
        match value {
            Value::Ascii(s) => Some(TagValue::Ascii(s)),
            Value::Byte(n) => Some(TagValue::Short(n as u16)),
            Value::Short(n) => Some(TagValue::Short(n)),
            Value::Unsigned(n) => Some(TagValue::Long(n)),
            Value::Rational(n, d) => Some(TagValue::Rational(n, d)),
            // per-sample tags such as BitsPerSample on RGB files
            Value::List(values) => values.into_iter().next().and_then(TagValue::from_tiff),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            TagValue::Ascii(s) => s.trim().parse().ok(),
            TagValue::Short(n) => Some(*n as f64),
            TagValue::Long(n) => Some(*n as f64),
            TagValue::Rational(_, 0) => None,
            TagValue::Rational(n, d) => Some(*n as f64 / *d as f64),
        }
    }

    pub fn as_u32(&self) -> Option<u32> {
        match self {
            TagValue::Short(n) => Some(*n as u32),
            TagValue::Long(n) => Some(*n),
            other => other.as_f64().map(|v| v as u32),
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            TagValue::Ascii(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for TagValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TagValue::Ascii(s) => f.write_str(s),
            TagValue::Short(n) => write!(f, "{}", n),
            TagValue::Long(n) => write!(f, "{}", n),
            TagValue::Rational(n, d) => match self.as_f64() {
                Some(v) => write!(f, "{}", v),
                None => write!(f, "{}/{}", n, d),
            },
        }
    }
}

/// Tag id → value map attached to a stored frame.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TagDictionary {
    entries: BTreeMap<u16, TagValue>,
}

impl TagDictionary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds the tag set stored with every acquired frame. The f-number is
    /// only written when it was registered.
    pub fn from_capture(meta: &CaptureMetadata) -> Self {
        let mut tags = Self::new();
        tags.insert(IMAGE_DESCRIPTION, TagValue::Ascii(meta.description.clone()));
        tags.insert(MAKE, TagValue::Ascii(meta.camera_name.clone()));
        tags.insert(MODEL, TagValue::Ascii(meta.pixel_format.clone()));
        if let Some(at) = &meta.captured_at {
            tags.insert(DATE_TIME, TagValue::Ascii(at.clone()));
        }
        tags.insert(EXPOSURE_TIME, exposure_rational(meta.exposure_s));
        if let Some(fnumber) = meta.fnumber {
            let n = (fnumber * FNUMBER_DENOMINATOR as f64).round().max(0.0) as u32;
            tags.insert(F_NUMBER, TagValue::Rational(n, FNUMBER_DENOMINATOR));
        }
        tags.insert(OFFSET_X, TagValue::Long(meta.offset_x));
        tags.insert(OFFSET_Y, TagValue::Long(meta.offset_y));
        tags
    }

    /// Collects every known tag present in the decoder's current directory.
    pub fn read_from<R: Read + Seek>(decoder: &mut Decoder<R>) -> tiff::TiffResult<Self> {
        let mut tags = Self::new();
        for id in KNOWN_TAGS {
            if let Some(value) = decoder.find_tag(Tag::from_u16_exhaustive(id))? {
                if let Some(value) = TagValue::from_tiff(value) {
                    tags.insert(id, value);
                }
            }
        }
        Ok(tags)
    }

    /// Adds or replaces an entry. Text is reduced to what an ASCII tag can hold.
    pub fn insert(&mut self, id: u16, value: TagValue) -> Option<TagValue> {
        let value = match value {
            TagValue::Ascii(s) if !s.is_ascii() || s.contains('\0') => {
                let cleaned = ascii_text(&s);
                warn!("Tag {} is not plain ASCII, storing {:?}", tag_name(id), cleaned);
                TagValue::Ascii(cleaned)
            }
            other => other,
        };
        self.entries.insert(id, value)
    }

    pub fn get(&self, id: u16) -> Option<&TagValue> {
        self.entries.get(&id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (u16, &TagValue)> {
        self.entries.iter().map(|(id, value)| (*id, value))
    }

    /// Same entries keyed by tag name.
    pub fn named(&self) -> BTreeMap<String, TagValue> {
        self.iter().map(|(id, value)| (tag_name(id), value.clone())).collect()
    }

    /// Short summary with friendly keys, in a fixed order. Missing tags are skipped.
    pub fn selected(&self) -> Vec<(&'static str, TagValue)> {
        SELECTED
            .iter()
            .filter_map(|&(key, id)| self.get(id).map(|value| (key, value.clone())))
            .collect()
    }

    /// Rebuilds capture metadata from stored tags; absent tags take defaults.
    pub fn to_capture(&self) -> CaptureMetadata {
        let text = |id| self.get(id).and_then(TagValue::as_str).map(str::to_string);
        let defaults = CaptureMetadata::default();
        CaptureMetadata {
            camera_name: text(MAKE).unwrap_or_default(),
            pixel_format: text(MODEL).unwrap_or_default(),
            captured_at: text(DATE_TIME),
            exposure_s: self.get(EXPOSURE_TIME).and_then(TagValue::as_f64).unwrap_or(0.0),
            offset_x: self.get(OFFSET_X).and_then(TagValue::as_u32).unwrap_or(0),
            offset_y: self.get(OFFSET_Y).and_then(TagValue::as_u32).unwrap_or(0),
            fnumber: self.get(F_NUMBER).and_then(TagValue::as_f64),
            description: text(IMAGE_DESCRIPTION).unwrap_or(defaults.description),
        }
    }
}
