//! Ordinal color assignment for category names.

use std::collections::HashMap;
use std::fmt;

use sw_core::{SwError, SwResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const WHITE: Rgb = Rgb::new(0xff, 0xff, 0xff);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse `#rrggbb` (the leading `#` is optional).
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.strip_prefix('#').unwrap_or(hex);
        if hex.len() != 6 || !hex.is_ascii() {
            return None;
        }
        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
        Some(Self::new(channel(0)?, channel(2)?, channel(4)?))
    }

    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

/// ColorBrewer "Set3" qualitative palette.
pub const SET3: [Rgb; 12] = [
    Rgb::new(0x8d, 0xd3, 0xc7),
    Rgb::new(0xff, 0xff, 0xb3),
    Rgb::new(0xbe, 0xba, 0xda),
    Rgb::new(0xfb, 0x80, 0x72),
    Rgb::new(0x80, 0xb1, 0xd3),
    Rgb::new(0xfd, 0xb4, 0x62),
    Rgb::new(0xb3, 0xde, 0x69),
    Rgb::new(0xfc, 0xcd, 0xe5),
    Rgb::new(0xd9, 0xd9, 0xd9),
    Rgb::new(0xbc, 0x80, 0xbd),
    Rgb::new(0xcc, 0xeb, 0xc5),
    Rgb::new(0xff, 0xed, 0x6f),
];

/// Maps names to palette entries by position in the domain, cycling when
/// the domain outgrows the palette.
///
/// The mapping is a pure function of domain order: nothing is remembered
/// across [`set_domain`](Self::set_domain) calls.
#[derive(Debug, Clone)]
pub struct OrdinalScale {
    range: Vec<Rgb>,
    domain: Vec<String>,
    index: HashMap<String, usize>,
}

impl Default for OrdinalScale {
    fn default() -> Self {
        Self {
            range: SET3.to_vec(),
            domain: Vec::new(),
            index: HashMap::new(),
        }
    }
}

impl OrdinalScale {
    pub fn with_range(range: Vec<Rgb>) -> SwResult<Self> {
        if range.is_empty() {
            return Err(SwError::InvalidArg {
                what: "color range must not be empty",
            });
        }
        Ok(Self {
            range,
            domain: Vec::new(),
            index: HashMap::new(),
        })
    }

    /// Replace the domain; duplicates keep their first position.
    pub fn set_domain<'a>(&mut self, names: impl IntoIterator<Item = &'a str>) {
        self.domain.clear();
        self.index.clear();
        for name in names {
            if !self.index.contains_key(name) {
                self.index.insert(name.to_string(), self.domain.len());
                self.domain.push(name.to_string());
            }
        }
    }

    pub fn domain(&self) -> &[String] {
        &self.domain
    }

    pub fn range(&self) -> &[Rgb] {
        &self.range
    }

    /// Color of a name already in the domain.
    pub fn color_of(&self, name: &str) -> Option<Rgb> {
        self.index
            .get(name)
            .map(|&i| self.range[i % self.range.len()])
    }

    /// Color of a name, appending it to the domain if unseen.
    pub fn resolve(&mut self, name: &str) -> Rgb {
        let i = match self.index.get(name) {
            Some(&i) => i,
            None => {
                let i = self.domain.len();
                self.index.insert(name.to_string(), i);
                self.domain.push(name.to_string());
                i
            }
        };
        self.range[i % self.range.len()]
    }
}
