//! Auxiliary notation (NABC) glyph descriptors
//!
//! A descriptor is a basic neume code with optional modifiers, pitch,
//! ornament counts and positional letters. Fused descriptors are kept flat in
//! a `GlyphChain`; `fusion` holds the index of the next link.

use serde::{Deserialize, Serialize};

use crate::text::Range;

/// Two-letter basic glyph codes
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BasicGlyph {
    #[serde(rename = "vi")]
    Virga,
    #[serde(rename = "pu")]
    Punctum,
    #[serde(rename = "ta")]
    Tractulus,
    #[serde(rename = "gr")]
    Gravis,
    #[serde(rename = "cl")]
    Clivis,
    #[serde(rename = "pe")]
    Pes,
    #[serde(rename = "po")]
    Porrectus,
    #[serde(rename = "to")]
    Torculus,
    #[serde(rename = "ci")]
    Climacus,
    #[serde(rename = "sc")]
    Scandicus,
    #[serde(rename = "pf")]
    PorrectusFlexus,
    #[serde(rename = "sf")]
    ScandicusFlexus,
    #[serde(rename = "tr")]
    TorculusResupinus,
    #[serde(rename = "st")]
    Stropha,
    #[serde(rename = "ds")]
    Distropha,
    #[serde(rename = "ts")]
    Tristropha,
    #[serde(rename = "tg")]
    Trigonus,
    #[serde(rename = "bv")]
    Bivirga,
    #[serde(rename = "tv")]
    Trivirga,
    #[serde(rename = "pr")]
    PressusMaior,
    #[serde(rename = "pi")]
    PressusMinor,
    #[serde(rename = "vs")]
    VirgaStrata,
    #[serde(rename = "or")]
    Oriscus,
    #[serde(rename = "sa")]
    Salicus,
    #[serde(rename = "pq")]
    PesQuassus,
    #[serde(rename = "ql")]
    QuilismaThreeLoops,
    #[serde(rename = "qi")]
    QuilismaTwoLoops,
    #[serde(rename = "pt")]
    PesStratus,
    #[serde(rename = "ni")]
    Nihil,
    #[serde(rename = "un")]
    Uncinus,
    #[serde(rename = "oc")]
    OriscusClivis,
}

impl BasicGlyph {
    /// Look up a glyph by its two-letter code
    pub fn from_code(a: char, b: char) -> Option<Self> {
        use BasicGlyph::*;
        let glyph = match (a, b) {
            ('v', 'i') => Virga,
            ('p', 'u') => Punctum,
            ('t', 'a') => Tractulus,
            ('g', 'r') => Gravis,
            ('c', 'l') => Clivis,
            ('p', 'e') => Pes,
            ('p', 'o') => Porrectus,
            ('t', 'o') => Torculus,
            ('c', 'i') => Climacus,
            ('s', 'c') => Scandicus,
            ('p', 'f') => PorrectusFlexus,
            ('s', 'f') => ScandicusFlexus,
            ('t', 'r') => TorculusResupinus,
            ('s', 't') => Stropha,
            ('d', 's') => Distropha,
            ('t', 's') => Tristropha,
            ('t', 'g') => Trigonus,
            ('b', 'v') => Bivirga,
            ('t', 'v') => Trivirga,
            ('p', 'r') => PressusMaior,
            ('p', 'i') => PressusMinor,
            ('v', 's') => VirgaStrata,
            ('o', 'r') => Oriscus,
            ('s', 'a') => Salicus,
            ('p', 'q') => PesQuassus,
            ('q', 'l') => QuilismaThreeLoops,
            ('q', 'i') => QuilismaTwoLoops,
            ('p', 't') => PesStratus,
            ('n', 'i') => Nihil,
            ('u', 'n') => Uncinus,
            ('o', 'c') => OriscusClivis,
            _ => return None,
        };
        Some(glyph)
    }
}

/// Single-letter glyph modifier
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum GlyphModifier {
    /// `S`
    Mark,
    /// `G`
    Grouping,
    /// `M`
    Melodic,
    /// `-`
    Episema,
    /// `>`
    AugmentiveLiquescence,
    /// `~`
    DiminutiveLiquescence,
    /// Bare variant digit
    Variant { digit: u8 },
}

/// Ornament-note letter for subpunctis/prepunctis runs
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum OrnamentModifier {
    /// `t`
    Tractulus,
    /// `u`
    TractulusEpisema,
    /// `v`
    TractulusDoubleEpisema,
    /// `w`
    Gravis,
    /// `x`
    LiquescentStropha,
    /// `y`
    GravisEpisema,
    /// `q`
    Quilisma,
    /// `n`
    Uncinus,
}

impl OrnamentModifier {
    pub fn from_letter(c: char) -> Option<Self> {
        use OrnamentModifier::*;
        match c {
            't' => Some(Tractulus),
            'u' => Some(TractulusEpisema),
            'v' => Some(TractulusDoubleEpisema),
            'w' => Some(Gravis),
            'x' => Some(LiquescentStropha),
            'y' => Some(GravisEpisema),
            'q' => Some(Quilisma),
            'n' => Some(Uncinus),
            _ => None,
        }
    }
}

/// Run-length coded ornament notes (`su`/`pp`)
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Ornament {
    /// 1..=9
    pub count: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modifier: Option<OrnamentModifier>,
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum SignificantLetterKind {
    /// `ls`
    SignificantLetter,
    /// `lt`
    TironianNote,
}

/// Positional annotation letter
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SignificantLetter {
    pub kind: SignificantLetterKind,
    pub code: String,
    /// Clock position 1..=9
    pub position: u8,
}

/// Parsed NABC unit, one link of a `GlyphChain`
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GlyphDescriptor {
    /// Absent only for a standalone subpunctis/prepunctis descriptor
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub basic_glyph: Option<BasicGlyph>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub modifiers: Vec<GlyphModifier>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pitch: Option<char>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subpunctis: Option<Ornament>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prepunctis: Option<Ornament>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub significant_letters: Vec<SignificantLetter>,
    /// Index of the next fused descriptor in `GlyphChain::links`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fusion: Option<usize>,
    pub range: Range,
}

impl GlyphDescriptor {
    pub fn new(basic_glyph: Option<BasicGlyph>, range: Range) -> Self {
        Self {
            basic_glyph,
            modifiers: Vec::new(),
            pitch: None,
            subpunctis: None,
            prepunctis: None,
            significant_letters: Vec::new(),
            fusion: None,
            range,
        }
    }

    pub fn has_modifier(&self, modifier: GlyphModifier) -> bool {
        self.modifiers.contains(&modifier)
    }
}

/// Fused descriptors stored flat, root first
///
/// Links refer to their successor by index. Only forward links are followed,
/// so a chain read back from JSON cannot loop.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct GlyphChain {
    pub links: Vec<GlyphDescriptor>,
}

impl GlyphChain {
    /// Fuse `links` in order, each to the one after it
    pub fn from_links(mut links: Vec<GlyphDescriptor>) -> Self {
        let count = links.len();
        for (i, link) in links.iter_mut().enumerate() {
            link.fusion = if i + 1 < count { Some(i + 1) } else { None };
        }
        Self { links }
    }

    /// First descriptor; ornaments and the full range live here
    pub fn root(&self) -> Option<&GlyphDescriptor> {
        self.links.first()
    }

    pub fn root_mut(&mut self) -> Option<&mut GlyphDescriptor> {
        self.links.first_mut()
    }

    /// Follow `fusion` from the root
    pub fn iter(&self) -> ChainIter<'_> {
        ChainIter {
            links: &self.links,
            next: if self.links.is_empty() { None } else { Some(0) },
        }
    }

    pub fn len(&self) -> usize {
        self.iter().count()
    }

    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }
}

/// Iterator over a fusion chain
pub struct ChainIter<'a> {
    links: &'a [GlyphDescriptor],
    next: Option<usize>,
}

impl<'a> Iterator for ChainIter<'a> {
    type Item = &'a GlyphDescriptor;

    fn next(&mut self) -> Option<Self::Item> {
        let index = self.next?;
        let current = self.links.get(index)?;
        self.next = current.fusion.filter(|&next| next > index);
        Some(current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_glyph_codes() {
        assert_eq!(BasicGlyph::from_code('v', 'i'), Some(BasicGlyph::Virga));
        assert_eq!(BasicGlyph::from_code('o', 'c'), Some(BasicGlyph::OriscusClivis));
        assert_eq!(BasicGlyph::from_code('s', 'u'), None);
        assert_eq!(BasicGlyph::from_code('p', 'p'), None);
    }

    #[test]
    fn test_glyph_serializes_as_code() {
        let json = serde_json::to_string(&BasicGlyph::PesQuassus).unwrap();
        assert_eq!(json, "\"pq\"");
    }

    #[test]
    fn test_chain_iteration() {
        let chain = GlyphChain::from_links(vec![
            GlyphDescriptor::new(Some(BasicGlyph::Virga), Range::default()),
            GlyphDescriptor::new(Some(BasicGlyph::Punctum), Range::default()),
            GlyphDescriptor::new(Some(BasicGlyph::Tractulus), Range::default()),
        ]);

        let glyphs: Vec<_> = chain.iter().filter_map(|d| d.basic_glyph).collect();
        assert_eq!(
            glyphs,
            vec![BasicGlyph::Virga, BasicGlyph::Punctum, BasicGlyph::Tractulus]
        );
        assert_eq!(chain.len(), 3);
        assert_eq!(chain.links[0].fusion, Some(1));
        assert_eq!(chain.links[2].fusion, None);
    }

    #[test]
    fn test_backward_link_does_not_loop() {
        let mut chain = GlyphChain::from_links(vec![
            GlyphDescriptor::new(Some(BasicGlyph::Virga), Range::default()),
            GlyphDescriptor::new(Some(BasicGlyph::Punctum), Range::default()),
        ]);
        chain.links[1].fusion = Some(0);
        assert_eq!(chain.len(), 2);

        chain.links[0].fusion = Some(7);
        assert_eq!(chain.len(), 1);
    }

    #[test]
    fn test_chain_serializes_flat() {
        let chain = GlyphChain::from_links(vec![
            GlyphDescriptor::new(Some(BasicGlyph::Virga), Range::default()),
            GlyphDescriptor::new(Some(BasicGlyph::Punctum), Range::default()),
        ]);
        let json = serde_json::to_value(&chain).unwrap();
        assert_eq!(json["links"][0]["fusion"], 1);
        assert_eq!(json["links"][1]["basicGlyph"], "pu");
        assert!(json["links"][1].get("fusion").is_none());
    }
}
