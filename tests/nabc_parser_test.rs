// NABC descriptor grammar through the public entry point

use gabc_wasm::models::{BasicGlyph, GlyphChain, GlyphModifier, OrnamentModifier};
use gabc_wasm::parse::NabcParser;
use gabc_wasm::text::Position;
use gabc_wasm::parse_nabc_segment;

fn glyphs(chain: &GlyphChain) -> Vec<BasicGlyph> {
    chain.iter().filter_map(|d| d.basic_glyph).collect()
}

#[test]
fn test_three_link_fusion_chain() {
    let descriptors = parse_nabc_segment("vi!pu!ta", None);
    assert_eq!(descriptors.len(), 1);

    let chain = &descriptors[0];
    assert_eq!(chain.len(), 3);
    assert_eq!(
        glyphs(chain),
        vec![BasicGlyph::Virga, BasicGlyph::Punctum, BasicGlyph::Tractulus]
    );
    let last = chain.iter().last().unwrap();
    assert!(last.fusion.is_none());
}

#[test]
fn test_chain_is_acyclic_and_ranges_nest() {
    let descriptors = parse_nabc_segment("clS!pe>!toM-hg", Some(Position::new(4, 10)));
    let chain = &descriptors[0];
    let links: Vec<_> = chain.iter().collect();
    assert_eq!(links.len(), 3);
    // Every link points strictly forward, so the chain cannot cycle
    for (i, link) in chain.links.iter().enumerate() {
        if let Some(next) = link.fusion {
            assert!(next > i);
        }
    }
    for pair in links.windows(2) {
        assert!(pair[0].range.start < pair[1].range.start);
        assert_eq!(pair[0].range.end, pair[1].range.end);
    }
    let root = chain.root().unwrap();
    assert_eq!(root.range.start, Position::new(4, 10));
    assert_eq!(root.range.end, Position::new(4, 24));
    assert_eq!(links[2].pitch, Some('g'));
    assert_eq!(
        links[2].modifiers,
        vec![GlyphModifier::Melodic, GlyphModifier::Episema]
    );
}

#[test]
fn test_several_descriptors_in_one_segment() {
    let descriptors = parse_nabc_segment("vi pu/ta`cl", None);
    let roots: Vec<_> = descriptors
        .iter()
        .filter_map(|c| c.root().and_then(|d| d.basic_glyph))
        .collect();
    assert_eq!(
        roots,
        vec![
            BasicGlyph::Virga,
            BasicGlyph::Punctum,
            BasicGlyph::Tractulus,
            BasicGlyph::Clivis
        ]
    );
}

#[test]
fn test_all_glyph_codes_parse() {
    let codes = [
        "vi", "pu", "ta", "gr", "cl", "pe", "po", "to", "ci", "sc", "pf", "sf", "tr", "st", "ds",
        "ts", "tg", "bv", "tv", "pr", "pi", "vs", "or", "sa", "pq", "ql", "qi", "pt", "ni", "un",
        "oc",
    ];
    for code in codes {
        let (descriptors, issues) = NabcParser::new(code, Position::zero()).parse();
        assert_eq!(descriptors.len(), 1, "code {}", code);
        assert!(issues.is_empty(), "code {}", code);
    }
}

#[test]
fn test_ornaments_attach_to_chain_root() {
    let descriptors = parse_nabc_segment("cl!pusun3", None);
    assert_eq!(descriptors.len(), 1);
    let chain = &descriptors[0];
    let sub = chain.root().unwrap().subpunctis.expect("subpunctis on the root");
    assert_eq!(sub.count, 3);
    assert_eq!(sub.modifier, Some(OrnamentModifier::Uncinus));
    assert!(chain.links[1].subpunctis.is_none());
}

#[test]
fn test_repeated_ornament_keeps_the_last() {
    let descriptors = parse_nabc_segment("tapp2pp4", None);
    assert_eq!(descriptors[0].links[0].prepunctis.map(|o| o.count), Some(4));
}

#[test]
fn test_ornament_without_count_is_not_an_ornament() {
    let (descriptors, issues) = NabcParser::new("vi su", Position::zero()).parse();
    assert_eq!(descriptors.len(), 1);
    assert!(descriptors[0].links[0].subpunctis.is_none());
    assert_eq!(issues.len(), 1);
}

#[test]
fn test_significant_letters() {
    let descriptors = parse_nabc_segment("pulsc2lsal7ltsta1", None);
    let letters = &descriptors[0].links[0].significant_letters;
    let codes: Vec<_> = letters.iter().map(|l| (l.code.as_str(), l.position)).collect();
    assert_eq!(codes, vec![("c", 2), ("al", 7), ("sta", 1)]);
}

#[test]
fn test_lookahead_stops_modifiers_before_next_glyph() {
    // `vi` followed directly by `pe` starts a second, unfused descriptor
    let descriptors = parse_nabc_segment("vi-pe", None);
    assert_eq!(descriptors.len(), 2);
    assert_eq!(descriptors[0].links[0].modifiers, vec![GlyphModifier::Episema]);
    assert_eq!(descriptors[1].links[0].basic_glyph, Some(BasicGlyph::Pes));
}

#[test]
fn test_garbage_is_skipped() {
    let (descriptors, issues) = NabcParser::new("?? vi", Position::zero()).parse();
    assert_eq!(descriptors.len(), 1);
    assert_eq!(issues.len(), 1);
    assert_eq!(issues[0].code, "invalid-nabc-glyph");
}

#[test]
fn test_very_long_chain_is_flat() {
    let text = vec!["pu"; 150_000].join("!");
    let descriptors = parse_nabc_segment(&text, None);
    assert_eq!(descriptors.len(), 1);

    let chain = &descriptors[0];
    assert_eq!(chain.len(), 150_000);
    assert_eq!(chain.links[149_999].fusion, None);

    let copy = descriptors.clone();
    assert!(copy == descriptors);
    drop(copy);

    let json = serde_json::to_string(&descriptors).unwrap();
    let back: Vec<GlyphChain> = serde_json::from_str(&json).unwrap();
    assert_eq!(back, descriptors);
}
