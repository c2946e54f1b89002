//! NABC descriptor diagnostics

use crate::models::{is_nabc_pitch_letter, GlyphChain, GlyphDescriptor, GlyphModifier};

use super::{Diagnostic, GroupContext};

/// Every descriptor of the group, fused links included
fn descriptors<'a>(ctx: &GroupContext<'a>) -> impl Iterator<Item = &'a GlyphDescriptor> + 'a {
    let group = ctx.group;
    group
        .auxiliary_parsed
        .iter()
        .flatten()
        .flat_map(GlyphChain::iter)
}

/// Augmentive and diminutive liquescence on the same glyph
pub fn conflicting_liquescence(ctx: &GroupContext<'_>) -> Vec<Diagnostic> {
    descriptors(ctx)
        .filter(|d| {
            d.has_modifier(GlyphModifier::AugmentiveLiquescence)
                && d.has_modifier(GlyphModifier::DiminutiveLiquescence)
        })
        .map(|d| {
            Diagnostic::error(
                d.range,
                "nabc-conflicting-liquescence",
                "Glyph cannot be both augmentive (>) and diminutive (~) liquescent",
            )
        })
        .collect()
}

/// Pitch descriptor (`h` + letter) outside the pitch alphabet
pub fn invalid_pitch_descriptor(ctx: &GroupContext<'_>) -> Vec<Diagnostic> {
    descriptors(ctx)
        .filter_map(|d| d.pitch.filter(|&p| !is_nabc_pitch_letter(p)).map(|p| (d, p)))
        .map(|(d, p)| {
            Diagnostic::error(
                d.range,
                "nabc-invalid-pitch",
                format!("Invalid NABC pitch descriptor 'h{}' (expected a-n or p)", p),
            )
        })
        .collect()
}
