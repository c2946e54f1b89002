//! Neume diagnostics - pitch ordering and adjacency inside note groups
//!
//! "Following note" is the next sounding note of the same group; alteration
//! signs (flat, sharp, natural) are not notes for these rules. Only the
//! quilisma-pes rule looks back across the syllable boundary.

use crate::models::{Note, NoteGroup, NoteShape};

use super::{Diagnostic, GroupContext};

fn sounding(group: &NoteGroup) -> Vec<&Note> {
    group
        .notes
        .iter()
        .filter(|n| !n.shape.is_alteration())
        .collect()
}

/// Pes quadratum or quilisma with nothing after it
pub fn ornament_without_following_note(ctx: &GroupContext<'_>) -> Vec<Diagnostic> {
    let notes = sounding(ctx.group);
    let mut out = Vec::new();

    for (i, note) in notes.iter().enumerate() {
        let (code, label) = if note.is_quilisma() {
            ("quilisma-without-following-note", "Quilisma")
        } else if note.is_quadratum() {
            ("pes-quadratum-without-following-note", "Pes quadratum")
        } else {
            continue;
        };

        let followed = i + 1 < notes.len();
        let fused_before = i > 0 && notes[i - 1].has_fusion();
        if followed || note.has_fusion() || fused_before {
            continue;
        }
        out.push(Diagnostic::warning(
            note.range,
            code,
            format!("{} should be followed by another note", label),
        ));
    }
    out
}

/// Oriscus scapus needs a note on at least one side, ideally both
pub fn oriscus_scapus_neighbors(ctx: &GroupContext<'_>) -> Vec<Diagnostic> {
    let notes = sounding(ctx.group);
    let mut out = Vec::new();

    for (i, note) in notes.iter().enumerate() {
        if !note.is_oriscus_scapus() {
            continue;
        }
        let has_preceding = i > 0;
        let has_following = i + 1 < notes.len() || note.has_fusion();

        let diagnostic = match (has_preceding, has_following) {
            (true, true) => continue,
            (false, false) => Diagnostic::warning(
                note.range,
                "oriscus-scapus-isolated",
                "Oriscus scapus has no preceding or following note",
            ),
            (false, true) => Diagnostic::warning(
                note.range,
                "oriscus-scapus-without-preceding",
                "Oriscus scapus has no preceding note",
            ),
            (true, false) => Diagnostic::warning(
                note.range,
                "oriscus-scapus-without-following",
                "Oriscus scapus has no following note",
            ),
        };
        out.push(diagnostic);
    }
    out
}

/// Quilisma must rise to the next note
pub fn quilisma_equal_or_lower(ctx: &GroupContext<'_>) -> Vec<Diagnostic> {
    let notes = sounding(ctx.group);
    notes
        .windows(2)
        .filter(|w| w[0].is_quilisma() && w[1].ordinal() <= w[0].ordinal())
        .map(|w| {
            Diagnostic::warning(
                w[0].range.cover(&w[1].range),
                "quilisma-equal-or-lower",
                format!(
                    "Quilisma on '{}' is followed by an equal or lower pitch '{}'",
                    w[0].pitch, w[1].pitch
                ),
            )
        })
        .collect()
}

/// Pes quilismaticus approached from above or from the same pitch
pub fn quilisma_pes_preceded_by_higher(ctx: &GroupContext<'_>) -> Vec<Diagnostic> {
    let notes = sounding(ctx.group);
    let (Some(previous), [first, _]) = (ctx.previous_note, notes.as_slice()) else {
        return Vec::new();
    };
    if !first.is_quilisma() || previous.ordinal() < first.ordinal() {
        return Vec::new();
    }
    vec![Diagnostic::warning(
        first.range,
        "quilisma-pes-preceded-by-higher",
        format!(
            "Quilisma pes on '{}' is preceded by an equal or higher pitch '{}'",
            first.pitch, previous.pitch
        ),
    )]
}

/// Pes stratus / virga strata continuing upwards
pub fn stratus_followed_by_higher(ctx: &GroupContext<'_>) -> Vec<Diagnostic> {
    let notes = sounding(ctx.group);
    notes
        .windows(3)
        .filter(|w| {
            let (before, oriscus, after) = (w[0], w[1], w[2]);
            let pes_stratus = before.ordinal() < oriscus.ordinal();
            let virga_strata =
                before.ordinal() == oriscus.ordinal() && before.shape == NoteShape::Virga;
            oriscus.shape == NoteShape::Oriscus
                && (pes_stratus || virga_strata)
                && after.ordinal() >= oriscus.ordinal()
        })
        .map(|w| {
            Diagnostic::warning(
                w[0].range.cover(&w[2].range),
                "stratus-followed-by-higher",
                "Pes stratus / virga strata should not be followed by an equal or higher pitch",
            )
        })
        .collect()
}

/// Quilismatic run written without an explicit fusion connector
pub fn quilisma_fusion_suggestion(ctx: &GroupContext<'_>) -> Vec<Diagnostic> {
    let notes = sounding(ctx.group);
    if notes.iter().any(|n| n.has_fusion()) {
        return Vec::new();
    }

    let mut out = Vec::new();
    for (i, note) in notes.iter().enumerate() {
        if !note.is_quilisma() || i + 1 >= notes.len() {
            continue;
        }
        let first = if i > 0 { i - 1 } else { i };
        let run = &notes[first..=i + 1];
        let width: usize = run.iter().map(|n| n.range.len()).sum();
        if width < 3 {
            continue;
        }
        out.push(Diagnostic::info(
            run[0].range.cover(&run[run.len() - 1].range),
            "quilisma-fusion-suggestion",
            "Consider joining this quilismatic run with '@'",
        ));
    }
    out
}

#[cfg(test)]
mod tests {
    use crate::diagnostics::analyze;
    use crate::parse::parse_document;

    fn codes(body: &str) -> Vec<String> {
        let doc = parse_document(&format!("name: test;\n%%\n{}", body));
        analyze(&doc).into_iter().map(|d| d.code).collect()
    }

    fn count(body: &str, code: &str) -> usize {
        codes(body).iter().filter(|c| *c == code).count()
    }

    #[test]
    fn test_quilisma_equal_pitch() {
        assert_eq!(count("(gwg)", "quilisma-equal-or-lower"), 1);
        assert_eq!(count("(gwf)", "quilisma-equal-or-lower"), 1);
        assert_eq!(count("(gwh)", "quilisma-equal-or-lower"), 0);
    }

    #[test]
    fn test_quilisma_without_following_note() {
        assert_eq!(count("(fgw)", "quilisma-without-following-note"), 1);
        assert_eq!(count("(fgw@)", "quilisma-without-following-note"), 0);
        assert_eq!(count("(f@gw)", "quilisma-without-following-note"), 0);
    }

    #[test]
    fn test_pes_quadratum_without_following_note() {
        assert_eq!(count("(fq)", "pes-quadratum-without-following-note"), 1);
        assert_eq!(count("(fqh)", "pes-quadratum-without-following-note"), 0);
    }

    #[test]
    fn test_oriscus_scapus() {
        assert_eq!(count("(gO)", "oriscus-scapus-isolated"), 1);
        assert_eq!(count("(gOf)", "oriscus-scapus-without-preceding"), 1);
        assert_eq!(count("(fgO)", "oriscus-scapus-without-following"), 1);
        let found = codes("(fgOf)");
        assert!(!found.iter().any(|c| c.starts_with("oriscus-scapus")));
    }

    #[test]
    fn test_quilisma_pes_preceded_by_higher() {
        assert_eq!(count("A(h) B(gwh)", "quilisma-pes-preceded-by-higher"), 1);
        assert_eq!(count("A(g) B(gwh)", "quilisma-pes-preceded-by-higher"), 1);
        assert_eq!(count("A(f) B(gwh)", "quilisma-pes-preceded-by-higher"), 0);
        // No previous syllable
        assert_eq!(count("B(gwh)", "quilisma-pes-preceded-by-higher"), 0);
    }

    #[test]
    fn test_stratus_followed_by_higher() {
        assert_eq!(count("(fgoh)", "stratus-followed-by-higher"), 1);
        assert_eq!(count("(fgof)", "stratus-followed-by-higher"), 0);
        assert_eq!(count("(gvgog)", "stratus-followed-by-higher"), 1);
    }

    #[test]
    fn test_fusion_suggestion() {
        assert_eq!(count("(fgwh)", "quilisma-fusion-suggestion"), 1);
        assert_eq!(count("(f@gw@h)", "quilisma-fusion-suggestion"), 0);
    }
}
