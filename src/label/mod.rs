//! Single-line normalization of YOLO label rows.
//!
//! A row is `<class_id> <cx> <cy> <w> <h>` with geometry as fractions of the
//! image size. Normalization canonicalizes every valid row to class `0` and
//! clamps each geometry value into `[0, 1]`. Rows that do not parse are
//! reported as [`MalformedLine`] and never partially repaired.

use std::fmt;

use serde::Serialize;

/// Class id every record is remapped to.
pub const CANONICAL_CLASS_ID: u32 = 0;

const TOKENS_PER_LINE: usize = 5;

/// One annotated object in normalized image coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct LabelRecord {
    pub class_id: u32,
    pub cx: f64,
    pub cy: f64,
    pub w: f64,
    pub h: f64,
}

impl fmt::Display for LabelRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {:.6} {:.6} {:.6} {:.6}",
            self.class_id, self.cx, self.cy, self.w, self.h
        )
    }
}

/// Why a line was dropped.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MalformedLine {
    /// The line did not split into exactly five tokens.
    TokenCount { found: usize },
    /// A token was not a finite number (NaN is rejected for geometry too).
    InvalidNumber { field: &'static str, raw: String },
}

impl fmt::Display for MalformedLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MalformedLine::TokenCount { found } => {
                write!(f, "expected {TOKENS_PER_LINE} tokens, found {found}")
            }
            MalformedLine::InvalidNumber { field, raw } => {
                write!(f, "invalid {field} '{raw}'")
            }
        }
    }
}

/// A successfully normalized row.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NormalizedLine {
    pub record: LabelRecord,
    /// True if the source class id was anything other than the canonical id.
    pub class_changed: bool,
}

/// Parse, remap and clamp one label line.
pub fn normalize_line(line: &str) -> Result<NormalizedLine, MalformedLine> {
    // Take at most one token past the limit so pathological inputs stay cheap.
    let tokens: Vec<&str> = line.split_whitespace().take(TOKENS_PER_LINE + 1).collect();
    if tokens.len() != TOKENS_PER_LINE {
        return Err(MalformedLine::TokenCount {
            found: if tokens.len() > TOKENS_PER_LINE {
                line.split_whitespace().count()
            } else {
                tokens.len()
            },
        });
    }

    // Legacy tools emit floats here; truncate toward zero.
    let class_raw = parse_number(tokens[0], "class_id")?;
    let class_changed = class_raw.trunc() != 0.0;

    let cx = parse_geometry(tokens[1], "x_center")?;
    let cy = parse_geometry(tokens[2], "y_center")?;
    let w = parse_geometry(tokens[3], "width")?;
    let h = parse_geometry(tokens[4], "height")?;

    Ok(NormalizedLine {
        record: LabelRecord {
            class_id: CANONICAL_CLASS_ID,
            cx: clamp_unit(cx),
            cy: clamp_unit(cy),
            w: clamp_unit(w),
            h: clamp_unit(h),
        },
        class_changed,
    })
}

/// Clamp into `[0, 1]`, folding `-0.0` into `0.0` so it never prints with a sign.
pub fn clamp_unit(value: f64) -> f64 {
    value.clamp(0.0, 1.0) + 0.0
}

fn parse_number(raw: &str, field: &'static str) -> Result<f64, MalformedLine> {
    match raw.parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(value),
        _ => Err(MalformedLine::InvalidNumber {
            field,
            raw: raw.to_string(),
        }),
    }
}

fn parse_geometry(raw: &str, field: &'static str) -> Result<f64, MalformedLine> {
    match raw.parse::<f64>() {
        // Infinities clamp cleanly; NaN has no place in the unit interval.
        Ok(value) if !value.is_nan() => Ok(value),
        _ => Err(MalformedLine::InvalidNumber {
            field,
            raw: raw.to_string(),
        }),
    }
}

/// Fuzz-only entrypoint for single-line normalization.
#[cfg(feature = "fuzzing")]
pub fn fuzz_normalize_line(input: &str) {
    if let Ok(normalized) = normalize_line(input) {
        let rendered = normalized.record.to_string();
        let again = normalize_line(&rendered).expect("rendered record must reparse");
        assert_eq!(again.record.to_string(), rendered);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn remaps_class_and_clamps_geometry() {
        let normalized = normalize_line("2 0.5 1.5 -0.1 0.5").expect("valid line");
        assert!(normalized.class_changed);
        assert_eq!(
            normalized.record.to_string(),
            "0 0.500000 1.000000 0.000000 0.500000"
        );
    }

    #[test]
    fn canonical_class_is_not_a_change() {
        let normalized = normalize_line("0 0.1 0.2 0.3 0.4").expect("valid line");
        assert!(!normalized.class_changed);
        assert_eq!(normalized.record.class_id, 0);
    }

    #[test]
    fn fractional_class_ids_are_truncated() {
        assert!(normalize_line("1.0 0.5 0.5 0.5 0.5").unwrap().class_changed);
        assert!(!normalize_line("0.9 0.5 0.5 0.5 0.5").unwrap().class_changed);
        assert!(!normalize_line("-0.5 0.5 0.5 0.5 0.5").unwrap().class_changed);
        assert!(normalize_line("-1 0.5 0.5 0.5 0.5").unwrap().class_changed);
    }

    #[test]
    fn rejects_wrong_token_counts() {
        assert_eq!(
            normalize_line("0 0.1 0.2 0.3"),
            Err(MalformedLine::TokenCount { found: 4 })
        );
        assert_eq!(
            normalize_line("0 0.1 0.2 0.3 0.4 0.5 0.6"),
            Err(MalformedLine::TokenCount { found: 7 })
        );
        assert_eq!(normalize_line("   "), Err(MalformedLine::TokenCount { found: 0 }));
    }

    #[test]
    fn rejects_unparseable_numbers() {
        let err = normalize_line("cat 0.1 0.2 0.3 0.4").unwrap_err();
        assert!(matches!(
            err,
            MalformedLine::InvalidNumber {
                field: "class_id",
                ..
            }
        ));

        let err = normalize_line("0 0.1 abc 0.3 0.4").unwrap_err();
        assert!(matches!(
            err,
            MalformedLine::InvalidNumber {
                field: "y_center",
                ..
            }
        ));

        assert!(normalize_line("0 NaN 0.2 0.3 0.4").is_err());
        assert!(normalize_line("inf 0.1 0.2 0.3 0.4").is_err());
    }

    #[test]
    fn infinite_geometry_clamps() {
        let normalized = normalize_line("0 inf -inf 0.5 0.5").expect("valid line");
        assert_eq!(normalized.record.cx, 1.0);
        assert_eq!(normalized.record.cy, 0.0);
    }

    #[test]
    fn negative_zero_renders_unsigned() {
        let normalized = normalize_line("0 -0.0 0.5 0.5 0.5").expect("valid line");
        assert_eq!(
            normalized.record.to_string(),
            "0 0.000000 0.500000 0.500000 0.500000"
        );
    }

    #[test]
    fn tolerates_surrounding_whitespace() {
        let normalized = normalize_line("\t0  0.25 0.25\t0.5 0.5 \r").expect("valid line");
        assert_eq!(
            normalized.record.to_string(),
            "0 0.250000 0.250000 0.500000 0.500000"
        );
    }
}
