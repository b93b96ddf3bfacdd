//! Panel variant detection
//!
//! The board reports its hardware revision through a helper program. The
//! first line of its output is read as a hexadecimal code:
//!
//! | Code   | Variant                  |
//! |--------|--------------------------|
//! | `0x6`  | [`PanelVariant::VariantA`] |
//! | `0x20` | [`PanelVariant::VariantB`] |
//!
//! Anything else, including a probe that can't be run, falls back to
//! VariantA. Detection never fails.

use std::process::{Command, Stdio};

use crate::config::ProbeSettings;
use crate::display::PanelVariant;

/// Revision code reported by Santek boards
pub const SANTEK_CODE: u32 = 0x6;
/// Revision code reported by Midas boards
pub const MIDAS_CODE: u32 = 0x20;

/// Runs the revision probe and maps its answer to a panel variant
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariantProbe {
    program: String,
    args: Vec<String>,
}

impl VariantProbe {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }

    pub fn from_settings(settings: &ProbeSettings) -> Self {
        Self::new(settings.program.clone(), settings.args.clone())
    }

    /// Run the probe and pick the panel variant
    pub fn detect(&self) -> PanelVariant {
        let output = match Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::null())
            .stderr(Stdio::inherit())
            .output()
        {
            Ok(output) => output,
            Err(e) => {
                log::warn!("failed to run {}: {}, assuming SANTEK", self.program, e);
                return PanelVariant::VariantA;
            }
        };

        let stdout = String::from_utf8_lossy(&output.stdout);
        let first_line = stdout.lines().next().unwrap_or("");

        let variant = match parse_probe_output(first_line) {
            Some(code) => variant_from_code(code).unwrap_or_else(|| {
                log::warn!("Unexpected output: {}", first_line.trim_end());
                PanelVariant::VariantA
            }),
            None => {
                log::warn!("Failed to parse output: {:?}", first_line);
                PanelVariant::VariantA
            }
        };

        log::debug!("hardware probe selected {}", variant);
        variant
    }
}

impl Default for VariantProbe {
    fn default() -> Self {
        Self::from_settings(&ProbeSettings::default())
    }
}

/// Read a leading hexadecimal number
///
/// Leading whitespace and an optional `0x`/`0X` prefix are skipped, then
/// hex digits are consumed until the first non-digit. `None` when no digit
/// follows.
pub fn parse_probe_output(text: &str) -> Option<u32> {
    let trimmed = text.trim_start();
    let body = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
        .filter(|rest| rest.starts_with(|c: char| c.is_ascii_hexdigit()))
        .unwrap_or(trimmed);

    let digits_end = body
        .find(|c: char| !c.is_ascii_hexdigit())
        .unwrap_or(body.len());
    if digits_end == 0 {
        return None;
    }

    // Overlong values keep the low 32 bits
    let value = body[..digits_end]
        .chars()
        .filter_map(|c| c.to_digit(16))
        .fold(0u32, |acc, d| acc.wrapping_mul(16).wrapping_add(d));
    Some(value)
}

/// Map a revision code to its variant
pub fn variant_from_code(code: u32) -> Option<PanelVariant> {
    match code {
        SANTEK_CODE => Some(PanelVariant::VariantA),
        MIDAS_CODE => Some(PanelVariant::VariantB),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_probe_output() {
        assert_eq!(parse_probe_output("0x6\n"), Some(0x6));
        assert_eq!(parse_probe_output("20"), Some(0x20));
        assert_eq!(parse_probe_output("  0X20 rev b"), Some(0x20));
        assert_eq!(parse_probe_output("6abc"), Some(0x6ABC));
        assert_eq!(parse_probe_output("garbage"), None);
        assert_eq!(parse_probe_output(""), None);
        assert_eq!(parse_probe_output("\n"), None);
    }

    #[test]
    fn test_bare_zero_before_x() {
        // "0x" with nothing after it reads as the digit 0
        assert_eq!(parse_probe_output("0x"), Some(0));
        assert_eq!(parse_probe_output("0xzz"), Some(0));
    }

    #[test]
    fn test_variant_from_code() {
        assert_eq!(variant_from_code(0x6), Some(PanelVariant::VariantA));
        assert_eq!(variant_from_code(0x20), Some(PanelVariant::VariantB));
        assert_eq!(variant_from_code(0x7), None);
    }

    #[test]
    fn test_default_probe_is_emr_cat() {
        assert_eq!(
            VariantProbe::default(),
            VariantProbe::new("emr-cat", vec!["v".to_string()])
        );
    }

    #[test]
    fn test_missing_probe_defaults_to_santek() {
        let probe = VariantProbe::new("/nonexistent/emr-cat", vec!["v".to_string()]);
        assert_eq!(probe.detect(), PanelVariant::VariantA);
    }

    #[cfg(unix)]
    mod with_shell {
        use super::*;

        fn echo(output: &str) -> VariantProbe {
            VariantProbe::new("sh", vec!["-c".to_string(), format!("printf '{output}'")])
        }

        #[test]
        fn test_detect_midas() {
            assert_eq!(echo("0x20\\n").detect(), PanelVariant::VariantB);
        }

        #[test]
        fn test_detect_santek() {
            assert_eq!(echo("0x6\\n").detect(), PanelVariant::VariantA);
        }

        #[test]
        fn test_detect_only_reads_first_line() {
            assert_eq!(echo("20\\n6\\n").detect(), PanelVariant::VariantB);
        }

        #[test]
        fn test_detect_unexpected_and_garbage() {
            assert_eq!(echo("0x7\\n").detect(), PanelVariant::VariantA);
            assert_eq!(echo("garbage\\n").detect(), PanelVariant::VariantA);
            assert_eq!(echo("").detect(), PanelVariant::VariantA);
        }
    }
}
