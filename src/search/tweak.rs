// src/search/tweak.rs
// Neighbor values around a parameter, stepping through "nice" round numbers.

use std::str::FromStr;

use crate::ParamsError;

/// Recursion limit when peeling off significant digits
const MAX_DIGITS: u32 = 6;
/// Tolerance for treating a scaled value as a whole digit
const DIGIT_EPS: f64 = 1e-6;

/// How neighbor values are generated for one parameter.
#[derive(Debug, Clone, PartialEq)]
pub enum TweakPolicy {
    /// Digit-based steps: `log` jumps between 1, 2 and 5; `incr` moves the
    /// last significant digit by one
    Step {
        /// Quasi-logarithmic steps
        log: bool,
        /// Single-digit increments
        incr: bool,
    },
    /// Explicit list of values to search
    Values(Vec<f64>),
}

impl TweakPolicy {
    /// Candidate values around `start`
    pub fn values(&self, start: f64) -> Vec<f64> {
        match self {
            TweakPolicy::Step { log, incr } => tweak(start, *log, *incr),
            TweakPolicy::Values(vals) => vals.clone(),
        }
    }
}

impl FromStr for TweakPolicy {
    type Err = ParamsError;

    /// Parses `log`, `incr`, both (`log,incr` or `log incr`), or a literal
    /// list such as `[1.75, 1.85]`.
    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let text = text.trim();
        let invalid = |reason: String| {
            ParamsError::Coercion {
                path: crate::params::hypers::TWEAK.to_string(),
                value: text.to_string(),
                reason,
            }
            .logged()
        };
        if let Some(list) = text.strip_prefix('[') {
            let list = list
                .strip_suffix(']')
                .ok_or_else(|| invalid("unterminated value list".to_string()))?;
            let values = list
                .split(',')
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(|v| v.parse::<f64>().map_err(|e| invalid(format!("`{}`: {}", v, e))))
                .collect::<Result<Vec<_>, _>>()?;
            return Ok(TweakPolicy::Values(values));
        }
        let (mut log, mut incr) = (false, false);
        for token in text.split(|c: char| c == ',' || c.is_whitespace()).filter(|t| !t.is_empty()) {
            match token {
                "log" => log = true,
                "incr" => incr = true,
                other => return Err(invalid(format!("unknown tweak `{}`", other))),
            }
        }
        if !log && !incr {
            return Err(invalid("empty tweak policy".to_string()));
        }
        Ok(TweakPolicy::Step { log, incr })
    }
}

/// Generates neighbor values around a positive `value`.
///
/// The value is split into its leading digit at its order of magnitude.
/// If further significant digits remain, the leading part is kept as a
/// prefix and the remainder is tweaked instead, so `1.5` moves around its
/// `5` and yields values near `1.5` rather than near `1` or `2`.
///
/// | digit | `log`              | `incr`                      |
/// |-------|--------------------|-----------------------------|
/// | 1     | 0.5, 2             | 0.9, 1.1                    |
/// | 2     | 1, 5               | 3 (and 1 unless `log`)      |
/// | 5     | 2, 10              | 4, 6                        |
/// | 9     | 8, 10              | 8, 10                       |
/// | other | digit - 1, digit + 1 | digit - 1, digit + 1      |
///
/// Results are rounded to 3 decimals, and candidates that round to zero
/// are dropped. Non-positive or non-finite input yields no values.
pub fn tweak(value: f64, log: bool, incr: bool) -> Vec<f64> {
    if !value.is_finite() || value <= 0.0 {
        log::warn!("cannot tweak non-positive value {}", value);
        return Vec::new();
    }
    tweak_digits(value, log, incr, 0)
        .into_iter()
        .map(round3)
        .filter(|v| {
            if *v <= 0.0 {
                log::debug!("dropping tweak of {} that rounds to {}", value, v);
            }
            *v > 0.0
        })
        .collect()
}

fn round3(v: f64) -> f64 {
    (v * 1000.0).round() / 1000.0
}

fn tweak_digits(value: f64, log: bool, incr: bool, depth: u32) -> Vec<f64> {
    let mut ex = value.log10().floor();
    let mut scaled = value / 10f64.powf(ex);
    // log10 can land one decade low just under a power of ten
    if scaled >= 10.0 - DIGIT_EPS {
        ex += 1.0;
        scaled = value / 10f64.powf(ex);
    }
    let digit = scaled.round();
    if (scaled - digit).abs() > DIGIT_EPS && depth < MAX_DIGITS {
        let prefix = (scaled + DIGIT_EPS).floor() * 10f64.powf(ex);
        let rest = value - prefix;
        if prefix > 0.0 && rest > 0.0 {
            return tweak_digits(rest, log, incr, depth + 1)
                .into_iter()
                .map(|v| prefix + v)
                .collect();
        }
    }

    let at = |fact: f64, e: f64| fact * 10f64.powf(e);
    let mut vals = Vec::new();
    match digit as u32 {
        1 => {
            if log {
                vals.extend([at(5.0, ex - 1.0), at(2.0, ex)]);
            }
            if incr {
                vals.extend([at(9.0, ex - 1.0), at(1.1, ex)]);
            }
        }
        2 => {
            if log {
                vals.extend([at(1.0, ex), at(5.0, ex)]);
            }
            if incr {
                if !log {
                    vals.push(at(1.0, ex));
                }
                vals.push(at(3.0, ex));
            }
        }
        5 => {
            if log {
                vals.extend([at(2.0, ex), at(1.0, ex + 1.0)]);
            }
            if incr {
                vals.extend([at(4.0, ex), at(6.0, ex)]);
            }
        }
        9 => vals.extend([at(8.0, ex), at(1.0, ex + 1.0)]),
        d => vals.extend([at(d as f64 - 1.0, ex), at(d as f64 + 1.0, ex)]),
    }
    vals
}
