//! Heuristic time/space complexity estimate for submitted source code
//!
//! Everything here is regex scanning over raw text:
//! - recursion: an identifier used as a call target more than once
//! - halving: `n = n / 2`, `n /= 2`, `n >>= 1`, a loop header dividing by two
//! - space: the raw substrings `vector` / `new`
//! - loop depth: brace-level tracking of `for(` / `while(` / `do(` openers
//!
//! Nothing is parsed, so the result is an advisory label, not a proven bound.
//! The scan is language-agnostic and never fails.

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Serialize, Serializer};

/// Distinct call-target names tracked during recursion detection
const MAX_CALL_TARGETS: usize = 4096;

/// Keywords that take a parenthesized expression but are never call targets
const NON_CALL_KEYWORDS: &[&str] = &[
    "for", "while", "do", "if", "elif", "switch", "catch", "return", "sizeof", "typeof",
    "synchronized",
];

static RE_WHITESPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("valid whitespace regex"));
static RE_CALL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b([A-Za-z_][A-Za-z0-9_]*)\s*\(").expect("valid call regex")
});
static RE_CALL_ARGS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b([A-Za-z_][A-Za-z0-9_]*)\s*\(([^()]*)\)").expect("valid call args regex")
});
static RE_LOOP: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(?:for|while|do)\s*\(").expect("valid loop regex"));

// -- Halving patterns --
static RE_SELF_DIV: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b([A-Za-z_][A-Za-z0-9_]*)\s*=\s*([A-Za-z_][A-Za-z0-9_]*)\s*/\s*2\b")
        .expect("valid self division regex")
});
static RE_DIV_ASSIGN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b[A-Za-z_][A-Za-z0-9_]*\s*/=\s*2\b").expect("valid division assign regex")
});
static RE_SELF_SHIFT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b([A-Za-z_][A-Za-z0-9_]*)\s*=\s*([A-Za-z_][A-Za-z0-9_]*)\s*>>\s*1\b")
        .expect("valid self shift regex")
});
static RE_SHIFT_ASSIGN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b[A-Za-z_][A-Za-z0-9_]*\s*>>=\s*1\b").expect("valid shift assign regex")
});
static RE_LOOP_HEADER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(?:for|while)\s*\(").expect("valid loop header regex"));
static RE_HALF_ARG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"/\s*2\b").expect("valid halved argument regex"));

/// Plain substrings that mark dynamic allocation; `renewal` counts too
const ALLOCATION_MARKERS: &[&str] = &["vector", "new"];

/// Estimated time complexity class
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimeComplexity {
    Constant,
    Logarithmic,
    Linear,
    Linearithmic,
    Quadratic,
    Cubic,
    /// `O(n^k)` for k >= 4
    Polynomial(u32),
    Exponential,
    /// `O(n · 2^n)`: recursion inside a loop
    LinearExponential,
}

impl TimeComplexity {
    /// Map a loop-nesting depth to a polynomial class
    pub fn from_loop_depth(depth: u32) -> Self {
        match depth {
            0 => TimeComplexity::Constant,
            1 => TimeComplexity::Linear,
            2 => TimeComplexity::Quadratic,
            3 => TimeComplexity::Cubic,
            k => TimeComplexity::Polynomial(k),
        }
    }
}

impl fmt::Display for TimeComplexity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TimeComplexity::Constant => write!(f, "O(1)"),
            TimeComplexity::Logarithmic => write!(f, "O(log n)"),
            TimeComplexity::Linear => write!(f, "O(n)"),
            TimeComplexity::Linearithmic => write!(f, "O(n log n)"),
            TimeComplexity::Quadratic => write!(f, "O(n^2)"),
            TimeComplexity::Cubic => write!(f, "O(n^3)"),
            TimeComplexity::Polynomial(k) => write!(f, "O(n^{})", k),
            TimeComplexity::Exponential => write!(f, "O(2^n)"),
            TimeComplexity::LinearExponential => write!(f, "O(n · 2^n)"),
        }
    }
}

impl Serialize for TimeComplexity {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Estimated space complexity class
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SpaceComplexity {
    Constant,
    Linear,
}

impl fmt::Display for SpaceComplexity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SpaceComplexity::Constant => "O(1)",
            SpaceComplexity::Linear => "O(n)",
        };
        write!(f, "{}", s)
    }
}

impl Serialize for SpaceComplexity {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Time and space labels for one source text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ComplexityEstimate {
    pub time: TimeComplexity,
    pub space: SpaceComplexity,
}

impl Default for ComplexityEstimate {
    fn default() -> Self {
        Self {
            time: TimeComplexity::Constant,
            space: SpaceComplexity::Constant,
        }
    }
}

/// Raw signals extracted from the source before classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Signals {
    pub recursive: bool,
    pub halving: bool,
    pub loop_depth: u32,
    pub allocates: bool,
}

impl Signals {
    /// Scan source text for all signals
    pub fn scan(source: &str) -> Self {
        let normalized = normalize(source);
        let recursive_names = recursive_call_targets(&normalized, source);

        let halving = has_halving_pattern(source)
            || has_halved_recursive_call(source, &recursive_names);

        Self {
            recursive: !recursive_names.is_empty(),
            halving,
            loop_depth: max_loop_depth(&normalized),
            allocates: ALLOCATION_MARKERS
                .iter()
                .any(|marker| source.contains(*marker)),
        }
    }

    /// Apply the classification rules in priority order
    pub fn classify(&self) -> ComplexityEstimate {
        let time = match (self.recursive, self.halving) {
            (true, true) => TimeComplexity::Logarithmic,
            (true, false) if self.loop_depth > 0 => TimeComplexity::LinearExponential,
            (true, false) => TimeComplexity::Exponential,
            (false, true) if self.loop_depth > 1 => TimeComplexity::Linearithmic,
            (false, true) => TimeComplexity::Logarithmic,
            (false, false) => TimeComplexity::from_loop_depth(self.loop_depth),
        };

        let space = if self.allocates {
            SpaceComplexity::Linear
        } else {
            SpaceComplexity::Constant
        };

        ComplexityEstimate { time, space }
    }
}

/// Estimate time and space complexity of a source text
pub fn estimate(source: &str) -> ComplexityEstimate {
    Signals::scan(source).classify()
}

/// Collapse every whitespace run into a single space
fn normalize(source: &str) -> String {
    RE_WHITESPACE.replace_all(source, " ").into_owned()
}

/// Names that appear as a call target more than once in `source`.
///
/// Candidates come from the normalized text, occurrences are counted in the
/// original text in one pass. Repeated call sites of a plain helper also
/// count; that over-report is part of the heuristic.
fn recursive_call_targets<'a>(normalized: &str, source: &'a str) -> HashSet<&'a str> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for caps in RE_CALL.captures_iter(source) {
        let name = caps.get(1).map_or("", |m| m.as_str());
        if NON_CALL_KEYWORDS.contains(&name) {
            continue;
        }
        if let Some(count) = counts.get_mut(name) {
            *count += 1;
        } else if counts.len() < MAX_CALL_TARGETS {
            counts.insert(name, 1);
        }
    }

    let candidates: HashSet<&str> = RE_CALL
        .captures_iter(normalized)
        .filter_map(|caps| caps.get(1).map(|m| m.as_str()))
        .filter(|name| !NON_CALL_KEYWORDS.contains(name))
        .collect();

    counts
        .into_iter()
        .filter(|(name, count)| *count > 1 && candidates.contains(*name))
        .map(|(name, _)| name)
        .collect()
}

fn has_halving_pattern(source: &str) -> bool {
    is_self_assigned(&RE_SELF_DIV, source)
        || RE_DIV_ASSIGN.is_match(source)
        || is_self_assigned(&RE_SELF_SHIFT, source)
        || RE_SHIFT_ASSIGN.is_match(source)
        || loop_condition_halves(source)
}

/// A `for (...)` / `while (...)` header that divides by two somewhere inside
fn loop_condition_halves(source: &str) -> bool {
    RE_LOOP_HEADER
        .find_iter(source)
        .any(|m| RE_HALF_ARG.is_match(loop_header(&source[m.end()..])))
}

/// Text up to the parenthesis that closes the header; the rest when unbalanced
fn loop_header(after_open: &str) -> &str {
    let mut depth = 1usize;
    for (idx, c) in after_open.char_indices() {
        match c {
            '(' => depth += 1,
            ')' => {
                depth -= 1;
                if depth == 0 {
                    return &after_open[..idx];
                }
            }
            _ => {}
        }
    }
    after_open
}

/// Both capture groups name the same variable (`n = n / 2`)
fn is_self_assigned(re: &Regex, source: &str) -> bool {
    re.captures_iter(source)
        .any(|caps| caps.get(1).map(|m| m.as_str()) == caps.get(2).map(|m| m.as_str()))
}

/// A call to a recursive target whose argument list divides by two, e.g. `f(n / 2)`
fn has_halved_recursive_call(source: &str, recursive_names: &HashSet<&str>) -> bool {
    if recursive_names.is_empty() {
        return false;
    }
    RE_CALL_ARGS.captures_iter(source).any(|caps| {
        let name = caps.get(1).map_or("", |m| m.as_str());
        let args = caps.get(2).map_or("", |m| m.as_str());
        recursive_names.contains(name) && RE_HALF_ARG.is_match(args)
    })
}

/// Split on `{` / `}`, keeping each brace as its own token
fn brace_tokens(text: &str) -> Vec<&str> {
    let mut tokens = Vec::new();
    let mut start = 0;
    for (idx, brace) in text.match_indices(|c: char| c == '{' || c == '}') {
        if start < idx {
            tokens.push(&text[start..idx]);
        }
        tokens.push(brace);
        start = idx + brace.len();
    }
    if start < text.len() {
        tokens.push(&text[start..]);
    }
    tokens
}

/// Deepest loop nesting seen while tracking closing braces
fn max_loop_depth(normalized: &str) -> u32 {
    let mut current: u32 = 0;
    let mut max_depth: u32 = 0;

    for token in brace_tokens(normalized) {
        if token == "}" {
            current = current.saturating_sub(1);
        } else if RE_LOOP.is_match(token) {
            current += 1;
            max_depth = max_depth.max(current);
        }
    }

    max_depth
}
