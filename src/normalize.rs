use std::sync::LazyLock;

use regex::Regex;

enum Rewrite {
    Pattern {
        regex: Regex,
        replacement: &'static str,
    },
    Function(fn(&str) -> String),
}

pub(crate) struct SpacingRule {
    pub(crate) name: &'static str,
    rewrite: Rewrite,
}

impl SpacingRule {
    fn pattern(name: &'static str, pattern: &str, replacement: &'static str) -> Self {
        Self {
            name,
            rewrite: Rewrite::Pattern {
                regex: Regex::new(pattern).expect("hardcoded spacing rule regex is valid"),
                replacement,
            },
        }
    }

    pub(crate) fn apply(&self, line: &str) -> String {
        match &self.rewrite {
            Rewrite::Pattern { regex, replacement } => {
                regex.replace_all(line, *replacement).into_owned()
            }
            Rewrite::Function(rewrite) => rewrite(line),
        }
    }
}

static DIGIT_RUN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[0-9]{10,}").expect("hardcoded digit run regex is valid"));

static DIMENSION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d{2}x\d{2}").expect("hardcoded dimension regex is valid"));

static CLOSING_PAREN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\)").expect("hardcoded closing paren regex is valid"));

static TRAILING_DIGITS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d{2,5}$").expect("hardcoded trailing digits regex is valid"));

/// Upper bound on full passes over the rule list. Rules only ever split or
/// join around a single space, so a line settles after one or two passes.
const MAX_SPACING_PASSES: usize = 4;

/// Ordered spacing fixes for numeric tokens glued together or torn apart by
/// text extraction.
pub(crate) static SPACING_RULES: LazyLock<Vec<SpacingRule>> = LazyLock::new(|| {
    vec![
        SpacingRule::pattern(
            "join-thousands",
            r"(^|\s)(\d) (\d{3},\d{2})",
            "${1}${2}${3}",
        ),
        SpacingRule {
            name: "space-after-dimension",
            rewrite: Rewrite::Function(space_after_dimensions),
        },
        SpacingRule::pattern("split-mm-code", r"(mm)(\d{10})", "${1} ${2}"),
        SpacingRule::pattern("split-mm-digit", r"(mm)(\d)", "${1} ${2} "),
        SpacingRule::pattern("split-letters-digits", r"([A-Za-z]{4})(\d{3})", "${1} ${2}"),
        SpacingRule {
            name: "space-after-paren",
            rewrite: Rewrite::Function(space_after_parens),
        },
        SpacingRule {
            name: "detach-ten-digit-code",
            rewrite: Rewrite::Function(detach_ten_digit_codes),
        },
    ]
});

/// Inserts a space after every match of `regex` that is directly followed by
/// a non-space character. The following character is never consumed, so
/// back-to-back matches are all seen in one pass.
fn space_after_matches(line: &str, regex: &Regex, pad_line_end: bool) -> String {
    let mut out = String::with_capacity(line.len() + 4);
    let mut copied = 0;

    for found in regex.find_iter(line) {
        let needs_space = match line[found.end()..].chars().next() {
            Some(next) => !next.is_whitespace(),
            None => pad_line_end,
        };
        if needs_space {
            out.push_str(&line[copied..found.end()]);
            out.push(' ');
            copied = found.end();
        }
    }

    out.push_str(&line[copied..]);
    out
}

fn space_after_dimensions(line: &str) -> String {
    space_after_matches(line, &DIMENSION_RE, true)
}

fn space_after_parens(line: &str) -> String {
    space_after_matches(line, &CLOSING_PAREN_RE, false)
}

/// Puts a space in front of every ten-digit code that is glued to the
/// preceding text. For a longer digit run only its last ten digits form the
/// code.
fn detach_ten_digit_codes(line: &str) -> String {
    let mut out = String::with_capacity(line.len() + 4);
    let mut copied = 0;

    for run in DIGIT_RUN_RE.find_iter(line) {
        let code_start = run.end() - 10;
        if line[..code_start].ends_with(' ') {
            continue;
        }
        out.push_str(&line[copied..code_start]);
        out.push(' ');
        copied = code_start;
    }

    out.push_str(&line[copied..]);
    out
}

fn apply_rules_once(line: &str) -> String {
    SPACING_RULES
        .iter()
        .fold(line.to_string(), |current, rule| rule.apply(&current))
}

/// Runs the rule list until the line stops changing, so a rule that opens
/// up a match for an earlier one still gets applied.
pub(crate) fn apply_spacing_rules(line: &str) -> String {
    let mut current = apply_rules_once(line);
    for _ in 1..MAX_SPACING_PASSES {
        let next = apply_rules_once(&current);
        if next == current {
            break;
        }
        current = next;
    }
    current
}

/// Removes the page-local numeric suffix that extraction leaves at the end
/// of some rows. Only ever touches the end of the line, so it is not
/// idempotent.
pub(crate) fn strip_trailing_digits(line: &str) -> String {
    TRAILING_DIGITS_RE.replace(line, "").into_owned()
}

pub(crate) fn normalize_line(line: &str) -> String {
    strip_trailing_digits(&apply_spacing_rules(line))
}
