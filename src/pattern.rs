//! ECMA 262 patterns on top of the `regex` crate.
//!
//! Schemas write patterns in JavaScript syntax. The `regex` crate is close but
//! not identical: its `\d`, `\w`, `\s`, `\b` and `.` are Unicode-aware, some
//! escapes are spelled differently, and it has no lookaround or
//! backreferences. Patterns are translated once at compile time.
//!
//! Most patterns run on `regex`, whose matching time is linear in the input.
//! Patterns using lookaround or backreferences run on `fancy-regex`, which
//! backtracks; each match is bounded by a step limit and exceeding it is a
//! match error rather than a hang. Compiled program size is bounded for both.

use regex::{Regex, RegexBuilder};
use thiserror::Error;

/// Default upper bound on the compiled size of a single pattern.
pub const DEFAULT_REGEX_SIZE_LIMIT: usize = 1 << 20;

/// Default number of backtracking steps one match may take.
pub const DEFAULT_BACKTRACK_LIMIT: usize = 1_000_000;

const MAX_CODEPOINT: u32 = 0x10FFFF;
const HIGH_SURROGATES: std::ops::RangeInclusive<u32> = 0xD800..=0xDBFF;
const LOW_SURROGATES: std::ops::RangeInclusive<u32> = 0xDC00..=0xDFFF;

// ECMA `.` excludes all four line terminators, not only `\n`.
const DOT: &str = r"[^\n\r\x{2028}\x{2029}]";
const ANY_CHAR: &str = r"[\x{0}-\x{10FFFF}]";
const NO_CHAR: &str = r"[^\x{0}-\x{10FFFF}]";

// ASCII word boundaries spelled with lookaround, for the backtracking engine.
const WORD_BOUNDARY: &str =
    "(?:(?<=[0-9A-Z_a-z])(?![0-9A-Z_a-z])|(?<![0-9A-Z_a-z])(?=[0-9A-Z_a-z]))";
const NOT_WORD_BOUNDARY: &str =
    "(?:(?<=[0-9A-Z_a-z])(?=[0-9A-Z_a-z])|(?<![0-9A-Z_a-z])(?![0-9A-Z_a-z]))";

/// Sorted, disjoint inclusive code point ranges.
type Ranges = &'static [(u32, u32)];

const DIGIT: Ranges = &[(0x30, 0x39)];
const WORD: Ranges = &[(0x30, 0x39), (0x41, 0x5A), (0x5F, 0x5F), (0x61, 0x7A)];
// WhiteSpace and LineTerminator as ECMA defines them.
const SPACE: Ranges = &[
    (0x09, 0x0D),
    (0x20, 0x20),
    (0xA0, 0xA0),
    (0x1680, 0x1680),
    (0x2000, 0x200A),
    (0x2028, 0x2029),
    (0x202F, 0x202F),
    (0x205F, 0x205F),
    (0x3000, 0x3000),
    (0xFEFF, 0xFEFF),
];

/// Reasons a pattern is rejected at compile time or fails at match time.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PatternError {
    #[error("pattern ends with a dangling escape")]
    TrailingEscape,
    #[error("invalid escape '\\{0}'")]
    InvalidEscape(char),
    #[error("invalid group syntax")]
    InvalidGroup,
    #[error("unterminated character class")]
    UnterminatedClass,
    #[error("character class range out of order")]
    ClassRange,
    #[error("{0}")]
    Syntax(String),
    #[error("{0}")]
    Match(String),
}

#[derive(Debug, Clone)]
enum Engine {
    Linear(Regex),
    Backtracking(fancy_regex::Regex),
}

/// A compiled ECMA 262 pattern.
///
/// Matching is a search, not a full match: anchor with `^` and `$` to
/// constrain the whole string, as in JavaScript's `RegExp.prototype.test`.
///
/// # Example
///
/// ```rust
/// use checktree::EcmaRegex;
///
/// let regex = EcmaRegex::new(r"^\d{3}$").unwrap();
///
/// assert_eq!(regex.is_match("042"), Ok(true));
/// // ECMA digits are ASCII only
/// assert_eq!(regex.is_match("٠٤٢"), Ok(false));
///
/// let password = EcmaRegex::new("^(?=.*[0-9])(?=.*[a-z]).{8,}$").unwrap();
/// assert!(password.is_backtracking());
/// assert_eq!(password.is_match("hunter22"), Ok(true));
/// assert_eq!(password.is_match("hunterhunter"), Ok(false));
/// ```
#[derive(Debug, Clone)]
pub struct EcmaRegex {
    source: String,
    engine: Engine,
}

impl EcmaRegex {
    /// Compiles a pattern with the default limits.
    pub fn new(source: &str) -> Result<Self, PatternError> {
        Self::with_limits(source, DEFAULT_REGEX_SIZE_LIMIT, DEFAULT_BACKTRACK_LIMIT)
    }

    /// Compiles a pattern, rejecting it if the compiled program would exceed
    /// `size_limit` bytes. `backtrack_limit` bounds each match of a pattern
    /// that needs the backtracking engine.
    pub fn with_limits(
        source: &str,
        size_limit: usize,
        backtrack_limit: usize,
    ) -> Result<Self, PatternError> {
        let linear = translate(source, Dialect::Linear)?;
        let engine = if linear.backtracking {
            let translated = translate(source, Dialect::Backtracking)?;
            let regex = fancy_regex::RegexBuilder::new(&translated.pattern)
                .backtrack_limit(backtrack_limit)
                .delegate_size_limit(size_limit)
                .build()
                .map_err(|e| PatternError::Syntax(e.to_string()))?;
            Engine::Backtracking(regex)
        } else {
            let regex = RegexBuilder::new(&linear.pattern)
                .size_limit(size_limit)
                .build()
                .map_err(|e| PatternError::Syntax(e.to_string()))?;
            Engine::Linear(regex)
        };
        Ok(Self {
            source: source.to_string(),
            engine,
        })
    }

    /// Returns the pattern as written in the schema.
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Returns true if matching this pattern may backtrack.
    pub fn is_backtracking(&self) -> bool {
        matches!(self.engine, Engine::Backtracking(_))
    }

    /// Reports whether the pattern matches anywhere in `text`.
    ///
    /// Only a backtracking pattern can fail, when a match exceeds its step
    /// limit.
    pub fn is_match(&self, text: &str) -> Result<bool, PatternError> {
        match &self.engine {
            Engine::Linear(regex) => Ok(regex.is_match(text)),
            Engine::Backtracking(regex) => regex
                .is_match(text)
                .map_err(|e| PatternError::Match(e.to_string())),
        }
    }
}

/// Target syntax of a translation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Dialect {
    /// `regex` crate syntax.
    Linear,
    /// `fancy-regex` syntax; word boundaries become lookaround.
    Backtracking,
}

#[derive(Debug)]
pub(crate) struct Translation {
    pub(crate) pattern: String,
    /// Set when the pattern uses lookaround or backreferences.
    pub(crate) backtracking: bool,
}

/// Rewrites ECMA 262 syntax into the syntax of `dialect`.
pub(crate) fn translate(source: &str, dialect: Dialect) -> Result<Translation, PatternError> {
    let mut translator = Translator {
        chars: source.chars().collect(),
        pos: 0,
        dialect,
        backtracking: false,
        out: String::with_capacity(source.len() + 16),
    };
    translator.run()?;
    Ok(Translation {
        pattern: translator.out,
        backtracking: translator.backtracking,
    })
}

/// One member of a character class.
enum ClassAtom {
    Char(u32),
    /// An unescaped `-`: a range operator between two chars, else literal.
    Dash,
    Set(Vec<(u32, u32)>),
    Property(String),
}

impl ClassAtom {
    /// Returns the code point if this atom can bound a range.
    fn endpoint(&self) -> Option<u32> {
        match self {
            ClassAtom::Char(c) => Some(*c),
            ClassAtom::Dash => Some(u32::from('-')),
            ClassAtom::Set(_) | ClassAtom::Property(_) => None,
        }
    }
}

struct Translator {
    chars: Vec<char>,
    pos: usize,
    dialect: Dialect,
    backtracking: bool,
    out: String,
}

impl Translator {
    fn run(&mut self) -> Result<(), PatternError> {
        while let Some(c) = self.next() {
            match c {
                '\\' => self.escape()?,
                '[' => self.class()?,
                ']' => self.out.push_str(r"\]"),
                '.' => self.out.push_str(DOT),
                '(' if self.eat('?') => self.group()?,
                _ => self.out.push(c),
            }
        }
        Ok(())
    }

    fn next(&mut self) -> Option<char> {
        let c = self.chars.get(self.pos).copied();
        if c.is_some() {
            self.pos += 1;
        }
        c
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn eat(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn group(&mut self) -> Result<(), PatternError> {
        match self.next() {
            Some(':') => self.out.push_str("(?:"),
            Some(c @ ('=' | '!')) => {
                self.backtracking = true;
                self.out.push_str("(?");
                self.out.push(c);
            }
            Some('<') => match self.peek() {
                Some(c @ ('=' | '!')) => {
                    self.pos += 1;
                    self.backtracking = true;
                    self.out.push_str("(?<");
                    self.out.push(c);
                }
                Some(_) => self.out.push_str("(?P<"),
                None => return Err(PatternError::InvalidGroup),
            },
            _ => return Err(PatternError::InvalidGroup),
        }
        Ok(())
    }

    fn escape(&mut self) -> Result<(), PatternError> {
        let c = self.next().ok_or(PatternError::TrailingEscape)?;
        match c {
            'd' => push_set(&mut self.out, DIGIT, false),
            'D' => push_set(&mut self.out, DIGIT, true),
            'w' => push_set(&mut self.out, WORD, false),
            'W' => push_set(&mut self.out, WORD, true),
            's' => push_set(&mut self.out, SPACE, false),
            'S' => push_set(&mut self.out, SPACE, true),
            'b' | 'B' => self.boundary(c == 'B'),
            '1'..='9' => {
                self.backtracking = true;
                self.out.push('\\');
                self.out.push(c);
                while let Some(digit) = self.peek().filter(char::is_ascii_digit) {
                    self.pos += 1;
                    self.out.push(digit);
                }
            }
            'k' if self.peek() == Some('<') => {
                self.backtracking = true;
                self.out.push_str(r"\k");
                loop {
                    let c = self.next().ok_or(PatternError::InvalidEscape('k'))?;
                    self.out.push(c);
                    if c == '>' {
                        break;
                    }
                }
            }
            'p' | 'P' => {
                let property = self.property(c)?;
                self.out.push_str(&property);
            }
            _ => {
                let code = self.char_escape(c)?;
                push_code(&mut self.out, code);
            }
        }
        Ok(())
    }

    fn boundary(&mut self, negated: bool) {
        // `regex` has an ASCII `\b` but refuses an ASCII `\B` on text, since
        // it could match inside a multi-byte character.
        let text = match (self.dialect, negated) {
            (Dialect::Linear, false) => r"(?-u:\b)",
            (Dialect::Backtracking, false) => WORD_BOUNDARY,
            (_, true) => {
                self.backtracking = true;
                NOT_WORD_BOUNDARY
            }
        };
        self.out.push_str(text);
    }

    /// Reads a `\p{..}` or `\pL` property after its letter.
    fn property(&mut self, letter: char) -> Result<String, PatternError> {
        let mut text = format!("\\{}", letter);
        match self.next().ok_or(PatternError::InvalidEscape(letter))? {
            '{' => {
                text.push('{');
                loop {
                    let c = self.next().ok_or(PatternError::InvalidEscape(letter))?;
                    text.push(c);
                    if c == '}' {
                        break;
                    }
                }
            }
            c => text.push(c),
        }
        Ok(text)
    }

    /// Decodes an escape that stands for a single code point.
    fn char_escape(&mut self, c: char) -> Result<u32, PatternError> {
        let code = match c {
            'n' => 0x0A,
            'r' => 0x0D,
            't' => 0x09,
            'f' => 0x0C,
            'v' => 0x0B,
            '0' if !self.peek().is_some_and(|d| d.is_ascii_digit()) => 0,
            'c' => match self.peek().filter(char::is_ascii_alphabetic) {
                Some(letter) => {
                    self.pos += 1;
                    u32::from(letter) % 32
                }
                // Annex B: a lone `\c` is a literal backslash.
                None => {
                    self.pos -= 1;
                    u32::from('\\')
                }
            },
            'x' => self.hex(2).ok_or(PatternError::InvalidEscape('x'))?,
            'u' => self.unicode_escape()?,
            c if c.is_ascii_digit() => return Err(PatternError::InvalidEscape(c)),
            // Identity escape: `\a` is `a`, `\/` is `/`.
            c => u32::from(c),
        };
        Ok(code)
    }

    /// Reads the rest of a `\u` escape, joining a surrogate pair written as
    /// two escapes into one code point.
    fn unicode_escape(&mut self) -> Result<u32, PatternError> {
        if self.eat('{') {
            return self
                .braced_hex()
                .filter(|code| *code <= MAX_CODEPOINT)
                .ok_or(PatternError::InvalidEscape('u'));
        }
        let high = self.hex(4).ok_or(PatternError::InvalidEscape('u'))?;
        if HIGH_SURROGATES.contains(&high)
            && self.peek() == Some('\\')
            && self.chars.get(self.pos + 1) == Some(&'u')
        {
            let resume = self.pos;
            self.pos += 2;
            match self.hex(4) {
                Some(low) if LOW_SURROGATES.contains(&low) => {
                    return Ok(0x10000 + ((high - 0xD800) << 10) + (low - 0xDC00));
                }
                _ => self.pos = resume,
            }
        }
        Ok(high)
    }

    fn hex(&mut self, digits: usize) -> Option<u32> {
        let mut code = 0u32;
        for _ in 0..digits {
            let digit = self.next()?.to_digit(16)?;
            code = code * 16 + digit;
        }
        Some(code)
    }

    fn braced_hex(&mut self) -> Option<u32> {
        let mut code = 0u32;
        let mut digits = 0;
        loop {
            match self.next()? {
                '}' if digits > 0 => return Some(code),
                c => {
                    code = code.checked_mul(16)?.checked_add(c.to_digit(16)?)?;
                    digits += 1;
                }
            }
        }
    }

    /// Translates a character class; the opening `[` is already consumed.
    fn class(&mut self) -> Result<(), PatternError> {
        let negated = self.eat('^');
        let mut atoms = Vec::new();
        loop {
            match self.next().ok_or(PatternError::UnterminatedClass)? {
                ']' => break,
                '\\' => atoms.push(self.class_escape()?),
                '-' => atoms.push(ClassAtom::Dash),
                c => atoms.push(ClassAtom::Char(u32::from(c))),
            }
        }

        let mut body = String::new();
        let mut i = 0;
        while i < atoms.len() {
            if let (Some(lo), Some(ClassAtom::Dash), Some(hi)) = (
                atoms[i].endpoint(),
                atoms.get(i + 1),
                atoms.get(i + 2).and_then(ClassAtom::endpoint),
            ) {
                if lo > hi {
                    return Err(PatternError::ClassRange);
                }
                push_range(&mut body, lo, hi);
                i += 3;
                continue;
            }
            match &atoms[i] {
                ClassAtom::Char(c) => push_range(&mut body, *c, *c),
                // Annex B: a dash next to a class escape is literal.
                ClassAtom::Dash => body.push_str(r"\-"),
                ClassAtom::Set(ranges) => {
                    for &(lo, hi) in ranges {
                        push_range(&mut body, lo, hi);
                    }
                }
                ClassAtom::Property(text) => body.push_str(text),
            }
            i += 1;
        }

        // `[]` matches nothing and `[^]` anything; so does a class left empty
        // once lone surrogates are dropped.
        if body.is_empty() {
            self.out.push_str(if negated { ANY_CHAR } else { NO_CHAR });
        } else {
            self.out.push('[');
            if negated {
                self.out.push('^');
            }
            self.out.push_str(&body);
            self.out.push(']');
        }
        Ok(())
    }

    fn class_escape(&mut self) -> Result<ClassAtom, PatternError> {
        let c = self.next().ok_or(PatternError::TrailingEscape)?;
        let atom = match c {
            'd' => ClassAtom::Set(DIGIT.to_vec()),
            'D' => ClassAtom::Set(complement(DIGIT)),
            'w' => ClassAtom::Set(WORD.to_vec()),
            'W' => ClassAtom::Set(complement(WORD)),
            's' => ClassAtom::Set(SPACE.to_vec()),
            'S' => ClassAtom::Set(complement(SPACE)),
            'b' => ClassAtom::Char(0x08),
            'p' | 'P' => ClassAtom::Property(self.property(c)?),
            _ => ClassAtom::Char(self.char_escape(c)?),
        };
        Ok(atom)
    }
}

fn complement(ranges: Ranges) -> Vec<(u32, u32)> {
    let mut out = Vec::with_capacity(ranges.len() + 1);
    let mut next = 0;
    for &(lo, hi) in ranges {
        if lo > next {
            out.push((next, lo - 1));
        }
        next = hi + 1;
    }
    if next <= MAX_CODEPOINT {
        out.push((next, MAX_CODEPOINT));
    }
    out
}

fn push_set(out: &mut String, ranges: Ranges, negated: bool) {
    out.push('[');
    if negated {
        out.push('^');
    }
    for &(lo, hi) in ranges {
        push_range(out, lo, hi);
    }
    out.push(']');
}

/// Appends a class range, leaving out surrogates: they never occur in a `str`.
fn push_range(out: &mut String, lo: u32, hi: u32) {
    for (lo, hi) in [(lo, hi.min(0xD7FF)), (lo.max(0xE000), hi)] {
        if lo > hi {
            continue;
        }
        push_class_char(out, lo);
        if hi > lo {
            out.push('-');
            push_class_char(out, hi);
        }
    }
}

fn push_class_char(out: &mut String, code: u32) {
    match char::from_u32(code) {
        Some(c) if c.is_ascii_alphanumeric() || c == '_' => out.push(c),
        _ => push_hex(out, code),
    }
}

/// Appends a single code point outside a class.
fn push_code(out: &mut String, code: u32) {
    match char::from_u32(code) {
        Some(c) if c.is_control() || c.is_whitespace() => push_hex(out, code),
        Some(c) if is_meta(c) => {
            out.push('\\');
            out.push(c);
        }
        Some(c) => out.push(c),
        // A lone surrogate can never match.
        None => out.push_str(NO_CHAR),
    }
}

fn push_hex(out: &mut String, code: u32) {
    out.push_str(&format!(r"\x{{{:X}}}", code));
}

fn is_meta(c: char) -> bool {
    matches!(
        c,
        '\\' | '.' | '+' | '*' | '?' | '(' | ')' | '|' | '[' | ']' | '{' | '}' | '^' | '$'
            | '#' | '&' | '-' | '~'
    )
}
