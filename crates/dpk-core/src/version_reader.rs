//! Tokenizer for APK version strings.
//!
//! A version such as `1.2.3a_rc4~deadbeef` or `0.20240527.191746-r2` is read as
//! a sequence of typed [`Token`]s. Which token may come next depends on the
//! tokens already seen, so the reader tracks two flag sets: every kind seen so
//! far and the kind of the immediately preceding token.

use std::cmp::Ordering;
use std::ops::{BitOr, BitOrAssign};

/// Set of token kinds, used for the lexer's transition rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
struct TokenFlags(u8);

impl TokenFlags {
    const INITIAL: Self = Self(1 << 0);
    const DIGIT: Self = Self(1 << 1);
    const LETTER: Self = Self(1 << 2);
    const SUFFIX: Self = Self(1 << 3);
    const SUFFIX_NUMBER: Self = Self(1 << 4);
    const COMMIT_HASH: Self = Self(1 << 5);
    const REVISION: Self = Self(1 << 6);

    /// Kinds after which a letter may not follow.
    const LETTER_BLOCKERS: Self = Self(
        Self::LETTER.0 | Self::SUFFIX.0 | Self::SUFFIX_NUMBER.0 | Self::COMMIT_HASH.0 | Self::REVISION.0,
    );
    /// Kinds a numeric component may follow.
    const NUMBER_PREDECESSORS: Self = Self(Self::INITIAL.0 | Self::DIGIT.0 | Self::SUFFIX.0);
    /// Kinds that close the version to suffixes and commit hashes.
    const TERMINAL: Self = Self(Self::COMMIT_HASH.0 | Self::REVISION.0);

    fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    fn intersects(self, other: Self) -> bool {
        self.0 & other.0 != 0
    }

    fn is_subset_of(self, other: Self) -> bool {
        self.0 & !other.0 == 0
    }
}

impl BitOr for TokenFlags {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign for TokenFlags {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

/// Keyword suffix introduced by `_`.
///
/// Variants are declared in comparison order; the discriminant is the rank
/// used when two suffixes are compared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Suffix {
    Alpha = 0,
    Beta = 1,
    Pre = 2,
    Rc = 3,
    Cvs = 5,
    Svn = 6,
    Git = 7,
    Hg = 8,
    P = 9,
}

impl Suffix {
    /// Map a suffix keyword to its kind by its first letter.
    ///
    /// A lone `p` is a patch suffix, any longer word starting with `p` is `pre`.
    pub fn from_keyword(keyword: &[u8]) -> Option<Self> {
        match keyword.first()? {
            b'a' => Some(Self::Alpha),
            b'b' => Some(Self::Beta),
            b'c' => Some(Self::Cvs),
            b'g' => Some(Self::Git),
            b'h' => Some(Self::Hg),
            b'p' if keyword.len() == 1 => Some(Self::P),
            b'p' => Some(Self::Pre),
            b'r' => Some(Self::Rc),
            b's' => Some(Self::Svn),
            _ => None,
        }
    }

    /// Pre-release suffixes rank below the release they precede.
    pub fn is_pre_release(self) -> bool {
        matches!(self, Self::Alpha | Self::Beta | Self::Pre | Self::Rc)
    }
}

/// Token kinds in comparison rank order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TokenKind {
    Digit = 1,
    Letter,
    Suffix,
    SuffixNumber,
    CommitHash,
    Revision,
    End,
}

/// A decimal digit run of any length.
///
/// Equality is on the digits as written; [`Number::cmp_value`] orders by
/// numeric value without an upper bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Number<'a>(&'a [u8]);

impl<'a> Number<'a> {
    pub fn new(digits: &'a [u8]) -> Self {
        Self(digits)
    }

    pub fn digits(&self) -> &'a [u8] {
        self.0
    }

    /// Numeric value, if it fits in a `u64`.
    pub fn value(&self) -> Option<u64> {
        self.0.iter().try_fold(0u64, |acc, &d| {
            acc.checked_mul(10)?.checked_add(u64::from(d - b'0'))
        })
    }

    pub fn cmp_value(&self, other: &Self) -> Ordering {
        let (lhs, rhs) = (self.significant(), other.significant());
        lhs.len().cmp(&rhs.len()).then_with(|| lhs.cmp(rhs))
    }

    fn significant(&self) -> &'a [u8] {
        let zeros = self.0.iter().take_while(|&&d| d == b'0').count();
        &self.0[zeros..]
    }
}

/// One component of a version string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Token<'a> {
    /// Numeric component. Every run but the `initial` one compares as a
    /// string when either side is zero-padded.
    Digit { number: Number<'a>, initial: bool },
    /// Single letter directly after a digit run.
    Letter(u8),
    Suffix(Suffix),
    /// Number directly after a suffix keyword.
    SuffixNumber(Number<'a>),
    /// Hex digest after `~`; always the last component.
    CommitHash(&'a [u8]),
    /// Package revision after `-r`.
    Revision(Number<'a>),
    End,
}

impl Token<'_> {
    pub fn kind(&self) -> TokenKind {
        match self {
            Token::Digit { .. } => TokenKind::Digit,
            Token::Letter(_) => TokenKind::Letter,
            Token::Suffix(_) => TokenKind::Suffix,
            Token::SuffixNumber(_) => TokenKind::SuffixNumber,
            Token::CommitHash(_) => TokenKind::CommitHash,
            Token::Revision(_) => TokenKind::Revision,
            Token::End => TokenKind::End,
        }
    }

    pub fn is_pre_release(&self) -> bool {
        matches!(self, Token::Suffix(suffix) if suffix.is_pre_release())
    }
}

/// The byte at `offset` cannot continue the version.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LexError {
    pub offset: usize,
}

/// Incremental lexer over a single version string.
///
/// Once [`Token::End`] is produced every further call produces it again.
#[derive(Debug, Clone)]
pub struct VersionReader<'a> {
    rest: &'a [u8],
    len: usize,
    seen: TokenFlags,
    last: TokenFlags,
}

impl<'a> VersionReader<'a> {
    pub fn new(version: &'a str) -> Self {
        Self {
            rest: version.as_bytes(),
            len: version.len(),
            seen: TokenFlags::default(),
            last: TokenFlags::default(),
        }
    }

    /// Read the next token.
    pub fn next_token(&mut self) -> Result<Token<'a>, LexError> {
        self.seen |= self.last;
        let started = self.seen.contains(TokenFlags::INITIAL);

        match self.rest.first().copied().unwrap_or(0) {
            letter @ b'a'..=b'z' => {
                if !started || self.last.intersects(TokenFlags::LETTER_BLOCKERS) {
                    return Err(self.error());
                }
                self.advance(1);
                self.last = TokenFlags::LETTER;
                Ok(Token::Letter(letter))
            }
            b'.' => {
                if !started || !self.last.contains(TokenFlags::DIGIT) {
                    return Err(self.error());
                }
                self.advance(1);
                self.read_component()
            }
            b'0'..=b'9' => self.read_component(),
            b'_' => {
                if !started || self.seen.intersects(TokenFlags::TERMINAL) {
                    return Err(self.error());
                }
                self.advance(1);
                let len = self.rest.iter().take_while(|b| b.is_ascii_lowercase()).count();
                let suffix = Suffix::from_keyword(&self.rest[..len]).ok_or_else(|| self.error())?;
                self.advance(len);
                self.last = TokenFlags::SUFFIX;
                Ok(Token::Suffix(suffix))
            }
            b'~' => {
                if !started || self.seen.intersects(TokenFlags::TERMINAL) {
                    return Err(self.error());
                }
                self.advance(1);
                let rest = self.rest;
                let len = rest.iter().take_while(|b| b.is_ascii_hexdigit()).count();
                let hash = &rest[..len];
                self.advance(len);
                if !self.rest.is_empty() {
                    return Err(self.error());
                }
                self.last = TokenFlags::COMMIT_HASH;
                Ok(Token::CommitHash(hash))
            }
            b'-' => {
                if !started
                    || self.seen.intersects(TokenFlags::REVISION)
                    || !self.rest.starts_with(b"-r")
                {
                    return Err(self.error());
                }
                self.advance(2);
                let number = self.read_number()?;
                self.last = TokenFlags::REVISION;
                Ok(Token::Revision(number))
            }
            0 => {
                if !started {
                    return Err(self.error());
                }
                Ok(Token::End)
            }
            _ => Err(self.error()),
        }
    }

    /// Read tokens until the end, discarding them.
    pub fn finish(&mut self) -> Result<(), LexError> {
        while self.next_token()? != Token::End {}
        Ok(())
    }

    fn read_component(&mut self) -> Result<Token<'a>, LexError> {
        if !self.last.is_subset_of(TokenFlags::NUMBER_PREDECESSORS) {
            return Err(self.error());
        }
        let number = self.read_number()?;
        if self.last == TokenFlags::SUFFIX {
            self.last = TokenFlags::SUFFIX_NUMBER;
            return Ok(Token::SuffixNumber(number));
        }
        self.last = TokenFlags::DIGIT;
        let initial = !self.seen.contains(TokenFlags::INITIAL);
        if initial {
            self.last |= TokenFlags::INITIAL;
        }
        Ok(Token::Digit { number, initial })
    }

    fn read_number(&mut self) -> Result<Number<'a>, LexError> {
        let rest = self.rest;
        let len = rest.iter().take_while(|b| b.is_ascii_digit()).count();
        if len == 0 {
            return Err(self.error());
        }
        self.advance(len);
        Ok(Number(&rest[..len]))
    }

    fn advance(&mut self, n: usize) {
        self.rest = &self.rest[n..];
    }

    fn error(&self) -> LexError {
        LexError {
            offset: self.len - self.rest.len(),
        }
    }
}

/// Tokenize a whole version, including the trailing [`Token::End`].
pub fn tokenize(version: &str) -> Result<Vec<Token<'_>>, LexError> {
    let mut reader = VersionReader::new(version);
    let mut tokens = Vec::new();
    loop {
        let token = reader.next_token()?;
        tokens.push(token);
        if token == Token::End {
            return Ok(tokens);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_dotted_version() {
        let tokens = tokenize("1.20.3").unwrap();
        assert_eq!(
            tokens,
            vec![
                Token::Digit {
                    number: Number::new(b"1"),
                    initial: true
                },
                Token::Digit {
                    number: Number::new(b"20"),
                    initial: false
                },
                Token::Digit {
                    number: Number::new(b"3"),
                    initial: false
                },
                Token::End,
            ]
        );
    }

    #[test]
    fn full_grammar() {
        let tokens = tokenize("0.0.0_git20210122-r0").unwrap();
        let kinds: Vec<_> = tokens.iter().map(Token::kind).collect();
        assert_eq!(
            kinds,
            vec![
                TokenKind::Digit,
                TokenKind::Digit,
                TokenKind::Digit,
                TokenKind::Suffix,
                TokenKind::SuffixNumber,
                TokenKind::Revision,
                TokenKind::End,
            ]
        );
        assert_eq!(tokens[3], Token::Suffix(Suffix::Git));
        assert_eq!(tokens[4], Token::SuffixNumber(Number::new(b"20210122")));
        assert_eq!(tokens[5], Token::Revision(Number::new(b"0")));
    }

    #[test]
    fn letter_after_digit() {
        let tokens = tokenize("9100h-r4").unwrap();
        assert_eq!(tokens[1], Token::Letter(b'h'));
        assert_eq!(tokens[2], Token::Revision(Number::new(b"4")));
    }

    #[test]
    fn commit_hash_is_terminal() {
        let tokens = tokenize("1.0~c0ffee").unwrap();
        assert_eq!(tokens[2], Token::CommitHash(b"c0ffee".as_slice()));
        assert!(tokenize("1.0~c0ffee-r1").is_err());
        assert!(tokenize("1.0~abc~def").is_err());
    }

    #[test]
    fn p_versus_pre_quirk() {
        assert_eq!(Suffix::from_keyword(b"p"), Some(Suffix::P));
        assert_eq!(Suffix::from_keyword(b"pre"), Some(Suffix::Pre));
        assert_eq!(Suffix::from_keyword(b"patch"), Some(Suffix::Pre));
        assert_eq!(Suffix::from_keyword(b"rc"), Some(Suffix::Rc));
        assert_eq!(Suffix::from_keyword(b"x"), None);
        assert_eq!(Suffix::from_keyword(b""), None);
    }

    #[test]
    fn suffix_rank_order() {
        assert!(Suffix::Alpha < Suffix::Beta);
        assert!(Suffix::Beta < Suffix::Pre);
        assert!(Suffix::Pre < Suffix::Rc);
        assert!(Suffix::Rc < Suffix::Cvs);
        assert!(Suffix::Cvs < Suffix::Svn);
        assert!(Suffix::Svn < Suffix::Git);
        assert!(Suffix::Git < Suffix::Hg);
        assert!(Suffix::Hg < Suffix::P);
    }

    #[test]
    fn must_start_with_digit() {
        assert_eq!(tokenize("a").unwrap_err().offset, 0);
        assert!(tokenize("").is_err());
        assert!(tokenize(".1").is_err());
        assert!(tokenize("_alpha").is_err());
    }

    #[test]
    fn revision_requires_r_and_number() {
        assert!(tokenize("10.2.3-100").is_err());
        assert!(tokenize("1.0-r").is_err());
        assert!(tokenize("1.0-").is_err());
        assert!(tokenize("1.0-r1-r2").is_err());
    }

    #[test]
    fn rejects_illegal_transitions() {
        assert!(tokenize("0r-10").is_err());
        assert!(tokenize("1.0ab").is_err());
        assert!(tokenize("1.").is_err());
        assert!(tokenize("1..2").is_err());
        assert!(tokenize("1_alpha.2").is_err());
        assert!(tokenize("1.0-r1_alpha").is_err());
        assert!(tokenize("1.0A").is_err());
    }

    #[test]
    fn error_offset_points_at_bad_byte() {
        assert_eq!(tokenize("1.2!").unwrap_err().offset, 3);
    }

    #[test]
    fn long_digit_runs_are_read_whole() {
        let tokens = tokenize("99999999999999999999999").unwrap();
        let Token::Digit { number, .. } = tokens[0] else {
            panic!("expected a digit run, got {:?}", tokens[0]);
        };
        assert_eq!(number.digits().len(), 23);
        assert_eq!(number.value(), None);
    }

    #[test]
    fn numbers_order_by_value() {
        let n = |digits: &'static str| Number::new(digits.as_bytes());
        assert_eq!(n("10").cmp_value(&n("9")), Ordering::Greater);
        assert_eq!(n("007").cmp_value(&n("7")), Ordering::Equal);
        assert_eq!(
            n("99999999999999999999").cmp_value(&n("100000000000000000000")),
            Ordering::Less
        );
        assert_eq!(n("42").value(), Some(42));
    }

    #[test]
    fn end_repeats() {
        let mut reader = VersionReader::new("1");
        assert!(matches!(reader.next_token(), Ok(Token::Digit { .. })));
        assert_eq!(reader.next_token(), Ok(Token::End));
        assert_eq!(reader.next_token(), Ok(Token::End));
    }
}
