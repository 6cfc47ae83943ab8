//! core::record
//!
//! Decoding of formatted history lines into [`CommitRecord`] values.
//!
//! # Line Shape
//!
//! Each commit occupies one line. Fields are joined by [`SEP`], and literal
//! spaces inside the variable-width fields (graph, author, signer, message)
//! are replaced by the same character before emission:
//!
//! ```text
//! <graph><id>SEP<date>SEP<author>SEP[<signer>]SEP[<status>]SEP<message>SEP(<refs>)
//! ```
//!
//! The ref decoration is always the last field and keeps its spaces, so it
//! is split off from the right. Names may contain brackets of their own, so
//! the one-character status field anchors the split between the names and
//! the message. Lines that do not match the shape (graph-only connector
//! lines, blank trailers) are dropped.
//!
//! # Placeholders
//!
//! - An empty message becomes [`EMPTY_MESSAGE`].
//! - A signature that cannot be checked forces the signer to [`UNKNOWN_SIGNER`].
//! - A missing signer is `None`, never the empty string.

use std::sync::OnceLock;

use regex::Regex;

/// Field separator, also substituted for spaces in variable-width fields.
pub const SEP: char = '\u{1f}';

/// Shown in place of an empty commit subject.
pub const EMPTY_MESSAGE: &str = "(no message)";

/// Signer shown when the signature status cannot be determined.
pub const UNKNOWN_SIGNER: &str = "unknown";

/// Color tone derived from a signature status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Severity {
    /// Valid signature.
    Good,
    /// Valid but degraded, or not checkable.
    Caution,
    /// Invalid or revoked.
    Bad,
    /// Unsigned commit.
    None,
}

/// Single-character signature verification outcome (`%G?`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignatureStatus {
    /// `G`: good signature.
    Good,
    /// `U`: good signature, unknown trust.
    UnknownTrust,
    /// `X`: good signature that has expired.
    Expired,
    /// `Y`: good signature made by an expired key.
    ExpiredKey,
    /// `E`: signature cannot be checked (e.g. missing key).
    CannotCheck,
    /// `B`: bad signature.
    Bad,
    /// `R`: good signature made by a revoked key.
    Revoked,
    /// `N`: no signature.
    Unsigned,
    /// Any code outside the known set.
    Unrecognized(char),
}

impl SignatureStatus {
    /// Classify a status code. A missing code means unsigned.
    pub fn from_code(code: Option<char>) -> Self {
        match code {
            Some('G') => SignatureStatus::Good,
            Some('U') => SignatureStatus::UnknownTrust,
            Some('X') => SignatureStatus::Expired,
            Some('Y') => SignatureStatus::ExpiredKey,
            Some('E') => SignatureStatus::CannotCheck,
            Some('B') => SignatureStatus::Bad,
            Some('R') => SignatureStatus::Revoked,
            Some('N') | None => SignatureStatus::Unsigned,
            Some(other) => SignatureStatus::Unrecognized(other),
        }
    }

    /// The status code as emitted by git.
    pub fn code(self) -> char {
        match self {
            SignatureStatus::Good => 'G',
            SignatureStatus::UnknownTrust => 'U',
            SignatureStatus::Expired => 'X',
            SignatureStatus::ExpiredKey => 'Y',
            SignatureStatus::CannotCheck => 'E',
            SignatureStatus::Bad => 'B',
            SignatureStatus::Revoked => 'R',
            SignatureStatus::Unsigned => 'N',
            SignatureStatus::Unrecognized(c) => c,
        }
    }

    /// Tone used when coloring a row.
    ///
    /// Unknown trust is still a valid signature and renders as good. Expired
    /// signatures and expired keys render as caution. Unrecognized codes fall
    /// back to caution.
    pub fn severity(self) -> Severity {
        match self {
            SignatureStatus::Good | SignatureStatus::UnknownTrust => Severity::Good,
            SignatureStatus::Expired
            | SignatureStatus::ExpiredKey
            | SignatureStatus::CannotCheck
            | SignatureStatus::Unrecognized(_) => Severity::Caution,
            SignatureStatus::Bad | SignatureStatus::Revoked => Severity::Bad,
            SignatureStatus::Unsigned => Severity::None,
        }
    }
}

/// One decoded line of history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitRecord {
    /// Graph connector glyphs, passed through untouched.
    pub graph: String,
    /// Abbreviated commit id.
    pub id: String,
    /// Date as formatted by the history query.
    pub date: String,
    /// Author display name.
    pub author: String,
    /// Signer name, without email.
    pub signer: Option<String>,
    /// Signature verification outcome.
    pub status: SignatureStatus,
    /// Subject line, never empty.
    pub message: String,
    /// Ref decoration, possibly empty.
    pub refs: String,
}

impl CommitRecord {
    /// Decode a single history line, or `None` if it does not have the
    /// expected shape.
    pub fn parse_line(line: &str) -> Option<Self> {
        let caps = line_pattern().captures(line.trim_end_matches(['\r', '\n']))?;
        let fields = Fields::split(caps.name("fields")?.as_str())?;

        let status = SignatureStatus::from_code(fields.status);
        let signer = match status {
            SignatureStatus::CannotCheck => Some(UNKNOWN_SIGNER.to_string()),
            _ => signer_name(&decode(fields.signer)),
        };
        let message = match decode(fields.message) {
            m if m.is_empty() => EMPTY_MESSAGE.to_string(),
            m => m,
        };

        Some(Self {
            graph: decode(&caps["graph"]),
            id: caps["id"].to_string(),
            date: caps["date"].to_string(),
            author: decode(fields.author),
            signer,
            status,
            message,
            refs: caps["refs"].to_string(),
        })
    }

    /// Re-encode this record in the history line shape.
    pub fn to_line(&self) -> String {
        format!(
            "{graph}{id}{SEP}{date}{SEP}{author}{SEP}[{signer}]{SEP}[{status}]{SEP}{message}{SEP}({refs})",
            graph = encode(&self.graph),
            id = self.id,
            date = self.date,
            author = encode(&self.author),
            signer = encode(self.signer.as_deref().unwrap_or_default()),
            status = self.status.code(),
            message = encode(&self.message),
            refs = self.refs,
        )
    }

    /// Tone for this row.
    pub fn severity(&self) -> Severity {
        self.status.severity()
    }

    /// Whether the author is the one who signed the commit.
    pub fn signed_by_author(&self) -> bool {
        self.signer.as_deref() == Some(self.author.as_str())
    }
}

/// A named group of records sharing one report section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportBatch {
    /// Section title, e.g. `UNMERGED`.
    pub label: String,
    /// Records in history order (newest first).
    pub records: Vec<CommitRecord>,
    /// Longest author name in this batch, in characters.
    pub author_width: usize,
}

impl ReportBatch {
    /// Decode a raw history stream into a batch.
    ///
    /// Lines that do not match the record shape are skipped.
    pub fn parse(label: impl Into<String>, raw: &str) -> Self {
        Self::from_records(label, raw.lines().filter_map(CommitRecord::parse_line))
    }

    /// Build a batch from already-decoded records.
    pub fn from_records(
        label: impl Into<String>,
        records: impl IntoIterator<Item = CommitRecord>,
    ) -> Self {
        let mut author_width = 0;
        let records = records
            .into_iter()
            .inspect(|r| author_width = author_width.max(r.author.chars().count()))
            .collect();

        Self {
            label: label.into(),
            records,
            author_width,
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Replace field separators with spaces.
pub fn decode(field: &str) -> String {
    field.replace(SEP, " ")
}

/// Replace spaces with field separators.
pub fn encode(field: &str) -> String {
    field.replace(' ', &SEP.to_string())
}

/// Encode the spaces of a raw `git log` line, leaving the trailing ref
/// decoration intact.
pub fn encode_raw_line(line: &str) -> String {
    let marker = format!("{SEP}(");
    match line.rfind(&marker) {
        Some(idx) => {
            let (body, refs) = line.split_at(idx);
            format!("{}{}", encode(body), refs)
        }
        None => encode(line),
    }
}

/// Name portion of a `Name <email>` signer annotation.
fn signer_name(annotation: &str) -> Option<String> {
    let name = match annotation.find('<') {
        Some(idx) => &annotation[..idx],
        None => annotation,
    }
    .trim();

    (!name.is_empty()).then(|| name.to_string())
}

/// Opens the status field after the signer: `]SEP[`.
const STATUS_OPEN: &str = "]\u{1f}[";

/// Opens the signer field after the author: `SEP[`.
const SIGNER_OPEN: &str = "\u{1f}[";

/// Closes a bracketed field: `]SEP`.
const FIELD_CLOSE: &str = "]\u{1f}";

/// The variable part of a line: `author SEP [signer] SEP [status] SEP message`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Fields<'a> {
    author: &'a str,
    signer: &'a str,
    status: Option<char>,
    message: &'a str,
}

impl<'a> Fields<'a> {
    /// Split the encoded middle of a line.
    ///
    /// Author and signer names may carry their own brackets (`dependabot
    /// [bot]`), so the status field is located first: the leftmost
    /// `]SEP[c]SEP` with a known code, then with any one-character code, then
    /// an empty `]SEP[]SEP`. The author ends at the first `SEP[` before it
    /// that leaves both names with balanced brackets.
    fn split(middle: &'a str) -> Option<Self> {
        let known: fn(char) -> bool =
            |c| !matches!(SignatureStatus::from_code(Some(c)), SignatureStatus::Unrecognized(_));
        let any: fn(char) -> bool = |c| c != ']' && c != SEP;

        Self::split_at_status(middle, Some(known))
            .or_else(|| Self::split_at_status(middle, Some(any)))
            .or_else(|| Self::split_at_status(middle, None))
    }

    /// Split at the leftmost status field whose code passes `accept`, or at
    /// the leftmost empty one when `accept` is `None`.
    fn split_at_status(middle: &'a str, accept: Option<fn(char) -> bool>) -> Option<Self> {
        middle.match_indices(STATUS_OPEN).find_map(|(idx, _)| {
            let rest = &middle[idx + STATUS_OPEN.len()..];
            let (status, after) = match accept {
                Some(accept) => {
                    let c = rest.chars().next().filter(|&c| accept(c))?;
                    (Some(c), &rest[c.len_utf8()..])
                }
                None => (None, rest),
            };
            let message = after.strip_prefix(FIELD_CLOSE)?;
            let (author, signer) = split_names(&middle[..idx])?;

            Some(Self {
                author,
                signer,
                status,
                message,
            })
        })
    }
}

/// Split `author SEP [signer` at the author/signer boundary.
fn split_names(head: &str) -> Option<(&str, &str)> {
    let splits: Vec<(&str, &str)> = head
        .match_indices(SIGNER_OPEN)
        .map(|(idx, _)| (&head[..idx], &head[idx + SIGNER_OPEN.len()..]))
        .collect();

    splits
        .iter()
        .copied()
        .find(|(author, signer)| balanced(author) && balanced(signer))
        .or_else(|| splits.first().copied())
}

/// Every `]` closes an earlier `[` and nothing is left open.
fn balanced(text: &str) -> bool {
    let mut depth = 0usize;
    for c in text.chars() {
        match c {
            '[' => depth += 1,
            ']' => match depth.checked_sub(1) {
                Some(d) => depth = d,
                None => return false,
            },
            _ => {}
        }
    }
    depth == 0
}

fn line_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(concat!(
            r"^(?P<graph>[^0-9a-f]*)",
            r"(?P<id>[0-9a-f]{4,64})\x1f",
            r"(?P<date>[^\x1f]*)\x1f",
            r"(?P<fields>.*)\x1f",
            r"\((?P<refs>[^\x1f]*)\)$",
        ))
        .expect("history line pattern is valid")
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(fields: &[&str]) -> String {
        fields.join(&SEP.to_string())
    }

    #[test]
    fn parses_full_line() {
        let raw = line(&[
            "*\u{1f}1a2b3c4",
            "2024-03-01",
            "Ada\u{1f}Lovelace",
            "[Ada\u{1f}Lovelace\u{1f}<ada@example.com>]",
            "[G]",
            "Add\u{1f}engine",
            "(HEAD -> main, origin/main)",
        ]);
        let rec = CommitRecord::parse_line(&raw).unwrap();

        assert_eq!(rec.graph, "* ");
        assert_eq!(rec.id, "1a2b3c4");
        assert_eq!(rec.date, "2024-03-01");
        assert_eq!(rec.author, "Ada Lovelace");
        assert_eq!(rec.signer.as_deref(), Some("Ada Lovelace"));
        assert_eq!(rec.status, SignatureStatus::Good);
        assert_eq!(rec.message, "Add engine");
        assert_eq!(rec.refs, "HEAD -> main, origin/main");
        assert!(rec.signed_by_author());
    }

    #[test]
    fn empty_message_gets_placeholder() {
        let raw = line(&["abcd123", "2024-03-01", "Bob", "[]", "[N]", "", "()"]);
        let rec = CommitRecord::parse_line(&raw).unwrap();
        assert_eq!(rec.message, EMPTY_MESSAGE);
        assert_eq!(rec.signer, None);
        assert!(rec.refs.is_empty());
    }

    #[test]
    fn cannot_check_forces_unknown_signer() {
        let raw = line(&[
            "abcd123",
            "2024-03-01",
            "Bob",
            "[Mallory\u{1f}<m@x>]",
            "[E]",
            "msg",
            "()",
        ]);
        let rec = CommitRecord::parse_line(&raw).unwrap();
        assert_eq!(rec.signer.as_deref(), Some(UNKNOWN_SIGNER));
        assert_eq!(rec.severity(), Severity::Caution);
    }

    #[test]
    fn message_with_parentheses_keeps_refs_last() {
        let raw = line(&[
            "abcd123",
            "2024-03-01",
            "Bob",
            "[]",
            "[N]",
            "Fix\u{1f}(again)",
            "()",
        ]);
        let rec = CommitRecord::parse_line(&raw).unwrap();
        assert_eq!(rec.message, "Fix (again)");
        assert_eq!(rec.refs, "");
    }

    #[test]
    fn author_with_brackets() {
        let raw = line(&[
            "abcd123",
            "2024-03-01",
            "dependabot\u{1f}[bot]",
            "[]",
            "[N]",
            "Bump",
            "()",
        ]);
        let rec = CommitRecord::parse_line(&raw).unwrap();
        assert_eq!(rec.author, "dependabot [bot]");
        assert_eq!(rec.signer, None);
        assert_eq!(rec.status, SignatureStatus::Unsigned);
        assert_eq!(rec.message, "Bump");
    }

    #[test]
    fn bracketed_author_and_signer() {
        let raw = encode_raw_line(&format!(
            "* abcd123{SEP}2024-03-01{SEP}Jane Doe [ci]{SEP}[Jane Doe [ci] <j@x>]{SEP}[G]{SEP}Ship{SEP}()"
        ));
        let rec = CommitRecord::parse_line(&raw).unwrap();

        assert_eq!(rec.author, "Jane Doe [ci]");
        assert_eq!(rec.signer.as_deref(), Some("Jane Doe [ci]"));
        assert_eq!(rec.status, SignatureStatus::Good);
        assert_eq!(rec.message, "Ship");
        assert!(rec.signed_by_author());
    }

    #[test]
    fn bracketed_message_stays_in_message() {
        let raw = line(&[
            "abcd123",
            "2024-03-01",
            "Bob",
            "[]",
            "[N]",
            "[WIP]\u{1f}[B]\u{1f}fix",
            "()",
        ]);
        let rec = CommitRecord::parse_line(&raw).unwrap();
        assert_eq!(rec.author, "Bob");
        assert_eq!(rec.message, "[WIP] [B] fix");
    }

    #[test]
    fn known_code_preferred_over_single_letter_signer() {
        let raw = line(&[
            "abcd123",
            "2024-03-01",
            "x\u{1f}[ab]",
            "[Q]",
            "[G]",
            "m",
            "()",
        ]);
        let rec = CommitRecord::parse_line(&raw).unwrap();
        assert_eq!(rec.author, "x [ab]");
        assert_eq!(rec.signer.as_deref(), Some("Q"));
        assert_eq!(rec.status, SignatureStatus::Good);
    }

    #[test]
    fn empty_status_code_is_unsigned() {
        let raw = line(&["abcd123", "2024-03-01", "Bob", "[]", "[]", "m", "()"]);
        let rec = CommitRecord::parse_line(&raw).unwrap();
        assert_eq!(rec.status, SignatureStatus::Unsigned);
        assert_eq!(rec.message, "m");
    }

    #[test]
    fn graph_only_lines_dropped() {
        assert!(CommitRecord::parse_line("|\\").is_none());
        assert!(CommitRecord::parse_line("").is_none());
        assert!(CommitRecord::parse_line("|\u{1f}|").is_none());
    }

    #[test]
    fn truncated_line_dropped() {
        let raw = line(&["abcd123", "2024-03-01", "Bob", "[]"]);
        assert!(CommitRecord::parse_line(&raw).is_none());
    }

    #[test]
    fn carriage_return_tolerated() {
        let raw = format!(
            "{}\r",
            line(&["abcd123", "2024-03-01", "Bob", "[]", "[N]", "m", "()"])
        );
        assert!(CommitRecord::parse_line(&raw).is_some());
    }

    #[test]
    fn batch_tracks_author_width() {
        let raw = [
            line(&["abcd123", "d", "A", "[]", "[N]", "m", "()"]),
            "|/".to_string(),
            line(&["abcd124", "d", "Twenty\u{1f}Character\u{1f}Name", "[]", "[N]", "m", "()"]),
        ]
        .join("\n");
        let batch = ReportBatch::parse("UNMERGED", &raw);

        assert_eq!(batch.len(), 2);
        assert_eq!(batch.author_width, "Twenty Character Name".len());
    }

    #[test]
    fn empty_stream_empty_batch() {
        let batch = ReportBatch::parse("MERGED", "\n\n");
        assert!(batch.is_empty());
        assert_eq!(batch.author_width, 0);
    }

    #[test]
    fn to_line_round_trips() {
        let rec = CommitRecord {
            graph: "| * ".into(),
            id: "deadbee".into(),
            date: "2023-12-31".into(),
            author: "Grace Hopper".into(),
            signer: Some("Grace Hopper".into()),
            status: SignatureStatus::ExpiredKey,
            message: "Teach the compiler".into(),
            refs: "tag: v1.0".into(),
        };
        assert_eq!(CommitRecord::parse_line(&rec.to_line()), Some(rec));
    }

    #[test]
    fn encode_raw_line_keeps_ref_spaces() {
        let raw = format!("* abc1234{SEP}2024-01-01{SEP}A B{SEP}[]{SEP}[N]{SEP}x y{SEP}(HEAD -> main)");
        let encoded = encode_raw_line(&raw);
        assert!(encoded.ends_with("(HEAD -> main)"));
        let rec = CommitRecord::parse_line(&encoded).unwrap();
        assert_eq!(rec.author, "A B");
        assert_eq!(rec.message, "x y");
        assert_eq!(rec.refs, "HEAD -> main");
    }

    mod severity {
        use super::*;

        #[test]
        fn canonical_table() {
            let cases = [
                ('G', Severity::Good),
                ('U', Severity::Good),
                ('X', Severity::Caution),
                ('Y', Severity::Caution),
                ('E', Severity::Caution),
                ('B', Severity::Bad),
                ('R', Severity::Bad),
                ('N', Severity::None),
            ];
            for (code, expected) in cases {
                let status = SignatureStatus::from_code(Some(code));
                assert_eq!(status.severity(), expected, "code {code}");
                assert_eq!(status.code(), code);
            }
        }

        #[test]
        fn unrecognized_falls_back_to_caution() {
            let status = SignatureStatus::from_code(Some('Z'));
            assert_eq!(status, SignatureStatus::Unrecognized('Z'));
            assert_eq!(status.severity(), Severity::Caution);
        }

        #[test]
        fn missing_code_is_unsigned() {
            assert_eq!(SignatureStatus::from_code(None), SignatureStatus::Unsigned);
        }
    }
}
