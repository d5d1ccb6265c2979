//! Well-formedness checking XML tokenizer.
//!
//! Scans the decoded document once, by byte, and emits the markup events that
//! shape a memento tree. Slices are only cut at ASCII structural bytes or at
//! the end of scanned names, so every slice endpoint is a UTF-8 boundary.
//!
//! Known limitations (intentional):
//! - DTD internal subsets are skipped, not interpreted; declared entities are
//!   never expanded.
//! - Namespaces are not processed; `a:b` is an ordinary name.
use crate::atom::{AtomId, AtomTable};
use crate::entities::{decode_entities, normalize_attribute_whitespace, normalize_newlines};
use crate::names::{is_xml_char, is_xml_whitespace, scan_name};
use crate::types::{Token, TokenStream};
use memchr::{memchr, memchr2};
use memento::{ParseError, ParseErrorKind};

const COMMENT_START: &str = "<!--";
const COMMENT_END: &str = "-->";
const CDATA_START: &str = "<![CDATA[";
const CDATA_END: &str = "]]>";
const DOCTYPE_START: &str = "<!DOCTYPE";
const PI_START: &str = "<?";
const PI_END: &str = "?>";

/// Tokenize a complete document.
///
/// Comments, processing instructions (including the XML declaration) and the
/// DOCTYPE are consumed here. Element nesting is not checked; that is the tree
/// builder's job.
pub fn tokenize(input: &str) -> Result<TokenStream, ParseError> {
    let mut tokenizer = Tokenizer {
        input,
        bytes: input.as_bytes(),
        pos: 0,
        seen_root: false,
        atoms: AtomTable::new(),
        out: Vec::new(),
    };
    tokenizer.run()?;
    Ok(TokenStream::new(tokenizer.out, tokenizer.atoms, input.len()))
}

struct Tokenizer<'a> {
    input: &'a str,
    bytes: &'a [u8],
    pos: usize,
    /// Set once the first start tag is seen; the prolog ends there.
    seen_root: bool,
    atoms: AtomTable,
    out: Vec<Token>,
}

fn error(kind: ParseErrorKind, offset: usize) -> ParseError {
    ParseError::new(kind, offset)
}

impl<'a> Tokenizer<'a> {
    fn run(&mut self) -> Result<(), ParseError> {
        while self.pos < self.bytes.len() {
            if self.bytes[self.pos] != b'<' {
                self.text()?;
                continue;
            }
            let rest = &self.input[self.pos..];
            if rest.starts_with(COMMENT_START) {
                self.skip_past(COMMENT_START.len(), COMMENT_END, "comment")?;
            } else if rest.starts_with(CDATA_START) {
                self.cdata()?;
            } else if rest.starts_with(DOCTYPE_START) {
                if self.seen_root {
                    return Err(error(ParseErrorKind::MisplacedDoctype, self.pos));
                }
                self.doctype()?;
            } else if rest.starts_with(PI_START) {
                self.skip_past(PI_START.len(), PI_END, "processing instruction")?;
            } else if rest.starts_with("</") {
                self.end_tag()?;
            } else if rest.starts_with("<!") {
                return Err(error(ParseErrorKind::UnexpectedCharacter('!'), self.pos + 1));
            } else {
                self.start_tag()?;
            }
        }
        Ok(())
    }

    fn emit(&mut self, token: Token) {
        log::trace!(target: "xml.tokenizer", "emit token: {token:?}");
        self.out.push(token);
    }

    fn at(&self, k: usize) -> Option<u8> {
        self.bytes.get(k).copied()
    }

    fn skip_whitespace(&self, mut k: usize) -> usize {
        while k < self.bytes.len() && is_xml_whitespace(self.bytes[k]) {
            k += 1;
        }
        k
    }

    fn unexpected(&self, k: usize, context: &'static str) -> ParseError {
        match self.input[k..].chars().next() {
            Some(ch) => error(ParseErrorKind::UnexpectedCharacter(ch), k),
            None => error(ParseErrorKind::UnexpectedEof(context), k),
        }
    }

    fn intern_name(&mut self, k: usize) -> Result<(AtomId, usize), ParseError> {
        let len = scan_name(self.input, k);
        if len == 0 {
            return Err(if k >= self.bytes.len() {
                error(ParseErrorKind::UnexpectedEof("tag"), k)
            } else {
                error(ParseErrorKind::InvalidName, k)
            });
        }
        debug_assert!(self.input.is_char_boundary(k + len));
        let atom = self
            .atoms
            .intern(&self.input[k..k + len])
            .ok_or_else(|| error(ParseErrorKind::TooManyNames, k))?;
        Ok((atom, k + len))
    }

    /// Reject characters XML does not allow in content or attribute values.
    fn check_chars(&self, start: usize, end: usize) -> Result<(), ParseError> {
        match self.input[start..end]
            .char_indices()
            .find(|&(_, ch)| !is_xml_char(ch))
        {
            Some((at, ch)) => Err(error(ParseErrorKind::UnexpectedCharacter(ch), start + at)),
            None => Ok(()),
        }
    }

    /// Character data up to the next `<`.
    fn text(&mut self) -> Result<(), ParseError> {
        let start = self.pos;
        let end = memchr(b'<', &self.bytes[start..]).map_or(self.bytes.len(), |rel| start + rel);
        debug_assert!(self.input.is_char_boundary(end));
        self.check_chars(start, end)?;
        let raw = &self.input[start..end];
        if let Some(rel) = raw.find(CDATA_END) {
            return Err(error(ParseErrorKind::CdataEndInText, start + rel));
        }
        let ignorable = raw.bytes().all(is_xml_whitespace);
        let text = decode_entities(&normalize_newlines(raw)).into_owned();
        self.emit(Token::Text {
            text,
            ignorable,
            offset: start,
        });
        self.pos = end;
        Ok(())
    }

    fn skip_past(
        &mut self,
        open_len: usize,
        terminator: &str,
        context: &'static str,
    ) -> Result<(), ParseError> {
        let body = self.pos + open_len;
        match self.input[body..].find(terminator) {
            Some(rel) => {
                self.pos = body + rel + terminator.len();
                Ok(())
            }
            None => Err(error(ParseErrorKind::UnexpectedEof(context), self.pos)),
        }
    }

    fn cdata(&mut self) -> Result<(), ParseError> {
        let start = self.pos;
        let body = start + CDATA_START.len();
        let Some(rel) = self.input[body..].find(CDATA_END) else {
            return Err(error(ParseErrorKind::UnexpectedEof("CDATA section"), start));
        };
        self.check_chars(body, body + rel)?;
        let text = normalize_newlines(&self.input[body..body + rel]).into_owned();
        self.emit(Token::Text {
            text,
            ignorable: false,
            offset: start,
        });
        self.pos = body + rel + CDATA_END.len();
        Ok(())
    }

    /// Skip a DOCTYPE, including any bracketed internal subset and quoted
    /// literals that may contain `>`.
    fn doctype(&mut self) -> Result<(), ParseError> {
        let start = self.pos;
        let mut k = start + DOCTYPE_START.len();
        let mut depth = 0usize;
        while k < self.bytes.len() {
            match self.bytes[k] {
                quote @ (b'"' | b'\'') => {
                    let Some(rel) = memchr(quote, &self.bytes[k + 1..]) else {
                        break;
                    };
                    k += rel + 1;
                }
                b'<' if self.input[k..].starts_with(COMMENT_START) => {
                    let Some(rel) = self.input[k + COMMENT_START.len()..].find(COMMENT_END) else {
                        break;
                    };
                    k += COMMENT_START.len() + rel + COMMENT_END.len() - 1;
                }
                b'[' => depth += 1,
                b']' => depth = depth.saturating_sub(1),
                b'>' if depth == 0 => {
                    self.pos = k + 1;
                    return Ok(());
                }
                _ => {}
            }
            k += 1;
        }
        Err(error(ParseErrorKind::UnexpectedEof("DOCTYPE"), start))
    }

    fn end_tag(&mut self) -> Result<(), ParseError> {
        let start = self.pos;
        let (name, k) = self.intern_name(start + 2)?;
        let k = self.skip_whitespace(k);
        if self.at(k) != Some(b'>') {
            return Err(self.unexpected(k, "end tag"));
        }
        self.emit(Token::EndTag {
            name,
            offset: start,
        });
        self.pos = k + 1;
        Ok(())
    }

    fn start_tag(&mut self) -> Result<(), ParseError> {
        let start = self.pos;
        let (name, mut k) = self.intern_name(start + 1)?;
        let mut attributes: Vec<(AtomId, String)> = Vec::new();
        let self_closing;

        loop {
            let after_ws = self.skip_whitespace(k);
            let had_whitespace = after_ws > k;
            k = after_ws;
            match self.at(k) {
                None => return Err(error(ParseErrorKind::UnexpectedEof("start tag"), start)),
                Some(b'>') => {
                    self_closing = false;
                    k += 1;
                    break;
                }
                Some(b'/') => {
                    if self.at(k + 1) != Some(b'>') {
                        return Err(self.unexpected(k + 1, "start tag"));
                    }
                    self_closing = true;
                    k += 2;
                    break;
                }
                Some(_) if !had_whitespace => return Err(self.unexpected(k, "start tag")),
                Some(_) => {}
            }

            let name_start = k;
            let (attribute_name, after_name) = self.intern_name(k)?;
            let attribute_str = || self.atoms.resolve(attribute_name).to_string();
            if attributes.iter().any(|(existing, _)| *existing == attribute_name) {
                return Err(error(
                    ParseErrorKind::DuplicateAttribute(attribute_str()),
                    name_start,
                ));
            }

            k = self.skip_whitespace(after_name);
            match self.at(k) {
                Some(b'=') => {}
                None => return Err(error(ParseErrorKind::UnexpectedEof("start tag"), start)),
                Some(_) => {
                    return Err(error(ParseErrorKind::MissingEquals(attribute_str()), k));
                }
            }
            k = self.skip_whitespace(k + 1);
            let quote = match self.at(k) {
                Some(q @ (b'"' | b'\'')) => q,
                None => return Err(error(ParseErrorKind::UnexpectedEof("start tag"), start)),
                Some(_) => {
                    return Err(error(ParseErrorKind::UnquotedAttribute(attribute_str()), k));
                }
            };
            let value_start = k + 1;
            let Some(rel) = memchr2(quote, b'<', &self.bytes[value_start..]) else {
                return Err(error(ParseErrorKind::UnexpectedEof("attribute value"), k));
            };
            let value_end = value_start + rel;
            if self.bytes[value_end] == b'<' {
                return Err(error(ParseErrorKind::LtInAttribute(attribute_str()), value_end));
            }
            debug_assert!(self.input.is_char_boundary(value_end));
            self.check_chars(value_start, value_end)?;
            let raw = &self.input[value_start..value_end];
            let value = decode_entities(&normalize_attribute_whitespace(raw)).into_owned();
            attributes.push((attribute_name, value));
            k = value_end + 1;
        }

        self.emit(Token::StartTag {
            name,
            attributes,
            self_closing,
            offset: start,
        });
        self.seen_root = true;
        self.pos = k;
        Ok(())
    }
}
