//! RTF content extractor.
//!
//! A single-pass control-word stripper: groups are tracked on a stack,
//! destinations that carry no body text (font tables, stylesheets, pictures,
//! `\*` groups) are skipped, and paragraph/line controls become newlines.

use async_trait::async_trait;
use docparse_core::{ContentExtractor, DocumentFormat, ExtractError};
use std::path::Path;

use crate::run_blocking;
use crate::text::read_lossy;

/// Destinations whose content is not document text.
const IGNORED_DESTINATIONS: &[&str] = &[
    "aftncn", "aftnsep", "aftnsepc", "annotation", "atnauthor", "atndate", "atnicn", "atnid",
    "atnparent", "atnref", "atntime", "atrfend", "atrfstart", "author", "background", "bkmkend",
    "bkmkstart", "blipuid", "buptim", "category", "colorschememapping", "colortbl", "comment",
    "company", "creatim", "datafield", "datastore", "defchp", "defpap", "do", "doccomm",
    "docvar", "dptxbxtext", "ebcend", "ebcstart", "factoidname", "falt", "fchars", "ffdeftext",
    "ffentrymcr", "ffexitmcr", "ffformat", "ffhelptext", "ffl", "ffname", "ffstattext",
    "file", "filetbl", "fldinst", "fldtype", "fname", "fontemb", "fontfile", "fonttbl",
    "footer", "footerf", "footerl", "footerr", "footnote", "formfield", "ftncn", "ftnsep",
    "ftnsepc", "g", "generator", "gridtbl", "header", "headerf", "headerl", "headerr", "hl",
    "hlfr", "hlinkbase", "hlloc", "hlsrc", "hsv", "htmltag", "info", "keycode", "keywords",
    "latentstyles", "lchars", "levelnumbers", "leveltext", "lfolevel", "linkval", "list",
    "listlevel", "listname", "listoverride", "listoverridetable", "listpicture",
    "liststylename", "listtable", "listtext", "lsdlockedexcept", "macc", "maccPr", "mailmerge",
    "manager", "mhtmltag", "mmconnectstr", "mmdatasource", "mmheadersource", "mmodso",
    "mmodsofilter", "mmquery", "mmrecip", "mmsort", "mmwhere", "nesttableprops", "nextfile",
    "nonesttables", "objalias", "objclass", "objdata", "object", "objname", "objsect",
    "objtime", "oldcprops", "oldpprops", "oldsprops", "oldtprops", "oleclsid", "operator",
    "panose", "password", "passwordhash", "pgp", "pgptbl", "picprop", "pict", "pn", "pnseclvl",
    "pntext", "pntxta", "pntxtb", "printim", "private", "propname", "protend", "protstart",
    "protusertbl", "pxe", "result", "revtbl", "revtim", "rsidtbl", "rxe", "shp", "shpgrp",
    "shpinst", "shppict", "shprslt", "shptxt", "sn", "sp", "staticval", "stylesheet",
    "subject", "sv", "svb", "tc", "template", "themedata", "title", "txe", "ud", "upr",
    "userprops", "wgrffmtfilter", "windowcaption", "writereservation", "writereservhash",
    "xe", "xform", "xmlattrname", "xmlattrvalue", "xmlclose", "xmlname", "xmlnstbl",
    "xmlopen",
];

/// Extractor for Rich Text Format documents.
pub struct RtfExtractor;

impl RtfExtractor {
    /// Create a new RTF extractor.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Default for RtfExtractor {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ContentExtractor for RtfExtractor {
    fn name(&self) -> &'static str {
        "rtf"
    }

    fn formats(&self) -> &[DocumentFormat] {
        &[DocumentFormat::Rtf]
    }

    async fn extract(&self, path: &Path) -> Result<String, ExtractError> {
        let source = read_lossy(path).await?;
        run_blocking(move || {
            if !source.trim_start().starts_with("{\\rtf") {
                return Err(ExtractError::Parse("missing {\\rtf header".to_string()));
            }
            Ok(rtf_to_text(&source).trim().to_string())
        })
        .await
    }
}

/// Per-group parser state.
#[derive(Clone, Copy)]
struct GroupState {
    ignorable: bool,
    /// Fallback characters to skip after a `\u` escape
    uc_skip: usize,
}

/// Strip RTF markup and return the body text.
pub fn rtf_to_text(source: &str) -> String {
    let chars: Vec<char> = source.chars().collect();
    let mut out = String::new();
    let mut stack: Vec<GroupState> = Vec::new();
    let mut state = GroupState {
        ignorable: false,
        uc_skip: 1,
    };
    // Fallback characters still owed after the last \u escape
    let mut pending_skip = 0usize;
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        match c {
            '{' => {
                stack.push(state);
                pending_skip = 0;
                i += 1;
            }
            '}' => {
                state = stack.pop().unwrap_or(state);
                pending_skip = 0;
                i += 1;
            }
            '\\' => {
                i += 1;
                let Some(&next) = chars.get(i) else { break };

                if next.is_ascii_alphabetic() {
                    let start = i;
                    while i < chars.len() && chars[i].is_ascii_alphabetic() {
                        i += 1;
                    }
                    let word: String = chars[start..i].iter().collect();

                    let param_start = i;
                    if i < chars.len() && chars[i] == '-' {
                        i += 1;
                    }
                    while i < chars.len() && chars[i].is_ascii_digit() {
                        i += 1;
                    }
                    let param: Option<i32> = chars[param_start..i]
                        .iter()
                        .collect::<String>()
                        .parse()
                        .ok();

                    // A single space delimits the control word
                    if i < chars.len() && chars[i] == ' ' {
                        i += 1;
                    }

                    if word == "bin" {
                        // Raw binary payload of the given length
                        i += usize::try_from(param.unwrap_or(0)).unwrap_or(0);
                        continue;
                    }

                    if pending_skip > 0 {
                        pending_skip -= 1;
                        continue;
                    }

                    apply_control_word(&word, param, &mut state, &mut out, &mut pending_skip);
                } else {
                    i += 1;
                    match next {
                        '\'' => {
                            let hex: String = chars.iter().skip(i).take(2).collect();
                            i += hex.chars().count();
                            if pending_skip > 0 {
                                pending_skip -= 1;
                            } else if !state.ignorable {
                                if let Ok(byte) = u8::from_str_radix(&hex, 16) {
                                    out.push(cp1252_char(byte));
                                }
                            }
                        }
                        '*' => state.ignorable = true,
                        '\\' | '{' | '}' => {
                            if pending_skip > 0 {
                                pending_skip -= 1;
                            } else if !state.ignorable {
                                out.push(next);
                            }
                        }
                        '~' if !state.ignorable => out.push('\u{a0}'),
                        '_' if !state.ignorable => out.push('\u{2011}'),
                        '\n' | '\r' if !state.ignorable => out.push('\n'),
                        _ => {}
                    }
                }
            }
            '\r' | '\n' => i += 1,
            _ => {
                if pending_skip > 0 {
                    pending_skip -= 1;
                } else if !state.ignorable {
                    out.push(c);
                }
                i += 1;
            }
        }
    }

    out
}

fn apply_control_word(
    word: &str,
    param: Option<i32>,
    state: &mut GroupState,
    out: &mut String,
    pending_skip: &mut usize,
) {
    if IGNORED_DESTINATIONS.contains(&word) {
        state.ignorable = true;
        return;
    }

    match word {
        "uc" => state.uc_skip = usize::try_from(param.unwrap_or(1)).unwrap_or(1),
        "u" => {
            if !state.ignorable {
                if let Some(code) = param {
                    let code = if code < 0 { code + 65536 } else { code };
                    if let Some(ch) = u32::try_from(code).ok().and_then(char::from_u32) {
                        out.push(ch);
                    }
                }
            }
            *pending_skip = state.uc_skip;
        }
        _ if state.ignorable => {}
        "par" | "line" | "sect" | "page" | "row" => out.push('\n'),
        "tab" => out.push('\t'),
        "cell" => out.push(' '),
        "emdash" => out.push('\u{2014}'),
        "endash" => out.push('\u{2013}'),
        "emspace" | "enspace" | "qmspace" => out.push(' '),
        "bullet" => out.push('\u{2022}'),
        "lquote" => out.push('\u{2018}'),
        "rquote" => out.push('\u{2019}'),
        "ldblquote" => out.push('\u{201c}'),
        "rdblquote" => out.push('\u{201d}'),
        _ => {}
    }
}

/// Decode a Windows-1252 byte.
fn cp1252_char(byte: u8) -> char {
    match byte {
        0x80 => '\u{20ac}',
        0x85 => '\u{2026}',
        0x91 => '\u{2018}',
        0x92 => '\u{2019}',
        0x93 => '\u{201c}',
        0x94 => '\u{201d}',
        0x95 => '\u{2022}',
        0x96 => '\u{2013}',
        0x97 => '\u{2014}',
        0x99 => '\u{2122}',
        _ => char::from(byte),
    }
}
