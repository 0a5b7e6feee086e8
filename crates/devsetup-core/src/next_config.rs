//! Ensures `output: "standalone"` in the Next.js config
//!
//! The standalone output is what the generated Dockerfile copies into its
//! runtime image. Patching is a text transform: when there is no single
//! unambiguous place to insert the setting, the user is told to add it by
//! hand instead of guessing.

use crate::error::{Result, SetupError};
use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use tokio::fs;

const CONFIG_FILES: &[&str] = &[
    "next.config.ts",
    "next.config.mjs",
    "next.config.js",
    "next.config.cjs",
];

const OUTPUT_LINE: &str = "output: \"standalone\",";

const TS_CONFIG: &str = r#"import type { NextConfig } from "next";

const nextConfig: NextConfig = {
  output: "standalone",
};

export default nextConfig;
"#;

const MJS_CONFIG: &str = r#"/** @type {import('next').NextConfig} */
const nextConfig = {
  output: "standalone",
};

export default nextConfig;
"#;

/// What happened to the Next.js config
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NextConfigOutcome {
    Created(PathBuf),
    Updated(PathBuf),
    AlreadyConfigured(PathBuf),
    ManualRequired { path: PathBuf, reason: String },
}

/// Result of patching config source text
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourcePatch {
    AlreadyConfigured,
    Updated(String),
    ManualRequired(String),
}

fn standalone_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r#"\boutput\s*:\s*["'`]standalone["'`]"#).expect("valid regex"))
}

fn any_output_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\boutput\s*:").expect("valid regex"))
}

/// Object literals we know how to extend, most specific first
fn insertion_res() -> &'static [Regex] {
    static RES: OnceLock<Vec<Regex>> = OnceLock::new();
    RES.get_or_init(|| {
        [
            r"const\s+nextConfig\s*(?::\s*[\w.]+\s*)?=\s*\{",
            r"module\.exports\s*=\s*\{",
            r"export\s+default\s*\{",
        ]
        .iter()
        .map(|pattern| Regex::new(pattern).expect("valid regex"))
        .collect()
    })
}

/// Blank out `//` and `/* */` comments, keeping byte offsets intact
///
/// String and template literals are skipped so URLs like `https://...`
/// survive. Newlines inside comments are kept.
fn mask_comments(source: &str) -> String {
    #[derive(Clone, Copy, PartialEq)]
    enum State {
        Code,
        Str(u8),
        Line,
        Block,
    }

    let bytes = source.as_bytes();
    let mut out = bytes.to_vec();
    let mut state = State::Code;
    let mut i = 0;
    while i < bytes.len() {
        let b = bytes[i];
        let next = bytes.get(i + 1).copied();
        match state {
            State::Code => match (b, next) {
                (b'/', Some(b'/')) => {
                    state = State::Line;
                    continue;
                }
                (b'/', Some(b'*')) => {
                    out[i] = b' ';
                    out[i + 1] = b' ';
                    state = State::Block;
                    i += 2;
                    continue;
                }
                (b'"' | b'\'' | b'`', _) => state = State::Str(b),
                _ => {}
            },
            State::Str(quote) => {
                if b == b'\\' {
                    i += 2;
                    continue;
                }
                if b == quote {
                    state = State::Code;
                }
            }
            State::Line => {
                if b == b'\n' {
                    state = State::Code;
                } else {
                    out[i] = b' ';
                }
            }
            State::Block => {
                if b == b'*' && next == Some(b'/') {
                    out[i] = b' ';
                    out[i + 1] = b' ';
                    state = State::Code;
                    i += 2;
                    continue;
                }
                if b != b'\n' {
                    out[i] = b' ';
                }
            }
        }
        i += 1;
    }

    // Only whole comments were blanked, so this is still valid UTF-8
    String::from_utf8_lossy(&out).into_owned()
}

/// Insert the standalone output setting into config source
///
/// Commented-out settings and config objects are ignored.
pub fn patch_source(source: &str) -> SourcePatch {
    let code = mask_comments(source);
    let code = code.as_str();

    if standalone_re().is_match(code) {
        return SourcePatch::AlreadyConfigured;
    }
    if any_output_re().is_match(code) {
        return SourcePatch::ManualRequired(
            "`output` is already set to a different value".to_string(),
        );
    }

    for re in insertion_res() {
        let mut matches = re.find_iter(code);
        let Some(found) = matches.next() else {
            continue;
        };
        if matches.next().is_some() {
            return SourcePatch::ManualRequired(
                "found more than one config object".to_string(),
            );
        }

        let (head, tail) = source.split_at(found.end());
        let separator = if code[found.end()..].trim_start().starts_with('}') {
            "\n"
        } else {
            ""
        };
        return SourcePatch::Updated(format!("{head}\n  {OUTPUT_LINE}{separator}{tail}"));
    }

    SourcePatch::ManualRequired("could not find the exported config object".to_string())
}

/// Locate the project's Next.js config file
pub fn find_config(dir: &Path) -> Option<PathBuf> {
    CONFIG_FILES
        .iter()
        .map(|name| dir.join(name))
        .find(|path| path.is_file())
}

/// Make sure the Next.js build emits a standalone server
pub async fn ensure_standalone_output(dir: &Path) -> Result<NextConfigOutcome> {
    let Some(path) = find_config(dir) else {
        let (name, content) = if dir.join("tsconfig.json").exists() {
            ("next.config.ts", TS_CONFIG)
        } else {
            ("next.config.mjs", MJS_CONFIG)
        };
        let path = dir.join(name);
        fs::write(&path, content)
            .await
            .map_err(|source| SetupError::Write {
                path: path.clone(),
                source,
            })?;
        return Ok(NextConfigOutcome::Created(path));
    };

    let source = fs::read_to_string(&path).await?;
    match patch_source(&source) {
        SourcePatch::AlreadyConfigured => Ok(NextConfigOutcome::AlreadyConfigured(path)),
        SourcePatch::ManualRequired(reason) => {
            tracing::debug!(path = %path.display(), %reason, "next config needs manual edit");
            Ok(NextConfigOutcome::ManualRequired { path, reason })
        }
        SourcePatch::Updated(updated) => {
            fs::write(&path, updated)
                .await
                .map_err(|source| SetupError::Write {
                    path: path.clone(),
                    source,
                })?;
            Ok(NextConfigOutcome::Updated(path))
        }
    }
}
