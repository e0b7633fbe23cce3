// Copyright 2022-2023 VMware, Inc.
// SPDX-License-Identifier: BSD-2-Clause

//! Reading a binary relation from text.
//!
//! Each line holds one `object<TAB>attribute` pair. Lines without a tab are split on
//! whitespace instead, so names may only contain spaces when the file is tab-separated.
//! Blank lines and lines starting with `#` are ignored.

use std::ops::Range;

use codespan_reporting::diagnostic::{Diagnostic, Label};
use thiserror::Error;

/// A malformed line of a relation file. Spans are byte offsets into the whole file.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RelationError {
    #[error("line {line}: expected an object and an attribute")]
    MissingAttribute { line: usize, span: Range<usize> },
    #[error("line {line}: unexpected text after the attribute")]
    TrailingText { line: usize, span: Range<usize> },
}

impl RelationError {
    pub fn diagnostic<FileId>(&self, file_id: FileId) -> Diagnostic<FileId> {
        let (msg, span) = match self {
            RelationError::MissingAttribute { span, .. } => {
                ("expected an object and an attribute", span)
            }
            RelationError::TrailingText { span, .. } => {
                ("unexpected text after the attribute", span)
            }
        };
        Diagnostic::error()
            .with_message(msg)
            .with_labels(vec![Label::primary(file_id, span.clone())])
    }
}

/// Parse the `(object, attribute)` pairs of a relation file, in file order.
pub fn parse_relation(text: &str) -> Result<Vec<(String, String)>, RelationError> {
    let mut relation = vec![];
    let mut offset = 0;
    for (i, raw) in text.split_inclusive('\n').enumerate() {
        let start = offset;
        offset += raw.len();
        let line = raw.trim_end_matches(&['\n', '\r'][..]);
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        let fields: Vec<&str> = if line.contains('\t') {
            line.split('\t')
                .map(str::trim)
                .filter(|f| !f.is_empty())
                .collect()
        } else {
            line.split_whitespace().collect()
        };
        let line_no = i + 1;
        match fields[..] {
            [object, attribute] => relation.push((object.to_string(), attribute.to_string())),
            [_] => {
                return Err(RelationError::MissingAttribute {
                    line: line_no,
                    span: start..start + line.len(),
                })
            }
            _ => {
                return Err(RelationError::TrailingText {
                    line: line_no,
                    span: start..start + line.len(),
                })
            }
        }
    }
    log::debug!("read {} pairs", relation.len());
    Ok(relation)
}
