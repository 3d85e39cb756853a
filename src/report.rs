//! Plain-text report rendering for scan results.
//!
//! # Overview
//!
//! This module turns a [`HashIndex`] into the line-oriented report the CLI
//! prints on stdout. Two sections exist:
//!
//! - **unique**: one line per digest, `<digest> <identity>`
//! - **duplicates**: a digest line followed by one tab-indented line per
//!   group member
//!
//! Both sections are sorted by digest and group members appear in path
//! order, so the same index always renders the same bytes. That keeps the
//! output diff-able and easy to consume from scripts.

use std::collections::BTreeSet;
use std::io::{self, Write};
use std::path::PathBuf;

use crate::duplicates::HashIndex;

/// Which report sections to render.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReportMode {
    /// Unique entries followed by duplicate groups
    #[default]
    All,
    /// Only the unique section
    UniqueOnly,
    /// Only the duplicate groups section
    DuplicatesOnly,
}

/// Text renderer over a borrowed index.
#[derive(Debug)]
pub struct TextReport<'a> {
    index: &'a HashIndex,
}

impl<'a> TextReport<'a> {
    /// Create a report over the given index.
    #[must_use]
    pub fn new(index: &'a HashIndex) -> Self {
        Self { index }
    }

    /// Write the sections selected by `mode`.
    ///
    /// # Errors
    ///
    /// Returns any I/O error from the underlying writer.
    pub fn write<W: Write>(&self, out: &mut W, mode: ReportMode) -> io::Result<()> {
        match mode {
            ReportMode::All => {
                self.write_unique(out)?;
                self.write_duplicates(out)
            }
            ReportMode::UniqueOnly => self.write_unique(out),
            ReportMode::DuplicatesOnly => self.write_duplicates(out),
        }
    }

    /// Write one `<digest> <identity>` line per unique entry.
    ///
    /// # Errors
    ///
    /// Returns any I/O error from the underlying writer.
    pub fn write_unique<W: Write>(&self, out: &mut W) -> io::Result<()> {
        let mut entries: Vec<(&String, &PathBuf)> = self.index.unique().iter().collect();
        entries.sort_by(|a, b| a.0.cmp(b.0));

        for (digest, identity) in entries {
            writeln!(out, "{} {}", digest, identity.display())?;
        }
        Ok(())
    }

    /// Write each duplicate group as a digest line plus indented members.
    ///
    /// # Errors
    ///
    /// Returns any I/O error from the underlying writer.
    pub fn write_duplicates<W: Write>(&self, out: &mut W) -> io::Result<()> {
        let mut groups: Vec<(&String, &BTreeSet<PathBuf>)> =
            self.index.duplicates().iter().collect();
        groups.sort_by(|a, b| a.0.cmp(b.0));

        for (digest, members) in groups {
            writeln!(out, "{digest}")?;
            for member in members {
                writeln!(out, "\t{}", member.display())?;
            }
        }
        Ok(())
    }

    /// Render the selected sections to a string. Test and logging helper.
    ///
    /// # Panics
    ///
    /// Panics if rendering produces invalid UTF-8, which `Display`-formatted
    /// paths never do.
    #[must_use]
    pub fn to_text(&self, mode: ReportMode) -> String {
        let mut buf = Vec::new();
        self.write(&mut buf, mode)
            .expect("writing to a Vec cannot fail");
        String::from_utf8(buf).expect("report output is UTF-8")
    }
}
