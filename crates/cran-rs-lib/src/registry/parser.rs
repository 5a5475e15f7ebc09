//! Reads `PACKAGES` index documents.
//!
//! # Format
//! The index is a series of stanzas separated by blank lines, one per package.
//! Each stanza is a list of `Key: value` lines where a value may wrap onto following lines indented with whitespace.
//!
//! ```text
//! Package: ggplot2
//! Version: 3.2.1
//! Depends: R (>= 3.2)
//! Imports: digest, grDevices, grid, gtable (>= 0.1.1), lazyeval, MASS,
//!         mgcv, reshape2, rlang (>= 0.3.0), scales (>= 0.5.0), stats,
//!         tibble, viridisLite, withr (>= 2.0.0)
//! ```
//!
//! Only `Package`, `Version`, `Depends`, `Imports` and `LinkingTo` are read, everything else is ignored.
//! Dependency fields are free-form lists, names are scanned for rather than parsed.

use std::collections::HashMap;

use regex::Regex;

use super::{PackageRecord, Registry};
use crate::Error::{AbortParse, EmptyIndex};

/// Fields whose package names are merged into [`PackageRecord::dependencies`].
pub const DEPENDENCY_FIELDS: [&str; 3] = ["Depends", "Imports", "LinkingTo"];

pub struct IndexParser {
	key_value: Regex,
	version_constraint: Regex,
	package_name: Regex,
}

impl Default for IndexParser {
	fn default() -> Self {
		Self::new()
	}
}

impl IndexParser {
	pub fn new() -> Self {
		Self {
			key_value: Regex::new(r"^([A-Za-z0-9]+):\s*(.*)$").expect("key value pattern is invalid"),
			version_constraint: Regex::new(r"\([^),]*\)?").expect("version constraint pattern is invalid"),
			package_name: Regex::new(r"[A-Za-z][A-Za-z0-9_.]*").expect("package name pattern is invalid"),
		}
	}

	/// Parses a whole index document into a [`Registry`].
	///
	/// # Errors
	/// - [`EmptyIndex`](crate::Error::EmptyIndex) when the document has no stanzas.
	/// - [`AbortParse`](crate::Error::AbortParse) when any stanza lacks `Package` or `Version`.
	/// A malformed index is never partially used.
	pub fn parse(&self, document: &str) -> crate::Result<Registry> {
		let stanzas = split_stanzas(document);
		if stanzas.is_empty() {
			return Err(EmptyIndex);
		}

		let mut registry = Registry::default();
		for (i, stanza) in stanzas.iter().enumerate() {
			registry.insert(self.parse_stanza(stanza, i + 1)?);
		}

		log::debug!("Parsed {} stanzas into {} packages", stanzas.len(), registry.len());
		Ok(registry)
	}

	/// `position` is 1-based and only used to identify stanzas without a `Package` field.
	fn parse_stanza(&self, lines: &[&str], position: usize) -> crate::Result<PackageRecord> {
		let fields = self.fields(lines);

		let name = fields.get("Package").ok_or_else(|| AbortParse {
			stanza: format!("#{}", position),
			reason: "missing required field `Package`".to_string(),
		})?;

		let version = fields.get("Version").ok_or_else(|| AbortParse {
			stanza: name.clone(),
			reason: "missing required field `Version`".to_string(),
		})?;

		let mut dependencies = Vec::<String>::new();
		for field in DEPENDENCY_FIELDS {
			if let Some(value) = fields.get(field) {
				dependencies.extend(self.dependency_names(value));
			}
		}

		Ok(PackageRecord::new(name.clone(), version.clone(), dependencies))
	}

	/// Collects the stanza's fields, the last occurrence of a key wins.
	///
	/// Keys with an empty value are treated as absent.
	fn fields(&self, lines: &[&str]) -> HashMap<String, String> {
		let mut fields = HashMap::<String, String>::new();
		for line in fold_continuations(lines) {
			if let Some(captures) = self.key_value.captures(&line) {
				let value = captures[2].trim();
				if value.is_empty() {
					fields.remove(&captures[1]);
				} else {
					fields.insert(captures[1].to_string(), value.to_string());
				}
			} else {
				log::trace!("Ignoring unrecognised index line: {}", line);
			}
		}
		fields
	}

	/// Scans a dependency field for package names.
	///
	/// Parenthesised version constraints are removed first so nothing inside them is taken as a name.
	/// A constraint missing its `)` runs until the next comma.
	pub fn dependency_names(&self, value: &str) -> Vec<String> {
		let stripped = self.version_constraint.replace_all(value, " ");
		self.package_name.find_iter(&stripped).map(|m| m.as_str().to_string()).collect()
	}
}

/// Splits the document on blank lines, a line of only whitespace counts as blank.
fn split_stanzas(document: &str) -> Vec<Vec<&str>> {
	let mut stanzas = Vec::<Vec<&str>>::new();
	let mut current = Vec::<&str>::new();
	for line in document.lines() {
		if line.trim().is_empty() {
			if !current.is_empty() {
				stanzas.push(std::mem::take(&mut current));
			}
		} else {
			current.push(line);
		}
	}
	if !current.is_empty() {
		stanzas.push(current);
	}
	stanzas
}

/// Joins indented lines onto the line before them with a single space.
fn fold_continuations(lines: &[&str]) -> Vec<String> {
	let mut logical = Vec::<String>::new();
	for line in lines {
		if line.starts_with(char::is_whitespace) {
			if let Some(previous) = logical.last_mut() {
				previous.push(' ');
				previous.push_str(line.trim());
			} else {
				log::trace!("Continuation line with nothing to continue: {}", line);
			}
		} else {
			logical.push(line.trim_end().to_string());
		}
	}
	logical
}
