use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::{fs, io};

use log::info;
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::{Result, TaggerError};
use crate::model::part_of_speech::PartOfSpeech;

/// `key -> (tag -> log probability)`, the shape shared by the lexicon and
/// suffix tables.
pub(crate) type ProbabilityTable = HashMap<String, HashMap<PartOfSpeech, f64>>;

/// Spelling of the empty suffix in suffix tables.
pub(crate) const EMPTY_KEY: &str = "-";

/// Reads a text file and returns all its lines as a `Vec<String>`.
///
/// - Reads the entire file into memory
/// - Splits on `\n` / `\r\n`
pub(crate) fn read_file<P: AsRef<Path>>(filename: P) -> io::Result<Vec<String>> {
	let mut contents = String::new();
	File::open(filename)?.read_to_string(&mut contents)?;
	Ok(contents.lines().map(str::to_owned).collect())
}

/// Builds an output path based on an input path and a new extension.
///
/// Example:
/// `data/lexicon.txt` + `"bin"` → `data/lexicon.bin`
pub(crate) fn build_output_path<P: AsRef<Path>>(
	input_path: P,
	output_extension: &str,
) -> io::Result<PathBuf> {
	let input_path = input_path.as_ref();

	let parent = input_path.parent().unwrap_or_else(|| Path::new("."));
	let file_stem = input_path
		.file_stem()
		.ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "Input path has no filename"))?;

	let mut output = PathBuf::from(parent);
	output.push(file_stem);
	output.set_extension(output_extension);

	Ok(output)
}

/// Loads a value from the binary cache next to `filepath` if there is one,
/// otherwise parses `filepath` and writes the cache.
///
/// - Uses `postcard` for compact serialization/deserialization.
/// - The cache is trusted as is: delete it after editing the text table.
pub(crate) fn load_cached<T, P, F>(filepath: P, parse: F) -> Result<T>
where
	T: Serialize + DeserializeOwned,
	P: AsRef<Path>,
	F: FnOnce(&Path) -> Result<T>,
{
	let filepath = filepath.as_ref();
	let binary_data_path = build_output_path(filepath, "bin")?;
	if binary_data_path.exists() {
		info!("Loading cached table {}", binary_data_path.display());
		let bytes = fs::read(&binary_data_path)?;
		return Ok(postcard::from_bytes(&bytes)?);
	}

	info!("Parsing table {}", filepath.display());
	let value = parse(filepath)?;
	let bytes = postcard::to_stdvec(&value)?;
	fs::write(binary_data_path, bytes)?;
	Ok(value)
}

/// Splits a table into its meaningful lines, numbered from 1.
///
/// Blank lines and `#` comments are skipped.
fn table_lines(lines: &[String]) -> impl Iterator<Item = (usize, Vec<&str>)> {
	lines
		.iter()
		.enumerate()
		.map(|(index, line)| (index + 1, line.trim()))
		.filter(|(_, line)| !line.is_empty() && !line.starts_with('#'))
		.map(|(number, line)| (number, line.split_whitespace().collect()))
}

/// Parses a probability in `[0, 1]`.
pub(crate) fn parse_probability(raw: &str, line: usize) -> Result<f64> {
	let probability: f64 = raw.parse().map_err(|_| TaggerError::MalformedTable {
		line,
		reason: format!("{raw:?} is not a number"),
	})?;
	if !(0.0..=1.0).contains(&probability) {
		return Err(TaggerError::MalformedTable {
			line,
			reason: format!("probability {probability} outside [0, 1]"),
		});
	}
	Ok(probability)
}

fn parse_tag(raw: &str, line: usize) -> Result<PartOfSpeech> {
	raw.parse().map_err(|_| TaggerError::MalformedTable {
		line,
		reason: format!("unknown tag {raw:?}"),
	})
}

/// Reads a `word TAG probability` lexicon into log space.
///
/// A zero probability is kept as `f64::NEG_INFINITY`: the pair is known to
/// be impossible, which is not the same as absent.
pub(crate) fn read_probability_table<P: AsRef<Path>>(filepath: P) -> Result<ProbabilityTable> {
	read_keyed_table(filepath, None)
}

/// Reads a `suffix TAG probability` table into log space, `-` standing for
/// the empty suffix.
pub(crate) fn read_suffix_table<P: AsRef<Path>>(filepath: P) -> Result<ProbabilityTable> {
	read_keyed_table(filepath, Some(EMPTY_KEY))
}

fn read_keyed_table<P: AsRef<Path>>(filepath: P, empty_key: Option<&str>) -> Result<ProbabilityTable> {
	let lines = read_file(filepath)?;
	let mut table = ProbabilityTable::new();

	for (number, fields) in table_lines(&lines) {
		let &[key, tag, probability] = fields.as_slice() else {
			return Err(TaggerError::MalformedTable {
				line: number,
				reason: format!("expected 3 fields, got {}", fields.len()),
			});
		};
		let key = if Some(key) == empty_key { "" } else { key };
		let tag = parse_tag(tag, number)?;
		let probability = parse_probability(probability, number)?;
		table.entry(key.to_owned()).or_default().insert(tag, probability.ln());
	}

	Ok(table)
}

/// Reads a `TAG [TAG [TAG]] probability` table of tag n-grams.
///
/// Probabilities stay linear: they are interpolated before taking the log.
pub(crate) fn read_tag_gram_table<P: AsRef<Path>>(filepath: P) -> Result<Vec<(Vec<PartOfSpeech>, f64)>> {
	let lines = read_file(filepath)?;
	let mut grams = Vec::new();

	for (number, fields) in table_lines(&lines) {
		let Some((probability, tags)) = fields.split_last() else {
			continue;
		};
		if tags.is_empty() || tags.len() > 3 {
			return Err(TaggerError::MalformedTable {
				line: number,
				reason: format!("expected 1 to 3 tags, got {}", tags.len()),
			});
		}
		let tags = tags.iter().map(|tag| parse_tag(tag, number)).collect::<Result<Vec<_>>>()?;
		grams.push((tags, parse_probability(probability, number)?));
	}

	Ok(grams)
}
