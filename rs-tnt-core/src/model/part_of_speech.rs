use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::TaggerError;

macro_rules! parts_of_speech {
	($($variant:ident => $tag:literal,)+) => {
		/// Closed set of part of speech tags (Penn Treebank) plus the
		/// sentence boundary sentinels used by the decoder.
		///
		/// The declaration order is the `Ord` order, which the word models use
		/// to hand out candidates deterministically.
		#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
		pub enum PartOfSpeech {
			$($variant,)+
		}

		impl PartOfSpeech {
			/// Every tag, sentinels included, in declaration order.
			pub const ALL: &'static [PartOfSpeech] = &[$(PartOfSpeech::$variant,)+];

			/// Treebank spelling of the tag.
			pub fn tag(&self) -> &'static str {
				match self {
					$(PartOfSpeech::$variant => $tag,)+
				}
			}
		}

		impl FromStr for PartOfSpeech {
			type Err = TaggerError;

			fn from_str(s: &str) -> Result<Self, Self::Err> {
				match s {
					$($tag => Ok(PartOfSpeech::$variant),)+
					"(" => Ok(PartOfSpeech::LeftBracket),
					")" => Ok(PartOfSpeech::RightBracket),
					_ => Err(TaggerError::UnknownTag(s.to_owned())),
				}
			}
		}
	};
}

parts_of_speech! {
	Cc => "CC",
	Cd => "CD",
	Dt => "DT",
	Ex => "EX",
	Fw => "FW",
	In => "IN",
	Jj => "JJ",
	Jjr => "JJR",
	Jjs => "JJS",
	Ls => "LS",
	Md => "MD",
	Nn => "NN",
	Nns => "NNS",
	Nnp => "NNP",
	Nnps => "NNPS",
	Pdt => "PDT",
	Pos => "POS",
	Prp => "PRP",
	PrpPossessive => "PRP$",
	Rb => "RB",
	Rbr => "RBR",
	Rbs => "RBS",
	Rp => "RP",
	Sym => "SYM",
	To => "TO",
	Uh => "UH",
	Vb => "VB",
	Vbd => "VBD",
	Vbg => "VBG",
	Vbn => "VBN",
	Vbp => "VBP",
	Vbz => "VBZ",
	Wdt => "WDT",
	Wp => "WP",
	WpPossessive => "WP$",
	Wrb => "WRB",
	Comma => ",",
	SentenceClose => ".",
	Colon => ":",
	Hyphen => "HYPH",
	LeftBracket => "-LRB-",
	RightBracket => "-RRB-",
	OpenQuote => "``",
	CloseQuote => "''",
	Hash => "#",
	Dollar => "$",
	Bbs => "BBS",
	Bos => "BOS",
	Eos => "EOS",
}

impl PartOfSpeech {
	/// Whether the tag is one of the boundary markers rather than a real tag.
	pub fn is_sentinel(&self) -> bool {
		matches!(self, PartOfSpeech::Bbs | PartOfSpeech::Bos | PartOfSpeech::Eos)
	}

	/// Real tags only, in declaration order.
	pub fn tags() -> impl Iterator<Item = PartOfSpeech> {
		Self::ALL.iter().copied().filter(|pos| !pos.is_sentinel())
	}
}

impl fmt::Display for PartOfSpeech {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.tag())
	}
}
